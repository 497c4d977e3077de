use async_trait::async_trait;
use parley_core::{Message, Result};

/// The network half of an NLU parser.
///
/// Returns the backend's decoded JSON body untouched. Network and decoding
/// failures surface as `ParleyError::BackendTransport`; provider-side errors
/// arrive as ordinary JSON and are the parser's business.
#[async_trait]
pub trait IntentBackend: Send + Sync {
    async fn call(&self, message: &Message) -> Result<serde_json::Value>;
}

//! wit.ai intent parser.

use async_trait::async_trait;
use parley_core::{
    CoreContext, Message, ParleyError, ParsedIntent, ParserConfig, Result, best_intent,
};
use parley_skills::{MatchResult, SkillRegistry};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::backend::IntentBackend;
use crate::parser::Parser;

const WITAI_BASE_URL: &str = "https://api.wit.ai";
const WITAI_API_VERSION: &str = "20170307";

/// HTTP client for the wit.ai `/message` endpoint.
pub struct WitAiClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    parser: String,
}

impl WitAiClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: access_token.into(),
            base_url: WITAI_BASE_URL.into(),
            parser: "witai".into(),
        }
    }

    /// Point the client somewhere other than api.wit.ai.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Parser name reported in transport errors.
    pub fn with_parser_name(mut self, name: impl Into<String>) -> Self {
        self.parser = name.into();
        self
    }

    fn transport(&self, reason: impl ToString) -> ParleyError {
        ParleyError::BackendTransport {
            parser: self.parser.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl IntentBackend for WitAiClient {
    async fn call(&self, message: &Message) -> Result<serde_json::Value> {
        let url = format!("{}/message", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .query(&[("v", WITAI_API_VERSION), ("q", message.text())])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        // Auth and quota failures arrive as JSON bodies on non-2xx statuses.
        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| self.transport(format!("HTTP {status}: {e}")))?;
        debug!(parser = %self.parser, %status, "wit.ai responded");
        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct WitIntent {
    value: String,
    #[serde(default)]
    confidence: f64,
}

/// Parser backed by wit.ai intent classification.
pub struct WitAiParser {
    config: ParserConfig,
    backend: Option<Arc<dyn IntentBackend>>,
}

impl WitAiParser {
    /// Build from config. Without an `access-token` the parser stays inert.
    pub fn new(config: ParserConfig) -> Self {
        let backend = config.access_token.as_ref().map(|token| {
            Arc::new(WitAiClient::new(token.clone()).with_parser_name(config.name.clone()))
                as Arc<dyn IntentBackend>
        });
        Self { config, backend }
    }

    /// Build with an explicit backend (mocks, proxies).
    pub fn with_backend(config: ParserConfig, backend: Arc<dyn IntentBackend>) -> Self {
        Self {
            config,
            backend: Some(backend),
        }
    }

    /// Pull the ordered intent list and the remaining entities out of a result.
    fn extract(
        &self,
        result: &serde_json::Value,
    ) -> Option<(Vec<ParsedIntent>, serde_json::Map<String, serde_json::Value>)> {
        let entities = result.get("entities")?.as_object()?;
        let raw = entities.get("intent")?;
        let intents: Vec<WitIntent> = match serde_json::from_value(raw.clone()) {
            Ok(intents) => intents,
            Err(e) => {
                debug!(parser = %self.config.name, error = %e, "malformed intent list");
                return None;
            }
        };
        let mut rest = entities.clone();
        rest.remove("intent");
        let parsed = intents
            .into_iter()
            .map(|i| ParsedIntent::new(i.value, i.confidence))
            .collect();
        Some((parsed, rest))
    }

    fn provider_error(&self, result: &serde_json::Value) -> Option<ParleyError> {
        let code = result.get("code");
        let message = result.get("error");
        if code.is_none() && message.is_none() {
            return None;
        }
        let text = |v: Option<&serde_json::Value>| match v {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Some(ParleyError::BackendProvider {
            parser: self.config.name.clone(),
            code: text(code),
            message: text(message),
        })
    }
}

#[async_trait]
impl Parser for WitAiParser {
    fn config(&self) -> &ParserConfig {
        &self.config
    }

    async fn parse(
        &self,
        _core: &CoreContext,
        skills: &SkillRegistry,
        message: &Arc<Message>,
    ) -> Vec<MatchResult> {
        let Some(backend) = &self.backend else {
            debug!(parser = %self.config.name, "no access-token configured, skipping");
            return vec![];
        };

        let result = match backend.call(message).await {
            Ok(result) => result,
            Err(e) => {
                error!(parser = %self.config.name, error = %e, "intent backend call failed");
                return vec![];
            }
        };

        if let Some(e) = self.provider_error(&result) {
            error!(parser = %self.config.name, error = %e, "intent backend rejected the request");
            return vec![];
        }

        let Some((intents, entities)) = self.extract(&result) else {
            debug!(parser = %self.config.name, "no intents in backend result");
            return vec![];
        };

        let Some(best) = best_intent(&intents) else {
            return vec![];
        };

        if !self.config.passes(best.confidence) {
            info!(
                parser = %self.config.name,
                intent = %best.name,
                confidence = best.confidence,
                min_score = ?self.config.min_score,
                "intent below min-score, ignoring"
            );
            return vec![];
        }

        let intent = best.clone().with_entities(entities);
        message.attach_intent(&self.config.name, intent.clone());
        skills
            .matching_intent(&intent.name)
            .map(|skill| MatchResult {
                skill: Arc::clone(skill),
                message: Arc::clone(message),
                parser: self.config.name.clone(),
                intent: intent.clone(),
            })
            .collect()
    }
}

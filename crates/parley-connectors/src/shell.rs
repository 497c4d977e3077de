use async_trait::async_trait;
use parley_core::{Connector, ConnectorConfig, Inbox, Message, ParleyError, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Terminal connector: one message per stdin line, replies on stdout.
pub struct ShellConnector {
    config: ConnectorConfig,
    user: String,
    shutdown: CancellationToken,
}

impl ShellConnector {
    pub fn new(config: ConnectorConfig) -> Self {
        let user = config
            .settings
            .get("user")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "user".to_string());
        Self {
            config,
            user,
            shutdown: CancellationToken::new(),
        }
    }

    /// Name attached to every message read from stdin.
    pub fn user(&self) -> &str {
        &self.user
    }

    fn prompt(&self) -> String {
        format!("{}> ", self.user)
    }

    fn io_error(&self, e: std::io::Error) -> ParleyError {
        ParleyError::Connector {
            connector: self.config.name.clone(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl Connector for ShellConnector {
    fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    async fn connect(&self) -> Result<()> {
        info!(connector = %self.config.name, user = %self.user, "shell connected");
        Ok(())
    }

    async fn listen(&self, inbox: Inbox) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout
                .write_all(self.prompt().as_bytes())
                .await
                .map_err(|e| self.io_error(e))?;
            stdout.flush().await.map_err(|e| self.io_error(e))?;

            let line = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                line = lines.next_line() => line.map_err(|e| self.io_error(e))?,
            };
            let Some(line) = line else {
                debug!(connector = %self.config.name, "stdin closed");
                break;
            };
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            inbox.deliver(inbox.message(text, self.user.as_str(), "")).await?;
        }
        Ok(())
    }

    async fn respond(&self, _message: &Message, text: &str, _room: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        let line = format!("{}: {}\n", self.config.name, text);
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        stdout.flush().await.map_err(|e| self.io_error(e))
    }

    async fn disconnect(&self) -> Result<()> {
        self.shutdown.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_comes_from_settings() {
        let mut config = ConnectorConfig::named("shell");
        config.settings.insert("user".into(), json!("ada"));
        let shell = ShellConnector::new(config);
        assert_eq!(shell.user(), "ada");
        assert_eq!(shell.prompt(), "ada> ");
    }

    #[tokio::test]
    async fn disconnect_is_supported() {
        let shell = ShellConnector::new(ConnectorConfig::named("shell"));
        shell.connect().await.unwrap();
        shell.disconnect().await.unwrap();
        assert!(shell.shutdown.is_cancelled());
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use parley_core::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSleeper {
        calls: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.calls.lock().push(duration);
        }
    }

    impl RecordingSleeper {
        fn calls(&self) -> Vec<Duration> {
            self.calls.lock().clone()
        }
    }

    fn connector_with(config: ConnectorConfig) -> (Arc<dyn Connector>, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        let connector = BaseConnector::new(config).with_sleeper(sleeper.clone());
        (Arc::new(connector), sleeper)
    }

    // ── Message tests ──────────────────────────────────────────

    #[tokio::test]
    async fn test_message_fields_and_raw() {
        let (connector, _) = connector_with(ConnectorConfig::default());
        let raw = serde_json::json!({
            "text": "Hello world",
            "user": "user",
            "room": "default",
            "timestamp": "01/01/2000 19:23:00",
            "messageId": "101"
        });
        let message = Message::new("Hello world", "user", "default", connector)
            .with_raw(raw.as_object().unwrap().clone());

        assert_eq!(message.text(), "Hello world");
        assert_eq!(message.user(), "user");
        assert_eq!(message.room(), "default");
        assert_eq!(message.raw().unwrap()["timestamp"], "01/01/2000 19:23:00");
        assert_eq!(message.raw().unwrap()["messageId"], "101");

        let err = message.respond("Goodbye world").await.unwrap_err();
        assert!(err.is_not_implemented());
    }

    #[tokio::test]
    async fn test_respond_and_react_leave_message_untouched() {
        let (connector, _) = connector_with(ConnectorConfig::default());
        let message = Message::new("Hello world", "user", "default", connector);

        for _ in 0..3 {
            assert!(message.respond("Goodbye world").await.is_err());
            assert!(message.respond_in("elsewhere", Some("other")).await.is_err());
            assert!(!message.react("emoji").await.unwrap());
        }

        assert_eq!(message.text(), "Hello world");
        assert_eq!(message.user(), "user");
        assert_eq!(message.room(), "default");
    }

    #[tokio::test]
    async fn test_attach_intent_is_write_once_per_parser() {
        let (connector, _) = connector_with(ConnectorConfig::default());
        let message = Message::new("weather?", "user", "default", connector);

        assert!(message.attach_intent("witai", ParsedIntent::new("get_weather", 0.9)));
        assert!(!message.attach_intent("witai", ParsedIntent::new("other", 0.99)));
        assert!(message.attach_intent("regex", ParsedIntent::new("weather", 1.0)));

        assert_eq!(message.intent("witai").unwrap().name, "get_weather");
        assert_eq!(message.intent("regex").unwrap().name, "weather");
        assert!(message.intent("rasa").is_none());
    }

    // ── Delay tests ────────────────────────────────────────────

    #[tokio::test]
    async fn test_thinking_delay_scalar_sleeps_exactly() {
        let config = ConnectorConfig::named("shell").with_thinking_delay(DelaySpec::Fixed(3.0));
        let (connector, sleeper) = connector_with(config);
        let message = Message::new("hi", "user", "default", connector);

        assert!(message.respond("Hello there").await.is_err());
        assert_eq!(sleeper.calls(), vec![Duration::from_secs(3)]);
    }

    #[tokio::test]
    async fn test_thinking_delay_range_sleeps_within_bounds() {
        let config =
            ConnectorConfig::named("shell").with_thinking_delay(DelaySpec::Range([1.0, 4.0]));
        let (connector, sleeper) = connector_with(config);
        let message = Message::new("hi", "user", "default", connector);

        assert!(message.respond("Hello there").await.is_err());
        let calls = sleeper.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0] >= Duration::from_secs(1) && calls[0] <= Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_typing_delay_is_per_character() {
        let config = ConnectorConfig::named("shell").with_typing_delay(DelaySpec::Fixed(0.5));
        let (connector, sleeper) = connector_with(config);
        let message = Message::new("hi", "user", "default", connector);

        // "Hello there" is 11 characters.
        assert!(message.respond("Hello there").await.is_err());
        assert_eq!(sleeper.calls(), vec![Duration::from_secs_f64(5.5)]);
    }

    #[tokio::test]
    async fn test_typing_delay_range_uses_rate_within_bounds() {
        let config =
            ConnectorConfig::named("shell").with_typing_delay(DelaySpec::Range([1.0, 4.0]));
        let (connector, sleeper) = connector_with(config);
        let message = Message::new("hi", "user", "default", connector);

        assert!(message.respond("ab").await.is_err());
        let calls = sleeper.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0] >= Duration::from_secs(2) && calls[0] <= Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_thinking_runs_before_typing() {
        let config = ConnectorConfig::named("shell")
            .with_thinking_delay(DelaySpec::Fixed(2.0))
            .with_typing_delay(DelaySpec::Fixed(1.0));
        let (connector, sleeper) = connector_with(config);
        let message = Message::new("hi", "user", "default", connector);

        assert!(message.respond("abc").await.is_err());
        assert_eq!(
            sleeper.calls(),
            vec![Duration::from_secs(2), Duration::from_secs(3)]
        );
    }

    #[tokio::test]
    async fn test_react_runs_thinking_delay_and_reports_false() {
        let config = ConnectorConfig::named("shell").with_thinking_delay(DelaySpec::Fixed(2.0));
        let (connector, sleeper) = connector_with(config);
        let message = Message::new("Hello world", "user", "default", connector);

        let reacted = message.react("emoji").await.unwrap();
        assert!(!reacted);
        assert_eq!(sleeper.calls(), vec![Duration::from_secs(2)]);
    }

    #[tokio::test]
    async fn test_no_delay_configured_means_no_sleep() {
        let (connector, sleeper) = connector_with(ConnectorConfig::named("shell"));
        let message = Message::new("hi", "user", "default", connector);
        assert!(message.respond("Hello there").await.is_err());
        assert!(sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_overflowing_typing_delay_skips_pause() {
        let config = ConnectorConfig::named("shell").with_typing_delay(DelaySpec::Fixed(1e15));
        assert!(config.validate().is_ok());
        let (connector, sleeper) = connector_with(config);
        let message = Message::new("hi", "user", "default", connector);

        let err = message.respond(&"x".repeat(100_000)).await.unwrap_err();
        assert!(err.is_not_implemented());
        assert!(sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_negative_thinking_delay_skips_pause() {
        let config = ConnectorConfig::named("shell")
            .with_thinking_delay(DelaySpec::Fixed(-1.0))
            .with_typing_delay(DelaySpec::Fixed(f64::NAN));
        let (connector, sleeper) = connector_with(config);
        let message = Message::new("hi", "user", "default", connector);

        let err = message.respond("hello").await.unwrap_err();
        assert!(err.is_not_implemented());
        assert!(!message.react("emoji").await.unwrap());
        assert!(sleeper.calls().is_empty());
    }

    // ── Connector contract tests ───────────────────────────────

    #[tokio::test]
    async fn test_base_connector_keeps_config() {
        let mut config = ConnectorConfig::named("shell");
        config
            .settings
            .insert("example_item".into(), serde_json::json!("test"));
        let connector = BaseConnector::new(config);
        assert_eq!(connector.name(), "shell");
        assert_eq!(connector.config().settings["example_item"], "test");
    }

    #[tokio::test]
    async fn test_base_connector_best_effort_capabilities() {
        let connector: Arc<dyn Connector> = Arc::new(BaseConnector::default());
        let message = Message::new("hi", "user", "default", Arc::clone(&connector));
        assert!(!connector.react(&message, "emoji").await.unwrap());
        connector.user_typing(true).await.unwrap();
        assert!(connector.respond(&message, "x", "default").await.unwrap_err().is_not_implemented());
    }

    // ── Intent tests ───────────────────────────────────────────

    #[test]
    fn test_best_intent_prefers_highest_confidence() {
        let intents = vec![ParsedIntent::new("A", 0.9), ParsedIntent::new("B", 0.99)];
        assert_eq!(best_intent(&intents).unwrap().name, "B");
        let reversed = vec![ParsedIntent::new("B", 0.99), ParsedIntent::new("A", 0.9)];
        assert_eq!(best_intent(&reversed).unwrap().name, "B");
    }

    #[test]
    fn test_best_intent_ties_keep_first_seen() {
        let intents = vec![ParsedIntent::new("first", 0.5), ParsedIntent::new("second", 0.5)];
        assert_eq!(best_intent(&intents).unwrap().name, "first");
        assert!(best_intent(&[]).is_none());
    }

    #[test]
    fn test_parsed_intent_missing_confidence_is_zero() {
        let intent: ParsedIntent = serde_json::from_str(r#"{"name": "greet"}"#).unwrap();
        assert_eq!(intent.confidence, 0.0);
        assert!(intent.entities.is_empty());
    }

    // ── Error tests ────────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = ParleyError::not_implemented("respond");
        assert!(err.to_string().contains("respond"));
        assert!(err.is_not_implemented());

        let err = ParleyError::BackendProvider {
            parser: "witai".into(),
            code: "auth".into(),
            message: "missing or wrong auth token".into(),
        };
        let s = err.to_string();
        assert!(s.contains("auth"));
        assert!(s.contains("witai"));
        assert!(!err.is_not_implemented());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ParleyError = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }
}

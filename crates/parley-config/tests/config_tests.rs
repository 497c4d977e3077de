#[cfg(test)]
mod tests {
    use parley_config::ConfigLoader;
    use parley_config::schema::*;
    use parley_core::DelaySpec;
    use std::collections::HashMap;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogCapture {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::INFO)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    // ── Default tests ──────────────────────────────────────────

    #[test]
    fn test_parley_config_defaults() {
        let config = ParleyConfig::default();
        assert_eq!(config.connectors.len(), 1);
        assert_eq!(config.connectors[0].name, "shell");
        assert_eq!(config.parsers.len(), 1);
        assert_eq!(config.parsers[0].name, "regex");
        assert!(config.skills.is_empty());
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "pretty");
        assert!(config.file.is_none());
    }

    // ── TOML parsing ───────────────────────────────────────────

    #[test]
    fn test_full_document() {
        let config = ConfigLoader::parse(
            r#"
[logging]
level = "debug"
format = "json"

[[connectors]]
name = "shell"
thinking-delay = 3
typing-delay = [0.01, 0.05]
default-room = "terminal"
prompt-colour = "green"

[[parsers]]
name = "witai"
access-token = "abc"
min-score = 0.3

[[skills]]
name = "hello"
greeting = "Howdy"
"#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");

        let shell = &config.connectors[0];
        assert_eq!(shell.thinking_delay, Some(DelaySpec::Fixed(3.0)));
        assert_eq!(shell.typing_delay, Some(DelaySpec::Range([0.01, 0.05])));
        assert_eq!(shell.default_room.as_deref(), Some("terminal"));
        assert_eq!(shell.settings["prompt-colour"], "green");

        let witai = &config.parsers[0];
        assert_eq!(witai.access_token.as_deref(), Some("abc"));
        assert_eq!(witai.min_score, Some(0.3));
        assert!(witai.enabled);

        assert_eq!(config.skill("hello").get("greeting").unwrap(), "Howdy");
    }

    #[test]
    fn test_partial_toml_applies_defaults() {
        let config = ConfigLoader::parse(
            r#"
[logging]
level = "warn"
"#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.connectors[0].name, "shell");
        assert_eq!(config.parsers[0].name, "regex");
    }

    #[test]
    fn test_connector_type_is_separate_from_name() {
        let config = ConfigLoader::parse(
            r#"
[[connectors]]
name = "tests"
type = "loopback"
"#,
        )
        .unwrap();
        assert_eq!(config.connectors[0].kind(), "loopback");
        assert!(config.validate().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = ConfigLoader::parse("[[connectors]\nname =").unwrap_err();
        assert!(matches!(err, parley_core::ParleyError::Config(_)));
    }

    // ── Validation ─────────────────────────────────────────────

    #[test]
    fn test_unknown_values_only_warn() {
        let config = ConfigLoader::parse(
            r#"
[logging]
level = "loud"
format = "xml"

[[connectors]]
name = "irc"

[[parsers]]
name = "luis"
"#,
        )
        .unwrap();
        let warnings = config.validate().unwrap();
        let fields: Vec<_> = warnings.iter().map(|w| w.field.as_str()).collect();
        assert!(fields.contains(&"logging.level"));
        assert!(fields.contains(&"logging.format"));
        assert!(fields.contains(&"connectors.irc.type"));
        assert!(fields.contains(&"parsers.luis"));
        assert!(warnings.iter().all(|w| w.severity == WarningSeverity::Warning));
    }

    #[test]
    fn test_empty_connectors_warns() {
        let config = ParleyConfig {
            connectors: vec![],
            ..Default::default()
        };
        let warnings = config.validate().unwrap();
        assert_eq!(warnings[0].field, "connectors");
    }

    #[test]
    fn test_negative_delay_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("parley.toml");
        std::fs::write(
            &config_path,
            r#"
[[connectors]]
name = "shell"
thinking-delay = -1
"#,
        )
        .unwrap();
        let err = ConfigLoader::load(Some(config_path.as_path())).err().unwrap();
        assert!(err.to_string().contains("thinking-delay"));
    }

    #[test]
    fn test_warning_display() {
        let w = ConfigWarning {
            field: "logging.level".into(),
            message: "unknown log level 'loud'".into(),
            severity: WarningSeverity::Warning,
            hint: Some("Valid values: info".into()),
        };
        let text = w.to_string();
        assert!(text.starts_with("warning: logging.level: unknown log level"));
        assert!(text.contains("Valid values: info"));
    }

    // ── Environment overrides ──────────────────────────────────

    #[test]
    fn test_env_overrides() {
        let mut config = ParleyConfig::default();
        config.parsers.push(parley_core::ParserConfig::named("witai"));

        let env: HashMap<&str, &str> = HashMap::from([
            ("PARLEY_LOG_LEVEL", "trace"),
            ("PARLEY_LOG_FORMAT", "json"),
            ("WITAI_ACCESS_TOKEN", "from-env"),
        ]);
        let config =
            ConfigLoader::apply_env_overrides(config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.format, "json");
        assert_eq!(
            config.parser("witai").unwrap().access_token.as_deref(),
            Some("from-env")
        );
    }

    #[test]
    fn test_file_token_wins_over_env() {
        let mut config = ParleyConfig::default();
        config
            .parsers
            .push(parley_core::ParserConfig::named("witai").with_access_token("from-file"));
        let config = ConfigLoader::apply_env_overrides(config, |k| {
            (k == "WITAI_ACCESS_TOKEN").then(|| "from-env".to_string())
        });
        assert_eq!(
            config.parser("witai").unwrap().access_token.as_deref(),
            Some("from-file")
        );
    }

    // ── ConfigLoader tests ─────────────────────────────────────

    #[test]
    fn test_config_loader_with_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("parley.toml");
        let mut f = std::fs::File::create(&config_path).unwrap();
        writeln!(
            f,
            r#"
[[connectors]]
name = "shell"
typing-delay = 0.02

[[parsers]]
name = "regex"

[[parsers]]
name = "witai"
access-token = "abc"
enabled = false
"#
        )
        .unwrap();

        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        let config = loader.get();
        assert_eq!(loader.path(), config_path.as_path());
        assert_eq!(config.connectors[0].typing_delay, Some(DelaySpec::Fixed(0.02)));
        assert_eq!(config.parsers.len(), 2);
        assert!(!config.parsers[1].enabled);
    }

    #[test]
    fn test_config_loader_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let loader = ConfigLoader::load(Some(missing.as_path())).unwrap();
        assert_eq!(loader.get().connectors[0].name, "shell");
        assert_eq!(loader.warnings()[0].field, "config");
        assert_eq!(loader.warnings()[0].severity, WarningSeverity::Info);
    }

    #[test]
    fn test_load_warnings_are_kept_until_logged() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("parley.toml");
        std::fs::write(&config_path, "[[connectors]]\nname = \"irc\"\n").unwrap();

        // Loaded before any subscriber exists, as the CLI does.
        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        assert!(loader.warnings().iter().any(|w| w.field == "connectors.irc.type"));

        let logs = LogCapture::default();
        {
            let _guard = logs.install();
            loader.log_warnings();
        }
        let out = logs.contents();
        assert!(out.contains("WARN"));
        assert!(out.contains("unknown connector type 'irc'"));
    }

    #[test]
    fn test_config_loader_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("parley.toml");

        std::fs::write(
            &config_path,
            r#"
[[connectors]]
name = "shell"
"#,
        )
        .unwrap();

        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();
        assert!(loader.get().connectors[0].thinking_delay.is_none());

        std::fs::write(
            &config_path,
            r#"
[[connectors]]
name = "shell"
thinking-delay = [1, 4]
"#,
        )
        .unwrap();

        loader.reload().unwrap();
        assert_eq!(
            loader.get().connectors[0].thinking_delay,
            Some(DelaySpec::Range([1.0, 4.0]))
        );
    }

    #[test]
    fn test_reload_rejects_invalid_file_and_keeps_current() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("parley.toml");
        std::fs::write(&config_path, "[[connectors]]\nname = \"shell\"\n").unwrap();
        let loader = ConfigLoader::load(Some(config_path.as_path())).unwrap();

        std::fs::write(
            &config_path,
            "[[connectors]]\nname = \"shell\"\n\n[[connectors]]\nname = \"shell\"\n",
        )
        .unwrap();
        assert!(loader.reload().is_err());
        assert_eq!(loader.get().connectors.len(), 1);
    }

    // ── JSON roundtrip ─────────────────────────────────────────

    #[test]
    fn test_config_json_roundtrip() {
        let config = ParleyConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: ParleyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.connectors[0].name, config.connectors[0].name);
        assert_eq!(restored.parsers[0].name, "regex");
    }
}

use parley_config::{ConfigLoader, ParleyConfig};

pub(super) fn cmd_config(loader: &ConfigLoader, json: bool) -> parley_core::Result<()> {
    let config = masked(loader.get());

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("config: {}", loader.path().display());
    println!(
        "logging: level={} format={}{}",
        config.logging.level,
        config.logging.format,
        config
            .logging
            .file
            .as_ref()
            .map(|p| format!(" file={}", p.display()))
            .unwrap_or_default()
    );

    println!("\nconnectors:");
    for c in &config.connectors {
        println!(
            "  {:<12} type={:<10} thinking={:?} typing={:?}",
            c.name,
            c.kind(),
            c.thinking_delay,
            c.typing_delay
        );
    }

    println!("\nparsers (in order):");
    for p in &config.parsers {
        println!(
            "  {:<12} enabled={:<5} min-score={} token={}",
            p.name,
            p.enabled,
            p.min_score.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
            p.access_token.as_deref().unwrap_or("-")
        );
    }

    if !config.skills.is_empty() {
        println!("\nskills:");
        for s in &config.skills {
            println!("  {:<12} {} setting(s)", s.name, s.settings.len());
        }
    }

    let warnings = config.validate().unwrap_or_default();
    if !warnings.is_empty() {
        println!();
        for w in warnings {
            println!("{w}");
        }
    }
    Ok(())
}

/// Replace credentials before printing.
fn masked(mut config: ParleyConfig) -> ParleyConfig {
    for parser in &mut config.parsers {
        if parser.access_token.is_some() {
            parser.access_token = Some("********".into());
        }
    }
    config
}

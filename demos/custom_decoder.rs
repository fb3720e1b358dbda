//! Custom decoders with `TextDecode` and JSON values with `Json<T>`

use envbind::{EnvBind, Json, TextDecode};
use serde::Deserialize;

/// Log level parsed case-insensitively
#[derive(Debug, Default)]
enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl TextDecode for LogLevel {
    fn decode_text(&mut self, text: &str) -> anyhow::Result<()> {
        *self = match text.to_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            other => anyhow::bail!("unknown log level: {other}"),
        };
        Ok(())
    }
}

envbind::text_field!(LogLevel);

#[derive(Debug, Deserialize)]
struct Limits {
    requests_per_second: u32,
    burst: u32,
}

#[derive(Debug, EnvBind)]
struct Config {
    #[env(name = "LOG_LEVEL")]
    pub log_level: LogLevel,

    // One level per component, comma-separated
    #[env(name = "COMPONENT_LEVELS")]
    pub component_levels: Vec<LogLevel>,

    #[env(name = "RATE_LIMITS")]
    pub limits: Json<Limits>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("LOG_LEVEL", "WARN");
    std::env::set_var("COMPONENT_LEVELS", "debug,error");
    std::env::set_var("RATE_LIMITS", r#"{"requests_per_second":100,"burst":20}"#);

    let mut config = Config {
        log_level: LogLevel::default(),
        component_levels: Vec::new(),
        limits: Json(Limits {
            requests_per_second: 10,
            burst: 1,
        }),
    };
    envbind::bind(&mut config)?;

    println!("Log level: {:?}", config.log_level);
    println!("Component levels: {:?}", config.component_levels);
    println!(
        "Limits: {} req/s, burst {}",
        config.limits.requests_per_second, config.limits.burst
    );

    std::env::set_var("LOG_LEVEL", "verbose");
    if let Err(e) = envbind::bind(&mut config) {
        println!("Rejected: {e}");
    }

    Ok(())
}

//! Basic usage example

use chrono::TimeDelta;
use envbind::EnvBind;
use std::time::Duration;

#[derive(Debug, EnvBind)]
struct Config {
    // Loaded from DATABASE_URL when it is set
    #[env(name = "DATABASE_URL")]
    pub database_url: String,

    #[env(name = "SERVER_PORT")]
    pub server_port: u16,

    #[env(name = "MAX_CONNECTIONS")]
    pub max_connections: u32,

    #[env(name = "DEBUG_MODE")]
    pub debug_mode: bool,

    // Duration literal, e.g. "1m30s"
    #[env(name = "REQUEST_TIMEOUT")]
    pub request_timeout: Duration,

    // Signed duration, may be negative
    #[env(name = "CLOCK_SKEW")]
    pub clock_skew: TimeDelta,
}

fn main() -> anyhow::Result<()> {
    // Set environment variables for demonstration
    std::env::set_var("DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("SERVER_PORT", "3000");
    std::env::set_var("REQUEST_TIMEOUT", "1m30s");
    std::env::set_var("CLOCK_SKEW", "-250ms");
    std::env::remove_var("MAX_CONNECTIONS");
    std::env::remove_var("DEBUG_MODE");

    // Defaults first, then override from the environment
    let mut config = Config {
        database_url: "postgres://localhost/dev".to_string(),
        server_port: 8080,
        max_connections: 10,
        debug_mode: false,
        request_timeout: Duration::from_secs(30),
        clock_skew: TimeDelta::zero(),
    };
    envbind::bind(&mut config)?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Port: {}", config.server_port);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Debug Mode: {}", config.debug_mode);
    println!("  Request Timeout: {:?}", config.request_timeout);
    println!("  Clock Skew: {}", config.clock_skew);

    Ok(())
}

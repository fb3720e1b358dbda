//! Nested records and a custom environment source

use envbind::{Binder, EnvBind};
use std::collections::HashMap;

#[derive(Debug, EnvBind)]
struct Database {
    #[env(name = "DB_URL")]
    pub url: String,

    #[env(name = "DB_POOL_SIZE")]
    pub pool_size: u32,
}

#[derive(Debug, EnvBind)]
struct Cache {
    #[env(name = "CACHE_URL")]
    pub url: String,
}

#[derive(Debug, EnvBind)]
struct Config {
    #[env(name = "APP_NAME")]
    pub name: String,

    // Un-annotated records are bound recursively
    pub database: Database,

    // Boxed records are followed too
    pub cache: Box<Cache>,
}

fn main() -> anyhow::Result<()> {
    // Any map of names to values can stand in for the process environment
    let env: HashMap<String, String> = [
        ("APP_NAME", "inventory"),
        ("DB_URL", "postgres://db.internal/inventory"),
        ("DB_POOL_SIZE", "32"),
        ("CACHE_URL", "redis://cache.internal"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut config = Config {
        name: "app".to_string(),
        database: Database {
            url: "postgres://localhost/dev".to_string(),
            pool_size: 4,
        },
        cache: Box::new(Cache {
            url: "redis://localhost".to_string(),
        }),
    };
    Binder::with_env(env).bind(&mut config)?;

    println!("{config:#?}");

    Ok(())
}

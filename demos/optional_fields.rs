//! Optional fields example
//!
//! `Some` values are overwritten in place. `None` is never allocated, so a
//! field can be switched off by leaving it `None`.

use envbind::EnvBind;

#[derive(Debug, EnvBind)]
struct Config {
    #[env(name = "API_KEY")]
    pub api_key: Option<String>,

    #[env(name = "MAX_RETRIES")]
    pub max_retries: Option<u32>,

    #[env(name = "TRACE_SAMPLE_RATE")]
    pub trace_sample_rate: Option<Box<f64>>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("API_KEY", "secret-key-123");
    std::env::set_var("MAX_RETRIES", "5");
    std::env::set_var("TRACE_SAMPLE_RATE", "0.25");

    let mut config = Config {
        api_key: Some(String::new()),
        max_retries: Some(3),
        // Stays None even though TRACE_SAMPLE_RATE is set
        trace_sample_rate: None,
    };
    envbind::bind(&mut config)?;

    println!("API Key: {:?}", config.api_key);
    println!("Max Retries: {:?}", config.max_retries);
    println!("Trace Sample Rate: {:?}", config.trace_sample_rate);

    Ok(())
}

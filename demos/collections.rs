//! Comma-separated lists and fixed-size arrays

use envbind::EnvBind;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, EnvBind)]
struct Config {
    #[env(name = "ALLOWED_HOSTS")]
    pub allowed_hosts: Vec<String>,

    #[env(name = "WORKER_WEIGHTS")]
    pub worker_weights: Vec<f64>,

    // Hex, octal and binary literals are accepted
    #[env(name = "FEATURE_MASKS")]
    pub feature_masks: [u8; 3],

    #[env(name = "RETRY_BACKOFF")]
    pub retry_backoff: [Duration; 2],

    #[env(name = "DNS_SERVERS")]
    pub dns_servers: [IpAddr; 2],
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("ALLOWED_HOSTS", "example.com,api.example.com");
    std::env::set_var("WORKER_WEIGHTS", "0.5,1.5,2");
    std::env::set_var("FEATURE_MASKS", "0xff,0o17,0b101");
    // Only the first two values fit the array
    std::env::set_var("RETRY_BACKOFF", "250ms,1.5s,10s");
    std::env::set_var("DNS_SERVERS", "1.1.1.1,2606:4700:4700::1111");

    let mut config = Config {
        allowed_hosts: vec!["localhost".to_string()],
        worker_weights: Vec::new(),
        feature_masks: [0; 3],
        retry_backoff: [Duration::ZERO; 2],
        dns_servers: [IpAddr::from([127, 0, 0, 1]); 2],
    };
    envbind::bind(&mut config)?;

    println!("Allowed hosts: {:?}", config.allowed_hosts);
    println!("Worker weights: {:?}", config.worker_weights);
    println!("Feature masks: {:?}", config.feature_masks);
    println!("Retry backoff: {:?}", config.retry_backoff);
    println!("DNS servers: {:?}", config.dns_servers);

    // A bad element leaves the list as it was
    std::env::set_var("WORKER_WEIGHTS", "1,two,3");
    if let Err(e) = envbind::bind(&mut config) {
        println!("Rejected: {e}");
    }
    println!("Worker weights kept: {:?}", config.worker_weights);

    Ok(())
}

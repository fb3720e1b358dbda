// The variable name must be a string literal

use envbind::EnvBind;

#[derive(EnvBind)]
pub struct Config {
    #[env(name = 8080)]
    pub port: u16,
}

fn main() {}

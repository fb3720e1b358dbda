// A skipped field cannot also name a variable

use envbind::EnvBind;

#[derive(EnvBind)]
pub struct Config {
    #[env(skip, name = "PORT")] pub port: u16,
}

fn main() {}

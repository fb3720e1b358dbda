// Only `name` and `skip` are understood inside #[env(...)]

use envbind::EnvBind;

#[derive(EnvBind)]
pub struct Config {
    #[env(default = "8080")]
    pub port: u16,
}

fn main() {}

// Only structs have a field table to bind into

use envbind::EnvBind;

#[derive(EnvBind)]
pub enum Mode {
    Fast,
    Slow,
}

fn main() {}

//! Bind environment variables into tagged struct fields, in place
//!
//! `envbind` walks a struct field by field and overwrites the fields whose
//! `#[env(name = "...")]` variable is set. Fields whose variable is unset
//! keep their current value, so a struct can be prefilled with defaults and
//! then overridden from the environment.
//!
//! # Features
//!
//! - **Declarative**: field descriptor tables generated by `#[derive(EnvBind)]`
//! - **In place**: unset variables never touch a field
//! - **Nested records**: un-annotated struct fields are bound recursively
//! - **Pointers**: `Option<T>` and `Box<T>` are unwrapped; `None` stays `None`
//! - **Lists**: `Vec<T>` and `[T; N]` read comma-separated values
//! - **Custom decoders**: any type implementing [`TextDecode`]
//!
//! # Value Parsing
//!
//! - Strings: stored verbatim, including the empty string
//! - Booleans: `1`, `t`, `true`, `TRUE`, `True` (and the false forms)
//! - Integers: `42`, `-7`, `0x2A`, `0o52`, `0b101010`, range checked
//! - Floats: `2.5`, `-1e-3`, `0x1.8p3`, `inf`, `nan`
//! - Durations: `1h2m3s`, `300ms`, `-1.5s` into [`chrono::TimeDelta`];
//!   [`std::time::Duration`] fields reject negative values
//! - Lists: `a,b,c` (no quoting, an element can never contain a comma)
//!
//! `Vec` elements start from [`Field::placeholder`]. Every scalar and
//! built-in decoder has one, as does any type registered with
//! [`text_field!`].
//!
//! # Example
//!
//! ```rust
//! use envbind::EnvBind;
//! use std::time::Duration;
//!
//! #[derive(Debug, EnvBind)]
//! struct Config {
//!     #[env(name = "APP_PORT")]
//!     pub port: u16,
//!
//!     #[env(name = "APP_TIMEOUT")]
//!     pub timeout: Duration,
//!
//!     #[env(name = "APP_PEERS")]
//!     pub peers: Vec<String>,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::set_var("APP_PORT", "9090");
//! #     std::env::set_var("APP_PEERS", "a,b");
//! #     std::env::remove_var("APP_TIMEOUT");
//! let mut config = Config {
//!     port: 8080,
//!     timeout: Duration::from_secs(30),
//!     peers: Vec::new(),
//! };
//! envbind::bind(&mut config)?;
//!
//! assert_eq!(config.port, 9090);
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert_eq!(config.peers, ["a", "b"]);
//! #     Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[env(name = "VAR")]`
//!
//! Bind the field from `VAR`. An empty name is reported as
//! [`BindError::EmptyVarName`] on every bind.
//!
//! ## `#[env(skip)]`
//!
//! Leave the field out of binding altogether. Fields that are not `pub`
//! are always left out.
//!
//! ## No attribute
//!
//! A nested record is bound recursively; anything else is left alone.
//!
//! ```rust
//! # use envbind::EnvBind;
//! #[derive(EnvBind)]
//! pub struct Database {
//!     #[env(name = "DB_URL")]
//!     pub url: String,
//! }
//!
//! #[derive(EnvBind)]
//! pub struct Config {
//!     pub database: Database,
//!     pub replica: Option<Database>,
//! }
//! ```

extern crate self as envbind;

mod binder;
mod decode;
mod env;
mod error;
mod field;
pub mod parse;

pub use binder::{Binder, MAX_POINTER_DEPTH};
pub use decode::{Json, TextDecode};
pub use env::{Environment, ProcessEnv};
pub use envbind_derive::EnvBind;
pub use error::BindError;
pub use field::{
    Elements, Field, FieldSlot, FloatSlot, Kind, Record, Scalar, SignedSlot, Target,
    UnsignedSlot,
};
pub use parse::LiteralError;

// Re-export for custom decoders
#[doc(hidden)]
pub use anyhow;

/// Bind `target` from the process environment.
///
/// Shorthand for [`Binder::new().bind(target)`](Binder::bind).
///
/// # Errors
///
/// See [`Binder::bind`].
pub fn bind<T: Field + ?Sized>(target: &mut T) -> Result<(), BindError> {
    Binder::new().bind(target)
}

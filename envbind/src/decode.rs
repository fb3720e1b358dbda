//! Custom text decoders
//!
//! A type that knows how to read itself from text implements [`TextDecode`]
//! and registers with [`text_field!`](crate::text_field). The binder then
//! hands it the raw environment value (or one comma-separated part of it)
//! instead of using the built-in primitive parsers, at any level of
//! `Option`/`Box` nesting.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::field::{Field, Kind, Target};

/// Decode a value in place from its textual form.
///
/// On error the value should be left as it was.
pub trait TextDecode {
    fn decode_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Register [`TextDecode`] types as bindable fields.
///
/// `text_field!(Type)` starts new `Vec` elements from `Type::default()`.
/// Types without a `Default` name their starting value instead, as in
/// `text_field!(Type => Type::new())`.
///
/// # Example
///
/// ```rust
/// use envbind::TextDecode;
///
/// #[derive(Debug, Default)]
/// struct Level(u8);
///
/// impl TextDecode for Level {
///     fn decode_text(&mut self, text: &str) -> anyhow::Result<()> {
///         self.0 = match text {
///             "low" => 1,
///             "high" => 9,
///             other => anyhow::bail!("unknown level {other:?}"),
///         };
///         Ok(())
///     }
/// }
///
/// envbind::text_field!(Level);
/// ```
#[macro_export]
macro_rules! text_field {
    ($($ty:ty => $placeholder:expr),+ $(,)?) => {
        $(
            impl $crate::Field for $ty {
                fn kind() -> $crate::Kind {
                    $crate::Kind::Custom
                }

                fn target(&mut self) -> $crate::Target<'_> {
                    $crate::Target::Custom(self)
                }

                fn placeholder() -> ::std::option::Option<Self> {
                    ::std::option::Option::Some($placeholder)
                }
            }
        )+
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::text_field!($ty => <$ty as ::std::default::Default>::default());
        )+
    };
}

macro_rules! from_str_decoders {
    ($($ty:ty => $placeholder:expr),* $(,)?) => {
        $(
            impl TextDecode for $ty {
                fn decode_text(&mut self, text: &str) -> anyhow::Result<()> {
                    *self = text.parse()?;
                    Ok(())
                }
            }

            text_field!($ty => $placeholder);
        )*
    };
}

from_str_decoders! {
    IpAddr => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    Ipv4Addr => Ipv4Addr::UNSPECIFIED,
    Ipv6Addr => Ipv6Addr::UNSPECIFIED,
    SocketAddr => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
    PathBuf => PathBuf::new(),
    char => '\0',
}

/// Field decoded from a JSON document.
///
/// Use it for values the comma-separated list syntax cannot express, such
/// as nested lists, maps or whole structs. A `Json` value cannot itself be
/// a `Vec` element.
///
/// ```rust
/// use envbind::{EnvBind, Json};
/// use std::collections::HashMap;
///
/// #[derive(EnvBind)]
/// struct Config {
///     #[env(name = "LIMITS")]
///     pub limits: Json<HashMap<String, u32>>,
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the decoded value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: DeserializeOwned> TextDecode for Json<T> {
    fn decode_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.0 = serde_json::from_str(text)?;
        Ok(())
    }
}

impl<T: DeserializeOwned> Field for Json<T> {
    fn kind() -> Kind {
        Kind::Custom
    }

    fn target(&mut self) -> Target<'_> {
        Target::Custom(self)
    }
}

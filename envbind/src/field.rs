//! Field descriptors: static kinds and mutable binding targets
//!
//! `#[derive(EnvBind)]` turns every struct into a [`Record`] whose
//! [`fields`](Record::fields) method yields one [`FieldSlot`] per bindable
//! field, in declaration order. Each slot pairs the field's static [`Kind`]
//! with a [`Target`], a mutable view the binder writes through.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::num::TryFromIntError;
use std::time::Duration;

use chrono::TimeDelta;

use crate::decode::TextDecode;
use crate::error::BindError;

/// Static shape category of a field's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Bool,
    String,
    Int { bits: u32 },
    Uint { bits: u32 },
    Float { bits: u32 },
    Duration,
    Array { element: Box<Kind>, len: usize },
    List { element: Box<Kind> },
    Record,
    Optional(Box<Kind>),
    Custom,
    Unsupported,
}

impl Kind {
    /// Whether an array or list may hold elements of this kind.
    pub fn is_element(&self) -> bool {
        matches!(
            self,
            Kind::Bool
                | Kind::String
                | Kind::Int { .. }
                | Kind::Uint { .. }
                | Kind::Float { .. }
                | Kind::Duration
                | Kind::Custom
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Bool => f.write_str("bool"),
            Kind::String => f.write_str("string"),
            Kind::Int { bits } => write!(f, "int{bits}"),
            Kind::Uint { bits } => write!(f, "uint{bits}"),
            Kind::Float { bits } => write!(f, "float{bits}"),
            Kind::Duration => f.write_str("duration"),
            Kind::Array { element, len } => write!(f, "[{element}; {len}]"),
            Kind::List { element } => write!(f, "[{element}]"),
            Kind::Record => f.write_str("record"),
            Kind::Optional(inner) => write!(f, "optional {inner}"),
            Kind::Custom => f.write_str("custom"),
            Kind::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// A type the binder knows how to reach into.
///
/// Implemented for the primitive scalars, `String`, `Duration`,
/// `TimeDelta`, arrays, `Vec`, `Option`, `Box`, derived records and custom
/// decoders registered with [`text_field!`](crate::text_field).
pub trait Field {
    /// Static kind of the type.
    fn kind() -> Kind
    where
        Self: Sized;

    /// Mutable view of the value for the binder to write through.
    fn target(&mut self) -> Target<'_>;

    /// Value a new list element starts from before it is decoded.
    ///
    /// `None` means the type cannot be a `Vec` element.
    fn placeholder() -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

/// A struct whose fields can be bound, usually via `#[derive(EnvBind)]`.
pub trait Record {
    /// Descriptor table of the bindable fields, in declaration order.
    fn fields(&mut self) -> Vec<FieldSlot<'_>>;
}

/// One row of a record's descriptor table.
pub struct FieldSlot<'a> {
    /// Field name as declared
    pub name: &'static str,
    /// Environment variable named by `#[env(name = "...")]`
    pub variable: Option<&'static str>,
    /// Static kind of the field's type
    pub kind: Kind,
    /// Mutable view of the field
    pub target: Target<'a>,
}

impl<'a> FieldSlot<'a> {
    /// Describe `value` (used by macro-generated code)
    pub fn new<T: Field>(
        name: &'static str,
        variable: Option<&'static str>,
        value: &'a mut T,
    ) -> Self {
        Self {
            name,
            variable,
            kind: T::kind(),
            target: value.target(),
        }
    }
}

impl fmt::Debug for FieldSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSlot")
            .field("name", &self.name)
            .field("variable", &self.variable)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Mutable view of a value, by decoding strategy.
pub enum Target<'a> {
    /// Value decodes itself from text
    Custom(&'a mut dyn TextDecode),
    /// Built-in primitive
    Scalar(Scalar<'a>),
    /// Fixed-length array, written in place
    Array(&'a mut dyn Elements),
    /// Variable-length list, replaced wholesale
    List(&'a mut dyn Elements),
    /// Nested record
    Record(&'a mut dyn Record),
    /// One level of indirection; `None` is a nil pointer
    Pointer(Option<Box<Target<'a>>>),
    /// No decoding strategy
    Unsupported,
}

/// Mutable view of a built-in primitive.
pub enum Scalar<'a> {
    Bool(&'a mut bool),
    String(&'a mut String),
    Int(&'a mut dyn SignedSlot),
    Uint(&'a mut dyn UnsignedSlot),
    Float(&'a mut dyn FloatSlot),
    Duration(&'a mut Duration),
    /// Signed counterpart of `Duration`
    TimeDelta(&'a mut TimeDelta),
}

/// Storage for a signed integer of some width.
pub trait SignedSlot {
    fn bits(&self) -> u32;
    fn store(&mut self, value: i64) -> Result<(), TryFromIntError>;
}

/// Storage for an unsigned integer of some width.
pub trait UnsignedSlot {
    fn bits(&self) -> u32;
    fn store(&mut self, value: u64) -> Result<(), TryFromIntError>;
}

/// Storage for a floating point number of some precision.
pub trait FloatSlot {
    fn bits(&self) -> u32;
    /// `value` is already rounded to `bits` of precision.
    fn store(&mut self, value: f64);
}

/// Element storage of an array or list.
pub trait Elements {
    /// Kind shared by every element.
    fn element_kind(&self) -> Kind;

    /// Decode one element per entry of `parts` with `decode`.
    ///
    /// Arrays write in place and ignore surplus parts; lists are rebuilt to
    /// exactly `parts.len()` elements and only replaced when all succeed.
    /// A list whose element type has no [`Field::placeholder`] offers each
    /// part to `decode` as [`Target::Unsupported`].
    fn assign(
        &mut self,
        parts: &[&str],
        decode: &mut dyn FnMut(Target<'_>, &str) -> Result<(), BindError>,
    ) -> Result<(), BindError>;
}

macro_rules! scalar_fields {
    ($($ty:ty => $kind:expr, $scalar:ident, $placeholder:expr;)*) => {
        $(
            impl Field for $ty {
                fn kind() -> Kind {
                    $kind
                }

                fn target(&mut self) -> Target<'_> {
                    Target::Scalar(Scalar::$scalar(self))
                }

                fn placeholder() -> Option<Self> {
                    Some($placeholder)
                }
            }
        )*
    };
}

scalar_fields! {
    bool => Kind::Bool, Bool, false;
    String => Kind::String, String, String::new();
    Duration => Kind::Duration, Duration, Duration::ZERO;
    TimeDelta => Kind::Duration, TimeDelta, TimeDelta::zero();
    f32 => Kind::Float { bits: 32 }, Float, 0.0;
    f64 => Kind::Float { bits: 64 }, Float, 0.0;
}

macro_rules! signed_fields {
    ($($ty:ty),*) => {
        $(
            impl SignedSlot for $ty {
                fn bits(&self) -> u32 {
                    <$ty>::BITS
                }

                fn store(&mut self, value: i64) -> Result<(), TryFromIntError> {
                    *self = <$ty>::try_from(value)?;
                    Ok(())
                }
            }

            impl Field for $ty {
                fn kind() -> Kind {
                    Kind::Int { bits: <$ty>::BITS }
                }

                fn target(&mut self) -> Target<'_> {
                    Target::Scalar(Scalar::Int(self))
                }

                fn placeholder() -> Option<Self> {
                    Some(0)
                }
            }
        )*
    };
}

macro_rules! unsigned_fields {
    ($($ty:ty),*) => {
        $(
            impl UnsignedSlot for $ty {
                fn bits(&self) -> u32 {
                    <$ty>::BITS
                }

                fn store(&mut self, value: u64) -> Result<(), TryFromIntError> {
                    *self = <$ty>::try_from(value)?;
                    Ok(())
                }
            }

            impl Field for $ty {
                fn kind() -> Kind {
                    Kind::Uint { bits: <$ty>::BITS }
                }

                fn target(&mut self) -> Target<'_> {
                    Target::Scalar(Scalar::Uint(self))
                }

                fn placeholder() -> Option<Self> {
                    Some(0)
                }
            }
        )*
    };
}

signed_fields!(i8, i16, i32, i64, isize);
unsigned_fields!(u8, u16, u32, u64, usize);

impl FloatSlot for f32 {
    fn bits(&self) -> u32 {
        32
    }

    fn store(&mut self, value: f64) {
        *self = value as f32;
    }
}

impl FloatSlot for f64 {
    fn bits(&self) -> u32 {
        64
    }

    fn store(&mut self, value: f64) {
        *self = value;
    }
}

impl<T: Field, const N: usize> Elements for [T; N] {
    fn element_kind(&self) -> Kind {
        T::kind()
    }

    fn assign(
        &mut self,
        parts: &[&str],
        decode: &mut dyn FnMut(Target<'_>, &str) -> Result<(), BindError>,
    ) -> Result<(), BindError> {
        for (element, part) in self.iter_mut().zip(parts) {
            decode(element.target(), part)?;
        }
        Ok(())
    }
}

impl<T: Field, const N: usize> Field for [T; N] {
    fn kind() -> Kind {
        Kind::Array {
            element: Box::new(T::kind()),
            len: N,
        }
    }

    fn target(&mut self) -> Target<'_> {
        Target::Array(self)
    }
}

impl<T: Field> Elements for Vec<T> {
    fn element_kind(&self) -> Kind {
        T::kind()
    }

    fn assign(
        &mut self,
        parts: &[&str],
        decode: &mut dyn FnMut(Target<'_>, &str) -> Result<(), BindError>,
    ) -> Result<(), BindError> {
        let mut fresh = Vec::with_capacity(parts.len());
        for part in parts {
            match T::placeholder() {
                Some(mut element) => {
                    decode(element.target(), part)?;
                    fresh.push(element);
                }
                None => decode(Target::Unsupported, part)?,
            }
        }
        *self = fresh;
        Ok(())
    }
}

impl<T: Field> Field for Vec<T> {
    fn kind() -> Kind {
        Kind::List {
            element: Box::new(T::kind()),
        }
    }

    fn target(&mut self) -> Target<'_> {
        Target::List(self)
    }
}

impl<T: Field> Field for Option<T> {
    fn kind() -> Kind {
        Kind::Optional(Box::new(T::kind()))
    }

    fn target(&mut self) -> Target<'_> {
        Target::Pointer(self.as_mut().map(|inner| Box::new(inner.target())))
    }
}

impl<T: Field> Field for Box<T> {
    fn kind() -> Kind {
        Kind::Optional(Box::new(T::kind()))
    }

    fn target(&mut self) -> Target<'_> {
        Target::Pointer(Some(Box::new((**self).target())))
    }
}

impl<K, V, S> Field for HashMap<K, V, S> {
    fn kind() -> Kind {
        Kind::Unsupported
    }

    fn target(&mut self) -> Target<'_> {
        Target::Unsupported
    }
}

impl<K, V> Field for BTreeMap<K, V> {
    fn kind() -> Kind {
        Kind::Unsupported
    }

    fn target(&mut self) -> Target<'_> {
        Target::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(i8::kind(), Kind::Int { bits: 8 });
        assert_eq!(u64::kind(), Kind::Uint { bits: 64 });
        assert_eq!(usize::kind(), Kind::Uint { bits: usize::BITS });
        assert_eq!(f32::kind(), Kind::Float { bits: 32 });
        assert_eq!(Duration::kind(), Kind::Duration);
        assert_eq!(TimeDelta::kind(), Kind::Duration);
    }

    #[test]
    fn test_composite_kinds() {
        assert_eq!(
            <[u16; 3]>::kind(),
            Kind::Array {
                element: Box::new(Kind::Uint { bits: 16 }),
                len: 3
            }
        );
        assert_eq!(
            Option::<Box<bool>>::kind(),
            Kind::Optional(Box::new(Kind::Optional(Box::new(Kind::Bool))))
        );
        assert_eq!(Vec::<Vec<u8>>::kind().to_string(), "[[uint8]]");
    }

    #[test]
    fn test_element_kinds() {
        assert!(Kind::Duration.is_element());
        assert!(Kind::Custom.is_element());
        assert!(!Kind::Record.is_element());
        assert!(!Vec::<u8>::kind().is_element());
        assert!(!Option::<u8>::kind().is_element());
    }

    #[test]
    fn test_none_is_nil_pointer() {
        let mut value: Option<u8> = None;
        assert!(matches!(value.target(), Target::Pointer(None)));
    }

    #[test]
    fn test_box_is_never_nil() {
        let mut value = Box::new(5u8);
        match value.target() {
            Target::Pointer(Some(inner)) => {
                assert!(matches!(*inner, Target::Scalar(Scalar::Uint(_))))
            }
            _ => panic!("Expected pointer target"),
        }
    }

    #[test]
    fn test_signed_store_rejects_overflow() {
        let mut value = 0i8;
        assert!(SignedSlot::store(&mut value, 300).is_err());
        assert_eq!(value, 0);
        SignedSlot::store(&mut value, -128).unwrap();
        assert_eq!(value, -128);
    }

    #[test]
    fn test_list_assign_replaces_only_on_success() {
        let mut list = vec![9u8, 9, 9];
        let result = list.assign(&["1", "2"], &mut |target, _| match target {
            Target::Scalar(Scalar::Uint(slot)) => {
                slot.store(1).unwrap();
                Err(BindError::parse_error("v", "L", "boom"))
            }
            _ => unreachable!(),
        });
        assert!(result.is_err());
        assert_eq!(list, vec![9, 9, 9]);
    }

    struct Opaque;

    impl Field for Opaque {
        fn kind() -> Kind {
            Kind::Custom
        }

        fn target(&mut self) -> Target<'_> {
            Target::Unsupported
        }
    }

    #[test]
    fn test_list_without_placeholder_offers_unsupported() {
        let mut list = vec![Opaque];
        let result = list.assign(&["a"], &mut |target, _| match target {
            Target::Unsupported => Err(BindError::unparsable_type("v")),
            _ => unreachable!(),
        });
        assert!(matches!(result, Err(BindError::UnparsableType { .. })));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_scalar_placeholders() {
        assert_eq!(u8::placeholder(), Some(0));
        assert_eq!(String::placeholder(), Some(String::new()));
        assert_eq!(TimeDelta::placeholder(), Some(TimeDelta::zero()));
        assert!(Option::<u8>::placeholder().is_none());
    }
}

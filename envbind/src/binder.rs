//! Field-dispatch engine binding environment values into records

use tracing::{debug, trace};

use crate::env::{Environment, ProcessEnv};
use crate::error::BindError;
use crate::field::{Elements, Field, FieldSlot, Record, Scalar, Target};
use crate::parse::{self, LiteralError};

/// Deepest chain of `Option`/`Box` levels the binder will unwrap.
pub const MAX_POINTER_DEPTH: usize = 16;

/// Binds environment variables into tagged record fields.
///
/// # Example
///
/// ```rust
/// use envbind::{Binder, EnvBind};
/// use std::collections::HashMap;
///
/// #[derive(Debug, Default, EnvBind)]
/// struct Config {
///     #[env(name = "PORT")]
///     pub port: u16,
///     #[env(name = "HOSTS")]
///     pub hosts: Vec<String>,
/// }
///
/// let env: HashMap<String, String> = [
///     ("PORT".to_string(), "8080".to_string()),
///     ("HOSTS".to_string(), "a,b".to_string()),
/// ]
/// .into();
///
/// let mut config = Config::default();
/// Binder::with_env(env).bind(&mut config)?;
/// assert_eq!(config.port, 8080);
/// assert_eq!(config.hosts, ["a", "b"]);
/// # Ok::<(), envbind::BindError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Binder<E = ProcessEnv> {
    env: E,
}

impl Binder {
    /// Binder reading the process environment
    pub fn new() -> Self {
        Self { env: ProcessEnv }
    }
}

impl<E: Environment> Binder<E> {
    /// Binder reading from `env`
    pub fn with_env(env: E) -> Self {
        Self { env }
    }

    /// The environment this binder reads from
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Bind every annotated field of `target`, recursing into nested records.
    ///
    /// Fields whose variable is unset, and `None` fields, are left untouched.
    ///
    /// # Errors
    ///
    /// - [`BindError::NotARecord`] if `target` is not a record
    /// - [`BindError::EmptyVarName`] for `#[env(name = "")]`
    /// - [`BindError::Parse`] if a value cannot be decoded
    /// - [`BindError::UnparsableType`] if a field's type cannot be decoded
    pub fn bind<T: Field + ?Sized>(&self, target: &mut T) -> Result<(), BindError> {
        match target.target() {
            Target::Record(record) => self.bind_record(record),
            _ => Err(BindError::NotARecord),
        }
    }

    fn bind_record(&self, record: &mut dyn Record) -> Result<(), BindError> {
        let fields = record.fields();
        trace!(fields = fields.len(), "binding record");
        for slot in fields {
            self.bind_field(slot)?;
        }
        Ok(())
    }

    fn bind_field(&self, slot: FieldSlot<'_>) -> Result<(), BindError> {
        let FieldSlot {
            name,
            variable,
            kind,
            target,
        } = slot;

        let Some(variable) = variable else {
            return self.descend(name, target);
        };
        if variable.is_empty() {
            return Err(BindError::empty_var_name(name));
        }
        let Some(value) = self.env.lookup(variable) else {
            debug!(field = name, variable, "environment variable not set, field left untouched");
            return Ok(());
        };

        let mut target = target;
        for _ in 0..=MAX_POINTER_DEPTH {
            target = match target {
                Target::Custom(decoder) => {
                    return decoder
                        .decode_text(&value)
                        .map_err(|e| BindError::parse_error(name, variable, format!("{e:#}")));
                }
                Target::Pointer(Some(inner)) => *inner,
                Target::Pointer(None) => {
                    debug!(field = name, variable, "nil pointer, field left untouched");
                    return Ok(());
                }
                other => {
                    trace!(field = name, variable, %kind, "decoding field");
                    return decode(name, variable, &value, other);
                }
            };
        }
        Err(BindError::unparsable_type(name))
    }

    /// Follow an un-annotated field through pointers into a nested record.
    fn descend(&self, name: &str, target: Target<'_>) -> Result<(), BindError> {
        let mut target = target;
        for _ in 0..=MAX_POINTER_DEPTH {
            target = match target {
                Target::Pointer(Some(inner)) => *inner,
                Target::Record(record) => {
                    return self.bind_record(record).map_err(|e| e.nested(name));
                }
                _ => {
                    trace!(field = name, "no env annotation, field skipped");
                    return Ok(());
                }
            };
        }
        Err(BindError::unparsable_type(name))
    }
}

fn decode(name: &str, variable: &str, value: &str, target: Target<'_>) -> Result<(), BindError> {
    match target {
        Target::Scalar(scalar) => {
            decode_scalar(scalar, value).map_err(|e| BindError::parse_error(name, variable, e))
        }
        Target::Array(elements) | Target::List(elements) => {
            decode_elements(name, variable, value, elements)
        }
        Target::Custom(_) | Target::Record(_) | Target::Pointer(_) | Target::Unsupported => {
            Err(BindError::unparsable_type(name))
        }
    }
}

fn decode_scalar(scalar: Scalar<'_>, text: &str) -> Result<(), LiteralError> {
    match scalar {
        Scalar::Bool(slot) => *slot = parse::parse_bool(text)?,
        Scalar::String(slot) => text.clone_into(slot),
        Scalar::Int(slot) => {
            let value = parse::parse_int(text, slot.bits())?;
            slot.store(value)
                .map_err(|_| LiteralError::range("integer", text))?;
        }
        Scalar::Uint(slot) => {
            let value = parse::parse_uint(text, slot.bits())?;
            slot.store(value)
                .map_err(|_| LiteralError::range("integer", text))?;
        }
        Scalar::Float(slot) => {
            let value = parse::parse_float(text, slot.bits())?;
            slot.store(value);
        }
        Scalar::Duration(slot) => *slot = parse::parse_std_duration(text)?,
        Scalar::TimeDelta(slot) => *slot = parse::parse_time_delta(text)?,
    }
    Ok(())
}

/// Split `value` on commas and decode each part into an element.
///
/// There is no quoting: an element can never contain a comma.
fn decode_elements(
    name: &str,
    variable: &str,
    value: &str,
    elements: &mut dyn Elements,
) -> Result<(), BindError> {
    if !elements.element_kind().is_element() {
        return Err(BindError::unparsable_type(name));
    }

    let parts: Vec<&str> = value.split(',').collect();
    elements.assign(&parts, &mut |target, part| match target {
        Target::Custom(decoder) => decoder
            .decode_text(part)
            .map_err(|e| BindError::parse_error(name, variable, format!("{e:#}"))),
        Target::Scalar(scalar) => {
            decode_scalar(scalar, part).map_err(|e| BindError::parse_error(name, variable, e))
        }
        _ => Err(BindError::unparsable_type(name)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{text_field, EnvBind, TextDecode};
    use chrono::TimeDelta;
    use std::collections::HashMap;
    use std::net::IpAddr;
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> Binder<HashMap<String, String>> {
        Binder::with_env(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[derive(Debug, Default, PartialEq)]
    struct Seven(u8);

    impl TextDecode for Seven {
        fn decode_text(&mut self, _text: &str) -> anyhow::Result<()> {
            self.0 = 7;
            Ok(())
        }
    }

    text_field!(Seven);

    #[derive(Debug, Default, EnvBind)]
    struct Scalars {
        #[env(name = "B")]
        pub b: bool,
        #[env(name = "S")]
        pub s: String,
        #[env(name = "I8")]
        pub i8: i8,
        #[env(name = "U16")]
        pub u16: u16,
        #[env(name = "F32")]
        pub f32: f32,
        #[env(name = "D")]
        pub d: Duration,
    }

    #[test]
    fn test_bind_scalars() {
        let binder = env(&[
            ("B", "true"),
            ("S", "text"),
            ("I8", "-123"),
            ("U16", "0xFFFF"),
            ("F32", "2.5"),
            ("D", "1m30s"),
        ]);
        let mut record = Scalars::default();
        binder.bind(&mut record).unwrap();

        assert!(record.b);
        assert_eq!(record.s, "text");
        assert_eq!(record.i8, -123);
        assert_eq!(record.u16, u16::MAX);
        assert_eq!(record.f32, 2.5);
        assert_eq!(record.d, Duration::from_secs(90));
    }

    #[test]
    fn test_unset_variables_leave_fields() {
        let mut record = Scalars {
            b: true,
            s: "keep".to_string(),
            i8: 5,
            ..Scalars::default()
        };
        env(&[]).bind(&mut record).unwrap();

        assert!(record.b);
        assert_eq!(record.s, "keep");
        assert_eq!(record.i8, 5);
    }

    #[test]
    fn test_not_a_record() {
        let mut flag = true;
        assert!(matches!(env(&[]).bind(&mut flag), Err(BindError::NotARecord)));

        let mut list = vec![1u8];
        assert!(matches!(env(&[]).bind(&mut list), Err(BindError::NotARecord)));
    }

    #[test]
    fn test_boxed_record_is_not_a_record() {
        let mut record = Box::new(Scalars::default());
        let result = env(&[("I8", "1")]).bind(&mut record);
        assert!(matches!(result, Err(BindError::NotARecord)));
        env(&[("I8", "1")]).bind(&mut *record).unwrap();
        assert_eq!(record.i8, 1);
    }

    #[derive(Debug, Default, EnvBind)]
    struct Pointers {
        #[env(name = "P")]
        pub one: Option<u8>,
        #[env(name = "P")]
        pub three: Option<Box<Option<u8>>>,
        #[env(name = "P")]
        pub nil: Option<u8>,
        #[env(name = "P")]
        pub custom: Option<Box<Seven>>,
    }

    #[test]
    fn test_pointer_unwrapping() {
        let mut record = Pointers {
            one: Some(1),
            three: Some(Box::new(Some(3))),
            nil: None,
            custom: Some(Box::new(Seven(0))),
        };
        env(&[("P", "42")]).bind(&mut record).unwrap();

        assert_eq!(record.one, Some(42));
        assert_eq!(record.three, Some(Box::new(Some(42))));
        assert_eq!(record.nil, None);
        assert_eq!(record.custom, Some(Box::new(Seven(7))));
    }

    #[test]
    fn test_inner_nil_pointer_is_skipped() {
        let mut record = Pointers {
            three: Some(Box::new(None)),
            ..Pointers::default()
        };
        env(&[("P", "42")]).bind(&mut record).unwrap();
        assert_eq!(record.three, Some(Box::new(None)));
    }

    #[derive(Debug, Default, EnvBind)]
    struct Lists {
        #[env(name = "L")]
        pub list: Vec<i64>,
        #[env(name = "A")]
        pub array: [u8; 3],
        #[env(name = "C")]
        pub customs: Vec<Seven>,
    }

    #[test]
    fn test_lists_and_arrays() {
        let mut record = Lists {
            list: vec![9, 9, 9, 9],
            array: [1, 2, 3],
            customs: Vec::new(),
        };
        env(&[("L", "1,-2,0x3"), ("A", "7,8"), ("C", "x,y")])
            .bind(&mut record)
            .unwrap();

        assert_eq!(record.list, vec![1, -2, 3]);
        assert_eq!(record.array, [7, 8, 3]);
        assert_eq!(record.customs, vec![Seven(7), Seven(7)]);
    }

    #[test]
    fn test_array_truncates_and_keeps_partial_writes() {
        let mut record = Lists::default();
        env(&[("A", "1,2,3,4,5")]).bind(&mut record).unwrap();
        assert_eq!(record.array, [1, 2, 3]);

        let mut record = Lists {
            array: [0, 0, 0],
            ..Lists::default()
        };
        let result = env(&[("A", "4,bad,6")]).bind(&mut record);
        assert!(matches!(result, Err(BindError::Parse { .. })));
        assert_eq!(record.array, [4, 0, 0]);
    }

    #[test]
    fn test_list_failure_keeps_previous_list() {
        let mut record = Lists {
            list: vec![5],
            ..Lists::default()
        };
        let result = env(&[("L", "1,x")]).bind(&mut record);
        assert!(matches!(result, Err(BindError::Parse { ref variable, .. }) if variable == "L"));
        assert_eq!(record.list, vec![5]);
    }

    #[derive(Debug, Default, EnvBind)]
    struct Unparsable {
        #[env(name = "U")]
        pub nested: Vec<Vec<u8>>,
    }

    #[test]
    fn test_nested_collections_are_unparsable() {
        let mut record = Unparsable::default();
        let result = env(&[("U", "1,2")]).bind(&mut record);
        assert!(matches!(result, Err(BindError::UnparsableType { ref field }) if field == "nested"));
        assert!(record.nested.is_empty());
    }

    #[derive(Debug, Default, EnvBind)]
    struct Outer {
        pub inner: Scalars,
        pub boxed: Option<Box<Scalars>>,
    }

    #[test]
    fn test_nested_failure_is_retagged() {
        let mut record = Outer::default();
        let err = env(&[("I8", "999")]).bind(&mut record).unwrap_err();
        match err {
            BindError::Parse {
                field, variable, ..
            } => {
                assert_eq!(field, "inner");
                assert_eq!(variable, "I8");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_through_pointer() {
        let mut record = Outer {
            boxed: Some(Box::default()),
            ..Outer::default()
        };
        env(&[("S", "deep")]).bind(&mut record).unwrap();
        assert_eq!(record.inner.s, "deep");
        assert_eq!(record.boxed.map(|b| b.s), Some("deep".to_string()));
    }

    #[derive(Debug, EnvBind)]
    struct Signed {
        #[env(name = "D")]
        pub delta: TimeDelta,
        #[env(name = "DS")]
        pub deltas: Vec<TimeDelta>,
        #[env(name = "D")]
        pub unsigned: Option<Duration>,
    }

    #[test]
    fn test_negative_durations() {
        let mut record = Signed {
            delta: TimeDelta::zero(),
            deltas: Vec::new(),
            unsigned: None,
        };
        env(&[("D", "-1h2m3s4ms5us6ns"), ("DS", "-90m,3h")])
            .bind(&mut record)
            .unwrap();

        let expected = -(TimeDelta::hours(1)
            + TimeDelta::minutes(2)
            + TimeDelta::seconds(3)
            + TimeDelta::milliseconds(4)
            + TimeDelta::microseconds(5)
            + TimeDelta::nanoseconds(6));
        assert_eq!(record.delta, expected);
        assert_eq!(
            record.deltas,
            vec![TimeDelta::minutes(-90), TimeDelta::hours(3)]
        );

        record.unsigned = Some(Duration::ZERO);
        let result = env(&[("D", "-1s")]).bind(&mut record);
        assert!(matches!(result, Err(BindError::Parse { ref field, .. }) if field == "unsigned"));
        assert_eq!(record.delta, TimeDelta::seconds(-1));
        assert_eq!(record.unsigned, Some(Duration::ZERO));
    }

    #[derive(Debug, Default, EnvBind)]
    struct Addresses {
        #[env(name = "IPS")]
        pub ips: Vec<IpAddr>,
    }

    #[test]
    fn test_list_of_builtin_decoders() {
        let mut record = Addresses::default();
        env(&[("IPS", "10.0.0.1,::1")]).bind(&mut record).unwrap();
        assert_eq!(
            record.ips,
            vec![
                IpAddr::from([10, 0, 0, 1]),
                IpAddr::from([0u16, 0, 0, 0, 0, 0, 0, 1])
            ]
        );

        let result = env(&[("IPS", "10.0.0.2,nope")]).bind(&mut record);
        assert!(matches!(result, Err(BindError::Parse { .. })));
        assert_eq!(record.ips.len(), 2);
    }

    type Box4<T> = Box<Box<Box<Box<T>>>>;
    type Box16<T> = Box4<Box4<Box4<Box4<T>>>>;

    #[derive(Debug, Default, EnvBind)]
    struct Leaf {
        #[env(name = "P")]
        pub v: u8,
    }

    #[derive(Debug, Default, EnvBind)]
    struct DeepestAllowed {
        #[env(name = "P")]
        pub value: Box16<u8>,
        pub record: Box16<Leaf>,
    }

    #[derive(Debug, Default, EnvBind)]
    struct TooDeepValue {
        #[env(name = "P")]
        pub value: Box<Box16<u8>>,
    }

    #[derive(Debug, Default, EnvBind)]
    struct TooDeepRecord {
        pub record: Box<Box16<Leaf>>,
    }

    #[test]
    fn test_pointer_depth_limit_is_reachable() {
        let mut record = DeepestAllowed::default();
        env(&[("P", "9")]).bind(&mut record).unwrap();
        assert_eq!(****************record.value, 9);
        assert_eq!(record.record.v, 9);
    }

    #[test]
    fn test_pointer_depth_limit_exceeded() {
        let binder = env(&[("P", "9")]);

        let mut value = TooDeepValue::default();
        let result = binder.bind(&mut value);
        assert!(matches!(result, Err(BindError::UnparsableType { ref field }) if field == "value"));
        assert_eq!(*****************value.value, 0);

        let mut record = TooDeepRecord::default();
        let result = binder.bind(&mut record);
        assert!(matches!(result, Err(BindError::UnparsableType { ref field }) if field == "record"));
        assert_eq!(record.record.v, 0);
    }

    #[test]
    fn test_binding_is_idempotent() {
        let binder = env(&[("L", "1,2"), ("A", "3")]);
        let mut record = Lists::default();
        binder.bind(&mut record).unwrap();
        binder.bind(&mut record).unwrap();
        assert_eq!(record.list, vec![1, 2]);
        assert_eq!(record.array, [3, 0, 0]);
    }
}

//! Environment variable sources

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::hash::BuildHasher;

/// A key to string store the binder reads from.
///
/// A variable explicitly set to the empty string exists and yields `""`.
pub trait Environment {
    /// Value of `name`, or `None` if it was never set.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Whether `name` is set, possibly to the empty string.
    fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Value of `name`, or the empty string if it is unset.
    fn get(&self, name: &str) -> String {
        self.lookup(name).unwrap_or_default()
    }
}

/// The process environment.
///
/// Values that are not valid UTF-8 are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }
        env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl Environment for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}

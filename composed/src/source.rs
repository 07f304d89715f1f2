use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/////////////////////////////////////////////////////////////////////////////////////////

/// A read-only source of environment variables consulted when binding
/// [`crate::DeferredValue`]s.
pub trait Environment {
    /// Human-readable source name (used in logs and docs).
    fn name(&self) -> Cow<'static, str>;

    /// Returns the value of a variable or `None` if it is not set.
    fn var(&self, name: &str) -> Option<String>;
}

impl<E> Environment for &E
where
    E: Environment + ?Sized,
{
    fn name(&self) -> Cow<'static, str> {
        (**self).name()
    }

    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Variables of the current process.
///
/// Empty or whitespace-only values are treated as unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn name(&self) -> Cow<'static, str> {
        "<process env>".into()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// In-memory set of variables, handy for tests and for layering values
/// loaded from elsewhere (e.g. a secrets store).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnv {
    fn name(&self) -> Cow<'static, str> {
        "<map env>".into()
    }

    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

impl Environment for BTreeMap<String, String> {
    fn name(&self) -> Cow<'static, str> {
        "<map env>".into()
    }

    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<S: std::hash::BuildHasher> Environment for HashMap<String, String, S> {
    fn name(&self) -> Cow<'static, str> {
        "<map env>".into()
    }

    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

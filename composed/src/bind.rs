use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use crate::Value;
use crate::compose::Staged;
use crate::errors::{BindError, ExtractError};
use crate::settings::Entry;

/////////////////////////////////////////////////////////////////////////////////////////

impl Staged<'_> {
    /// Resolves every remaining entry against the environment.
    ///
    /// Literal and deferred entries are resolved first, computed entries are
    /// evaluated afterwards in name order.
    pub fn bind(self) -> Result<ResolvedConfig, BindError> {
        let (prefix, env, settings) = self.staging.into_parts();

        let mut resolved = ResolvedConfig::default();
        let mut computed = Vec::new();

        for (name, entry) in settings {
            let value = match entry {
                Entry::Literal(value) => value,
                Entry::Deferred(value) => value.resolve(&name, prefix.as_deref(), env)?,
                Entry::Computed(f) => {
                    computed.push((name, f));
                    continue;
                }
                Entry::MustOverride(message) => {
                    return Err(BindError::MustOverride {
                        setting: name,
                        message: message.into_owned(),
                    });
                }
            };

            resolved.values.insert(name, value);
        }

        for (name, f) in computed {
            let value = f(&resolved).map_err(|message| BindError::Computed {
                setting: name.clone(),
                message,
            })?;

            resolved.values.insert(name, value);
        }

        tracing::debug!(
            environment = %env.name(),
            settings = resolved.len(),
            "Bound configuration"
        );

        Ok(resolved)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Immutable result of binding a composition.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: BTreeMap<String, Value>,
}

impl ResolvedConfig {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Deserializes a single setting
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, ExtractError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ExtractError::Missing(name.to_string()))?;

        Ok(T::deserialize(value)?)
    }

    /// Deserializes the whole configuration into a typed struct
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        Ok(serde_json::from_value(self.to_value())?)
    }

    /// Returns value under a dot-separated path, e.g. `DATABASES.default.ENGINE`
    pub fn get_value(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.values.get(segments.next()?)?;

        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        Some(current)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone().into_iter().collect())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values.into_iter().collect())
    }

    /// Reads a string setting wrapped so it does not leak into logs
    #[cfg(feature = "types-secrecy")]
    pub fn secret(&self, name: &str) -> Option<secrecy::SecretString> {
        self.values
            .get(name)
            .and_then(Value::as_str)
            .map(|s| secrecy::SecretString::new(s.into()))
    }
}

impl<'a> IntoIterator for &'a ResolvedConfig {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

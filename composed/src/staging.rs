use crate::Value;
use crate::combine::Combine;
use crate::errors::{BindError, HookError};
use crate::settings::{Entry, ListEditor, MapEditor, Settings};
use crate::source::Environment;
use crate::value::DeferredValue;

/////////////////////////////////////////////////////////////////////////////////////////

/// The configuration under construction, handed to every mutation hook.
///
/// Hooks see settings contributed by all mixins of the composition, not just
/// their own. Deferred values stay unresolved until binding unless they were
/// marked [`DeferredValue::immediate`], in which case they are visible as literals.
pub struct Staging<'e> {
    composition: String,
    env_prefix: Option<String>,
    env: &'e dyn Environment,
    settings: Settings,
}

impl<'e> Staging<'e> {
    pub(crate) fn new(
        composition: impl Into<String>,
        env_prefix: Option<String>,
        env: &'e dyn Environment,
    ) -> Self {
        Self {
            composition: composition.into(),
            env_prefix,
            env,
            settings: Settings::new(),
        }
    }

    /// Name of the composition being built
    pub fn composition(&self) -> &str {
        &self.composition
    }

    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    pub fn environment(&self) -> &'e dyn Environment {
        self.env
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /////////////////////////////////////////////////////////////////////////////////////

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.settings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains(name)
    }

    /// Returns the concrete value of a setting, `None` if absent or not yet bound
    pub fn literal(&self, name: &str) -> Option<&Value> {
        self.settings.get(name).and_then(Entry::as_literal)
    }

    /// Returns `true` only if the setting is a literal `true`
    pub fn flag(&self, name: &str) -> bool {
        self.literal(name) == Some(&Value::Bool(true))
    }

    /// Like [`Self::literal`] but fails if the setting is not available
    pub fn require(&self, name: &str) -> Result<&Value, HookError> {
        match self.settings.get(name) {
            Some(Entry::Literal(v)) => Ok(v),
            Some(_) => Err(HookError::TypeMismatch {
                setting: name.to_string(),
                expected: "a literal value",
            }),
            None => Err(HookError::MissingSetting {
                setting: name.to_string(),
            }),
        }
    }

    /// Installs an entry replacing the previous one. Immediate deferred values
    /// are resolved right away.
    pub fn set(&mut self, name: &str, entry: impl Into<Entry>) -> Result<(), HookError> {
        self.install(name, entry.into())?;
        Ok(())
    }

    pub fn list(&mut self, name: &str) -> Result<ListEditor<'_>, HookError> {
        self.settings.list_mut(name)
    }

    pub fn map(&mut self, name: &str) -> Result<MapEditor<'_>, HookError> {
        self.settings.map_mut(name)
    }

    /// Gives access to a not yet bound value, e.g. to make it required
    pub fn deferred(&mut self, name: &str) -> Result<&mut DeferredValue, HookError> {
        self.settings.deferred_mut(name)
    }

    /// Combines a value with the existing literal according to the strategy
    pub fn combine(
        &mut self,
        name: &str,
        value: impl Into<Value>,
        strategy: Combine,
    ) -> Result<(), HookError> {
        let value = value.into();

        match self.settings.get_mut(name) {
            None => self.settings.insert(name, Entry::Literal(value)),
            Some(Entry::Literal(lhs)) => strategy.apply(lhs, value),
            Some(entry) => match strategy {
                Combine::Replace => *entry = Entry::Literal(value),
                Combine::Keep => {}
                Combine::Merge => {
                    return Err(HookError::TypeMismatch {
                        setting: name.to_string(),
                        expected: "a literal value",
                    });
                }
            },
        }

        Ok(())
    }

    /// Resolves a value against the composition's environment without installing it.
    ///
    /// Useful for hooks that expand one environment variable into several settings.
    pub fn resolve(&self, name: &str, value: &DeferredValue) -> Result<Value, HookError> {
        Ok(value.resolve(name, self.env_prefix.as_deref(), self.env)?)
    }

    /////////////////////////////////////////////////////////////////////////////////////

    pub(crate) fn install(&mut self, name: &str, entry: Entry) -> Result<(), BindError> {
        let entry = match entry {
            Entry::Deferred(value) if value.is_immediate() => {
                let resolved = value.resolve(name, self.env_prefix.as_deref(), self.env)?;
                tracing::debug!(
                    composition = %self.composition,
                    setting = name,
                    "Resolved immediate value"
                );
                Entry::Literal(resolved)
            }
            entry => entry,
        };

        self.settings.insert(name, entry);
        Ok(())
    }

    pub(crate) fn install_all(&mut self, settings: &Settings) -> Result<(), BindError> {
        for (name, entry) in settings.iter() {
            self.install(name, entry.clone())?;
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Option<String>, &'e dyn Environment, Settings) {
        (self.env_prefix, self.env, self.settings)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

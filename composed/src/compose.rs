use std::borrow::Cow;
use std::sync::Arc;

use crate::deprecation::{LEGACY_HOOK_MESSAGE, OnDeprecatedClb, default_deprecation_clb};
use crate::errors::{ComposeError, HookError};
use crate::linearize::linearize;
use crate::mixin::{Declare, HookFn, MixinDef};
use crate::settings::{Entry, Settings};
use crate::source::Environment;
use crate::staging::Staging;

/////////////////////////////////////////////////////////////////////////////////////////

/// The final configuration type assembled from an ordered list of mixins.
///
/// Mixins are listed most-specific first, the same way base classes are.
pub struct Composition {
    name: Cow<'static, str>,
    description: Option<Cow<'static, str>>,
    env_prefix: Option<String>,
    mixins: Vec<Arc<MixinDef>>,
    settings: Settings,
    hook: Option<Arc<HookFn>>,
    on_deprecated: Arc<OnDeprecatedClb>,
}

/////////////////////////////////////////////////////////////////////////////////////////

impl Composition {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            env_prefix: None,
            mixins: Vec::new(),
            settings: Settings::new(),
            hook: None,
            on_deprecated: Arc::new(default_deprecation_clb),
        }
    }

    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Prefix prepended to environment variable names, e.g. `DJANGO` turns
    /// setting `DEBUG` into `DJANGO_DEBUG`
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn with_mixin(mut self, mixin: impl Into<Arc<MixinDef>>) -> Self {
        self.mixins.push(mixin.into());
        self
    }

    pub fn with_mixins<I, M>(mut self, mixins: I) -> Self
    where
        M: Into<Arc<MixinDef>>,
        I: IntoIterator<Item = M>,
    {
        for mixin in mixins {
            self = self.with_mixin(mixin);
        }
        self
    }

    /// Own setting of the composition, overrides declarations of all mixins
    pub fn with_setting(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.settings.insert(name, entry);
        self
    }

    pub fn with_declared<T: Declare>(mut self) -> Self {
        T::declare(&mut self.settings);
        self
    }

    /// Hook that runs after the hooks of all mixins
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Staging<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    pub fn with_deprecation_callback<F>(mut self, clb: F) -> Self
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        self.on_deprecated = Arc::new(clb);
        self
    }

    /////////////////////////////////////////////////////////////////////////////////////

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    pub fn mixins(&self) -> &[Arc<MixinDef>] {
        &self.mixins
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// All contributing mixins, most-specific first
    pub fn precedence_order(&self) -> Result<Vec<Arc<MixinDef>>, ComposeError> {
        linearize(&self.name, &self.mixins)
    }

    /////////////////////////////////////////////////////////////////////////////////////

    /// Runs the mutation phase: folds declared settings and invokes every
    /// mixin hook exactly once, most general mixin first
    pub fn stage<'e>(&self, env: &'e dyn Environment) -> Result<Staged<'e>, ComposeError> {
        let order = self.precedence_order()?;

        tracing::debug!(
            composition = %self.name,
            order = ?order.iter().map(|m| m.name()).collect::<Vec<_>>(),
            "Staging composition"
        );

        // Shadowed declarations are dropped before any immediate value resolves
        let mut declared = Settings::new();
        for mixin in order.iter().rev() {
            declared.merge(mixin.settings());
        }
        declared.merge(&self.settings);

        let mut staging = Staging::new(self.name.clone(), self.env_prefix.clone(), env);
        staging.install_all(&declared)?;

        let suppressed = suppressed_hooks(&order);

        for mixin in order.iter().rev() {
            if suppressed.iter().any(|s| Arc::ptr_eq(s, mixin)) {
                tracing::debug!(
                    mixin = mixin.name(),
                    composition = %self.name,
                    "Skipping hook overridden by a more specific mixin"
                );
                continue;
            }

            let hook = if let Some(hook) = mixin.hook() {
                hook
            } else if let Some(hook) = mixin.legacy_hook() {
                (self.on_deprecated)(mixin.name(), LEGACY_HOOK_MESSAGE);
                hook
            } else {
                tracing::trace!(
                    mixin = mixin.name(),
                    composition = %self.name,
                    "Mixin has no hook"
                );
                continue;
            };

            tracing::debug!(
                mixin = mixin.name(),
                composition = %self.name,
                "Invoking mutation hook"
            );

            hook(&mut staging).map_err(|source| ComposeError::Hook {
                mixin: mixin.name().to_string(),
                source,
            })?;
        }

        if let Some(hook) = &self.hook {
            tracing::debug!(composition = %self.name, "Invoking own hook");

            hook(&mut staging).map_err(|source| ComposeError::Hook {
                mixin: self.name.to_string(),
                source,
            })?;
        }

        Ok(Staged { staging })
    }

    /// Runs both phases producing the final configuration
    pub fn compose(&self, env: &dyn Environment) -> Result<crate::ResolvedConfig, ComposeError> {
        let resolved = self.stage(env)?.bind()?;
        Ok(resolved)
    }

    /// Describes the environment variables the composition consumes
    #[cfg(feature = "gen-markdown")]
    pub fn markdown(&self) -> Result<String, ComposeError> {
        crate::markdown::composition_to_markdown(self)
    }
}

impl std::fmt::Debug for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composition")
            .field("name", &self.name)
            .field("env_prefix", &self.env_prefix)
            .field(
                "mixins",
                &self.mixins.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("settings", &self.settings.names().collect::<Vec<_>>())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

// Ancestors of every overriding mixin that has a hook of its own
fn suppressed_hooks(order: &[Arc<MixinDef>]) -> Vec<Arc<MixinDef>> {
    let mut ret: Vec<Arc<MixinDef>> = Vec::new();

    for mixin in order {
        if !mixin.is_overriding() || !(mixin.has_own_hook() || mixin.has_legacy_hook()) {
            continue;
        }
        for ancestor in mixin.ancestors() {
            if !ret.iter().any(|r| Arc::ptr_eq(r, &ancestor)) {
                ret.push(ancestor);
            }
        }
    }

    ret
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Configuration after all mutation hooks ran, with deferred values still unbound.
pub struct Staged<'e> {
    pub(crate) staging: Staging<'e>,
}

impl<'e> Staged<'e> {
    pub fn settings(&self) -> &Settings {
        self.staging.settings()
    }

    pub fn staging(&self) -> &Staging<'e> {
        &self.staging
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

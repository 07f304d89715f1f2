use std::borrow::Cow;
use std::sync::Arc;

use crate::errors::HookError;
use crate::settings::{Entry, Settings};
use crate::staging::Staging;

/////////////////////////////////////////////////////////////////////////////////////////

/// Mutation hook of a mixin.
pub type HookFn = dyn Fn(&mut Staging<'_>) -> Result<(), HookError> + Send + Sync + 'static;

/////////////////////////////////////////////////////////////////////////////////////////

/// Types that declare a set of settings, usually implemented via
/// `#[derive(composed::Settings)]`.
pub trait Declare {
    fn declare(settings: &mut Settings);
}

/////////////////////////////////////////////////////////////////////////////////////////

/// A reusable unit of configuration.
///
/// A mixin declares setting defaults and may define one mutation hook that is
/// invoked once against the final composition, after the hooks of all more
/// general mixins. Mixins can extend other mixins via [`MixinDef::with_base`];
/// the resulting hierarchy is linearized the same way multiple inheritance is.
///
/// Mixins are identified by name. They are immutable once wrapped into an [`Arc`]
/// and can be shared between any number of compositions.
pub struct MixinDef {
    name: Cow<'static, str>,
    description: Option<Cow<'static, str>>,
    bases: Vec<Arc<MixinDef>>,
    settings: Settings,
    hook: Option<Arc<HookFn>>,
    legacy_hook: Option<Arc<HookFn>>,
    overriding: bool,
}

impl MixinDef {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            bases: Vec::new(),
            settings: Settings::new(),
            hook: None,
            legacy_hook: None,
            overriding: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a mixin this one extends. Bases are listed most-specific first.
    pub fn with_base(mut self, base: impl Into<Arc<MixinDef>>) -> Self {
        self.bases.push(base.into());
        self
    }

    pub fn with_setting(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.settings.insert(name, entry);
        self
    }

    /// Adds all settings declared by `T`
    pub fn declared<T: Declare>(mut self) -> Self {
        T::declare(&mut self.settings);
        self
    }

    /// Defines the mutation hook of this mixin
    pub fn with_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Staging<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Defines the hook under its deprecated name. It still runs, but every
    /// composition using this mixin reports a deprecation warning.
    #[deprecated(note = "register the hook with `with_hook` instead")]
    pub fn with_legacy_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Staging<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.legacy_hook = Some(Arc::new(hook));
        self
    }

    /// Marks the hook of this mixin as replacing the hooks of all its bases,
    /// which will then not run in any composition that includes this mixin.
    pub fn overriding(mut self) -> Self {
        self.overriding = true;
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /////////////////////////////////////////////////////////////////////////////////////

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn bases(&self) -> &[Arc<MixinDef>] {
        &self.bases
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether this exact mixin defines a hook (inherited ones don't count)
    pub fn has_own_hook(&self) -> bool {
        self.hook.is_some()
    }

    pub fn has_legacy_hook(&self) -> bool {
        self.legacy_hook.is_some()
    }

    pub fn is_overriding(&self) -> bool {
        self.overriding
    }

    pub(crate) fn hook(&self) -> Option<&Arc<HookFn>> {
        self.hook.as_ref()
    }

    pub(crate) fn legacy_hook(&self) -> Option<&Arc<HookFn>> {
        self.legacy_hook.as_ref()
    }

    /// All transitive bases of this mixin, excluding itself
    pub(crate) fn ancestors(&self) -> Vec<Arc<MixinDef>> {
        let mut ret: Vec<Arc<MixinDef>> = Vec::new();
        let mut stack: Vec<Arc<MixinDef>> = self.bases.iter().rev().cloned().collect();

        while let Some(m) = stack.pop() {
            if ret.iter().any(|r| Arc::ptr_eq(r, &m)) {
                continue;
            }
            stack.extend(m.bases.iter().rev().cloned());
            ret.push(m);
        }

        ret
    }
}

impl std::fmt::Debug for MixinDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixinDef")
            .field("name", &self.name)
            .field(
                "bases",
                &self.bases.iter().map(|b| b.name()).collect::<Vec<_>>(),
            )
            .field("settings", &self.settings.names().collect::<Vec<_>>())
            .field("hook", &self.hook.is_some())
            .field("legacy_hook", &self.legacy_hook.is_some())
            .field("overriding", &self.overriding)
            .finish()
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

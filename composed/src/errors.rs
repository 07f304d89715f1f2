/////////////////////////////////////////////////////////////////////////////////////////

/// Error returned when a setting cannot be resolved during the binding phase.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    /// A required value has no environment source
    #[error("Setting `{setting}` is required but environment variable `{variable}` is not set")]
    MissingRequiredValue { setting: String, variable: String },

    /// A placeholder declared by a mixin was never replaced by a downstream composition
    #[error("Setting `{setting}` must be explicitly set: {message}")]
    MustOverride { setting: String, message: String },

    /// Environment value cannot be coerced to the declared kind
    #[error(
        "Environment variable `{variable}` of setting `{setting}` is not {expected}: {message}"
    )]
    InvalidFormat {
        setting: String,
        variable: String,
        expected: &'static str,
        message: String,
    },

    /// A computed setting failed to evaluate
    #[error("Failed to compute setting `{setting}`: {message}")]
    Computed { setting: String, message: String },

    /// An edit recorded against a deferred list refers to an entry the bound list lacks
    #[error("Entry `{anchor}` is absent from `{setting}`")]
    OrderingViolation { setting: String, anchor: String },
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Error returned by a mutation hook.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HookError {
    /// An entry the hook expected a preceding mixin to contribute is absent
    #[error("Entry `{anchor}` is absent from `{setting}`")]
    OrderingViolation { setting: String, anchor: String },

    /// A setting exists but has an unexpected shape
    #[error("Setting `{setting}` is expected to be {expected}")]
    TypeMismatch {
        setting: String,
        expected: &'static str,
    },

    /// A setting the hook depends on was never declared
    #[error("Setting `{setting}` is not declared")]
    MissingSetting { setting: String },

    /// Value resolved synchronously inside the hook failed to bind
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error("{0}")]
    Other(String),
}

impl HookError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Error returned when composing the final configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposeError {
    /// A mutation hook failed, composition was aborted
    #[error("Mixin `{mixin}` failed to mutate the configuration: {source}")]
    Hook {
        mixin: String,
        #[source]
        source: HookError,
    },

    /// Mixin hierarchy has no consistent precedence order
    #[error("Cannot linearize mixins of `{composition}`: {message}")]
    Linearization {
        composition: String,
        message: String,
    },

    /// Two distinct mixin definitions share a name
    #[error("Different mixins share the name `{name}`")]
    ConflictingMixin { name: String },

    #[error(transparent)]
    Bind(#[from] BindError),
}

impl ComposeError {
    /// Name of the mixin whose hook failed, if any
    pub fn mixin(&self) -> Option<&str> {
        match self {
            Self::Hook { mixin, .. } => Some(mixin),
            _ => None,
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Error returned when reading typed values out of a [`crate::ResolvedConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Setting `{0}` is not present")]
    Missing(String),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/////////////////////////////////////////////////////////////////////////////////////////

use crate::Value;
use crate::errors::BindError;
use crate::format::Structured;
use crate::settings::ListEdit;
use crate::source::Environment;
use crate::types;

/////////////////////////////////////////////////////////////////////////////////////////

/// Shape an environment string is coerced into.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    String,
    Bool,
    Integer,
    Float,
    /// Comma-separated list of strings
    List,
    /// URL broken into [`types::UrlParts`]
    Url,
    /// String that must come from the environment, defaults are never used
    Secret,
    Email,
    /// Filesystem path, `~` is expanded
    Path,
    /// Path that must be a directory if it exists
    Directory { ensure_exists: bool },
    /// Value written in a structured format like JSON or YAML
    Structured(Structured),
}

impl Kind {
    pub fn json() -> Self {
        Self::Structured(Structured::of::<crate::format::Json>())
    }

    #[cfg(feature = "fmt-yaml")]
    pub fn yaml() -> Self {
        Self::Structured(Structured::of::<crate::format::Yaml>())
    }

    #[cfg(feature = "fmt-toml")]
    pub fn toml() -> Self {
        Self::Structured(Structured::of::<crate::format::Toml>())
    }

    /// Short name used in generated documentation
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::List => "list",
            Self::Url => "url",
            Self::Secret => "secret",
            Self::Email => "email",
            Self::Path => "path",
            Self::Directory { .. } => "directory",
            Self::Structured(fmt) => fmt.name(),
        }
    }

    /// Description used in error messages
    pub fn expected(&self) -> &'static str {
        match self {
            Self::String | Self::Secret => "a string",
            Self::Bool => "a boolean",
            Self::Integer => "an integer",
            Self::Float => "a number",
            Self::List => "a comma-separated list",
            Self::Url => "a URL",
            Self::Email => "an email address",
            Self::Path => "a path",
            Self::Directory { .. } => "a directory path",
            Self::Structured(_) => "a structured value",
        }
    }

    pub(crate) fn coerce(&self, raw: &str, env: &dyn Environment) -> Result<Value, String> {
        match self {
            Self::String | Self::Secret => Ok(Value::String(raw.to_string())),
            Self::Bool => types::parse_bool(raw).map(Value::Bool),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| e.to_string()),
            Self::Float => {
                let f = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("`{f}` is not a finite number"))
            }
            Self::List => Ok(types::parse_list(raw).into()),
            Self::Url => types::UrlParts::parse(raw)
                .map(|parts| parts.to_value())
                .map_err(|e| e.to_string()),
            Self::Email => types::parse_email(raw).map(Value::String),
            Self::Path => {
                let path = types::expand_home(raw, env);
                Ok(Value::String(path.to_string_lossy().into_owned()))
            }
            Self::Directory { ensure_exists } => {
                let path = types::expand_home(raw, env);
                types::check_directory(&path, *ensure_exists)?;
                Ok(Value::String(path.to_string_lossy().into_owned()))
            }
            Self::Structured(fmt) => fmt.parse(raw),
        }
    }

    /// Whether a bound value can be a list that hooks append to
    pub fn holds_list(&self) -> bool {
        matches!(self, Self::List | Self::Structured(_))
    }

    // Path-like defaults go through the same checks as environment values
    fn applies_to_default(&self) -> bool {
        matches!(self, Self::Path | Self::Directory { .. })
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Controls which prefix is prepended to the environment variable name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Prefix {
    /// Use the prefix configured on the composition
    #[default]
    Inherit,
    /// Use the bare variable name
    Disabled,
    Custom(String),
}

/////////////////////////////////////////////////////////////////////////////////////////

/// A setting value that is computed from the environment only when the
/// configuration is bound.
///
/// Until then it can be replaced or adjusted by mutation hooks of other mixins.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredValue {
    kind: Kind,
    default: Option<Value>,
    env_name: Option<String>,
    prefix: Prefix,
    required: bool,
    immediate: bool,
    list_edits: Vec<ListEdit>,
}

impl DeferredValue {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            default: None,
            env_name: None,
            prefix: Prefix::Inherit,
            required: false,
            immediate: false,
            list_edits: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(Kind::String)
    }

    pub fn bool() -> Self {
        Self::new(Kind::Bool)
    }

    pub fn integer() -> Self {
        Self::new(Kind::Integer)
    }

    pub fn float() -> Self {
        Self::new(Kind::Float)
    }

    pub fn list() -> Self {
        Self::new(Kind::List)
    }

    pub fn url() -> Self {
        Self::new(Kind::Url)
    }

    pub fn secret() -> Self {
        Self::new(Kind::Secret)
    }

    pub fn email() -> Self {
        Self::new(Kind::Email)
    }

    pub fn path() -> Self {
        Self::new(Kind::Path)
    }

    pub fn directory(ensure_exists: bool) -> Self {
        Self::new(Kind::Directory { ensure_exists })
    }

    pub fn json() -> Self {
        Self::new(Kind::json())
    }

    #[cfg(feature = "fmt-yaml")]
    pub fn yaml() -> Self {
        Self::new(Kind::yaml())
    }

    #[cfg(feature = "fmt-toml")]
    pub fn toml() -> Self {
        Self::new(Kind::toml())
    }

    /// Value used when the environment variable is not set
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Read from the specified variable name instead of the setting name
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env_name = Some(name.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Prefix::Custom(prefix.into());
        self
    }

    pub fn no_prefix(mut self) -> Self {
        self.prefix = Prefix::Disabled;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Resolve as soon as the value is installed into the configuration, making
    /// the concrete value visible to mutation hooks
    pub fn immediate(mut self) -> Self {
        self.immediate = true;
        self
    }

    /////////////////////////////////////////////////////////////////////////////////////

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_default(&mut self, value: impl Into<Value>) {
        self.default = Some(value.into());
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn env_name(&self) -> Option<&str> {
        self.env_name.as_deref()
    }

    pub fn prefix_policy(&self) -> &Prefix {
        &self.prefix
    }

    /// Whether binding fails when the environment does not supply a value
    pub fn is_required(&self) -> bool {
        self.required || self.kind == Kind::Secret
    }

    pub fn is_immediate(&self) -> bool {
        self.immediate
    }

    /// Edits hooks made to the list before it was bound
    pub fn list_edits(&self) -> &[ListEdit] {
        &self.list_edits
    }

    pub(crate) fn list_edits_mut(&mut self) -> &mut Vec<ListEdit> {
        &mut self.list_edits
    }

    /////////////////////////////////////////////////////////////////////////////////////

    /// Name of the environment variable this value is read from when installed
    /// under `setting` in a composition using `default_prefix`.
    pub fn variable_name(&self, setting: &str, default_prefix: Option<&str>) -> String {
        let name = self.env_name.as_deref().unwrap_or(setting);

        let prefix = match &self.prefix {
            Prefix::Inherit => default_prefix,
            Prefix::Disabled => None,
            Prefix::Custom(p) => Some(p.as_str()),
        };

        match prefix {
            Some(p) if !p.is_empty() => format!("{p}_{name}"),
            _ => name.to_string(),
        }
    }

    /// Resolves the concrete value and replays the recorded list edits on it.
    ///
    /// Does not modify any state, so the same environment always produces the same result.
    pub fn resolve(
        &self,
        setting: &str,
        default_prefix: Option<&str>,
        env: &dyn Environment,
    ) -> Result<Value, BindError> {
        let variable = self.variable_name(setting, default_prefix);
        let value = self.resolve_raw(setting, &variable, env)?;

        if self.list_edits.is_empty() {
            return Ok(value);
        }

        let mut items = match value {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                return Err(BindError::InvalidFormat {
                    setting: setting.to_string(),
                    variable,
                    expected: "a list",
                    message: format!("cannot add entries to `{other}`"),
                });
            }
        };

        for edit in &self.list_edits {
            edit.clone()
                .apply(&mut items)
                .map_err(|anchor| BindError::OrderingViolation {
                    setting: setting.to_string(),
                    anchor,
                })?;
        }

        Ok(Value::Array(items))
    }

    fn resolve_raw(
        &self,
        setting: &str,
        variable: &str,
        env: &dyn Environment,
    ) -> Result<Value, BindError> {
        let invalid = |message: String| BindError::InvalidFormat {
            setting: setting.to_string(),
            variable: variable.to_string(),
            expected: self.kind.expected(),
            message,
        };

        if let Some(raw) = env.var(variable) {
            tracing::trace!(setting, variable, "Binding value from environment");
            return self.kind.coerce(&raw, env).map_err(invalid);
        }

        if self.is_required() {
            return Err(BindError::MissingRequiredValue {
                setting: setting.to_string(),
                variable: variable.to_string(),
            });
        }

        match &self.default {
            Some(Value::String(s)) if self.kind.applies_to_default() => {
                self.kind.coerce(s, env).map_err(invalid)
            }
            Some(value) => Ok(value.clone()),
            None => Ok(Value::Null),
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

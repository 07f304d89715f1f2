use crate::Value;

/////////////////////////////////////////////////////////////////////////////////////////

/// A text format that structured environment values can be written in.
pub trait Format {
    type ErrorDe: std::error::Error + 'static;

    fn name() -> &'static str;

    fn deserialize<T: serde::de::DeserializeOwned>(string: &str) -> Result<T, Self::ErrorDe>;
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Type-erased parser of a [`Format`], stored inside [`crate::Kind::Structured`].
#[derive(Clone, Copy)]
pub struct Structured {
    name: &'static str,
    parse: fn(&str) -> Result<Value, String>,
}

impl Structured {
    pub fn of<Fmt: Format>() -> Self {
        Self {
            name: Fmt::name(),
            parse: parse_with::<Fmt>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parse(&self, s: &str) -> Result<Value, String> {
        (self.parse)(s)
    }
}

impl std::fmt::Debug for Structured {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Structured").field(&self.name).finish()
    }
}

impl PartialEq for Structured {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

fn parse_with<Fmt: Format>(s: &str) -> Result<Value, String> {
    Fmt::deserialize(s).map_err(|e| e.to_string())
}

/////////////////////////////////////////////////////////////////////////////////////////

pub struct Json;

impl Format for Json {
    type ErrorDe = serde_json::Error;

    fn name() -> &'static str {
        "json"
    }

    fn deserialize<T: serde::de::DeserializeOwned>(string: &str) -> Result<T, Self::ErrorDe> {
        serde_json::from_str(string)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

#[cfg(feature = "fmt-yaml")]
pub struct Yaml;

#[cfg(feature = "fmt-yaml")]
impl Format for Yaml {
    type ErrorDe = serde_yaml::Error;

    fn name() -> &'static str {
        "yaml"
    }

    fn deserialize<T: serde::de::DeserializeOwned>(string: &str) -> Result<T, Self::ErrorDe> {
        serde_yaml::from_str(string)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

#[cfg(feature = "fmt-toml")]
pub struct Toml;

#[cfg(feature = "fmt-toml")]
impl Format for Toml {
    type ErrorDe = toml::de::Error;

    fn name() -> &'static str {
        "toml"
    }

    fn deserialize<T: serde::de::DeserializeOwned>(string: &str) -> Result<T, Self::ErrorDe> {
        toml::from_str(string)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

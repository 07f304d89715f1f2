use composed::format::{Format, Json};
use composed::source::MapEnv;
use composed::{BindError, DeferredValue};
use serde_json::json;

/////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_json() {
    let value: serde_json::Value = Json::deserialize(r#"{"a": [1, 2]}"#).unwrap();
    pretty_assertions::assert_eq!(value, json!({"a": [1, 2]}));
    pretty_assertions::assert_eq!(Json::name(), "json");
}

#[cfg(feature = "fmt-yaml")]
#[test]
fn test_yaml_value() {
    let env = MapEnv::new().with_var(
        "CACHES",
        indoc::indoc!(
            r#"
            default:
              BACKEND: redis
              LOCATION: redis://cache:6379/1
              TIMEOUT: 300
            "#
        ),
    );

    let value = DeferredValue::yaml().resolve("CACHES", None, &env).unwrap();

    pretty_assertions::assert_eq!(
        value,
        json!({
            "default": {
                "BACKEND": "redis",
                "LOCATION": "redis://cache:6379/1",
                "TIMEOUT": 300,
            }
        })
    );

    let env = MapEnv::new().with_var("CACHES", "default: [unclosed");
    assert!(matches!(
        DeferredValue::yaml().resolve("CACHES", None, &env),
        Err(BindError::InvalidFormat { .. })
    ));
}

#[cfg(feature = "fmt-toml")]
#[test]
fn test_toml_value() {
    let env = MapEnv::new().with_var(
        "DATABASES",
        indoc::indoc!(
            r#"
            [default]
            ENGINE = "postgresql"
            PORT = 5432
            "#
        ),
    );

    let value = DeferredValue::toml().resolve("DATABASES", None, &env).unwrap();

    pretty_assertions::assert_eq!(
        value,
        json!({"default": {"ENGINE": "postgresql", "PORT": 5432}})
    );
}

/////////////////////////////////////////////////////////////////////////////////////////

use std::collections::{BTreeMap, HashMap};

use composed::source::{MapEnv, ProcessEnv};
use composed::{Composition, DeferredValue, Environment};
use serde_json::json;

/////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_process_env() {
    let _a = set_env_var("COMPOSED_TEST_PORT", "8000");
    let _b = set_env_var("COMPOSED_TEST_BLANK", "  ");

    pretty_assertions::assert_eq!(ProcessEnv.var("COMPOSED_TEST_PORT"), Some("8000".to_string()));
    pretty_assertions::assert_eq!(ProcessEnv.var("COMPOSED_TEST_BLANK"), None);
    pretty_assertions::assert_eq!(ProcessEnv.var("COMPOSED_TEST_UNSET"), None);

    let cfg = Composition::new("X")
        .with_env_prefix("COMPOSED_TEST")
        .with_setting("PORT", DeferredValue::integer())
        .with_setting("BLANK", DeferredValue::string().default("fallback"))
        .compose(&ProcessEnv)
        .unwrap();

    pretty_assertions::assert_eq!(cfg.get("PORT"), Some(&json!(8000)));
    pretty_assertions::assert_eq!(cfg.get("BLANK"), Some(&json!("fallback")));
}

#[test]
fn test_map_envs() {
    let comp = Composition::new("X").with_setting("NAME", DeferredValue::string());

    let map_env: MapEnv = [("NAME", "map")].into_iter().collect();
    pretty_assertions::assert_eq!(map_env.len(), 1);
    pretty_assertions::assert_eq!(comp.compose(&map_env).unwrap().get("NAME"), Some(&json!("map")));

    let hash_env: HashMap<String, String> = [("NAME".to_string(), "hash".to_string())].into();
    pretty_assertions::assert_eq!(comp.compose(&hash_env).unwrap().get("NAME"), Some(&json!("hash")));

    let btree_env: BTreeMap<String, String> = [("NAME".to_string(), "btree".to_string())].into();
    pretty_assertions::assert_eq!(comp.compose(&btree_env).unwrap().get("NAME"), Some(&json!("btree")));

    // Unlike the process environment, explicit maps keep empty values
    let empty = MapEnv::new().with_var("NAME", "");
    pretty_assertions::assert_eq!(comp.compose(&empty).unwrap().get("NAME"), Some(&json!("")));
}

/////////////////////////////////////////////////////////////////////////////////////////

fn set_env_var(k: &'static str, v: &'static str) -> Unset {
    let unset = Unset(k);
    unsafe {
        std::env::set_var(k, v);
    }
    unset
}

#[must_use]
struct Unset(&'static str);

impl Drop for Unset {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var(self.0);
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

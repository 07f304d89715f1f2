use std::sync::{Arc, Mutex};

use composed::source::MapEnv;
use composed::{ComposeError, Composition, DeferredValue, HookError, MixinDef};
use serde_json::json;

/////////////////////////////////////////////////////////////////////////////////////////

type Log = Arc<Mutex<Vec<String>>>;

fn recording(name: &'static str, log: &Log) -> MixinDef {
    let log = log.clone();
    MixinDef::new(name).with_hook(move |_| {
        log.lock().unwrap().push(name.to_string());
        Ok(())
    })
}

fn invocations(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_hooks_run_in_reverse_precedence_order() {
    let log = Log::default();

    let a = recording("A", &log).into_arc();
    let b = recording("B", &log).with_base(a.clone()).into_arc();
    let c = recording("C", &log).with_base(a.clone()).into_arc();

    let comp = Composition::new("X").with_mixin(b).with_mixin(c);

    let order: Vec<_> = comp
        .precedence_order()
        .unwrap()
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    pretty_assertions::assert_eq!(order, ["B", "C", "A"]);

    comp.compose(&MapEnv::new()).unwrap();

    pretty_assertions::assert_eq!(invocations(&log), ["A", "C", "B"]);
}

#[test]
fn test_inherited_hook_runs_once() {
    let log = Log::default();

    let a = recording("A", &log).into_arc();
    let b = MixinDef::new("B").with_base(a.clone()).into_arc();
    let c = MixinDef::new("C").with_base(a.clone()).into_arc();

    Composition::new("X")
        .with_mixins([b, c, a])
        .compose(&MapEnv::new())
        .unwrap();

    pretty_assertions::assert_eq!(invocations(&log), ["A"]);
}

#[test]
fn test_mixins_without_hooks_are_skipped() {
    let log = Log::default();

    Composition::new("X")
        .with_mixin(recording("Cors", &log))
        .with_mixin(MixinDef::new("Inert").with_setting("DEBUG", false))
        .with_mixin(recording("Foundation", &log))
        .compose(&MapEnv::new())
        .unwrap();

    pretty_assertions::assert_eq!(invocations(&log), ["Foundation", "Cors"]);
}

#[test]
fn test_extending_hook_runs_after_base_hook() {
    let log = Log::default();

    let static_files = recording("StaticFiles", &log).into_arc();
    let whitenoise = recording("Whitenoise", &log).with_base(static_files);

    Composition::new("X")
        .with_mixin(whitenoise)
        .compose(&MapEnv::new())
        .unwrap();

    pretty_assertions::assert_eq!(invocations(&log), ["StaticFiles", "Whitenoise"]);
}

#[test]
fn test_overriding_hook_replaces_base_hook() {
    let log = Log::default();

    let a = recording("A", &log).into_arc();
    let b = recording("B", &log).with_base(a.clone()).overriding().into_arc();
    let other = recording("Other", &log).into_arc();

    Composition::new("X")
        .with_mixin(b)
        .with_mixin(other)
        .compose(&MapEnv::new())
        .unwrap();

    pretty_assertions::assert_eq!(invocations(&log), ["Other", "B"]);
}

#[test]
fn test_own_hook_runs_last() {
    let log = Log::default();
    let own_log = log.clone();

    Composition::new("X")
        .with_mixin(recording("A", &log))
        .with_hook(move |_| {
            own_log.lock().unwrap().push("X".to_string());
            Ok(())
        })
        .compose(&MapEnv::new())
        .unwrap();

    pretty_assertions::assert_eq!(invocations(&log), ["A", "X"]);
}

/////////////////////////////////////////////////////////////////////////////////////////

fn foundation(log: &Log) -> MixinDef {
    let log = log.clone();

    MixinDef::new("Foundation")
        .with_setting("INSTALLED_APPS", json!(["auth", "sessions"]))
        .with_hook(move |cfg| {
            log.lock().unwrap().push("Foundation".to_string());
            cfg.list("MIDDLEWARE")?
                .append("security")
                .append("sessions")
                .append("common");
            Ok(())
        })
}

fn logging(log: &Log) -> MixinDef {
    let log = log.clone();

    MixinDef::new("Logging")
        .with_setting("LOG_LEVEL", DeferredValue::string().default("INFO"))
        .with_hook(move |cfg| {
            log.lock().unwrap().push("Logging".to_string());
            cfg.map("LOGGING")?.insert("version", 1);
            Ok(())
        })
}

fn storage(log: &Log) -> MixinDef {
    let log = log.clone();

    MixinDef::new("Storage")
        .with_setting("STORAGE_BUCKET_NAME", DeferredValue::string().required())
        .with_hook(move |cfg| {
            log.lock().unwrap().push("Storage".to_string());
            cfg.list("MIDDLEWARE")?.insert_after("security", "storage")?;
            cfg.list("INSTALLED_APPS")?.append("storages");
            Ok(())
        })
}

#[test]
fn test_foundation_logging_storage() {
    let log = Log::default();

    let comp = Composition::new("X")
        .with_env_prefix("APP")
        .with_mixin(storage(&log))
        .with_mixin(logging(&log))
        .with_mixin(foundation(&log));

    let env = MapEnv::new().with_var("APP_STORAGE_BUCKET_NAME", "media");
    let cfg = comp.compose(&env).unwrap();

    pretty_assertions::assert_eq!(invocations(&log), ["Foundation", "Logging", "Storage"]);

    pretty_assertions::assert_eq!(
        cfg.into_value(),
        json!({
            "INSTALLED_APPS": ["auth", "sessions", "storages"],
            "LOGGING": {"version": 1},
            "LOG_LEVEL": "INFO",
            "MIDDLEWARE": ["security", "storage", "sessions", "common"],
            "STORAGE_BUCKET_NAME": "media",
        })
    );
}

#[test]
fn test_missing_anchor_aborts_composition() {
    let log = Log::default();

    // Foundation is omitted, so nothing creates the middleware list
    let comp = Composition::new("X")
        .with_mixin(recording("Late", &log))
        .with_mixin(storage(&log))
        .with_mixin(logging(&log));

    let err = comp.stage(&MapEnv::new()).err().unwrap();

    pretty_assertions::assert_eq!(
        err,
        ComposeError::Hook {
            mixin: "Storage".to_string(),
            source: HookError::OrderingViolation {
                setting: "MIDDLEWARE".to_string(),
                anchor: "security".to_string(),
            },
        }
    );
    pretty_assertions::assert_eq!(err.mixin(), Some("Storage"));
    pretty_assertions::assert_eq!(
        err.to_string(),
        "Mixin `Storage` failed to mutate the configuration: Entry `security` is absent from `MIDDLEWARE`"
    );

    // Hooks after the failing one never run
    pretty_assertions::assert_eq!(invocations(&log), ["Logging", "Storage"]);
}

#[test]
fn test_composition_is_deterministic() {
    let env = MapEnv::new().with_var("APP_STORAGE_BUCKET_NAME", "media");

    let build = || {
        let log = Log::default();
        Composition::new("X")
            .with_env_prefix("APP")
            .with_mixin(storage(&log))
            .with_mixin(logging(&log))
            .with_mixin(foundation(&log))
            .compose(&env)
            .unwrap()
    };

    pretty_assertions::assert_eq!(build(), build());
}

/////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_more_specific_defaults_win() {
    let base = MixinDef::new("Base")
        .with_setting("DEBUG", false)
        .with_setting("TIME_ZONE", "UTC")
        .into_arc();

    let dev = MixinDef::new("Dev")
        .with_base(base.clone())
        .with_setting("DEBUG", true);

    let cfg = Composition::new("X")
        .with_mixin(dev)
        .with_setting("TIME_ZONE", "Europe/Berlin")
        .compose(&MapEnv::new())
        .unwrap();

    pretty_assertions::assert_eq!(cfg.get("DEBUG"), Some(&json!(true)));
    pretty_assertions::assert_eq!(cfg.get("TIME_ZONE"), Some(&json!("Europe/Berlin")));
}

#[test]
#[allow(deprecated)]
fn test_legacy_hook_reports_deprecation() {
    let log = Log::default();
    let hook_log = log.clone();
    let warnings = Log::default();
    let clb_warnings = warnings.clone();

    let legacy = MixinDef::new("Legacy").with_legacy_hook(move |cfg| {
        hook_log.lock().unwrap().push("Legacy".to_string());
        cfg.set("LEGACY", true)?;
        Ok(())
    });

    let cfg = Composition::new("X")
        .with_mixin(legacy)
        .with_deprecation_callback(move |mixin, _message| {
            clb_warnings.lock().unwrap().push(mixin.to_string());
        })
        .compose(&MapEnv::new())
        .unwrap();

    pretty_assertions::assert_eq!(invocations(&log), ["Legacy"]);
    pretty_assertions::assert_eq!(invocations(&warnings), ["Legacy"]);
    pretty_assertions::assert_eq!(cfg.get("LEGACY"), Some(&json!(true)));
}

#[test]
#[allow(deprecated)]
fn test_current_hook_shadows_legacy_hook() {
    let log = Log::default();
    let legacy_log = log.clone();
    let warnings = Log::default();
    let clb_warnings = warnings.clone();

    let mixin = recording("Both", &log).with_legacy_hook(move |_| {
        legacy_log.lock().unwrap().push("legacy".to_string());
        Ok(())
    });

    Composition::new("X")
        .with_mixin(mixin)
        .with_deprecation_callback(move |mixin, _| {
            clb_warnings.lock().unwrap().push(mixin.to_string());
        })
        .compose(&MapEnv::new())
        .unwrap();

    pretty_assertions::assert_eq!(invocations(&log), ["Both"]);
    assert!(invocations(&warnings).is_empty());
}

/////////////////////////////////////////////////////////////////////////////////////////

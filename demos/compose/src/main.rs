use composed::source::ProcessEnv;
use composed::{Composition, DeferredValue, Entry, MixinDef};
use serde_json::json;

/////////////////////////////////////////////////////////////////////////////////////////

#[derive(composed::Settings)]
#[allow(dead_code)]
struct FoundationSettings {
    #[setting(kind = "secret")]
    secret_key: String,

    #[setting(default = false, immediate)]
    debug: bool,

    #[setting(default = vec!["localhost"])]
    allowed_hosts: Vec<String>,

    #[setting(default = "UTC")]
    time_zone: String,
}

#[derive(composed::Settings)]
#[allow(dead_code)]
struct StorageSettings {
    #[setting(env = "STORAGE_BUCKET_NAME", default = "media")]
    storage_bucket: String,

    #[setting(default = "~/.cache/demo/media")]
    media_root: std::path::PathBuf,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(dead_code)]
struct Settings {
    debug: bool,
    allowed_hosts: Vec<String>,
    time_zone: String,
    installed_apps: Vec<String>,
    middleware: Vec<String>,
    storage_bucket: String,
    media_root: std::path::PathBuf,
    task_acks_late: bool,
}

/////////////////////////////////////////////////////////////////////////////////////////

fn composition() -> Composition {
    let foundation = MixinDef::new("Foundation")
        .with_description("Secret key, debug mode and the base middleware chain")
        .declared::<FoundationSettings>()
        .with_setting("INSTALLED_APPS", json!(["auth", "sessions"]))
        .with_setting(
            "TASK_ACKS_LATE",
            Entry::computed(|cfg| Ok(json!(cfg.get("DEBUG") != Some(&json!(true))))),
        )
        .with_hook(|cfg| {
            cfg.list("MIDDLEWARE")?
                .append("security")
                .append("sessions")
                .append("common");

            if cfg.flag("DEBUG") {
                cfg.list("INSTALLED_APPS")?.append("debug_toolbar");
            }
            Ok(())
        })
        .into_arc();

    let cors = MixinDef::new("Cors")
        .with_description("Cross-origin request headers")
        .with_base(foundation.clone())
        .with_hook(|cfg| {
            cfg.list("INSTALLED_APPS")?.append("corsheaders");
            cfg.list("MIDDLEWARE")?.insert_before("common", "cors")?;
            Ok(())
        });

    let storage = MixinDef::new("Storage")
        .with_description("Object storage for uploaded media")
        .with_base(foundation.clone())
        .declared::<StorageSettings>()
        .with_hook(|cfg| {
            cfg.list("INSTALLED_APPS")?.append("storages");
            Ok(())
        });

    Composition::new("Demo")
        .with_description("Settings of the demo application")
        .with_env_prefix("DEMO")
        .with_mixin(storage)
        .with_mixin(cors)
}

/////////////////////////////////////////////////////////////////////////////////////////

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let composition = composition();

    if std::env::args().any(|a| a == "--markdown") {
        println!("{}", composition.markdown()?);
        return Ok(());
    }

    let resolved = composition.compose(&ProcessEnv)?;
    let settings: Settings = resolved.extract()?;

    tracing::info!(settings = resolved.len(), "Composed settings");
    eprintln!("Resolved settings:\n{settings:#?}");

    Ok(())
}

/////////////////////////////////////////////////////////////////////////////////////////

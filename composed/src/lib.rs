//! `composed` assembles application settings out of small reusable *mixins*.
//!
//! Each mixin configures one cross-cutting concern (database, storage, CORS,
//! logging, ...) by declaring setting defaults and, optionally, a one-time
//! *mutation hook*. A [`Composition`] combines an ordered list of mixins into
//! the final configuration:
//!
//! 1. The precedence order of all contributing mixins is linearized (C3),
//!    most-specific first, exactly like a class hierarchy would be.
//! 2. Declared settings are folded base-first, so more specific mixins
//!    override the defaults of more general ones.
//! 3. Every mixin that defines its own hook gets it invoked exactly once,
//!    base-first. Hooks see the whole configuration under construction and
//!    may insert middleware, append installed components, or fail when a
//!    prerequisite mixin did not run.
//! 4. Finally all [`DeferredValue`]s are bound against an [`Environment`]
//!    and the immutable [`ResolvedConfig`] is produced.
//!
//! ```ignore
//! use composed::{Composition, DeferredValue, HookError, MixinDef};
//! use composed::source::ProcessEnv;
//!
//! let foundation = MixinDef::new("Foundation")
//!     .with_setting("SECRET_KEY", DeferredValue::secret())
//!     .with_setting("MIDDLEWARE", serde_json::json!(["security", "sessions"]))
//!     .into_arc();
//!
//! let static_files = MixinDef::new("StaticFiles")
//!     .with_hook(|cfg| {
//!         cfg.list("MIDDLEWARE")?.insert_after("security", "static")?;
//!         Ok::<_, HookError>(())
//!     })
//!     .into_arc();
//!
//! let settings = Composition::new("Production")
//!     .with_env_prefix("APP")
//!     // Most specific first, like a base class list
//!     .with_mixin(static_files)
//!     .with_mixin(foundation)
//!     .compose(&ProcessEnv)?;
//! ```
//!
//! Settings can also be declared from a struct:
//! ```ignore
//! #[derive(composed::Settings)]
//! struct StorageSettings {
//!     #[setting(default = "localhost:9000")]
//!     storage_endpoint: String,
//!
//!     #[setting(env = "STORAGE_BUCKET_NAME")]
//!     storage_bucket: String,
//! }
//!
//! let storage = MixinDef::new("Storage").declared::<StorageSettings>();
//! ```

pub mod bind;
pub mod combine;
pub mod compose;
pub mod deprecation;
pub mod errors;
pub mod format;
mod linearize;
pub mod markdown;
pub mod mixin;
pub mod settings;
pub mod source;
pub mod staging;
pub mod types;
pub mod value;

/////////////////////////////////////////////////////////////////////////////////////////

pub use bind::ResolvedConfig;
pub use combine::Combine;
pub use compose::{Composition, Staged};
pub use errors::{BindError, ComposeError, ExtractError, HookError};
pub use mixin::{Declare, MixinDef};
pub use settings::{Entry, ListEdit, Settings};
pub use source::Environment;
pub use staging::Staging;
pub use value::{DeferredValue, Kind, Prefix};

pub use serde_json::Value;

/////////////////////////////////////////////////////////////////////////////////////////

#[cfg(feature = "derive")]
pub use composed_derive::Settings;

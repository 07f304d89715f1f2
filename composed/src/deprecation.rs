/////////////////////////////////////////////////////////////////////////////////////////

/// Receives deprecation notices raised while composing a configuration.
pub type OnDeprecatedClb = dyn Fn(/* mixin */ &str, /* message */ &str) + Send + Sync + 'static;

/////////////////////////////////////////////////////////////////////////////////////////

pub const LEGACY_HOOK_MESSAGE: &str =
    "Hook was registered under its deprecated name, use `MixinDef::with_hook` instead";

/////////////////////////////////////////////////////////////////////////////////////////

pub fn default_deprecation_clb(mixin: &str, message: &str) {
    tracing::warn!(mixin, "Mixin `{mixin}` uses a deprecated API: {message}");
}

/////////////////////////////////////////////////////////////////////////////////////////

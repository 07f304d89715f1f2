mod attrs;
mod settings;

/////////////////////////////////////////////////////////////////////////////////////////

/// Implements `composed::Declare` for a struct with named fields, declaring one
/// setting per field.
///
/// Field options are given via `#[setting(..)]`:
/// - `default = $expr` - value used when the environment variable is not set
/// - `env = "NAME"` - read from a different variable than the setting name
/// - `rename = "NAME"` - setting name, field name in upper case by default
/// - `kind = "url"` - coercion kind, inferred from the field type by default
/// - `no_prefix`, `required`, `immediate`, `ensure_exists`
/// - `literal` - install the default as a plain value instead of reading the environment
#[proc_macro_derive(Settings, attributes(setting))]
pub fn derive_settings(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match settings::settings_impl(input) {
        Ok(output) => proc_macro::TokenStream::from(output),
        Err(err) => err.to_compile_error().into(),
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

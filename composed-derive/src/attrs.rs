use proc_macro2::Span;
use quote::ToTokens;
use syn::spanned::Spanned;

/////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
pub(crate) struct SettingFieldOpts {
    pub default: Option<syn::Expr>,
    pub env: Option<syn::LitStr>,
    pub rename: Option<syn::LitStr>,
    pub kind: Option<syn::LitStr>,
    pub no_prefix: bool,
    pub required: bool,
    pub immediate: bool,
    pub literal: bool,
    pub ensure_exists: bool,
    pub span: Option<Span>,
}

impl SettingFieldOpts {
    pub fn merge(&mut self, other: Self) -> syn::Result<()> {
        let span = other.span.unwrap_or_else(Span::call_site);
        self.span = other.span;

        macro_rules! merge_once {
            ($($field:ident),*) => {
                $(
                    if other.$field.is_some() {
                        if self.$field.is_some() {
                            return Err(syn::Error::new(
                                span,
                                concat!("`", stringify!($field), "` specified more than once"),
                            ));
                        }
                        self.$field = other.$field;
                    }
                )*
            };
        }

        merge_once!(default, env, rename, kind);

        self.no_prefix |= other.no_prefix;
        self.required |= other.required;
        self.immediate |= other.immediate;
        self.literal |= other.literal;
        self.ensure_exists |= other.ensure_exists;

        Ok(())
    }

    pub fn extract_from(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut opts = Self::default();

        for attr in attrs.iter() {
            if attr.path().is_ident("setting") {
                let more_opts = Self::parse_from(attr)?;
                opts.merge(more_opts)?;
            }
        }

        Ok(opts)
    }

    fn parse_from(attr: &syn::Attribute) -> syn::Result<Self> {
        let mut opts = Self {
            span: Some(attr.span()),
            ..Default::default()
        };

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                opts.default = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("env") {
                opts.env = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("rename") {
                opts.rename = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("kind") {
                let kind: syn::LitStr = meta.value()?.parse()?;
                if !KINDS.contains(&kind.value().as_str()) {
                    return Err(syn::Error::new(
                        kind.span(),
                        format!(
                            "unknown setting kind `{}`, expected one of: {}",
                            kind.value(),
                            KINDS.join(", ")
                        ),
                    ));
                }
                opts.kind = Some(kind);
            } else if meta.path.is_ident("no_prefix") {
                opts.no_prefix = true;
            } else if meta.path.is_ident("required") {
                opts.required = true;
            } else if meta.path.is_ident("immediate") {
                opts.immediate = true;
            } else if meta.path.is_ident("literal") {
                opts.literal = true;
            } else if meta.path.is_ident("ensure_exists") {
                opts.ensure_exists = true;
            } else {
                return Err(syn::Error::new(
                    meta.path.span(),
                    format!("unknown setting option `{}`", meta.path.to_token_stream()),
                ));
            }
            Ok(())
        })?;

        Ok(opts)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

pub(crate) const KINDS: &[&str] = &[
    "string",
    "bool",
    "integer",
    "float",
    "list",
    "url",
    "secret",
    "email",
    "path",
    "directory",
    "json",
    "yaml",
    "toml",
];

/////////////////////////////////////////////////////////////////////////////////////////

/// Returns the `T` of `Option<T>`
pub(crate) fn option_inner(typ: &syn::Type) -> Option<&syn::Type> {
    let seg = last_segment(typ)?;
    if seg.ident != "Option" {
        return None;
    }

    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };

    args.args.iter().find_map(|arg| match arg {
        syn::GenericArgument::Type(t) => Some(t),
        _ => None,
    })
}

/// Infers the setting kind from the Rust type of a field
pub(crate) fn infer_kind(typ: &syn::Type) -> Option<&'static str> {
    if let Some(inner) = option_inner(typ) {
        return infer_kind(inner);
    }

    let seg = last_segment(typ)?;
    let kind = match seg.ident.to_string().as_str() {
        "bool" => "bool",
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
            "integer"
        }
        "f32" | "f64" => "float",
        "String" => "string",
        "Vec" => "list",
        "PathBuf" => "path",
        "SecretString" => "secret",
        _ => return None,
    };

    Some(kind)
}

fn last_segment(typ: &syn::Type) -> Option<&syn::PathSegment> {
    let syn::Type::Path(typ) = typ else {
        return None;
    };

    if typ.qself.is_some() {
        return None;
    }

    typ.path.segments.last()
}

/////////////////////////////////////////////////////////////////////////////////////////

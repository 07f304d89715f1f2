use crate::attrs::*;
use proc_macro2::TokenStream;
use quote::quote;

/////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn settings_impl(input: syn::DeriveInput) -> syn::Result<TokenStream> {
    let syn::Data::Struct(item) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input,
            "#[derive(Settings)] can only be applied to structs",
        ));
    };

    let syn::Fields::Named(fields) = &item.fields else {
        return Err(syn::Error::new_spanned(
            &input,
            "#[derive(Settings)] requires a struct with named fields",
        ));
    };

    let mut declarations = Vec::new();

    for field in &fields.named {
        declarations.push(declare_field(field)?);
    }

    let item_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::composed::Declare for #item_name #ty_generics #where_clause {
            fn declare(settings: &mut ::composed::Settings) {
                #(#declarations)*
            }
        }
    })
}

/////////////////////////////////////////////////////////////////////////////////////////

fn declare_field(field: &syn::Field) -> syn::Result<TokenStream> {
    let opts = SettingFieldOpts::extract_from(&field.attrs)?;

    let name = match &opts.rename {
        Some(rename) => rename.value(),
        None => {
            // Named fields always have an ident
            let ident = field.ident.as_ref().map(ToString::to_string);
            let ident = ident.unwrap_or_default();
            ident.trim_start_matches("r#").to_uppercase()
        }
    };

    if opts.literal {
        let Some(default) = &opts.default else {
            return Err(syn::Error::new_spanned(
                field,
                "`literal` setting requires a `default` value",
            ));
        };

        return Ok(quote! {
            settings.insert(
                #name,
                ::composed::Entry::Literal(::composed::Value::from(#default)),
            );
        });
    }

    let kind_name = match &opts.kind {
        Some(kind) => kind.value(),
        None => match infer_kind(&field.ty) {
            Some(kind) => kind.to_string(),
            None => {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "cannot infer the setting kind from this type, specify it via `#[setting(kind = \"..\")]`",
                ));
            }
        },
    };

    if opts.ensure_exists && kind_name != "directory" {
        return Err(syn::Error::new_spanned(
            field,
            "`ensure_exists` is only supported by the `directory` kind",
        ));
    }

    let kind = kind_tokens(&kind_name, opts.ensure_exists);

    let mut builder = quote! { ::composed::DeferredValue::new(#kind) };

    if let Some(default) = &opts.default {
        builder = quote! { #builder.default(::composed::Value::from(#default)) };
    }
    if let Some(env) = &opts.env {
        builder = quote! { #builder.env(#env) };
    }
    if opts.no_prefix {
        builder = quote! { #builder.no_prefix() };
    }

    // Fields that can neither be absent nor fall back to a default must come from the environment
    let required =
        opts.required || (opts.default.is_none() && option_inner(&field.ty).is_none());
    if required {
        builder = quote! { #builder.required() };
    }
    if opts.immediate {
        builder = quote! { #builder.immediate() };
    }

    Ok(quote! {
        settings.insert(#name, #builder);
    })
}

/////////////////////////////////////////////////////////////////////////////////////////

fn kind_tokens(kind: &str, ensure_exists: bool) -> TokenStream {
    match kind {
        "string" => quote! { ::composed::Kind::String },
        "bool" => quote! { ::composed::Kind::Bool },
        "integer" => quote! { ::composed::Kind::Integer },
        "float" => quote! { ::composed::Kind::Float },
        "list" => quote! { ::composed::Kind::List },
        "url" => quote! { ::composed::Kind::Url },
        "secret" => quote! { ::composed::Kind::Secret },
        "email" => quote! { ::composed::Kind::Email },
        "path" => quote! { ::composed::Kind::Path },
        "directory" => quote! { ::composed::Kind::Directory { ensure_exists: #ensure_exists } },
        "json" => quote! { ::composed::Kind::json() },
        "yaml" => quote! { ::composed::Kind::yaml() },
        "toml" => quote! { ::composed::Kind::toml() },
        _ => unreachable!("kind `{kind}` is validated while parsing attributes"),
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

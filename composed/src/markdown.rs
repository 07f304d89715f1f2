#![cfg(feature = "gen-markdown")]

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::compose::Composition;
use crate::errors::ComposeError;
use crate::settings::Entry;
use crate::value::DeferredValue;

/////////////////////////////////////////////////////////////////////////////////////////

/// Describes the environment variables consumed by a composition and the
/// mixins it is made of. Intended for inclusion in user-facing documentation.
///
/// Only declared settings are described, mutation hooks are not executed.
pub fn composition_to_markdown(composition: &Composition) -> Result<String, ComposeError> {
    let order = composition.precedence_order()?;

    // Setting name -> (declaring mixin, value), most specific declaration wins
    let mut values: BTreeMap<&str, (&str, &DeferredValue)> = BTreeMap::new();
    for mixin in order.iter().rev() {
        collect(&mut values, mixin.name(), mixin.settings().iter());
    }
    collect(
        &mut values,
        composition.name(),
        composition.settings().iter(),
    );

    let mut ret = String::new();
    write_composition(&mut ret, composition, &order, &values)
        .expect("Writing into a String never fails");

    Ok(ret)
}

fn collect<'a>(
    values: &mut BTreeMap<&'a str, (&'a str, &'a DeferredValue)>,
    declared_by: &'a str,
    settings: impl Iterator<Item = (&'a str, &'a Entry)>,
) {
    for (name, entry) in settings {
        match entry {
            Entry::Deferred(value) => {
                values.insert(name, (declared_by, value));
            }
            // Replaced by a concrete value
            _ => {
                values.remove(name);
            }
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

fn write_composition(
    buf: &mut String,
    composition: &Composition,
    order: &[std::sync::Arc<crate::MixinDef>],
    values: &BTreeMap<&str, (&str, &DeferredValue)>,
) -> Result<(), std::fmt::Error> {
    writeln!(buf, "## `{}`", composition.name())?;
    writeln!(buf)?;

    if let Some(desc) = composition.description() {
        writeln!(buf, "{}", desc.trim())?;
        writeln!(buf)?;
    }

    writeln!(buf, "<table>")?;
    writeln!(
        buf,
        "<thead><tr><th>Variable</th><th>Setting</th><th>Kind</th><th>Default</th><th>Mixin</th></tr></thead>"
    )?;
    writeln!(buf, "<tbody>")?;

    for (name, (declared_by, value)) in values {
        let variable = value.variable_name(name, composition.env_prefix());

        writeln!(buf, "<tr>")?;
        writeln!(buf, "<td><code>{}</code></td>", html_escape::encode_safe(&variable))?;
        writeln!(buf, "<td><code>{}</code></td>", html_escape::encode_safe(*name))?;
        writeln!(buf, "<td><code>{}</code></td>", value.kind().name())?;

        // Default
        match value.default_value() {
            _ if value.is_required() => writeln!(buf, "<td><em>required</em></td>")?,
            None => writeln!(buf, "<td></td>")?,
            Some(default) => {
                let default_str = serde_json::to_string(default).map_err(|_| std::fmt::Error)?;
                let escaped = html_escape::encode_safe(&default_str);
                writeln!(buf, "<td><code class=\"language-json\">{escaped}</code></td>")?;
            }
        }

        writeln!(buf, "<td><code>{}</code></td>", html_escape::encode_safe(declared_by))?;
        writeln!(buf, "</tr>")?;
    }

    writeln!(buf, "</tbody>")?;
    writeln!(buf, "</table>")?;

    if !order.is_empty() {
        writeln!(buf)?;
        writeln!(buf, "### Mixins")?;
        writeln!(buf)?;

        for (i, mixin) in order.iter().enumerate() {
            write!(buf, "{}. `{}`", i + 1, mixin.name())?;
            if let Some(desc) = mixin.description() {
                write!(buf, ": {}", desc.trim())?;
            }
            writeln!(buf)?;
        }
    }

    Ok(())
}

/////////////////////////////////////////////////////////////////////////////////////////

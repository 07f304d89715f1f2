/////////////////////////////////////////////////////////////////////////////////////////

/// Performs a shallow sanity check of an email address and returns it trimmed.
pub fn parse_email(s: &str) -> Result<String, String> {
    let s = s.trim();

    let Some((local, domain)) = s.split_once('@') else {
        return Err(format!("`{s}` has no `@`"));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(format!("`{s}` is not a valid email address"));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(format!("`{s}` has an invalid domain"));
    }

    Ok(s.to_string())
}

/////////////////////////////////////////////////////////////////////////////////////////

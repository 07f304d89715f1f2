mod directory;
mod email;
mod url_parts;

pub use directory::*;
pub use email::*;
pub use url_parts::*;

/////////////////////////////////////////////////////////////////////////////////////////

/// Parses a boolean the way environment variables usually spell them.
pub fn parse_bool(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "t" | "on" | "1" => Ok(true),
        "no" | "n" | "false" | "f" | "off" | "0" | "" => Ok(false),
        other => Err(format!("cannot interpret `{other}` as a boolean")),
    }
}

/// Splits a comma-separated list, trimming items and dropping empty ones.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/////////////////////////////////////////////////////////////////////////////////////////

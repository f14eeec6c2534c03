use anyhow::{anyhow, Result};

/// Accepts absolute `http`/`https` URLs with a host.
pub fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| anyhow!("{} must start with http:// or https://", field))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() || host.starts_with(':') {
        return Err(anyhow!("{} has no host", field));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(anyhow!("{} must not contain whitespace", field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_http_url("url", "https://abc.supabase.co").is_ok());
        assert!(validate_http_url("url", "http://127.0.0.1:8123/").is_ok());
    }

    #[test]
    fn rejects_missing_scheme_or_host() {
        assert!(validate_http_url("url", "abc.supabase.co").is_err());
        assert!(validate_http_url("url", "https://").is_err());
        assert!(validate_http_url("url", "https://:80").is_err());
        assert!(validate_http_url("url", "ws://x").is_err());
        assert!(validate_http_url("url", "https://a b").is_err());
    }
}

use axum::http::HeaderMap;

use gala_domain::RuntimeConfig;

/// Bearer check against `api_token`; open when no token is configured.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    authorize_with_query(config, headers, None)
}

/// Browsers cannot set headers on a WebSocket handshake, so the token may
/// also arrive as `?access_token=`.
pub fn authorize_with_query(config: &RuntimeConfig, headers: &HeaderMap, query_token: Option<&str>) -> bool {
    let Some(api_token) = &config.api_token else {
        return true;
    };
    let presented = extract_bearer(headers).or_else(|| {
        query_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    });
    presented.map(|token| token == *api_token).unwrap_or(false)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

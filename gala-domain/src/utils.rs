use chrono::Utc;

pub fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_normalizes_to_none() {
        assert_eq!(normalize_optional_text(Some("   ".to_string())), None);
        assert_eq!(
            normalize_optional_text(Some(" venue ".to_string())),
            Some("venue".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}

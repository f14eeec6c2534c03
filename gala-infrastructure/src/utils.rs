use time::OffsetDateTime;

pub fn millis_to_utc(ms: i64) -> OffsetDateTime {
    let nanos = i128::from(ms).saturating_mul(1_000_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn utc_to_millis(value: OffsetDateTime) -> i64 {
    (value.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Joins a base URL and a path segment with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_round_trip_through_offset_datetime() {
        let ms = 1_767_225_600_123;
        assert_eq!(utc_to_millis(millis_to_utc(ms)), ms);
    }

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("https://x.test/functions/v1/", "/generate-speech"), "https://x.test/functions/v1/generate-speech");
        assert_eq!(join_url("https://x.test", "rest/v1/events"), "https://x.test/rest/v1/events");
    }
}

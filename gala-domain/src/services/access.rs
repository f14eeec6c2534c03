//! Group password gate helpers.

use sha2::{Digest, Sha256};

use crate::value_objects::EventId;

pub fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Salted with the event id so equal passwords differ across events.
pub fn hash_group_password(event_id: EventId, password: &str) -> String {
    let digest = Sha256::digest(format!("gala|{}|{}", event_id, password).as_bytes());
    hex_encode(&digest)
}

pub fn verify_group_password(event_id: EventId, password: &str, expected_hash: &str) -> bool {
    let actual = hash_group_password(event_id, password);
    constant_time_eq(actual.as_bytes(), expected_hash.as_bytes())
}

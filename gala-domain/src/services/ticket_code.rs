//! Signed ticket codes: `GALA-<ticket id hex>-<signature>`.
//!
//! The signature is the first 16 hex chars of
//! `HMAC-SHA256(secret, "gala|v1|<event id>|<ticket id>")`, so a code only
//! validates for the event it was sold for.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::services::access::{constant_time_eq, hex_encode};
use crate::value_objects::{EventId, TicketId};

const CODE_PREFIX: &str = "GALA";
const CODE_VERSION: &str = "v1";
const SIGNATURE_LEN: usize = 16;

type HmacSha256 = Hmac<Sha256>;

fn sign(secret: &str, event_id: EventId, ticket_id: TicketId) -> DomainResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| DomainError::InvalidInput(format!("invalid signing secret: {}", err)))?;
    let payload = format!("gala|{}|{}|{}", CODE_VERSION, event_id, ticket_id);
    mac.update(payload.as_bytes());
    let digest = mac.finalize().into_bytes();
    let mut signature = hex_encode(&digest);
    signature.truncate(SIGNATURE_LEN);
    Ok(signature)
}

pub fn issue_code(secret: &str, event_id: EventId, ticket_id: TicketId) -> DomainResult<String> {
    let signature = sign(secret, event_id, ticket_id)?;
    Ok(format!("{}-{}-{}", CODE_PREFIX, ticket_id.0.simple(), signature))
}

fn parse_code(code: &str) -> DomainResult<(TicketId, String)> {
    let invalid = || DomainError::InvalidInput("malformed ticket code".to_string());
    let mut parts = code.trim().split('-');
    let (Some(prefix), Some(id), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    if !prefix.eq_ignore_ascii_case(CODE_PREFIX) || signature.len() != SIGNATURE_LEN {
        return Err(invalid());
    }
    let ticket_id = Uuid::parse_str(id).map(TicketId).map_err(|_| invalid())?;
    Ok((ticket_id, signature.to_lowercase()))
}

/// Returns the ticket id when the code was signed for `event_id`.
pub fn verify_code(secret: &str, event_id: EventId, code: &str) -> DomainResult<TicketId> {
    let (ticket_id, signature) = parse_code(code)?;
    let expected = sign(secret, event_id, ticket_id)?;
    if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        return Err(DomainError::InvalidInput("ticket code signature mismatch".to_string()));
    }
    Ok(ticket_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_code_verifies_for_its_event() {
        let event_id = EventId::new();
        let ticket_id = TicketId::new();
        let code = issue_code("secret", event_id, ticket_id).expect("code");
        assert!(code.starts_with("GALA-"));
        assert_eq!(verify_code("secret", event_id, &code), Ok(ticket_id));
        assert_eq!(
            verify_code("secret", event_id, &code.to_lowercase()),
            Ok(ticket_id)
        );
    }

    #[test]
    fn code_from_other_event_or_secret_is_rejected() {
        let event_id = EventId::new();
        let code = issue_code("secret", event_id, TicketId::new()).expect("code");
        assert!(verify_code("secret", EventId::new(), &code).is_err());
        assert!(verify_code("other", event_id, &code).is_err());
    }

    #[test]
    fn malformed_codes_are_rejected() {
        let event_id = EventId::new();
        for code in ["", "GALA", "GALA-123-abc", "TIX-00000000000000000000000000000000-0123456789abcdef"] {
            assert!(verify_code("secret", event_id, code).is_err(), "{code}");
        }
    }
}

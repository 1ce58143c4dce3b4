//! Opaque cursor tokens for reactor pages.
//!
//! A cursor is the sort key of a reaction record, `(created_at_us, actor_id)`,
//! rendered as `rc1:<created_at_us>:<actor-uuid>` and wrapped in URL-safe
//! base64.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use uuid::Uuid;

const CURSOR_PREFIX: &str = "rc1";

// Decode bound for untrusted cursor token input.
const MAX_CURSOR_TOKEN_LEN: usize = 256;

/// Why a cursor token was rejected.
#[derive(Debug, Clone, Eq, thiserror::Error, PartialEq)]
pub enum CursorDecodeError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token is not valid base64")]
    NotBase64,

    #[error("cursor payload is not valid UTF-8")]
    NotUtf8,

    #[error("cursor payload is malformed")]
    Malformed,
}

/// Stable position of a reaction record within its group.
///
/// Ordering is by creation time, then actor id. The derived `Ord` follows
/// field order and agrees with the store's `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorKey {
    pub created_at_us: i64,
    pub actor_id: Uuid,
}

impl CursorKey {
    #[must_use]
    pub const fn new(created_at_us: i64, actor_id: Uuid) -> Self {
        Self {
            created_at_us,
            actor_id,
        }
    }

    /// Encode as an opaque cursor token.
    #[must_use]
    pub fn encode(&self) -> String {
        let payload = format!(
            "{CURSOR_PREFIX}:{}:{}",
            self.created_at_us,
            self.actor_id.hyphenated()
        );
        URL_SAFE_NO_PAD.encode(payload)
    }

    /// Decode a cursor token produced by [`CursorKey::encode`].
    ///
    /// The token may include surrounding whitespace, which is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty, oversized, not base64, or
    /// does not carry a well-formed payload.
    pub fn decode(token: &str) -> Result<Self, CursorDecodeError> {
        let token = token.trim();

        if token.is_empty() {
            return Err(CursorDecodeError::Empty);
        }

        if token.len() > MAX_CURSOR_TOKEN_LEN {
            return Err(CursorDecodeError::TooLong {
                len: token.len(),
                max: MAX_CURSOR_TOKEN_LEN,
            });
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CursorDecodeError::NotBase64)?;
        let payload = String::from_utf8(bytes).map_err(|_| CursorDecodeError::NotUtf8)?;

        let mut parts = payload.splitn(3, ':');
        let (Some(CURSOR_PREFIX), Some(created), Some(actor)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(CursorDecodeError::Malformed);
        };

        let created_at_us = created
            .parse::<i64>()
            .map_err(|_| CursorDecodeError::Malformed)?;
        let actor_id = Uuid::try_parse(actor).map_err(|_| CursorDecodeError::Malformed)?;

        Ok(Self {
            created_at_us,
            actor_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> CursorKey {
        CursorKey::new(
            1_718_000_000_123_456,
            Uuid::parse_str("9b2e4c1d-5a6f-4e3b-8c7d-1f0a2b3c4d5e").unwrap(),
        )
    }

    #[test]
    fn encoded_cursor_decodes_to_same_key() {
        let token = key().encode();
        assert_eq!(CursorKey::decode(&token), Ok(key()));
        assert_eq!(CursorKey::decode(&format!("  {token}\n")), Ok(key()));
    }

    #[test]
    fn encoded_cursor_is_url_safe() {
        let token = key().encode();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn decode_cursor_rejects_empty_and_whitespace_tokens() {
        assert_eq!(CursorKey::decode(""), Err(CursorDecodeError::Empty));
        assert_eq!(CursorKey::decode("  \n\t"), Err(CursorDecodeError::Empty));
    }

    #[test]
    fn decode_cursor_enforces_max_token_length() {
        let token = "A".repeat(MAX_CURSOR_TOKEN_LEN + 1);
        assert_eq!(
            CursorKey::decode(&token),
            Err(CursorDecodeError::TooLong {
                len: MAX_CURSOR_TOKEN_LEN + 1,
                max: MAX_CURSOR_TOKEN_LEN,
            })
        );
    }

    #[test]
    fn decode_cursor_rejects_non_base64() {
        assert_eq!(
            CursorKey::decode("not a cursor!"),
            Err(CursorDecodeError::NotBase64)
        );
    }

    #[test]
    fn decode_cursor_rejects_foreign_payloads() {
        for payload in [
            "rc0:1:9b2e4c1d-5a6f-4e3b-8c7d-1f0a2b3c4d5e",
            "rc1:soon:9b2e4c1d-5a6f-4e3b-8c7d-1f0a2b3c4d5e",
            "rc1:1:not-a-uuid",
            "rc1:1",
            "offset:20",
        ] {
            let token = URL_SAFE_NO_PAD.encode(payload);
            assert_eq!(
                CursorKey::decode(&token),
                Err(CursorDecodeError::Malformed),
                "{payload}"
            );
        }
    }

    #[test]
    fn decode_cursor_rejects_non_utf8_payload() {
        let token = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
        assert_eq!(CursorKey::decode(&token), Err(CursorDecodeError::NotUtf8));
    }

    #[test]
    fn keys_order_by_time_then_actor() {
        let early = CursorKey::new(1, Uuid::from_u128(9));
        let late_low = CursorKey::new(2, Uuid::from_u128(1));
        let late_high = CursorKey::new(2, Uuid::from_u128(2));
        assert!(early < late_low);
        assert!(late_low < late_high);
    }
}

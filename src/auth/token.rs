use std::fmt;
use std::str::FromStr;

use rand::RngCore;

use super::password::{hash_secret, verify_secret};
use crate::error::{Error, Result};

pub const TOKEN_PREFIX: &str = "rbx";

const LOOKUP_BYTES: usize = 4;
const SECRET_BYTES: usize = 12;

/// Bearer token handed out at login, written `rbx_<lookup>_<secret>`.
///
/// `lookup` is stored in clear next to the session row so a request can find
/// its session without scanning; the full token is only ever stored hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    lookup: String,
    secret: String,
}

impl SessionToken {
    #[must_use]
    pub fn generate() -> Self {
        Self {
            lookup: random_hex::<LOOKUP_BYTES>(),
            secret: random_hex::<SECRET_BYTES>(),
        }
    }

    #[must_use]
    pub fn lookup(&self) -> &str {
        &self.lookup
    }

    /// Hash to persist in `sessions.token_hash`.
    pub fn hash(&self) -> Result<String> {
        hash_secret(&self.to_string(), "session token")
    }

    /// Whether this token is the one `hash` was computed from.
    pub fn matches(&self, hash: &str) -> Result<bool> {
        verify_secret(&self.to_string(), hash, "session token")
    }
}

fn random_hex<const N: usize>() -> String {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn is_lower_hex(part: &str, bytes: usize) -> bool {
    part.len() == bytes * 2 && part.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TOKEN_PREFIX}_{}_{}", self.lookup, self.secret)
    }
}

// Keeps the secret out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("lookup", &self.lookup)
            .finish_non_exhaustive()
    }
}

impl FromStr for SessionToken {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let mut parts = raw.split('_');
        let (Some(TOKEN_PREFIX), Some(lookup), Some(secret), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::InvalidTokenFormat);
        };

        if !is_lower_hex(lookup, LOOKUP_BYTES) || !is_lower_hex(secret, SECRET_BYTES) {
            return Err(Error::InvalidTokenFormat);
        }

        Ok(Self {
            lookup: lookup.to_string(),
            secret: secret.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = SessionToken::generate();
        let raw = token.to_string();

        let parts: Vec<&str> = raw.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "rbx");
        assert_eq!(parts[1], token.lookup());
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 24);
        assert_eq!(raw.parse::<SessionToken>().unwrap(), token);
    }

    #[test]
    fn test_tokens_are_distinct() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }

    #[test]
    fn test_hash_matches_only_its_token() {
        let token = SessionToken::generate();
        let hash = token.hash().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(token.matches(&hash).unwrap());

        // Same lookup, different secret: a forged token that finds the row.
        let forged: SessionToken = format!("rbx_{}_{}", token.lookup(), "0".repeat(24))
            .parse()
            .unwrap();
        assert!(!forged.matches(&hash).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let good = "rbx_0123abcd_0123456789abcdef01234567";
        assert!(good.parse::<SessionToken>().is_ok());

        for bad in [
            "",
            "rbx",
            "abc_0123abcd_0123456789abcdef01234567",
            "rbx_0123abcd",
            "rbx_0123_0123456789abcdef01234567",
            "rbx_0123abcd_0123456789abcdef0123456",
            "rbx_0123ABCD_0123456789abcdef01234567",
            "rbx_0123abcg_0123456789abcdef01234567",
            "rbx_0123abcd_0123456789abcdef01234567_extra",
        ] {
            assert!(
                matches!(bad.parse::<SessionToken>(), Err(Error::InvalidTokenFormat)),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_debug_hides_secret() {
        let token: SessionToken = "rbx_0123abcd_0123456789abcdef01234567".parse().unwrap();
        let debug = format!("{token:?}");
        assert!(debug.contains("0123abcd"));
        assert!(!debug.contains("0123456789abcdef01234567"));
    }
}

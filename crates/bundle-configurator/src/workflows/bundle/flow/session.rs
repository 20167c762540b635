use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 7;

/// Caller-generated identifier tying the verification code to one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// `bundle_<unix-millis>_<7 base-36 chars>`.
    pub fn generate() -> Self {
        Self::generate_with(Utc::now(), &mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        Self(format!("bundle_{}_{}", now.timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact details and verification status for one flow attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationSession {
    pub session_id: SessionId,
    pub email: String,
    pub name: String,
    /// Set once the gateway accepted it.
    pub code: Option<String>,
    pub verified: bool,
}

impl VerificationSession {
    pub fn new(session_id: SessionId, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            session_id,
            email: email.into(),
            name: name.into(),
            code: None,
            verified: false,
        }
    }

    pub(crate) fn mark_verified(&mut self, code: String) {
        self.code = Some(code);
        self.verified = true;
    }
}

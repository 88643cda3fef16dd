//! Credential header negotiation.
//!
//! The store has two key tiers and rejects a key sent under the wrong
//! header with 401/403. The client is not told which tier it holds, so it
//! tries one header and, on an auth rejection, the other. Never more than
//! two attempts.

use std::mem;

use reqwest::StatusCode;

/// Header a key can be presented under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHeader {
    /// Read tier (`X-Access-Key`).
    Access,
    /// Read-write tier (`X-Master-Key`).
    Master,
}

impl KeyHeader {
    /// HTTP header name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Access => "X-Access-Key",
            Self::Master => "X-Master-Key",
        }
    }
}

/// One step of the negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialAttempt {
    TryAccessKey,
    TryMasterKey,
    /// No further attempts; the last response is final.
    Exhausted,
}

impl CredentialAttempt {
    /// The header to send in this state.
    #[must_use]
    pub const fn header(self) -> Option<KeyHeader> {
        match self {
            Self::TryAccessKey => Some(KeyHeader::Access),
            Self::TryMasterKey => Some(KeyHeader::Master),
            Self::Exhausted => None,
        }
    }
}

/// Tracks which header to try next for one logical request.
#[derive(Debug, Clone)]
pub struct CredentialNegotiation {
    current: CredentialAttempt,
    fallback: CredentialAttempt,
}

impl CredentialNegotiation {
    /// Reads start with the least-privileged header.
    #[must_use]
    pub const fn read() -> Self {
        Self {
            current: CredentialAttempt::TryAccessKey,
            fallback: CredentialAttempt::TryMasterKey,
        }
    }

    /// Writes start with the write-capable header.
    #[must_use]
    pub const fn write() -> Self {
        Self {
            current: CredentialAttempt::TryMasterKey,
            fallback: CredentialAttempt::TryAccessKey,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn current(&self) -> CredentialAttempt {
        self.current
    }

    /// Feed the status of the response to the current attempt.
    ///
    /// Returns the next state. Only 401 and 403 move to the fallback header,
    /// and only once; every other status ends the negotiation.
    pub fn advance(&mut self, status: StatusCode) -> CredentialAttempt {
        self.current = if is_auth_rejection(status) {
            mem::replace(&mut self.fallback, CredentialAttempt::Exhausted)
        } else {
            CredentialAttempt::Exhausted
        };
        self.current
    }
}

/// 401 or 403.
#[must_use]
pub fn is_auth_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

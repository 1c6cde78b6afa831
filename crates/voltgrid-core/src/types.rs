use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amount in reward units. u128 leaves ample headroom above any
/// balance the reward schedule can produce, so arithmetic never overflows
/// in practice.
pub type Balance = u128;

/// Block height of the host chain. Supplied per call; monotonically
/// non-decreasing across calls.
pub type BlockHeight = u64;

/// Sequential identifier of a registered charging station.
pub type StationId = u64;

/// Sequential identifier of a charging session (the submission nonce).
pub type SessionId = u64;

// ── Principal ────────────────────────────────────────────────────────────────

/// Authenticated caller identity, as resolved by the host before the call
/// reaches a ledger (e.g. "ST1USER"). The ledgers never authenticate
/// principals themselves; they only gate mutations on equality.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self.0)
    }
}

// ── SessionProof ─────────────────────────────────────────────────────────────

/// 256-bit digest binding a charging session to its submission nonce and the
/// block height it is submitted at. Accepted iff it byte-equals the digest
/// the distributor recomputes.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProof(pub [u8; 32]);

impl SessionProof {
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }
}

impl fmt::Display for SessionProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for SessionProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionProof({}…)", &self.to_hex()[..16])
    }
}

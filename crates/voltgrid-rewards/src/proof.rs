use sha3::{Digest, Sha3_256};

use voltgrid_core::types::{BlockHeight, Principal, SessionId, SessionProof};

/// Compute the digest a session proof must byte-equal to be accepted.
///
/// The digest commits to the submission nonce and the submitting block
/// height as well as the session data, so a proof valid for one session
/// cannot be replayed against another nonce or at another height. Integers
/// are rendered in decimal and principals as their canonical strings,
/// concatenated with no separators.
pub fn session_digest(
    nonce: SessionId,
    user: &Principal,
    station: &Principal,
    kwh: u64,
    timestamp: BlockHeight,
    height: BlockHeight,
) -> SessionProof {
    let mut hasher = Sha3_256::new();
    hasher.update(nonce.to_string().as_bytes());
    hasher.update(user.as_str().as_bytes());
    hasher.update(station.as_str().as_bytes());
    hasher.update(kwh.to_string().as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(height.to_string().as_bytes());
    SessionProof(hasher.finalize().into())
}

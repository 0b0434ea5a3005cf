use sha2::{Digest, Sha256};

/// Computes the SHA-256 digest of `data`.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Creates the candidate message for a nonce: the prefix bytes followed by
/// the nonce packed as 8 bytes, big-endian. Independent verifiers must
/// reproduce this exact byte layout or their digests will not match.
pub fn pow_message(prefix: &[u8], nonce: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(prefix.len() + 8);
    bytes.extend_from_slice(prefix);
    bytes.extend_from_slice(&nonce.to_be_bytes());
    bytes
}

/// Digest of the candidate message for `(prefix, nonce)`.
pub fn pow_digest(prefix: &[u8], nonce: u64) -> [u8; 32] {
    sha256(&pow_message(prefix, nonce))
}

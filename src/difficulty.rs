/// Checks whether `digest` has at least `difficulty_bits` leading zero bits.
///
/// Scans most-significant bit first, byte by byte, and stops at the first
/// set bit, so the cost is proportional to the zero prefix rather than the
/// digest length. A threshold of 0 always passes; a threshold larger than
/// the digest bit length can never pass.
#[inline]
pub fn meets_difficulty(digest: &[u8], difficulty_bits: u32) -> bool {
    if difficulty_bits == 0 {
        return true;
    }
    let mut zeros = 0u32;
    for &byte in digest {
        if byte == 0 {
            zeros += 8;
            if zeros >= difficulty_bits {
                return true;
            }
        } else {
            return zeros + byte.leading_zeros() >= difficulty_bits;
        }
    }
    false
}

/// Expected number of hash attempts to find a qualifying digest: 2^bits.
pub fn expected_attempts(difficulty_bits: u32) -> f64 {
    2f64.powf(f64::from(difficulty_bits))
}

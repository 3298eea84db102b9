//! Hash functions used for key hashes and pre-hashed payloads.

use blake2::Blake2b;
use blake2::digest::Digest;
use blake2::digest::consts::U28;

/// Length of a Blake2b-224 digest.
pub const HASH_224_LEN: usize = 28;

/// Compute Blake2b-224 (key hashes, pre-hashed CIP-30 payloads)
#[inline]
pub fn blake2b_224(data: &[u8]) -> [u8; HASH_224_LEN] {
    let mut hasher = Blake2b::<U28>::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake2b_224_empty() {
        assert_eq!(
            hex::encode(blake2b_224(b"")),
            "836cc68931c2e4e3e838602eca1902591d216837bafddfe6f0c8cb07"
        );
    }

    #[test]
    fn test_blake2b_224_abc() {
        assert_eq!(
            hex::encode(blake2b_224(b"abc")),
            "9bd237b02a29e43bdd6738afa5b53ff0eee178d6210b618e4511aec8"
        );
    }
}

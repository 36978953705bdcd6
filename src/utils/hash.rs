//! Content hashing using FxHash.
//!
//! Used to detect whether a rebuilt artifact or the config file actually
//! changed, so unchanged outputs are not rewritten and do not trigger a
//! browser reload.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!(compute("body{}"), compute(b"body{}"));
        assert_ne!(compute("a"), compute("b"));
    }
}

/// [SplitMix64][splitmix] finalizer, a cheap bijective mixer for `u64` values.
///
/// [splitmix]: https://prng.di.unimi.it/splitmix64.c
pub fn mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Combine two `u64` values into one hash.
pub fn hash2(a: u64, b: u64) -> u64 {
    mix64(mix64(a) ^ b.rotate_left(32))
}

/// Combine three `u64` values into one hash.
pub fn hash3(a: u64, b: u64, c: u64) -> u64 {
    hash2(hash2(a, b), c)
}

pub trait MyHash {
    /// Hash used to pick a slot in the computed table.
    fn hash(&self) -> u64;
}

#[cfg(test)]
impl MyHash for (u64, u64) {
    fn hash(&self) -> u64 {
        hash2(self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_is_not_identity() {
        assert_ne!(mix64(0), 0);
        assert_ne!(mix64(1), mix64(2));
    }

    #[test]
    fn test_hash_order_matters() {
        assert_ne!(hash2(1, 2), hash2(2, 1));
        assert_ne!(hash3(1, 2, 3), hash3(3, 2, 1));
        assert_ne!(hash3(1, 2, 3), hash3(1, 3, 2));
    }

    #[test]
    fn test_hash_no_overflow_on_large_values() {
        let _ = hash3(u64::MAX, u64::MAX - 1, u64::MAX);
        let _ = (u64::MAX, u64::MAX).hash();
    }
}

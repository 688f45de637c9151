//! Uniform draws on top of a raw [`Rand`] source.

use tinyrand::Rand;

/// A uniform draw in `[0, 1]`.
#[inline]
pub fn random_f64(rand: &mut impl Rand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}

/// A uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub fn random_index(len: usize, rand: &mut impl Rand) -> usize {
    debug_assert!(len > 0);
    usize::min((random_f64(rand) * len as f64) as usize, len - 1)
}

#[inline]
pub fn coin_flip(rand: &mut impl Rand) -> bool {
    rand.next_u64() >> 63 == 0
}

/// Fisher-Yates shuffle.
pub fn shuffle<T>(slice: &mut [T], rand: &mut impl Rand) {
    for index in (1..slice.len()).rev() {
        let other = random_index(index + 1, rand);
        slice.swap(index, other);
    }
}

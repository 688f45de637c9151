use tinyrand::Rand;

use crate::draw::random_f64;

/// Upper bound on a sampled count; the tail beyond it is folded into the bound.
pub const MAX_SAMPLE: u8 = u8::MAX;

/// Draws a Poisson-distributed count by inverting the cumulative distribution.
pub fn sample(lambda: f64, rand: &mut impl Rand) -> u8 {
    debug_assert!(lambda > 0.0 && lambda.is_finite(), "invalid lambda {lambda}");
    let random = random_f64(rand);
    let mut k = 0;
    let mut prob = f64::exp(-lambda);
    let mut cumulative = prob;
    while cumulative < random && k < MAX_SAMPLE {
        k += 1;
        prob *= lambda / k as f64;
        cumulative += prob;
    }
    k
}

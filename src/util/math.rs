//! Activation and normalization helpers for tensor decoding.

/// Logistic function `1 / (1 + exp(-v))`.
///
/// Saturates to exactly `0.0` or `1.0` for large magnitudes instead of
/// producing NaN.
#[inline]
pub fn sigmoid(v: f32) -> f32 {
    1.0 / (1.0 + (-v).exp())
}

/// Replaces `logits` with their softmax probabilities.
///
/// The maximum logit is subtracted before exponentiating so large logits do
/// not overflow. Returns `false` and leaves `logits` untouched when the slice
/// is empty, holds a NaN or `+inf`, or holds only `-inf`; no probabilities
/// exist in those cases.
#[must_use]
pub fn softmax_in_place(logits: &mut [f32]) -> bool {
    if logits.iter().any(|v| v.is_nan()) {
        return false;
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return false;
    }

    let mut sum = 0.0f32;
    for value in logits.iter_mut() {
        *value = (*value - max).exp();
        sum += *value;
    }
    // The max logit contributes exp(0) = 1, so sum >= 1.
    let inv = 1.0 / sum;
    for value in logits.iter_mut() {
        *value *= inv;
    }
    true
}

/// Returns `(index, value)` of the largest element; ties resolve to the
/// lowest index. NaN values never win. Returns `None` for an empty slice or
/// one holding only NaN.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best
}

/// Clamps a threshold into `[0, 1]`; NaN maps to `1.0`.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        1.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{argmax, clamp_unit, sigmoid, softmax_in_place};

    #[test]
    fn sigmoid_matches_known_points() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-7);
        assert!(sigmoid(40.0) > 0.999_999);
        assert_eq!(sigmoid(-200.0), 0.0);
        assert_eq!(sigmoid(200.0), 1.0);
    }

    #[test]
    fn softmax_sums_to_one_without_overflow() {
        let mut logits = [1000.0f32, 999.0, 998.0];
        assert!(softmax_in_place(&mut logits));
        let sum: f32 = logits.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(logits.iter().all(|p| p.is_finite()));
        assert!(logits[0] > logits[1] && logits[1] > logits[2]);
    }

    #[test]
    fn softmax_of_equal_logits_is_uniform() {
        let mut logits = [0.0f32; 4];
        assert!(softmax_in_place(&mut logits));
        for p in logits {
            assert!((p - 0.25).abs() < 1e-7);
        }
    }

    #[test]
    fn softmax_tolerates_negative_infinity() {
        let mut logits = [f32::NEG_INFINITY, 0.0, 0.0];
        assert!(softmax_in_place(&mut logits));
        assert_eq!(logits[0], 0.0);
        assert!((logits[1] - 0.5).abs() < 1e-7);
        assert!((logits[2] - 0.5).abs() < 1e-7);
    }

    #[test]
    fn softmax_rejects_non_finite_logits() {
        let mut with_nan = [0.0f32, f32::NAN, 1.0];
        assert!(!softmax_in_place(&mut with_nan));
        assert_eq!(with_nan[0], 0.0);
        assert_eq!(with_nan[2], 1.0);

        let mut with_inf = [0.0f32, f32::INFINITY];
        assert!(!softmax_in_place(&mut with_inf));
        assert_eq!(with_inf, [0.0, f32::INFINITY]);

        let mut all_neg_inf = [f32::NEG_INFINITY; 3];
        assert!(!softmax_in_place(&mut all_neg_inf));

        assert!(!softmax_in_place(&mut []));
    }

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.2, 0.7, 0.7, 0.1]), Some((1, 0.7)));
        assert_eq!(argmax(&[f32::NAN, 0.3]), Some((1, 0.3)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn clamp_unit_bounds_and_nan() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(0.3), 0.3);
        assert_eq!(clamp_unit(f32::NAN), 1.0);
    }
}

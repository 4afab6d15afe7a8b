//! Tick-grid geometry helpers shared by the scorers.

use crate::engine::params::EngineParams;

/// Absolute distance between two prices in ticks.
///
/// Falls back to the raw price distance when the tick size is non-positive;
/// `EngineParams::validate` rejects that configuration up front, so the
/// fallback is only reachable from unvalidated params.
pub fn ticks_between(a: f64, b: f64, tick_size: f64) -> f64 {
    if tick_size > 0.0 {
        (a - b).abs() / tick_size
    } else {
        (a - b).abs()
    }
}

/// Score a tick distance against the ordered proximity buckets: the first
/// bucket whose threshold covers the distance wins, past the last bucket the
/// score is 0.
pub fn bucket_score(dt_ticks: f64, params: &EngineParams) -> f64 {
    for &(thr, score) in &params.prox_buckets {
        if dt_ticks <= thr {
            return score;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_between() {
        assert_eq!(ticks_between(5400.0, 5404.0, 0.25), 16.0);
        assert_eq!(ticks_between(5404.0, 5400.0, 0.25), 16.0);
        assert_eq!(ticks_between(100.0, 100.0, 0.25), 0.0);
    }

    #[test]
    fn test_ticks_between_raw_fallback() {
        assert_eq!(ticks_between(5400.0, 5404.0, 0.0), 4.0);
        assert_eq!(ticks_between(5400.0, 5404.0, -1.0), 4.0);
    }

    #[test]
    fn test_bucket_score_boundaries() {
        let params = EngineParams::default();
        assert_eq!(bucket_score(0.0, &params), 1.0);
        assert_eq!(bucket_score(2.0, &params), 1.0);
        assert_eq!(bucket_score(2.1, &params), 0.7);
        assert_eq!(bucket_score(8.0, &params), 0.4);
        assert_eq!(bucket_score(16.0, &params), 0.1);
        assert_eq!(bucket_score(32.0, &params), 0.05);
        assert_eq!(bucket_score(33.0, &params), 0.0);
    }

    #[test]
    fn test_bucket_score_monotone_in_distance() {
        let params = EngineParams::default();
        let mut prev = f64::MAX;
        for i in 0..200 {
            let d = i as f64 * 0.25;
            let s = bucket_score(d, &params);
            assert!(s <= prev, "score rose as distance grew at d={}", d);
            prev = s;
        }
    }
}

//! Property-based tests for touch threshold calibration.

use badge_bsp::touch::threshold_from_baseline;
use proptest::prelude::*;

proptest! {
    /// The threshold is floor(2/3 of the baseline) for every reading.
    #[test]
    fn threshold_is_floor_of_two_thirds(baseline in 0u16..=u16::MAX) {
        let threshold = u32::from(threshold_from_baseline(baseline));
        let doubled = u32::from(baseline) * 2;
        prop_assert!(threshold * 3 <= doubled);
        prop_assert!(doubled < (threshold + 1) * 3);
        prop_assert!(threshold <= u32::from(baseline));
    }
}

//! Property tests for frequency conversion and range handling

use fdspkr_core::tone::{FrequencyBounds, ToneInterval, ToneScheduler, ToneState};
use fdspkr_hal::Instant;
use proptest::prelude::*;

proptest! {
    #[test]
    fn interval_matches_fixed_point_formula(f in 51u32..1050) {
        let interval = ToneInterval::from_hz(f).unwrap();
        prop_assert_eq!(interval.as_ticks(), u64::from(37_120_000 / f) << 7);
    }

    #[test]
    fn in_range_frequencies_are_playable(f in 51u32..1050) {
        let bounds = FrequencyBounds::default();
        prop_assert!(bounds.interval_for(f).is_some());
    }

    #[test]
    fn low_frequencies_are_rejected(f in 0u32..=50) {
        let mut sched = ToneScheduler::default();
        sched.start(440, Instant::ZERO);
        prop_assert_eq!(sched.start(f, Instant::ZERO), None);
        prop_assert_eq!(sched.state(), ToneState::Idle);
    }

    #[test]
    fn high_frequencies_are_rejected(f in 1050u32..) {
        let mut sched = ToneScheduler::default();
        sched.start(440, Instant::ZERO);
        prop_assert_eq!(sched.start(f, Instant::ZERO), None);
        prop_assert_eq!(sched.state(), ToneState::Idle);
    }

    #[test]
    fn deadlines_follow_intended_times(
        f in 51u32..1050,
        start in 0u64..1_000_000_000_000,
        pulses in 1usize..200,
    ) {
        let mut sched = ToneScheduler::default();
        let t0 = Instant::from_ticks(start);
        let d = ToneInterval::from_hz(f).unwrap().as_ticks();

        prop_assert_eq!(sched.start(f, t0), Some(t0 + d));
        for k in 2..=pulses as u64 {
            prop_assert_eq!(sched.advance(), Some(t0 + k * d));
        }
    }
}

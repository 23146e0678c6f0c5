//! Property-Based Tests for Range Parsing
//!
//! Uses proptest to verify the range expression language across a wide
//! range of generated specifications.
//!
//! # Test Properties
//!
//! 1. **Roundtrip Stability**: parse(display(parse(spec))) == parse(spec)
//! 2. **Bound Consistency**: matches() agrees with the parsed bounds
//! 3. **Inversion**: `@` flips the alert decision for finite values

#![cfg(test)]

use proptest::prelude::*;

use super::Range;
use crate::state::{worst, ServiceState};

// =============================================================================
// Property Strategies
// =============================================================================

/// Strategy for finite bound values with a reasonable magnitude.
fn bound_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1_000_000i64..1_000_000).prop_map(|v| v as f64),
        (-1_000_000.0f64..1_000_000.0).prop_map(|v| (v * 100.0).round() / 100.0),
    ]
}

/// Strategy for valid spec strings covering all grammar forms.
fn spec_strategy() -> impl Strategy<Value = String> {
    (bound_strategy(), bound_strategy(), any::<bool>(), 0u8..4).prop_map(
        |(a, b, invert, form)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let at = if invert { "@" } else { "" };
            match form {
                0 => format!("{at}{}", hi.abs()),
                1 => format!("{at}{lo}:"),
                2 => format!("{at}~:{hi}"),
                _ => format!("{at}{lo}:{hi}"),
            }
        },
    )
}

// =============================================================================
// Roundtrip Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: the canonical rendering parses back to an equal range.
    #[test]
    fn prop_display_roundtrip(spec in spec_strategy()) {
        let parsed: Range = spec.parse().unwrap();
        let rendered = parsed.to_string();
        let reparsed: Range = rendered.parse().unwrap();
        prop_assert_eq!(parsed, reparsed, "rendered as {:?}", rendered);
    }

    /// Property: matches() is exactly the outside-bounds predicate for
    /// non-inverted ranges and its negation for inverted ones.
    #[test]
    fn prop_match_agrees_with_bounds(spec in spec_strategy(), value in bound_strategy()) {
        let r: Range = spec.parse().unwrap();
        let inside = value >= r.start() && value <= r.end();
        let expected = if r.is_inverted() { inside } else { !inside };
        prop_assert_eq!(r.matches(value), expected);
    }

    /// Property: inverting a spec flips the decision for every finite value.
    #[test]
    fn prop_inversion_flips(lo in bound_strategy(), hi in bound_strategy(), value in bound_strategy()) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let plain: Range = format!("{lo}:{hi}").parse().unwrap();
        let inverted: Range = format!("@{lo}:{hi}").parse().unwrap();
        prop_assert_ne!(plain.matches(value), inverted.matches(value));
    }
}

// =============================================================================
// Severity Reduction Properties
// =============================================================================

fn state_strategy() -> impl Strategy<Value = ServiceState> {
    prop_oneof![
        Just(ServiceState::Ok),
        Just(ServiceState::Warning),
        Just(ServiceState::Critical),
        Just(ServiceState::Unknown),
    ]
}

proptest! {
    /// Property: worst() equals the maximum by rank, for any sequence.
    #[test]
    fn prop_worst_is_max_by_rank(states in prop::collection::vec(state_strategy(), 0..16)) {
        let expected = states
            .iter()
            .copied()
            .max_by_key(|s| s.code())
            .unwrap_or(ServiceState::Ok);
        prop_assert_eq!(worst(states), expected);
    }

    /// Property: worst() is commutative.
    #[test]
    fn prop_worst_commutative(a in state_strategy(), b in state_strategy()) {
        prop_assert_eq!(worst([a, b]), worst([b, a]));
    }
}

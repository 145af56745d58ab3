//! Behavior-driven tests for normalization guarantees.
//!
//! The invariant-facing properties: idempotence, the OHLC ordering
//! guarantee, and the documented last-wins duplicate-date policy.

use marketbrief_core::{
    canonicalize_points, FetchErrorKind, MarketDate, OhlcPoint, Symbol, ValidationError,
};

fn date(input: &str) -> MarketDate {
    MarketDate::parse(input).expect("test date must parse")
}

fn point(ts: &str, open: f64, high: f64, low: f64, close: f64) -> OhlcPoint {
    OhlcPoint::new(date(ts), Some(open), Some(high), Some(low), Some(close))
        .expect("test point must be valid")
}

// =============================================================================
// Normalization: Idempotence
// =============================================================================

#[test]
fn canonicalizing_a_canonical_series_is_identity() {
    // Given: An already-canonical (ascending, unique) point list
    let symbol = Symbol::parse("AAA").expect("valid");
    let points = vec![
        point("2024-01-02", 100.0, 102.0, 99.0, 101.5),
        point("2024-01-03", 101.5, 103.0, 100.5, 102.0),
        point("2024-01-04", 102.0, 104.0, 101.0, 103.5),
    ];

    // When: Normalization runs twice
    let once = canonicalize_points(symbol.clone(), points).expect("first pass");
    let twice = canonicalize_points(symbol, once.points.clone()).expect("second pass");

    // Then: The second pass changes nothing
    assert_eq!(once, twice);
}

// =============================================================================
// Normalization: OHLC Ordering Invariant
// =============================================================================

#[test]
fn every_complete_point_satisfies_the_ordering_invariant() {
    let symbol = Symbol::parse("AAA").expect("valid");
    let series = canonicalize_points(
        symbol,
        vec![
            point("2024-01-03", 101.0, 103.0, 100.5, 102.0),
            point("2024-01-02", 100.0, 102.0, 99.0, 101.5),
        ],
    )
    .expect("canonicalize should succeed");

    for p in &series.points {
        let (open, high, low, close) = (
            p.open.expect("complete"),
            p.high.expect("complete"),
            p.low.expect("complete"),
            p.close.expect("complete"),
        );
        assert!(low <= open.min(close));
        assert!(open.max(close) <= high);
    }
}

#[test]
fn violating_points_cannot_be_constructed() {
    // close above high
    let err = OhlcPoint::new(
        date("2024-01-02"),
        Some(100.0),
        Some(102.0),
        Some(99.0),
        Some(110.0),
    )
    .expect_err("must fail");
    assert!(matches!(err, ValidationError::OhlcBoundsViolated { .. }));

    // low above the body
    let err = OhlcPoint::new(
        date("2024-01-02"),
        Some(100.0),
        Some(102.0),
        Some(100.5),
        Some(101.0),
    )
    .expect_err("must fail");
    assert!(matches!(err, ValidationError::OhlcBoundsViolated { .. }));
}

// =============================================================================
// Normalization: Documented Tie-Break Policy
// =============================================================================

#[test]
fn duplicate_dates_keep_the_last_point_seen() {
    // Given: Three points where two share a date, in provider order
    let symbol = Symbol::parse("AAA").expect("valid");
    let series = canonicalize_points(
        symbol,
        vec![
            point("2024-01-02", 100.0, 102.0, 99.0, 101.5),
            point("2024-01-03", 50.0, 52.0, 49.0, 51.5),
            point("2024-01-03", 101.0, 103.0, 100.5, 102.0),
        ],
    )
    .expect("canonicalize should succeed");

    // Then: The duplicate resolved to the later arrival, order preserved
    assert_eq!(series.len(), 2);
    assert_eq!(series.points[1].ts, date("2024-01-03"));
    assert_eq!(series.points[1].open, Some(101.0));
}

#[test]
fn sorting_and_dedup_compose() {
    // Duplicates of an out-of-order date still resolve last-wins after
    // the ascending sort.
    let symbol = Symbol::parse("AAA").expect("valid");
    let series = canonicalize_points(
        symbol,
        vec![
            point("2024-01-05", 104.0, 106.0, 103.0, 105.0),
            point("2024-01-02", 100.0, 102.0, 99.0, 101.5),
            point("2024-01-05", 90.0, 92.0, 89.0, 91.0),
        ],
    )
    .expect("canonicalize should succeed");

    assert_eq!(series.len(), 2);
    assert_eq!(series.points[0].ts, date("2024-01-02"));
    assert_eq!(series.points[1].close, Some(91.0));
}

// =============================================================================
// Normalization: Nothing Usable
// =============================================================================

#[test]
fn an_all_duplicate_empty_input_is_an_empty_failure() {
    let symbol = Symbol::parse("AAA").expect("valid");
    let failure = canonicalize_points(symbol, Vec::new()).expect_err("must fail");
    assert_eq!(failure.reason, FetchErrorKind::Empty);
}

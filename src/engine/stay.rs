//! Chargeable day counting for stay-based categories.
//!
//! Hotel and travel ceilings scale with stay length; this module turns the
//! category detail into the day count the per-diem comparison uses.

use crate::models::ClaimDetail;

/// Computes the number of chargeable days for a claim's detail.
///
/// Hotel stays count nights between check-in and check-out; travel counts
/// the span between departure and return. The count never drops below one:
/// a same-day trip, a missing date or an inverted span all charge a single
/// day. (Inverted spans are additionally surfaced by the fraud screen;
/// here they must not zero out the ceiling.)
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use expense_engine::engine::chargeable_days;
/// use expense_engine::models::ClaimDetail;
///
/// let detail = ClaimDetail::Hotel {
///     check_in: NaiveDate::from_ymd_opt(2025, 6, 8),
///     check_out: NaiveDate::from_ymd_opt(2025, 6, 11),
/// };
/// assert_eq!(chargeable_days(&detail), 3);
///
/// assert_eq!(chargeable_days(&ClaimDetail::None), 1);
/// ```
pub fn chargeable_days(detail: &ClaimDetail) -> i64 {
    let span = match detail {
        ClaimDetail::Hotel {
            check_in: Some(check_in),
            check_out: Some(check_out),
        } => (*check_out - *check_in).num_days(),
        ClaimDetail::Travel {
            departure: Some(departure),
            return_date: Some(return_date),
            ..
        } => (*return_date - *departure).num_days(),
        _ => 1,
    };
    span.max(1)
}

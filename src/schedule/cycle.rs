use chrono::{Datelike, Months, NaiveDate};

use crate::types::BillingCycle;

/// add `n` cycles to `date`.
///
/// The day of month clamps to the last valid day of the target month, so
/// Jan 31 + 1 month lands on Feb 28 (or Feb 29 in a leap year). Returns
/// `None` only when the result falls outside the representable range.
pub fn add_cycles(date: NaiveDate, cycle: BillingCycle, n: u32) -> Option<NaiveDate> {
    let months = n.checked_mul(cycle.months())?;
    date.checked_add_months(Months::new(months))
}

/// naive whole-cycle difference, ignoring the day of month
fn naive_cycle_difference(first: NaiveDate, reference: NaiveDate, cycle: BillingCycle) -> i64 {
    let years = (reference.year() - first.year()) as i64;
    match cycle {
        BillingCycle::Monthly => years * 12 + reference.month() as i64 - first.month() as i64,
        BillingCycle::Annual => years,
    }
}

/// number of cycle boundaries reached at or before `reference`, counting
/// `first` itself as cycle 1.
///
/// Returns 0 when `first` is after `reference`.
pub fn count_elapsed_cycles(first: NaiveDate, cycle: BillingCycle, reference: NaiveDate) -> u32 {
    if first > reference {
        return 0;
    }

    let mut difference = naive_cycle_difference(first, reference, cycle);

    // the anchor can overshoot when the first day does not exist in the
    // reference month (Jan 31 -> Feb 28) or when the reference day is earlier
    let anchor = u32::try_from(difference)
        .ok()
        .and_then(|n| add_cycles(first, cycle, n));
    match anchor {
        Some(anchor) if anchor > reference => difference -= 1,
        None => difference -= 1,
        _ => {}
    }

    (difference + 1).max(0) as u32
}

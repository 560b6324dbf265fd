use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::schedule::adjustments::AdjustmentHistoryResolver;
use crate::schedule::cycle::{add_cycles, count_elapsed_cycles};
use crate::types::BillingCycle;

/// amount charged for one completed cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCharge {
    pub cycle_number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
}

/// derives paid cycles from the schedule pointer and replays spend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleScheduler {
    pub cycle: BillingCycle,
}

impl CycleScheduler {
    pub fn new(cycle: BillingCycle) -> Self {
        Self { cycle }
    }

    /// completed cycles implied by the schedule pointer.
    ///
    /// `next_due` is the next unpaid occurrence, so the boundaries reached
    /// by it minus the one it represents are the completed cycles. An
    /// obligation that starts after `reference` has paid nothing.
    pub fn cycles_paid_by_schedule(
        &self,
        first_payment_date: Option<NaiveDate>,
        next_due_date: Option<NaiveDate>,
        reference: NaiveDate,
    ) -> u32 {
        let (Some(first), Some(next)) = (first_payment_date, next_due_date) else {
            return 0;
        };
        if first > reference {
            return 0;
        }
        if next < first {
            warn!("next due date {next} precedes first payment date {first}; treating as unpaid");
            return 0;
        }
        count_elapsed_cycles(first, self.cycle, next).saturating_sub(1)
    }

    /// recorded payments act as a floor under the schedule-derived count
    pub fn paid_cycles(
        &self,
        recorded_payments: u32,
        first_payment_date: Option<NaiveDate>,
        next_due_date: Option<NaiveDate>,
        reference: NaiveDate,
    ) -> u32 {
        let by_schedule = self.cycles_paid_by_schedule(first_payment_date, next_due_date, reference);
        if by_schedule != recorded_payments {
            debug!("paid cycles disagree: schedule {by_schedule}, recorded {recorded_payments}");
        }
        recorded_payments.max(by_schedule)
    }

    /// per-cycle amounts for the first `paid_cycles` cycles.
    ///
    /// Walks from `first` one cycle at a time, pricing each cycle at the
    /// value in effect on its date. Stops early if the calendar cannot
    /// produce a later date.
    pub fn paid_cycle_breakdown(
        &self,
        first: NaiveDate,
        resolver: &AdjustmentHistoryResolver,
        paid_cycles: u32,
    ) -> Vec<CycleCharge> {
        let mut charges = Vec::new();
        let mut cursor = first;

        for cycle_number in 1..=paid_cycles {
            charges.push(CycleCharge {
                cycle_number,
                due_date: cursor,
                amount: resolver.value_at(cursor),
            });
            match add_cycles(cursor, self.cycle, 1) {
                Some(next) if next > cursor => cursor = next,
                _ => break,
            }
        }
        charges
    }

    /// cumulative spend over the first `paid_cycles` cycles
    pub fn total_spent(
        &self,
        first_payment_date: Option<NaiveDate>,
        resolver: &AdjustmentHistoryResolver,
        paid_cycles: u32,
    ) -> Money {
        if paid_cycles == 0 {
            return Money::ZERO;
        }
        match first_payment_date {
            Some(first) => self
                .paid_cycle_breakdown(first, resolver, paid_cycles)
                .into_iter()
                .map(|charge| charge.amount)
                .sum(),
            None => resolver.current_value().times(paid_cycles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obligation::AdjustmentEvent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    #[test]
    fn test_pointer_at_first_date_means_nothing_paid() {
        let scheduler = CycleScheduler::new(BillingCycle::Monthly);
        let first = date(2024, 1, 10);
        assert_eq!(scheduler.cycles_paid_by_schedule(Some(first), Some(first), date(2024, 5, 1)), 0);
        assert_eq!(
            scheduler.cycles_paid_by_schedule(Some(first), Some(date(2024, 7, 10)), date(2024, 7, 1)),
            6
        );
    }

    #[test]
    fn test_future_start_has_no_paid_cycles() {
        let scheduler = CycleScheduler::new(BillingCycle::Monthly);
        let paid = scheduler.cycles_paid_by_schedule(
            Some(date(2025, 1, 10)),
            Some(date(2025, 3, 10)),
            date(2024, 12, 1),
        );
        assert_eq!(paid, 0);
    }

    #[test]
    fn test_inconsistent_pointer_is_zero() {
        let scheduler = CycleScheduler::new(BillingCycle::Monthly);
        let paid = scheduler.cycles_paid_by_schedule(
            Some(date(2024, 5, 10)),
            Some(date(2024, 1, 10)),
            date(2024, 12, 1),
        );
        assert_eq!(paid, 0);
        assert_eq!(scheduler.cycles_paid_by_schedule(None, Some(date(2024, 1, 10)), date(2024, 12, 1)), 0);
    }

    #[test]
    fn test_recorded_payments_are_a_floor() {
        let scheduler = CycleScheduler::new(BillingCycle::Monthly);
        let first = Some(date(2024, 1, 10));
        let next = Some(date(2024, 4, 10));
        let reference = date(2024, 4, 1);

        assert_eq!(scheduler.paid_cycles(1, first, next, reference), 3);
        assert_eq!(scheduler.paid_cycles(5, first, next, reference), 5);
    }

    #[test]
    fn test_total_spent_with_one_adjustment() {
        let scheduler = CycleScheduler::new(BillingCycle::Monthly);
        let history = vec![AdjustmentEvent::new(date(2024, 4, 10), money("29.90"), money("39.90"))];
        let resolver = AdjustmentHistoryResolver::new(money("39.90"), &history);

        let total = scheduler.total_spent(Some(date(2024, 1, 10)), &resolver, 6);
        assert_eq!(total, money("209.40"));

        let breakdown = scheduler.paid_cycle_breakdown(date(2024, 1, 10), &resolver, 6);
        assert_eq!(breakdown.len(), 6);
        assert_eq!(breakdown[2].amount, money("29.90"));
        assert_eq!(breakdown[3].due_date, date(2024, 4, 10));
        assert_eq!(breakdown[3].amount, money("39.90"));
    }

    #[test]
    fn test_total_spent_annual_cycle() {
        let scheduler = CycleScheduler::new(BillingCycle::Annual);
        let history = vec![AdjustmentEvent::new(date(2023, 8, 1), money("100"), money("120"))];
        let resolver = AdjustmentHistoryResolver::new(money("120"), &history);

        // charged on 2022-03-01, 2023-03-01 at the old price, 2024-03-01 at the new one
        let total = scheduler.total_spent(Some(date(2022, 3, 1)), &resolver, 3);
        assert_eq!(total, money("320"));
    }

    #[test]
    fn test_total_spent_degenerate_inputs() {
        let scheduler = CycleScheduler::new(BillingCycle::Monthly);
        let resolver = AdjustmentHistoryResolver::constant(money("15.50"));

        assert_eq!(scheduler.total_spent(Some(date(2024, 1, 1)), &resolver, 0), Money::ZERO);
        assert_eq!(scheduler.total_spent(None, &resolver, 4), money("62.00"));
    }

    #[test]
    fn test_walk_stops_at_calendar_limit() {
        let scheduler = CycleScheduler::new(BillingCycle::Annual);
        let resolver = AdjustmentHistoryResolver::constant(money("1"));
        let last = NaiveDate::MAX;
        let breakdown = scheduler.paid_cycle_breakdown(last, &resolver, 5);
        assert_eq!(breakdown.len(), 1);
    }
}

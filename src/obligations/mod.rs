pub mod installment;
pub mod recurring;
pub mod summary;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::obligation::{Obligation, ObligationTerms};
use crate::schedule::CycleCharge;
use crate::types::{ObligationId, ObligationKind, ObligationStatus};

use installment::InstallmentPlan;
use recurring::RecurringPlan;

pub use summary::{ObligationSummary, UpcomingPayment};

/// kind-specific part of a snapshot
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Projection {
    pub status: ObligationStatus,
    pub total_value: Money,
    pub paid_amount: Money,
    pub remaining_amount: Money,
    pub next_due_date: Option<NaiveDate>,
    pub progress_percent: Decimal,
    pub total_spent: Money,
    pub paid_cycles: u32,
    pub next_payment_value: Money,
    pub monthly_cost: Money,
}

/// computed state of one obligation on a reference date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationSnapshot {
    pub obligation_id: ObligationId,
    pub name: String,
    pub kind: ObligationKind,
    pub reference_date: NaiveDate,
    pub status: ObligationStatus,
    pub total_value: Money,
    pub paid_amount: Money,
    pub remaining_amount: Money,
    pub next_due_date: Option<NaiveDate>,
    pub progress_percent: Decimal,
    pub can_pay_now: bool,
    pub total_spent: Money,
    pub paid_cycles: u32,
    pub next_payment_value: Money,
    pub monthly_cost: Money,
    /// negative when overdue
    pub days_until_due: Option<i64>,
    pub due_soon: bool,
}

impl ObligationSnapshot {
    pub fn is_active(&self) -> bool {
        self.status == ObligationStatus::Active
    }

    pub fn json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// projects obligations into snapshots; holds no state between calls
#[derive(Debug, Clone, Default)]
pub struct ObligationCalculator {
    config: EngineConfig,
}

impl ObligationCalculator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// snapshot as of the provider's current date
    pub fn snapshot(&self, obligation: &Obligation, time: &SafeTimeProvider) -> ObligationSnapshot {
        self.snapshot_at(obligation, time.now().date_naive())
    }

    pub fn snapshot_at(&self, obligation: &Obligation, reference_date: NaiveDate) -> ObligationSnapshot {
        let projection = match &obligation.terms {
            ObligationTerms::Installment {
                installment_value,
                installments_total,
                down_payment,
                paid_installments,
            } => InstallmentPlan::new(
                *installment_value,
                *installments_total,
                *down_payment,
                *paid_installments,
            )
            .project(obligation.first_payment_date),
            ObligationTerms::Subscription {
                billing_cycle,
                recurring_value,
                subscription_payments,
                adjustment_history,
            } => RecurringPlan::new(
                *billing_cycle,
                *recurring_value,
                *subscription_payments,
                adjustment_history,
            )
            .project(obligation.first_payment_date, obligation.next_due_date, reference_date),
            ObligationTerms::Fixed { recurring_value, subscription_payments } => {
                RecurringPlan::new(obligation.billing_cycle(), *recurring_value, *subscription_payments, &[])
                    .project(obligation.first_payment_date, obligation.next_due_date, reference_date)
            }
        };

        self.finish(obligation, reference_date, projection)
    }

    /// per-cycle amounts already paid; empty for installment plans
    pub fn paid_cycle_breakdown(&self, obligation: &Obligation, reference_date: NaiveDate) -> Vec<CycleCharge> {
        match &obligation.terms {
            ObligationTerms::Installment { .. } => Vec::new(),
            ObligationTerms::Subscription {
                billing_cycle,
                recurring_value,
                subscription_payments,
                adjustment_history,
            } => RecurringPlan::new(*billing_cycle, *recurring_value, *subscription_payments, adjustment_history)
                .breakdown(obligation.first_payment_date, obligation.next_due_date, reference_date),
            ObligationTerms::Fixed { recurring_value, subscription_payments } => {
                RecurringPlan::new(obligation.billing_cycle(), *recurring_value, *subscription_payments, &[])
                    .breakdown(obligation.first_payment_date, obligation.next_due_date, reference_date)
            }
        }
    }

    pub fn snapshot_all_at(&self, obligations: &[Obligation], reference_date: NaiveDate) -> Vec<ObligationSnapshot> {
        obligations
            .iter()
            .map(|obligation| self.snapshot_at(obligation, reference_date))
            .collect()
    }

    pub fn summarize(&self, obligations: &[Obligation], time: &SafeTimeProvider) -> ObligationSummary {
        self.summarize_at(obligations, time.now().date_naive())
    }

    pub fn summarize_at(&self, obligations: &[Obligation], reference_date: NaiveDate) -> ObligationSummary {
        let snapshots = self.snapshot_all_at(obligations, reference_date);
        ObligationSummary::from_snapshots(&snapshots, reference_date)
    }

    fn finish(&self, obligation: &Obligation, reference_date: NaiveDate, projection: Projection) -> ObligationSnapshot {
        let active = projection.status == ObligationStatus::Active;
        let days_until_due = projection
            .next_due_date
            .filter(|_| active)
            .map(|due| (due - reference_date).num_days());
        let can_pay_now = days_until_due.is_some_and(|days| days <= 0);
        let due_soon = days_until_due
            .is_some_and(|days| (0..=self.config.due_soon_days as i64).contains(&days));

        debug!(
            "{} {}: status {:?}, {} cycles paid, {} spent",
            obligation.kind(),
            obligation.id,
            projection.status,
            projection.paid_cycles,
            projection.total_spent
        );

        ObligationSnapshot {
            obligation_id: obligation.id,
            name: obligation.name.clone(),
            kind: obligation.kind(),
            reference_date,
            status: projection.status,
            total_value: projection.total_value,
            paid_amount: projection.paid_amount,
            remaining_amount: projection.remaining_amount,
            next_due_date: projection.next_due_date,
            progress_percent: projection.progress_percent,
            can_pay_now,
            total_spent: projection.total_spent,
            paid_cycles: projection.paid_cycles,
            next_payment_value: projection.next_payment_value,
            monthly_cost: projection.monthly_cost,
            days_until_due,
            due_soon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventStore;
    use crate::obligation::AdjustmentEvent;
    use crate::types::BillingCycle;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn streaming() -> Obligation {
        Obligation::builder(ObligationKind::Subscription)
            .name("streaming")
            .first_payment_date(date(2024, 1, 10))
            .value(money("39.90"))
            .payments_made(6)
            .adjustment(AdjustmentEvent::new(date(2024, 4, 10), money("29.90"), money("39.90")))
            .build()
            .unwrap()
    }

    #[test]
    fn test_installment_snapshot() {
        let loan = Obligation::builder(ObligationKind::Installment)
            .name("fridge")
            .first_payment_date(date(2024, 1, 20))
            .value(Money::from_major(100))
            .installments_total(12)
            .payments_made(5)
            .build()
            .unwrap();
        let calculator = ObligationCalculator::default();

        let snapshot = calculator.snapshot_at(&loan, date(2024, 6, 20));
        assert_eq!(snapshot.status, ObligationStatus::Active);
        assert_eq!(snapshot.paid_amount, Money::from_major(500));
        assert_eq!(snapshot.remaining_amount, Money::from_major(700));
        assert_eq!(snapshot.progress_percent, dec!(41.67));
        assert_eq!(snapshot.next_due_date, Some(date(2024, 6, 20)));
        assert!(snapshot.can_pay_now);

        let early = calculator.snapshot_at(&loan, date(2024, 6, 15));
        assert!(!early.can_pay_now);
        assert!(early.due_soon);
        assert_eq!(early.days_until_due, Some(5));
    }

    #[test]
    fn test_installment_paid_off() {
        let mut loan = Obligation::installment("phone", date(2024, 1, 20), Money::from_major(100), 12);
        let mut events = EventStore::new();
        for _ in 0..12 {
            loan.record_payment(&mut events).unwrap();
        }

        let snapshot = ObligationCalculator::default().snapshot_at(&loan, date(2025, 3, 1));
        assert_eq!(snapshot.status, ObligationStatus::Paid);
        assert_eq!(snapshot.remaining_amount, Money::ZERO);
        assert_eq!(snapshot.next_due_date, None);
        assert!(!snapshot.can_pay_now);
        assert_eq!(snapshot.days_until_due, None);
    }

    #[test]
    fn test_subscription_snapshot() {
        let calculator = ObligationCalculator::default();
        let snapshot = calculator.snapshot_at(&streaming(), date(2024, 7, 1));

        assert_eq!(snapshot.paid_cycles, 6);
        assert_eq!(snapshot.total_spent, money("209.40"));
        assert_eq!(snapshot.next_due_date, Some(date(2024, 7, 10)));
        assert_eq!(snapshot.next_payment_value, money("39.90"));
        assert_eq!(snapshot.status, ObligationStatus::Active);
        assert!(!snapshot.can_pay_now);

        let due = calculator.snapshot_at(&streaming(), date(2024, 7, 10));
        assert!(due.can_pay_now);
    }

    #[test]
    fn test_reprojects_after_adjustment() {
        let calculator = ObligationCalculator::default();
        let mut sub = streaming();
        let mut events = EventStore::new();

        sub.record_payment(&mut events).unwrap();
        sub.adjust_value(money("44.90"), date(2024, 8, 1), &mut events).unwrap();
        sub.record_payment(&mut events).unwrap();

        // Jan-Mar 29.90, Apr-Jul 39.90, Aug 10 at 44.90
        let snapshot = calculator.snapshot_at(&sub, date(2024, 9, 1));
        assert_eq!(snapshot.paid_cycles, 8);
        assert_eq!(snapshot.total_spent, money("294.20"));
        assert_eq!(snapshot.next_payment_value, money("44.90"));
        assert_eq!(snapshot.next_due_date, Some(date(2024, 9, 10)));
    }

    #[test]
    fn test_schedule_pointer_beats_stale_counter() {
        let bill = Obligation::builder(ObligationKind::Fixed)
            .name("rent")
            .first_payment_date(date(2024, 1, 5))
            .next_due_date(date(2024, 5, 5))
            .value(Money::from_major(1_500))
            .payments_made(2)
            .build()
            .unwrap();

        let snapshot = ObligationCalculator::default().snapshot_at(&bill, date(2024, 5, 1));
        assert_eq!(snapshot.paid_cycles, 4);
        assert_eq!(snapshot.total_spent, Money::from_major(6_000));
        assert_eq!(snapshot.monthly_cost, Money::from_major(1_500));
    }

    #[test]
    fn test_not_started_subscription() {
        let sub = Obligation::subscription("gym", date(2025, 2, 1), BillingCycle::Monthly, Money::from_major(90));
        let snapshot = ObligationCalculator::default().snapshot_at(&sub, date(2025, 1, 15));

        assert_eq!(snapshot.paid_cycles, 0);
        assert_eq!(snapshot.total_spent, Money::ZERO);
        assert_eq!(snapshot.days_until_due, Some(17));
        assert!(!snapshot.due_soon);
    }

    #[test]
    fn test_missing_dates_degrade() {
        let mut loan = Obligation::installment("tv", date(2024, 1, 20), Money::from_major(100), 12);
        loan.first_payment_date = None;
        loan.next_due_date = None;

        let snapshot = ObligationCalculator::default().snapshot_at(&loan, date(2024, 6, 1));
        assert_eq!(snapshot.remaining_amount, snapshot.total_value);
        assert_eq!(snapshot.progress_percent, Decimal::ZERO);
        assert!(!snapshot.can_pay_now);
    }

    #[test]
    fn test_breakdown() {
        let calculator = ObligationCalculator::default();
        let charges = calculator.paid_cycle_breakdown(&streaming(), date(2024, 7, 1));
        assert_eq!(charges.len(), 6);
        assert_eq!(charges[0].amount, money("29.90"));
        assert_eq!(charges[5].amount, money("39.90"));

        let loan = Obligation::installment("tv", date(2024, 1, 20), Money::from_major(100), 12);
        assert!(calculator.paid_cycle_breakdown(&loan, date(2024, 7, 1)).is_empty());
    }

    #[test]
    fn test_snapshot_from_time_provider() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap(),
        ));
        let snapshot = ObligationCalculator::default().snapshot(&streaming(), &time);
        assert_eq!(snapshot.reference_date, date(2024, 7, 1));
        assert_eq!(snapshot.total_spent, money("209.40"));
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = ObligationCalculator::default().snapshot_at(&streaming(), date(2024, 7, 1));
        let value: serde_json::Value = serde_json::from_str(&snapshot.json()).unwrap();
        assert_eq!(value["kind"], "subscription");
        assert_eq!(value["status"], "active");
        assert_eq!(value["total_spent"], "209.40");
    }
}

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::obligation::AdjustmentEvent;
use crate::obligations::Projection;
use crate::schedule::{AdjustmentHistoryResolver, CycleCharge, CycleScheduler};
use crate::types::{BillingCycle, ObligationStatus};

/// open-ended obligation billed every cycle; subscriptions and fixed bills
#[derive(Debug, Clone)]
pub(crate) struct RecurringPlan {
    pub cycle: BillingCycle,
    pub recorded_payments: u32,
    pub resolver: AdjustmentHistoryResolver,
}

impl RecurringPlan {
    pub fn new(
        cycle: BillingCycle,
        recurring_value: Money,
        recorded_payments: u32,
        history: &[AdjustmentEvent],
    ) -> Self {
        Self {
            cycle,
            recorded_payments,
            resolver: AdjustmentHistoryResolver::new(recurring_value.non_negative(), history),
        }
    }

    pub fn recurring_value(&self) -> Money {
        self.resolver.current_value()
    }

    /// current value spread over months
    pub fn monthly_cost(&self) -> Money {
        self.recurring_value() / Decimal::from(self.cycle.months())
    }

    fn scheduler(&self) -> CycleScheduler {
        CycleScheduler::new(self.cycle)
    }

    pub fn paid_cycles(
        &self,
        first_payment_date: Option<NaiveDate>,
        next_due_date: Option<NaiveDate>,
        reference: NaiveDate,
    ) -> u32 {
        self.scheduler()
            .paid_cycles(self.recorded_payments, first_payment_date, next_due_date, reference)
    }

    pub fn breakdown(
        &self,
        first_payment_date: Option<NaiveDate>,
        next_due_date: Option<NaiveDate>,
        reference: NaiveDate,
    ) -> Vec<CycleCharge> {
        let Some(first) = first_payment_date else {
            return Vec::new();
        };
        let paid = self.paid_cycles(first_payment_date, next_due_date, reference);
        self.scheduler().paid_cycle_breakdown(first, &self.resolver, paid)
    }

    /// recurring obligations have no total to pay down, so `remaining_amount`
    /// stays zero even when the first payment date is missing; spend then
    /// falls back to the current value times the recorded payments
    pub fn project(
        &self,
        first_payment_date: Option<NaiveDate>,
        next_due_date: Option<NaiveDate>,
        reference: NaiveDate,
    ) -> Projection {
        if first_payment_date.is_none() {
            warn!("recurring obligation without a first payment date; using recorded payments only");
        }

        let paid_cycles = self.paid_cycles(first_payment_date, next_due_date, reference);
        let total_spent = self
            .scheduler()
            .total_spent(first_payment_date, &self.resolver, paid_cycles);
        debug!("recurring projection: {paid_cycles} cycles paid, {total_spent} spent");

        Projection {
            status: ObligationStatus::Active,
            total_value: total_spent,
            paid_amount: total_spent,
            remaining_amount: Money::ZERO,
            next_due_date,
            progress_percent: Decimal::ZERO,
            total_spent,
            paid_cycles,
            next_payment_value: self.recurring_value(),
            monthly_cost: self.monthly_cost(),
        }
    }
}

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use crate::decimal::{round2, Money};
use crate::obligations::Projection;
use crate::schedule::add_cycles;
use crate::types::{BillingCycle, ObligationStatus};

/// terms of an installment plan, clamped for projection
#[derive(Debug, Clone, Copy)]
pub(crate) struct InstallmentPlan {
    pub installment_value: Money,
    pub installments_total: u32,
    pub down_payment: Money,
    pub paid_installments: u32,
}

impl InstallmentPlan {
    pub fn new(
        installment_value: Money,
        installments_total: u32,
        down_payment: Money,
        paid_installments: u32,
    ) -> Self {
        Self {
            installment_value: installment_value.non_negative(),
            installments_total,
            down_payment: down_payment.non_negative(),
            paid_installments: paid_installments.min(installments_total),
        }
    }

    pub fn financed_amount(&self) -> Money {
        self.installment_value.times(self.installments_total)
    }

    pub fn total_value(&self) -> Money {
        self.down_payment + self.financed_amount()
    }

    pub fn remaining_installments(&self) -> u32 {
        self.installments_total - self.paid_installments
    }

    pub fn status(&self) -> ObligationStatus {
        if self.remaining_installments() == 0 {
            ObligationStatus::Paid
        } else {
            ObligationStatus::Active
        }
    }

    pub fn progress_percent(&self) -> Decimal {
        if self.installments_total == 0 {
            return Decimal::ZERO;
        }
        let pct = Decimal::from(self.paid_installments) / Decimal::from(self.installments_total)
            * Decimal::ONE_HUNDRED;
        round2(pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// amortization state; a missing first date degrades to "nothing paid"
    pub fn project(&self, first_payment_date: Option<NaiveDate>) -> Projection {
        let status = self.status();
        let active = status == ObligationStatus::Active;
        let total_value = self.total_value();
        let installment_due = if active { self.installment_value } else { Money::ZERO };

        let Some(first) = first_payment_date else {
            warn!("installment plan without a first payment date; projecting as not started");
            return Projection {
                status,
                total_value,
                paid_amount: Money::ZERO,
                remaining_amount: total_value,
                next_due_date: None,
                progress_percent: Decimal::ZERO,
                total_spent: Money::ZERO,
                paid_cycles: 0,
                next_payment_value: installment_due,
                monthly_cost: installment_due,
            };
        };

        let paid_amount = self.installment_value.times(self.paid_installments);
        let next_due_date = if active {
            add_cycles(first, BillingCycle::Monthly, self.paid_installments)
        } else {
            None
        };

        Projection {
            status,
            total_value,
            paid_amount,
            remaining_amount: self.financed_amount().saturating_sub(paid_amount),
            next_due_date,
            progress_percent: self.progress_percent(),
            total_spent: self.down_payment + paid_amount,
            paid_cycles: self.paid_installments,
            next_payment_value: installment_due,
            monthly_cost: installment_due,
        }
    }
}

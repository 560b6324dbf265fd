use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::obligations::ObligationSnapshot;
use crate::types::{ObligationId, ObligationKind};

/// a payment that is payable now or due within the configured window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingPayment {
    pub obligation_id: ObligationId,
    pub name: String,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub overdue: bool,
}

/// aggregate view over a set of obligation snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationSummary {
    pub reference_date: NaiveDate,
    pub active_count: usize,
    pub paid_off_count: usize,
    /// monthly cost of everything still active
    pub monthly_commitment: Money,
    /// unpaid balance of installment plans
    pub outstanding_installments: Money,
    pub total_spent: Money,
    pub payable_now_count: usize,
    /// sorted by due date
    pub upcoming: Vec<UpcomingPayment>,
}

impl ObligationSummary {
    pub fn from_snapshots(snapshots: &[ObligationSnapshot], reference_date: NaiveDate) -> Self {
        let active = || snapshots.iter().filter(|s| s.is_active());

        let mut upcoming: Vec<UpcomingPayment> = active()
            .filter(|s| s.can_pay_now || s.due_soon)
            .filter_map(|s| {
                s.next_due_date.map(|due_date| UpcomingPayment {
                    obligation_id: s.obligation_id,
                    name: s.name.clone(),
                    due_date,
                    amount: s.next_payment_value,
                    overdue: due_date < reference_date,
                })
            })
            .collect();
        upcoming.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.name.cmp(&b.name)));

        Self {
            reference_date,
            active_count: active().count(),
            paid_off_count: snapshots.len() - active().count(),
            monthly_commitment: active().map(|s| s.monthly_cost).sum(),
            outstanding_installments: snapshots
                .iter()
                .filter(|s| s.kind == ObligationKind::Installment)
                .map(|s| s.remaining_amount)
                .sum(),
            total_spent: snapshots.iter().map(|s| s.total_spent).sum(),
            payable_now_count: active().filter(|s| s.can_pay_now).count(),
            upcoming,
        }
    }
}

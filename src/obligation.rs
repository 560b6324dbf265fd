use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{EngineError, Result};
use crate::events::{Event, EventStore};
use crate::schedule::add_cycles;
use crate::types::{BillingCycle, ObligationId, ObligationKind};

/// a historical price change of a subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentEvent {
    pub changed_at: NaiveDate,
    pub old_value: Money,
    pub new_value: Money,
}

impl AdjustmentEvent {
    pub fn new(changed_at: NaiveDate, old_value: Money, new_value: Money) -> Self {
        Self {
            changed_at,
            old_value,
            new_value,
        }
    }
}

/// kind-specific terms of an obligation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObligationTerms {
    Installment {
        installment_value: Money,
        installments_total: u32,
        down_payment: Money,
        paid_installments: u32,
    },
    Subscription {
        billing_cycle: BillingCycle,
        recurring_value: Money,
        subscription_payments: u32,
        adjustment_history: Vec<AdjustmentEvent>,
    },
    Fixed {
        recurring_value: Money,
        subscription_payments: u32,
    },
}

impl ObligationTerms {
    pub fn kind(&self) -> ObligationKind {
        match self {
            ObligationTerms::Installment { .. } => ObligationKind::Installment,
            ObligationTerms::Subscription { .. } => ObligationKind::Subscription,
            ObligationTerms::Fixed { .. } => ObligationKind::Fixed,
        }
    }

    /// installments and fixed bills are implicitly monthly
    pub fn billing_cycle(&self) -> BillingCycle {
        match self {
            ObligationTerms::Subscription { billing_cycle, .. } => *billing_cycle,
            _ => BillingCycle::Monthly,
        }
    }
}

/// a recurring or installment financial commitment.
///
/// `next_due_date` is the schedule pointer: the next unpaid occurrence,
/// advanced each time a payment is recorded. Dates are optional because
/// stored records may carry missing or unparseable values; the calculator
/// degrades instead of failing on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    pub id: ObligationId,
    pub name: String,
    pub first_payment_date: Option<NaiveDate>,
    pub next_due_date: Option<NaiveDate>,
    pub terms: ObligationTerms,
}

impl Obligation {
    pub fn new(
        name: impl Into<String>,
        first_payment_date: NaiveDate,
        terms: ObligationTerms,
    ) -> Self {
        let next_due_date = match &terms {
            ObligationTerms::Installment { paid_installments, .. } => {
                add_cycles(first_payment_date, BillingCycle::Monthly, *paid_installments)
            }
            ObligationTerms::Subscription { billing_cycle, subscription_payments, .. } => {
                add_cycles(first_payment_date, *billing_cycle, *subscription_payments)
            }
            ObligationTerms::Fixed { subscription_payments, .. } => {
                add_cycles(first_payment_date, BillingCycle::Monthly, *subscription_payments)
            }
        };

        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            first_payment_date: Some(first_payment_date),
            next_due_date,
            terms,
        }
    }

    /// builder for creating obligations
    pub fn builder(kind: ObligationKind) -> ObligationBuilder {
        ObligationBuilder::new(kind)
    }

    pub fn installment(
        name: impl Into<String>,
        first_payment_date: NaiveDate,
        installment_value: Money,
        installments_total: u32,
    ) -> Self {
        Self::new(
            name,
            first_payment_date,
            ObligationTerms::Installment {
                installment_value,
                installments_total,
                down_payment: Money::ZERO,
                paid_installments: 0,
            },
        )
    }

    pub fn subscription(
        name: impl Into<String>,
        first_payment_date: NaiveDate,
        billing_cycle: BillingCycle,
        recurring_value: Money,
    ) -> Self {
        Self::new(
            name,
            first_payment_date,
            ObligationTerms::Subscription {
                billing_cycle,
                recurring_value,
                subscription_payments: 0,
                adjustment_history: Vec::new(),
            },
        )
    }

    pub fn fixed(
        name: impl Into<String>,
        first_payment_date: NaiveDate,
        recurring_value: Money,
    ) -> Self {
        Self::new(
            name,
            first_payment_date,
            ObligationTerms::Fixed {
                recurring_value,
                subscription_payments: 0,
            },
        )
    }

    pub fn kind(&self) -> ObligationKind {
        self.terms.kind()
    }

    pub fn billing_cycle(&self) -> BillingCycle {
        self.terms.billing_cycle()
    }

    /// record one payment, advancing the schedule pointer
    pub fn record_payment(&mut self, events: &mut EventStore) -> Result<()> {
        let obligation_id = self.id;
        let due_date = self.next_due_date;

        match &mut self.terms {
            ObligationTerms::Installment {
                installment_value,
                installments_total,
                down_payment,
                paid_installments,
            } => {
                if *paid_installments >= *installments_total {
                    return Err(EngineError::ObligationSettled);
                }
                *paid_installments += 1;
                let cycle_number = *paid_installments;
                let settled = cycle_number == *installments_total;

                self.next_due_date = if settled {
                    None
                } else {
                    self.first_payment_date
                        .and_then(|first| add_cycles(first, BillingCycle::Monthly, cycle_number))
                };

                events.emit(Event::PaymentRecorded {
                    obligation_id,
                    cycle_number,
                    amount: *installment_value,
                    due_date,
                    next_due_date: self.next_due_date,
                });

                if settled {
                    events.emit(Event::ObligationPaidOff {
                        obligation_id,
                        total_paid: *down_payment + installment_value.times(*installments_total),
                    });
                }
            }
            ObligationTerms::Subscription { billing_cycle, recurring_value, subscription_payments, .. } => {
                let current = due_date.ok_or_else(|| EngineError::InvalidDate {
                    message: "next due date is required to record a payment".to_string(),
                })?;
                let recorded = *subscription_payments;
                *subscription_payments = recorded
                    .checked_add(1)
                    .ok_or(EngineError::PaymentCountExhausted { recorded })?;
                self.next_due_date = add_cycles(current, *billing_cycle, 1);

                events.emit(Event::PaymentRecorded {
                    obligation_id,
                    cycle_number: *subscription_payments,
                    amount: *recurring_value,
                    due_date,
                    next_due_date: self.next_due_date,
                });
            }
            ObligationTerms::Fixed { recurring_value, subscription_payments } => {
                let current = due_date.ok_or_else(|| EngineError::InvalidDate {
                    message: "next due date is required to record a payment".to_string(),
                })?;
                let recorded = *subscription_payments;
                *subscription_payments = recorded
                    .checked_add(1)
                    .ok_or(EngineError::PaymentCountExhausted { recorded })?;
                self.next_due_date = add_cycles(current, BillingCycle::Monthly, 1);

                events.emit(Event::PaymentRecorded {
                    obligation_id,
                    cycle_number: *subscription_payments,
                    amount: *recurring_value,
                    due_date,
                    next_due_date: self.next_due_date,
                });
            }
        }

        debug!("recorded payment on {}, next due {:?}", self.id, self.next_due_date);
        Ok(())
    }

    /// change the recurring value of a subscription from `changed_at` on
    pub fn adjust_value(
        &mut self,
        new_value: Money,
        changed_at: NaiveDate,
        events: &mut EventStore,
    ) -> Result<()> {
        let kind = self.kind();
        match &mut self.terms {
            ObligationTerms::Subscription { recurring_value, adjustment_history, .. } => {
                if !new_value.is_positive() {
                    return Err(EngineError::InvalidAmount { amount: new_value });
                }
                let old_value = *recurring_value;
                adjustment_history.push(AdjustmentEvent::new(changed_at, old_value, new_value));
                *recurring_value = new_value;

                events.emit(Event::ValueAdjusted {
                    obligation_id: self.id,
                    old_value,
                    new_value,
                    changed_at,
                });
                Ok(())
            }
            _ => Err(EngineError::OperationNotSupported { kind }),
        }
    }
}

/// builder for obligations with optional fields
pub struct ObligationBuilder {
    kind: ObligationKind,
    name: Option<String>,
    first_payment_date: Option<NaiveDate>,
    next_due_date: Option<NaiveDate>,
    billing_cycle: BillingCycle,
    value: Option<Money>,
    installments_total: Option<u32>,
    down_payment: Money,
    payments_made: u32,
    adjustment_history: Vec<AdjustmentEvent>,
}

impl ObligationBuilder {
    pub fn new(kind: ObligationKind) -> Self {
        Self {
            kind,
            name: None,
            first_payment_date: None,
            next_due_date: None,
            billing_cycle: BillingCycle::Monthly,
            value: None,
            installments_total: None,
            down_payment: Money::ZERO,
            payments_made: 0,
            adjustment_history: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn first_payment_date(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = Some(date);
        self
    }

    /// override the schedule pointer; defaults to the pointer implied by
    /// the payments made
    pub fn next_due_date(mut self, date: NaiveDate) -> Self {
        self.next_due_date = Some(date);
        self
    }

    pub fn billing_cycle(mut self, cycle: BillingCycle) -> Self {
        self.billing_cycle = cycle;
        self
    }

    /// installment value or recurring value depending on the kind
    pub fn value(mut self, value: Money) -> Self {
        self.value = Some(value);
        self
    }

    pub fn installments_total(mut self, total: u32) -> Self {
        self.installments_total = Some(total);
        self
    }

    pub fn down_payment(mut self, amount: Money) -> Self {
        self.down_payment = amount;
        self
    }

    /// paid installments or recorded subscription payments
    pub fn payments_made(mut self, count: u32) -> Self {
        self.payments_made = count;
        self
    }

    pub fn adjustment(mut self, event: AdjustmentEvent) -> Self {
        self.adjustment_history.push(event);
        self
    }

    pub fn build(self) -> Result<Obligation> {
        let first_payment_date = self.first_payment_date.ok_or(EngineError::InvalidDate {
            message: "first payment date required".to_string(),
        })?;

        let value = self.value.unwrap_or(Money::ZERO);
        if value.is_negative() {
            return Err(EngineError::InvalidAmount { amount: value });
        }
        if self.down_payment.is_negative() {
            return Err(EngineError::InvalidAmount { amount: self.down_payment });
        }

        let terms = match self.kind {
            ObligationKind::Installment => {
                let installments_total = self.installments_total.unwrap_or(1).max(1);
                ObligationTerms::Installment {
                    installment_value: value,
                    installments_total,
                    down_payment: self.down_payment,
                    paid_installments: self.payments_made.min(installments_total),
                }
            }
            ObligationKind::Subscription => ObligationTerms::Subscription {
                billing_cycle: self.billing_cycle,
                recurring_value: value,
                subscription_payments: self.payments_made,
                adjustment_history: self.adjustment_history,
            },
            ObligationKind::Fixed => ObligationTerms::Fixed {
                recurring_value: value,
                subscription_payments: self.payments_made,
            },
        };

        let mut obligation = Obligation::new(
            self.name.unwrap_or_else(|| self.kind.to_string()),
            first_payment_date,
            terms,
        );

        if let Some(next_due_date) = self.next_due_date {
            if next_due_date < first_payment_date {
                return Err(EngineError::InvalidDate {
                    message: format!(
                        "next due date {next_due_date} precedes first payment date {first_payment_date}"
                    ),
                });
            }
            obligation.next_due_date = Some(next_due_date);
        }

        Ok(obligation)
    }
}

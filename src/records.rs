//! Lenient ingestion of stored obligation and reserve records.
//!
//! Stored data predates the typed model: dates are strings that may be
//! missing or malformed, and amounts are binary floats. Bad values degrade
//! with a warning; only unknown discriminator strings are rejected, since
//! those mean the caller handed over the wrong kind of record.

use chrono::{DateTime, NaiveDate};
use log::warn;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{non_negative, Money};
use crate::errors::Result;
use crate::interest::RateConverter;
use crate::investment::InvestmentBox;
use crate::obligation::{AdjustmentEvent, Obligation, ObligationTerms};
use crate::types::{BillingCycle, InvestmentType, ObligationKind};

/// parse `YYYY-MM-DD` or an RFC 3339 timestamp (date part)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn parse_optional_date(field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    let parsed = parse_date(raw);
    if parsed.is_none() {
        warn!("unparseable {field} {raw:?}; treating as missing");
    }
    parsed
}

fn amount(field: &str, raw: Option<f64>) -> Money {
    let Some(value) = raw else {
        return Money::ZERO;
    };
    if !value.is_finite() || value < 0.0 {
        warn!("{field} {value} is negative or not finite; clamping to zero");
    }
    Money::from_f64(value)
}

fn percent(field: &str, raw: Option<f64>) -> Decimal {
    let Some(value) = raw else {
        return Decimal::ZERO;
    };
    match Decimal::from_f64(value) {
        Some(d) if d >= Decimal::ZERO => d.round_dp(8),
        _ => {
            warn!("{field} {value} is negative or not finite; clamping to zero");
            Decimal::ZERO
        }
    }
}

fn count(raw: Option<i64>) -> u32 {
    raw.map(|n| n.clamp(0, u32::MAX as i64) as u32).unwrap_or(0)
}

/// a stored price change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRecord {
    pub changed_at: String,
    pub old_value: f64,
    pub new_value: f64,
}

/// a stored obligation as written by the form and API layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub billing_cycle: Option<String>,
    #[serde(default)]
    pub recurring_value: Option<f64>,
    #[serde(default)]
    pub installment_value: Option<f64>,
    #[serde(default)]
    pub installments_total: Option<i64>,
    #[serde(default)]
    pub down_payment: Option<f64>,
    #[serde(default)]
    pub first_payment_date: Option<String>,
    #[serde(default)]
    pub next_due_date: Option<String>,
    #[serde(default)]
    pub paid_installments: Option<i64>,
    #[serde(default)]
    pub subscription_payments: Option<i64>,
    #[serde(default)]
    pub adjustment_history: Vec<AdjustmentRecord>,
}

impl ObligationRecord {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// normalize into the typed model; fails only on unknown discriminators
    pub fn into_obligation(self) -> Result<Obligation> {
        let kind: ObligationKind = self.kind.parse()?;
        let billing_cycle = match (kind, self.billing_cycle.as_deref()) {
            (ObligationKind::Subscription, Some(raw)) if !raw.trim().is_empty() => raw.parse()?,
            _ => BillingCycle::Monthly,
        };

        let first_payment_date =
            parse_optional_date("first payment date", self.first_payment_date.as_deref());
        let next_due_date = parse_optional_date("next due date", self.next_due_date.as_deref());
        if let (Some(first), Some(next)) = (first_payment_date, next_due_date) {
            if next < first {
                warn!("next due date {next} precedes first payment date {first}");
            }
        }

        let terms = match kind {
            ObligationKind::Installment => ObligationTerms::Installment {
                installment_value: amount("installment value", self.installment_value),
                installments_total: count(self.installments_total),
                down_payment: amount("down payment", self.down_payment),
                paid_installments: count(self.paid_installments),
            },
            ObligationKind::Subscription => ObligationTerms::Subscription {
                billing_cycle,
                recurring_value: amount("recurring value", self.recurring_value),
                subscription_payments: count(self.subscription_payments),
                adjustment_history: self
                    .adjustment_history
                    .iter()
                    .filter_map(AdjustmentRecord::to_event)
                    .collect(),
            },
            ObligationKind::Fixed => ObligationTerms::Fixed {
                recurring_value: amount("recurring value", self.recurring_value),
                subscription_payments: count(self.subscription_payments),
            },
        };

        Ok(Obligation {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name,
            first_payment_date,
            next_due_date,
            terms,
        })
    }
}

impl AdjustmentRecord {
    fn to_event(&self) -> Option<AdjustmentEvent> {
        let Some(changed_at) = parse_date(&self.changed_at) else {
            warn!("dropping adjustment with unparseable date {:?}", self.changed_at);
            return None;
        };
        Some(AdjustmentEvent::new(
            changed_at,
            amount("old value", Some(self.old_value)),
            amount("new value", Some(self.new_value)),
        ))
    }
}

/// a stored cash reserve; legacy rows carry a monthly rate instead of a
/// benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub investment_type: Option<String>,
    #[serde(default)]
    pub benchmark_annual_rate_percent: Option<f64>,
    #[serde(default)]
    pub benchmark_percentage: Option<f64>,
    #[serde(default)]
    pub monthly_rate_percent: Option<f64>,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub principal_value: Option<f64>,
    #[serde(default)]
    pub goal_amount: Option<f64>,
}

impl InvestmentRecord {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn into_investment_box(self, converter: &RateConverter) -> Result<InvestmentBox> {
        let investment_type: InvestmentType =
            self.investment_type.as_deref().unwrap_or_default().parse()?;

        let (benchmark_annual_rate_percent, benchmark_percentage) =
            match (self.benchmark_annual_rate_percent, self.monthly_rate_percent) {
                (None, Some(monthly)) => (
                    converter.monthly_to_annual_percent(percent("monthly rate", Some(monthly))),
                    Decimal::ONE_HUNDRED,
                ),
                (annual, _) => (
                    percent("benchmark annual rate", annual),
                    percent("benchmark percentage", self.benchmark_percentage),
                ),
            };

        let current_value = amount("current value", self.current_value);
        let principal_value = match self.principal_value {
            Some(_) => amount("principal value", self.principal_value),
            None => current_value,
        };

        Ok(InvestmentBox {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name,
            investment_type,
            benchmark_annual_rate_percent: non_negative(benchmark_annual_rate_percent),
            benchmark_percentage: non_negative(benchmark_percentage),
            current_value,
            principal_value,
            goal_amount: amount("goal amount", self.goal_amount),
        })
    }
}

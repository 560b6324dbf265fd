use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::EngineError;

/// unique identifier for an obligation
pub type ObligationId = Uuid;

/// unique identifier for an investment box
pub type BoxId = Uuid;

/// obligation kind, the discriminator of `ObligationTerms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    /// fixed number of equal installments, optionally with a down payment
    Installment,
    /// open-ended recurring charge with a monthly or annual cycle
    Subscription,
    /// open-ended monthly bill (rent, utilities)
    Fixed,
}

impl ObligationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObligationKind::Installment => "installment",
            ObligationKind::Subscription => "subscription",
            ObligationKind::Fixed => "fixed",
        }
    }
}

impl fmt::Display for ObligationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObligationKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "installment" => Ok(ObligationKind::Installment),
            "subscription" => Ok(ObligationKind::Subscription),
            "fixed" => Ok(ObligationKind::Fixed),
            _ => Err(EngineError::UnknownObligationKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// billing cycle of a recurring obligation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Annual,
}

impl BillingCycle {
    /// number of calendar months in one cycle
    pub fn months(&self) -> u32 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Annual => 12,
        }
    }
}

impl FromStr for BillingCycle {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "annual" | "yearly" => Ok(BillingCycle::Annual),
            _ => Err(EngineError::UnknownBillingCycle {
                cycle: s.to_string(),
            }),
        }
    }
}

/// obligation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationStatus {
    /// payments still expected
    Active,
    /// every installment paid
    Paid,
}

/// investment indexing of a cash reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentType {
    /// plain reserve, no yield
    #[default]
    None,
    /// yields a percentage of a benchmark annual rate (stored as "cdb_cdi")
    Indexed,
}

impl FromStr for InvestmentType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(InvestmentType::None),
            "cdb_cdi" | "indexed" => Ok(InvestmentType::Indexed),
            _ => Err(EngineError::UnknownInvestmentType {
                investment_type: s.to_string(),
            }),
        }
    }
}

use thiserror::Error;

use crate::decimal::Money;
use crate::types::ObligationKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("unknown obligation kind: {kind:?}")]
    UnknownObligationKind {
        kind: String,
    },

    #[error("unknown billing cycle: {cycle:?}")]
    UnknownBillingCycle {
        cycle: String,
    },

    #[error("unknown investment type: {investment_type:?}")]
    UnknownInvestmentType {
        investment_type: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("operation not supported for {kind:?} obligations")]
    OperationNotSupported {
        kind: ObligationKind,
    },

    #[error("obligation already paid off")]
    ObligationSettled,

    #[error("payment counter cannot go past {recorded}")]
    PaymentCountExhausted {
        recorded: u32,
    },

    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: Money,
        requested: Money,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod investment;
pub mod obligation;
pub mod obligations;
pub mod records;
pub mod schedule;
pub mod types;

// re-export key types
pub use config::EngineConfig;
pub use decimal::{Money, Rate};
pub use errors::{EngineError, Result};
pub use events::{Event, EventStore};
pub use interest::{GoalSnapshot, RateConverter, ReserveSummary, YieldProjector, YieldSnapshot};
pub use investment::InvestmentBox;
pub use obligation::{AdjustmentEvent, Obligation, ObligationBuilder, ObligationTerms};
pub use obligations::{ObligationCalculator, ObligationSnapshot, ObligationSummary, UpcomingPayment};
pub use records::{AdjustmentRecord, InvestmentRecord, ObligationRecord};
pub use schedule::{
    add_cycles, count_elapsed_cycles, AdjustmentHistoryResolver, CycleCharge, CycleScheduler,
};
pub use types::{BillingCycle, BoxId, InvestmentType, ObligationId, ObligationKind, ObligationStatus};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

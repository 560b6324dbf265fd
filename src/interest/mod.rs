pub mod conversion;
pub mod projection;

pub use conversion::RateConverter;
pub use projection::{GoalSnapshot, ReserveSummary, YieldProjector, YieldSnapshot};

pub mod adjustments;
pub mod cycle;
pub mod scheduler;

pub use adjustments::AdjustmentHistoryResolver;
pub use cycle::{add_cycles, count_elapsed_cycles};
pub use scheduler::{CycleCharge, CycleScheduler};

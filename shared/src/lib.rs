pub mod models;
pub mod period;
pub mod utils;

pub use models::ItemId;
pub use period::{PeriodConfig, TimePeriod};

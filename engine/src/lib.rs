// Engine library root: live price buffer, chart assembly and the services
// feeding them.

pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod services;

pub use data::live_buffer::LiveBuffer;
pub use error::EngineError;

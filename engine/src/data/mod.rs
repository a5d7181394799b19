pub mod historical_loader;
pub mod live_buffer;

// Chart series assembly: historical batch data merged with the live tail
pub mod assembler;
pub mod stats;

pub use assembler::assemble;
pub use stats::compute_stats;

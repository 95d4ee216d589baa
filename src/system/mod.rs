pub mod counters;
pub mod engine;
pub mod platform;
pub mod refresher;
pub mod sampler;
pub mod snapshot;

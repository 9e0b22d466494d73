//! Rolling Buffers
//!
//! Bounded per-frame history used by the wellness trackers:
//! - `RollingBuffer`: fixed capacity, oldest evicted, mean over contents
//! - `TimeWindow`: ordered timestamps evicted once older than a span

mod rolling;
mod window;

pub use rolling::RollingBuffer;
pub use window::TimeWindow;

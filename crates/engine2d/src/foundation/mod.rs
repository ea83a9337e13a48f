//! Shared building blocks for the 2D core
//!
//! - [`math`]: the `Vec2` alias, degree helpers and the world unit size
//! - [`time`]: wall-clock frame deltas and frame-driven stopwatches
//! - [`logging`]: `env_logger` setup and re-exported `log` macros

pub mod logging;
pub mod math;
pub mod time;

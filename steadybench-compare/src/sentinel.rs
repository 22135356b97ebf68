//! Categorical sentinel scalars.
//!
//! Comparison scalars live on a shared numeric scale so sorted tables and
//! quantile plots can rank real values and failure categories together.
//! All sentinels are far below any plausible error value, and NO_BASELINE
//! is strictly below every other sentinel.

pub const INCORRECT: f64 = -1_000.0;

pub const TIMEOUT: f64 = -3_000.0;
pub const MEMORY_EXHAUSTED: f64 = -3_000.0;

pub const NOT_AVAILABLE: f64 = -8_000.0;
pub const NOT_SUPPORTED: f64 = -8_000.0;
pub const ERROR: f64 = -8_000.0;

pub const NO_BASELINE: f64 = -10_000.0;

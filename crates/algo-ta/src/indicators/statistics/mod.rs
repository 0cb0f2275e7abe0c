//! Statistical kernels: regression fits, dispersion, two-series statistics
//! and order statistics.

pub mod correlation;
pub mod dispersion;
pub mod order;
pub mod regression;

pub use correlation::{beta, correlation, correlation_naive, CoMoments, RollingCoMoments};
pub use dispersion::{stdev, variance, variance_naive, VarianceMode};
pub use order::{median, mode, percent_rank};
pub use regression::{linreg, lrslope, tsf};

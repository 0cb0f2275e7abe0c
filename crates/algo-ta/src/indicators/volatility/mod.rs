//! Volatility kernels: ranges, channels, dispersion and ATR-based stops.

pub mod atr;
pub mod bands;
pub mod dispersion;
pub mod stops;
pub mod ulcer;
pub mod vigor;
pub mod vortex;

pub use atr::{atr, atr_lookback, natr, true_range};
pub use bands::{bbands, bbands_lookback, bbpercent, bbwidth, donchian, keltner, starc, BandOutput};
pub use dispersion::{chaikin_volatility, hv, massindex, rvol};
pub use stops::{chandelier_exit, rwi, ChandelierOutput, RwiOutput};
pub use ulcer::{ulcer_index, ulcer_index_lookback, ulcer_index_naive};
pub use vigor::{rvi, swma, RviOutput};
pub use vortex::{vortex, vortex_lookback, vortex_naive, VortexOutput};

indicator_output!(BandOutput { upper, middle, lower });
indicator_output!(ChandelierOutput { long_stop, short_stop });
indicator_output!(RwiOutput { high, low });
indicator_output!(RviOutput { rvi, signal });
indicator_output!(VortexOutput { plus, minus });

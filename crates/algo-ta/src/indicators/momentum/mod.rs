//! Momentum kernels: RSI family, MACD, stochastics and price-position oscillators.

pub mod cci;
pub mod elder;
pub mod fisher;
pub mod macd;
pub mod rsi;
pub mod stochastic;
pub mod ultimate;

pub use cci::cci;
pub use elder::{elderray, ElderRayOutput};
pub use fisher::{fisher, FisherOutput};
pub use macd::{macd, macd_line_lookback, macd_signal_lookback, MacdOutput};
pub use rsi::{crsi, rsi, rsi_lookback, streak};
pub use stochastic::{stochastic, stochastic_lookback, stochastic_raw, williams_r, StochasticOutput};
pub use ultimate::{ultimate_oscillator, ultimate_oscillator_lookback};

indicator_output!(ElderRayOutput { bull_power, bear_power });
indicator_output!(FisherOutput { fisher, trigger });
indicator_output!(MacdOutput { macd, signal, histogram });
indicator_output!(StochasticOutput { k, d });

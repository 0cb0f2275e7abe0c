//! Trend-following kernels: moving averages, adaptive smoothers and
//! displaced trend composites.

pub mod adaptive;
pub mod envelopes;
pub mod ichimoku;
pub mod moving_averages;
pub mod supertrend;

pub use adaptive::{frama, kama, mcginley, vidya};
pub use envelopes::{ma_envelopes, EnvelopeOutput, MaType};
pub use ichimoku::{alligator, ichimoku, AlligatorOutput, IchimokuOutput};
pub use moving_averages::{
    alma, dema, dema_lookback, ema, ema_lookback, ema_wilder, ema_with_alpha, hma, sma,
    sma_lookback, t3, tema, tema_lookback, trima, vwma, wma, zlema,
};
pub use supertrend::{supertrend, supertrend_lookback, SupertrendOutput};

indicator_output!(EnvelopeOutput { upper, middle, lower });
indicator_output!(IchimokuOutput { conversion, base, leading_a, leading_b, lagging });
indicator_output!(AlligatorOutput { jaw, teeth, lips });
indicator_output!(SupertrendOutput { supertrend, direction });

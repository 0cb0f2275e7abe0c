//! Oscillators: rate of change, moving-average spreads, range position,
//! cycle and stop-line kernels.

pub mod chaikin;
pub mod ht;
pub mod range;
pub mod rate;
pub mod smoothed;
pub mod spreads;

pub use chaikin::{cho, ckstop, CkStopOutput};
pub use ht::{ht, ht_lookback};
pub use range::{aroon, aroon_lookback, aroon_oscillator, bop, chop, AroonOutput};
pub use rate::{cmo, coppock, kst, roc, roc_lookback, trix, trix_lookback, KstLengths, KstOutput};
pub use smoothed::{stc, stochrsi, tsi, StochRsiOutput, TsiOutput};
pub use spreads::{
    accelerator_oscillator, awesome_oscillator, dpo, dpo_displacement, po, ppo, PpoOutput,
};

indicator_output!(CkStopOutput { long_stop, short_stop });
indicator_output!(AroonOutput { up, down });
indicator_output!(KstOutput { kst, signal });
indicator_output!(StochRsiOutput { k, d });
indicator_output!(TsiOutput { tsi, signal });
indicator_output!(PpoOutput { ppo, signal, histogram });

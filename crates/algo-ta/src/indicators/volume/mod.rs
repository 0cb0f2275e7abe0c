//! Volume kernels: cumulative flow lines, money-flow ratios and volume oscillators.

pub mod accumulation;
pub mod money_flow;
pub mod pressure;

pub use accumulation::{adl, money_flow_volume, nvi, obv, pvi, pvt};
pub use money_flow::{cmf, mfi, vwap};
pub use pressure::{emv, force_index, kvo, volosc, vroc, KvoOutput};

indicator_output!(KvoOutput { kvo, signal });

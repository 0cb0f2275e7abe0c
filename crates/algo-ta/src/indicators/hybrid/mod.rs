//! Hybrid kernels: directional movement, stop-and-reverse, swing structure
//! and the Gator oscillator.

use crate::indicators::{flags_to_column, IndicatorOutput};
use crate::traits::SeriesElement;

pub mod directional;
pub mod gator;
pub mod pivots;
pub mod psar;

pub use directional::{adx, adx_lookback, dmi, AdxOutput, DmiOutput};
pub use gator::{gator_oscillator, GatorOutput};
pub use pivots::{fractals, pivot_points, zigzag, FractalsOutput, PivotOutput, ZigzagOutput};
pub use psar::{psar, psar_lookback};

indicator_output!(AdxOutput { di_plus, di_minus, adx });
indicator_output!(DmiOutput { di_plus, di_minus });
indicator_output!(GatorOutput { upper, lower });
indicator_output!(PivotOutput { pivot, r1, s1, r2, s2, r3, s3 });
indicator_output!(ZigzagOutput { line, direction });

impl<T: SeriesElement> IndicatorOutput<T> for FractalsOutput {
    const FIELDS: &'static [&'static str] = &["up", "down"];

    fn len(&self) -> usize {
        self.up.len()
    }

    fn into_columns(self) -> Vec<Vec<T>> {
        vec![flags_to_column(self.up), flags_to_column(self.down)]
    }
}

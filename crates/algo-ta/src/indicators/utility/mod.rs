//! Utility combinators used both as indicators and as building blocks.

pub mod cross;
pub mod signals;

pub use cross::{change, cross, crossover, crossunder, falling, highest, lowest, rising};
pub use signals::{exrem, flip, to_flags, valuewhen};

mod realized_gain_calculator;

pub use realized_gain_calculator::*;

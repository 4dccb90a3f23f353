pub mod complex;
pub mod cubic;
pub mod deg;
pub mod is_zero;
pub mod quadratic;
pub mod round;

pub mod amount;
pub mod date_range;

pub mod activity;
pub mod series;
pub mod units;

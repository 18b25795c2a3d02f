//! Axum server run as a supervised unit.

mod unit;

pub use unit::HttpServerUnit;

pub mod financing;
pub mod schedule;
pub mod tracking;

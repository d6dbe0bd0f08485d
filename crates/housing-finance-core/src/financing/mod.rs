pub mod calculator;
pub mod clamping;
pub mod comparison;
pub mod policy;
pub mod simulator;

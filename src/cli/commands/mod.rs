//! Command implementations

pub mod leaves;
pub mod mutate;

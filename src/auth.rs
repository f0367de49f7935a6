//! Token models and the normalization rules that turn raw callback output into them.

pub mod token;

pub use token::{record::*, response::*, secret::*};

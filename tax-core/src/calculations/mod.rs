//! Tax calculation modules.
//!
//! This module provides the progressive (marginal bracket) tax calculation
//! and the numeric helpers shared with presentation code.

pub mod common;
pub mod progressive;

pub use progressive::{TaxCalculator, calculate_tax};

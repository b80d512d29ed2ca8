//! Shared utilities for the FoodHub gateway.
//!
//! - [`carrier`]: the cookie transport for session tokens

pub mod carrier;

//! Auth module.
//!
//! Registration, login, logout and refresh-token rotation. Tokens are only
//! ever written to and read from cookies via [`crate::utils::carrier`].

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

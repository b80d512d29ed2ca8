//! Users module.
//!
//! Profile and delivery-address management for the signed-in user. Storage
//! sits behind [`directory::UserDirectory`].

pub mod controller;
pub mod directory;
pub mod model;
pub mod router;
pub mod service;

//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod ledger;
pub mod persistence;
pub mod ports;
pub mod services;
pub mod text;

//! Infrastructure implementations.
//!
//! Contains port trait definitions and their in-process implementations.

pub mod config;
pub mod correlation;
pub mod locks;
pub mod memory;
pub mod ports;
pub mod random;

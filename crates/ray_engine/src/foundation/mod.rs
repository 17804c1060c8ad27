//! Foundation module - core utilities and types
//!
//! Math types shared by every other module.

pub mod math;

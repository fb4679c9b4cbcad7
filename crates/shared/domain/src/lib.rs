//! # Domain Models
//!
//! Plain configuration types and shared constants. Only `serde` is allowed here; anything that
//! performs I/O or validation belongs in the kernel or a feature crate.

pub mod config;
pub mod constants;

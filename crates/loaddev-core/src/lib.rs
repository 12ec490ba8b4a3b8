//! # loaddev-core
//!
//! Core types shared by every LoadDev crate:
//! - Physical quantities with UCUM units and their JSON codec
//! - Monetary amounts for component costs
//! - Entity structs for rifles, loads, groups, shots, and components
//! - Field validation with client-facing error messages
//! - Velocity statistics for groups and loads
//! - Caller identity and cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod money;
pub mod quantity;
pub mod statistics;
pub mod validation;

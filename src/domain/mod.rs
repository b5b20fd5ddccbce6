//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, timestamps, errors)
//! - `message` - Stored message records, body validation, minute grouping

pub mod foundation;
pub mod message;

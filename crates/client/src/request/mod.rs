//! Request module - tracking payload assembly
//!
//! Builds the JSON payload for one tracking event from attribute/value
//! assignments and validates it against the attribute schema.

mod builder;


pub use builder::RequestBuilder;

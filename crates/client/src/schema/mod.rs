//! Schema module - the static attribute catalogue
//!
//! Every field a tracking payload may carry is an [`Attribute`]. Attributes
//! form a small forest rooted at the root attributes (`tealium`, `page`,
//! `user`, ...); each node knows its parent and which of its children are
//! required wherever it is instantiated.

mod attribute;

#[cfg(test)]
mod attribute_test;

pub use attribute::Attribute;

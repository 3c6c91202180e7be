//! Trackit Client Library
//!
//! This crate assembles tracking payloads from a fixed attribute schema.
//! It is used by:
//!
//! - **trackit-tracking**: builds and validates the payload of each tracked call chain
//! - **Tests**: constructing payloads directly without the async machinery
//!
//! # Architecture
//!
//! - [`schema`] - Static attribute catalogue (names, parents, required children)
//! - [`value`] - Typed primitive values
//! - [`request`] - Payload builder and validation
//!
//! # Quick Start
//!
//! ```
//! use trackit_client::{Attribute, RequestBuilder, Value};
//!
//! let mut builder = RequestBuilder::new();
//! builder.set_all([
//!     (Attribute::TealiumAccount, Value::string("acme")),
//!     (Attribute::TealiumProfile, Value::string("main")),
//!     (Attribute::TealiumEvent, Value::string("page_view")),
//!     (Attribute::PageName, Value::string("Home")),
//!     (Attribute::PageUrl, Value::string("https://example.com")),
//!     (Attribute::UserVisitorType, Value::string("guest")),
//!     (Attribute::UserSignedIn, Value::boolean(false)),
//!     (Attribute::DeviceType, Value::string("desktop")),
//!     (Attribute::UserChannel, Value::string("web")),
//!     (Attribute::Attribution, Value::string("direct")),
//!     (Attribute::Environment, Value::string("prod")),
//! ]);
//!
//! let payload = builder.build().unwrap();
//! assert!(payload.starts_with(r#"{"tealium":{"account":"acme""#));
//! ```
//!
//! # Wire Format
//!
//! A JSON object whose top-level keys are the populated root attributes.
//! Nested attributes are nested objects following the schema path; leaves hold
//! the primitive's native JSON representation.

mod error;

pub mod request;
pub mod schema;
pub mod value;

pub use error::{BuilderError, Result};
pub use request::RequestBuilder;
pub use schema::Attribute;
pub use value::{Value, ValueKind};

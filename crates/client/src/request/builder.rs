//! Tracking request builder
//!
//! Assembles an insertion-ordered JSON object from attribute assignments.
//! Intermediate objects are created lazily, the first time an attribute below
//! them is set, and each creation records the required-children list of the
//! attribute it was created for. Validation consults those recorded lists
//! rather than re-reading the schema.

use std::collections::HashMap;

use serde_json::{Map, Value as Json};
use tracing::trace;

use crate::error::{BuilderError, Result};
use crate::schema::Attribute;
use crate::value::Value;

/// Builder for a single tracking payload
///
/// # Example
///
/// ```
/// use trackit_client::{Attribute, RequestBuilder, Value};
///
/// let mut builder = RequestBuilder::new();
/// builder
///     .set(Attribute::PageName, "Home")
///     .set(Attribute::EmailHidden, Value::boolean(true))
///     .set(Attribute::Environment, "prod");
///
/// let json = builder.to_json();
/// assert_eq!(json["page"]["name"], "Home");
/// assert_eq!(json["user"]["email"]["hidden"], true);
///
/// // tealium, user and attribution are still incomplete
/// assert!(builder.build().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    root: Map<String, Json>,
    /// Required children bound at node creation, keyed by node name
    required_fields: HashMap<&'static str, &'static [Attribute]>,
}

impl RequestBuilder {
    /// Create an empty builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a value to an attribute
    ///
    /// Missing intermediate objects along the attribute's schema path are
    /// created. Assigning the same attribute again overwrites the previous
    /// value. Root attributes are stored directly at the top level.
    pub fn set(&mut self, attribute: Attribute, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        let mut node = &mut self.root;

        if !attribute.is_root() {
            let (root, path) = attribute.path();
            let ancestors = std::iter::once(root).chain(path[..path.len() - 1].iter().copied());
            for ancestor in ancestors {
                node = child_object(node, ancestor, &mut self.required_fields);
            }
        }

        trace!(attribute = %attribute, kind = %value.kind(), "Attribute set");
        node.insert(attribute.name().to_string(), value.to_json());
        self
    }

    /// Apply several assignments in order (later ones win on the same path)
    pub fn set_all<I, V>(&mut self, assignments: I) -> &mut Self
    where
        I: IntoIterator<Item = (Attribute, V)>,
        V: Into<Value>,
    {
        for (attribute, value) in assignments {
            self.set(attribute, value);
        }
        self
    }

    /// Serialize the payload and validate it
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Validation`] listing every missing required
    /// field when the payload is incomplete.
    pub fn build(&self) -> Result<String> {
        let payload = serde_json::to_string(&self.root)?;
        trace!(payload = %payload, "Tracking payload serialized");
        self.validate()?;
        Ok(payload)
    }

    /// Check the payload against the required fields recorded so far
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Validation`] when any required field is missing.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BuilderError::validation(missing))
        }
    }

    /// Dotted paths of every missing required field
    ///
    /// A required root that is absent is reported by name. A present root is
    /// checked against its recorded required children, then every object
    /// beneath it is checked the same way.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();

        for root in Attribute::REQUIRED_ROOTS {
            match self.root.get(root.name()) {
                None => missing.push(root.name().to_string()),
                Some(Json::Object(node)) => {
                    self.collect_missing(root.name(), root.name(), node, &mut missing)
                }
                // Scalar roots such as `environment` have nothing below them
                Some(_) => {}
            }
        }

        missing
    }

    fn collect_missing(
        &self,
        prefix: &str,
        name: &str,
        node: &Map<String, Json>,
        missing: &mut Vec<String>,
    ) {
        let Some(required) = self.required_fields.get(name) else {
            return;
        };

        for attribute in required.iter() {
            if !node.contains_key(attribute.name()) {
                missing.push(format!("{prefix}.{}", attribute.name()));
            }
        }

        for (key, child) in node {
            if let Json::Object(child) = child {
                self.collect_missing(&format!("{prefix}.{key}"), key, child, missing);
            }
        }
    }

    /// Value currently stored for an attribute, if any
    pub fn get(&self, attribute: Attribute) -> Option<&Json> {
        let (root, path) = attribute.path();
        let mut current = self.root.get(root.name())?;
        for step in path {
            current = current.as_object()?.get(step.name())?;
        }
        Some(current)
    }

    /// Copy of the payload tree
    pub fn to_json(&self) -> Json {
        Json::Object(self.root.clone())
    }

    /// Whether nothing has been set yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Get or create the object stored under `attribute` in `parent`
///
/// A scalar occupying the key is replaced. The attribute's required children
/// are recorded only the first time a node of that name is created.
fn child_object<'a>(
    parent: &'a mut Map<String, Json>,
    attribute: Attribute,
    required_fields: &mut HashMap<&'static str, &'static [Attribute]>,
) -> &'a mut Map<String, Json> {
    let key = attribute.name();

    if !matches!(parent.get(key), Some(Json::Object(_))) {
        parent.insert(key.to_string(), Json::Object(Map::new()));
        required_fields
            .entry(key)
            .or_insert_with(|| attribute.required_children());
    }

    match parent.get_mut(key) {
        Some(Json::Object(node)) => node,
        _ => unreachable!("object node inserted above"),
    }
}

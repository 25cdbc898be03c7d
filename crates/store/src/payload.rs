//! Normalized push payloads.
//!
//! The adapter/serializer boundary hands the store records in normalized
//! form: `{type, id, attributes, relationships}`. Payloads are built with a
//! fluent constructor and validated when pushed.

use alloc::string::String;
use alloc::vec::Vec;
use liveset_core::{RecordIdentity, Value};

/// One normalized record payload.
#[derive(Clone, Debug)]
pub struct PushPayload {
    rtype: String,
    id: String,
    attributes: Vec<(String, Value)>,
    relationships: Vec<(String, Vec<RecordIdentity>)>,
}

impl PushPayload {
    /// Creates a payload for `(type, id)`.
    pub fn new(rtype: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            rtype: rtype.into(),
            id: id.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Adds an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds a relationship reference list.
    pub fn relationship(
        mut self,
        name: impl Into<String>,
        targets: Vec<RecordIdentity>,
    ) -> Self {
        self.relationships.push((name.into(), targets));
        self
    }

    /// Returns the record type name.
    #[inline]
    pub fn record_type(&self) -> &str {
        &self.rtype
    }

    /// Returns the record id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the attribute list.
    #[inline]
    pub fn attributes(&self) -> &[(String, Value)] {
        &self.attributes
    }

    /// Returns the relationship list.
    #[inline]
    pub fn relationships(&self) -> &[(String, Vec<RecordIdentity>)] {
        &self.relationships
    }

    /// The identity this payload addresses.
    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity::remote(self.rtype.clone(), self.id.clone())
    }
}

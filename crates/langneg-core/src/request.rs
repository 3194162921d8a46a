//! Request abstraction
//!
//! The negotiator touches exactly two things on a request: one header (read)
//! and one named attribute (written). Updating consumes the request and
//! hands back the changed value, so the caller's copy is never mutated
//! behind its back.

use std::collections::HashMap;

/// The request operations negotiation relies on.
pub trait NegotiationRequest: Sized {
    /// Combined value of every header field called `name`, joined by `", "`.
    /// `None` when the header is missing or blank.
    fn header_line(&self, name: &str) -> Option<String>;

    /// Return the request with attribute `name` set to `value`, replacing any
    /// previous value.
    fn with_attribute(self, name: &str, value: String) -> Self;

    fn attribute(&self, name: &str) -> Option<&str>;
}

/// Named string attributes, stored as a request extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestAttributes(HashMap<String, String>);

impl RequestAttributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<B> NegotiationRequest for http::Request<B> {
    fn header_line(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .headers()
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    fn with_attribute(mut self, name: &str, value: String) -> Self {
        let extensions = self.extensions_mut();
        match extensions.get_mut::<RequestAttributes>() {
            Some(attributes) => {
                attributes.insert(name, value);
            }
            None => {
                let mut attributes = RequestAttributes::default();
                attributes.insert(name, value);
                extensions.insert(attributes);
            }
        }
        self
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.extensions()
            .get::<RequestAttributes>()
            .and_then(|attributes| attributes.get(name))
    }
}

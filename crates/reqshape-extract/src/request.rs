//! # Request Assembly
//!
//! Route schemas address the whole request, not only its body:
//!
//! ```json
//! {"params": {..}, "query": {..}, "headers": {..}, "body": ..}
//! ```
//!
//! [`RequestParts`] collects those pieces from whatever HTTP stack sits
//! in front and renders that document. Path parameters and headers are
//! string maps. A query key that appears more than once becomes an
//! array of its values in arrival order. Header names are lower-cased.

use serde_json::{Map, Value};

/// The raw pieces of one inbound request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParts {
    params: Map<String, Value>,
    query: Map<String, Value>,
    headers: Map<String, Value>,
    body: Value,
}

impl RequestParts {
    /// An empty request: no params, query, headers or body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), Value::String(value.into()));
        self
    }

    /// Add query-string pairs. Repeated keys collect into an array.
    pub fn with_query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            let key = key.into();
            let value = Value::String(value.into());
            match self.query.get_mut(&key) {
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    self.query.insert(key, value);
                }
            }
        }
        self
    }

    /// Add a header. The name is lower-cased; a repeated header
    /// replaces the earlier value.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), Value::String(value.into()));
        self
    }

    /// Set the decoded JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Render the document that route schemas address. A request with
    /// no body has no `body` key.
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("params".to_owned(), Value::Object(self.params.clone()));
        doc.insert("query".to_owned(), Value::Object(self.query.clone()));
        doc.insert("headers".to_owned(), Value::Object(self.headers.clone()));
        if !self.body.is_null() {
            doc.insert("body".to_owned(), self.body.clone());
        }
        Value::Object(doc)
    }
}

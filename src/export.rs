//! # Component Exports
//!
//! A loaded component hands back an [`Export`]: a small closed set of shapes
//! that [`normalize`] reduces to an ordered list of [`Document`]s.
//!
//! - [`Export::Value`]: a single document.
//! - [`Export::Sequence`]: an ordered list of documents.
//! - [`Export::Thunk`]: a deferred computation producing another export.
//! - [`Export::Pending`]: an asynchronous computation producing another export.
//! - [`Export::Default`]: a default-export wrapper, equivalent to its contents.
//!
//! Reduction repeatedly unwraps, calls, and awaits until it reaches a value or
//! a sequence, so a thunk returning a pending sequence yields the sequence's
//! elements. Indices are only assigned to that final sequence.

use std::fmt;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::BoxError;
use crate::validate::Validator;

/// Key marking an object as a default-export wrapper.
const INTEROP_MARKER: &str = "__esModule";

/// Key holding the wrapped value of a default-export wrapper.
const DEFAULT_KEY: &str = "default";

/// One unit of data produced by a component, with its optional validation
/// capability.
pub struct Document {
    /// The manifest data.
    pub data: Value,
    /// Self-check invoked when validation is requested.
    pub validator: Option<Validator>,
}

impl Document {
    /// A document without a validation capability.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            validator: None,
        }
    }

    /// Attach a validation capability to this document.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }
}

impl From<Value> for Document {
    fn from(data: Value) -> Self {
        Document::new(data)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("data", &self.data)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// The raw value a component designates as its result.
pub enum Export {
    Value(Document),
    Sequence(Vec<Document>),
    Thunk(Box<dyn FnOnce() -> Export + Send>),
    Pending(BoxFuture<'static, Result<Export, BoxError>>),
    Default(Box<Export>),
}

impl Export {
    /// Wrap a closure as a deferred export.
    pub fn thunk<F>(f: F) -> Self
    where
        F: FnOnce() -> Export + Send + 'static,
    {
        Export::Thunk(Box::new(f))
    }

    /// Wrap a future as a pending export.
    pub fn pending<F>(future: F) -> Self
    where
        F: std::future::Future<Output = Result<Export, BoxError>> + Send + 'static,
    {
        Export::Pending(Box::pin(future))
    }

    /// Build an export from plain data.
    ///
    /// Arrays become sequences, and an object carrying the interop marker
    /// together with a `default` field becomes a default-export wrapper.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Export::Sequence(items.into_iter().map(Document::new).collect()),
            Value::Object(mut map)
                if map.get(INTEROP_MARKER).and_then(Value::as_bool) == Some(true)
                    && map.contains_key(DEFAULT_KEY) =>
            {
                let inner = map.remove(DEFAULT_KEY).unwrap_or(Value::Null);
                Export::Default(Box::new(Export::from_value(inner)))
            }
            other => Export::Value(Document::new(other)),
        }
    }
}

impl From<Value> for Export {
    fn from(value: Value) -> Self {
        Export::from_value(value)
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Export::Value(doc) => f.debug_tuple("Value").field(doc).finish(),
            Export::Sequence(docs) => f.debug_tuple("Sequence").field(docs).finish(),
            Export::Thunk(_) => f.write_str("Thunk(..)"),
            Export::Pending(_) => f.write_str("Pending(..)"),
            Export::Default(inner) => f.debug_tuple("Default").field(inner).finish(),
        }
    }
}

/// Reduce an export to its ordered documents.
///
/// Fails only when a pending export resolves to an error; the caller
/// attributes that failure to the component being loaded.
pub async fn normalize(export: Export) -> Result<Vec<Document>, BoxError> {
    let mut current = export;
    loop {
        current = match current {
            Export::Default(inner) => *inner,
            Export::Thunk(call) => call(),
            Export::Pending(future) => future.await?,
            Export::Sequence(docs) => return Ok(docs),
            Export::Value(doc) => return Ok(vec![doc]),
        };
    }
}

//! Manifest validation.
//!
//! A [`Document`](crate::export::Document) may carry a [`Validator`], its own
//! self-check. When validation is requested the validator runs against the
//! manifest's data and may mutate it in place; whatever the data looks like
//! afterwards is what ends up in the result. A failure, synchronous or
//! asynchronous, becomes [`Error::Validation`] attributed to the manifest.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::{BoxError, Error, Result};
use crate::generate::Manifest;

type SyncCheck = Box<dyn FnOnce(&mut Value) -> std::result::Result<(), BoxError> + Send>;
type AsyncCheck =
    Box<dyn FnOnce(Value) -> BoxFuture<'static, std::result::Result<Value, BoxError>> + Send>;

/// A validation capability attached to a document.
pub enum Validator {
    /// Checks, and possibly rewrites, the data in place.
    Sync(SyncCheck),
    /// Takes the data and resolves to the (possibly rewritten) data.
    Async(AsyncCheck),
}

impl Validator {
    pub fn sync<F>(check: F) -> Self
    where
        F: FnOnce(&mut Value) -> std::result::Result<(), BoxError> + Send + 'static,
    {
        Validator::Sync(Box::new(check))
    }

    pub fn future<F, Fut>(check: F) -> Self
    where
        F: FnOnce(Value) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<Value, BoxError>> + Send + 'static,
    {
        Validator::Async(Box::new(
            move |data| -> BoxFuture<'static, std::result::Result<Value, BoxError>> {
                Box::pin(check(data))
            },
        ))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Sync(_) => f.write_str("Validator::Sync(..)"),
            Validator::Async(_) => f.write_str("Validator::Async(..)"),
        }
    }
}

/// Run `validator` against `manifest`.
///
/// A manifest without a validator is valid as-is.
pub async fn validate(manifest: &mut Manifest, validator: Option<Validator>) -> Result<()> {
    let outcome = match validator {
        None => return Ok(()),
        Some(Validator::Sync(check)) => check(&mut manifest.data),
        Some(Validator::Async(check)) => {
            let data = std::mem::take(&mut manifest.data);
            check(data).await.map(|data| manifest.data = data)
        }
    };

    outcome.map_err(|source| Error::Validation {
        path: manifest.path.clone(),
        index: manifest.index,
        source,
    })
}

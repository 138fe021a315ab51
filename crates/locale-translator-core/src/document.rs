//! Nested key/value documents and the leaf-translating walk.
//!
//! A [`Document`] is a JSON object whose insertion order is preserved. String
//! values are leaves and get translated, object values are recursed into, and
//! every other value (arrays, numbers, booleans, null) is copied through
//! unchanged. Arrays are deliberately not translated.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{Error, Result};

/// Ordered mapping from keys to JSON values
pub type Document = Map<String, Value>;

/// Translates one string leaf at a time.
///
/// Implementors hold whatever per-run state they need (an open browser
/// session, resolved API language codes) for a single language pair.
#[async_trait]
pub trait LeafTranslator: Send {
    async fn translate_leaf(&mut self, text: &str) -> Result<String>;
}

/// Translate every string leaf of `doc`, returning a new document with the
/// same keys, key order and nesting.
///
/// Leaves are translated strictly one after another; the first failure
/// aborts the walk.
pub fn translate_document_with<'a, T>(doc: Document, translator: &'a mut T) -> BoxFuture<'a, Result<Document>>
where
    T: LeafTranslator + ?Sized,
{
    async move {
        let mut out = Map::with_capacity(doc.len());
        for (key, value) in doc {
            let value = match value {
                Value::String(text) => Value::String(translator.translate_leaf(&text).await?),
                Value::Object(nested) => Value::Object(translate_document_with(nested, &mut *translator).await?),
                other => other,
            };
            out.insert(key, value);
        }
        Ok::<_, Error>(out)
    }
    .boxed()
}

/// Parse a document from JSON text.
///
/// A top-level `null` is an empty document; any other non-object root is
/// rejected.
pub fn parse_document(text: &str) -> Result<Document> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Document::new()),
        other => Err(Error::Parse(format!(
            "document root must be a JSON object, found {}",
            value_kind(&other)
        ))),
    }
}

/// Serialize a document as indented JSON with non-ASCII characters written literally.
pub fn render_document(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub async fn read_document(path: &Path) -> Result<Document> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_document(&text)
}

pub async fn write_document(path: &Path, doc: &Document) -> Result<()> {
    let text = render_document(doc)?;
    tokio::fs::write(path, text).await?;
    Ok(())
}

/// Structural fingerprint of a value: objects keep their ordered keys, string
/// leaves collapse to a marker, everything else is kept verbatim.
///
/// Two documents have the same shape exactly when only their string leaves differ.
pub fn shape(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), shape(v))).collect()),
        Value::String(_) => Value::String("<leaf>".to_string()),
        other => other.clone(),
    }
}

/// Count string leaves that a walk would translate.
pub fn leaf_count(doc: &Document) -> usize {
    doc.values()
        .map(|value| match value {
            Value::String(_) => 1,
            Value::Object(nested) => leaf_count(nested),
            _ => 0,
        })
        .sum()
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

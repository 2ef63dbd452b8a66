//! Serde types matching the Firestore REST API.
//!
//! Document fields arrive as typed values (`{"stringValue": "..."}`). Decoding
//! is lenient: missing or oddly typed fields fall back to defaults so that
//! hand-edited documents still show up.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use crate::library::{Book, NewBook};

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDocument {
  /// Full resource name, ending in the document id
  pub name: String,
  #[serde(default)]
  pub fields: BTreeMap<String, Value>,
}

impl ApiDocument {
  /// Last path segment of the resource name
  pub fn id(&self) -> &str {
    self.name.rsplit('/').next().unwrap_or(&self.name)
  }

  pub fn into_book(self) -> Book {
    let id = self.id().to_string();
    let title = string_field(&self.fields, "title");
    let author = string_field(&self.fields, "author");
    let year = year_field(&self.fields, &id);
    let genre = string_field(&self.fields, "genre");
    let read = bool_field(&self.fields, "read");

    Book {
      id,
      title,
      author,
      year,
      genre,
      read,
    }
  }
}

/// Request body for creating a document.
#[derive(Debug, Serialize)]
pub struct ApiWriteDocument {
  pub fields: Map<String, Value>,
}

impl From<&NewBook> for ApiWriteDocument {
  fn from(book: &NewBook) -> Self {
    let mut fields = Map::new();
    fields.insert("title".into(), json!({ "stringValue": book.title }));
    fields.insert("author".into(), json!({ "stringValue": book.author }));
    // int64 values travel as decimal strings
    fields.insert(
      "year".into(),
      json!({ "integerValue": book.year.to_string() }),
    );
    fields.insert("genre".into(), json!({ "stringValue": book.genre }));
    fields.insert("read".into(), json!({ "booleanValue": book.read }));
    Self { fields }
  }
}

fn string_field(fields: &BTreeMap<String, Value>, name: &str) -> String {
  fields
    .get(name)
    .and_then(|v| v.get("stringValue"))
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string()
}

fn bool_field(fields: &BTreeMap<String, Value>, name: &str) -> bool {
  fields
    .get(name)
    .and_then(|v| v.get("booleanValue"))
    .and_then(Value::as_bool)
    .unwrap_or(false)
}

fn year_field(fields: &BTreeMap<String, Value>, id: &str) -> u32 {
  let Some(value) = fields.get("year") else {
    return 0;
  };

  let year = if let Some(s) = value.get("integerValue").and_then(Value::as_str) {
    s.parse::<i64>().ok()
  } else if let Some(n) = value.get("integerValue").and_then(Value::as_i64) {
    Some(n)
  } else {
    value
      .get("doubleValue")
      .and_then(Value::as_f64)
      .map(|f| f as i64)
  };

  match year.map(u32::try_from) {
    Some(Ok(year)) => year,
    _ => {
      warn!(id, value = %value, "unusable year field, using 0");
      0
    }
  }
}

// ============================================================================
// List documents endpoint response
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiListDocumentsResponse {
  #[serde(default)]
  pub documents: Vec<ApiDocument>,
  pub next_page_token: Option<String>,
}

// ============================================================================
// runQuery endpoint
// ============================================================================

/// One element of the runQuery response stream. Elements without a document
/// only carry read metadata.
#[derive(Debug, Deserialize)]
pub struct ApiRunQueryItem {
  pub document: Option<ApiDocument>,
}

/// Structured query selecting documents whose `field` equals `value`.
pub fn equality_query(collection: &str, field: &str, value: &str) -> Value {
  json!({
    "structuredQuery": {
      "from": [{ "collectionId": collection }],
      "where": {
        "fieldFilter": {
          "field": { "fieldPath": field },
          "op": "EQUAL",
          "value": { "stringValue": value }
        }
      }
    }
  })
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
  pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub status: String,
}

/// Best-effort message from an error response body.
pub fn error_message(body: &str) -> String {
  match serde_json::from_str::<ApiErrorBody>(body) {
    Ok(parsed) if !parsed.error.status.is_empty() => {
      format!("{}: {}", parsed.error.status, parsed.error.message)
    }
    Ok(parsed) => parsed.error.message,
    Err(_) => body.trim().to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn document(fields: Value) -> ApiDocument {
    serde_json::from_value(json!({
      "name": "projects/p/databases/(default)/documents/library/doc42",
      "fields": fields,
      "createTime": "2024-01-01T00:00:00Z",
      "updateTime": "2024-01-01T00:00:00Z"
    }))
    .unwrap()
  }

  #[test]
  fn test_decode_full_document() {
    let book = document(json!({
      "title": { "stringValue": "The Hobbit" },
      "author": { "stringValue": "J.R.R. Tolkien" },
      "year": { "integerValue": "1937" },
      "genre": { "stringValue": "Fantasy" },
      "read": { "booleanValue": true }
    }))
    .into_book();

    assert_eq!(book.id, "doc42");
    assert_eq!(book.title, "The Hobbit");
    assert_eq!(book.author, "J.R.R. Tolkien");
    assert_eq!(book.year, 1937);
    assert_eq!(book.genre, "Fantasy");
    assert!(book.read);
  }

  #[test]
  fn test_decode_legacy_document_uses_defaults() {
    let book = document(json!({
      "title": { "stringValue": "Untitled draft" },
      "year": { "doubleValue": 2001.0 }
    }))
    .into_book();

    assert_eq!(book.author, "");
    assert_eq!(book.genre, "");
    assert_eq!(book.year, 2001);
    assert!(!book.read);
  }

  #[test]
  fn test_decode_negative_year_is_zero() {
    let book = document(json!({ "year": { "integerValue": "-5" } })).into_book();
    assert_eq!(book.year, 0);
  }

  #[test]
  fn test_document_without_fields() {
    let doc: ApiDocument =
      serde_json::from_value(json!({ "name": "projects/p/databases/d/documents/library/x" }))
        .unwrap();
    assert_eq!(doc.into_book().id, "x");
  }

  #[test]
  fn test_encode_new_book() {
    let book = NewBook {
      title: "Dune".to_string(),
      author: "Frank Herbert".to_string(),
      year: 1965,
      genre: String::new(),
      read: false,
    };
    let body = serde_json::to_value(ApiWriteDocument::from(&book)).unwrap();

    assert_eq!(body["fields"]["title"]["stringValue"], "Dune");
    assert_eq!(body["fields"]["author"]["stringValue"], "Frank Herbert");
    assert_eq!(body["fields"]["year"]["integerValue"], "1965");
    assert_eq!(body["fields"]["genre"]["stringValue"], "");
    assert_eq!(body["fields"]["read"]["booleanValue"], false);
  }

  #[test]
  fn test_written_fields_decode_back() {
    let book = NewBook {
      title: "Emma".to_string(),
      author: "Jane Austen".to_string(),
      year: 1815,
      genre: "Novel".to_string(),
      read: true,
    };
    let written = serde_json::to_value(ApiWriteDocument::from(&book)).unwrap();
    let decoded = document(written["fields"].clone()).into_book();
    assert_eq!(decoded, book.into_book("doc42".to_string()));
  }

  #[test]
  fn test_list_response_empty_collection() {
    let response: ApiListDocumentsResponse = serde_json::from_str("{}").unwrap();
    assert!(response.documents.is_empty());
    assert!(response.next_page_token.is_none());
  }

  #[test]
  fn test_run_query_items_without_documents() {
    let items: Vec<ApiRunQueryItem> =
      serde_json::from_str(r#"[{"readTime": "2024-01-01T00:00:00Z"}]"#).unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].document.is_none());
  }

  #[test]
  fn test_equality_query_shape() {
    let query = equality_query("library", "title", "Dune");
    let filter = &query["structuredQuery"]["where"]["fieldFilter"];
    assert_eq!(query["structuredQuery"]["from"][0]["collectionId"], "library");
    assert_eq!(filter["field"]["fieldPath"], "title");
    assert_eq!(filter["op"], "EQUAL");
    assert_eq!(filter["value"]["stringValue"], "Dune");
  }

  #[test]
  fn test_error_message() {
    let body = r#"{"error":{"code":403,"message":"Missing permissions","status":"PERMISSION_DENIED"}}"#;
    assert_eq!(error_message(body), "PERMISSION_DENIED: Missing permissions");
    assert_eq!(error_message("  plain text "), "plain text");
  }
}

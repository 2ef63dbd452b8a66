//! Cloud Firestore collection over the REST API.

mod auth;
mod document;

pub use auth::{Authorizer, ServiceAccountKey, TokenSource};

use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use reqwest::Response;
use std::time::Duration;
use tracing::debug;
use url::Url;

use self::document::{
  equality_query, error_message, ApiDocument, ApiListDocumentsResponse, ApiRunQueryItem,
  ApiWriteDocument,
};
use super::BookStore;
use crate::config::Config;
use crate::library::{Book, NewBook};

const PAGE_SIZE: u32 = 300;
/// Project used against the emulator when none is configured
const EMULATOR_PROJECT: &str = "demo-bookshelf";

/// Firestore-backed book collection.
pub struct FirestoreStore {
  http: reqwest::Client,
  auth: Authorizer,
  project_id: String,
  /// API root, e.g. https://firestore.googleapis.com/v1/
  endpoint: Url,
  /// projects/{project}/databases/{database}/documents
  documents_path: String,
  collection: String,
}

impl FirestoreStore {
  pub fn new(config: &Config) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.firestore.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    let (auth, project_id, endpoint) = match config.emulator_host() {
      Some(host) => {
        let project_id = config
          .firestore
          .project_id
          .clone()
          .unwrap_or_else(|| EMULATOR_PROJECT.to_string());
        let endpoint = parse_endpoint(&format!("http://{}/v1/", host))?;
        (Authorizer::Emulator, project_id, endpoint)
      }
      None => {
        let key = ServiceAccountKey::from_file(&config.credentials_path()?)?;
        let project_id = config
          .firestore
          .project_id
          .clone()
          .unwrap_or_else(|| key.project_id.clone());
        let endpoint = parse_endpoint(&config.firestore.endpoint)?;
        (
          Authorizer::ServiceAccount(TokenSource::new(key, http.clone())),
          project_id,
          endpoint,
        )
      }
    };

    let documents_path = format!(
      "projects/{}/databases/{}/documents",
      project_id, config.firestore.database
    );

    Ok(Self {
      http,
      auth,
      project_id,
      endpoint,
      documents_path,
      collection: config.collection.clone(),
    })
  }

  fn url(&self, path: &str) -> Result<Url> {
    self
      .endpoint
      .join(path)
      .map_err(|e| eyre!("Invalid Firestore URL for {}: {}", path, e))
  }

  fn collection_url(&self) -> Result<Url> {
    self.url(&format!("{}/{}", self.documents_path, self.collection))
  }

  async fn list_documents(&self) -> Result<Vec<Book>> {
    let mut books = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
      let mut url = self.collection_url()?;
      {
        let mut query = url.query_pairs_mut();
        query.append_pair("pageSize", &PAGE_SIZE.to_string());
        if let Some(token) = &page_token {
          query.append_pair("pageToken", token);
        }
      }

      debug!(%url, "listing documents");
      let token = self.auth.bearer().await?;
      let response = self
        .http
        .get(url)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| eyre!("Failed to list books: {}", e))?;

      let page: ApiListDocumentsResponse = check(response, "list books")
        .await?
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse document list: {}", e))?;

      books.extend(page.documents.into_iter().map(ApiDocument::into_book));

      match page.next_page_token {
        Some(next) if !next.is_empty() => page_token = Some(next),
        _ => break,
      }
    }

    Ok(books)
  }

  async fn create_document(&self, book: &NewBook) -> Result<Book> {
    let url = self.collection_url()?;
    debug!(%url, title = %book.title, "creating document");

    let token = self.auth.bearer().await?;
    let response = self
      .http
      .post(url)
      .bearer_auth(token)
      .json(&ApiWriteDocument::from(book))
      .send()
      .await
      .map_err(|e| eyre!("Failed to add book: {}", e))?;

    let document: ApiDocument = check(response, "add book")
      .await?
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse created document: {}", e))?;

    // Echo back what we wrote under the id Firestore generated
    Ok(book.clone().into_book(document.id().to_string()))
  }

  /// Resource names of every document whose `title` equals `title`.
  async fn find_by_title(&self, title: &str) -> Result<Vec<String>> {
    let url = self.url(&format!("{}:runQuery", self.documents_path))?;
    debug!(%url, title, "querying documents by title");

    let token = self.auth.bearer().await?;
    let response = self
      .http
      .post(url)
      .bearer_auth(token)
      .json(&equality_query(&self.collection, "title", title))
      .send()
      .await
      .map_err(|e| eyre!("Failed to query books: {}", e))?;

    let items: Vec<ApiRunQueryItem> = check(response, "query books")
      .await?
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse query response: {}", e))?;

    Ok(
      items
        .into_iter()
        .filter_map(|item| item.document)
        .map(|doc| doc.name)
        .collect(),
    )
  }

  /// Delete by full resource name. Deleting a missing document succeeds.
  async fn delete_document(&self, name: &str) -> Result<()> {
    let url = self.url(name)?;
    debug!(%url, "deleting document");

    let token = self.auth.bearer().await?;
    let response = self
      .http
      .delete(url)
      .bearer_auth(token)
      .send()
      .await
      .map_err(|e| eyre!("Failed to delete book: {}", e))?;

    check(response, "delete book").await?;
    Ok(())
  }

  async fn delete_all_titled(&self, title: &str) -> Result<usize> {
    let names = self.find_by_title(title).await?;
    for name in &names {
      self.delete_document(name).await?;
    }
    Ok(names.len())
  }
}

impl BookStore for FirestoreStore {
  fn list_all(&self) -> BoxFuture<'_, Result<Vec<Book>>> {
    Box::pin(self.list_documents())
  }

  fn append<'a>(&'a self, book: &'a NewBook) -> BoxFuture<'a, Result<Book>> {
    Box::pin(self.create_document(book))
  }

  fn delete_by_title<'a>(&'a self, title: &'a str) -> BoxFuture<'a, Result<usize>> {
    Box::pin(self.delete_all_titled(title))
  }

  fn describe(&self) -> String {
    format!("firestore:{}/{}", self.project_id, self.collection)
  }
}

/// Parse the API root, making sure relative joins append to it.
fn parse_endpoint(endpoint: &str) -> Result<Url> {
  let endpoint = if endpoint.ends_with('/') {
    endpoint.to_string()
  } else {
    format!("{}/", endpoint)
  };
  Url::parse(&endpoint).map_err(|e| eyre!("Invalid Firestore endpoint '{}': {}", endpoint, e))
}

/// Turn non-2xx responses into errors carrying Firestore's message.
async fn check(response: Response, action: &str) -> Result<Response> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let body = response.text().await.unwrap_or_default();
  Err(eyre!(
    "Failed to {}: HTTP {}: {}",
    action,
    status,
    error_message(&body)
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::{json, Value};
  use std::sync::{Arc, Mutex};
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::{TcpListener, TcpStream};

  #[test]
  fn test_parse_endpoint_adds_trailing_slash() {
    let url = parse_endpoint("http://localhost:8080/v1").unwrap();
    assert_eq!(url.as_str(), "http://localhost:8080/v1/");
  }

  #[test]
  fn test_join_keeps_api_root() {
    let url = parse_endpoint("https://firestore.googleapis.com/v1/").unwrap();
    let joined = url
      .join("projects/p/databases/(default)/documents/library")
      .unwrap();
    assert_eq!(
      joined.as_str(),
      "https://firestore.googleapis.com/v1/projects/p/databases/(default)/documents/library"
    );

    let run_query = url
      .join("projects/p/databases/(default)/documents:runQuery")
      .unwrap();
    assert!(run_query.as_str().ends_with("/documents:runQuery"));
  }

  #[test]
  fn test_invalid_endpoint() {
    assert!(parse_endpoint("not a url").is_err());
  }

  #[test]
  fn test_new_requires_credentials_file() {
    let mut config = Config::default();
    config.firestore.credentials = Some("/no/such/key.json".into());
    assert!(FirestoreStore::new(&config).is_err());
  }

  // Local stand-in for the REST API: serves canned responses in order, one
  // connection each, and records the raw requests.

  type Seen = Arc<Mutex<Vec<String>>>;

  async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
      let n = stream.read(&mut chunk).await.unwrap();
      if n == 0 {
        break;
      }
      buf.extend_from_slice(&chunk[..n]);

      let text = String::from_utf8_lossy(&buf).to_string();
      if let Some(head_end) = text.find("\r\n\r\n") {
        let length = text[..head_end]
          .lines()
          .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
              value.trim().parse::<usize>().ok()
            } else {
              None
            }
          })
          .unwrap_or(0);
        if buf.len() >= head_end + 4 + length {
          return text;
        }
      }
    }
    String::from_utf8_lossy(&buf).to_string()
  }

  async fn stub_server(responses: Vec<(u16, Value)>) -> (String, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = listener.local_addr().unwrap().to_string();
    let seen: Seen = Arc::default();
    let log = seen.clone();

    tokio::spawn(async move {
      for (status, body) in responses {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        log.lock().unwrap().push(request);

        let body = body.to_string();
        let response = format!(
          "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
          status,
          body.len(),
          body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
      }
    });

    (host, seen)
  }

  fn emulator_store(host: &str) -> FirestoreStore {
    let mut config = Config::default();
    config.firestore.emulator_host = Some(host.to_string());
    FirestoreStore::new(&config).unwrap()
  }

  fn document(id: &str, title: &str) -> Value {
    json!({
      "name": format!("projects/demo-bookshelf/databases/(default)/documents/library/{}", id),
      "fields": {
        "title": { "stringValue": title },
        "author": { "stringValue": "Frank Herbert" },
        "year": { "integerValue": "1965" },
        "genre": { "stringValue": "Sci-Fi" },
        "read": { "booleanValue": true }
      }
    })
  }

  fn request_line(seen: &Seen, index: usize) -> String {
    let seen = seen.lock().unwrap();
    seen[index].lines().next().unwrap_or_default().to_string()
  }

  #[test]
  fn test_emulator_needs_no_credentials() {
    let store = emulator_store("localhost:8080");
    assert_eq!(store.endpoint.as_str(), "http://localhost:8080/v1/");
    assert_eq!(store.describe(), "firestore:demo-bookshelf/library");
  }

  #[tokio::test]
  async fn test_list_follows_page_tokens() {
    let (host, seen) = stub_server(vec![
      (
        200,
        json!({ "documents": [document("a", "Dune")], "nextPageToken": "page-2" }),
      ),
      (200, json!({ "documents": [document("b", "Emma")] })),
    ])
    .await;
    let store = emulator_store(&host);

    let books = store.list_all().await.unwrap();
    let ids: Vec<&str> = books.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(books[1].title, "Emma");

    let first = request_line(&seen, 0);
    assert!(first.starts_with("GET "));
    assert!(first.contains("/documents/library?pageSize=300"));
    assert!(!first.contains("pageToken"));
    assert!(request_line(&seen, 1).contains("pageToken=page-2"));
    assert!(seen.lock().unwrap()[0]
      .to_lowercase()
      .contains("authorization: bearer owner"));
  }

  #[tokio::test]
  async fn test_append_takes_id_from_created_document() {
    let (host, seen) = stub_server(vec![(200, document("xyz", "Dune"))]).await;
    let store = emulator_store(&host);

    let new_book = NewBook {
      title: "Dune".to_string(),
      author: "Frank Herbert".to_string(),
      year: 1965,
      genre: "Sci-Fi".to_string(),
      read: true,
    };
    let book = store.append(&new_book).await.unwrap();
    assert_eq!(book, new_book.into_book("xyz".to_string()));

    assert!(request_line(&seen, 0).starts_with("POST "));
    assert!(seen.lock().unwrap()[0].contains(r#""integerValue":"1965""#));
  }

  #[tokio::test]
  async fn test_delete_by_title_deletes_each_match() {
    let (host, seen) = stub_server(vec![
      (
        200,
        json!([
          { "document": document("d1", "Dune") },
          { "document": document("d2", "Dune") },
          { "readTime": "2024-01-01T00:00:00Z" }
        ]),
      ),
      (200, json!({})),
      (200, json!({})),
    ])
    .await;
    let store = emulator_store(&host);

    assert_eq!(store.delete_by_title("Dune").await.unwrap(), 2);

    let query = request_line(&seen, 0);
    assert!(query.starts_with("POST "));
    assert!(query.contains("/documents:runQuery"));
    assert!(seen.lock().unwrap()[0].contains("EQUAL"));

    let first = request_line(&seen, 1);
    assert!(first.starts_with("DELETE "));
    assert!(first.contains("/documents/library/d1 "));
    assert!(request_line(&seen, 2).contains("/documents/library/d2 "));
  }

  #[tokio::test]
  async fn test_delete_by_title_without_matches() {
    let (host, seen) =
      stub_server(vec![(200, json!([{ "readTime": "2024-01-01T00:00:00Z" }]))]).await;
    let store = emulator_store(&host);

    assert_eq!(store.delete_by_title("Missing").await.unwrap(), 0);
    assert_eq!(seen.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_error_status_carries_api_message() {
    let (host, _seen) = stub_server(vec![(
      403,
      json!({
        "error": {
          "code": 403,
          "message": "Missing or insufficient permissions.",
          "status": "PERMISSION_DENIED"
        }
      }),
    )])
    .await;
    let store = emulator_store(&host);

    let err = store.list_all().await.unwrap_err().to_string();
    assert!(err.contains("403"));
    assert!(err.contains("PERMISSION_DENIED: Missing or insufficient permissions."));
  }
}

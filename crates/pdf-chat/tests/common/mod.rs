//! Shared helpers for router tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use parking_lot::Mutex;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use pdf_chat::providers::{EmbeddingProvider, LlmProvider};
use pdf_chat::{AppState, ChatConfig, ChatServer, Result};

pub const BOUNDARY: &str = "pdf-chat-test-boundary";

/// Letter-count embedding, deterministic and offline
pub struct LetterEmbedder;

#[async_trait]
impl EmbeddingProvider for LetterEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| letters(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(letters(text))
    }

    fn model(&self) -> &str {
        "letters"
    }

    fn name(&self) -> &str {
        "test"
    }
}

fn letters(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 26];
    for ch in text.chars().filter(char::is_ascii_alphabetic) {
        v[(ch.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
    }
    v
}

/// Records every prompt and answers with a canned reply
#[derive(Default)]
pub struct RecordingLlm {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl LlmProvider for RecordingLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok("The document talks about foxes.".to_string())
    }

    fn name(&self) -> &str {
        "test"
    }

    fn model(&self) -> &str {
        "recording"
    }
}

pub struct TestApp {
    pub router: Router,
    pub llm: Arc<RecordingLlm>,
    pub index_path: PathBuf,
    _tmp: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let index_path = tmp.path().join("faiss_index");

        let mut config = ChatConfig::default();
        config.index.path = index_path.clone();
        config.chunking.chunk_size = 60;
        config.chunking.chunk_overlap = 15;

        let llm = Arc::new(RecordingLlm::default());
        let state =
            AppState::with_providers(config.clone(), Arc::new(LetterEmbedder), llm.clone())
                .unwrap();
        let router = ChatServer::with_state(config, state).router();

        Self {
            router,
            llm,
            index_path,
            _tmp: tmp,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn ask(&self, question: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "question": question }).to_string()))
            .unwrap();
        self.send_json(request).await
    }

    pub async fn process(&self, files: &[(&str, Vec<u8>)]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/process")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(files)))
            .unwrap();
        self.send_json(request).await
    }
}

/// Multipart body with one `files` part per entry
pub fn multipart_body(files: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, data) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// One page per entry, each showing its text in Courier
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

//! Multipart upload with progress reporting
//!
//! The multipart body is streamed untouched; as chunks are handed to the
//! transport a progress callback receives the fraction of bytes sent in
//! `[0, 1]`. The callback is never invoked when the total length is not
//! computable.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::GarageClient;
use super::error::ClientError;

/// Progress sink invoked with bytes-sent / bytes-total.
pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;

const CHUNK_SIZE: usize = 64 * 1024;

/// One part of a multipart upload, buffered in memory.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub name: String,
    pub file_name: Option<String>,
    pub mime: Option<String>,
    pub bytes: Bytes,
}

impl UploadPart {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            mime: None,
            bytes: bytes.into(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            mime: Some(mime.into()),
            bytes: bytes.into(),
        }
    }
}

impl GarageClient {
    /// Build a multipart POST whose body reports upload progress.
    pub fn upload(
        &self,
        path: &str,
        parts: Vec<UploadPart>,
        progress: Option<ProgressFn>,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let total: u64 = parts.iter().map(|p| p.bytes.len() as u64).sum();
        let sent = Arc::new(AtomicU64::new(0));

        let mut form = Form::new();
        for part in parts {
            let length = part.bytes.len() as u64;

            let mut piece = match (&progress, total) {
                // Length not computable (or nothing to report): plain part.
                (None, _) | (_, 0) => Part::bytes(part.bytes.to_vec()),
                (Some(progress), _) => {
                    let stream =
                        progress_stream(part.bytes, sent.clone(), total, progress.clone(), CHUNK_SIZE);
                    Part::stream_with_length(Body::wrap_stream(stream), length)
                }
            };

            if let Some(file_name) = part.file_name {
                piece = piece.file_name(file_name);
            }
            if let Some(mime) = part.mime {
                piece = piece.mime_str(&mime)?;
            }
            form = form.part(part.name, piece);
        }

        Ok(self.request(Method::POST, path).multipart(form))
    }
}

/// Split `data` into chunks, advancing the shared byte counter and
/// reporting the running fraction as each chunk is pulled.
fn progress_stream(
    data: Bytes,
    sent: Arc<AtomicU64>,
    total: u64,
    progress: ProgressFn,
    chunk_size: usize,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(chunk_size.max(1))
        .map(|start| data.slice(start..data.len().min(start + chunk_size.max(1))))
        .collect();

    futures::stream::iter(chunks).map(move |chunk| {
        let done = sent.fetch_add(chunk.len() as u64, Ordering::SeqCst) + chunk.len() as u64;
        progress(done as f64 / total as f64);
        Ok(chunk)
    })
}

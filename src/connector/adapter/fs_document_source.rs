use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ignore::WalkBuilder;
use serde_json::json;
use tracing::{debug, warn};

use crate::application::DocumentSource;
use crate::domain::{CorpusLoad, DocumentChunk, DomainError};

/// Upper bound on characters per chunk; paragraphs are packed greedily.
const MAX_CHUNK_CHARS: usize = 1200;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// [`DocumentSource`] that walks a data directory for plain-text documents
/// and splits them on blank-line paragraph boundaries.
///
/// Hidden files and anything matched by gitignore rules are skipped, same as
/// the rest of the corpus tooling. Unreadable files are logged and skipped
/// rather than failing the run.
pub struct FsDocumentSource {
    data_dir: PathBuf,
}

impl FsDocumentSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    }

    fn chunk_document(&self, relative_path: &str, content: &str) -> Vec<DocumentChunk> {
        let title = Path::new(relative_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(relative_path)
            .to_string();

        split_paragraphs(content)
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                DocumentChunk::new(text)
                    .with_metadata("source", json!(relative_path))
                    .with_metadata("title", json!(title))
                    .with_metadata("chunk", json!(i))
            })
            .collect()
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn load(&self) -> Result<CorpusLoad, DomainError> {
        if !self.data_dir.is_dir() {
            return Err(DomainError::configuration(format!(
                "document directory {} does not exist",
                self.data_dir.display()
            )));
        }

        let files: Vec<PathBuf> = WalkBuilder::new(&self.data_dir)
            .hidden(true)
            .git_ignore(true)
            .build()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && Self::is_supported(path))
            .collect();

        let mut load = CorpusLoad::default();

        for path in files {
            let relative = path
                .strip_prefix(&self.data_dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .to_string();

            let content = match tokio::fs::read_to_string(&path).await {
                Ok(c) => c,
                Err(e) => {
                    warn!("Failed to read {relative}: {e}");
                    continue;
                }
            };

            let chunks = self.chunk_document(&relative, &content);
            if chunks.is_empty() {
                continue;
            }

            debug!("Split {relative} into {} chunks", chunks.len());
            load.document_count += 1;
            load.chunks.extend(chunks);
        }

        Ok(load)
    }
}

/// Split on blank lines, then pack consecutive paragraphs into chunks of at
/// most [`MAX_CHUNK_CHARS`]. A single oversized paragraph becomes its own
/// chunk rather than being cut mid-sentence.
fn split_paragraphs(content: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in content.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        if !current.is_empty() && current.len() + paragraph.len() + 2 > MAX_CHUNK_CHARS {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

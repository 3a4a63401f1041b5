use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use ragpilot::{
    CorpusLoad, DocumentChunk, DocumentSource, DomainError, EmbeddingConfig, EmbeddingService,
    IndexMatch, IndexRecord, IngestConfig, IngestDocumentsUseCase, InMemoryIndex, MockEmbedding,
    VectorIndex,
};

struct StubSource {
    load: CorpusLoad,
}

impl StubSource {
    fn new(document_count: usize, chunks: Vec<DocumentChunk>) -> Arc<Self> {
        Arc::new(Self {
            load: CorpusLoad {
                document_count,
                chunks,
            },
        })
    }
}

#[async_trait]
impl DocumentSource for StubSource {
    async fn load(&self) -> Result<CorpusLoad, DomainError> {
        Ok(self.load.clone())
    }
}

/// Embedding stub that fails transport-style for any text containing
/// "poison" and otherwise returns a constant unit vector.
struct FlakyEmbedding {
    config: EmbeddingConfig,
}

impl FlakyEmbedding {
    fn new(dimensions: usize) -> Arc<Self> {
        Arc::new(Self {
            config: EmbeddingConfig::new("flaky-test", dimensions),
        })
    }

    fn vector(&self) -> Vec<f32> {
        let mut v = vec![0.0; self.config.dimensions()];
        v[0] = 1.0;
        v
    }
}

#[async_trait]
impl EmbeddingService for FlakyEmbedding {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if text.contains("poison") {
            Err(DomainError::transport("simulated embedding outage"))
        } else {
            Ok(self.vector())
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed_text(text).await?);
        }
        Ok(vectors)
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

/// Embedding stub whose every call is a fatal configuration error.
struct MisconfiguredEmbedding {
    config: EmbeddingConfig,
}

#[async_trait]
impl EmbeddingService for MisconfiguredEmbedding {
    async fn embed_text(&self, _text: &str) -> Result<Vec<f32>, DomainError> {
        Err(DomainError::configuration("embedding model mismatch"))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        Err(DomainError::configuration("embedding model mismatch"))
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

/// Index stub that records the order of lifecycle calls and every record
/// it receives.
#[derive(Default)]
struct RecordingIndex {
    ops: Mutex<Vec<String>>,
    records: Mutex<HashMap<String, IndexRecord>>,
}

impl RecordingIndex {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn ops(&self) -> Vec<String> {
        self.ops.lock().await.clone()
    }

    async fn record(&self, id: &str) -> Option<IndexRecord> {
        self.records.lock().await.get(id).cloned()
    }

    async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl VectorIndex for RecordingIndex {
    async fn ensure_ready(&self) -> Result<(), DomainError> {
        self.ops.lock().await.push("ensure".to_string());
        Ok(())
    }

    async fn upsert(&self, records: &[IndexRecord]) -> Result<(), DomainError> {
        self.ops.lock().await.push(format!("upsert:{}", records.len()));
        let mut store = self.records.lock().await;
        for record in records {
            store.insert(record.id().to_string(), record.clone());
        }
        Ok(())
    }

    async fn query(&self, _vector: &[f32], _top_k: usize) -> Result<Vec<IndexMatch>, DomainError> {
        Ok(vec![])
    }

    async fn drop_index(&self) -> Result<(), DomainError> {
        self.ops.lock().await.push("drop".to_string());
        self.records.lock().await.clear();
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.records.lock().await.len() as u64)
    }
}

fn chunk(text: &str) -> DocumentChunk {
    DocumentChunk::new(text).with_metadata("source", json!("corpus.md"))
}

#[tokio::test]
async fn one_failed_embedding_degrades_to_a_zero_vector_without_aborting() {
    let source = StubSource::new(
        1,
        vec![
            chunk("alpha"),
            chunk("beta"),
            chunk("a poison chunk"),
            chunk("gamma"),
            chunk("delta"),
        ],
    );
    let index = RecordingIndex::new();
    let use_case =
        IngestDocumentsUseCase::new(source, FlakyEmbedding::new(8), index.clone());

    let report = use_case.execute(false).await.expect("ingest");

    assert_eq!(report.chunks, 5);
    assert_eq!(index.len().await, 5);

    let poisoned = index.record("doc_2").await.expect("record exists");
    assert_eq!(poisoned.vector().len(), 8);
    assert!(poisoned.vector().iter().all(|v| *v == 0.0));

    let healthy = index.record("doc_0").await.expect("record exists");
    assert!(healthy.vector().iter().any(|v| *v != 0.0));
}

#[tokio::test]
async fn record_ids_are_monotonic_across_batches() {
    let chunks: Vec<DocumentChunk> = (0..7).map(|i| chunk(&format!("chunk {i}"))).collect();
    let source = StubSource::new(3, chunks);
    let index = RecordingIndex::new();

    let use_case = IngestDocumentsUseCase::new(source, FlakyEmbedding::new(4), index.clone())
        .with_config(IngestConfig {
            embed_batch_size: 2,
            upsert_batch_size: 3,
        });

    let report = use_case.execute(false).await.expect("ingest");
    assert_eq!(report.documents, 3);
    assert_eq!(report.chunks, 7);

    for i in 0..7 {
        assert!(index.record(&format!("doc_{i}")).await.is_some());
    }
}

#[tokio::test]
async fn upserts_honor_the_configured_batch_size() {
    let chunks: Vec<DocumentChunk> = (0..5).map(|i| chunk(&format!("chunk {i}"))).collect();
    let source = StubSource::new(1, chunks);
    let index = RecordingIndex::new();

    let use_case = IngestDocumentsUseCase::new(source, FlakyEmbedding::new(4), index.clone())
        .with_config(IngestConfig {
            embed_batch_size: 8,
            upsert_batch_size: 2,
        });

    use_case.execute(false).await.expect("ingest");

    let ops = index.ops().await;
    let upserts: Vec<&String> = ops.iter().filter(|op| op.starts_with("upsert")).collect();
    assert_eq!(upserts, ["upsert:2", "upsert:2", "upsert:1"]);
}

#[tokio::test]
async fn force_reindex_drops_the_index_before_any_upsert() {
    let source = StubSource::new(2, vec![chunk("one"), chunk("two"), chunk("three")]);
    let index = RecordingIndex::new();
    let use_case =
        IngestDocumentsUseCase::new(source, FlakyEmbedding::new(4), index.clone());

    let report = use_case.execute(true).await.expect("ingest");

    assert_eq!(report.documents, 2);
    assert_eq!(report.chunks, 3);

    let ops = index.ops().await;
    assert_eq!(ops[0], "drop");
    assert_eq!(ops[1], "ensure");
    let drop_pos = ops.iter().position(|op| op == "drop").unwrap();
    let first_upsert = ops.iter().position(|op| op.starts_with("upsert")).unwrap();
    assert!(drop_pos < first_upsert);
}

#[tokio::test]
async fn plain_ingest_never_drops_the_index() {
    let source = StubSource::new(1, vec![chunk("only")]);
    let index = RecordingIndex::new();
    let use_case =
        IngestDocumentsUseCase::new(source, FlakyEmbedding::new(4), index.clone());

    use_case.execute(false).await.expect("ingest");
    assert!(!index.ops().await.contains(&"drop".to_string()));
}

#[tokio::test]
async fn unknown_metadata_key_is_a_configuration_error() {
    let bad = DocumentChunk::new("body").with_metadata("sentiment", json!("positive"));
    let source = StubSource::new(1, vec![bad]);
    let index = RecordingIndex::new();
    let use_case = IngestDocumentsUseCase::new(source, FlakyEmbedding::new(4), index);

    let err = use_case.execute(false).await.unwrap_err();
    assert!(matches!(err, DomainError::Configuration(_)));
}

#[tokio::test]
async fn fatal_embedding_error_aborts_instead_of_zero_filling() {
    let source = StubSource::new(1, vec![chunk("anything")]);
    let index = RecordingIndex::new();
    let embedding = Arc::new(MisconfiguredEmbedding {
        config: EmbeddingConfig::new("wrong-model", 4),
    });
    let use_case = IngestDocumentsUseCase::new(source, embedding, index.clone());

    let err = use_case.execute(false).await.unwrap_err();
    assert!(matches!(err, DomainError::Configuration(_)));
    assert_eq!(index.len().await, 0);
}

#[tokio::test]
async fn reingestion_overwrites_records_in_place() {
    let chunks = vec![chunk("stable one"), chunk("stable two")];
    let source = StubSource::new(1, chunks);
    let index = Arc::new(InMemoryIndex::new(384));
    let embedding = Arc::new(MockEmbedding::new());

    let use_case = IngestDocumentsUseCase::new(source, embedding, index.clone());
    use_case.execute(false).await.expect("first ingest");
    use_case.execute(false).await.expect("second ingest");

    assert_eq!(index.count().await.unwrap(), 2);
}

#[tokio::test]
async fn empty_corpus_reports_zero_chunks_and_skips_upserts() {
    let source = StubSource::new(0, vec![]);
    let index = RecordingIndex::new();
    let use_case =
        IngestDocumentsUseCase::new(source, FlakyEmbedding::new(4), index.clone());

    let report = use_case.execute(false).await.expect("ingest");
    assert_eq!(report.documents, 0);
    assert_eq!(report.chunks, 0);
    assert!(index.ops().await.iter().all(|op| !op.starts_with("upsert")));
}

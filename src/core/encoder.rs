use serde::Serialize;

/// Index directive preceding every document; index and id come from the URL.
pub const INDEX_ACTION: &[u8] = br#"{"index":{}}"#;

#[derive(Debug, Clone, Default)]
pub struct EncodedBatch {
    pub body: Vec<u8>,
    pub documents: usize,
    pub skipped: usize,
}

impl EncodedBatch {
    pub fn is_empty(&self) -> bool {
        self.documents == 0
    }
}

/// Renders records as newline-delimited action/document pairs, in order.
/// A record that fails to serialize is dropped and the rest still encode.
pub fn encode<T: Serialize>(records: &[T]) -> EncodedBatch {
    let mut encoded = EncodedBatch::default();
    let mut document = Vec::new();

    for (position, record) in records.iter().enumerate() {
        document.clear();
        if let Err(e) = serde_json::to_writer(&mut document, record) {
            encoded.skipped += 1;
            tracing::warn!("Failed to serialize record {} of batch: {}", position, e);
            continue;
        }

        encoded.body.extend_from_slice(INDEX_ACTION);
        encoded.body.push(b'\n');
        encoded.body.extend_from_slice(&document);
        encoded.body.push(b'\n');
        encoded.documents += 1;
    }

    encoded
}

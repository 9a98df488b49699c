use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::blob_store::{BlobStore, ByteHandle};
use crate::models::{ImageId, ImageSummary, IncomingFile};

/// One ingested file. Metadata is immutable; the handle is released only
/// through the registry.
#[derive(Debug)]
pub struct UploadedImage {
    pub id: ImageId,
    pub name: String,
    pub byte_size: usize,
    pub mime_type: String,
    pub ingested_at: DateTime<Utc>,
    handle: ByteHandle,
}

impl UploadedImage {
    pub fn handle(&self) -> &ByteHandle {
        &self.handle
    }

    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            byte_size: self.byte_size,
            mime_type: self.mime_type.clone(),
            handle: self.handle.url(),
            ingested_at: self.ingested_at,
        }
    }
}

/// Result of one ingest call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Ids of newly registered images, in input order
    pub added: Vec<ImageId>,
    /// Names of files refused because the registry was full
    pub skipped: Vec<String>,
}

/// Ordered set of ingested images and the store backing their bytes
#[derive(Debug)]
pub struct ImageRegistry {
    images: Vec<UploadedImage>,
    store: BlobStore,
    max_images: Option<usize>,
}

impl ImageRegistry {
    pub fn new(max_images: Option<usize>) -> Self {
        Self {
            images: Vec::new(),
            store: BlobStore::new(),
            max_images,
        }
    }

    /// Register `files` in order, one byte handle each.
    ///
    /// No validation happens here: undecodable bytes are accepted and fail
    /// later at decode time.
    pub fn ingest(&mut self, files: Vec<IncomingFile>) -> IngestReport {
        let mut report = IngestReport::default();

        for file in files {
            if self.is_full() {
                tracing::warn!(
                    name = %file.name,
                    max_images = ?self.max_images,
                    "Registry full, skipping file"
                );
                report.skipped.push(file.name);
                continue;
            }

            let id = self.unique_id();
            let byte_size = file.bytes.len();
            let handle = self.store.create(file.bytes);
            tracing::debug!(
                id = %id,
                name = %file.name,
                byte_size,
                mime_type = %file.mime_type,
                handle = %handle,
                "Image ingested"
            );

            self.images.push(UploadedImage {
                id: id.clone(),
                name: file.name,
                byte_size,
                mime_type: file.mime_type,
                ingested_at: Utc::now(),
                handle,
            });
            report.added.push(id);
        }

        report
    }

    /// Revoke every handle and drop every record. Returns how many were removed.
    pub fn remove_all(&mut self) -> usize {
        let removed = self.images.len();
        for image in self.images.drain(..) {
            self.store.revoke(image.handle);
        }
        removed
    }

    pub fn get(&self, id: &ImageId) -> Option<&UploadedImage> {
        self.images.iter().find(|image| &image.id == id)
    }

    pub fn contains(&self, id: &ImageId) -> bool {
        self.get(id).is_some()
    }

    /// Bytes of the image `id`, shared with the store
    pub fn bytes(&self, id: &ImageId) -> Option<Arc<[u8]>> {
        self.get(id).and_then(|image| self.store.resolve(&image.handle))
    }

    pub fn list(&self) -> Vec<ImageSummary> {
        self.images.iter().map(UploadedImage::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of byte handles not yet revoked
    pub fn live_handles(&self) -> usize {
        self.store.live_count()
    }

    fn is_full(&self) -> bool {
        self.max_images.is_some_and(|max| self.images.len() >= max)
    }

    fn unique_id(&self) -> ImageId {
        loop {
            let id = ImageId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

impl Drop for ImageRegistry {
    fn drop(&mut self) {
        let released = self.remove_all();
        if released > 0 {
            tracing::debug!(released, "Released byte handles on teardown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, bytes: &[u8]) -> IncomingFile {
        IncomingFile::new(name, "image/png", bytes.to_vec())
    }

    #[test]
    fn test_ingest_registers_in_order() {
        let mut registry = ImageRegistry::new(None);
        let report = registry.ingest(vec![file("a.png", b"aa"), file("b.png", b"bbb")]);

        assert_eq!(report.added.len(), 2);
        assert!(report.skipped.is_empty());

        let list = registry.list();
        assert_eq!(list[0].name, "a.png");
        assert_eq!(list[1].name, "b.png");
        assert_eq!(list[1].byte_size, 3);
        assert_eq!(list[0].id, report.added[0]);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut registry = ImageRegistry::new(None);
        let files = (0..50).map(|i| file(&format!("{i}.png"), b"x")).collect();
        let report = registry.ingest(files);

        let mut ids: Vec<_> = report.added.iter().map(|id| id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_accepts_undecodable_bytes() {
        let mut registry = ImageRegistry::new(None);
        let report = registry.ingest(vec![file("notes.txt", b"not an image")]);
        assert_eq!(report.added.len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_one_live_handle_per_record() {
        let mut registry = ImageRegistry::new(None);
        registry.ingest(vec![file("a.png", b"a"), file("b.png", b"b")]);
        registry.ingest(vec![file("c.png", b"c")]);

        assert_eq!(registry.live_handles(), registry.len());
        assert_eq!(registry.live_handles(), 3);
    }

    #[test]
    fn test_remove_all_revokes_handles() {
        let mut registry = ImageRegistry::new(None);
        let report = registry.ingest(vec![file("a.png", b"a"), file("b.png", b"b")]);

        assert_eq!(registry.remove_all(), 2);
        assert!(registry.is_empty());
        assert_eq!(registry.live_handles(), 0);
        assert!(registry.bytes(&report.added[0]).is_none());
    }

    #[test]
    fn test_bytes_resolve_through_handle() {
        let mut registry = ImageRegistry::new(None);
        let report = registry.ingest(vec![file("a.png", b"payload")]);

        let bytes = registry.bytes(&report.added[0]).unwrap();
        assert_eq!(&bytes[..], b"payload");
        assert!(registry.bytes(&ImageId::new("000000000000")).is_none());
    }

    #[test]
    fn test_capacity_skips_excess_files() {
        let mut registry = ImageRegistry::new(Some(2));
        registry.ingest(vec![file("a.png", b"a")]);
        let report = registry.ingest(vec![file("b.png", b"b"), file("c.png", b"c")]);

        assert_eq!(report.added.len(), 1);
        assert_eq!(report.skipped, vec!["c.png".to_string()]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_summary_exposes_handle_url() {
        let mut registry = ImageRegistry::new(None);
        registry.ingest(vec![file("a.png", b"a")]);
        assert!(registry.list()[0].handle.starts_with("blob:glint/"));
    }
}

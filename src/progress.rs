//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress`] to receive events as the
//! driver works through the batch. The CLI's progress bar is one
//! implementation; a service embedding the library can forward the same
//! events to a channel or a job record instead.
//!
//! Documents are processed strictly sequentially, so unlike a concurrent
//! pipeline these callbacks are never invoked from more than one task at a
//! time. The trait still requires `Send + Sync` because the config that
//! carries it must cross `spawn` boundaries.

use std::sync::Arc;

/// Called by the batch driver as it works through the discovered documents.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery and the output sweep, before any document.
    fn on_run_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document's pipeline begins.
    ///
    /// # Arguments
    /// * `name`  — source file name, e.g. `notes.md`
    /// * `index` — 1-indexed position in the batch
    /// * `total` — number of documents in the batch
    fn on_document_start(&self, name: &str, index: usize, total: usize) {
        let _ = (name, index, total);
    }

    /// Called when a document's PDF has been written.
    ///
    /// # Arguments
    /// * `artifact` — path of the written PDF
    fn on_document_complete(&self, name: &str, index: usize, total: usize, artifact: &str) {
        let _ = (name, index, total, artifact);
    }

    /// Called when a document fails; the batch continues with the next one.
    fn on_document_error(&self, name: &str, index: usize, total: usize, error: &str) {
        let _ = (name, index, total, error);
    }

    /// Called once after the last document has been attempted.
    fn on_run_complete(&self, total_documents: usize, converted: usize) {
        let _ = (total_documents, converted);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopBatchProgress;

impl BatchProgressCallback for NoopBatchProgress {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type BatchProgress = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        run_total: AtomicUsize,
        run_converted: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_run_start(&self, total_documents: usize) {
            self.run_total.store(total_documents, Ordering::SeqCst);
        }

        fn on_document_start(&self, _name: &str, _index: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_complete(&self, _name: &str, _index: usize, _total: usize, _artifact: &str) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_error(&self, _name: &str, _index: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_complete(&self, _total_documents: usize, converted: usize) {
            self.run_converted.store(converted, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopBatchProgress;
        cb.on_run_start(2);
        cb.on_document_start("a.md", 1, 2);
        cb.on_document_complete("a.md", 1, 2, "pdf/a.a4.pdf");
        cb.on_document_error("b.md", 2, 2, "render failed");
        cb.on_run_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            run_total: AtomicUsize::new(0),
            run_converted: AtomicUsize::new(0),
        };

        tracker.on_run_start(3);
        tracker.on_document_start("a.md", 1, 3);
        tracker.on_document_complete("a.md", 1, 3, "pdf/a.a4.pdf");
        tracker.on_document_start("b.md", 2, 3);
        tracker.on_document_error("b.md", 2, 3, "browser launch failed");
        tracker.on_document_start("c.md", 3, 3);
        tracker.on_document_complete("c.md", 3, 3, "pdf/c.a4.pdf");
        tracker.on_run_complete(3, 2);

        assert_eq!(tracker.run_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.run_converted.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn BatchProgressCallback> = Arc::new(NoopBatchProgress);
        cb.on_run_start(1);
        cb.on_document_start("a.md", 1, 1);
    }
}

//! Per-session result cache.
//!
//! The dashboard host keeps the last processed upload for each browser
//! session. A new upload replaces the entry; ending the session clears it.
//! Entries are immutable once stored.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use lazy_static::lazy_static;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::pipeline::context::BatchContext;
use crate::pipeline::ingestion::{process_uploads, PipelineResult, UploadedFile};

#[derive(Debug, Clone)]
struct SessionEntry {
    result: Arc<PipelineResult>,
    stored_at: Instant,
}

/// In-memory cache of pipeline results keyed by session id.
#[derive(Debug, Default)]
pub struct SessionCache {
    sessions: HashMap<String, SessionEntry>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the result of a new upload, replacing any previous one.
    pub fn store(&mut self, session_id: &str, result: PipelineResult) -> Arc<PipelineResult> {
        let result = Arc::new(result);
        let replaced = self
            .sessions
            .insert(
                session_id.to_string(),
                SessionEntry {
                    result: Arc::clone(&result),
                    stored_at: Instant::now(),
                },
            )
            .is_some();

        log::info!(
            "SESSION_STORED session={} batch={} rows={} replaced={}",
            session_id,
            result.batch_id,
            result.flat_table.len(),
            replaced
        );

        result
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<PipelineResult>> {
        self.sessions.get(session_id).map(|e| Arc::clone(&e.result))
    }

    /// Whether the stored result was built from exactly `files`, in order.
    /// Names count as well as content: errors and empty instances are
    /// reported by file name.
    pub fn is_current(&self, session_id: &str, files: &[UploadedFile]) -> bool {
        self.sessions.get(session_id).map_or(false, |entry| {
            let stored = &entry.result;
            stored.file_names.len() == files.len()
                && stored.file_digests.len() == files.len()
                && stored
                    .file_names
                    .iter()
                    .zip(&stored.file_digests)
                    .zip(files)
                    .all(|((name, digest), file)| *name == file.name && *digest == file.digest())
        })
    }

    /// Drop one session's result. Returns whether anything was stored.
    pub fn clear(&mut self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            log::info!("SESSION_CLEARED session={}", session_id);
        }
        removed
    }

    pub fn clear_all(&mut self) {
        let count = self.sessions.len();
        self.sessions.clear();
        log::info!("SESSION_CACHE_CLEARED sessions={}", count);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn cache_age_secs(&self, session_id: &str) -> Option<u64> {
        self.sessions
            .get(session_id)
            .map(|e| e.stored_at.elapsed().as_secs())
    }
}

// Global session cache with thread-safe access
lazy_static! {
    static ref SESSION_CACHE: RwLock<SessionCache> = RwLock::new(SessionCache::new());
}

/// Get a read-only reference to the global session cache.
pub fn get_session_cache() -> RwLockReadGuard<'static, SessionCache> {
    SESSION_CACHE.read()
}

/// Get a mutable reference to the global session cache.
pub fn get_session_cache_mut() -> RwLockWriteGuard<'static, SessionCache> {
    SESSION_CACHE.write()
}

/// Process an upload for a session, reusing the stored result when the file
/// set is unchanged.
pub fn process_for_session(session_id: &str, files: &[UploadedFile]) -> Arc<PipelineResult> {
    {
        let cache = get_session_cache();
        if cache.is_current(session_id, files) {
            if let Some(result) = cache.get(session_id) {
                log::debug!("SESSION_REUSED session={} batch={}", session_id, result.batch_id);
                return result;
            }
        }
    }

    let result = process_uploads(&BatchContext::new(), files);
    get_session_cache_mut().store(session_id, result)
}

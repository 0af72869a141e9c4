//! Attachment staging
//!
//! Picked files are filtered, counted against the attachment limit, then
//! read into data URIs in background tasks. A cosmetic progress counter
//! runs beside each read; the attachment is committed when the read (plus
//! the simulated upload delay) finishes, whatever the counter says.

use crate::config::StagerConfig;
use crate::error::StageError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use factcheck_domain::{Attachment, AttachmentId};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// How the files reached the stager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Dropped onto the drop zone
    DragDrop,
    /// Chosen in a file picker
    FilePicker,
}

/// Where a picked file's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Read from disk when staging starts
    Path(PathBuf),
    /// Already in memory
    Bytes(Vec<u8>),
}

/// A file offered for attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    /// File name shown to the user
    pub name: String,
    /// Reported MIME type
    pub mime_type: String,
    /// Reported size in bytes
    pub size: u64,
    /// Contents
    pub content: FileContent,
}

impl PickedFile {
    /// A file held in memory
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            content: FileContent::Bytes(bytes),
        }
    }

    /// Describe a file on disk; the MIME type is guessed from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, StageError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| StageError::Read {
            name: path.display().to_string(),
            message: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            mime_type: mime_from_path(path)
                .unwrap_or("application/octet-stream")
                .to_string(),
            size: metadata.len(),
            content: FileContent::Path(path.to_path_buf()),
        })
    }

    fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Guess an image MIME type from a file extension
pub fn mime_from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(mime)
}

/// Encode bytes as a `data:` URI
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

#[derive(Debug, Default)]
struct StagerState {
    committed: Vec<Attachment>,
    pending: HashSet<AttachmentId>,
    progress: HashMap<AttachmentId, u8>,
}

impl StagerState {
    fn finish(&mut self, id: &AttachmentId) -> bool {
        self.progress.remove(id);
        self.pending.remove(id)
    }
}

/// Stages image attachments for one draft
pub struct AttachmentStager {
    config: StagerConfig,
    state: Arc<Mutex<StagerState>>,
    pending_count: Arc<watch::Sender<usize>>,
}

impl AttachmentStager {
    /// Create a stager with the given limits and timings
    pub fn new(config: StagerConfig) -> Self {
        let (pending_count, _) = watch::channel(0);
        Self {
            config,
            state: Arc::new(Mutex::new(StagerState::default())),
            pending_count: Arc::new(pending_count),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &StagerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, StagerState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Start staging a batch of files
    ///
    /// Non-images and oversized files are skipped. If the remaining files
    /// would take the draft over the limit the whole batch is refused.
    /// Returns the ids allocated for the accepted files; they are committed
    /// asynchronously.
    pub fn stage(
        &self,
        entry: EntryPoint,
        files: Vec<PickedFile>,
    ) -> Result<Vec<AttachmentId>, StageError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let valid: Vec<PickedFile> = files
            .into_iter()
            .filter(|file| {
                let keep = file.is_image() && file.size <= self.config.max_file_bytes;
                if !keep {
                    debug!(
                        name = %file.name,
                        mime = %file.mime_type,
                        size = file.size,
                        "Skipping file: not an image or too large"
                    );
                }
                keep
            })
            .collect();

        let mut state = self.lock();
        let current = state.committed.len() + state.pending.len();
        if current + valid.len() > self.config.max_attachments {
            warn!(
                current,
                requested = valid.len(),
                max = self.config.max_attachments,
                "Rejecting attachment batch"
            );
            return Err(StageError::TooManyAttachments {
                current,
                requested: valid.len(),
                max: self.config.max_attachments,
            });
        }

        let mut ids = Vec::with_capacity(valid.len());
        for file in valid {
            let id = AttachmentId::new();
            state.pending.insert(id);
            state.progress.insert(id, 0);
            self.pending_count.send_modify(|n| *n += 1);
            self.spawn_progress(id);
            self.spawn_read(id, file);
            ids.push(id);
        }
        drop(state);

        if !ids.is_empty() {
            info!(count = ids.len(), ?entry, "Staging attachments");
        }
        Ok(ids)
    }

    fn spawn_progress(&self, id: AttachmentId) {
        let state = Arc::clone(&self.state);
        let tick = self.config.progress_tick();
        let step = self.config.progress_step;

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tick).await;
                let mut state = state.lock().unwrap_or_else(|p| p.into_inner());
                let Some(progress) = state.progress.get_mut(&id) else {
                    break;
                };
                *progress = progress.saturating_add(step).min(100);
                if *progress >= 100 {
                    break;
                }
            }
        });
    }

    fn spawn_read(&self, id: AttachmentId, file: PickedFile) {
        let state = Arc::clone(&self.state);
        let pending_count = Arc::clone(&self.pending_count);
        let delay = self.config.commit_delay();

        tokio::spawn(async move {
            let bytes = match file.content {
                FileContent::Bytes(bytes) => Ok(bytes),
                FileContent::Path(ref path) => tokio::fs::read(path).await,
            };

            let outcome = match bytes {
                Ok(bytes) => {
                    let preview = data_uri(&file.mime_type, &bytes);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    Ok(preview)
                }
                Err(e) => Err(e),
            };

            let mut state = state.lock().unwrap_or_else(|p| p.into_inner());
            if !state.finish(&id) {
                // Removed while reading
                debug!(%id, "Dropping read for removed attachment");
                return;
            }
            match outcome {
                Ok(preview_data_uri) => {
                    debug!(%id, name = %file.name, "Attachment committed");
                    state.committed.push(Attachment {
                        id,
                        name: file.name,
                        mime_type: file.mime_type,
                        preview_data_uri,
                    });
                }
                Err(e) => warn!(%id, name = %file.name, "Failed to read attachment: {}", e),
            }
            drop(state);
            pending_count.send_modify(|n| *n = n.saturating_sub(1));
        });
    }

    /// Remove an attachment, committed or still being read
    ///
    /// Returns whether anything was removed; unknown ids are ignored.
    pub fn remove(&self, id: &AttachmentId) -> bool {
        let mut state = self.lock();
        let before = state.committed.len();
        state.committed.retain(|a| &a.id != id);
        let removed_committed = state.committed.len() != before;
        let removed_pending = state.finish(id);
        drop(state);

        if removed_pending {
            self.pending_count.send_modify(|n| *n = n.saturating_sub(1));
        }
        removed_committed || removed_pending
    }

    /// Committed attachments in commit order
    pub fn attachments(&self) -> Vec<Attachment> {
        self.lock().committed.clone()
    }

    /// Cosmetic progress of a pending attachment
    pub fn progress(&self, id: &AttachmentId) -> Option<u8> {
        self.lock().progress.get(id).copied()
    }

    /// Number of reads still running
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Wait until every pending read has finished
    pub async fn wait_idle(&self) {
        let mut rx = self.pending_count.subscribe();
        // The sender lives as long as self, so this cannot fail
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Move the committed attachments out, leaving the stager empty
    pub fn take(&self) -> Vec<Attachment> {
        std::mem::take(&mut self.lock().committed)
    }
}

impl Default for AttachmentStager {
    fn default() -> Self {
        Self::new(StagerConfig::default())
    }
}

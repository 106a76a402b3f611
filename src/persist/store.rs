use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TokenError, TokenResult};
use crate::scene::model::CanvasDoc;

/// Storage slot name for the persisted canvas.
pub const STORAGE_KEY: &str = "tokengen_canvas_v1";

/// Envelope version; payloads written with any other version are ignored on load.
pub const STORAGE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    version: u32,
    data: &'a CanvasDoc,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    #[serde(default)]
    data: serde_json::Value,
}

/// Raw slot holding one serialized envelope.
pub trait PersistenceStore: Send {
    /// Replace the stored payload.
    fn save(&mut self, payload: &str) -> TokenResult<()>;
    /// Read the stored payload, `None` when nothing has been saved.
    fn load(&self) -> TokenResult<Option<String>>;
    /// Forget the stored payload.
    fn clear(&mut self) -> TokenResult<()>;
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for Box<S> {
    fn save(&mut self, payload: &str) -> TokenResult<()> {
        (**self).save(payload)
    }

    fn load(&self) -> TokenResult<Option<String>> {
        (**self).load()
    }

    fn clear(&mut self) -> TokenResult<()> {
        (**self).clear()
    }
}

/// Wrap `doc` in the versioned envelope.
pub fn encode_envelope(doc: &CanvasDoc) -> TokenResult<String> {
    serde_json::to_string(&EnvelopeOut {
        version: STORAGE_VERSION,
        data: doc,
    })
    .map_err(|e| TokenError::serde(format!("serialize persisted canvas: {e}")))
}

/// Unwrap a persisted envelope. Corrupt payloads and foreign versions yield `None`.
pub fn decode_envelope(payload: &str) -> Option<CanvasDoc> {
    let env: EnvelopeIn = match serde_json::from_str(payload) {
        Ok(env) => env,
        Err(e) => {
            tracing::warn!(error = %e, "persisted canvas is not a valid envelope");
            return None;
        }
    };
    if env.version != STORAGE_VERSION {
        tracing::info!(
            found = env.version,
            expected = STORAGE_VERSION,
            "ignoring persisted canvas from another version"
        );
        return None;
    }
    match CanvasDoc::default().hydrate(&env.data) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!(error = %e, "persisted canvas could not be restored");
            None
        }
    }
}

/// Serialize and store `doc`.
pub fn save_doc(store: &mut dyn PersistenceStore, doc: &CanvasDoc) -> TokenResult<()> {
    let payload = encode_envelope(doc)?;
    store.save(&payload)
}

/// Restore the persisted document. Read failures are logged and treated as "nothing saved".
pub fn load_doc(store: &dyn PersistenceStore) -> Option<CanvasDoc> {
    match store.load() {
        Ok(Some(payload)) => decode_envelope(&payload),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted canvas");
            None
        }
    }
}

/// Envelope stored in a single JSON file.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{dir}/tokengen_canvas_v1.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceStore for FileStore {
    fn save(&mut self, payload: &str) -> TokenResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                TokenError::validation(format!("create '{}': {e}", parent.display()))
            })?;
        }
        // Write-then-rename so a crash never leaves a truncated envelope behind.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, payload)
            .map_err(|e| TokenError::validation(format!("write '{}': {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            TokenError::validation(format!("replace '{}': {e}", self.path.display()))
        })
    }

    fn load(&self) -> TokenResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TokenError::validation(format!(
                "read '{}': {e}",
                self.path.display()
            ))),
        }
    }

    fn clear(&mut self) -> TokenResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenError::validation(format!(
                "remove '{}': {e}",
                self.path.display()
            ))),
        }
    }
}

/// In-memory slot. Clones share the same payload, so a caller can keep a handle while a
/// [`DebouncedWriter`](crate::DebouncedWriter) owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current payload, if any.
    pub fn contents(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|g| g.clone())
    }

    fn with_slot<T>(&self, f: impl FnOnce(&mut Option<String>) -> T) -> TokenResult<T> {
        let mut g = self
            .slot
            .lock()
            .map_err(|_| TokenError::validation("memory store lock poisoned"))?;
        Ok(f(&mut g))
    }
}

impl PersistenceStore for MemoryStore {
    fn save(&mut self, payload: &str) -> TokenResult<()> {
        self.with_slot(|s| *s = Some(payload.to_owned()))
    }

    fn load(&self) -> TokenResult<Option<String>> {
        self.with_slot(|s| s.clone())
    }

    fn clear(&mut self) -> TokenResult<()> {
        self.with_slot(|s| *s = None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/store.rs"]
mod tests;

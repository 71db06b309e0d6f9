//! Where point-set blobs come from.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::id::PointSetId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("point set {0} not found")]
    NotFound(PointSetId),
    /// The store answered, but with a non-success status other than not-found.
    #[error("point-set store answered {status}: {reason}")]
    Status { status: u16, reason: String },
    /// The store could not be reached at all.
    #[error("point-set store unreachable: {0}")]
    Unavailable(String),
}

/// Keyed, read-only access to encoded point sets.
pub trait PointSetSource {
    fn fetch(&self, id: &PointSetId) -> Result<Vec<u8>, FetchError>;
}

impl<S: PointSetSource + ?Sized> PointSetSource for &S {
    fn fetch(&self, id: &PointSetId) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(id)
    }
}

/// Point sets stored as `<root>/<id>.bin`.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, id: &PointSetId) -> PathBuf {
        self.root.join(format!("{id}.bin"))
    }
}

impl PointSetSource for DirSource {
    fn fetch(&self, id: &PointSetId) -> Result<Vec<u8>, FetchError> {
        // A missing root means the store itself is gone, not the entry.
        if !self.root.is_dir() {
            return Err(FetchError::Unavailable(format!(
                "store directory {} is missing",
                self.root.display()
            )));
        }
        let path = self.path_for(id);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FetchError::NotFound(*id)),
            Err(e) => Err(FetchError::Unavailable(format!(
                "reading {}: {e}",
                path.display()
            ))),
        }
    }
}

/// In-memory store; entries hold either bytes or a canned status failure.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    entries: HashMap<PointSetId, Result<Vec<u8>, (u16, String)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: PointSetId, bytes: Vec<u8>) {
        self.entries.insert(id, Ok(bytes));
    }

    /// Make `fetch(id)` answer with `status` (404 reads as not-found).
    pub fn insert_status(&mut self, id: PointSetId, status: u16, reason: impl Into<String>) {
        self.entries.insert(id, Err((status, reason.into())));
    }
}

impl PointSetSource for MemorySource {
    fn fetch(&self, id: &PointSetId) -> Result<Vec<u8>, FetchError> {
        match self.entries.get(id) {
            None | Some(Err((404, _))) => Err(FetchError::NotFound(*id)),
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err((status, reason))) => Err(FetchError::Status {
                status: *status,
                reason: reason.clone(),
            }),
        }
    }
}

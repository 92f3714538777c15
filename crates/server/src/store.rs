//! The file-store collaborator behind the `/files` endpoints.

use std::fs;
use std::io;
use std::path::PathBuf;

use bytes::Bytes;

#[cfg(test)]
use mockall::automock;

/// Synchronous file storage.
///
/// All three operations block the calling task for the duration of the disk
/// I/O; the protocol engine tolerates that for its single-client workload.
/// Keeping the interface explicit lets an async or pooled implementation
/// slot in without touching the engine.
#[cfg_attr(test, automock)]
pub trait FileStore: Send + Sync {
    fn exists(&self, name: &str) -> bool;
    fn read(&self, name: &str) -> io::Result<Bytes>;
    fn write(&self, name: &str, contents: &[u8]) -> io::Result<()>;
}

/// Store backed by a fixed root directory.
///
/// The request-supplied name is joined onto the root as-is; there is no
/// traversal validation.
#[derive(Debug)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl FileStore for DiskStore {
    fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_file()
    }

    fn read(&self, name: &str) -> io::Result<Bytes> {
        fs::read(self.resolve(name)).map(Bytes::from)
    }

    fn write(&self, name: &str, contents: &[u8]) -> io::Result<()> {
        fs::write(self.resolve(name), contents)
    }
}

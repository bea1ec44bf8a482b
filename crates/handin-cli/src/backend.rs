//! Local backend wiring.

use std::path::PathBuf;

use clap::Args;
use handin_queue::SpoolChannel;
use handin_store::FsObjectStore;

/// Where the directory-backed store and spool live.
///
/// This is the seam where a managed-cloud adapter would plug in; the
/// binaries only ever see the capability traits.
#[derive(Debug, Args)]
pub struct BackendArgs {
    /// Root directory of the local backend.
    #[arg(long, env = "HANDIN_BACKEND_ROOT")]
    pub backend_root: Option<PathBuf>,
}

impl BackendArgs {
    /// Resolve the backend root, defaulting under the system temp dir.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.backend_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("handin-backend"))
    }

    /// Construct the store and channel rooted at the resolved path.
    #[must_use]
    pub fn connect(&self) -> (FsObjectStore, SpoolChannel) {
        let root = self.root();
        (
            FsObjectStore::new(root.join("store")),
            SpoolChannel::new(root.join("queues")),
        )
    }
}

//! File-backed persistence and configuration for the terminal host.
//!
//! - [`JsonFileStore`]: the core's [`Persistence`](trixel_core::Persistence) port on top of
//!   two JSON files in a data directory
//! - [`Config`]: optional JSON config file with timing overrides and a fixed seed

pub mod config;
pub mod file_store;

pub use config::{load_config, Config};
pub use file_store::JsonFileStore;

#[cfg(test)]
pub(crate) mod test_dir {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicU64, Ordering};

    static NEXT_TMP_ID: AtomicU64 = AtomicU64::new(0);

    /// Scratch directory removed on drop
    pub struct TempDir {
        root: PathBuf,
    }

    impl TempDir {
        pub fn new(tag: &str) -> Self {
            let nonce = NEXT_TMP_ID.fetch_add(1, Ordering::Relaxed);
            let root = std::env::temp_dir().join(format!(
                "trixel_{}_{}_{}",
                tag,
                std::process::id(),
                nonce
            ));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).expect("create temp dir");
            Self { root }
        }

        pub fn path(&self) -> &Path {
            &self.root
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }
}

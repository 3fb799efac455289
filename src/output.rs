//! Output directory management and collision-free artifact naming.

use std::path::{Path, PathBuf};

use xxhash_rust::xxh3::Xxh3;

use crate::error::OffgenResult;

/// Directory that receives every generated artifact.
#[derive(Clone, Debug)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Open (and create if needed) the output directory.
    pub fn new(root: impl Into<PathBuf>) -> OffgenResult<Self> {
        let root = root.into();
        use anyhow::Context as _;
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create output directory '{}'", root.display()))?;
        Ok(Self { root })
    }

    /// Borrow the directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Build a collision-free path `{prefix}_{UTC stamp}_{8-hex}.{ext}`.
    ///
    /// The hex suffix hashes the prefix and a nanosecond timestamp, so two
    /// artifacts generated within the same second still get distinct names.
    pub fn unique_path(&self, prefix: &str, ext: &str) -> PathBuf {
        let now = chrono::Utc::now();
        let stamp = now.format("%Y%m%dT%H%M%S");

        let mut hasher = Xxh3::new();
        hasher.update(prefix.as_bytes());
        hasher.update(ext.as_bytes());
        hasher.update(&now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        let suffix = (hasher.digest() & 0xffff_ffff) as u32;

        self.root.join(format!("{prefix}_{stamp}_{suffix:08x}.{ext}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_path_shape_is_stable() {
        let dir = OutputDir {
            root: PathBuf::from("outputs"),
        };
        let p = dir.unique_path("image", "png");
        let name = p.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("image_"));
        assert!(name.ends_with(".png"));
        // prefix + stamp + hash + extension, separated by underscores
        assert_eq!(name.matches('_').count(), 2);
    }

    #[test]
    fn consecutive_paths_differ() {
        let dir = OutputDir {
            root: PathBuf::from("outputs"),
        };
        let a = dir.unique_path("doc", "pdf");
        let b = dir.unique_path("doc", "pdf");
        assert_ne!(a, b);
    }
}

//! Filesystem infrastructure: implements `LocalFs` and `FileHasher`.

use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::domain::module::{TfSource, TfSyntax};
use crate::domain::report::hex_encode;

/// Production filesystem implementation of `LocalFs` and `FileHasher`.
pub struct LocalFs;

impl crate::application::ports::FileHasher for LocalFs {
    fn sha256_file(&self, path: &Path) -> Result<String> {
        sha256_file(path)
    }
}

impl crate::application::ports::LocalFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn write_with_mode(&self, path: &Path, content: &str, mode: u32) -> Result<()> {
        std::fs::write(path, content).with_context(|| format!("writing file {}", path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                .with_context(|| format!("setting permissions on {}", path.display()))?;
        }
        #[cfg(not(unix))]
        let _ = mode;
        Ok(())
    }

    fn read_tf_sources(&self, dir: &Path) -> Result<Vec<TfSource>> {
        let mut paths = Vec::new();
        for entry in
            std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
        {
            let path = entry
                .with_context(|| format!("reading directory {}", dir.display()))?
                .path();
            let is_config = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| TfSyntax::of(n).is_some());
            if is_config && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        paths
            .iter()
            .map(|p| {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("reading file {}", p.display()))?;
                let name = p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                Ok(TfSource::new(name, content))
            })
            .collect()
    }
}

/// SHA-256 of a file as lowercase hex, streamed through the hasher.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).with_context(|| format!("hashing {}", path.display()))?;
    Ok(hex_encode(&hasher.finalize()))
}

//! Infrastructure implementation of the `ModuleStager` port.
//!
//! Copies the module tree into a `tempfile::TempDir` with `walkdir`,
//! skipping paths the domain staging rules exclude.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use crate::application::ports::{ModuleStager, StageRequest, StagedModule};
use crate::domain::StageError;
use crate::domain::module::{should_stage, staged_plan_path};

/// Marker written by cargo (and other tools) into cache directories.
const CACHEDIR_TAG: &str = "CACHEDIR.TAG";

/// Stages modules under the system temp directory.
pub struct TempDirStager;

impl ModuleStager for TempDirStager {
    async fn stage(&self, request: &StageRequest<'_>) -> Result<StagedModule> {
        let root = request.root.to_path_buf();
        let module_path = request.module_path.to_string();
        let prefix = format!("pnc-{}-", request.name_prefix);
        let plan_file = request.plan_file.to_string();

        let tmp = tokio::task::spawn_blocking(move || {
            stage_blocking(&root, &module_path, &prefix, &plan_file)
        })
        .await
        .context("spawn_blocking for stage")??;

        let module_dir = match request.module_path {
            "" | "." => tmp.path().to_path_buf(),
            path => tmp.path().join(path),
        };
        if request.keep {
            let _ = tmp.keep();
            Ok(StagedModule::kept(module_dir))
        } else {
            Ok(StagedModule::temporary(module_dir, Box::new(tmp)))
        }
    }
}

fn stage_blocking(
    root: &Path,
    module_path: &str,
    prefix: &str,
    plan_file: &str,
) -> Result<tempfile::TempDir> {
    if !root.is_dir() {
        return Err(StageError::SourceMissing(root.to_path_buf()).into());
    }
    if !root.join(module_path).is_dir() {
        return Err(StageError::ModulePathMissing {
            root: root.to_path_buf(),
            path: module_path.to_string(),
        }
        .into());
    }

    let tmp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .context("creating staging directory")?;
    copy_tree(root, tmp.path(), &staged_plan_path(module_path, plan_file))?;
    Ok(tmp)
}

/// Copy `src` into `dest`, filtering with `should_stage` and skipping
/// tagged cache directories. `plan_path` is relative to `src`.
///
/// # Errors
///
/// Returns an error if any directory cannot be walked or file cannot be copied.
pub fn copy_tree(src: &Path, dest: &Path, plan_path: &Path) -> Result<()> {
    let keep = |entry: &DirEntry| {
        let Ok(relative) = entry.path().strip_prefix(src) else {
            return false;
        };
        if relative.as_os_str().is_empty() {
            return true;
        }
        if entry.file_type().is_dir() && entry.path().join(CACHEDIR_TAG).exists() {
            return false;
        }
        should_stage(relative, plan_path)
    };

    for entry in WalkDir::new(src).follow_links(true).into_iter().filter_entry(keep) {
        let entry = entry.with_context(|| format!("walking {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("{} is outside {}", entry.path().display(), src.display()))?;
        let target: PathBuf = dest.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("creating directory {}", target.display()))?;
        } else {
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!("copying {} to {}", entry.path().display(), target.display())
            })?;
        }
    }
    Ok(())
}

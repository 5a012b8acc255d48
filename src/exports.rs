//! Detecting which files an export produced.
//!
//! The modeling addon writes its XML assets into a shared output directory
//! without reporting what it wrote, so the directory is snapshotted before the
//! export and compared afterwards.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::debug;

#[derive(Debug, Clone, Default)]
pub struct ExportSnapshot {
    file_names: HashSet<OsString>,
}

impl ExportSnapshot {
    pub fn capture(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            file_names: list_file_names(dir.as_ref())?,
        })
    }

    pub fn len(&self) -> usize {
        self.file_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_names.is_empty()
    }

    /// `.xml` files in `dir` that were not present when the snapshot was taken,
    /// sorted by path.
    pub fn new_xml_files(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();

        let new_files = list_file_names(dir)?
            .into_iter()
            .filter(|name| !self.file_names.contains(name))
            .filter(|name| name.to_string_lossy().ends_with(".xml"))
            .map(|name| dir.join(name))
            .sorted()
            .collect::<Vec<_>>();

        debug!("{} new XML files in {}", new_files.len(), dir.display());

        Ok(new_files)
    }
}

fn list_file_names(dir: &Path) -> Result<HashSet<OsString>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list export directory {}", dir.display()))?;

    entries
        .map(|entry| {
            entry
                .map(|entry| entry.file_name())
                .with_context(|| format!("Failed to read entry of {}", dir.display()))
        })
        .collect()
}

/// Name of the XML file the extraction tool writes for an archive entry,
/// e.g. `x64/levels/props.rpf/prop_bench.ydr` becomes `prop_bench.ydr.xml`.
/// Both `/` and `\` separate path components.
pub fn xml_file_name(archive_path: &str) -> String {
    let base_name = archive_path.rsplit(&['/', '\\'][..]).next().unwrap_or(archive_path);
    format!("{base_name}.xml")
}

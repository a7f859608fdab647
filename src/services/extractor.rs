use flate2::read::GzDecoder;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tar::{Archive, EntryType};

use crate::models::layout::{resolve_link, InstallLayout};
use crate::utils::error::{InstallError, Result};

/// Outcome of unpacking a runtime archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Final locations of regular files and links, relative to the base path
    pub files: Vec<PathBuf>,
    /// `(member name, final location)` for members that were moved
    pub relocated: Vec<(PathBuf, PathBuf)>,
    pub directories: usize,
}

impl ExtractionReport {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Unpacks runtime archives into an install tree
#[derive(Debug, Clone)]
pub struct ArchiveExtractor {
    layout: InstallLayout,
}

impl ArchiveExtractor {
    pub const fn new(layout: InstallLayout) -> Self {
        Self { layout }
    }

    pub const fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Extract a gzip-compressed tarball held in memory
    pub fn extract_tar_gz(&self, data: &[u8]) -> Result<ExtractionReport> {
        self.extract(GzDecoder::new(Cursor::new(data)))
    }

    /// Extract an uncompressed tar stream
    pub fn extract<R: Read>(&self, reader: R) -> Result<ExtractionReport> {
        let base = &self.layout.base_path;
        fs::create_dir_all(base)?;
        let canonical_base = fs::canonicalize(base)?;

        let mut archive = Archive::new(reader);
        let mut report = ExtractionReport::default();

        let entries = archive
            .entries()
            .map_err(|e| InstallError::Archive(format!("Failed to read archive: {e}")))?;

        for entry in entries {
            let mut entry = entry.map_err(|e| InstallError::Archive(format!("Corrupt archive entry: {e}")))?;
            let member = entry
                .path()
                .map_err(|e| InstallError::Archive(format!("Invalid member name: {e}")))?
                .into_owned();

            let destination = InstallLayout::destination(&member).ok_or_else(|| {
                InstallError::Archive(format!("Member escapes the install tree: {}", member.display()))
            })?;
            let target = base.join(&destination);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
                // A link unpacked earlier must not redirect writes out of the base
                if !fs::canonicalize(parent)?.starts_with(&canonical_base) {
                    return Err(InstallError::Archive(format!(
                        "Member escapes the install tree: {}",
                        member.display()
                    )));
                }
            }

            let entry_type = entry.header().entry_type();
            if entry_type == EntryType::Symlink {
                Self::check_symlink(&entry, &destination)?;
            }
            if entry_type == EntryType::Link {
                self.unpack_hard_link(&entry, &target)?;
            } else {
                // Overwrite files left behind by a previous install
                if entry_type != EntryType::Directory && fs::symlink_metadata(&target).is_ok() {
                    fs::remove_file(&target)?;
                }
                entry.unpack(&target).map_err(|e| {
                    InstallError::Archive(format!("Failed to unpack {}: {e}", member.display()))
                })?;
            }

            if entry_type == EntryType::Directory {
                report.directories += 1;
                continue;
            }

            if destination != member {
                tracing::debug!(from = %member.display(), to = %destination.display(), "relocated");
                report.relocated.push((member, destination.clone()));
            }
            report.files.push(destination);
        }

        tracing::info!(
            files = report.files.len(),
            relocated = report.relocated.len(),
            base = %base.display(),
            "archive extracted"
        );
        Ok(report)
    }

    /// Symlinks may only point at paths inside the base
    fn check_symlink<R: Read>(entry: &tar::Entry<'_, R>, destination: &Path) -> Result<()> {
        let link_name = entry
            .link_name()
            .map_err(|e| InstallError::Archive(format!("Invalid link target: {e}")))?
            .ok_or_else(|| InstallError::Archive("Symlink without a target".to_string()))?;
        let link_dir = destination.parent().unwrap_or_else(|| Path::new(""));

        if resolve_link(link_dir, &link_name).is_none() {
            return Err(InstallError::Archive(format!(
                "Link target escapes the install tree: {} -> {}",
                destination.display(),
                link_name.display()
            )));
        }
        Ok(())
    }

    /// Hard links name another member; point them at that member's final location
    fn unpack_hard_link<R: Read>(&self, entry: &tar::Entry<'_, R>, target: &Path) -> Result<()> {
        let link_name = entry
            .link_name()
            .map_err(|e| InstallError::Archive(format!("Invalid link target: {e}")))?
            .ok_or_else(|| InstallError::Archive("Hard link without a target".to_string()))?;
        let source = InstallLayout::destination(&link_name).ok_or_else(|| {
            InstallError::Archive(format!("Link target escapes the install tree: {}", link_name.display()))
        })?;

        if fs::symlink_metadata(target).is_ok() {
            fs::remove_file(target)?;
        }
        fs::copy(self.layout.base_path.join(source), target)?;
        Ok(())
    }

    /// Move the macOS terminal app from `gr/Applications/` to `gr/`
    pub fn relocate_gksterm(&self) -> Result<PathBuf> {
        let from = self.layout.bundled_gksterm();
        let to = self.layout.gksterm();

        if !from.exists() {
            return Err(InstallError::Archive(format!(
                "Archive did not contain {}",
                from.display()
            )));
        }
        if to.exists() {
            fs::remove_dir_all(&to)?;
        }
        fs::rename(&from, &to)?;
        tracing::debug!(to = %to.display(), "moved GKSTerm.app");
        Ok(to)
    }
}

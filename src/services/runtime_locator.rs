use std::path::{Path, PathBuf};

use crate::models::layout::{runtime_library_name, InstallLayout};

const SYSTEM_GRDIR: &str = "/usr/local/gr";

/// Finds an installed GR runtime library
#[derive(Debug, Clone)]
pub struct RuntimeLocator {
    library_name: String,
    search_dirs: Vec<PathBuf>,
}

impl RuntimeLocator {
    /// Search order: the package directory, `$GRDIR/lib`, any extra
    /// directories, then the system-wide GR install.
    pub fn new(layout: &InstallLayout, grdir: Option<&Path>, extra_dirs: &[PathBuf]) -> Self {
        let mut search_dirs = vec![layout.package_dir()];
        if let Some(grdir) = grdir {
            search_dirs.push(grdir.join("lib"));
        }
        search_dirs.extend(extra_dirs.iter().cloned());
        if !cfg!(windows) {
            search_dirs.push(Path::new(SYSTEM_GRDIR).join("lib"));
        }

        Self {
            library_name: runtime_library_name(std::env::consts::OS).to_string(),
            search_dirs,
        }
    }

    /// Search only the given directories
    pub fn with_dirs(library_name: impl Into<String>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            library_name: library_name.into(),
            search_dirs,
        }
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Candidate library paths in search order
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(&self.library_name))
            .collect()
    }

    /// Location of the first runtime library found, if any.
    ///
    /// With `silent` unset every checked location is reported.
    pub fn load_runtime(&self, silent: bool) -> Option<PathBuf> {
        for candidate in self.candidates() {
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "found GR runtime");
                return Some(candidate);
            }
            if silent {
                tracing::debug!(path = %candidate.display(), "no GR runtime");
            } else {
                tracing::info!(path = %candidate.display(), "no GR runtime");
            }
        }

        if !silent {
            tracing::warn!(library = %self.library_name, "GR runtime not found in any search directory");
        }
        None
    }
}

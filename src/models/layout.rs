use std::path::{Component, Path, PathBuf};

/// Name of the bindings' package directory inside the install base
pub const PACKAGE_DIR: &str = "gr";

/// Files bundled with the `gr` package, relative to the package directory
pub const PACKAGE_DATA: &[&str] = &[
    "*.so",
    "*.dll",
    "lib/*.so",
    "lib/*.dll",
    "fonts/*",
    "GKSTerm.app/Contents/*",
    "GKSTerm.app/Contents/*/*",
    "GKSTerm.app/Contents/*/*/*",
];

/// Directory layout of an installed runtime
///
/// The archive unpacks into `<base>/gr/`. Shared libraries shipped under
/// `gr/lib/` are lifted into `gr/` so the bindings find them next to their
/// own modules; plugins stay in `gr/lib/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub base_path: PathBuf,
}

impl InstallLayout {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn package_dir(&self) -> PathBuf {
        self.base_path.join(PACKAGE_DIR)
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.package_dir().join("lib")
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.package_dir().join("fonts")
    }

    pub fn receipt_path(&self) -> PathBuf {
        self.package_dir().join(".grinstall-receipt.json")
    }

    /// Where the macOS terminal app ships inside the archive
    pub fn bundled_gksterm(&self) -> PathBuf {
        self.package_dir().join("Applications").join("GKSTerm.app")
    }

    /// Where the bindings expect the macOS terminal app
    pub fn gksterm(&self) -> PathBuf {
        self.package_dir().join("GKSTerm.app")
    }

    /// Final location of an archive member, relative to the base path.
    ///
    /// Returns `None` when the member name is not a plain relative path.
    pub fn destination(member: &Path) -> Option<PathBuf> {
        if !is_contained(member) {
            return None;
        }

        let in_lib_dir = member.parent() == Some(Path::new(PACKAGE_DIR).join("lib").as_path());
        let Some(file_name) = member.file_name() else {
            return Some(member.to_path_buf());
        };

        if in_lib_dir && !file_name.to_string_lossy().contains("plugin") {
            return Some(Path::new(PACKAGE_DIR).join(file_name));
        }
        Some(member.to_path_buf())
    }
}

/// Relative path with no root, prefix, or parent components
pub fn is_contained(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Resolve a symlink target against the directory holding the link.
///
/// Returns the target relative to the base path, or `None` when it is
/// absolute or climbs out of the base.
pub fn resolve_link(link_dir: &Path, target: &Path) -> Option<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in link_dir.components().chain(target.components()) {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// Platform file name of the runtime's core library
pub fn runtime_library_name(os: &str) -> &'static str {
    match os {
        "macos" => "libGR.dylib",
        "windows" => "libGR.dll",
        _ => "libGR.so",
    }
}

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LOCATIONS_DIR: &str = "assets/lucrari";
pub const DEFAULT_OUTPUT: &str = "assets/locations.json";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory the public image paths are made relative to.
    pub project_root: PathBuf,
    /// One subfolder per location.
    pub locations_dir: PathBuf,
    pub output: PathBuf,
}

impl GeneratorConfig {
    /// Resolves `locations_dir` and `output` against `project_root` unless
    /// they are already absolute.
    pub fn new(
        project_root: impl Into<PathBuf>,
        locations_dir: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Self {
        let project_root = project_root.into();
        Self {
            locations_dir: project_root.join(locations_dir),
            output: project_root.join(output),
            project_root,
        }
    }

    pub fn with_defaults(project_root: impl Into<PathBuf>) -> Self {
        Self::new(project_root, DEFAULT_LOCATIONS_DIR, DEFAULT_OUTPUT)
    }

    /// The locations directory as seen from the project root, `/`-separated.
    /// Falls back to the directory's own name when it lives elsewhere.
    pub fn public_prefix(&self) -> String {
        let rel = self
            .locations_dir
            .strip_prefix(&self.project_root)
            .unwrap_or_else(|_| Path::new(self.locations_dir.file_name().unwrap_or_default()));
        posix_join(rel)
    }

    pub fn output_display(&self) -> String {
        match self.output.strip_prefix(&self.project_root) {
            Ok(rel) => posix_join(rel),
            Err(_) => self.output.display().to_string(),
        }
    }
}

/// Joins the normal components of `path` with `/`, dropping `.` segments.
pub fn posix_join(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

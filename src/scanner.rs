use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::collation::compare_ro;
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::{ImageRef, LocationMeta, LocationRecord};

pub const META_FILE: &str = "meta.json";
pub const DESCRIPTION_FILE: &str = "descriere.txt";
pub const THUMB_SUFFIX: &str = "_thumb";
/// Lowercase, in probing order.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingMetadata,
    NoImages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFolder {
    pub folder: String,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Sorted by title.
    pub locations: Vec<LocationRecord>,
    pub skipped: Vec<SkippedFolder>,
}

enum FolderScan {
    Location(LocationRecord),
    Skipped(SkipReason),
}

pub struct AssetScanner {
    locations_dir: PathBuf,
    public_prefix: String,
}

impl AssetScanner {
    pub fn new(locations_dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            locations_dir: locations_dir.into(),
            public_prefix: public_prefix.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.locations_dir.clone(), config.public_prefix())
    }

    /// Scans every location folder. Folders without metadata or images are
    /// skipped; unreadable or malformed metadata aborts the whole scan.
    pub fn scan(&self) -> Result<ScanOutcome> {
        info!(dir = %self.locations_dir.display(), "Scanning location folders");
        let mut outcome = ScanOutcome::default();

        for folder in self.location_folders()? {
            match self.scan_folder(&folder)? {
                FolderScan::Location(record) => {
                    debug!(folder = %folder, images = record.images.len(), "Parsed location");
                    outcome.locations.push(record);
                }
                FolderScan::Skipped(reason) => {
                    match reason {
                        SkipReason::MissingMetadata => warn!(
                            folder = %self.display_folder(&folder),
                            "Missing {}, skipping folder", META_FILE
                        ),
                        SkipReason::NoImages => warn!(
                            folder = %self.display_folder(&folder),
                            "No images found, skipping folder"
                        ),
                    }
                    outcome.skipped.push(SkippedFolder { folder, reason });
                }
            }
        }

        // stable: equal titles keep folder-name order
        outcome.locations.sort_by(|a, b| compare_ro(&a.title, &b.title));
        Ok(outcome)
    }

    fn location_folders(&self) -> Result<Vec<String>> {
        let mut folders = Vec::new();
        for entry in WalkDir::new(&self.locations_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| Error::ReadDir {
                path: self.locations_dir.clone(),
                source: err.into(),
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => folders.push(name.to_string()),
                None => warn!(path = %entry.path().display(), "Skipping folder with non UTF-8 name"),
            }
        }
        Ok(folders)
    }

    fn scan_folder(&self, folder: &str) -> Result<FolderScan> {
        let dir = self.locations_dir.join(folder);
        let meta_path = dir.join(META_FILE);
        if !meta_path.exists() {
            return Ok(FolderScan::Skipped(SkipReason::MissingMetadata));
        }

        let meta = read_meta(&meta_path)?;
        let description = read_description(&dir.join(DESCRIPTION_FILE))?;

        let images = list_images(&dir)?;
        if images.is_empty() {
            return Ok(FolderScan::Skipped(SkipReason::NoImages));
        }

        let title_for_alt = meta.title.as_deref().filter(|t| !t.is_empty());
        let images = images
            .iter()
            .enumerate()
            .map(|(index, file_name)| {
                let src = self.public_path(folder, file_name);
                let thumb = find_thumbnail(&dir, file_name)
                    .map(|thumb| self.public_path(folder, &thumb))
                    .unwrap_or_else(|| src.clone());
                let alt = match title_for_alt {
                    Some(title) => format!("{} - Imagine {}", title, index + 1),
                    None => format!("Imagine {}", index + 1),
                };
                ImageRef { src, thumb, alt }
            })
            .collect();

        Ok(FolderScan::Location(LocationRecord {
            id: meta.id.unwrap_or_else(|| folder.to_string()),
            title: meta.title.unwrap_or_else(|| folder.to_string()),
            subtitle: meta.subtitle.unwrap_or_default(),
            description,
            lat: meta.lat,
            lng: meta.lng,
            images,
        }))
    }

    /// `./<prefix>/<folder>/<file>` with `/` separators on every platform.
    fn public_path(&self, folder: &str, file_name: &str) -> String {
        let parts: Vec<&str> = [self.public_prefix.as_str(), folder, file_name]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        format!("./{}", parts.join("/"))
    }

    fn display_folder(&self, folder: &str) -> String {
        if self.public_prefix.is_empty() {
            format!("{}/", folder)
        } else {
            format!("{}/{}/", self.public_prefix, folder)
        }
    }
}

fn read_meta(path: &Path) -> Result<LocationMeta> {
    let raw = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| Error::InvalidMetadata {
        path: path.to_path_buf(),
        source,
    })
}

fn read_description(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .map(|text| {
            text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
                .to_string()
        })
        .map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })
}

fn split_name(file_name: &str) -> Option<(&str, &str)> {
    let path = Path::new(file_name);
    Some((path.file_stem()?.to_str()?, path.extension()?.to_str()?))
}

fn is_image(file_name: &str) -> bool {
    split_name(file_name)
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_thumbnail(file_name: &str) -> bool {
    split_name(file_name)
        .map(|(stem, _)| stem.ends_with(THUMB_SUFFIX))
        .unwrap_or(false)
}

/// Full-size images directly inside `dir`, in Romanian collation order.
pub fn list_images(dir: &Path) -> Result<Vec<String>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| Error::ReadDir {
            path: dir.to_path_buf(),
            source: err.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if is_image(name) && !is_thumbnail(name) {
            images.push(name.to_string());
        }
    }
    images.sort_by(|a, b| compare_ro(a, b));
    Ok(images)
}

/// Looks for `<stem>_thumb.<ext>` next to `file_name`, trying the image's own
/// extension first and then every allowed extension in order.
pub fn find_thumbnail(dir: &Path, file_name: &str) -> Option<String> {
    let (stem, ext) = split_name(file_name)?;
    std::iter::once(ext)
        .chain(IMAGE_EXTENSIONS)
        .map(|candidate| format!("{}{}.{}", stem, THUMB_SUFFIX, candidate))
        .find(|candidate| dir.join(candidate).exists())
}

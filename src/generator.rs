use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::scanner::{AssetScanner, SkippedFolder};
use crate::{LocationRecord, LocationsDocument, DOCUMENT_VERSION};

#[derive(Debug)]
pub struct GenerationReport {
    pub output: PathBuf,
    pub location_count: usize,
    pub skipped: Vec<SkippedFolder>,
}

/// Rebuilds `locations.json` from scratch. Nothing is written unless the
/// whole scan succeeds.
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport> {
    let outcome = AssetScanner::from_config(config).scan()?;
    let document = build_document(outcome.locations);
    write_document(&config.output, &document)?;

    info!(
        output = %config.output_display(),
        locations = document.locations.len(),
        skipped = outcome.skipped.len(),
        "Generated locations document"
    );

    Ok(GenerationReport {
        output: config.output.clone(),
        location_count: document.locations.len(),
        skipped: outcome.skipped,
    })
}

pub fn build_document(locations: Vec<LocationRecord>) -> LocationsDocument {
    LocationsDocument {
        version: DOCUMENT_VERSION,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        locations,
    }
}

/// Pretty-printed JSON with a trailing newline.
pub fn render_document(document: &LocationsDocument) -> Result<String> {
    let mut json = serde_json::to_string_pretty(document)?;
    json.push('\n');
    Ok(json)
}

pub fn write_document(path: &Path, document: &LocationsDocument) -> Result<()> {
    let json = render_document(document)?;
    let write_err = |source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    // rename over the old file so the map never fetches a half-written one
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        write_err(source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use tempfile::TempDir;

    #[test]
    fn timestamp_is_iso8601_with_millis() {
        let doc = build_document(Vec::new());
        assert!(doc.generated_at.ends_with('Z'));
        assert_eq!(doc.generated_at.len(), "2026-10-15T08:30:00.000Z".len());
        assert!(DateTime::parse_from_rfc3339(&doc.generated_at).is_ok());
    }

    #[test]
    fn rendered_document_is_pretty_with_trailing_newline() {
        let doc = LocationsDocument {
            version: 1,
            generated_at: "2026-10-15T08:30:00.000Z".into(),
            locations: Vec::new(),
        };
        let json = render_document(&doc).unwrap();
        assert_eq!(
            json,
            "{\n  \"version\": 1,\n  \"generatedAt\": \"2026-10-15T08:30:00.000Z\",\n  \"locations\": []\n}\n"
        );
    }

    #[test]
    fn write_creates_missing_directories() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("a/b/locations.json");
        write_document(&out, &build_document(Vec::new())).unwrap();

        assert!(out.is_file());
        assert!(!tmp.path().join("a/b/locations.json.tmp").exists());
    }
}

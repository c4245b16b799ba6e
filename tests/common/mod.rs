#![allow(dead_code)]

use std::fs;
use std::path::Path;

use location_map::presenter::{Bounds, LatLng, MapConfig, MapSurface, MarkerId};
use location_map::{ImageRef, LocationRecord};
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Configure,
    MaxBounds(Option<Bounds>),
    AddMarker(MarkerId, LatLng, String),
    OpenTooltip(MarkerId),
    CloseTooltip(MarkerId),
    OpenPopup(MarkerId, String),
    ClosePopup(MarkerId),
    SetHero(MarkerId, String),
    ThumbSelected(MarkerId, usize, bool),
    ShowOverlay(String),
    HideOverlay,
}

/// Records every call the presenter makes on the map widget.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
}

impl RecordingSurface {
    pub fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl MapSurface for RecordingSurface {
    fn configure(&mut self, _config: &MapConfig) {
        self.calls.push(Call::Configure);
    }

    fn set_max_bounds(&mut self, bounds: Option<Bounds>) {
        self.calls.push(Call::MaxBounds(bounds));
    }

    fn add_marker(&mut self, marker: MarkerId, position: LatLng, tooltip: &str) {
        self.calls.push(Call::AddMarker(marker, position, tooltip.to_string()));
    }

    fn open_tooltip(&mut self, marker: MarkerId) {
        self.calls.push(Call::OpenTooltip(marker));
    }

    fn close_tooltip(&mut self, marker: MarkerId) {
        self.calls.push(Call::CloseTooltip(marker));
    }

    fn open_popup(&mut self, marker: MarkerId, html: &str) {
        self.calls.push(Call::OpenPopup(marker, html.to_string()));
    }

    fn close_popup(&mut self, marker: MarkerId) {
        self.calls.push(Call::ClosePopup(marker));
    }

    fn set_hero(&mut self, marker: MarkerId, image: &ImageRef) {
        self.calls.push(Call::SetHero(marker, image.src.clone()));
    }

    fn set_thumbnail_selected(&mut self, marker: MarkerId, index: usize, selected: bool) {
        self.calls.push(Call::ThumbSelected(marker, index, selected));
    }

    fn show_overlay(&mut self, image: &ImageRef) {
        self.calls.push(Call::ShowOverlay(image.src.clone()));
    }

    fn hide_overlay(&mut self) {
        self.calls.push(Call::HideOverlay);
    }
}

pub fn location(id: &str, title: &str, image_count: usize) -> LocationRecord {
    LocationRecord {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: String::new(),
        description: String::new(),
        lat: json!(45.0),
        lng: json!(25.0),
        images: (1..=image_count)
            .map(|n| ImageRef {
                src: format!("./assets/lucrari/{}/{}.jpg", id, n),
                thumb: format!("./assets/lucrari/{}/{}.jpg", id, n),
                alt: format!("{} - Imagine {}", title, n),
            })
            .collect(),
    }
}

/// Creates `root/<folder>` with an optional `meta.json` and empty files.
pub fn write_folder(root: &Path, folder: &str, meta: Option<&str>, files: &[&str]) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    if let Some(meta) = meta {
        fs::write(dir.join("meta.json"), meta).unwrap();
    }
    for file in files {
        fs::write(dir.join(file), b"img").unwrap();
    }
}

use std::fmt;

use serde::Serialize;

use crate::ImageRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub usize);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

/// Romania, with a little margin.
pub const ROMANIA_BOUNDS: Bounds = Bounds {
    south_west: LatLng::new(43.6, 20.2),
    north_east: LatLng::new(48.3, 29.7),
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
    pub max_native_zoom: u8,
    pub max_zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupOptions {
    pub min_width: u32,
    pub max_width: u32,
    pub auto_pan_padding: u32,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipOptions {
    pub offset: (i32, i32),
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapConfig {
    pub bounds: Bounds,
    /// Pixels kept around `bounds` when fitting the initial view.
    pub fit_padding: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub tiles: TileLayer,
    pub popup: PopupOptions,
    pub tooltip: TooltipOptions,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            bounds: ROMANIA_BOUNDS,
            fit_padding: 18,
            min_zoom: 6,
            max_zoom: 22,
            tiles: TileLayer {
                url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                attribution: "&copy; OpenStreetMap contributors".to_string(),
                max_native_zoom: 19,
                max_zoom: 22,
            },
            popup: PopupOptions {
                min_width: 320,
                max_width: 420,
                auto_pan_padding: 18,
                class_name: "map-popup".to_string(),
            },
            tooltip: TooltipOptions {
                offset: (0, -10),
                opacity: 0.95,
            },
        }
    }
}

/// The map widget. The presenter decides what happens; implementations make
/// it happen in the tile library and the page.
pub trait MapSurface {
    /// Sets up tiles, zoom limits and fits the initial view to the bounds.
    fn configure(&mut self, config: &MapConfig);
    /// `None` lets the view pan freely.
    fn set_max_bounds(&mut self, bounds: Option<Bounds>);
    fn add_marker(&mut self, marker: MarkerId, position: LatLng, tooltip: &str);
    fn open_tooltip(&mut self, marker: MarkerId);
    fn close_tooltip(&mut self, marker: MarkerId);
    fn open_popup(&mut self, marker: MarkerId, html: &str);
    fn close_popup(&mut self, marker: MarkerId);
    fn set_hero(&mut self, marker: MarkerId, image: &ImageRef);
    fn set_thumbnail_selected(&mut self, marker: MarkerId, index: usize, selected: bool);
    fn show_overlay(&mut self, image: &ImageRef);
    fn hide_overlay(&mut self);
}

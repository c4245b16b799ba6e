use std::collections::BTreeMap;

use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::presenter::gallery::{Gallery, Key, KeyOutcome};
use crate::presenter::loader::fetch_locations;
use crate::presenter::map_mode::{MapMode, MapModeTracker};
use crate::presenter::popup::PopupRenderer;
use crate::presenter::surface::{LatLng, MapConfig, MapSurface, MarkerId};
use crate::LocationRecord;

/// User input as reported by the map widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    PointerEnter(MarkerId),
    PointerLeave(MarkerId),
    MarkerActivated(MarkerId),
    ThumbnailClicked { marker: MarkerId, index: usize },
    HeroClicked(MarkerId),
    KeyPressed(Key),
    /// The lightbox close control.
    OverlayClosed,
    /// The popup was closed by the widget itself (close button, map click).
    PopupClosed(MarkerId),
}

pub struct MapPresenter<S: MapSurface> {
    surface: S,
    config: MapConfig,
    renderer: PopupRenderer,
    pins: Vec<LocationRecord>,
    popups: BTreeMap<MarkerId, Gallery>,
    mode: MapModeTracker,
}

impl<S: MapSurface> MapPresenter<S> {
    pub fn new(mut surface: S, config: MapConfig) -> Result<Self> {
        surface.configure(&config);
        surface.set_max_bounds(Some(config.bounds));
        Ok(Self {
            surface,
            config,
            renderer: PopupRenderer::new()?,
            pins: Vec::new(),
            popups: BTreeMap::new(),
            mode: MapModeTracker::default(),
        })
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn mode(&self) -> MapMode {
        self.mode.mode()
    }

    pub fn location(&self, marker: MarkerId) -> Option<&LocationRecord> {
        self.pins.get(marker.0)
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn gallery(&self, marker: MarkerId) -> Option<&Gallery> {
        self.popups.get(&marker)
    }

    /// Adds one marker per location with usable coordinates. Returns how
    /// many were added.
    pub fn add_pins(&mut self, locations: Vec<LocationRecord>) -> usize {
        let mut added = 0;
        for location in locations {
            let Some((lat, lng)) = location.coordinates() else {
                warn!(id = %location.id, "Location has no usable coordinates, no pin");
                continue;
            };
            let marker = MarkerId(self.pins.len());
            self.surface
                .add_marker(marker, LatLng::new(lat, lng), &location.title);
            self.pins.push(location);
            added += 1;
        }
        info!(pins = added, "Placed location pins");
        added
    }

    /// Fetches the document once. On failure the error is logged and the map
    /// stays without pins.
    pub async fn load_from(&mut self, client: &reqwest::Client, url: &str) -> usize {
        match fetch_locations(client, url).await {
            Ok(locations) => self.add_pins(locations),
            Err(err) => {
                error!(url, error = %err, "Cannot load locations");
                0
            }
        }
    }

    pub fn handle(&mut self, event: MapEvent) -> Result<()> {
        match event {
            MapEvent::PointerEnter(marker) => {
                self.require(marker)?;
                self.surface.open_tooltip(marker);
            }
            MapEvent::PointerLeave(marker) => {
                self.require(marker)?;
                self.surface.close_tooltip(marker);
            }
            MapEvent::MarkerActivated(marker) => {
                self.require(marker)?;
                if self.popups.contains_key(&marker) {
                    self.close_popup(marker, true);
                } else {
                    self.open_popup(marker)?;
                }
            }
            MapEvent::ThumbnailClicked { marker, index } => self.select_thumbnail(marker, index),
            MapEvent::HeroClicked(marker) => self.open_lightbox(marker),
            MapEvent::KeyPressed(key) => self.key_pressed(key),
            MapEvent::OverlayClosed => {
                if let Some(marker) = self.fullscreen_marker() {
                    self.close_lightbox(marker);
                }
            }
            MapEvent::PopupClosed(marker) => self.close_popup(marker, false),
        }
        Ok(())
    }

    fn require(&self, marker: MarkerId) -> Result<&LocationRecord> {
        self.location(marker)
            .ok_or_else(|| Error::UnknownMarker(marker.to_string()))
    }

    fn open_popup(&mut self, marker: MarkerId) -> Result<()> {
        // one popup at a time, like the widget's auto-close
        let others: Vec<MarkerId> = self.popups.keys().copied().collect();
        for other in others {
            self.close_popup(other, true);
        }

        let location = self.require(marker)?;
        let html = self.renderer.render(location)?;
        let gallery = Gallery::new(location.images.len());

        if self.mode.enter_popup() == Some(MapMode::Unrestricted) {
            self.surface.set_max_bounds(None);
        }
        self.surface.open_popup(marker, &html);
        self.popups.insert(marker, gallery);
        Ok(())
    }

    fn close_popup(&mut self, marker: MarkerId, close_surface: bool) {
        let Some(gallery) = self.popups.remove(&marker) else {
            return;
        };
        if gallery.is_fullscreen() {
            self.surface.hide_overlay();
        }
        if close_surface {
            self.surface.close_popup(marker);
        }
        if self.mode.exit_popup() == Some(MapMode::Restricted) {
            self.surface.set_max_bounds(Some(self.config.bounds));
        }
    }

    fn select_thumbnail(&mut self, marker: MarkerId, index: usize) {
        let Some((gallery, location, surface)) = self.open_parts(marker) else {
            return;
        };
        let Some(previous) = gallery.select_thumbnail(index) else {
            return;
        };
        surface.set_hero(marker, &location.images[index]);
        surface.set_thumbnail_selected(marker, previous, false);
        surface.set_thumbnail_selected(marker, index, true);
    }

    fn open_lightbox(&mut self, marker: MarkerId) {
        if let Some(current) = self.fullscreen_marker().filter(|m| *m != marker) {
            self.close_lightbox(current);
        }
        let Some((gallery, location, surface)) = self.open_parts(marker) else {
            return;
        };
        if let Some(index) = gallery.open_lightbox() {
            surface.show_overlay(&location.images[index]);
        }
    }

    fn close_lightbox(&mut self, marker: MarkerId) {
        if let Some(gallery) = self.popups.get_mut(&marker) {
            if gallery.close_lightbox() {
                self.surface.hide_overlay();
            }
        }
    }

    fn key_pressed(&mut self, key: Key) {
        let Some(marker) = self.fullscreen_marker() else {
            if key == Key::Escape {
                let open: Vec<MarkerId> = self.popups.keys().copied().collect();
                for marker in open {
                    self.close_popup(marker, true);
                }
            }
            return;
        };
        let Some((gallery, location, surface)) = self.open_parts(marker) else {
            return;
        };
        match gallery.handle_key(key) {
            KeyOutcome::Moved(index) => surface.show_overlay(&location.images[index]),
            KeyOutcome::Closed => surface.hide_overlay(),
            KeyOutcome::Ignored => {}
        }
    }

    /// The open popup's gallery, its location and the surface, borrowed together.
    fn open_parts(&mut self, marker: MarkerId) -> Option<(&mut Gallery, &LocationRecord, &mut S)> {
        let gallery = self.popups.get_mut(&marker)?;
        let location = self.pins.get(marker.0)?;
        Some((gallery, location, &mut self.surface))
    }

    fn fullscreen_marker(&self) -> Option<MarkerId> {
        self.popups
            .iter()
            .find(|(_, gallery)| gallery.is_fullscreen())
            .map(|(marker, _)| *marker)
    }
}

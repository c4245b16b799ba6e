//! Turns a loaded `locations.json` into pins and gallery popups.

pub mod escape;
pub mod gallery;
pub mod loader;
pub mod map;
pub mod map_mode;
pub mod popup;
pub mod surface;

pub use escape::escape_html;
pub use gallery::{Direction, Gallery, Key, Lightbox};
pub use map::{MapEvent, MapPresenter};
pub use map_mode::MapMode;
pub use popup::PopupRenderer;
pub use surface::{Bounds, LatLng, MapConfig, MapSurface, MarkerId};

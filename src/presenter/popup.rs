use handlebars::Handlebars;
use serde::Serialize;

use crate::error::Result;
use crate::presenter::escape::escape_html;
use crate::{ImageRef, LocationRecord};

const POPUP_TEMPLATE: &str = r#"<div class="map-popup__body" data-location-id="{{id}}">
  <h3 class="map-popup__title">{{title}}</h3>
  <div class="map-popup__subtitle">{{subtitle}}</div>
  {{#if description}}
  <div class="map-popup__description">{{description}}</div>
  {{/if}}
  <div class="gallery">
    <div class="gallery__hero">
      <img id="popup-hero-{{id}}" src="{{hero.src}}" alt="{{hero.alt}}" draggable="false" />
    </div>
    <div id="popup-thumbs-{{id}}" class="gallery__thumbs" aria-label="Miniaturi">
      {{#each thumbs}}
      <button type="button" class="gallery__thumb" data-thumb-index="{{index}}" aria-selected="{{selected}}">
        <img src="{{thumb}}" alt="{{alt}}" loading="lazy" draggable="false" />
      </button>
      {{/each}}
    </div>
  </div>
</div>
"#;

#[derive(Serialize)]
struct PopupContext<'a> {
    id: &'a str,
    title: &'a str,
    subtitle: &'a str,
    description: &'a str,
    hero: Option<&'a ImageRef>,
    thumbs: Vec<ThumbContext<'a>>,
}

#[derive(Serialize)]
struct ThumbContext<'a> {
    index: usize,
    thumb: &'a str,
    alt: &'a str,
    selected: bool,
}

/// Renders gallery popups. Every interpolated value goes through
/// [`escape_html`].
pub struct PopupRenderer {
    registry: Handlebars<'static>,
}

impl PopupRenderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(escape_html);
        registry.register_template_string("popup", POPUP_TEMPLATE)?;
        Ok(Self { registry })
    }

    /// Markup for a freshly opened popup: first image as hero, first
    /// thumbnail selected.
    pub fn render(&self, location: &LocationRecord) -> Result<String> {
        let context = PopupContext {
            id: &location.id,
            title: &location.title,
            subtitle: &location.subtitle,
            description: &location.description,
            hero: location.images.first(),
            thumbs: location
                .images
                .iter()
                .enumerate()
                .map(|(index, image)| ThumbContext {
                    index,
                    thumb: &image.thumb,
                    alt: &image.alt,
                    selected: index == 0,
                })
                .collect(),
        };
        Ok(self.registry.render("popup", &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> LocationRecord {
        LocationRecord {
            id: "hala".into(),
            title: "Hala Sud".into(),
            subtitle: "Timișoara".into(),
            images: vec![
                ImageRef {
                    src: "./a/1.jpg".into(),
                    thumb: "./a/1_thumb.jpg".into(),
                    alt: "Hala Sud - Imagine 1".into(),
                },
                ImageRef {
                    src: "./a/2.jpg".into(),
                    thumb: "./a/2.jpg".into(),
                    alt: "Hala Sud - Imagine 2".into(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn first_image_is_hero_and_selected() {
        let html = PopupRenderer::new().unwrap().render(&location()).unwrap();
        assert!(html.contains(r#"<img id="popup-hero-hala" src="./a/1.jpg" alt="Hala Sud - Imagine 1""#));
        assert!(html.contains(r#"data-thumb-index="0" aria-selected="true""#));
        assert!(html.contains(r#"data-thumb-index="1" aria-selected="false""#));
        assert!(html.contains(r#"src="./a/1_thumb.jpg""#));
        assert_eq!(html.matches("gallery__thumb\"").count(), 2);
    }

    #[test]
    fn description_block_only_when_present() {
        let renderer = PopupRenderer::new().unwrap();
        let mut loc = location();
        assert!(!renderer.render(&loc).unwrap().contains("map-popup__description"));

        loc.description = "Consolidare structură".into();
        let html = renderer.render(&loc).unwrap();
        assert!(html.contains(r#"<div class="map-popup__description">Consolidare structură</div>"#));
    }

    #[test]
    fn text_and_dom_hooks_are_escaped() {
        let mut loc = location();
        loc.title = "<script>alert(1)</script>".into();
        loc.id = "x\"><b>".into();
        let html = PopupRenderer::new().unwrap().render(&loc).unwrap();

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"id="popup-hero-x&quot;&gt;&lt;b&gt;""#));
    }

    #[test]
    fn location_without_images_renders_empty_hero() {
        let mut loc = location();
        loc.images.clear();
        let html = PopupRenderer::new().unwrap().render(&loc).unwrap();
        assert!(html.contains(r#"src="" alt="""#));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lightbox {
    Closed,
    Open { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Moved(usize),
    Closed,
    Ignored,
}

/// Per-popup state: which image is the hero and what the lightbox shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    len: usize,
    hero: usize,
    lightbox: Lightbox,
}

impl Gallery {
    /// A freshly opened gallery: first image as hero, lightbox closed.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            hero: 0,
            lightbox: Lightbox::Closed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn hero(&self) -> usize {
        self.hero
    }

    pub fn lightbox(&self) -> Lightbox {
        self.lightbox
    }

    pub fn is_fullscreen(&self) -> bool {
        matches!(self.lightbox, Lightbox::Open { .. })
    }

    /// Makes image `index` the hero. Returns the previous hero, or `None`
    /// when `index` is out of range.
    pub fn select_thumbnail(&mut self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        Some(std::mem::replace(&mut self.hero, index))
    }

    /// Opens the lightbox on the current hero.
    pub fn open_lightbox(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.lightbox = Lightbox::Open { index: self.hero };
        Some(self.hero)
    }

    /// Moves the lightbox one image, wrapping at both ends.
    pub fn step(&mut self, direction: Direction) -> Option<usize> {
        let Lightbox::Open { index } = self.lightbox else {
            return None;
        };
        let delta = match direction {
            Direction::Previous => -1,
            Direction::Next => 1,
        };
        let next = wrap(index as isize + delta, self.len);
        self.lightbox = Lightbox::Open { index: next };
        Some(next)
    }

    /// Returns whether the lightbox was open.
    pub fn close_lightbox(&mut self) -> bool {
        let was_open = self.is_fullscreen();
        self.lightbox = Lightbox::Closed;
        was_open
    }

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        if !self.is_fullscreen() {
            return KeyOutcome::Ignored;
        }
        let direction = match key {
            Key::ArrowLeft => Direction::Previous,
            Key::ArrowRight => Direction::Next,
            Key::Escape => {
                self.close_lightbox();
                return KeyOutcome::Closed;
            }
            Key::Other => return KeyOutcome::Ignored,
        };
        self.step(direction)
            .map_or(KeyOutcome::Ignored, KeyOutcome::Moved)
    }
}

fn wrap(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

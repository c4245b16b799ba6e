/// Bounds are relaxed while a popup is open so auto-pan can leave them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapMode {
    #[default]
    Restricted,
    Unrestricted,
}

/// Tracks open popups and reports mode transitions the surface must apply.
#[derive(Debug, Default)]
pub struct MapModeTracker {
    open_popups: usize,
}

impl MapModeTracker {
    pub fn mode(&self) -> MapMode {
        if self.open_popups == 0 {
            MapMode::Restricted
        } else {
            MapMode::Unrestricted
        }
    }

    /// Returns the new mode if this popup changed it.
    pub fn enter_popup(&mut self) -> Option<MapMode> {
        self.open_popups += 1;
        (self.open_popups == 1).then_some(MapMode::Unrestricted)
    }

    pub fn exit_popup(&mut self) -> Option<MapMode> {
        if self.open_popups == 0 {
            return None;
        }
        self.open_popups -= 1;
        (self.open_popups == 0).then_some(MapMode::Restricted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relaxes_while_any_popup_is_open() {
        let mut tracker = MapModeTracker::default();
        assert_eq!(tracker.mode(), MapMode::Restricted);
        assert_eq!(tracker.enter_popup(), Some(MapMode::Unrestricted));
        assert_eq!(tracker.enter_popup(), None);
        assert_eq!(tracker.exit_popup(), None);
        assert_eq!(tracker.mode(), MapMode::Unrestricted);
        assert_eq!(tracker.exit_popup(), Some(MapMode::Restricted));
    }

    #[test]
    fn unbalanced_exit_is_ignored() {
        let mut tracker = MapModeTracker::default();
        assert_eq!(tracker.exit_popup(), None);
        assert_eq!(tracker.mode(), MapMode::Restricted);
    }
}

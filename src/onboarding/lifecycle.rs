//! Visibility lifecycle, driven by show/hide requests and by the rendering
//! layer reporting that its transition has finished.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Hidden,
    Appearing,
    Visible,
    Disappearing,
}

impl Visibility {
    pub fn initial(visible: bool) -> Self {
        if visible { Self::Visible } else { Self::Hidden }
    }

    /// Whether the wizard is requested to be on screen.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Appearing | Self::Visible)
    }

    /// Whether the wizard is mounted. Stays true while the hide transition runs.
    pub fn should_render(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Apply a show/hide request. `None` if it doesn't change anything.
    pub fn request(self, visible: bool) -> Option<Self> {
        match (self, visible) {
            (Self::Hidden | Self::Disappearing, true) => Some(Self::Appearing),
            (Self::Appearing | Self::Visible, false) => Some(Self::Disappearing),
            _ => None,
        }
    }

    /// Apply the end of a transition. `None` if nothing was transitioning.
    pub fn settle(self) -> Option<Self> {
        match self {
            Self::Appearing => Some(Self::Visible),
            Self::Disappearing => Some(Self::Hidden),
            Self::Hidden | Self::Visible => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_then_settle() {
        let appearing = Visibility::Hidden.request(true).unwrap();
        assert_eq!(appearing, Visibility::Appearing);
        assert!(appearing.should_render());
        assert_eq!(appearing.settle(), Some(Visibility::Visible));
    }

    #[test]
    fn hide_keeps_rendering_until_settled() {
        let disappearing = Visibility::Visible.request(false).unwrap();
        assert!(!disappearing.is_visible());
        assert!(disappearing.should_render());

        let hidden = disappearing.settle().unwrap();
        assert!(!hidden.should_render());
    }

    #[test]
    fn show_during_hide_transition_reappears() {
        assert_eq!(
            Visibility::Disappearing.request(true),
            Some(Visibility::Appearing)
        );
    }

    #[test]
    fn redundant_requests_are_ignored() {
        assert_eq!(Visibility::Visible.request(true), None);
        assert_eq!(Visibility::Appearing.request(true), None);
        assert_eq!(Visibility::Hidden.request(false), None);
        assert_eq!(Visibility::Hidden.settle(), None);
        assert_eq!(Visibility::Visible.settle(), None);
    }
}

//! Modal viewer over a frozen snapshot of the visible media list.
//!
//! The snapshot is captured when the lightbox opens; later filter changes do
//! not touch it, so the current index always stays valid. Navigation wraps in
//! both directions.

use tracing::{debug, trace};

use super::keybindings::{lightbox_action, Key, LightboxAction};
use crate::error::LightboxError;
use crate::models::{MediaItem, MediaKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LightboxState {
    #[default]
    Closed,
    Open {
        snapshot: Vec<MediaItem>,
        index: usize,
    },
}

/// How the current item is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Static image scaled to fit the viewport, never autoplayed.
    FitImage,
    /// Video with user-facing controls, started automatically.
    Video { controls: bool, autoplay: bool },
}

impl Playback {
    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Self::FitImage,
            MediaKind::Video => Self::Video {
                controls: true,
                autoplay: true,
            },
        }
    }
}

/// Everything the host needs to draw the open lightbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation<'a> {
    pub item: &'a MediaItem,
    pub playback: Playback,
    /// Previous/next arrows are hidden for a single-item snapshot.
    pub show_arrows: bool,
    /// 1-based position and snapshot length, shown only with arrows.
    pub counter: Option<(usize, usize)>,
}

#[derive(Debug, Clone, Default)]
pub struct LightboxController {
    state: LightboxState,
}

impl LightboxController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open { .. })
    }

    /// Background scrolling is suppressed for as long as the lightbox is open.
    pub fn background_scroll_locked(&self) -> bool {
        self.is_open()
    }

    pub fn current_index(&self) -> Option<usize> {
        match &self.state {
            LightboxState::Open { index, .. } => Some(*index),
            LightboxState::Closed => None,
        }
    }

    pub fn current(&self) -> Option<&MediaItem> {
        match &self.state {
            LightboxState::Open { snapshot, index } => snapshot.get(*index),
            LightboxState::Closed => None,
        }
    }

    pub fn snapshot_len(&self) -> usize {
        match &self.state {
            LightboxState::Open { snapshot, .. } => snapshot.len(),
            LightboxState::Closed => 0,
        }
    }

    /// Opens on `visible[index]`, freezing `visible` as the navigable list.
    ///
    /// Out-of-range indices are clamped to the last item. Opening while
    /// already open replaces the snapshot.
    pub fn open(&mut self, visible: Vec<MediaItem>, index: usize) -> Result<(), LightboxError> {
        if visible.is_empty() {
            return Err(LightboxError::EmptySnapshot);
        }
        let clamped = index.min(visible.len() - 1);
        if clamped != index {
            debug!(requested = index, clamped, "Clamped lightbox index");
        }
        debug!(index = clamped, len = visible.len(), "Opened lightbox");
        self.state = LightboxState::Open {
            snapshot: visible,
            index: clamped,
        };
        Ok(())
    }

    /// Returns false if the lightbox was already closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = LightboxState::Closed;
        debug!("Closed lightbox");
        true
    }

    /// Clicking outside the media content closes the viewer.
    pub fn click_backdrop(&mut self) -> bool {
        self.close()
    }

    pub fn next(&mut self) -> Option<usize> {
        self.step(|index, len| (index + 1) % len)
    }

    pub fn previous(&mut self) -> Option<usize> {
        self.step(|index, len| if index == 0 { len - 1 } else { index - 1 })
    }

    fn step(&mut self, advance: impl Fn(usize, usize) -> usize) -> Option<usize> {
        match &mut self.state {
            LightboxState::Open { snapshot, index } => {
                *index = advance(*index, snapshot.len());
                trace!(index = *index, "Lightbox moved");
                Some(*index)
            }
            LightboxState::Closed => None,
        }
    }

    pub fn apply(&mut self, action: LightboxAction) -> bool {
        match action {
            LightboxAction::Close => self.close(),
            LightboxAction::Next => self.next().is_some(),
            LightboxAction::Previous => self.previous().is_some(),
        }
    }

    /// Handles a key press; bindings are only live while open.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.is_open() {
            return false;
        }
        match lightbox_action(key) {
            Some(action) => self.apply(action),
            None => false,
        }
    }

    pub fn presentation(&self) -> Option<Presentation<'_>> {
        let LightboxState::Open { snapshot, index } = &self.state else {
            return None;
        };
        let item = snapshot.get(*index)?;
        let show_arrows = snapshot.len() > 1;
        Some(Presentation {
            item,
            playback: Playback::for_kind(item.kind),
            show_arrows,
            counter: show_arrows.then(|| (*index + 1, snapshot.len())),
        })
    }
}

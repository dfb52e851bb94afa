use std::collections::BTreeMap;

use crate::ClipId;

/// Ephemeral UI flags for one rendered clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipInteractionState {
    liked: bool,
    link_copied: bool,
    preview_open: bool,
    downloading: bool,
    copy_generation: u64,
}

impl ClipInteractionState {
    pub fn liked(&self) -> bool {
        self.liked
    }

    pub fn link_copied(&self) -> bool {
        self.link_copied
    }

    pub fn preview_open(&self) -> bool {
        self.preview_open
    }

    pub fn downloading(&self) -> bool {
        self.downloading
    }

    pub fn copy_generation(&self) -> u64 {
        self.copy_generation
    }

    pub fn toggle_like(&mut self) {
        self.liked = !self.liked;
    }

    /// Returns the generation a later [`Self::expire_copied`] must present.
    pub fn mark_copied(&mut self) -> u64 {
        self.copy_generation += 1;
        self.link_copied = true;
        self.copy_generation
    }

    /// Clears the copied flag unless a newer copy has happened since.
    pub fn expire_copied(&mut self, generation: u64) -> bool {
        if generation != self.copy_generation || !self.link_copied {
            return false;
        }
        self.link_copied = false;
        true
    }

    pub fn open_preview(&mut self) -> bool {
        !std::mem::replace(&mut self.preview_open, true)
    }

    pub fn close_preview(&mut self) -> bool {
        std::mem::replace(&mut self.preview_open, false)
    }

    pub fn begin_download(&mut self) -> bool {
        !std::mem::replace(&mut self.downloading, true)
    }

    pub fn finish_download(&mut self) -> bool {
        std::mem::replace(&mut self.downloading, false)
    }
}

/// Where a request to close the preview came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOrigin {
    CloseButton,
    DismissKey,
    Backdrop,
    /// A click inside the preview surface itself.
    Surface,
}

impl CloseOrigin {
    pub fn closes_preview(self) -> bool {
        !matches!(self, CloseOrigin::Surface)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The user dismissed the share sheet. Not an error.
    Cancelled,
}

/// Interaction state for every mounted clip, keyed by clip id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionRegistry {
    states: BTreeMap<ClipId, ClipInteractionState>,
}

impl InteractionRegistry {
    pub fn mount(&mut self, clip_id: ClipId) -> bool {
        if self.states.contains_key(&clip_id) {
            return false;
        }
        self.states.insert(clip_id, ClipInteractionState::default());
        true
    }

    pub fn unmount(&mut self, clip_id: &str) -> bool {
        self.states.remove(clip_id).is_some()
    }

    pub fn get(&self, clip_id: &str) -> Option<&ClipInteractionState> {
        self.states.get(clip_id)
    }

    pub fn get_mut(&mut self, clip_id: &str) -> Option<&mut ClipInteractionState> {
        self.states.get_mut(clip_id)
    }

    pub fn clear(&mut self) -> bool {
        let had_any = !self.states.is_empty();
        self.states.clear();
        had_any
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

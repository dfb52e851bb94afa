use std::collections::VecDeque;

use crate::normalize::NormalizedResponse;
use crate::view_model::{AppViewModel, ClipCardView};
use crate::{
    Clip, ClipId, ClipInteractionState, InteractionRegistry, RequestId, SideEffectFailure,
    SubmissionSession, SubmissionStatus,
};

/// Oldest diagnostics are discarded beyond this many entries.
pub const MAX_DIAGNOSTICS: usize = 32;

/// What the host platform can do; fixed for the lifetime of the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCapabilities {
    pub native_share: bool,
}

/// A side-effect failure reported on the diagnostic channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub clip_id: ClipId,
    pub failure: SideEffectFailure,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    input: String,
    session: SubmissionSession,
    interactions: InteractionRegistry,
    capabilities: PlatformCapabilities,
    diagnostics: VecDeque<Diagnostic>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(capabilities: PlatformCapabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let clips = self
            .session
            .clips()
            .iter()
            .map(|clip| ClipCardView::new(clip, self.interactions.get(&clip.id).copied()))
            .collect();
        AppViewModel {
            status: self.session.status(),
            input: self.input.clone(),
            input_error: self.session.input_error().map(ToOwned::to_owned),
            error_message: self.session.error_message().map(ToOwned::to_owned),
            session_id: self.session.session_id().map(ToOwned::to_owned),
            clips,
            diagnostics: self
                .diagnostics
                .iter()
                .map(|diagnostic| format!("{}: {}", diagnostic.clip_id, diagnostic.failure))
                .collect(),
            can_submit: self.session.status() != SubmissionStatus::Pending,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn session(&self) -> &SubmissionSession {
        &self.session
    }

    pub fn capabilities(&self) -> PlatformCapabilities {
        self.capabilities
    }

    pub fn interaction(&self, clip_id: &str) -> Option<&ClipInteractionState> {
        self.interactions.get(clip_id)
    }

    pub fn mounted_count(&self) -> usize {
        self.interactions.len()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// The clip behind a mounted card; `None` when the card is not mounted.
    pub fn mounted_clip(&self, clip_id: &str) -> Option<&Clip> {
        self.interactions.get(clip_id)?;
        self.session.clips().iter().find(|clip| clip.id == clip_id)
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.session.clear_input_error();
            self.mark_dirty();
        }
    }

    pub(crate) fn reject_input(&mut self, message: String) {
        self.session.reject_input(message);
        self.mark_dirty();
    }

    pub(crate) fn begin_submission(&mut self) -> Option<RequestId> {
        let request_id = self.session.begin()?;
        self.interactions.clear();
        self.mark_dirty();
        Some(request_id)
    }

    pub(crate) fn complete_submission(
        &mut self,
        request_id: RequestId,
        response: NormalizedResponse,
    ) {
        if self.session.succeed(request_id, response) {
            self.mark_dirty();
        }
    }

    pub(crate) fn fail_submission(&mut self, request_id: RequestId, message: String) {
        if self.session.fail(request_id, message) {
            self.mark_dirty();
        }
    }

    pub(crate) fn reset_session(&mut self) {
        self.session.reset();
        self.interactions.clear();
        self.mark_dirty();
    }

    /// Creates interaction state for a clip in the current result set.
    pub(crate) fn mount_clip(&mut self, clip_id: ClipId) -> bool {
        let known = self.session.clips().iter().any(|clip| clip.id == clip_id);
        if known && self.interactions.mount(clip_id) {
            self.mark_dirty();
            return true;
        }
        false
    }

    pub(crate) fn unmount_clip(&mut self, clip_id: &str) -> bool {
        let removed = self.interactions.unmount(clip_id);
        if removed {
            self.mark_dirty();
        }
        removed
    }

    /// Runs `change` against a mounted clip's state. `change` reports whether
    /// it modified anything; `None` means the clip is not mounted.
    pub(crate) fn with_interaction<R>(
        &mut self,
        clip_id: &str,
        change: impl FnOnce(&mut ClipInteractionState) -> (bool, R),
    ) -> Option<R> {
        let interaction = self.interactions.get_mut(clip_id)?;
        let (changed, result) = change(interaction);
        if changed {
            self.mark_dirty();
        }
        Some(result)
    }

    pub(crate) fn record_diagnostic(&mut self, clip_id: ClipId, failure: SideEffectFailure) {
        if self.diagnostics.len() == MAX_DIAGNOSTICS {
            self.diagnostics.pop_front();
        }
        self.diagnostics.push_back(Diagnostic { clip_id, failure });
        self.mark_dirty();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

use crate::normalize::NormalizedResponse;
use crate::Clip;

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// State of the current submission.
///
/// Transitions: `Idle|Succeeded|Failed -> Pending` on begin, `Pending ->
/// Succeeded|Failed` on resolution of the outstanding request, `* -> Idle` on
/// reset. Every other attempt is refused and leaves the session untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionSession {
    status: SubmissionStatus,
    session_id: Option<String>,
    clips: Vec<Clip>,
    error_message: Option<String>,
    input_error: Option<String>,
    outstanding: Option<RequestId>,
    last_request_id: RequestId,
}

impl SubmissionSession {
    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn input_error(&self) -> Option<&str> {
        self.input_error.as_deref()
    }

    pub fn outstanding_request(&self) -> Option<RequestId> {
        self.outstanding
    }

    pub fn is_awaiting(&self, request_id: RequestId) -> bool {
        self.status == SubmissionStatus::Pending && self.outstanding == Some(request_id)
    }

    /// Starts a new request unless one is already pending.
    pub(crate) fn begin(&mut self) -> Option<RequestId> {
        if self.status == SubmissionStatus::Pending {
            return None;
        }
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.status = SubmissionStatus::Pending;
        self.session_id = None;
        self.clips.clear();
        self.error_message = None;
        self.input_error = None;
        self.outstanding = Some(request_id);
        Some(request_id)
    }

    pub(crate) fn succeed(&mut self, request_id: RequestId, response: NormalizedResponse) -> bool {
        if !self.is_awaiting(request_id) {
            return false;
        }
        self.status = SubmissionStatus::Succeeded;
        self.session_id = Some(response.session_id);
        self.clips = response.clips;
        self.outstanding = None;
        true
    }

    pub(crate) fn fail(&mut self, request_id: RequestId, message: String) -> bool {
        if !self.is_awaiting(request_id) {
            return false;
        }
        self.status = SubmissionStatus::Failed;
        self.error_message = Some(message);
        self.outstanding = None;
        true
    }

    /// Back to `Idle`. Request ids keep counting so a late response to a
    /// request started before the reset can never match a new one.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            last_request_id: self.last_request_id,
            ..Self::default()
        };
    }

    pub(crate) fn reject_input(&mut self, message: String) {
        self.input_error = Some(message);
    }

    pub(crate) fn clear_input_error(&mut self) -> bool {
        self.input_error.take().is_some()
    }
}

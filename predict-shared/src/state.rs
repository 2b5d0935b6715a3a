//! Upload state and the reducer that drives it.
//!
//! The whole client is described by one immutable [`UploadState`]. Every user
//! action and network outcome is an [`UploadEvent`], and
//! [`UploadState::reduce`] maps `(state, event)` to the next state. A rejected
//! event returns an error and the caller keeps its previous state.

use std::sync::Arc;

use crate::config::SelectionPolicy;
use crate::error::{PredictError, UploadError};
use crate::types::{validate_media_type, ResultBundle, SelectedImage};

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// The user picked a file.
    FileSelected(SelectedImage),
    /// The form was submitted; a request is about to be issued.
    SubmitStarted,
    /// The request finished with a decoded response.
    SubmitSucceeded(Arc<ResultBundle>),
    /// The request failed in transport, status or decoding.
    SubmitFailed(PredictError),
    /// The request was aborted before it settled.
    SubmitCancelled,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    /// File awaiting submission
    pub selected: Option<SelectedImage>,
    /// Results of the last successful request
    pub results: Option<Arc<ResultBundle>>,
    /// True while a request is outstanding
    pub busy: bool,
    /// Bumped on every accepted selection
    pub selection_generation: u64,
    /// Generation of the selection that is being submitted
    pub submitted_generation: Option<u64>,
}

impl UploadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submission is possible when nothing is in flight.
    pub fn can_submit(&self) -> bool {
        !self.busy
    }

    pub fn histogram(&self) -> Option<&[f64]> {
        self.results.as_deref().map(|r| r.histogram.as_slice())
    }

    /// Compute the state that follows `event`.
    pub fn reduce(
        &self,
        event: UploadEvent,
        policy: SelectionPolicy,
    ) -> Result<UploadState, UploadError> {
        let mut next = self.clone();
        match event {
            UploadEvent::FileSelected(image) => {
                validate_media_type(&image.media_type)?;
                next.selected = Some(image);
                next.selection_generation += 1;
            }
            UploadEvent::SubmitStarted => {
                if self.busy {
                    return Err(UploadError::SubmitInFlight);
                }
                if self.selected.is_none() {
                    return Err(UploadError::NoImageSelected);
                }
                next.busy = true;
                next.submitted_generation = Some(self.selection_generation);
            }
            UploadEvent::SubmitSucceeded(bundle) => {
                next.busy = false;
                next.results = Some(bundle);
                next.settle_selection(policy);
            }
            UploadEvent::SubmitFailed(_) => {
                next.busy = false;
                next.settle_selection(policy);
            }
            UploadEvent::SubmitCancelled => {
                next.busy = false;
                next.submitted_generation = None;
            }
        }
        Ok(next)
    }

    /// Under `ClearOnSettle`, drop the submitted file unless the user has
    /// picked another one since.
    fn settle_selection(&mut self, policy: SelectionPolicy) {
        let submitted = self.submitted_generation.take();
        if policy == SelectionPolicy::ClearOnSettle
            && submitted == Some(self.selection_generation)
        {
            self.selected = None;
        }
    }
}

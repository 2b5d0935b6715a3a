//! Upload session for hosts without a UI event loop.
//!
//! Owns an [`UploadState`] and applies events through the reducer, issuing the
//! request in between. The busy flag is set before the transport is polled and
//! is cleared on every exit path, including when the submit future is dropped
//! or the request is cancelled.

use std::cell::RefCell;
use std::sync::Arc;

use futures_util::future::{AbortHandle, Abortable};

use crate::config::SelectionPolicy;
use crate::error::UploadError;
use crate::predict_client::{request_prediction, PredictTransport};
use crate::state::{UploadEvent, UploadState};
use crate::types::{ResultBundle, SelectedImage};

pub struct UploadSession<T> {
    transport: T,
    policy: SelectionPolicy,
    state: RefCell<UploadState>,
    in_flight: RefCell<Option<AbortHandle>>,
}

impl<T: PredictTransport> UploadSession<T> {
    pub fn new(transport: T, policy: SelectionPolicy) -> Self {
        Self {
            transport,
            policy,
            state: RefCell::new(UploadState::new()),
            in_flight: RefCell::new(None),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn dispatch(&self, event: UploadEvent) -> Result<(), UploadError> {
        let next = self.state.borrow().reduce(event, self.policy)?;
        *self.state.borrow_mut() = next;
        Ok(())
    }

    /// Replace the selected file; non-images are rejected and nothing changes.
    pub fn choose_file(&self, image: SelectedImage) -> Result<(), UploadError> {
        self.dispatch(UploadEvent::FileSelected(image))
    }

    /// Submit the selected file and wait for the request to settle.
    ///
    /// On failure the previous results are kept and the error is returned.
    pub async fn submit(&self) -> Result<Arc<ResultBundle>, UploadError> {
        self.dispatch(UploadEvent::SubmitStarted)?;
        let mut pending = PendingRequest {
            session: self,
            settled: false,
        };

        let image = self
            .state
            .borrow()
            .selected
            .clone()
            .ok_or(UploadError::NoImageSelected)?;

        let (handle, registration) = AbortHandle::new_pair();
        *self.in_flight.borrow_mut() = Some(handle);

        let event = Abortable::new(request_prediction(&self.transport, &image), registration)
            .await
            .unwrap_or(UploadEvent::SubmitCancelled);

        self.in_flight.borrow_mut().take();
        pending.settled = true;

        let outcome = match &event {
            UploadEvent::SubmitSucceeded(bundle) => Ok(bundle.clone()),
            UploadEvent::SubmitFailed(e) => Err(UploadError::RequestFailed(e.clone())),
            _ => Err(UploadError::Cancelled),
        };
        self.dispatch(event)?;
        outcome
    }

    /// Abort the outstanding request, if any. Results are left untouched.
    pub fn cancel(&self) {
        if let Some(handle) = self.in_flight.borrow_mut().take() {
            tracing::debug!("cancelling outstanding prediction request");
            handle.abort();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy
    }
}

/// Clears the busy flag if a submit future is dropped before it settles.
struct PendingRequest<'a, T: PredictTransport> {
    session: &'a UploadSession<T>,
    settled: bool,
}

impl<T: PredictTransport> Drop for PendingRequest<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.session.in_flight.borrow_mut().take();
            let _ = self.session.dispatch(UploadEvent::SubmitCancelled);
        }
    }
}

//! Upload session behavior against deferred mock transports.

use std::cell::{Cell, RefCell};

use futures::channel::oneshot;
use futures::executor::block_on;
use predict_shared::{
    request_prediction, PredictError, PredictResponse, PredictTransport, PredictionItem,
    SelectedImage, SelectionPolicy, UploadError, UploadEvent, UploadSession,
};

type Reply = Result<PredictResponse, PredictError>;

/// Transport whose replies are released by the test through oneshot channels.
struct DeferredTransport {
    calls: Cell<usize>,
    replies: RefCell<Vec<oneshot::Receiver<Reply>>>,
}

impl DeferredTransport {
    fn new(replies: Vec<oneshot::Receiver<Reply>>) -> Self {
        Self {
            calls: Cell::new(0),
            replies: RefCell::new(replies),
        }
    }
}

impl PredictTransport for DeferredTransport {
    async fn predict(&self, _image: &SelectedImage) -> Result<PredictResponse, PredictError> {
        self.calls.set(self.calls.get() + 1);
        let reply = self.replies.borrow_mut().remove(0);
        reply
            .await
            .unwrap_or_else(|_| Err(PredictError::Http("reply dropped".to_string())))
    }
}

fn cat_png() -> SelectedImage {
    SelectedImage::new("cat.png", "image/png", vec![0x89, b'P', b'N', b'G']).unwrap()
}

fn cat_response() -> PredictResponse {
    PredictResponse {
        predictions: vec![PredictionItem {
            class: "cat".to_string(),
            confidence: 0.956,
            x_min: 1.0,
            y_min: 2.0,
            x_max: 3.0,
            y_max: 4.0,
        }],
        image: "YW5ub3RhdGVk".to_string(),
        edges: "ZWRnZXM=".to_string(),
        histogram: vec![1.0, 2.0, 3.0],
    }
}

#[test]
fn test_submit_without_selection_never_calls_transport() {
    let session = UploadSession::new(DeferredTransport::new(Vec::new()), SelectionPolicy::Retain);

    let err = block_on(session.submit()).unwrap_err();

    assert_eq!(err, UploadError::NoImageSelected);
    assert_eq!(session.transport().calls.get(), 0);
    assert!(!session.is_busy());
}

#[test]
fn test_rejected_selection_leaves_state_unchanged() {
    let session = UploadSession::new(DeferredTransport::new(Vec::new()), SelectionPolicy::Retain);
    session.choose_file(cat_png()).unwrap();
    let before = session.state();

    let mut text = cat_png();
    text.name = "notes.txt".to_string();
    text.media_type = "text/plain".to_string();
    let err = session.choose_file(text).unwrap_err();

    assert!(matches!(err, UploadError::InvalidFileType { .. }));
    assert_eq!(session.state(), before);
}

#[test]
fn test_busy_spans_request_until_success() {
    let (tx, rx) = oneshot::channel();
    let session = UploadSession::new(DeferredTransport::new(vec![rx]), SelectionPolicy::Retain);
    session.choose_file(cat_png()).unwrap();
    assert!(!session.is_busy());

    block_on(async {
        let mut submit = Box::pin(session.submit());
        assert!(futures::poll!(submit.as_mut()).is_pending());
        assert!(session.is_busy());
        assert_eq!(session.transport().calls.get(), 1);

        tx.send(Ok(cat_response())).unwrap();
        let bundle = submit.await.unwrap();

        assert!(!session.is_busy());
        assert_eq!(bundle.annotated.as_str(), "data:image/jpeg;base64,YW5ub3RhdGVk");
        assert_eq!(bundle.edges.as_str(), "data:image/jpeg;base64,ZWRnZXM=");
        assert_eq!(bundle.histogram, vec![1.0, 2.0, 3.0]);
        assert_eq!(
            bundle.predictions[0].to_string(),
            "Class: cat, Confidence: 95.60%, Bounding Box: (X_min: 1.00, Y_min: 2.00, X_max: 3.00, Y_max: 4.00)"
        );
        assert_eq!(session.state().results, Some(bundle));
    });
}

#[test]
fn test_failure_clears_busy_and_keeps_previous_results() {
    let (ok_tx, ok_rx) = oneshot::channel();
    let (err_tx, err_rx) = oneshot::channel();
    let session = UploadSession::new(
        DeferredTransport::new(vec![ok_rx, err_rx]),
        SelectionPolicy::Retain,
    );
    session.choose_file(cat_png()).unwrap();

    ok_tx.send(Ok(cat_response())).unwrap();
    let first = block_on(session.submit()).unwrap();
    let before = session.state();

    block_on(async {
        let mut submit = Box::pin(session.submit());
        assert!(futures::poll!(submit.as_mut()).is_pending());
        assert!(session.is_busy());

        err_tx
            .send(Err(PredictError::ServerError {
                status: 500,
                message: "model crashed".to_string(),
            }))
            .unwrap();
        let err = submit.await.unwrap_err();
        assert!(matches!(err, UploadError::RequestFailed(PredictError::ServerError { status: 500, .. })));
        assert_eq!(err.to_string(), "Error during prediction");
    });

    let after = session.state();
    assert!(!after.busy);
    assert_eq!(after.results, before.results);
    assert_eq!(after.results, Some(first));
    // Retain policy: the same file is still selected for a retry.
    assert_eq!(after.selected, before.selected);
    assert_eq!(session.transport().calls.get(), 2);
}

#[test]
fn test_clear_on_settle_requires_reselection() {
    let (tx, rx) = oneshot::channel();
    let session = UploadSession::new(
        DeferredTransport::new(vec![rx]),
        SelectionPolicy::ClearOnSettle,
    );
    session.choose_file(cat_png()).unwrap();
    tx.send(Ok(cat_response())).unwrap();
    block_on(session.submit()).unwrap();

    assert!(session.state().selected.is_none());
    assert_eq!(
        block_on(session.submit()).unwrap_err(),
        UploadError::NoImageSelected
    );
    assert_eq!(session.transport().calls.get(), 1);
}

#[test]
fn test_cancel_aborts_without_touching_results() {
    let (_tx, rx) = oneshot::channel();
    let session = UploadSession::new(DeferredTransport::new(vec![rx]), SelectionPolicy::Retain);
    session.choose_file(cat_png()).unwrap();

    block_on(async {
        let mut submit = Box::pin(session.submit());
        assert!(futures::poll!(submit.as_mut()).is_pending());
        assert!(session.is_busy());

        session.cancel();
        assert_eq!(submit.await.unwrap_err(), UploadError::Cancelled);
    });

    let state = session.state();
    assert!(!state.busy);
    assert!(state.results.is_none());
}

#[test]
fn test_dropped_submit_resets_busy() {
    let (_tx, rx) = oneshot::channel();
    let session = UploadSession::new(DeferredTransport::new(vec![rx]), SelectionPolicy::Retain);
    session.choose_file(cat_png()).unwrap();

    block_on(async {
        let mut submit = Box::pin(session.submit());
        assert!(futures::poll!(submit.as_mut()).is_pending());
        assert!(session.is_busy());
        drop(submit);
    });

    assert!(!session.is_busy());
}

#[test]
fn test_request_prediction_maps_failure_to_event() {
    let (tx, rx) = oneshot::channel();
    let transport = DeferredTransport::new(vec![rx]);
    tx.send(Err(PredictError::Parse("expected value".to_string())))
        .unwrap();

    let event = block_on(request_prediction(&transport, &cat_png()));
    assert_eq!(
        event,
        UploadEvent::SubmitFailed(PredictError::Parse("expected value".to_string()))
    );
}

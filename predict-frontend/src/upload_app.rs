//! Image upload and prediction component.
//!
//! Lets the user pick an image, posts it to the prediction server and shows
//! the annotated image, the edge image, the histogram and the detections.
//! All state transitions go through [`UploadState::reduce`]; the component
//! only issues the request and draws the histogram after a render.

use std::sync::Arc;

use futures_util::future::{AbortHandle, Abortable};
use predict_shared::{
    request_prediction, validate_media_type, FileReads, PredictConfig, PredictServerClient,
    ReadCompletion, ReadTicket, ResultBundle, SelectedImage, UploadError, UploadEvent,
    UploadState,
};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

use crate::histogram::render_histogram;

/// Element id of the histogram canvas.
pub const HISTOGRAM_CANVAS_ID: &str = "histogramCanvas";

#[derive(Properties, PartialEq)]
pub struct UploadPredictClientProps {
    #[prop_or_default]
    pub config: PredictConfig,
}

pub struct UploadPredictClient {
    state: UploadState,
    client: PredictServerClient,
    /// File reads still in progress
    reads: FileReads,
    /// Abort handle of the outstanding request
    in_flight: Option<AbortHandle>,
    /// Results whose histogram is currently on the canvas
    drawn: Option<Arc<ResultBundle>>,
}

pub enum Msg {
    /// File input changed
    FileChosen(Option<File>),
    /// File contents read from the browser
    FileLoaded(ReadTicket, SelectedImage),
    FileReadFailed(ReadTicket, String),
    /// Form submitted
    Submit,
    /// Request settled (success or failure)
    Settled(UploadEvent),
}

impl Component for UploadPredictClient {
    type Message = Msg;
    type Properties = UploadPredictClientProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            state: UploadState::new(),
            client: PredictServerClient::new(&ctx.props().config.server_url),
            reads: FileReads::new(),
            in_flight: None,
            drawn: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(None) => {
                notify(&UploadError::InvalidFileType {
                    media_type: String::new(),
                });
                false
            }
            Msg::FileChosen(Some(file)) => {
                // Check the declared type before reading the whole file.
                if let Err(e) = validate_media_type(&file.type_()) {
                    notify(&e);
                    return false;
                }
                let ticket = self.reads.begin();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match read_selected_image(file).await {
                        Ok(image) => link.send_message(Msg::FileLoaded(ticket, image)),
                        Err(e) => link.send_message(Msg::FileReadFailed(ticket, e)),
                    }
                });
                false
            }
            Msg::FileLoaded(ticket, image) => {
                let ReadCompletion::Current { submit } = self.reads.finish(ticket) else {
                    return false;
                };
                let selected = self.apply(ctx, UploadEvent::FileSelected(image));
                if selected && submit {
                    self.submit(ctx);
                }
                selected
            }
            Msg::FileReadFailed(ticket, e) => {
                if self.reads.finish(ticket) == ReadCompletion::Stale {
                    return false;
                }
                web_sys::console::error_1(&format!("Failed to read file: {e}").into());
                notify_message("Could not read the selected file");
                false
            }
            Msg::Submit => {
                // Submitting while the newest pick is still being read sends that pick.
                if self.state.can_submit() && self.reads.defer_submit() {
                    return false;
                }
                self.submit(ctx)
            }
            Msg::Settled(event) => {
                self.in_flight = None;
                if let UploadEvent::SubmitFailed(ref e) = event {
                    web_sys::console::error_1(&format!("Error during prediction: {e}").into());
                    notify(&UploadError::RequestFailed(e.clone()));
                }
                self.apply(ctx, event)
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.client = PredictServerClient::new(&ctx.props().config.server_url);
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let busy = !self.state.can_submit();

        let onchange = ctx.link().callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::FileChosen(input.files().and_then(|files| files.get(0)))
        });
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="App">
                <h1>{"Image Upload and Prediction"}</h1>
                <form {onsubmit}>
                    <input type="file" accept="image/*" {onchange} />
                    <button type="submit" disabled={busy}>
                        { if busy { "Predicting..." } else { "Predict" } }
                    </button>
                </form>

                if busy {
                    <p>{"Loading..."}</p>
                }

                { self.view_results(ctx.props()) }
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        let changed = match (&self.state.results, &self.drawn) {
            (Some(now), Some(before)) => !Arc::ptr_eq(now, before),
            (None, None) => false,
            _ => true,
        };
        if !changed {
            return;
        }

        if let Some(bins) = self.state.histogram() {
            render_histogram(HISTOGRAM_CANVAS_ID, bins, &ctx.props().config.bar_color);
        }
        self.drawn = self.state.results.clone();
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        // Aborted requests never send `Settled` back to a destroyed component.
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl UploadPredictClient {
    /// Reduce `event` into the state, notifying the user if it is rejected.
    fn apply(&mut self, ctx: &Context<Self>, event: UploadEvent) -> bool {
        match self
            .state
            .reduce(event, ctx.props().config.selection_policy)
        {
            Ok(next) => {
                self.state = next;
                true
            }
            Err(e) => {
                notify(&e);
                false
            }
        }
    }

    /// Start a request for the current selection.
    fn submit(&mut self, ctx: &Context<Self>) -> bool {
        if !self.apply(ctx, UploadEvent::SubmitStarted) {
            return false;
        }
        if let Some(image) = self.state.selected.clone() {
            self.start_request(ctx, image);
        }
        true
    }

    fn start_request(&mut self, ctx: &Context<Self>, image: SelectedImage) {
        let (handle, registration) = AbortHandle::new_pair();
        self.in_flight = Some(handle);

        let client = self.client.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            let request = async move { request_prediction(&client, &image).await };
            if let Ok(event) = Abortable::new(request, registration).await {
                link.send_message(Msg::Settled(event));
            }
        });
    }

    fn view_results(&self, props: &UploadPredictClientProps) -> Html {
        let results = match &self.state.results {
            Some(results) => results,
            None => return html! {},
        };
        let config = &props.config;

        html! {
            <>
                <div>
                    <h2>{"Detected Image:"}</h2>
                    <img src={results.annotated.to_string()} alt="Detected" style="max-width: 100%;" />
                </div>

                <div>
                    <h2>{"Edge Detection (Canny):"}</h2>
                    <img src={results.edges.to_string()} alt="Edge Detection" style="max-width: 100%;" />
                </div>

                <div>
                    <h2>{"Histogram:"}</h2>
                    <canvas
                        id={HISTOGRAM_CANVAS_ID}
                        width={config.canvas_width.to_string()}
                        height={config.canvas_height.to_string()}
                    ></canvas>
                </div>

                <div>
                    <h2>{"Predictions:"}</h2>
                    <ul>
                        { for results.predictions.iter().enumerate().map(|(index, prediction)| html! {
                            <li key={index}>{ prediction.to_string() }</li>
                        })}
                    </ul>
                </div>
            </>
        }
    }
}

/// Read a picked file into memory.
async fn read_selected_image(file: File) -> Result<SelectedImage, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{e:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    SelectedImage::new(file.name(), file.type_(), bytes).map_err(|e| e.to_string())
}

fn notify(err: &UploadError) {
    notify_message(&err.to_string());
}

fn notify_message(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

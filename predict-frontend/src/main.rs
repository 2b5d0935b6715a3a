use predict_frontend::UploadPredictClient;
use predict_shared::{PredictConfig, SelectionPolicy};
use yew::prelude::*;

/// Build the client configuration from `data-*` attributes on `#app`.
fn config_from_document() -> PredictConfig {
    let defaults = PredictConfig::default();
    let app = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app"));
    let attr = |name: &str| app.as_ref().and_then(|el| el.get_attribute(name));

    let server_url = attr("data-server-url").unwrap_or_else(|| defaults.server_url.clone());
    let bar_color = attr("data-bar-color").unwrap_or_else(|| defaults.bar_color.clone());

    let selection_policy = match attr("data-selection-policy").map(|p| p.parse::<SelectionPolicy>()) {
        Some(Ok(policy)) => policy,
        Some(Err(e)) => {
            web_sys::console::warn_1(&format!("Ignoring data-selection-policy: {e}").into());
            defaults.selection_policy
        }
        None => defaults.selection_policy,
    };

    let width: u32 = attr("data-canvas-width")
        .and_then(|w| w.parse().ok())
        .unwrap_or(defaults.canvas_width);
    let height: u32 = attr("data-canvas-height")
        .and_then(|h| h.parse().ok())
        .unwrap_or(defaults.canvas_height);

    let config = PredictConfig {
        server_url,
        bar_color,
        selection_policy,
        ..defaults
    };
    match config.clone().with_canvas_size(width, height) {
        Ok(sized) => sized,
        Err(e) => {
            web_sys::console::warn_1(&format!("Using default canvas size: {e}").into());
            config
        }
    }
}

#[function_component(App)]
fn app() -> Html {
    let config = config_from_document();

    html! {
        <UploadPredictClient {config} />
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}

use predict_shared::{layout_histogram, DrawCommand};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Render histogram bins onto the canvas with the given element id.
///
/// Does nothing if the canvas is not in the document yet.
pub fn render_histogram(canvas_id: &str, bins: &[f64], color: &str) {
    let Some((canvas, ctx)) = canvas_context(canvas_id) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    for command in layout_histogram(bins, width, height, color) {
        execute(&ctx, &command);
    }
}

fn canvas_context(canvas_id: &str) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let canvas = web_sys::window()?
        .document()?
        .get_element_by_id(canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()?;
    let ctx = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    Some((canvas, ctx))
}

fn execute(ctx: &CanvasRenderingContext2d, command: &DrawCommand) {
    match command {
        DrawCommand::Clear {
            x,
            y,
            width,
            height,
        } => ctx.clear_rect(*x, *y, *width, *height),
        DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            ctx.set_fill_style_str(color);
            ctx.fill_rect(*x, *y, *width, *height);
        }
    }
}

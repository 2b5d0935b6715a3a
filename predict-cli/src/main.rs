mod text_chart;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use predict_shared::config::DEFAULT_SERVER_URL;
use predict_shared::{
    layout_histogram, PredictServerClient, SelectedImage, SelectionPolicy, UploadSession,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Submit an image to the prediction server", long_about = None)]
struct Args {
    #[arg(help = "Image file to submit")]
    image: PathBuf,

    #[arg(long, help = "Base URL of the prediction server", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    #[arg(long, help = "Media type of the file (guessed from the extension if omitted)")]
    media_type: Option<String>,

    #[arg(long, help = "Maximum width of the histogram chart in characters", default_value = "64")]
    chart_columns: usize,

    #[arg(long, help = "Height of the histogram chart in lines", default_value = "12")]
    chart_rows: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    let media_type = args.media_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&args.image)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });
    let name = args
        .image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let image = SelectedImage::new(name, media_type.clone(), bytes).with_context(|| {
        format!(
            "{} has media type {media_type}",
            args.image.display()
        )
    })?;

    let session = UploadSession::new(
        PredictServerClient::new(&args.server_url),
        SelectionPolicy::Retain,
    );
    session.choose_file(image)?;

    info!(
        "Submitting {} to {}",
        args.image.display(),
        session.transport().predict_url()
    );
    let results = session.submit().await.context("Prediction request failed")?;

    println!("Predictions:");
    if results.predictions.is_empty() {
        println!("  (none)");
    }
    for prediction in &results.predictions {
        println!("  {prediction}");
    }

    for (label, image) in [
        ("Detected image", &results.annotated),
        ("Edge detection (Canny)", &results.edges),
    ] {
        match image.decode() {
            Ok(jpeg) => println!("{label}: {} bytes JPEG", jpeg.len()),
            Err(e) => warn!("{label}: payload is not valid base64: {e}"),
        }
    }

    println!("Histogram ({} bins):", results.histogram.len());
    let columns = results.histogram.len().clamp(1, args.chart_columns.max(1));
    let rows = args.chart_rows.max(1);
    let commands = layout_histogram(&results.histogram, columns as f64, rows as f64, "#");
    for line in text_chart::render(&commands, columns, rows) {
        println!("  |{line}");
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use birthday_card::photo::sniff_file;
use birthday_card::{
    CardConfig, CardController, CardView, CardViewState, ExportOutcome, HtmlFileView, NoopView, PhotoFile,
    RenderedCard,
};
use clap::Parser;
use log::{info, warn};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Generate a personalized birthday card
#[derive(Parser, Debug)]
#[command(name = "birthday-card", version, about)]
struct Cli {
    /// Recipient's name
    #[arg(long)]
    name: String,

    /// Recipient's age
    #[arg(long)]
    age: String,

    /// Traits separated by commas or semicolons, e.g. "kind, funny"
    #[arg(long, default_value = "")]
    traits: String,

    /// Personal message used verbatim instead of the composed text
    #[arg(long)]
    message: Option<String>,

    /// JPG or PNG photo shown on the card
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Media type of the photo (sniffed from its contents when omitted)
    #[arg(long)]
    photo_type: Option<String>,

    /// Output directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// Seed for reproducible cards
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Export the card as a PNG (or a printable page)
    #[arg(long)]
    export: bool,

    /// Skip rasterization and go straight to the printable page
    #[arg(long)]
    no_raster: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    state: CardViewState,
    card: Option<&'a RenderedCard>,
    export: Option<ExportOutcome>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<CardConfig> {
    let mut config = match &cli.config {
        Some(path) => CardConfig::from_json_file(path).context("Failed to load config")?,
        None => CardConfig::default(),
    };
    if let Some(out) = &cli.out {
        config.output_dir = out.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

#[cfg(feature = "cdp")]
async fn attach_rasterizer<V: CardView>(controller: CardController<V>) -> CardController<V> {
    use birthday_card::export::cdp::CdpRasterizer;

    match CdpRasterizer::launch(controller.config().raster.clone()).await {
        Ok(r) => controller.with_rasterizer(Box::new(r)),
        Err(e) => {
            warn!("Rasterizer unavailable: {}", e);
            controller
        }
    }
}

#[cfg(not(feature = "cdp"))]
async fn attach_rasterizer<V: CardView>(controller: CardController<V>) -> CardController<V> {
    controller
}

async fn run<V: CardView>(cli: Cli, config: CardConfig, view: V) -> Result<()> {
    let mut controller = CardController::new(config, view).context("Failed to create card controller")?;
    if cli.export && !cli.no_raster {
        controller = attach_rasterizer(controller).await;
    }

    if let Some(path) = &cli.photo {
        let declared = match &cli.photo_type {
            Some(t) => Some(t.clone()),
            None => sniff_file(path).await.ok().flatten().map(str::to_string),
        };
        if let Err(e) = controller.select_photo(Some(PhotoFile::from_path(path, declared))) {
            warn!("{}; continuing without a photo", e);
        }
    }

    {
        let form = controller.form_mut();
        form.name = cli.name.clone();
        form.age = cli.age.clone();
        form.characteristics = cli.traits.clone();
        form.personal_message = cli.message.clone().unwrap_or_default();
    }

    if !controller.submit_form().await {
        warn!("Name and age are required; nothing rendered");
    }

    let export = if cli.export && controller.state() == CardViewState::Visible {
        let outcome = controller.export_image().await.context("Export failed")?;
        info!("Export written to {}", outcome.path().display());
        Some(outcome)
    } else {
        None
    };

    if cli.json {
        let summary = Summary {
            state: controller.state(),
            card: controller.card(),
            export,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if let Some(card) = controller.card() {
        println!("{}", card.to_text());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if config.write_card_html {
        let view = HtmlFileView::new(config.output_dir.join("card.html"));
        run(cli, config, view).await
    } else {
        run(cli, config, NoopView::new()).await
    }
}

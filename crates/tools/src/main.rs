use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use foundation::Millis;
use globe_tools::SvgSurface;
use layers::DotField;
use runtime::{GlobeConfig, RenderLoop};
use serde::Serialize;
use streaming::{ReqwestFetcher, SOURCES_ENV_VAR, WorldLoader, WorldSource, sources_from_env};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Nominal frame interval used to timestamp offline frames.
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "globe", about = "Dotted globe data and snapshot tools")]
struct Cli {
    /// JSON file overriding the widget defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Try every world source in order and report what each returns.
    Sources,
    /// Load the world (with fallback) and summarize the generated dot field.
    Dots {
        /// Override the configured dot spacing.
        #[arg(long)]
        spacing: Option<f64>,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
        /// Number of countries to list.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Render one animation frame to an SVG file.
    Snapshot {
        /// Index of the frame to capture; frame 0 is the first animated frame.
        #[arg(long, default_value_t = 0)]
        frame: u64,
        /// Surface edge length in pixels.
        #[arg(long, default_value_t = 600.0)]
        size: f64,
        #[arg(long)]
        out: PathBuf,
        /// Fill behind the globe; the widget itself is transparent.
        #[arg(long, default_value = "#0b0b10")]
        background: String,
    },
}

#[derive(Debug, Serialize)]
struct DotsReport {
    features: usize,
    polygon_features: usize,
    dots: usize,
    highlighted: usize,
    step_deg: f64,
    top_countries: Vec<(String, usize)>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = real_main().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<(), String> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).await?;
    let sources = resolve_sources(&config)?;
    let loader = WorldLoader::new(ReqwestFetcher::default(), sources);

    match cli.command {
        Command::Sources => cmd_sources(&loader).await,
        Command::Dots { spacing, json, top } => cmd_dots(&loader, config, spacing, json, top).await,
        Command::Snapshot {
            frame,
            size,
            out,
            background,
        } => cmd_snapshot(&loader, config, frame, size, &out, &background).await,
    }
}

async fn load_config(path: Option<&Path>) -> Result<GlobeConfig, String> {
    let Some(path) = path else {
        return Ok(GlobeConfig::default());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("read {path:?}: {e}"))?;
    GlobeConfig::from_json_str(&text).map_err(|e| format!("{path:?}: {e}"))
}

/// `GLOBE_SOURCES` wins over the config file, which wins over the defaults.
fn resolve_sources(config: &GlobeConfig) -> Result<Vec<WorldSource>, String> {
    let sources =
        sources_from_env(config.world_sources()).map_err(|e| format!("{SOURCES_ENV_VAR}: {e}"))?;
    if sources.is_empty() {
        return Err(format!("{SOURCES_ENV_VAR} lists no sources"));
    }
    Ok(sources)
}

async fn cmd_sources(loader: &WorldLoader<ReqwestFetcher>) -> Result<(), String> {
    let mut any_ok = false;
    for (i, source) in loader.sources().iter().enumerate() {
        match loader.fetch_source(source).await {
            Ok(features) => {
                any_ok = true;
                println!(
                    "{}. ok   {:<14} {}  features={} polygons={}",
                    i + 1,
                    source.format.to_string(),
                    source.url,
                    features.len(),
                    features.area_count()
                );
            }
            Err(err) => {
                println!("{}. FAIL {:<14} {}  {err}", i + 1, source.format.to_string(), source.url);
            }
        }
    }
    if any_ok {
        Ok(())
    } else {
        Err("no usable world source".to_string())
    }
}

async fn cmd_dots(
    loader: &WorldLoader<ReqwestFetcher>,
    mut config: GlobeConfig,
    spacing: Option<f64>,
    json: bool,
    top: usize,
) -> Result<(), String> {
    if let Some(spacing) = spacing {
        config.lattice.spacing = spacing;
        config.validate().map_err(|e| e.to_string())?;
    }
    let features = loader.load().await.map_err(|e| e.to_string())?;
    let field = DotField::with_lattice(&features.features, config.lattice);

    let mut per_country: BTreeMap<&str, usize> = BTreeMap::new();
    for dot in field.iter() {
        *per_country.entry(&*dot.country).or_default() += 1;
    }
    let mut top_countries: Vec<(String, usize)> = per_country
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect();
    top_countries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_countries.truncate(top);

    let report = DotsReport {
        features: features.len(),
        polygon_features: features.area_count(),
        dots: field.len(),
        highlighted: field.highlighted_count(),
        step_deg: config.lattice.step_deg(),
        top_countries,
    };

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{text}");
    } else {
        println!(
            "features={} polygons={} dots={} highlighted={} step={}°",
            report.features,
            report.polygon_features,
            report.dots,
            report.highlighted,
            report.step_deg
        );
        for (name, n) in &report.top_countries {
            println!("  {n:>6}  {name}");
        }
    }
    Ok(())
}

async fn cmd_snapshot(
    loader: &WorldLoader<ReqwestFetcher>,
    config: GlobeConfig,
    frame: u64,
    size: f64,
    out: &Path,
    background: &str,
) -> Result<(), String> {
    if !(size.is_finite() && size > 0.0) {
        return Err(format!("invalid --size {size}"));
    }
    let mut render_loop = RenderLoop::new(config, size, 1.0);
    render_loop.begin_loading();
    render_loop.on_load_result(loader.load().await);
    if let Some(err) = render_loop.error() {
        return Err(format!("failed to load geographic data: {err}"));
    }

    let mut surface = SvgSurface::new().with_background(background);
    let mut stats = None;
    for i in 0..=frame {
        stats = render_loop.frame(Millis(i as f64 * FRAME_MS), &mut surface);
    }
    let stats = stats.ok_or("globe never became ready")?;

    tokio::fs::write(out, surface.finish())
        .await
        .map_err(|e| format!("write {out:?}: {e}"))?;
    let projection = render_loop.view().projection();
    let facing = render_loop
        .dots()
        .iter()
        .filter(|dot| projection.is_visible(dot.position()))
        .count();
    info!(
        out = %out.display(),
        yaw = render_loop.view().rotation().yaw_deg(),
        frame = ?render_loop.last_frame().map(|f| f.index),
        step_deg = render_loop.config().lattice.step_deg(),
        facing,
        painted = stats.painted,
        highlighted = stats.highlighted_painted,
        skipped = stats.skipped,
        "snapshot written"
    );
    Ok(())
}

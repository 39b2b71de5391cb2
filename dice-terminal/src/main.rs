/// Dice Terminal Demo - three dice on a rotating pedestal
///
/// Controls:
///   - Left / Right: Rotate on the active channel
///   - 1 / 2 / 3: Self spin / pedestal pivot / world pivot
///   - M / V / D: Light model / shading stage / damping
///   - + / -: Light power
///   - Q / ESC: Quit
use anyhow::Context;
use clap::Parser;
use dice_core::{LightModel, ShadingStage};
use dice_terminal::{AppConfig, TerminalApp};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dice-terminal", about = "Three lit dice on a pedestal, rendered in the terminal")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Light model: lambert, phong or cel-shaded
    #[arg(long, value_parser = parse_model)]
    model: Option<LightModel>,

    /// Shading stage: vertex or fragment
    #[arg(long, value_parser = parse_shading)]
    shading: Option<ShadingStage>,

    /// Write logs here; the terminal itself is the render target
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_model(value: &str) -> Result<LightModel, String> {
    match value {
        "lambert" => Ok(LightModel::Lambert),
        "phong" => Ok(LightModel::Phong),
        "cel-shaded" | "cel" => Ok(LightModel::CelShaded),
        other => Err(format!("unknown light model '{other}'")),
    }
}

fn parse_shading(value: &str) -> Result<ShadingStage, String> {
    match value {
        "vertex" => Ok(ShadingStage::Vertex),
        "fragment" => Ok(ShadingStage::Fragment),
        other => Err(format!("unknown shading stage '{other}'")),
    }
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.render.target_fps = fps;
    }
    if let Some(model) = args.model {
        config.light.model = model;
    }
    if let Some(shading) = args.shading {
        config.light.shading = shading;
    }
    config.validate()?;

    let mut app = TerminalApp::new(&config).context("failed to query terminal size")?;
    app.run()?;

    Ok(())
}

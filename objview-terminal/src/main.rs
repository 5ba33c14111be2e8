/// objview - interactive OBJ viewer in the terminal
///
/// Controls:
///   - Mouse drag / Arrow Keys: Rotate the mesh
///   - W/S or scroll: Zoom
///   - J/L, I/K: Move the light
///   - Q/ESC: Quit
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use objview_core::{Mesh, ViewerConfig};
use objview_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "objview", about = "Render a Wavefront OBJ mesh in the terminal")]
struct Args {
    /// OBJ file to display
    mesh: PathBuf,

    /// TOML config overriding camera, light, material and input defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Spin the mesh slowly while idle
    #[arg(long)]
    spin: bool,

    /// Log file (default: objview.log in the temp directory). The TUI owns
    /// the terminal, so logs never go to stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

const DEFAULT_LOG_FILE: &str = "objview.log";

fn log_path(log_file: Option<&PathBuf>) -> PathBuf {
    log_file
        .cloned()
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
}

fn init_logging(path: &Path) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file =
        std::fs::File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&log_path(args.log_file.as_ref()))?;

    let config = match &args.config {
        Some(path) => ViewerConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    let mesh = Mesh::load(&args.mesh).with_context(|| format!("Failed to load mesh {}", args.mesh.display()))?;
    tracing::info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        radius = mesh.radius,
        "Loaded {}",
        args.mesh.display()
    );

    let mut app = TerminalApp::new(mesh, &config)?.with_spin(args.spin);
    app.run()?;

    Ok(())
}

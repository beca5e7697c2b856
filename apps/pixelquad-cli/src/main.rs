use anyhow::Context;
use clap::{Parser, Subcommand};
use pixelquad_render::{DebugTextRenderer, DrawCall, Renderer, SoftwareRenderer};
use pixelquad_transform::{TransformConfig, config::MAX_LAYER_SCALE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod scene;

use scene::Scene;

#[derive(Parser)]
#[command(name = "pixelquad-cli", about = "CLI tool for pixelquad sprite transforms")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print versions and the default config
    Info,
    /// Load and validate a config file
    Check {
        /// JSON config file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print clip positions and atlas coordinates for every sprite corner
    Project {
        /// JSON scene file
        #[arg(short, long)]
        scene: PathBuf,
        /// Atlas PNG; its size overrides the scene's `atlas_size`
        #[arg(short, long)]
        atlas: Option<PathBuf>,
    },
    /// Software-render a scene into a PNG
    Render {
        /// JSON scene file
        #[arg(short, long)]
        scene: PathBuf,
        /// Atlas PNG
        #[arg(short, long)]
        atlas: PathBuf,
        /// Output PNG
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            let config = TransformConfig::default();
            println!("pixelquad-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", pixelquad_assets::crate_info());
            println!("render: {}", pixelquad_render::crate_info());
            println!(
                "default config: pixels_per_unit={}, layer_scale={}, filter={:?}, snap_camera={}",
                config.pixels_per_unit(),
                config.layer_scale(),
                config.filter(),
                config.snap_camera()
            );
            println!("max layer_scale: {MAX_LAYER_SCALE}");
        }
        Commands::Check { config } => {
            let loaded = TransformConfig::load(&config)
                .with_context(|| format!("checking {}", config.display()))?;
            println!(
                "{}: OK (pixels_per_unit={}, layer_scale={}, filter={:?}, snap_camera={})",
                config.display(),
                loaded.pixels_per_unit(),
                loaded.layer_scale(),
                loaded.filter(),
                loaded.snap_camera()
            );
        }
        Commands::Project { scene, atlas } => {
            let scene = Scene::load(&scene)?;
            let instances = scene.resolve()?;
            let atlas_size = match atlas {
                Some(path) => pixelquad_assets::atlas_size(&path)?,
                None => scene
                    .atlas_size
                    .context("scene has no atlas_size; pass --atlas")?,
            };
            let text = DebugTextRenderer::new().describe(&instances, &scene.camera, atlas_size, &scene.config);
            print!("{text}");
        }
        Commands::Render { scene, atlas, out } => {
            let scene = Scene::load(&scene)?;
            let instances = scene.resolve()?;
            let atlas = pixelquad_assets::load_atlas(&atlas)?;
            if let Some(size) = scene.atlas_size.filter(|s| *s != atlas.size()) {
                tracing::warn!(?size, actual = ?atlas.size(), "scene atlas_size differs from the atlas image");
            }

            let frame = SoftwareRenderer::default().render(&DrawCall {
                instances: &instances,
                camera: &scene.camera,
                atlas: &atlas,
                config: &scene.config,
            })?;
            pixelquad_assets::save_rgba_png(&out, frame.width(), frame.height(), &frame.as_bytes())?;
            println!(
                "Rendered {} sprites into {}x{} -> {}",
                instances.len(),
                frame.width(),
                frame.height(),
                out.display()
            );
        }
    }

    Ok(())
}

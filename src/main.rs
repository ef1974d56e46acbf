//! # Dotmatrix CLI
//!
//! Command-line host for the dot-matrix effects.
//!
//! ## Usage
//!
//! ```bash
//! # List effects and their default parameters
//! dotmatrix list
//!
//! # Render one effect
//! dotmatrix render glass --input photo.jpg --output glass.png
//!
//! # Override parameters
//! dotmatrix render dots --input photo.jpg --output dots.png --set gap=20 --set adjust.contrast=80
//!
//! # Widget preset sizes
//! dotmatrix render widget --input photo.jpg --output widget.png --widget-size medium
//!
//! # Every effect at once
//! dotmatrix batch --input photo.jpg --out-dir out/
//! ```

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use dotmatrix::{
    DotmatrixError, EffectConfig, Raster, Session,
    effects::{self, EFFECTS, widget::WidgetSize},
};

/// Dotmatrix - raster to dot-matrix art
#[derive(Parser, Debug)]
#[command(name = "dotmatrix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List effects and their default parameters
    List,

    /// Render one effect to a PNG
    Render {
        /// Effect name (see `list`)
        effect: String,

        /// Source image
        #[arg(long, short)]
        input: PathBuf,

        /// Output PNG
        #[arg(long, short)]
        output: PathBuf,

        /// Output width (defaults to the source width)
        #[arg(long)]
        width: Option<u32>,

        /// Output height (defaults to the source height)
        #[arg(long)]
        height: Option<u32>,

        /// Widget preset size: small, medium or large
        #[arg(long)]
        widget_size: Option<String>,

        /// JSON config file to start from
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Parameter override, e.g. `--set ior=80` (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Print every recorded config snapshot
        #[arg(long)]
        history: bool,
    },

    /// Render every effect with default parameters
    Batch {
        /// Source image
        #[arg(long, short)]
        input: PathBuf,

        /// Output directory
        #[arg(long)]
        out_dir: PathBuf,

        /// Output width (defaults to the source width)
        #[arg(long)]
        width: Option<u32>,

        /// Output height (defaults to the source height)
        #[arg(long)]
        height: Option<u32>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), DotmatrixError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for name in EFFECTS {
                println!("{}", name);
                if let Some(config) = effects::by_name(name) {
                    for (param, value) in config.list_params() {
                        println!("  {:<24} {}", param, value);
                    }
                }
            }
            Ok(())
        }

        Commands::Render {
            effect,
            input,
            output,
            width,
            height,
            widget_size,
            config,
            set,
            history,
        } => {
            let initial = match config {
                Some(path) => {
                    let config = EffectConfig::from_json(&std::fs::read_to_string(path)?)?;
                    if config.name() != effect.to_lowercase() {
                        log::warn!(
                            "config file is for '{}', ignoring requested '{}'",
                            config.name(),
                            effect
                        );
                    }
                    config
                }
                None => effects::by_name(&effect)
                    .ok_or_else(|| DotmatrixError::UnknownEffect(effect.clone()))?,
            };

            let source = load_source(&input)?;
            let (w, h) = match widget_size {
                Some(size) => WidgetSize::by_name(&size)
                    .ok_or_else(|| DotmatrixError::InvalidParam {
                        name: "widget-size".to_string(),
                        value: size.clone(),
                        reason: "expected small, medium or large".to_string(),
                    })?
                    .dimensions(),
                None => (
                    width.unwrap_or(source.width()),
                    height.unwrap_or(source.height()),
                ),
            };

            let mut session = Session::new(initial);
            session.load_image(source);
            for assignment in &set {
                let (name, value) =
                    assignment
                        .split_once('=')
                        .ok_or_else(|| DotmatrixError::InvalidParam {
                            name: assignment.clone(),
                            value: String::new(),
                            reason: "expected NAME=VALUE".to_string(),
                        })?;
                session.set_param(name.trim(), value.trim())?;
            }

            if history {
                for (i, snapshot) in session.history().entries().enumerate() {
                    println!("{:>3} {}", i, snapshot.canonical());
                }
            }

            log::info!("rendering {} at {}x{}", session.config().name(), w, h);
            if let Some(out) = session.render(w, h) {
                out.save(&output)?;
                println!("Saved to {}", output.display());
            }
            Ok(())
        }

        Commands::Batch {
            input,
            out_dir,
            width,
            height,
        } => {
            let source = load_source(&input)?;
            let (w, h) = (
                width.unwrap_or(source.width()),
                height.unwrap_or(source.height()),
            );
            std::fs::create_dir_all(&out_dir)?;

            EFFECTS.par_iter().try_for_each(|name| {
                let config = effects::by_name(name)
                    .ok_or_else(|| DotmatrixError::UnknownEffect(name.to_string()))?;
                let path = out_dir.join(format!("{}.png", name));
                config.render(&source, w, h).save(&path)?;
                log::info!("saved {}", path.display());
                Ok::<(), DotmatrixError>(())
            })
        }
    }
}

fn load_source(path: &Path) -> Result<Raster, DotmatrixError> {
    let source = image::open(path)?.to_rgba8();
    log::debug!(
        "loaded {} ({}x{})",
        path.display(),
        source.width(),
        source.height()
    );
    Ok(source)
}

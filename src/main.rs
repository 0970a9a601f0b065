use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use terramesh::config::GeneratorConfig;
use terramesh::export;
use terramesh::heightfield::TerrainGenerator;
use terramesh::mesh::{recompute_smooth_normals, MeshBuffers};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to terramesh.toml configuration file
    #[arg(short, long, default_value = "./terramesh.toml")]
    config: String,

    /// Override log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    /// Explicit seed for reproducible terrain; omitted = system entropy
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override grid width (cells)
    #[arg(long)]
    width: Option<u32>,

    /// Override grid length (cells)
    #[arg(long)]
    length: Option<u32>,

    /// Override lateral noise scale
    #[arg(long)]
    scale: Option<f64>,

    /// Override height multiplier
    #[arg(long)]
    height_multiplier: Option<f64>,

    /// Override octave count
    #[arg(long)]
    octaves: Option<u32>,

    /// Override per-octave amplitude decay
    #[arg(long)]
    persistence: Option<f64>,

    /// Override per-octave frequency growth
    #[arg(long)]
    lacunarity: Option<f64>,

    /// Output file path
    #[arg(short, long, default_value = "./terrain.obj")]
    output: PathBuf,

    /// Output format (auto-detected from the output extension if omitted)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Recompute smooth per-vertex normals instead of the uniform up default
    #[arg(long)]
    smooth_normals: bool,

    /// Also dump raw vertex positions as JSON to this path (debug overlay)
    #[arg(long)]
    debug_points: Option<PathBuf>,

    /// Stay running: Space regenerates with a fresh seed, q/Esc quits
    #[arg(short, long)]
    interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Obj,
    Gltf,
    Json,
}

fn detect_format(output: &Path, explicit: Option<OutputFormat>) -> OutputFormat {
    if let Some(f) = explicit {
        return f;
    }
    match output.extension().and_then(|e| e.to_str()) {
        Some("gltf") => OutputFormat::Gltf,
        Some("json") => OutputFormat::Json,
        Some("obj") => OutputFormat::Obj,
        other => {
            warn!(extension = ?other, "unrecognized output extension, defaulting to OBJ");
            OutputFormat::Obj
        }
    }
}

fn write_mesh(mesh: &MeshBuffers, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format(&args.output, args.format);
    let contents = match format {
        OutputFormat::Obj => export::to_obj(mesh),
        OutputFormat::Gltf => {
            let name = args
                .output
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("terrain");
            export::to_gltf_json(mesh, name)
        }
        OutputFormat::Json => serde_json::to_string_pretty(mesh)?,
    };
    std::fs::write(&args.output, contents)?;
    info!(path = %args.output.display(), format = ?format, "wrote mesh");

    if let Some(points_path) = &args.debug_points {
        std::fs::write(points_path, serde_json::to_string(mesh.debug_points())?)?;
        info!(path = %points_path.display(), count = mesh.debug_points().len(), "wrote debug points");
    }

    Ok(())
}

fn generate_once(
    generator: &TerrainGenerator,
    seed: u64,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = generator.regenerate(seed)?;
    if args.smooth_normals {
        recompute_smooth_normals(&mut mesh);
    }
    info!(
        seed,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "terrain generated"
    );
    write_mesh(&mesh, args)
}

/// Blocks on keyboard input: Space triggers regeneration with a fresh
/// entropy seed, q or Esc exits.
fn interactive_loop(
    generator: &TerrainGenerator,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Interactive mode: Space = regenerate, q/Esc = quit");
    enable_raw_mode()?;

    let result = (|| -> Result<(), Box<dyn std::error::Error>> {
        loop {
            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char(' ') => {
                        // A fixed --seed makes every regeneration identical,
                        // otherwise each keypress reseeds from entropy.
                        let seed = args.seed.unwrap_or_else(rand::random);
                        generate_once(generator, seed, args)?;
                    }
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    _ => {}
                }
            }
        }
    })();

    disable_raw_mode()?;
    result
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = GeneratorConfig::load_or_default(&args.config);

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    info!("Starting terramesh heightfield generator v0.1.0");
    info!("Configuration loaded from: {}", args.config);

    // CLI overrides beat the config file.
    if let Some(width) = args.width {
        config.grid.width = width;
    }
    if let Some(length) = args.length {
        config.grid.length = length;
    }
    if let Some(scale) = args.scale {
        config.noise.scale = scale;
    }
    if let Some(height_multiplier) = args.height_multiplier {
        config.noise.height_multiplier = height_multiplier;
    }
    if let Some(octaves) = args.octaves {
        config.noise.octaves = octaves;
    }
    if let Some(persistence) = args.persistence {
        config.noise.persistence = persistence;
    }
    if let Some(lacunarity) = args.lacunarity {
        config.noise.lacunarity = lacunarity;
    }

    config.validate()?;
    info!(
        width = config.grid.width,
        length = config.grid.length,
        octaves = config.noise.octaves,
        "configuration validated"
    );

    let generator = TerrainGenerator::new(config.grid_spec(), config.noise_params());

    // Entropy enters here and nowhere deeper.
    let seed = args.seed.unwrap_or_else(rand::random);
    generate_once(&generator, seed, &args)?;

    if args.interactive {
        interactive_loop(&generator, &args)?;
    }

    Ok(())
}

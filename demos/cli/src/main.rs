use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use env_logger::Env;
use log::info;
use nalgebra::Vector3;
use rand::{Rng, SeedableRng};

use husk::hull::{ConvexHull, Settings};

/// Computes the convex hull of a point cloud and writes it as STL
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Input file with one `x y z` triple per line; a random cloud is
    /// generated when this is omitted
    #[clap(short, long)]
    input: Option<PathBuf>,

    /// Number of points in a generated cloud
    #[clap(short = 'n', long, default_value_t = 1000)]
    count: usize,

    /// RNG seed for generated clouds
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Name of a `.stl` file to write
    #[clap(short, long)]
    out: Option<PathBuf>,

    /// Upper bound on hull vertices (0 = unbounded)
    #[clap(long, default_value_t = 4096)]
    max_vertices: usize,

    /// Reverse the winding of every output face
    #[clap(long)]
    reverse: bool,
}

fn parse_points(path: &PathBuf) -> Result<Vec<Vector3<f64>>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {path:?}"))?;
    let mut points = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let coords = line
            .split_whitespace()
            .map(|w| w.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .with_context(|| format!("bad number on line {}", lineno + 1))?;
        let &[x, y, z] = coords.as_slice() else {
            bail!("expected 3 coordinates on line {}", lineno + 1);
        };
        points.push(Vector3::new(x, y, z));
    }
    Ok(points)
}

fn random_cloud(count: usize, seed: u64) -> Vec<Vector3<f64>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut pts = Vec::with_capacity(count);
    while pts.len() < count {
        let p = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if p.norm_squared() <= 1.0 {
            pts.push(p);
        }
    }
    pts
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();
    let args = Args::parse();

    let now = Instant::now();
    let points = match &args.input {
        Some(path) => parse_points(path)?,
        None => random_cloud(args.count, args.seed),
    };
    info!("Loaded {} points in {:?}", points.len(), now.elapsed());

    let settings = Settings {
        reverse_order: args.reverse,
        max_vertices: args.max_vertices,
        ..Settings::default()
    };
    let start = Instant::now();
    let hull = ConvexHull::build(&points, &settings)?;
    info!(
        "Built hull in {:?}: {} vertices, {} faces, volume {:.6}",
        start.elapsed(),
        hull.vertices.len(),
        hull.faces,
        hull.volume(),
    );

    if let Some(out) = &args.out {
        info!("Writing mesh to {out:?}");
        let mut f = std::fs::File::create(out)
            .with_context(|| format!("failed to create {out:?}"))?;
        hull.write_stl(&mut f)?;
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use seascape::utils::rng::RngStream;
use seascape::{FixedSeeds, RandomSeeds, RenderOptions, SeedSource, export_filename, render_frame, save_png};

#[derive(Parser)]
#[command(name = "seascape")]
#[command(about = "Render seeded sailboat seascapes to PNG", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene seed; repeat to render several. Random seeds are used when omitted
    #[arg(long = "seed")]
    seeds: Vec<u32>,

    /// Number of random scenes to render when no seed is given
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Root seed for a reproducible list of random scenes
    #[arg(long)]
    seed_stream: Option<u64>,

    /// Device pixels per logical unit
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Directory PNG files are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.count == 0 && cli.seeds.is_empty() {
        bail!("--count must be at least 1");
    }

    let (mut source, count): (Box<dyn SeedSource>, usize) = if !cli.seeds.is_empty() {
        let n = cli.seeds.len();
        (Box::new(FixedSeeds::new(cli.seeds.clone())), n)
    } else if let Some(root) = cli.seed_stream {
        (Box::new(RandomSeeds::<RngStream>::from_root(root)), cli.count)
    } else {
        (Box::new(RandomSeeds::new(rand::thread_rng())), cli.count)
    };

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    let options = RenderOptions { pixel_ratio: cli.pixel_ratio };

    for _ in 0..count {
        let seed = source.next_seed();
        let frame = render_frame(seed, &options).with_context(|| format!("rendering seed {}", seed))?;
        let path = cli.out_dir.join(export_filename(seed));
        save_png(&path, &frame).with_context(|| format!("exporting seed {}", seed))?;
        info!("seed {} -> {} ({}x{})", seed, path.display(), frame.width(), frame.height());
    }
    Ok(())
}

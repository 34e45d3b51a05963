//! Star tunnel backdrop player.
//!
//! ```bash
//! backdrop-app --config star-tunnel.toml --tracks-dir assets/audio --seed 7
//! ```
//!
//! Keys: H toggles the panels, 1-3 pick a track, C opens the custom track
//! picker, R retries a failed load.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use star_tunnel::app::BackdropApp;
use star_tunnel::audio::RodioBackend;
use star_tunnel::config::Config;
use star_tunnel::picker::ThreadedPicker;

#[derive(Parser)]
#[command(name = "backdrop-app")]
#[command(author, version, about = "Animated starfield backdrop with looping ambient audio")]
struct Args {
    /// TOML config file; missing file means defaults
    #[arg(long, short = 'c', default_value = "star-tunnel.toml")]
    config: PathBuf,

    /// Directory holding the bundled ambient tracks
    #[arg(long)]
    tracks_dir: Option<PathBuf>,

    /// Seed for star and space object placement
    #[arg(long)]
    seed: Option<u64>,

    /// Initial star count
    #[arg(long)]
    stars: Option<usize>,
}

/// Called on the picker thread, blocks it until the dialog closes.
fn pick_audio_file() -> Option<PathBuf> {
    let dialog = rfd::AsyncFileDialog::new()
        .add_filter("Audio", &["wav", "mp3", "ogg", "flac"])
        .set_title("Choose a custom track")
        .pick_file();
    pollster::block_on(dialog).map(|handle| handle.path().to_path_buf())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(tracks_dir) = args.tracks_dir {
        config.audio.tracks_dir = tracks_dir;
    }
    if let Some(seed) = args.seed {
        config.scene.seed = Some(seed);
    }
    if let Some(stars) = args.stars {
        config.scene.star_count = stars;
    }

    log::info!(
        "starting with {} stars, tracks from {}",
        config.scene.star_count,
        config.audio.tracks_dir.display()
    );

    let app = BackdropApp::new(&config, RodioBackend::new(), ThreadedPicker::new(pick_audio_file));
    star_tunnel::window::start(app, &config.window);
    Ok(())
}

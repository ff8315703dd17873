use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use tilecast::{Config, GameWorld, Tilecast};

/// Walk around a tile map in first person. Space toggles the top-down view,
/// G toggles its grid, W/S move, A/D turn (hold Shift to turn slowly).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Map definition file.
	#[arg(default_value = "maps/grid4.txt")]
	map: PathBuf,

	/// RON file overriding the default settings.
	#[arg(long, short)]
	config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()>
{
	env_logger::init();
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
		None => Config::default()
	};
	let game_world = GameWorld::load(&args.map, config.clone())
		.with_context(|| format!("loading map {}", args.map.display()))?;

	Tilecast::new(&config)?.run(game_world)
}

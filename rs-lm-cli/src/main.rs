use std::path::PathBuf;

use clap::{ArgAction, Parser};
use env_logger::Env;
use log::{LevelFilter, debug};
use rs_lm_core::{DEFAULT_SEED, LanguageModel, Mode};

/// Trains a character-level language model on a corpus and prints
/// generated text.
///
/// Example: `rs-lm 3 "The " 500 fixed shakespeare.txt`
#[derive(Parser, Debug)]
#[command(name = "rs-lm", version, about = "Generate text from a character-level n-gram model")]
struct Cli {
	/// Number of characters in a context window (>= 1)
	window_length: usize,

	/// Text to start from; must be at least WINDOW_LENGTH characters to produce new text
	initial_text: String,

	/// Output length, not counting the first WINDOW_LENGTH characters
	text_length: usize,

	/// `random` for an unpredictable seed, anything else for the fixed seed
	mode: String,

	/// Corpus file
	file: PathBuf,

	/// Seed used when MODE is not `random`
	#[arg(long, default_value_t = DEFAULT_SEED)]
	seed: u64,

	/// Print the trained model before the generated text
	#[arg(long)]
	dump_model: bool,

	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q)
	#[arg(short = 'q', long, action = ArgAction::Count)]
	quiet: u8,
}

impl Cli {
	fn mode(&self) -> Mode {
		if self.mode == "random" {
			Mode::Random
		} else {
			Mode::Seeded(self.seed)
		}
	}
}

/// Level forced by `-v`/`-q`, or `None` to keep `RUST_LOG` (default `warn`).
fn level_override(verbose: u8, quiet: u8) -> Option<LevelFilter> {
	match (verbose, quiet) {
		(0, 0) => None,
		(_, q) if q > 0 => Some(LevelFilter::Error),
		(1, _) => Some(LevelFilter::Info),
		(2, _) => Some(LevelFilter::Debug),
		_ => Some(LevelFilter::Trace),
	}
}

/// Logs go to stderr; stdout only carries the generated text.
fn init_logging(verbose: u8, quiet: u8) {
	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	if let Some(level) = level_override(verbose, quiet) {
		builder.filter_level(level);
	}
	let _ = builder.try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);
	debug!("{:?}", cli);

	let mut model = LanguageModel::new(cli.window_length, cli.mode())?;
	model.train_file(&cli.file)?;

	if cli.dump_model {
		print!("{}", model);
	}

	println!("{}", model.generate(&cli.initial_text, cli.text_length));

	Ok(())
}

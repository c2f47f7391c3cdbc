use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "suggest")]
#[command(about = "Typeahead over a JSON data file, driven by lines on stdin")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Typeahead specification, e.g. "s.abbr as s.name for s in states | filter:$viewValue"
	#[arg(long, short = 's')]
	pub spec: String,

	/// JSON file providing the scope the specification is evaluated against
	#[arg(long, short = 'd', value_name = "PATH")]
	pub data: PathBuf,

	/// TOML file with typeahead options
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Artificial delay added to every lookup, in milliseconds
	#[arg(long, default_value_t = 0)]
	pub latency_ms: u64,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,
}

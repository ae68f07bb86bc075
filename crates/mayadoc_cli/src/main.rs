#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "mayadoc", about = "Maya .ma/.mb scene inspection tools")]
struct Cli {
	/// Log extraction decisions to stderr.
	#[arg(short, long, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the scene summary.
	Info(cmd::info::Args),
	/// Print the chunk tree of a binary scene.
	Chunks(cmd::chunks::Args),
	/// Print the install version the scene asks for.
	Version(cmd::version::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(command: Commands) -> mayadoc::scene::Result<()> {
	match command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Chunks(args) => cmd::chunks::run(args),
		Commands::Version(args) => cmd::version::run(args),
	}
}

fn init_tracing(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

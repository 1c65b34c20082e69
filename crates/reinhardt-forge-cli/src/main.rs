//! Reinhardt Forge CLI
//!
//! Command-line tool generating dependency injection containers from a
//! Forge configuration and a type registry.
//!
//! ## Usage
//!
//! ```bash
//! reinhardt-forge build --config forge.toml --types types.toml --output src/container.rs
//! reinhardt-forge build --config forge.toml --types types.toml --output src/container.rs --preload src/preload.rs
//! reinhardt-forge graph --config forge.toml --types types.toml > container.dot
//! ```

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use reinhardt_forge_core::graph::DependencyGraph;
use reinhardt_forge_core::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reinhardt-forge")]
#[command(about = "Reinhardt dependency injection container generator", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Verbosity level (can be repeated)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Resolve and compile a container
	Build {
		/// Forge configuration file
		#[arg(short, long, value_name = "PATH", default_value = "forge.toml")]
		config: PathBuf,

		/// Type registry file
		#[arg(short, long, value_name = "PATH", default_value = "types.toml")]
		types: PathBuf,

		/// Generated container file
		#[arg(short, long, value_name = "PATH")]
		output: PathBuf,

		/// Generated preload manifest file
		#[arg(long, value_name = "PATH")]
		preload: Option<PathBuf>,
	},

	/// Print the resolved dependency graph in DOT format
	Graph {
		/// Forge configuration file
		#[arg(short, long, value_name = "PATH", default_value = "forge.toml")]
		config: PathBuf,

		/// Type registry file
		#[arg(short, long, value_name = "PATH", default_value = "types.toml")]
		types: PathBuf,

		/// Print graph statistics to stderr
		#[arg(long)]
		stats: bool,
	},
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbosity);

	let result = match cli.command {
		Commands::Build {
			config,
			types,
			output,
			preload,
		} => run_build(&config, &types, &output, preload.as_deref()).map(drop),
		Commands::Graph {
			config,
			types,
			stats,
		} => run_graph(&config, &types, stats).map(drop),
	};

	if let Err(e) = result {
		eprintln!("{} {}", "Error:".red().bold(), e);
		process::exit(1);
	}
}

fn init_tracing(verbosity: u8) {
	let level = match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn load_inputs(config: &Path, types: &Path) -> ContainerResult<(CompilerConfig, StaticTypeRegistry)> {
	let config = CompilerConfig::from_file(config)?;
	let types = StaticTypeRegistry::from_file(types)?;
	tracing::debug!(types = types.len(), entry_points = config.entry_points.len(), "Loaded inputs");
	Ok((config, types))
}

fn run_build(
	config: &Path,
	types: &Path,
	output: &Path,
	preload: Option<&Path>,
) -> ContainerResult<CompiledContainer> {
	let (config, types) = load_inputs(config, types)?;
	let mut builder = FileSystemContainerBuilder::new(&config, &types, output);
	if let Some(path) = preload {
		builder = builder.with_preload_path(path);
	}
	let compiled = builder.build()?;

	println!(
		"{} {} ({} file-based definition(s))",
		"Generated".green().bold(),
		output.display(),
		compiled.definitions.len()
	);
	if let Some(path) = preload {
		println!("{} {}", "Generated".green().bold(), path.display());
	}
	Ok(compiled)
}

fn run_graph(config: &Path, types: &Path, stats: bool) -> ContainerResult<String> {
	let (config, types) = load_inputs(config, types)?;
	let mut resolver = DependencyResolver::new(&config, &types);
	resolver.resolve_entry_points()?;
	let graph = DependencyGraph::from_definitions(resolver.definitions());

	let dot = graph.to_dot();
	print!("{dot}");

	for cycle in graph.detect_cycles() {
		eprintln!("{} {}", "Cycle:".yellow().bold(), cycle.join(" -> "));
	}
	if stats {
		let statistics = graph.statistics();
		eprintln!("Definitions:       {}", statistics.node_count);
		eprintln!("Dependencies:      {}", statistics.edge_count);
		eprintln!("Entry points:      {}", statistics.entry_point_count);
		eprintln!("Singletons:        {}", statistics.singleton_count);
		eprintln!("Prototypes:        {}", statistics.prototype_count);
		eprintln!("Context-dependent: {}", statistics.context_dependent_count);
	}
	Ok(dot)
}

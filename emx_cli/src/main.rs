use std::path::PathBuf;
use std::process;

use clap::Parser;
use emx_cli::Commands;
use emx_cli::EmxCli;
use emx_cli::OutputFormat;
use emx_core::CompletionKind;
use emx_core::ContextEngine;
use emx_core::EmxError;
use emx_core::Expander;
use emx_core::SnippetLibrary;
use emx_core::load_config;
use owo_colors::OwoColorize;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = EmxCli::parse();

	// Respect NO_COLOR, the --no-color flag, and terminal capabilities.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	// Logs go to stderr so they never mix with expansion output.
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.try_init();

	let result = match args.command {
		Some(Commands::Expand {
			ref abbreviation,
			jinja,
			format,
		}) => run_expand(&args, abbreviation, jinja, format),
		Some(Commands::Complete { ref prefix, format }) => run_complete(&args, prefix, format),
		Some(Commands::List { format }) => run_list(&args, format),
		Some(Commands::Lsp) => run_lsp(),
		None => {
			eprintln!("No subcommand specified. Run `emx --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<EmxError>() {
			Ok(emx_err) => {
				let report: miette::Report = (*emx_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &EmxCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Build the snippet library for this invocation: the built-in tables plus
/// any `emx.toml` overrides found under the config root.
fn load_library(args: &EmxCli) -> Result<SnippetLibrary, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root)?;

	if args.verbose && config.is_some() {
		println!("Loaded config overrides from {}", root.display());
	}

	Ok(config
		.as_ref()
		.map_or_else(SnippetLibrary::default, SnippetLibrary::with_config))
}

fn run_expand(
	args: &EmxCli,
	abbreviation: &str,
	jinja: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let library = load_library(args)?;

	let expansion = if jinja {
		ContextEngine::with_library(library).expand_with_context(abbreviation)
	} else {
		Expander::with_library(library).expand(abbreviation, false)
	};

	match format {
		OutputFormat::Text => {
			println!("{expansion}");
		}
		OutputFormat::Json => {
			let output = serde_json::json!({
				"abbreviation": abbreviation,
				"jinja": jinja,
				"expansion": expansion,
			});
			println!("{output}");
		}
	}

	Ok(())
}

fn run_complete(
	args: &EmxCli,
	prefix: &str,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let library = load_library(args)?;
	let completions = ContextEngine::with_library(library).completions(prefix);

	match format {
		OutputFormat::Json => {
			let output = serde_json::json!({
				"prefix": prefix,
				"completions": completions,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			if completions.is_empty() {
				println!("No completions for `{prefix}`.");
				return Ok(());
			}

			for completion in &completions {
				let kind = match completion.kind {
					CompletionKind::Tag => "tag",
					CompletionKind::Snippet => "snippet",
				};
				println!(
					"  {:<40} {kind:<8} {}",
					colored!(&completion.label, bold),
					completion.detail
				);
			}

			println!("\n{} completion(s)", completions.len());
		}
	}

	Ok(())
}

fn run_list(args: &EmxCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let library = load_library(args)?;

	match format {
		OutputFormat::Json => {
			let output = serde_json::json!({
				"snippets": library.snippets,
				"mnemonics": library.mnemonics,
				"patterns": library.patterns,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			println!("{}", colored!("Snippets:", bold));
			for (name, text) in &library.snippets {
				println!("  {name:<12} {}", preview(text));
			}

			println!();
			println!("{}", colored!("Mnemonics:", bold));
			for (name, text) in &library.mnemonics {
				println!("  {name:<12} {}", preview(text));
			}

			println!();
			println!("{}", colored!("Patterns:", bold));
			for (name, text) in &library.patterns {
				println!("  j:{name:<10} {}", preview(text));
			}

			println!(
				"\n{} snippet(s), {} mnemonic(s), {} pattern(s)",
				library.snippets.len(),
				library.mnemonics.len(),
				library.patterns.len()
			);
		}
	}

	Ok(())
}

fn run_lsp() -> Result<(), Box<dyn std::error::Error>> {
	let rt = tokio::runtime::Runtime::new()?;
	rt.block_on(emx_lsp::run_server());
	Ok(())
}

/// The first line of a stored snippet, for one-line table listings.
fn preview(text: &str) -> &str {
	text.lines().next().unwrap_or_default()
}

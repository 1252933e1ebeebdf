use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Expand Emmet-style abbreviations into markup with editor-ready placeholders.",
	long_about = "emx compiles Emmet-style abbreviations for nested markup — `ul>li*3`, \
	              `div#app.container`, `form>input[type=text]` — into indented HTML with numbered \
	              `$1`, `$2`, ... placeholders and a final `$0` cursor position, ready for an \
	              editor's snippet engine.\n\nQuick start:\n  emx expand \"ul>li*3\"     Expand an \
	              abbreviation\n  emx complete ul         List completion candidates\n  emx list    \
	                          Show snippet and mnemonic tables\n  emx lsp                 Start the \
	              language server"
)]
pub struct EmxCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the directory searched for an `emx.toml` config file.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Expand an abbreviation into markup.
	///
	/// Parses the abbreviation and prints the expanded markup with numbered
	/// placeholder markers. Snippet names registered in the built-in tables or
	/// `emx.toml` (such as `!` for the HTML5 boilerplate) are returned
	/// verbatim without parsing.
	Expand {
		/// The abbreviation to expand, e.g. `ul>li*3`.
		abbreviation: String,

		/// Expand in a template context: mnemonics like `for` and `if` and
		/// namespaced patterns like `j:form` are consulted first, and forms
		/// default to `method="post"`.
		#[arg(long, default_value_t = false)]
		jinja: bool,

		/// Output format. Use `text` for the bare expansion or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List completion candidates for an abbreviation prefix.
	///
	/// Matches the prefix against template mnemonics, namespaced patterns,
	/// HTML tag names, and curated abbreviation patterns, printing each
	/// candidate with its expansion.
	Complete {
		/// The abbreviation prefix to complete, e.g. `ul`.
		prefix: String,

		/// Output format. Use `text` for a readable listing or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Show the snippet, mnemonic, and pattern tables.
	///
	/// Prints every registered name with a one-line preview of its expansion,
	/// including entries added or overridden by `emx.toml`.
	List {
		/// Output format. Use `text` for a readable listing or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Start the emx language server (LSP).
	///
	/// Communicates over stdin/stdout using the Language Server Protocol.
	/// Configure your editor to run `emx lsp` as the language server command
	/// for HTML and template files.
	///
	/// Provides abbreviation completions with snippet-format insert text and
	/// hover previews of the expansion under the cursor.
	Lsp,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

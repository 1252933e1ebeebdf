use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the config and I/O layers.
///
/// The parse/expand pipeline itself never produces an error: degenerate or
/// malformed abbreviations degrade to empty output instead, because the
/// compiler runs inside an interactive completion loop where every keystroke
/// may re-invoke it.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum EmxError {
	#[error(transparent)]
	#[diagnostic(code(emx::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(emx::config_parse),
		help("check that emx.toml is valid TOML with [snippets], [mnemonics], or [patterns] tables")
	)]
	ConfigParse(String),
}

pub type EmxResult<T> = Result<T, EmxError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

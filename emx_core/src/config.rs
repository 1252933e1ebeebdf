use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::EmxError;
use crate::EmxResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["emx.toml", ".emx.toml", ".config/emx.toml"];

/// Configuration loaded from `emx.toml`.
///
/// Each section maps names to snippet text and extends the corresponding
/// built-in table; an entry with a built-in's name replaces it:
///
/// ```toml
/// [snippets]
/// "sig" = "<footer>$1</footer>$0"
///
/// [mnemonics]
/// "hello" = "{{ greeting }}$0"
///
/// [patterns]
/// "card" = "<div class=\"card\">$1</div>$0"
/// ```
///
/// Stored text is inserted verbatim, so entries are expected to carry their
/// own placeholder markers. A missing `$0` is appended at expansion time.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EmxConfig {
	/// Whole-abbreviation overrides added to the snippet table.
	#[serde(default)]
	pub snippets: BTreeMap<String, String>,
	/// Exact-name mnemonics added to the template-context table.
	#[serde(default)]
	pub mnemonics: BTreeMap<String, String>,
	/// Namespaced patterns added to the `j:` table.
	#[serde(default)]
	pub patterns: BTreeMap<String, String>,
}

impl EmxConfig {
	/// Parse a config from TOML text.
	pub fn from_toml(content: &str) -> EmxResult<Self> {
		toml::from_str(content).map_err(|e| EmxError::ConfigParse(e.to_string()))
	}
}

/// Load the config from the first candidate file found under `root`.
/// Returns `Ok(None)` when no config file exists.
pub fn load_config(root: impl AsRef<Path>) -> EmxResult<Option<EmxConfig>> {
	let root = root.as_ref();

	for candidate in CONFIG_FILE_CANDIDATES {
		let path = root.join(candidate);
		if !path.is_file() {
			continue;
		}

		tracing::debug!(path = %path.display(), "loading config");
		let content = std::fs::read_to_string(&path)?;
		return EmxConfig::from_toml(&content).map(Some);
	}

	Ok(None)
}

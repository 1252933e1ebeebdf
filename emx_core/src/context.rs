use crate::expand::Completion;
use crate::expand::CompletionKind;
use crate::expand::Expander;
use crate::expand::ensure_final_placeholder;
use crate::expand::pattern_documentation;
use crate::snippets::PATTERN_PREFIX;
use crate::snippets::SnippetLibrary;

/// The context-aware expansion front end.
///
/// Three lookup layers are consulted in order before falling back to the
/// abbreviation grammar: the exact-name mnemonic table, the namespaced
/// pattern table (prefix stripped before lookup), and finally the full
/// parse/expand pipeline with template-friendly defaults enabled.
#[derive(Debug, Clone, Default)]
pub struct ContextEngine {
	expander: Expander,
}

impl ContextEngine {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_library(library: SnippetLibrary) -> Self {
		Self {
			expander: Expander::with_library(library),
		}
	}

	/// The underlying expander, for callers that want plain expansion
	/// without the context layers.
	pub fn expander(&self) -> &Expander {
		&self.expander
	}

	/// Expand an abbreviation through the context layers.
	///
	/// An unknown name under the namespace prefix echoes the stripped name
	/// back rather than failing; every path guarantees the trailing `$0`.
	pub fn expand_with_context(&self, abbreviation: &str) -> String {
		let library = self.expander.library();

		if let Some(text) = library.mnemonic(abbreviation) {
			return ensure_final_placeholder(text.to_string());
		}

		if let Some(name) = abbreviation.strip_prefix(PATTERN_PREFIX) {
			let text = library.pattern(name).unwrap_or(name);
			return ensure_final_placeholder(text.to_string());
		}

		self.expander.expand(abbreviation, true)
	}

	/// Completion candidates for a prefix: mnemonics first, then namespaced
	/// patterns (only once the prefix reaches into the namespace), then the
	/// expander's tag and abbreviation candidates.
	pub fn completions(&self, prefix: &str) -> Vec<Completion> {
		let library = self.expander.library();
		let lowered = prefix.to_lowercase();
		let mut completions = vec![];

		for (name, text) in &library.mnemonics {
			if !name.starts_with(&lowered) {
				continue;
			}

			completions.push(Completion {
				label: name.clone(),
				kind: CompletionKind::Snippet,
				detail: "template snippet".to_string(),
				insert_text: text.clone(),
				documentation: format!("Template snippet: {name}"),
			});
		}

		if lowered.starts_with(PATTERN_PREFIX) {
			for (name, _) in &library.patterns {
				let label = format!("{PATTERN_PREFIX}{name}");
				if !label.starts_with(&lowered) {
					continue;
				}

				let expanded = self.expand_with_context(&label);
				completions.push(Completion {
					label: label.clone(),
					kind: CompletionKind::Snippet,
					detail: "template pattern".to_string(),
					documentation: pattern_documentation(&label, &expanded),
					insert_text: expanded,
				});
			}
		}

		completions.extend(self.expander.completions(prefix));
		completions
	}
}

use serde::Serialize;

use crate::element::HTML5_TAGS;
use crate::element::Node;
use crate::element::is_void_element;
use crate::parser::parse;
use crate::snippets::SnippetLibrary;

/// One fixed-width indent unit per nesting level.
pub const INDENT: &str = "    ";

/// The marker appended to every expansion for the resting cursor position.
pub const FINAL_PLACEHOLDER: &str = "$0";

/// Maximum length of an expansion preview in completion documentation.
pub const PREVIEW_LIMIT: usize = 200;

/// Curated abbreviation patterns offered as completion candidates alongside
/// the plain tag names.
const ABBREVIATION_PATTERNS: [(&str, &str); 10] = [
	("div.class", "div with class"),
	("div#id", "div with ID"),
	("ul>li*3", "unordered list with 3 items"),
	("table>tr>td*3", "table with row and 3 cells"),
	(
		"form>input[type=text]+input[type=submit]",
		"form with text input and submit button",
	),
	("nav>ul>li*5>a", "navigation with 5 menu items"),
	("header+main+footer", "page structure"),
	("article>h1+p*3", "article with heading and paragraphs"),
	("section.container>div.row>div.col*3", "grid layout"),
	("img[src alt]", "image with attributes"),
];

/// The kind of a completion candidate, for mapping onto an editor's
/// completion item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
	/// A bare HTML element name.
	Tag,
	/// An abbreviation, mnemonic, or pattern that expands to a snippet.
	Snippet,
}

/// A completion candidate paired with its expanded insert text.
///
/// The core returns ordered candidate lists only; ranking and presentation
/// belong to the consumer (an editor's completion-list assembler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
	/// The candidate text shown in the completion list.
	pub label: String,
	/// Tag or snippet.
	pub kind: CompletionKind,
	/// A short one-line description.
	pub detail: String,
	/// The text to insert, with `$n` placeholder markers.
	pub insert_text: String,
	/// Longer documentation including a truncated expansion preview.
	pub documentation: String,
}

/// Expands abbreviation trees into markup text with numbered placeholder
/// markers.
///
/// The expander holds only the snippet library; all per-call state (the
/// placeholder counter) is threaded through the recursive walk, so a single
/// expander is safely reusable and every call is independent.
#[derive(Debug, Clone, Default)]
pub struct Expander {
	library: SnippetLibrary,
}

impl Expander {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_library(library: SnippetLibrary) -> Self {
		Self { library }
	}

	pub fn library(&self) -> &SnippetLibrary {
		&self.library
	}

	/// Expand an abbreviation to markup with `$1`, `$2`, ... placeholders and
	/// a trailing `$0`.
	///
	/// When the whole abbreviation exactly matches a registered snippet name,
	/// the stored text is returned with only the final-placeholder guarantee
	/// applied — the parser and expander are bypassed entirely. With `jinja`
	/// set, form elements gain template-friendly defaults.
	pub fn expand(&self, abbreviation: &str, jinja: bool) -> String {
		if let Some(text) = self.library.snippet(abbreviation) {
			return ensure_final_placeholder(text.to_string());
		}

		let nodes = parse(abbreviation);
		tracing::debug!(roots = nodes.len(), jinja, "expanding abbreviation");

		let mut out = String::new();
		let mut placeholder = 1usize;
		for node in &nodes {
			expand_node(node, jinja, 0, &mut placeholder, &mut out);
		}

		ensure_final_placeholder(out)
	}

	/// Completion candidates for a prefix: HTML5 tags first, then curated
	/// abbreviation patterns, each with its expansion as insert text.
	pub fn completions(&self, prefix: &str) -> Vec<Completion> {
		let prefix = prefix.to_lowercase();
		let mut completions = vec![];

		for tag in HTML5_TAGS {
			if !tag.starts_with(&prefix) {
				continue;
			}

			let insert_text = if is_void_element(tag) {
				format!("{tag}>")
			} else {
				format!("{tag}>$1</{tag}>$0")
			};

			completions.push(Completion {
				label: tag.to_string(),
				kind: CompletionKind::Tag,
				detail: "HTML tag".to_string(),
				insert_text,
				documentation: format!("HTML <{tag}> element"),
			});
		}

		for (pattern, description) in ABBREVIATION_PATTERNS {
			if !pattern.contains(&prefix) {
				continue;
			}

			let expanded = self.expand(pattern, false);
			completions.push(Completion {
				label: pattern.to_string(),
				kind: CompletionKind::Snippet,
				detail: (*description).to_string(),
				documentation: pattern_documentation(pattern, &expanded),
				insert_text: expanded,
			});
		}

		completions
	}
}

/// Build the documentation string for an abbreviation pattern, truncating
/// the expansion preview to [`PREVIEW_LIMIT`].
pub(crate) fn pattern_documentation(label: &str, expanded: &str) -> String {
	if expanded.len() > PREVIEW_LIMIT {
		let mut end = PREVIEW_LIMIT;
		while !expanded.is_char_boundary(end) {
			end -= 1;
		}
		format!("Emmet: {label}\n\nExpands to:\n{}...", &expanded[..end])
	} else {
		format!("Emmet: {label}\n\nExpands to:\n{expanded}")
	}
}

/// Append the final placeholder marker unless one is already present.
pub(crate) fn ensure_final_placeholder(mut text: String) -> String {
	if !text.contains(FINAL_PLACEHOLDER) {
		text.push_str(FINAL_PLACEHOLDER);
	}
	text
}

/// Emit one node (and its subtree) into the output buffer, depth first.
///
/// `placeholder` is the numbering accumulator: it is reset by the caller at
/// the start of each top-level expansion and increments once per leaf that
/// has neither literal content nor children.
fn expand_node(node: &Node, jinja: bool, indent: usize, placeholder: &mut usize, out: &mut String) {
	let indent_str = INDENT.repeat(indent);

	for copy in 0..node.repeat {
		// The 1-based iteration index makes repeated elements individually
		// addressable; single elements get no index.
		let index = if node.repeat > 1 {
			(copy + 1).to_string()
		} else {
			String::new()
		};

		let start_tag = build_start_tag(node, &index, jinja);

		if node.is_void() {
			// Start tag only: no body, no closing tag, no placeholder.
			out.push_str(&indent_str);
			out.push_str(&start_tag);
			out.push('\n');
			continue;
		}

		out.push_str(&indent_str);
		out.push_str(&start_tag);

		if let Some(content) = &node.content {
			if index.is_empty() {
				out.push_str(content);
			} else {
				out.push_str(&content.replace('$', &format!("${index}")));
			}
		} else if node.children.is_empty() {
			out.push('$');
			out.push_str(&placeholder.to_string());
			*placeholder += 1;
		}

		if !node.children.is_empty() {
			out.push('\n');
			for child in &node.children {
				expand_node(child, jinja, indent + 1, placeholder, out);
			}
			out.push_str(&indent_str);
		}

		out.push_str("</");
		out.push_str(&node.tag);
		out.push('>');

		if copy < node.repeat - 1 || indent > 0 {
			out.push('\n');
		}
	}
}

/// Build the opening tag with attributes in emission order: id first, then
/// one merged class attribute, then remaining attributes in scan order.
fn build_start_tag(node: &Node, index: &str, jinja: bool) -> String {
	let mut tag = format!("<{}", node.tag);

	if let Some(id) = &node.id {
		tag.push_str(" id=\"");
		tag.push_str(id);
		// Repeated copies get the iteration index appended to the id.
		tag.push_str(index);
		tag.push('"');
	}

	if !node.classes.is_empty() {
		tag.push_str(" class=\"");
		tag.push_str(&node.classes.join(" "));
		tag.push('"');
	}

	for (key, value) in &node.attributes {
		if value.is_empty() {
			// Boolean attribute.
			tag.push(' ');
			tag.push_str(key);
			continue;
		}

		tag.push(' ');
		tag.push_str(key);
		tag.push_str("=\"");
		if !index.is_empty() && value.contains('$') {
			tag.push_str(&value.replace('$', index));
		} else {
			tag.push_str(value);
		}
		tag.push('"');
	}

	// Template-context convenience: forms post by default unless the
	// abbreviation sets an explicit method.
	if jinja && node.tag == "form" && !node.attributes.iter().any(|(key, _)| key == "method") {
		tag.push_str(" method=\"post\"");
	}

	tag.push('>');
	tag
}

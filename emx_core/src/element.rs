use crate::lexer::DescriptorToken;
use crate::lexer::scan_descriptor;

/// The tag used when an abbreviation omits one, e.g. `.container` or
/// `#header`.
pub const DEFAULT_TAG: &str = "div";

/// Void elements emit only a start tag — no body, no closing tag, and no
/// placeholder.
pub const VOID_ELEMENTS: [&str; 14] = [
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
	"track", "wbr",
];

/// The HTML5 element vocabulary offered as completion candidates. Kept sorted
/// so completion lists are deterministic.
pub const HTML5_TAGS: [&str; 110] = [
	"a",
	"abbr",
	"address",
	"area",
	"article",
	"aside",
	"audio",
	"b",
	"base",
	"bdi",
	"bdo",
	"blockquote",
	"body",
	"br",
	"button",
	"canvas",
	"caption",
	"cite",
	"code",
	"col",
	"colgroup",
	"data",
	"datalist",
	"dd",
	"del",
	"details",
	"dfn",
	"dialog",
	"div",
	"dl",
	"dt",
	"em",
	"embed",
	"fieldset",
	"figcaption",
	"figure",
	"footer",
	"form",
	"h1",
	"h2",
	"h3",
	"h4",
	"h5",
	"h6",
	"head",
	"header",
	"hgroup",
	"hr",
	"html",
	"i",
	"iframe",
	"img",
	"input",
	"ins",
	"kbd",
	"label",
	"legend",
	"li",
	"link",
	"main",
	"map",
	"mark",
	"meta",
	"meter",
	"nav",
	"noscript",
	"object",
	"ol",
	"optgroup",
	"option",
	"output",
	"p",
	"param",
	"picture",
	"pre",
	"progress",
	"q",
	"rp",
	"rt",
	"ruby",
	"s",
	"samp",
	"script",
	"section",
	"select",
	"small",
	"source",
	"span",
	"strong",
	"style",
	"sub",
	"summary",
	"sup",
	"table",
	"tbody",
	"td",
	"template",
	"textarea",
	"tfoot",
	"th",
	"thead",
	"time",
	"title",
	"tr",
	"track",
	"u",
	"ul",
	"var",
	"video",
	"wbr",
];

/// Returns true when `tag` is a void element.
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

/// One element descriptor in a parsed abbreviation tree.
///
/// A `Node` is built fresh per [`parse`](crate::parse) call, is immutable
/// after construction, and holds its children exclusively. The tree carries
/// no state between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	/// The element tag, `"div"` when the abbreviation omits one.
	pub tag: String,
	/// The element id from the first `#token` occurrence.
	pub id: Option<String>,
	/// Classes from every `.token` occurrence, in source order. Duplicates
	/// are permitted.
	pub classes: Vec<String>,
	/// Ordered `key => value` pairs from `[...]` groups. An empty value marks
	/// a boolean attribute.
	pub attributes: Vec<(String, String)>,
	/// Literal content from the first `{...}` span, taken verbatim.
	pub content: Option<String>,
	/// Child nodes attached by the `>` operator.
	pub children: Vec<Node>,
	/// Repetition count from a trailing `*N`, always at least 1.
	pub repeat: usize,
	/// Count of trailing `^` operators. Parsed and stored but never consumed
	/// during expansion; see the crate docs for why this stays unimplemented.
	pub climb_up: usize,
}

impl Node {
	/// Create a leaf node with the given tag and no decorations.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			id: None,
			classes: vec![],
			attributes: vec![],
			content: None,
			children: vec![],
			repeat: 1,
			climb_up: 0,
		}
	}

	/// Returns true when this node is a void element.
	pub fn is_void(&self) -> bool {
		is_void_element(&self.tag)
	}
}

impl Default for Node {
	fn default() -> Self {
		Self::new(DEFAULT_TAG)
	}
}

/// Parse an operator-free leaf string into a [`Node`].
///
/// The descriptor pieces (tag, id, classes, attribute groups, content) are
/// accepted in any relative order. The tag is only recognized as the leading
/// token; a word appearing after an id or class marker is ignored, matching
/// the leniency of the rest of the pipeline.
pub fn parse_element(descriptor: &str, repeat: usize, climb_up: usize) -> Node {
	let mut node = Node {
		repeat: repeat.max(1),
		climb_up,
		..Node::default()
	};

	for (index, token) in scan_descriptor(descriptor).into_iter().enumerate() {
		match token {
			DescriptorToken::Word { text, offset } => {
				if index == 0 && offset == 0 {
					node.tag = text;
				}
			}
			DescriptorToken::Id(id) => {
				if node.id.is_none() {
					node.id = Some(id);
				}
			}
			DescriptorToken::Class(class) => {
				node.classes.push(class);
			}
			DescriptorToken::AttrGroup(inner) => {
				parse_attr_group(&inner, &mut node.attributes);
			}
			DescriptorToken::Content(content) => {
				if node.content.is_none() {
					node.content = Some(content);
				}
			}
		}
	}

	node
}

/// Parse the inside of a `[...]` group: space-separated `key` or `key=value`
/// pairs. Values keep only their first `=` split, so `[data=a=b]` yields
/// `data => a=b`.
fn parse_attr_group(inner: &str, attributes: &mut Vec<(String, String)>) {
	for pair in inner.split_whitespace() {
		match pair.split_once('=') {
			Some((key, value)) => {
				attributes.push((key.trim().to_string(), unquote_value(value)));
			}
			None => {
				// No `=` marks a boolean attribute.
				attributes.push((pair.trim().to_string(), String::new()));
			}
		}
	}
}

/// Strip surrounding quotes from an attribute value, unescaping quoted
/// strings. Bare values pass through unchanged.
fn unquote_value(value: &str) -> String {
	let bytes = value.as_bytes();
	let quoted = bytes.len() >= 2
		&& (bytes[0] == b'"' || bytes[0] == b'\'')
		&& bytes[bytes.len() - 1] == bytes[0];

	if quoted {
		snailquote::unescape(value)
			.unwrap_or_else(|_| value.trim_matches(['"', '\'']).to_string())
	} else {
		value.to_string()
	}
}

use logos::Logos;

/// Raw tokens produced by logos for flat scanning of a leaf descriptor
/// string (no operators, e.g. `input#name.wide[type=text]{hint}`).
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[regex(r"[a-zA-Z0-9-]+")]
	Word,
	#[regex(r"#[a-zA-Z0-9_-]+")]
	Id,
	#[regex(r"\.[a-zA-Z0-9_-]+")]
	Class,
	#[regex(r"\[[^\]]*\]")]
	AttrGroup,
	#[regex(r"\{[^}]*\}")]
	Content,
}

/// A descriptor token with its marker characters stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DescriptorToken {
	/// A bare alnum/hyphen run. Only the leading word names the tag, so the
	/// byte offset is carried along.
	Word { text: String, offset: usize },
	/// `#token` without the hash.
	Id(String),
	/// `.token` without the dot.
	Class(String),
	/// The inside of a `[...]` group, brackets stripped.
	AttrGroup(String),
	/// The inside of a `{...}` span, braces stripped, verbatim.
	Content(String),
}

/// Scan a leaf descriptor into tokens, left to right. Unrecognized bytes
/// (stray operators, unterminated brackets) are skipped so that a malformed
/// descriptor degrades to whatever pieces were readable rather than failing.
pub(crate) fn scan_descriptor(descriptor: &str) -> Vec<DescriptorToken> {
	let mut tokens = vec![];

	for (result, span) in RawToken::lexer(descriptor).spanned() {
		let Ok(raw) = result else {
			continue;
		};

		let slice = &descriptor[span.clone()];
		let token = match raw {
			RawToken::Word => {
				DescriptorToken::Word {
					text: slice.to_string(),
					offset: span.start,
				}
			}
			RawToken::Id => DescriptorToken::Id(slice[1..].to_string()),
			RawToken::Class => DescriptorToken::Class(slice[1..].to_string()),
			RawToken::AttrGroup => DescriptorToken::AttrGroup(slice[1..slice.len() - 1].to_string()),
			RawToken::Content => DescriptorToken::Content(slice[1..slice.len() - 1].to_string()),
		};

		tokens.push(token);
	}

	tokens
}

use crate::config::EmxConfig;

/// The HTML5 boilerplate used by both the `!` and `html:5` overrides.
const HTML5_BOILERPLATE: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta \
                                 charset=\"UTF-8\">\n    <meta name=\"viewport\" \
                                 content=\"width=device-width, initial-scale=1.0\">\n    \
                                 <title>$1</title>\n</head>\n<body>\n    \
                                 $0\n</body>\n</html>";

/// Whole-abbreviation snippet overrides. An exact match bypasses the
/// parser/expander pipeline entirely.
const BUILTIN_SNIPPETS: [(&str, &str); 4] = [
	("!", HTML5_BOILERPLATE),
	("html:5", HTML5_BOILERPLATE),
	("cc:ie", "<!--[if IE]>\n    $0\n<![endif]-->"),
	("cc:noie", "<!--[if !IE]><!-->\n    $0\n<!--<![endif]-->"),
];

/// Template-context mnemonics, looked up by exact name before the
/// abbreviation grammar is consulted.
const BUILTIN_MNEMONICS: [(&str, &str); 15] = [
	("for", "{% for $1 in $2 %}\n    $3\n{% endfor %}$0"),
	("if", "{% if $1 %}\n    $2\n{% endif %}$0"),
	(
		"ifelse",
		"{% if $1 %}\n    $2\n{% else %}\n    $3\n{% endif %}$0",
	),
	("block", "{% block $1 %}\n    $2\n{% endblock %}$0"),
	("extend", "{% extends \"$1\" %}$0"),
	("include", "{% include \"$1\" %}$0"),
	("set", "{% set $1 = $2 %}$0"),
	("macro", "{% macro $1($2) %}\n    $3\n{% endmacro %}$0"),
	("call", "{% call $1($2) %}\n    $3\n{% endcall %}$0"),
	("with", "{% with $1 = $2 %}\n    $3\n{% endwith %}$0"),
	("comment", "{# $1 #}$0"),
	("var", "{{ $1 }}$0"),
	("filter", "{{ $1|$2 }}$0"),
	("url", "{{ url_for(\"$1\") }}$0"),
	(
		"csrf",
		"<input type=\"hidden\" name=\"csrf_token\" value=\"{{ csrf_token() }}\"/>$0",
	),
];

/// Namespaced patterns looked up after stripping the `j:` prefix.
const BUILTIN_PATTERNS: [(&str, &str); 5] = [
	(
		"form",
		"<form method=\"post\">\n    {{ csrf_token() }}\n    $1\n    <input type=\"submit\" \
		 value=\"$2\">\n</form>$0",
	),
	(
		"table",
		"{% for item in $1 %}\n<tr>\n    <td>{{ item.$2 }}</td>\n</tr>\n{% endfor %}$0",
	),
	("list", "{% for item in $1 %}\n<li>{{ item }}</li>\n{% endfor %}$0"),
	(
		"select",
		"<select name=\"$1\">\n{% for option in $2 %}\n    <option value=\"{{ option.value \
		 }}\">{{ option.label }}</option>\n{% endfor %}\n</select>$0",
	),
	(
		"if-form",
		"{% if form.$1.errors %}\n    <div class=\"error\">{{ form.$1.errors[0] }}</div>\n{% \
		 endif %}\n{{ form.$1 }}$0",
	),
];

/// The namespace prefix for pattern lookups, e.g. `j:form`.
pub const PATTERN_PREFIX: &str = "j:";

/// The three ordered lookup tables consulted before abbreviation parsing.
///
/// Each table starts from its built-in entries; [`EmxConfig`] entries are
/// merged on top, replacing a built-in of the same name or appending at the
/// end. Order is preserved because completion lists are built by iterating
/// these tables.
#[derive(Debug, Clone)]
pub struct SnippetLibrary {
	/// Whole-abbreviation overrides (`!`, `html:5`, ...).
	pub snippets: Vec<(String, String)>,
	/// Exact-name template-context mnemonics (`for`, `if`, ...).
	pub mnemonics: Vec<(String, String)>,
	/// Namespaced patterns looked up without their `j:` prefix.
	pub patterns: Vec<(String, String)>,
}

impl Default for SnippetLibrary {
	fn default() -> Self {
		Self {
			snippets: to_owned_table(&BUILTIN_SNIPPETS),
			mnemonics: to_owned_table(&BUILTIN_MNEMONICS),
			patterns: to_owned_table(&BUILTIN_PATTERNS),
		}
	}
}

impl SnippetLibrary {
	/// Build a library from the built-ins plus the entries of a loaded config.
	pub fn with_config(config: &EmxConfig) -> Self {
		let mut library = Self::default();
		merge_entries(&mut library.snippets, &config.snippets);
		merge_entries(&mut library.mnemonics, &config.mnemonics);
		merge_entries(&mut library.patterns, &config.patterns);
		library
	}

	/// Look up a whole-abbreviation snippet override by exact name.
	pub fn snippet(&self, name: &str) -> Option<&str> {
		lookup(&self.snippets, name)
	}

	/// Look up a template-context mnemonic by exact name.
	pub fn mnemonic(&self, name: &str) -> Option<&str> {
		lookup(&self.mnemonics, name)
	}

	/// Look up a namespaced pattern by its name with the prefix already
	/// stripped.
	pub fn pattern(&self, name: &str) -> Option<&str> {
		lookup(&self.patterns, name)
	}
}

fn to_owned_table(table: &[(&str, &str)]) -> Vec<(String, String)> {
	table
		.iter()
		.map(|(name, text)| ((*name).to_string(), (*text).to_string()))
		.collect()
}

fn lookup<'a>(table: &'a [(String, String)], name: &str) -> Option<&'a str> {
	table
		.iter()
		.find(|(entry, _)| entry == name)
		.map(|(_, text)| text.as_str())
}

/// Merge config entries into a table: same-name entries replace the existing
/// text in place, new names append in the config's (sorted) order.
fn merge_entries(table: &mut Vec<(String, String)>, entries: &std::collections::BTreeMap<String, String>) {
	for (name, text) in entries {
		if let Some(existing) = table.iter_mut().find(|(entry, _)| entry == name) {
			existing.1.clone_from(text);
		} else {
			table.push((name.clone(), text.clone()));
		}
	}
}

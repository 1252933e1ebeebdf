use rstest::rstest;
use similar_asserts::assert_eq;

use super::*;

// ---- Segmenter ----

#[rstest]
#[case::single("div", vec!["div"])]
#[case::two("div,span", vec!["div", "span"])]
#[case::bracket_comma("div[data-x=1,2],span", vec!["div[data-x=1,2]", "span"])]
#[case::paren_comma("a(b,c)", vec!["a(b,c)"])]
#[case::brace_comma("p{one,two},em", vec!["p{one,two}", "em"])]
#[case::trailing_comma("div,", vec!["div"])]
#[case::leading_comma(",div", vec!["div"])]
#[case::double_comma("div,,span", vec!["div", "span"])]
#[case::empty("", vec![])]
#[case::only_commas(",,,", vec![])]
#[case::unbalanced_merges("div[,span", vec!["div[,span"])]
fn split_top_level_segments(#[case] input: &str, #[case] expected: Vec<&str>) {
	let segments = split_segments(input);
	assert_eq!(segments, expected);
}

// ---- Element descriptor parser ----

#[test]
fn descriptor_defaults_to_div() {
	let node = parse_element("", 1, 0);
	assert_eq!(node.tag, "div");
	assert_eq!(node.id, None);
	assert!(node.classes.is_empty());
	assert!(node.attributes.is_empty());
	assert_eq!(node.content, None);
}

#[test]
fn descriptor_full() {
	let node = parse_element("input#name.wide.strict[type=text required]{hint}", 1, 0);
	assert_eq!(node.tag, "input");
	assert_eq!(node.id.as_deref(), Some("name"));
	assert_eq!(node.classes, vec!["wide", "strict"]);
	assert_eq!(
		node.attributes,
		vec![
			("type".to_string(), "text".to_string()),
			("required".to_string(), String::new()),
		]
	);
	assert_eq!(node.content.as_deref(), Some("hint"));
}

#[rstest]
#[case::id_before_class("#intro.lead", None, Some("intro"), vec!["lead"])]
#[case::class_before_id(".lead#intro", None, Some("intro"), vec!["lead"])]
#[case::tag_only("section", Some("section"), None, vec![])]
#[case::first_id_wins("div#a#b", Some("div"), Some("a"), vec![])]
#[case::duplicate_classes("div.a.a", Some("div"), None, vec!["a", "a"])]
fn descriptor_scan_order_independent(
	#[case] input: &str,
	#[case] tag: Option<&str>,
	#[case] id: Option<&str>,
	#[case] classes: Vec<&str>,
) {
	let node = parse_element(input, 1, 0);
	assert_eq!(node.tag, tag.unwrap_or("div"));
	assert_eq!(node.id.as_deref(), id);
	assert_eq!(node.classes, classes);
}

#[test]
fn descriptor_word_after_marker_is_not_a_tag() {
	// Only the leading word names the tag.
	let node = parse_element("#header main", 1, 0);
	assert_eq!(node.tag, "div");
	assert_eq!(node.id.as_deref(), Some("header"));
}

#[rstest]
#[case::bare("a[href=https://example.com]", "href", "https://example.com")]
#[case::double_quoted(r#"a[href="https://example.com"]"#, "href", "https://example.com")]
#[case::single_quoted("a[title='hi']", "title", "hi")]
#[case::value_keeps_later_equals("div[data=a=b]", "data", "a=b")]
fn descriptor_attribute_values(#[case] input: &str, #[case] key: &str, #[case] value: &str) {
	let node = parse_element(input, 1, 0);
	assert_eq!(node.attributes.first().map(|(k, _)| k.as_str()), Some(key));
	assert_eq!(node.attributes.first().map(|(_, v)| v.as_str()), Some(value));
}

#[test]
fn descriptor_boolean_attribute_has_empty_value() {
	let node = parse_element("input[disabled]", 1, 0);
	assert_eq!(
		node.attributes,
		vec![("disabled".to_string(), String::new())]
	);
}

#[test]
fn descriptor_multiple_attr_groups_in_order() {
	let node = parse_element("img[src=a.png][alt=photo]", 1, 0);
	assert_eq!(
		node.attributes,
		vec![
			("src".to_string(), "a.png".to_string()),
			("alt".to_string(), "photo".to_string()),
		]
	);
}

#[test]
fn descriptor_content_taken_verbatim_first_span_only() {
	let node = parse_element("p{hello world}{second}", 1, 0);
	assert_eq!(node.content.as_deref(), Some("hello world"));
}

// ---- Parser ----

#[test]
fn parse_empty_returns_empty() {
	assert!(parse("").is_empty());
	assert!(parse(",").is_empty());
	assert!(parse("   ").is_empty());
}

#[test]
fn parse_multiplier_sets_repeat() {
	let nodes = parse("li*3");
	assert_eq!(nodes.len(), 1);
	assert_eq!(nodes[0].tag, "li");
	assert_eq!(nodes[0].repeat, 3);
}

#[test]
fn parse_multiplier_binds_to_the_element_it_follows() {
	let nodes = parse("ul>li*3");
	assert_eq!(nodes.len(), 1);
	assert_eq!(nodes[0].tag, "ul");
	assert_eq!(nodes[0].repeat, 1);
	assert_eq!(nodes[0].children.len(), 1);
	assert_eq!(nodes[0].children[0].tag, "li");
	assert_eq!(nodes[0].children[0].repeat, 3);
}

#[test]
fn parse_multiplier_travels_down_a_child_chain() {
	let nodes = parse("a>b>c*2");
	let b = &nodes[0].children[0];
	let c = &b.children[0];
	assert_eq!(nodes[0].repeat, 1);
	assert_eq!(b.repeat, 1);
	assert_eq!(c.tag, "c");
	assert_eq!(c.repeat, 2);
}

#[test]
fn parse_climb_up_stored_but_tree_shape_unchanged() {
	let nodes = parse("div^^");
	assert_eq!(nodes.len(), 1);
	assert_eq!(nodes[0].climb_up, 2);
	assert!(nodes[0].children.is_empty());
}

#[test]
fn parse_child_chain_nests() {
	let nodes = parse("nav>ul>li");
	assert_eq!(nodes[0].tag, "nav");
	assert_eq!(nodes[0].children[0].tag, "ul");
	assert_eq!(nodes[0].children[0].children[0].tag, "li");
}

#[test]
fn parse_sibling_keeps_only_left_operand() {
	let nodes = parse("header+main+footer");
	assert_eq!(nodes.len(), 1);
	assert_eq!(nodes[0].tag, "header");
	assert!(nodes[0].children.is_empty());
}

#[test]
fn parse_group_takes_first_span_and_ignores_the_rest() {
	let nodes = parse("div>(a)");
	assert_eq!(nodes.len(), 1);
	assert_eq!(nodes[0].tag, "a");
}

#[test]
fn parse_empty_group_is_dropped() {
	assert!(parse("()").is_empty());
}

#[rstest]
#[case::no_digits("li*", "li", 1)]
#[case::star_mid_word("di*v", "di*v", 1)]
#[case::large("td*12", "td", 12)]
fn parse_multiplier_edge_cases(#[case] input: &str, #[case] _raw: &str, #[case] repeat: usize) {
	let nodes = parse(input);
	assert_eq!(nodes.len(), 1);
	assert_eq!(nodes[0].repeat, repeat);
}

#[test]
fn parse_comma_separated_roots() {
	let nodes = parse("div, span");
	assert_eq!(nodes.len(), 2);
	assert_eq!(nodes[0].tag, "div");
	assert_eq!(nodes[1].tag, "span");
}

// ---- Expander ----

#[rstest]
#[case::classed("div.container", "<div class=\"container\">$1</div>$0")]
#[case::with_id("div#header", "<div id=\"header\">$1</div>$0")]
#[case::repeated("li*3", "<li>$1</li>\n<li>$2</li>\n<li>$3</li>$0")]
#[case::nested("ul>li", "<ul>\n    <li>$1</li>\n</ul>$0")]
#[case::nested_repeat(
	"ul>li*3",
	"<ul>\n    <li>$1</li>\n    <li>$2</li>\n    <li>$3</li>\n</ul>$0"
)]
#[case::void_with_attrs("img[src=test.jpg alt=Test]", "<img src=\"test.jpg\" alt=\"Test\">\n$0")]
#[case::void_bare("br", "<br>\n$0")]
#[case::content("p{hello}", "<p>hello</p>$0")]
#[case::content_with_child("div{txt}>p", "<div>txt\n    <p>$1</p>\n</div>$0")]
#[case::boolean_attr("input[disabled]", "<input disabled>\n$0")]
#[case::two_roots("div,span", "<div>$1</div><span>$2</span>$0")]
#[case::group("(span)", "<span>$1</span>$0")]
#[case::climb_ignored("div^^", "<div>$1</div>$0")]
#[case::empty("", "$0")]
fn expand_markup(#[case] abbreviation: &str, #[case] expected: &str) {
	let expander = Expander::new();
	assert_eq!(expander.expand(abbreviation, false), expected);
}

#[rstest]
fn expand_void_elements_have_no_closing_tag(
	#[values(
		"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
		"source", "track", "wbr"
	)]
	tag: &str,
) {
	let expander = Expander::new();
	let markup = expander.expand(tag, false);
	assert!(markup.contains(&format!("<{tag}")));
	assert!(!markup.contains(&format!("</{tag}>")));
	// Void elements never consume a placeholder number.
	assert!(!markup.contains("$1"));
}

#[test]
fn expand_always_ends_with_resting_placeholder() {
	let expander = Expander::new();
	for abbreviation in ["div", "br", "ul>li*3", "!", "", "p{text}", "bogus###"] {
		let markup = expander.expand(abbreviation, false);
		assert!(
			markup.contains("$0"),
			"missing $0 in expansion of {abbreviation:?}: {markup:?}"
		);
	}
}

#[test]
fn expand_repeat_appends_index_to_id() {
	let expander = Expander::new();
	assert_eq!(
		expander.expand("div#item*2", false),
		"<div id=\"item1\">$1</div>\n<div id=\"item2\">$2</div>$0"
	);
}

#[test]
fn expand_repeat_substitutes_index_in_attribute_values() {
	let expander = Expander::new();
	assert_eq!(
		expander.expand("input[name=field$]*2", false),
		"<input name=\"field1\">\n<input name=\"field2\">\n$0"
	);
}

#[test]
fn expand_repeat_substitutes_index_in_content() {
	let expander = Expander::new();
	assert_eq!(
		expander.expand("span{item $}*2", false),
		"<span>item $1</span>\n<span>item $2</span>$0"
	);
}

#[test]
fn expand_single_copy_leaves_placeholder_character_alone() {
	let expander = Expander::new();
	assert_eq!(
		expander.expand("input[name=field$]", false),
		"<input name=\"field$\">\n$0"
	);
}

#[test]
fn expand_sibling_drop_regression() {
	// The right-hand operand of `+` is discarded: exactly one input element
	// survives. Locked in until the parser grows a proper sibling list.
	let expander = Expander::new();
	let markup = expander.expand("form>input[type=text]+input[type=submit]", false);
	assert_eq!(markup.matches("<input").count(), 1);
	assert!(!markup.contains("submit"));
}

#[test]
fn expand_jinja_form_defaults_to_post() {
	let expander = Expander::new();
	let markup = expander.expand("form>input[type=text]", true);
	assert!(markup.starts_with("<form method=\"post\">"));
}

#[test]
fn expand_jinja_form_keeps_explicit_method() {
	let expander = Expander::new();
	let markup = expander.expand("form[method=get]", true);
	assert!(markup.contains("method=\"get\""));
	assert!(!markup.contains("method=\"post\""));
}

#[test]
fn expand_attribute_emission_order_is_id_class_then_attrs() {
	let expander = Expander::new();
	let markup = expander.expand("a[href=x]#top.em", false);
	let open = markup.lines().next().unwrap_or_default();
	let id_at = open.find("id=").unwrap_or(usize::MAX);
	let class_at = open.find("class=").unwrap_or(usize::MAX);
	let href_at = open.find("href=").unwrap_or(usize::MAX);
	assert!(id_at < class_at && class_at < href_at, "bad order: {open}");
}

// ---- Snippet overrides ----

#[test]
fn snippet_override_bypasses_the_pipeline() {
	let expander = Expander::new();
	let markup = expander.expand("!", false);
	let doctype = markup.find("<!DOCTYPE html>");
	let head = markup.find("<head>");
	let body = markup.find("<body>");
	assert!(doctype < head && head < body);
	// The stored text already carries $0 and is returned unmodified.
	assert_eq!(markup.matches("$0").count(), 1);
}

#[test]
fn snippet_override_matches_whole_abbreviation_only() {
	let expander = Expander::new();
	// `!x` is not a registered snippet; it falls through to the grammar.
	let markup = expander.expand("!x", false);
	assert!(!markup.contains("<!DOCTYPE"));
}

#[rstest]
#[case::html5("html:5", "<!DOCTYPE html>")]
#[case::ie("cc:ie", "<!--[if IE]>")]
#[case::noie("cc:noie", "<!--[if !IE]><!-->")]
fn builtin_snippets_expand(#[case] name: &str, #[case] marker: &str) {
	let expander = Expander::new();
	assert!(expander.expand(name, false).contains(marker));
}

// ---- Context integration ----

#[test]
fn context_mnemonic_consulted_before_grammar() {
	let engine = ContextEngine::new();
	let markup = engine.expand_with_context("for");
	assert!(markup.starts_with("{% for"));
	assert!(markup.contains("{% endfor %}"));
	assert!(markup.contains("$0"));
}

#[test]
fn context_pattern_prefix_stripped_before_lookup() {
	let engine = ContextEngine::new();
	let markup = engine.expand_with_context("j:list");
	assert!(markup.contains("{% for item in $1 %}"));
	assert!(markup.contains("<li>"));
}

#[test]
fn context_unknown_pattern_echoes_name() {
	let engine = ContextEngine::new();
	assert_eq!(engine.expand_with_context("j:nope"), "nope$0");
}

#[test]
fn context_falls_back_to_grammar_with_template_defaults() {
	let engine = ContextEngine::new();
	assert_eq!(engine.expand_with_context("div"), "<div>$1</div>$0");
	assert!(
		engine
			.expand_with_context("form>input[type=text]")
			.starts_with("<form method=\"post\">")
	);
}

// ---- Completions ----

#[test]
fn completions_tags_before_patterns() {
	let expander = Expander::new();
	let completions = expander.completions("");
	assert_eq!(completions.len(), HTML5_TAGS.len() + 10);
	assert_eq!(completions[0].kind, CompletionKind::Tag);
	assert_eq!(
		completions.last().map(|c| c.kind),
		Some(CompletionKind::Snippet)
	);
}

#[test]
fn completions_prefix_filters_tags() {
	let expander = Expander::new();
	let completions = expander.completions("ta");
	let tags: Vec<&str> = completions
		.iter()
		.filter(|c| c.kind == CompletionKind::Tag)
		.map(|c| c.label.as_str())
		.collect();
	assert_eq!(tags, vec!["table"]);
}

#[test]
fn completions_void_tag_insert_text_has_no_closing() {
	let expander = Expander::new();
	let completions = expander.completions("br");
	let br = completions
		.iter()
		.find(|c| c.label == "br")
		.unwrap_or_else(|| panic!("no br completion"));
	assert_eq!(br.insert_text, "br>");
}

#[test]
fn completions_non_void_tag_insert_text_wraps_placeholder() {
	let expander = Expander::new();
	let completions = expander.completions("ul");
	let ul = completions
		.iter()
		.find(|c| c.label == "ul")
		.unwrap_or_else(|| panic!("no ul completion"));
	assert_eq!(ul.insert_text, "ul>$1</ul>$0");
}

#[test]
fn completions_pattern_insert_text_is_the_expansion() {
	let expander = Expander::new();
	let completions = expander.completions("ul>li*3");
	let pattern = completions
		.iter()
		.find(|c| c.label == "ul>li*3")
		.unwrap_or_else(|| panic!("no pattern completion"));
	assert!(pattern.insert_text.contains("<ul>"));
	assert!(pattern.insert_text.ends_with("$0"));
	assert!(pattern.documentation.starts_with("Emmet: ul>li*3"));
}

#[test]
fn completions_preview_truncates_long_expansions() {
	let long = "x".repeat(PREVIEW_LIMIT + 50);
	let documentation = pattern_documentation("big", &long);
	assert!(documentation.ends_with("..."));
	assert!(documentation.len() < long.len());
}

#[test]
fn context_completions_mnemonics_first() {
	let engine = ContextEngine::new();
	let completions = engine.completions("fo");
	assert_eq!(completions[0].label, "for");
	assert_eq!(completions[0].kind, CompletionKind::Snippet);
	assert!(completions.iter().any(|c| c.label == "footer"));
}

#[test]
fn context_completions_patterns_require_namespace_prefix() {
	let engine = ContextEngine::new();

	let completions = engine.completions("j:fo");
	assert_eq!(completions.len(), 1);
	assert_eq!(completions[0].label, "j:form");
	assert!(completions[0].insert_text.contains("csrf_token"));

	let without_prefix = engine.completions("form");
	assert!(!without_prefix.iter().any(|c| c.label.starts_with("j:")));
}

// ---- Config ----

#[test]
fn config_parses_all_tables() -> AnyEmptyResult {
	let config = EmxConfig::from_toml(
		r#"
[snippets]
"sig" = "<footer>$1</footer>$0"

[mnemonics]
"hello" = "{{ greeting }}$0"

[patterns]
"card" = "<div class=\"card\">$1</div>$0"
"#,
	)?;
	assert_eq!(config.snippets.len(), 1);
	assert_eq!(config.mnemonics.len(), 1);
	assert_eq!(config.patterns.len(), 1);

	Ok(())
}

#[test]
fn config_rejects_unknown_tables() {
	let result = EmxConfig::from_toml("[bogus]\nx = \"y\"\n");
	assert!(matches!(result, Err(EmxError::ConfigParse(_))));
}

#[test]
fn config_entries_extend_and_override_builtins() -> AnyEmptyResult {
	let config = EmxConfig::from_toml(
		r#"
[snippets]
"!" = "override$0"
"sig" = "<footer>$1</footer>$0"
"#,
	)?;
	let library = SnippetLibrary::with_config(&config);
	assert_eq!(library.snippet("!"), Some("override$0"));
	assert_eq!(library.snippet("sig"), Some("<footer>$1</footer>$0"));
	// Untouched built-ins survive the merge.
	assert!(library.snippet("html:5").is_some());

	let expander = Expander::with_library(library);
	assert_eq!(expander.expand("!", false), "override$0");
	assert_eq!(expander.expand("sig", false), "<footer>$1</footer>$0");

	Ok(())
}

#[test]
fn config_custom_mnemonics_and_patterns_resolve() -> AnyEmptyResult {
	let config = EmxConfig::from_toml(
		"[mnemonics]\n\"hello\" = \"{{ greeting }}\"\n\n[patterns]\n\"card\" = \"<div \
		 class=\\\"card\\\">$1</div>$0\"\n",
	)?;
	let engine = ContextEngine::with_library(SnippetLibrary::with_config(&config));
	// Stored text without $0 still gets the final-placeholder guarantee.
	assert_eq!(engine.expand_with_context("hello"), "{{ greeting }}$0");
	assert_eq!(
		engine.expand_with_context("j:card"),
		"<div class=\"card\">$1</div>$0"
	);

	Ok(())
}

#[test]
fn load_config_from_first_candidate() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join(".emx.toml"),
		"[snippets]\n\"a\" = \"from-dotfile$0\"\n",
	)?;
	std::fs::write(
		tmp.path().join("emx.toml"),
		"[snippets]\n\"a\" = \"from-plain$0\"\n",
	)?;

	let config = load_config(tmp.path())?.unwrap_or_default();
	assert_eq!(config.snippets.get("a").map(String::as_str), Some("from-plain$0"));

	Ok(())
}

#[test]
fn load_config_missing_is_none() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	assert!(load_config(tmp.path())?.is_none());

	Ok(())
}

#[test]
fn load_config_malformed_is_a_parse_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("emx.toml"), "not = [valid\n")?;
	let result = load_config(tmp.path());
	assert!(matches!(result, Err(EmxError::ConfigParse(_))));

	Ok(())
}

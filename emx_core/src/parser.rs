use crate::element::Node;
use crate::element::parse_element;
use crate::segment::split_segments;

/// Parse an abbreviation into its root nodes, one per top-level segment.
///
/// Degenerate input (empty string, bare commas, an empty group) produces an
/// empty list. The parser never fails: it serves an interactive completion
/// context where every keystroke may re-invoke it, so unparsable pieces are
/// dropped rather than reported.
pub fn parse(abbreviation: &str) -> Vec<Node> {
	let segments = split_segments(abbreviation);
	tracing::debug!(segments = segments.len(), "parsing abbreviation");

	segments
		.iter()
		.filter_map(|segment| parse_expression(segment.trim(), 1, 0))
		.collect()
}

/// Parse a single segment, applying operators in fixed precedence order:
/// multiplier, climb-up, grouping, child, sibling, leaf.
///
/// `repeat` and `climb_up` are the pending counts stripped by an enclosing
/// call; they travel down the right-hand side of a `>` chain so that a
/// trailing multiplier binds to the element it follows textually — `ul>li*3`
/// is one `ul` whose single `li` child repeats three times.
fn parse_expression(expr: &str, repeat: usize, climb_up: usize) -> Option<Node> {
	let (expr, repeat) = strip_multiplier(expr, repeat);
	let (expr, climb_up) = strip_climb_up(expr, climb_up);

	if expr.contains('(') && expr.contains(')') {
		return parse_group(expr);
	}

	if let Some((left, right)) = expr.split_once('>') {
		return parse_child(left.trim(), right.trim(), repeat, climb_up);
	}

	if let Some((left, _right)) = expr.split_once('+') {
		// Only the left operand survives; the right-hand side of `+` is
		// dropped. A regression test locks this in until the parser grows a
		// proper sibling list.
		return Some(parse_element(left.trim(), repeat, climb_up));
	}

	Some(parse_element(expr, repeat, climb_up))
}

/// Strip a trailing `*<digits>` multiplier, if present.
fn strip_multiplier(expr: &str, default: usize) -> (&str, usize) {
	let Some(star) = expr.rfind('*') else {
		return (expr, default);
	};

	let digits = &expr[star + 1..];
	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return (expr, default);
	}

	match digits.parse::<usize>() {
		Ok(repeat) => (&expr[..star], repeat.max(1)),
		Err(_) => (expr, default),
	}
}

/// Strip trailing `^` climb-up markers one at a time.
fn strip_climb_up(expr: &str, mut climb_up: usize) -> (&str, usize) {
	let mut expr = expr;
	while let Some(stripped) = expr.strip_suffix('^') {
		climb_up += 1;
		expr = stripped;
	}
	(expr, climb_up)
}

/// Parse the first `(...)` span in the expression and ignore everything
/// outside it. This is a single-group limitation, not a general bracket
/// matcher: `(a)(b)` parses only `a`, and any pending repeat or climb-up is
/// lost with the surrounding text.
fn parse_group(expr: &str) -> Option<Node> {
	let open = expr.find('(')?;
	let close = expr[open + 1..].find(')').map(|i| open + 1 + i)?;
	let inner = &expr[open + 1..close];

	if inner.is_empty() {
		return None;
	}

	parse_expression(inner.trim(), 1, 0)
}

/// Parse a `left>right` split: the left side is a leaf element, the right
/// side is parsed recursively (carrying the pending repeat and climb-up) and
/// attached as the sole child. Deeper chains work because the right side may
/// itself contain another `>`.
fn parse_child(left: &str, right: &str, repeat: usize, climb_up: usize) -> Option<Node> {
	let mut parent = parse_element(left, 1, 0);

	if let Some(child) = parse_expression(right, repeat, climb_up) {
		parent.children.push(child);
	}

	Some(parent)
}

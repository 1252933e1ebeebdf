/// Split a raw abbreviation into its top-level comma-separated segments.
///
/// The scan tracks bracket depth across `(`/`[`/`{` and their closers and
/// only splits on a `,` seen at depth 0, so `div[data-x=1,2],span` yields two
/// segments. The final segment is included without a trailing comma. Empty
/// pieces (from `,,` or a leading comma) are dropped.
///
/// Unbalanced brackets keep the depth from returning to 0, which silently
/// merges the remaining segments into one. That mirrors the rest of the
/// pipeline: malformed input degrades instead of failing.
pub fn split_segments(abbreviation: &str) -> Vec<String> {
	let mut segments = vec![];
	let mut current = String::new();
	let mut depth = 0i32;

	for ch in abbreviation.chars() {
		match ch {
			'(' | '[' | '{' => depth += 1,
			')' | ']' | '}' => depth -= 1,
			',' if depth == 0 => {
				if !current.is_empty() {
					segments.push(std::mem::take(&mut current));
				}
				continue;
			}
			_ => {}
		}
		current.push(ch);
	}

	if !current.is_empty() {
		segments.push(current);
	}

	segments
}

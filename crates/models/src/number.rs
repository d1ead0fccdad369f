use serde::Serialize;

/// Outcome of reading a numeric text field.
///
/// Form fields keep whatever the user typed; the number is only derived when the
/// engine runs. A field that has no numeric prefix resolves to its field-specific
/// fallback instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParsedNumber {
	Parsed(f64),
	Fallback(f64),
}

impl ParsedNumber {
	/// Reads `text` as a decimal number, accepting decimal commas.
	pub fn from_text(text: &str, fallback: f64) -> Self {
		let normalized = text.replace(',', ".");
		match leading_float(&normalized) {
			Some(value) => ParsedNumber::Parsed(value),
			None => ParsedNumber::Fallback(fallback),
		}
	}

	pub fn value(self) -> f64 {
		match self {
			ParsedNumber::Parsed(v) | ParsedNumber::Fallback(v) => v,
		}
	}

	pub fn is_fallback(self) -> bool {
		matches!(self, ParsedNumber::Fallback(_))
	}
}

/// Longest numeric prefix of `s`, ignoring leading whitespace and trailing garbage.
/// `"12abc"` is 12, `"1."` is 1, `"."` and `""` have no value.
fn leading_float(s: &str) -> Option<f64> {
	let s = s.trim_start();
	let bytes = s.as_bytes();
	let mut end = 0;

	let negative = bytes.first() == Some(&b'-');
	if matches!(bytes.first(), Some(b'+' | b'-')) {
		end = 1;
	}
	if s[end..].starts_with("Infinity") {
		return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
	}

	let int_start = end;
	while end < bytes.len() && bytes[end].is_ascii_digit() {
		end += 1;
	}
	let mut digits = end - int_start;

	if end < bytes.len() && bytes[end] == b'.' {
		let frac_start = end + 1;
		let mut j = frac_start;
		while j < bytes.len() && bytes[j].is_ascii_digit() {
			j += 1;
		}
		digits += j - frac_start;
		if digits > 0 {
			end = j;
		}
	}
	if digits == 0 {
		return None;
	}

	// Exponent only counts when at least one digit follows it
	if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
		let mut j = end + 1;
		if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
			j += 1;
		}
		let exp_start = j;
		while j < bytes.len() && bytes[j].is_ascii_digit() {
			j += 1;
		}
		if j > exp_start {
			end = j;
		}
	}

	s[..end].parse::<f64>().ok()
}

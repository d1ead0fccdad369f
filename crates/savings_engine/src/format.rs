use models::{NumberFormat, SymbolPosition};

/// Formats `value` with at most `max_fraction_digits` decimals, dropping trailing
/// zeros and grouping the integer part by thousands.
pub fn format_number(value: f64, max_fraction_digits: usize, format: &NumberFormat) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    // half away from zero, like Intl.NumberFormat
    let scale = 10f64.powi(max_fraction_digits as i32);
    let scaled = value.abs() * scale;
    let rounded = if scaled.is_finite() {
        scaled.round() / scale
    } else {
        value.abs()
    };
    let fixed = format!("{:.*}", max_fraction_digits, rounded);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    // no "-0" after rounding
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();

    let mut out = String::new();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, &format.group_separator));
    if !frac_part.is_empty() {
        out.push_str(&format.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

/// Whole-currency amount with the configured symbol.
pub fn format_currency(value: f64, format: &NumberFormat) -> String {
    let amount = format_number(value, 0, format);
    match format.symbol_position {
        SymbolPosition::After => format!("{}\u{a0}{}", amount, format.currency_symbol),
        SymbolPosition::Before => format!("{}{}", format.currency_symbol, amount),
    }
}

/// MWh and tonnes are shown with one decimal at most.
pub fn format_quantity(value: f64, format: &NumberFormat) -> String {
    format_number(value, 1, format)
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

//! Number formatting helpers
//!
//! Every view renders weights, amounts and counters through these functions so
//! that separators and fallbacks look the same everywhere.

/// Placeholder shown for values the backend did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Format an integer with comma thousands separators (`1234567` -> `1,234,567`)
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a floating point value with thousands separators.
///
/// Whole numbers are printed without decimals, everything else with two.
/// Non-finite values render as [`NOT_AVAILABLE`].
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let cents = (value * 100.0).round() as i64;
    let whole = format_thousands(cents / 100);
    let frac = (cents % 100).abs();
    if frac == 0 {
        whole
    } else if cents < 0 && cents / 100 == 0 {
        format!("-{}.{:02}", whole, frac)
    } else {
        format!("{}.{:02}", whole, frac)
    }
}

/// Format an optional value, falling back to [`NOT_AVAILABLE`]
pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Format a weight in kilograms (`18520` -> `18,520 kg`)
pub fn format_weight(kg: f64) -> String {
    format!("{} kg", format_number(kg))
}

/// Format an overload with an explicit sign (`3520` -> `+3,520 kg`)
pub fn format_overload(kg: f64) -> String {
    if kg > 0.0 {
        format!("+{}", format_weight(kg))
    } else {
        format_weight(kg)
    }
}

/// Format a monetary amount with its currency code (`50000` -> `50,000 TZS`)
pub fn format_currency(amount: f64, currency: &str) -> String {
    format!("{} {}", format_number(amount), currency)
}

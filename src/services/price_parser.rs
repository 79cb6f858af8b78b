//! Price text normalization
//!
//! Product pages render prices with currency symbols, country-code
//! prefixes ("CA$1,299.99") and either comma or dot separators. This
//! module turns that text into a plain f64. Unparseable input yields
//! 0.0, never an error or NaN.

use crate::constants::{CURRENCY_PREFIXES, CURRENCY_SYMBOL_CHARS};

/// Parse a price display text into a numeric value.
///
/// Separator handling:
/// - both `,` and `.` present: comma is a thousands separator
/// - only `,` present: decimal separator when at most 2 digits follow
///   the last comma, thousands separator otherwise
/// - otherwise the first numeric run is taken as-is
pub fn parse(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let mut stripped = trimmed.to_string();
    for prefix in CURRENCY_PREFIXES {
        stripped = stripped.replace(prefix, "");
    }
    for symbol in CURRENCY_SYMBOL_CHARS {
        stripped = stripped.replace(*symbol, "");
    }

    // Blank out everything but digits and separators, keeping word
    // boundaries so adjacent numbers on the page stay distinct
    let cleaned: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_digit() || c == ',' || c == '.' {
                c
            } else {
                ' '
            }
        })
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return 0.0;
    }

    let has_comma = cleaned.contains(',');
    let has_dot = cleaned.contains('.');

    let value = if has_comma && has_dot {
        // "1,299.99" - commas group thousands, dot is the decimal point
        longest_numeric_run(&cleaned.replace(',', ""))
    } else if has_comma {
        // Digits directly following the last comma decide its meaning
        let after_last: String = cleaned
            .rsplit(',')
            .next()
            .unwrap_or("")
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if after_last.len() <= 2 {
            // "29,99" - the final comma is a decimal separator
            first_numeric_run(&decimal_comma_to_dot(&cleaned))
        } else {
            // "1,500" - thousands separators only
            first_numeric_run(&cleaned.replace(',', ""))
        }
    } else {
        first_numeric_run(&cleaned)
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Nullable boundary variant: extraction may hand back no text at all.
pub fn parse_opt(text: Option<&str>) -> f64 {
    text.map(parse).unwrap_or(0.0)
}

/// Replace the final comma with a dot and drop any earlier ones.
fn decimal_comma_to_dot(s: &str) -> String {
    match s.rfind(',') {
        Some(idx) => {
            let mut out = s[..idx].replace(',', "");
            out.push('.');
            out.push_str(&s[idx + 1..]);
            out
        }
        None => s.to_string(),
    }
}

/// Split into maximal runs of digits with at most one embedded dot.
///
/// A second dot terminates the current run, so "1.299.99" yields
/// ["1.299", "99"]. Runs without a digit are discarded.
fn numeric_runs(s: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let bytes = s.as_bytes();
    let mut start = None;
    let mut seen_dot = false;

    for (i, &b) in bytes.iter().enumerate() {
        let is_digit = b.is_ascii_digit();
        let is_dot = b == b'.';

        match start {
            None => {
                if is_digit {
                    start = Some(i);
                    seen_dot = false;
                }
            }
            Some(from) => {
                if is_digit {
                    continue;
                }
                if is_dot && !seen_dot {
                    seen_dot = true;
                    continue;
                }
                runs.push(s[from..i].trim_end_matches('.'));
                start = None;
                seen_dot = false;
            }
        }
    }

    if let Some(from) = start {
        runs.push(s[from..].trim_end_matches('.'));
    }

    runs.retain(|r| !r.is_empty());
    runs
}

fn first_numeric_run(s: &str) -> f64 {
    numeric_runs(s)
        .first()
        .and_then(|r| r.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn longest_numeric_run(s: &str) -> f64 {
    let mut best: Option<&str> = None;
    for run in numeric_runs(s) {
        if best.map_or(true, |b| run.len() > b.len()) {
            best = Some(run);
        }
    }
    best.and_then(|r| r.parse::<f64>().ok()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_dollar_price() {
        assert_eq!(parse("$29.99"), 29.99);
    }

    #[test]
    fn test_country_code_prefix_with_thousands() {
        assert_eq!(parse("CA$1,299.99"), 1299.99);
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse("29,99"), 29.99);
    }

    #[test]
    fn test_euro_thousands_comma() {
        assert_eq!(parse("€1,500"), 1500.0);
    }

    #[test]
    fn test_garbage_input() {
        assert_eq!(parse("garbage"), 0.0);
    }

    #[test]
    fn test_empty_and_missing_input() {
        assert_eq!(parse(""), 0.0);
        assert_eq!(parse("   "), 0.0);
        assert_eq!(parse_opt(None), 0.0);
        assert_eq!(parse_opt(Some("$5")), 5.0);
    }

    #[test]
    fn test_surrounding_page_noise() {
        assert_eq!(parse("Price: $49.95 USD"), 49.95);
        assert_eq!(parse("Now only £9.50!"), 9.5);
    }

    #[test]
    fn test_price_range_takes_first_value() {
        assert_eq!(parse("29.99 - 49.99"), 29.99);
    }

    #[test]
    fn test_integer_price() {
        assert_eq!(parse("¥1200"), 1200.0);
    }

    #[test]
    fn test_thousands_comma_without_decimals() {
        assert_eq!(parse("$12,345"), 12345.0);
    }
}

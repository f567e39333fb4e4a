/// Characters dropped before a cell value is tested as a number.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Format a float with two decimals and thousands separators: 1,234.56
pub fn amount(val: f64) -> String {
    let negative = val < 0.0;
    // Ties round away from zero: 0.125 -> 0.13
    let scaled = (val.abs() * 100.0).round();
    let abs = if scaled.is_finite() { scaled / 100.0 } else { val.abs() };
    let fixed = format!("{:.2}", abs);
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let with_commas = group_digits(int_part);

    // "-0.00" would read as a loss
    if negative && with_commas.chars().chain(dec_part.chars()).any(|c| c != '0' && c != ',') {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// Whole number with thousands separators: 10,000
pub fn thousands(val: u64) -> String {
    group_digits(&val.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// Parse a cell value as a number once commas and currency symbols are gone.
/// Returns `None` for labels and for anything that is not finite.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    let val: f64 = cleaned.parse().ok()?;
    val.is_finite().then_some(val)
}

/// Display form of a report cell: numbers get two decimals and separators,
/// everything else passes through untouched.
pub fn format_cell(raw: &str) -> String {
    match parse_amount(raw) {
        Some(val) => amount(val),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_formatting() {
        assert_eq!(amount(1234.56), "1,234.56");
        assert_eq!(amount(-500.00), "-500.00");
        assert_eq!(amount(0.0), "0.00");
        assert_eq!(amount(1000000.99), "1,000,000.99");
        assert_eq!(amount(42.10), "42.10");
        assert_eq!(amount(-0.001), "0.00");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_cell("0.125"), "0.13");
        assert_eq!(format_cell("-0.125"), "-0.13");
        assert_eq!(format_cell("$1,234.375"), "1,234.38");
        assert_eq!(amount(17.125), "17.13");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(10000), "10,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_currency_strings_are_numeric() {
        assert_eq!(format_cell("$1,000,000"), "1,000,000.00");
        assert_eq!(format_cell("$10,000"), "10,000.00");
        assert_eq!(format_cell("1000"), "1,000.00");
        assert_eq!(format_cell("$0"), "0.00");
        assert_eq!(format_cell("-$2,500"), "-2,500.00");
        assert_eq!(format_cell("€12.5"), "12.50");
    }

    #[test]
    fn test_digit_strings_get_two_decimals() {
        for raw in ["7", "$7", "70", "$700", "7,000", "$7,000,000", "123456789"] {
            let out = format_cell(raw);
            let (_, decimals) = out.split_once('.').unwrap();
            assert_eq!(decimals.len(), 2, "{raw} -> {out}");
        }
    }

    #[test]
    fn test_labels_pass_through() {
        for raw in ["Cash", "Total Assets", "Test Account 12", "", "  ", "N/A", "inf", "NaN"] {
            assert_eq!(format_cell(raw), raw);
        }
    }

    #[test]
    fn test_formatting_is_idempotent() {
        for raw in ["$1,000,000", "42", "-17.125", "0.5", "$999.999", "Cash"] {
            let once = format_cell(raw);
            assert_eq!(format_cell(&once), once, "{raw}");
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.50"), Some(1234.5));
        assert_eq!(parse_amount(" 12 "), Some(12.0));
        assert_eq!(parse_amount("Assets"), None);
        assert_eq!(parse_amount("infinity"), None);
    }
}

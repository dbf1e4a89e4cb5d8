//! Regional number conventions
//!
//! Snapshot exports and the comparison export both depend on regional
//! settings: which character separates decimals, whether thousands are
//! grouped, and which character separates fields. A [`LocaleProfile`]
//! captures those choices so the loader and exporter never hardcode them.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Candidate field separators tried when sniffing, in tie-break order.
const SNIFF_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleProfile {
    /// Decimal separator used by input snapshots
    pub decimal_separator: char,
    /// Thousands separator accepted (and stripped) in input numbers
    pub thousands_separator: Option<char>,
    /// Input field separator; `None` sniffs it from the header line
    pub field_separator: Option<u8>,
    /// Field separator for exported comparisons
    pub export_separator: u8,
    /// Decimal separator for exported comparisons
    pub export_decimal_separator: char,
}

impl Default for LocaleProfile {
    /// DeGiro export conventions (Dutch locale)
    fn default() -> Self {
        Self {
            decimal_separator: ',',
            thousands_separator: None,
            field_separator: None,
            export_separator: b';',
            export_decimal_separator: ',',
        }
    }
}

impl LocaleProfile {
    /// Parse a numeric cell under this profile.
    ///
    /// Returns `None` for anything that is not a plain number in the
    /// profile's convention: empty cells, text, `NaN`, a foreign decimal
    /// separator, or more than one decimal separator.
    pub fn parse_decimal(&self, text: &str) -> Option<Decimal> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut cleaned = String::with_capacity(trimmed.len());
        let mut seen_decimal = false;
        let mut seen_digit = false;
        for (idx, ch) in trimmed.chars().enumerate() {
            match ch {
                '0'..='9' => {
                    seen_digit = true;
                    cleaned.push(ch);
                }
                '-' if idx == 0 => cleaned.push(ch),
                '+' if idx == 0 => {}
                c if c == self.decimal_separator => {
                    if seen_decimal {
                        return None;
                    }
                    seen_decimal = true;
                    cleaned.push('.');
                }
                c if Some(c) == self.thousands_separator && !seen_decimal => {}
                _ => return None,
            }
        }

        if !seen_digit {
            return None;
        }
        Decimal::from_str(&cleaned).ok()
    }

    /// Render a decimal for export, using the export decimal separator and
    /// no grouping.
    pub fn format_export(&self, value: Decimal) -> String {
        let plain = value.normalize().to_string();
        if self.export_decimal_separator == '.' {
            plain
        } else {
            plain.replace('.', &self.export_decimal_separator.to_string())
        }
    }

    /// Input field separator: configured one, or sniffed from `header_line`.
    pub fn resolve_field_separator(&self, header_line: &str) -> u8 {
        self.field_separator
            .unwrap_or_else(|| sniff_delimiter(header_line))
    }
}

/// Pick the field separator that occurs most often in `line`, ignoring
/// anything inside double quotes. Defaults to a comma.
pub fn sniff_delimiter(line: &str) -> u8 {
    let mut counts = [0usize; SNIFF_CANDIDATES.len()];
    let mut in_quotes = false;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(pos) = SNIFF_CANDIDATES.iter().position(|c| *c == byte) {
            counts[pos] += 1;
        }
    }

    let mut best = 0;
    for (pos, count) in counts.iter().enumerate() {
        if *count > counts[best] {
            best = pos;
        }
    }
    SNIFF_CANDIDATES[best]
}

/// Human-readable name for a separator byte
pub fn separator_name(sep: u8) -> String {
    match sep {
        b',' => "comma (,)".to_string(),
        b';' => "semicolon (;)".to_string(),
        b'\t' => "tab".to_string(),
        b'|' => "pipe (|)".to_string(),
        other => format!("'{}'", other as char),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_comma_decimal() {
        let profile = LocaleProfile::default();
        assert_eq!(profile.parse_decimal("1234,56"), Some(dec!(1234.56)));
        assert_eq!(profile.parse_decimal(" 10,5 "), Some(dec!(10.5)));
        assert_eq!(profile.parse_decimal("-200"), Some(dec!(-200)));
        assert_eq!(profile.parse_decimal("0"), Some(dec!(0)));
    }

    #[test]
    fn test_parse_rejects_foreign_formats() {
        let profile = LocaleProfile::default();
        assert_eq!(profile.parse_decimal(""), None);
        assert_eq!(profile.parse_decimal("   "), None);
        assert_eq!(profile.parse_decimal("12.50"), None);
        assert_eq!(profile.parse_decimal("1,2,3"), None);
        assert_eq!(profile.parse_decimal("NaN"), None);
        assert_eq!(profile.parse_decimal("EUR 10"), None);
        assert_eq!(profile.parse_decimal("-"), None);
        assert_eq!(profile.parse_decimal(","), None);
    }

    #[test]
    fn test_parse_with_thousands_separator() {
        let profile = LocaleProfile {
            thousands_separator: Some('.'),
            ..LocaleProfile::default()
        };
        assert_eq!(profile.parse_decimal("1.234,56"), Some(dec!(1234.56)));
        assert_eq!(profile.parse_decimal("1.000.000"), Some(dec!(1000000)));
        // grouping after the decimal separator is not a number
        assert_eq!(profile.parse_decimal("1,234.5"), None);
    }

    #[test]
    fn test_parse_dot_decimal_profile() {
        let profile = LocaleProfile {
            decimal_separator: '.',
            thousands_separator: Some(','),
            ..LocaleProfile::default()
        };
        assert_eq!(profile.parse_decimal("1,234.56"), Some(dec!(1234.56)));
    }

    #[test]
    fn test_format_export_uses_comma() {
        let profile = LocaleProfile::default();
        assert_eq!(profile.format_export(dec!(1234.50)), "1234,5");
        assert_eq!(profile.format_export(dec!(-200)), "-200");
        assert_eq!(profile.format_export(dec!(0)), "0");
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("Product,Ticker,Waarde in EUR"), b',');
        assert_eq!(sniff_delimiter("Product;Waarde in EUR;Slotkoers"), b';');
        assert_eq!(sniff_delimiter("Product\tWaarde in EUR\tSlotkoers"), b'\t');
        // separators inside quotes do not count
        assert_eq!(sniff_delimiter("\"a;b;c\",\"d\",\"e\""), b',');
        assert_eq!(sniff_delimiter("Product"), b',');
    }
}

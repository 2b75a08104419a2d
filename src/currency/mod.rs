//! Display formatting for money amounts. Output only; nothing is parsed back.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SYMBOL: &str = "₦";

/// Renders amounts with a currency symbol and grouped thousands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoneyFormatter {
    pub symbol: String,
    pub grouping_separator: char,
    pub decimal_separator: char,
    /// Fraction digits; `0` renders whole numbers.
    pub precision: u8,
}

impl Default for MoneyFormatter {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.into(),
            grouping_separator: ',',
            decimal_separator: '.',
            precision: 0,
        }
    }
}

impl MoneyFormatter {
    pub fn with_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    /// `-₦1,234` style output; the sign precedes the symbol.
    pub fn format(&self, amount: f64) -> String {
        let body = self.format_number(amount.abs());
        if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
            format!("-{}{}", self.symbol, body)
        } else {
            format!("{}{}", self.symbol, body)
        }
    }

    /// Formats the optional per-person fee, rendering a dash when unset.
    pub fn format_optional(&self, amount: Option<f64>) -> String {
        match amount {
            Some(value) => self.format(value),
            None => "—".into(),
        }
    }

    pub fn format_number(&self, value: f64) -> String {
        let rendered = format!("{:.*}", self.precision as usize, value);
        let (int_part, fraction) = match rendered.split_once('.') {
            Some((int_part, fraction)) => (int_part, Some(fraction)),
            None => (rendered.as_str(), None),
        };
        let grouped = match int_part.strip_prefix('-') {
            Some(digits) => format!("-{}", group_digits(digits, self.grouping_separator)),
            None => group_digits(int_part, self.grouping_separator),
        };
        match fraction {
            Some(fraction) => format!("{}{}{}", grouped, self.decimal_separator, fraction),
            None => grouped,
        }
    }
}

/// Inserts `separator` between every group of three digits from the right.
pub fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_digits("1234567", ','), "1,234,567");
        assert_eq!(group_digits("123", ','), "123");
        assert_eq!(group_digits("1000", '.'), "1.000");
        assert_eq!(group_digits("", ','), "");
    }

    #[test]
    fn formats_with_symbol_and_sign() {
        let formatter = MoneyFormatter::default();
        assert_eq!(formatter.format(2000.0), "₦2,000");
        assert_eq!(formatter.format(-1234567.0), "-₦1,234,567");
        assert_eq!(formatter.format(0.0), "₦0");
        assert_eq!(formatter.format(-0.2), "₦0");
    }

    #[test]
    fn honours_precision_and_separators() {
        let formatter = MoneyFormatter {
            symbol: "€".into(),
            grouping_separator: '.',
            decimal_separator: ',',
            precision: 2,
        };
        assert_eq!(formatter.format(1234.5), "€1.234,50");
        assert_eq!(MoneyFormatter::with_symbol("$").format_optional(None), "—");
    }
}

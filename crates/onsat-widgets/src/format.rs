//! Host number formatting for displayed counter values.
//!
//! Matches what `Number.prototype.toLocaleString()` prints for the page's
//! host format: grouped integer digits and at most three fraction digits
//! with trailing zeros removed.

use serde::{Deserialize, Serialize};

/// Separators and precision used to print numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Inserted between groups of three integer digits
    pub group_separator: char,
    /// Between integer and fraction digits
    pub decimal_separator: char,
    /// Fraction digits kept after rounding (capped at 9)
    pub max_fraction_digits: u8,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::EN_US
    }
}

impl NumberFormat {
    /// `en-US`: `1,234.5`
    pub const EN_US: Self = Self {
        group_separator: ',',
        decimal_separator: '.',
        max_fraction_digits: 3,
    };

    /// Format `value`.
    ///
    /// ```
    /// use onsat_widgets::NumberFormat;
    ///
    /// let fmt = NumberFormat::EN_US;
    /// assert_eq!(fmt.format(1_000_000.0), "1,000,000");
    /// assert_eq!(fmt.format(99.9), "99.9");
    /// assert_eq!(fmt.format(1234.5678), "1,234.568");
    /// ```
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        let digits = u32::from(self.max_fraction_digits.min(9));
        let scale = 10u64.pow(digits);
        // f64::round rounds half away from zero
        let scaled = (value.abs() * scale as f64).round();

        let (integer, fraction) = if scaled < 1.0e18 {
            let scaled = scaled as u64;
            ((scaled / scale).to_string(), scaled % scale)
        } else {
            (format!("{:.0}", value.abs().trunc()), 0)
        };

        let mut out = String::with_capacity(integer.len() + integer.len() / 3 + 8);
        if value < 0.0 && (integer != "0" || fraction != 0) {
            out.push('-');
        }
        push_grouped(&mut out, &integer, self.group_separator);

        if fraction > 0 {
            let padded = format!("{fraction:0width$}", width = digits as usize);
            out.push(self.decimal_separator);
            out.push_str(padded.trim_end_matches('0'));
        }
        out
    }
}

fn push_grouped(out: &mut String, digits: &str, separator: char) {
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
}

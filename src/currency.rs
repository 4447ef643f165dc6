//! Formats amounts of money for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Format `number` as dollars with two decimal places and thousands
/// separators, e.g. `$1,234.50` or `-$3.20`.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let formatted_string = match (positive_fmt, negative_fmt) {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if number == 0.0 => return "$0.00".to_owned(),
        (_, Some(negative_fmt)) if number < 0.0 => negative_fmt.fmt_string(number.abs()),
        (Some(positive_fmt), _) if number > 0.0 => positive_fmt.fmt_string(number),
        _ if number < 0.0 => format!("-${:.2}", number.abs()),
        _ => format!("${number:.2}"),
    };

    pad_cents(formatted_string)
}

/// numfmt omits trailing zeros, so "12.30" is rendered as "12.3" and "5.00" as
/// "5". Pad the string back out to two decimal places.
fn pad_cents(formatted_string: String) -> String {
    match formatted_string.rfind('.') {
        Some(dot) => {
            let decimals = formatted_string.len() - dot - 1;
            format!("{formatted_string}{}", "0".repeat(2usize.saturating_sub(decimals)))
        }
        None => format!("{formatted_string}.00"),
    }
}

#[cfg(test)]
mod tests {
    use super::format_currency;

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn formats_cents() {
        assert_eq!(format_currency(4.5), "$4.50");
        assert_eq!(format_currency(12.34), "$12.34");
    }

    #[test]
    fn formats_whole_dollars() {
        assert_eq!(format_currency(5.0), "$5.00");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_currency(-3.2), "-$3.20");
    }
}

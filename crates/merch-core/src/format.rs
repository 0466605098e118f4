/// Rouble suffix appended to formatted prices.
pub const RUB_SUFFIX: &str = " р.";

const GROUP_SEPARATOR: char = '\u{a0}';

/// Formats `amount` the way the `ru-RU` locale prints numbers: groups of three
/// separated by a no-break space (only from five integer digits up), a comma
/// decimal separator and at most three fraction digits.
///
/// Non-finite values format as an empty string.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rub(amount: f64) -> String {
    if !amount.is_finite() {
        return String::new();
    }

    let scaled = (amount.abs() * 1000.0).round() as u64;
    let integer = scaled / 1000;
    let fraction = scaled % 1000;

    let mut out = String::new();
    if amount.is_sign_negative() && scaled != 0 {
        out.push('-');
    }

    let digits = integer.to_string();
    if digits.len() >= 5 {
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(GROUP_SEPARATOR);
            }
            out.push(ch);
        }
    } else {
        out.push_str(&digits);
    }

    if fraction != 0 {
        let fraction = format!("{fraction:03}");
        out.push(',');
        out.push_str(fraction.trim_end_matches('0'));
    }

    out
}

/// Price with currency suffix, or `None` when the price is absent or zero.
#[must_use]
pub fn price_label(amount: Option<f64>) -> Option<String> {
    amount
        .filter(|v| *v != 0.0)
        .map(|v| format!("{}{RUB_SUFFIX}", format_rub(v)))
}

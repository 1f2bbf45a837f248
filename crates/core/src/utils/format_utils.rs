use rust_decimal::Decimal;

/// Formats a decimal with a fixed number of decimal places and comma thousands
/// separators, e.g. `1234.5` at 4 places -> `"1,234.5000"`.
pub fn format_grouped(value: Decimal, decimal_places: u32) -> String {
    let fixed = format!("{:.*}", decimal_places as usize, value.round_dp(decimal_places));
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    match fraction {
        Some(f) => format!("{}{}.{}", sign, group_digits(integer), f),
        None => format!("{}{}", sign, group_digits(integer)),
    }
}

/// Formats a count with comma thousands separators.
pub fn format_count(count: i64) -> String {
    let digits = count.unsigned_abs().to_string();
    if count < 0 {
        format!("-{}", group_digits(&digits))
    } else {
        group_digits(&digits)
    }
}

fn group_digits(integer: &str) -> String {
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

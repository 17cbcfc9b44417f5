/// Magnitude-suffixed rendering: `999`, `1.0K`, `1.5M`.
///
/// Digits past the first decimal are truncated, never rounded, so
/// `1999` renders as `1.9K` and `999_999` as `999.9K`.
pub fn compact(n: u64) -> String {
    if n >= 1_000_000 {
        let tenths = n / 100_000;
        format!("{}.{}M", tenths / 10, tenths % 10)
    } else if n >= 1_000 {
        let tenths = n / 100;
        format!("{}.{}K", tenths / 10, tenths % 10)
    } else {
        n.to_string()
    }
}

/// Comma-grouped integer: `15420` -> `15,420`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn percent(value: u8) -> String {
    format!("{value}%")
}

//! Display formatting for prices and market figures (USD, en-US grouping).

use rust_decimal::{Decimal, RoundingStrategy};

const TRILLION: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0); // 1e12
const BILLION: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);
const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// `$1,234.57`; values below one dollar keep up to six decimals (`$0.000123`).
pub fn format_currency(value: Decimal) -> String {
    let max_dp = if value.abs() < Decimal::ONE { 6 } else { 2 };
    let body = trimmed(value.abs(), max_dp, 2);
    if value.is_sign_negative() && !value.is_zero() {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// `1.50 T`, `2.00 B`, `3.25 M`, otherwise a grouped number; `N/A` when absent.
pub fn format_large_number(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return "N/A".into();
    };

    if value >= TRILLION {
        format!("{} T", fixed(value / TRILLION, 2))
    } else if value >= BILLION {
        format!("{} B", fixed(value / BILLION, 2))
    } else if value >= MILLION {
        format!("{} M", fixed(value / MILLION, 2))
    } else {
        let body = trimmed(value.abs(), 3, 0);
        if value.is_sign_negative() && !value.is_zero() {
            format!("-{body}")
        } else {
            body
        }
    }
}

/// Signed percentage with two decimals, `N/A` when absent.
pub fn format_change(value: Option<Decimal>) -> String {
    match value {
        None => "N/A".into(),
        Some(v) if v.is_sign_negative() && !v.is_zero() => format!("-{}%", fixed(v.abs(), 2)),
        Some(v) => format!("+{}%", fixed(v, 2)),
    }
}

/// Round half away from zero to exactly `dp` decimals, no grouping.
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Round to at most `max_dp` decimals, keep at least `min_dp`, and group
/// the integer part with commas. `value` must be non-negative.
fn trimmed(value: Decimal, max_dp: u32, min_dp: usize) -> String {
    let rounded = value
        .round_dp_with_strategy(max_dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string();

    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (rounded, String::new()),
    };

    let mut frac = frac_part;
    while frac.len() < min_dp {
        frac.push('0');
    }

    let grouped = group_thousands(&int_part);
    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac}")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

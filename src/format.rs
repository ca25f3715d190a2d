//! es-AR display helpers for report output.

pub const NO_DATA: &str = "S/D";
const MULTIPLIER_CAP: f64 = 1000.0;

/// `$ 1.234.567`, rounded to whole pesos.
pub fn format_ars(value: Option<f64>) -> String {
    format_currency(value, "$")
}

/// `US$ 1.234`, rounded to whole dollars.
pub fn format_usd(value: Option<f64>) -> String {
    format_currency(value, "US$")
}

/// Formats a value already expressed in percent, e.g. `12.5%`.
pub fn format_percentage(value: Option<f64>, decimals: usize) -> String {
    match value.filter(|value| value.is_finite()) {
        Some(value) => format!("{value:.decimals$}%"),
        None => NO_DATA.to_string(),
    }
}

pub fn format_multiplier(value: Option<f64>) -> String {
    match value.filter(|value| value.is_finite()) {
        Some(value) if value > MULTIPLIER_CAP => format!("> {MULTIPLIER_CAP:.0}x"),
        Some(value) => format!("{value:.1}x"),
        None => NO_DATA.to_string(),
    }
}

fn format_currency(value: Option<f64>, symbol: &str) -> String {
    match value.filter(|value| value.is_finite()) {
        Some(value) => {
            let rounded = value.round();
            let sign = if rounded < 0.0 { "-" } else { "" };
            format!("{sign}{symbol} {}", group_thousands(rounded.abs()))
        }
        None => NO_DATA.to_string(),
    }
}

fn group_thousands(whole: f64) -> String {
    let digits = format!("{whole:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

/// Canonical column key: BOM stripped, lowercased, whitespace runs as `_`.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Parse a spreadsheet money/quantity cell. Placeholders and garbage are missing.
pub(crate) fn clean_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.ends_with('-') {
        return None;
    }

    let unsigned = trimmed.replace('$', "");
    let canonical = match (unsigned.rfind(','), unsigned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => unsigned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => unsigned.replace(',', ""),
        (Some(_), None) => unsigned.replace(',', "."),
        (None, Some(_)) if unsigned.matches('.').count() > 1 => unsigned.replace('.', ""),
        _ => unsigned,
    };

    let digits: String = canonical
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    if digits.is_empty() || digits == "-" {
        return None;
    }

    digits.parse::<f64>().ok().filter(|value| value.is_finite())
}

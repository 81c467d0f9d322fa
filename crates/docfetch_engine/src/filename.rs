use chrono::NaiveDate;

/// Windows-safe, deterministic filename: `{YYYYMMDD}-{label}.pdf`.
///
/// The name depends only on the date and label, so it doubles as the on-disk dedup key.
pub fn document_filename(date: NaiveDate, label: &str) -> String {
    format!("{}-{}.pdf", date.format("%Y%m%d"), sanitize_label(label))
}

fn sanitize_label(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.trim().chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }
    let cleaned = compacted.trim_matches(&['_', ' ', '.'][..]);
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.chars().take(80).collect()
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn name_is_date_then_label() {
        assert_eq!(document_filename(date(2024, 3), "UN-R155"), "20240301-UN-R155.pdf");
    }

    #[test]
    fn label_separators_are_replaced() {
        assert_eq!(
            document_filename(date(2021, 1), "UN/R155: cyber?"),
            "20210101-UN_R155_ cyber.pdf"
        );
    }

    #[test]
    fn blank_label_falls_back() {
        assert_eq!(document_filename(date(2021, 1), " .. "), "20210101-document.pdf");
    }
}

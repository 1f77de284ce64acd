use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Splits raw input into names. Commas and newlines separate entries; blank
/// entries are dropped and duplicates are kept.
pub fn parse_names(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Cuts `label` to at most `max_width` terminal columns, ending in `…` when
/// something was dropped.
pub fn truncate_to_width(label: &str, max_width: usize) -> String {
    if label.width() <= max_width {
        return label.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

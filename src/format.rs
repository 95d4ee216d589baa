use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const GIB: f64 = (1u64 << 30) as f64;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// `"<used> / <total> GB"` with one decimal, values already in GiB.
pub fn memory_label(used_gib: f64, total_gib: f64) -> String {
    format!("{used_gib:.1} / {total_gib:.1} GB")
}

pub fn format_uptime(seconds: i64) -> String {
    format!("Uptime: {seconds}s")
}

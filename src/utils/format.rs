use unicode_width::UnicodeWidthChar;

/// Format a tracked value as a decimal string, trimming trailing zeros
pub fn format_value(value: f64) -> String {
    if value == value.floor() {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Truncate a habit name to a display width, appending '…' when cut.
/// Width-aware so emoji icons don't blow up column alignment.
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in name.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width.saturating_sub(1) {
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_trim_trailing_zeros() {
        assert_eq!(format_value(8.0), "8");
        assert_eq!(format_value(2.5), "2.5");
    }

    #[test]
    fn progress_bar_handles_empty_total() {
        assert_eq!(progress_bar(3, 0, 4), "░░░░");
        assert_eq!(progress_bar(2, 4, 4), "██░░");
        assert_eq!(progress_bar(9, 4, 4), "████");
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_name("Read", 10), "Read");
        assert_eq!(truncate_name("Morning meditation", 8), "Morning…");
    }
}

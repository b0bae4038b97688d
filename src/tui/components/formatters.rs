// Text fitting
//
// Widths are terminal columns (unicode display width), not bytes.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to `width` columns, ending with `…` when shortened
pub fn truncate_end(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    // Leave room for the ellipsis
    let target = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > target {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Keep the last `width` columns of `text`, starting with `…` when shortened
///
/// Numbers and expressions grow on the right, so the newest part stays visible.
pub fn truncate_start(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let target = width - 1;
    let mut used = 0;
    let mut kept: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > target {
            break;
        }
        used += w;
        kept.push(c);
    }
    let mut out = String::from('…');
    out.extend(kept.iter().rev());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_end() {
        assert_eq!(truncate_end("12 + 3 = 15", 20), "12 + 3 = 15");
        assert_eq!(truncate_end("12 + 3 = 15", 6), "12 + …");
        assert_eq!(truncate_end("abc", 0), "");
    }

    #[test]
    fn test_truncate_start_keeps_tail() {
        assert_eq!(truncate_start("123456789", 9), "123456789");
        assert_eq!(truncate_start("123456789", 5), "…6789");
        assert_eq!(truncate_start("8 × 2", 4), "…× 2");
    }
}

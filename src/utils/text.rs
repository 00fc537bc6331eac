use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to a display width, appending "..." when cut.
pub fn truncate_text_unicode(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    const ELLIPSIS: &str = "...";
    let ellipsis_width = ELLIPSIS.width();

    if max_width <= ellipsis_width {
        return ELLIPSIS[..max_width].to_string();
    }

    let target_width = max_width - ellipsis_width;
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }

    result.push_str(ELLIPSIS);
    result
}

pub fn pad_to_width(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - text_width))
    }
}

/// One candidate row: code column padded, then the name cut to fit.
pub fn candidate_line(code: &str, name: &str, code_width: usize, max_width: usize) -> String {
    let code = pad_to_width(code, code_width);
    let remaining = max_width.saturating_sub(code.width() + 2);
    format!("{}  {}", code, truncate_text_unicode(name, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_unicode() {
        assert_eq!(truncate_text_unicode("Asthma", 10), "Asthma");
        assert_eq!(truncate_text_unicode("Allergic asthma", 8), "Aller...");
        assert_eq!(truncate_text_unicode("", 5), "");
        assert_eq!(truncate_text_unicode("Asthma", 2), "..");
    }

    #[test]
    fn test_truncate_wide_characters() {
        // Each of these takes two columns
        assert_eq!(truncate_text_unicode("気管支喘息", 7), "気管...");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("J45", 5), "J45  ");
        assert_eq!(pad_to_width("J45.901", 5), "J45.901");
    }

    #[test]
    fn test_candidate_line() {
        assert_eq!(candidate_line("J45", "Asthma", 5, 40), "J45    Asthma");
        assert_eq!(candidate_line("J45", "Allergic asthma", 5, 15), "J45    Aller...");
    }
}

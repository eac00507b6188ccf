use std::borrow::Cow;

use chrono::{DateTime, Local, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns, Unicode-aware (CJK and
/// emoji occupy two columns, combining marks zero).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns, appending
/// `...` when text was cut. Returns `Cow::Borrowed` when the string already
/// fits, so render paths pay nothing for short titles.
///
/// Widths of 3 or less get as many whole characters as fit, without the
/// ellipsis; there is no room for "character + ellipsis" at that size.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut used = 0;
        for (idx, c) in s.char_indices() {
            let w = UnicodeWidthChar::width(c).unwrap_or(0);
            if used + w > max_width {
                break;
            }
            used += w;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }

    let keep_width = max_width - ELLIPSIS_WIDTH;
    let mut used = 0;
    let mut cut_at = None;
    let mut overflowed = false;

    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        // First index past the keep width is where the ellipsis goes.
        if cut_at.is_none() && used + w > keep_width {
            cut_at = Some(idx);
        }
        if used + w > max_width {
            overflowed = true;
            break;
        }
        used += w;
    }

    if overflowed {
        let cut = cut_at.unwrap_or(s.len());
        Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
    } else {
        Cow::Borrowed(s)
    }
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Story titles, author names, and bodies are user-authored (or imported
/// from an untrusted snapshot) and get rendered straight into the terminal,
/// so CSI/OSC sequences and C0 controls must not survive. Tab, newline, and
/// carriage return are preserved. Clean input returns borrowed.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    let needs_strip = bytes
        .iter()
        .any(|&b| b == 0x1b || b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d));
    if !needs_strip {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b == 0x1b {
            if i + 1 < len && bytes[i + 1] == b'[' {
                // CSI: skip parameter bytes until the final byte 0x40-0x7e
                i += 2;
                while i < len {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            } else if i + 1 < len && bytes[i + 1] == b']' {
                // OSC: skip until BEL or ST
                i += 2;
                while i < len {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && i + 1 < len && bytes[i + 1] == b'\\' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            } else {
                i += 1; // bare ESC
            }
        } else if b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d) {
            i += 1;
        } else {
            let start = i;
            i += 1;
            while i < len {
                let nb = bytes[i];
                if nb == 0x1b || nb == 0x7f || (nb < 0x20 && nb != 0x09 && nb != 0x0a && nb != 0x0d)
                {
                    break;
                }
                i += 1;
            }
            // Breaks only happen on ASCII control bytes, which never appear
            // mid-codepoint in valid UTF-8.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

/// Number of characters a derived excerpt keeps before the trailing `...`.
pub const EXCERPT_CHARS: usize = 150;

/// Derive a story excerpt: the first [`EXCERPT_CHARS`] characters of the
/// body with `...` appended. The ellipsis is unconditional, matching how
/// published excerpts have always looked on the platform.
pub fn excerpt_of(body: &str) -> String {
    let mut out: String = body.chars().take(EXCERPT_CHARS).collect();
    out.push_str("...");
    out
}

/// Derive a display read-time from a story body: word count divided by a
/// 200 wpm reading pace, rounded up, never below one minute.
pub fn read_time_label(body: &str) -> String {
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(200).max(1);
    format!("{} min read", minutes)
}

/// Today's date in the display format stories carry, e.g. `23 August 2026`.
pub fn publish_date_label() -> String {
    Local::now().format("%-d %B %Y").to_string()
}

/// Compact relative-time label for history rows: "just now", "12m ago",
/// "3h ago", "5d ago", then the absolute date.
pub fn relative_time_label(viewed_at: DateTime<Utc>) -> String {
    let elapsed = Utc::now().signed_duration_since(viewed_at);
    let secs = elapsed.num_seconds();

    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else if secs < 7 * 86_400 {
        format!("{}d ago", secs / 86_400)
    } else {
        viewed_at.format("%-d %b %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ascii_truncation() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Short", 10), "Short");
    }

    #[test]
    fn test_cjk_truncation() {
        // CJK characters are two columns wide
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
        assert_eq!(truncate_to_width("你好", 10), "你好");
        assert_eq!(truncate_to_width("你好世界", 5), "你...");
    }

    #[test]
    fn test_emoji_truncation() {
        assert_eq!(truncate_to_width("Hello 🎉 World", 12), "Hello 🎉 ...");
        assert_eq!(truncate_to_width("Hello 🎉 World", 11), "Hello 🎉...");
    }

    #[test]
    fn test_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("你好", 1), "");
        assert_eq!(truncate_to_width("Test", 2), "Te");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("Hi", 3), "Hi");
    }

    #[test]
    fn test_exact_fit_is_borrowed() {
        let title = "12345";
        assert!(matches!(truncate_to_width(title, 5), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "The Quiet Craft of Slow Reading";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_preserves_paragraph_breaks() {
        let input = "First paragraph.\n\nSecond paragraph.\twith a tab\r\n";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_removes_c0_controls() {
        let input = "he\x00ll\x07o\x08 w\x0bor\x0cld\x01!";
        assert_eq!(strip_control_chars(input), "hello world!");
    }

    #[test]
    fn test_strip_ansi_sequences_in_title() {
        let input = "\x1b[31mLoud\x1b[0m Title";
        assert_eq!(strip_control_chars(input), "Loud Title");
    }

    #[test]
    fn test_strip_osc_sequences() {
        assert_eq!(
            strip_control_chars("\x1b]0;window title\x07safe"),
            "safe"
        );
        assert_eq!(
            strip_control_chars("\x1b]0;window title\x1b\\safe"),
            "safe"
        );
    }

    #[test]
    fn test_strip_bare_esc_and_del() {
        assert_eq!(strip_control_chars("a\x1bb\x7fc"), "abc");
    }

    #[test]
    fn test_excerpt_short_body_keeps_everything() {
        assert_eq!(excerpt_of("A short thought."), "A short thought....");
    }

    #[test]
    fn test_excerpt_cuts_at_150_chars() {
        let body = "x".repeat(400);
        let excerpt = excerpt_of(&body);
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let body = "é".repeat(200);
        let excerpt = excerpt_of(&body);
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 3);
    }

    #[test]
    fn test_read_time_400_words_is_two_minutes() {
        let body = vec!["word"; 400].join(" ");
        assert_eq!(read_time_label(&body), "2 min read");
    }

    #[test]
    fn test_read_time_199_words_is_one_minute() {
        let body = vec!["word"; 199].join(" ");
        assert_eq!(read_time_label(&body), "1 min read");
    }

    #[test]
    fn test_read_time_floor_is_one_minute() {
        assert_eq!(read_time_label("tiny"), "1 min read");
    }

    #[test]
    fn test_read_time_ignores_whitespace_runs() {
        let body = "one  two\n\nthree\t four";
        assert_eq!(read_time_label(body), "1 min read");
    }

    #[test]
    fn test_read_time_401_words_rounds_up() {
        let body = vec!["word"; 401].join(" ");
        assert_eq!(read_time_label(&body), "3 min read");
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(relative_time_label(now - Duration::seconds(10)), "just now");
        assert_eq!(relative_time_label(now - Duration::minutes(12)), "12m ago");
        assert_eq!(relative_time_label(now - Duration::hours(3)), "3h ago");
        assert_eq!(relative_time_label(now - Duration::days(5)), "5d ago");
    }

    #[test]
    fn test_publish_date_label_long_form() {
        let label = publish_date_label();
        // "%-d %B %Y" always yields "<day> <Month> <year>"
        let parts: Vec<&str> = label.split(' ').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].parse::<u32>().is_ok());
        assert!(parts[2].parse::<i32>().is_ok());
    }
}

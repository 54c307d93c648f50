//! Grapheme width and visible width helpers.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 3;

pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if grapheme == "\t" {
        return TAB_WIDTH;
    }

    if emoji_get(grapheme).is_some() {
        return 2;
    }

    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// Display width of `input`, ignoring SGR/CSI escape sequences.
pub fn visible_width(input: &str) -> usize {
    strip_ansi(input).graphemes(true).map(grapheme_width).sum()
}

/// Removes CSI escape sequences (`ESC [ ... final`).
pub fn strip_ansi(input: &str) -> String {
    let mut clean = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if ('\x40'..='\x7e').contains(&next) {
                    break;
                }
            }
            continue;
        }
        clean.push(ch);
    }
    clean
}

/// Pads `line` with spaces up to `width` columns.
pub fn pad_to_width(line: &str, width: usize) -> String {
    let padding = width.saturating_sub(visible_width(line));
    format!("{line}{}", " ".repeat(padding))
}

/// Right-aligns `line` inside `width` columns.
pub fn align_right(line: &str, width: usize) -> String {
    let padding = width.saturating_sub(visible_width(line));
    format!("{}{line}", " ".repeat(padding))
}

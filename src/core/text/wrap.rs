//! Word wrapping by display column.

use unicode_segmentation::UnicodeSegmentation;

use super::width::{grapheme_width, visible_width};

/// Wraps plain `text` to `width` columns.
///
/// Explicit newlines are kept, runs of whitespace at a break are dropped, and
/// words wider than `width` are split at grapheme boundaries. Always returns at
/// least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    for input_line in text.replace('\t', "   ").split('\n') {
        wrap_line(input_line, width, &mut lines);
    }
    lines
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;
    let mut broke = false;

    for word in line.split_word_bounds() {
        let word_width = visible_width(word);
        let is_whitespace = word.trim().is_empty();

        // Whitespace that lands at the start of a continuation line is dropped.
        if is_whitespace && broke && current.is_empty() {
            continue;
        }

        if current_width + word_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            out.push(current.trim_end().to_string());
            current.clear();
            current_width = 0;
        }
        broke = true;

        if is_whitespace {
            continue;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for grapheme in word.graphemes(true) {
            let grapheme_cols = grapheme_width(grapheme);
            if current_width + grapheme_cols > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push_str(grapheme);
            current_width += grapheme_cols;
        }
    }

    out.push(current.trim_end().to_string());
}

use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Approximate text metrics for a monospace font.
pub struct TextMetrics {
    /// Advance of one narrow cell, as a fraction of the font size
    pub char_width_em: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self { char_width_em: 0.6 }
    }
}

impl TextMetrics {
    fn cell(&self, font_size: f64) -> f64 {
        self.char_width_em * font_size
    }

    pub fn text_width(&self, text: &str, font_size: f64) -> f64 {
        UnicodeWidthStr::width(text) as f64 * self.cell(font_size)
    }

    /// Shorten `text` with a trailing ellipsis so it fits in `max_width`.
    pub fn fit<'a>(&self, text: &'a str, font_size: f64, max_width: f64) -> Cow<'a, str> {
        if self.text_width(text, font_size) <= max_width {
            return Cow::Borrowed(text);
        }

        // One cell is reserved for the ellipsis.
        let budget = (max_width / self.cell(font_size)).floor() as usize;
        if budget == 0 {
            return Cow::Owned(String::new());
        }
        let mut used = 1;
        let mut out = String::new();
        for c in text.chars() {
            let w = UnicodeWidthChar::width(c).unwrap_or(0);
            if used + w > budget {
                break;
            }
            used += w;
            out.push(c);
        }
        out.push(ELLIPSIS);
        Cow::Owned(out)
    }
}

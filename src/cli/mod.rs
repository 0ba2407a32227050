//! Interactive front end
//!
//! Everything user-facing lives here: the clap definition, the line
//! tokenizer with lenient/strict field parsing, the command loop, and
//! the table renderer. The engine below this layer never prints.

pub mod definition;
pub mod input;
pub mod repl;
pub mod table;

pub use definition::{Cli, Commands};
pub use input::ParseMode;
pub use repl::{Repl, ReplAction};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut a string to at most `max` display columns, appending `...` when
/// something was dropped. Safe on multibyte and wide characters.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let (keep, ellipsis) = if max <= 3 {
        (max, false)
    } else {
        (max - 3, true)
    };
    let mut width = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > keep {
            break;
        }
        width += w;
        out.push(ch);
    }
    if ellipsis {
        out.push_str("...");
    }
    out
}

/// Pad with spaces to `width` display columns; wider strings pass
/// through unchanged
pub fn pad(s: &str, width: usize) -> String {
    let current = s.width();
    if current >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - current))
    }
}

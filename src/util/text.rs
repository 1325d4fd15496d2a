use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
///
/// Unicode-aware: CJK and emoji count as 2 columns, combining marks as 0.
///
/// # Examples
///
/// ```
/// use til::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("你好"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Byte index of the longest prefix of `s` that fits in `max_width` columns.
fn prefix_fitting(s: &str, max_width: usize) -> usize {
    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }
    end
}

/// Truncates a string to fit within `max_width` terminal columns, appending
/// `"..."` when text was cut.
///
/// Fact text, source URLs, and status messages all pass through here before
/// rendering, so widths are measured in columns rather than chars: a fact
/// written in CJK occupies twice the columns its char count suggests.
///
/// Returns `Cow::Borrowed` when the string already fits. Widths of 3 or
/// fewer columns leave no room for the ellipsis, so those return the bare
/// prefix that fits.
///
/// # Examples
///
/// ```
/// use til::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// assert_eq!(truncate_to_width("Test", 0), "");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    // Too narrow for "prefix..." to mean anything: return what fits, bare.
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(s[..prefix_fitting(s, max_width)].to_string());
    }

    let cut = prefix_fitting(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
}

/// Whether a byte must be removed before the text reaches the terminal.
///
/// Tab, LF and CR survive; every other C0 control and DEL does not. ESC is
/// handled separately since it may open a multi-byte escape sequence.
fn is_bare_control(b: u8) -> bool {
    b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d)
}

/// Strips terminal control characters and ANSI escape sequences.
///
/// Every fact on the board was typed by some other client, so its text and
/// source travel through here before rendering. A crafted fact must not be
/// able to recolor the screen, move the cursor, or retitle the window.
///
/// Removed: C0 controls other than tab/LF/CR, DEL, CSI sequences
/// (`\x1b[` through the final byte), OSC sequences (`\x1b]` through BEL or
/// `\x1b\\`), and bare ESC. Returns `Cow::Borrowed` for clean input, which
/// is the common case on the render path.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| b == 0x1b || is_bare_control(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b if bytes.get(i + 1) == Some(&b'[') => {
                // CSI: parameter and intermediate bytes end at 0x40..=0x7e.
                i += 2;
                while let Some(&c) = bytes.get(i) {
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            }
            0x1b if bytes.get(i + 1) == Some(&b']') => {
                // OSC: runs until BEL or the two-byte ST terminator.
                i += 2;
                while let Some(&c) = bytes.get(i) {
                    if c == 0x07 {
                        i += 1;
                        break;
                    }
                    if c == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            0x1b => i += 1,
            b if is_bare_control(b) => i += 1,
            _ => {
                // Copy the whole run of safe bytes in one push. Control
                // bytes are ASCII and cannot occur mid-codepoint, so the
                // slice boundaries stay on valid UTF-8.
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != 0x1b && !is_bare_control(bytes[i]) {
                    i += 1;
                }
                out.push_str(&s[start..i]);
            }
        }
    }

    Cow::Owned(out)
}

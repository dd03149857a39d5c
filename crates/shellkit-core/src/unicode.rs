//! Code-point helpers
//!
//! The editor indexes text by Unicode scalar value. Terminal width is one
//! column per code point; wide and combining characters are not measured.

/// Columns `text` occupies once printed.
///
/// ANSI escape sequences (CSI such as colors, OSC such as window titles) and
/// other control characters take no columns, so a colored prompt measures
/// the same as its plain text.
pub fn display_width(text: &str) -> usize {
    let mut state = WidthState::Text;
    let mut width = 0;

    for ch in text.chars() {
        state = match state {
            WidthState::Text => match ch {
                '\x1b' => WidthState::Escape,
                c if c.is_control() => WidthState::Text,
                _ => {
                    width += 1;
                    WidthState::Text
                }
            },
            WidthState::Escape => match ch {
                '[' => WidthState::Csi,
                ']' => WidthState::Osc,
                _ => WidthState::Text,
            },
            WidthState::Csi => {
                if ('\x40'..='\x7e').contains(&ch) {
                    WidthState::Text
                } else {
                    WidthState::Csi
                }
            }
            // OSC ends at BEL or at the ESC of an ST terminator
            WidthState::Osc => match ch {
                '\x07' => WidthState::Text,
                '\x1b' => WidthState::Escape,
                _ => WidthState::Osc,
            },
        };
    }

    width
}

#[derive(Clone, Copy)]
enum WidthState {
    Text,
    Escape,
    Csi,
    Osc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_plain() {
        assert_eq!(display_width("$ "), 2);
        assert_eq!(display_width("héllo"), 5);
        assert_eq!(display_width("日本"), 2);
    }

    #[test]
    fn test_display_width_skips_escape_sequences() {
        assert_eq!(display_width("\x1b[32m$\x1b[0m "), 2);
        assert_eq!(display_width("\x1b[1;38;5;42mshell\x1b[0m> "), 7);
        assert_eq!(display_width("\x1b]0;title\x07> "), 2);
        assert_eq!(display_width("\x1b]0;title\x1b\\> "), 2);
    }

    #[test]
    fn test_display_width_ignores_control_characters() {
        assert_eq!(display_width("a\tb\r"), 2);
    }
}

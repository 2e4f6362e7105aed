//! iTerm2 inline image escape sequences for actor avatars.

use base64::Engine as _;

pub const DEFAULT_WIDTH: &str = "32px";
pub const DEFAULT_HEIGHT: &str = "32px";

/// Display size hints passed to the terminal. `None` omits the hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarSize {
    pub width: Option<String>,
    pub height: Option<String>,
}

impl Default for AvatarSize {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

fn hint(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl AvatarSize {
    pub fn new(width: &str, height: &str) -> Self {
        Self {
            width: hint(width),
            height: hint(height),
        }
    }

    /// Applies a combined `W,H` override. Anything that isn't exactly two
    /// comma separated parts is ignored.
    pub fn with_size(self, size: &str) -> Self {
        let parts: Vec<&str> = size.split(',').collect();
        match parts.as_slice() {
            [width, height] => Self::new(width, height),
            _ => {
                if !size.is_empty() {
                    tracing::warn!(size, "Ignoring avatar size, expected `W,H`");
                }
                self
            }
        }
    }
}

/// Wraps `image` into `ESC ]1337;File=inline=1[;width=W][;height=H]:<base64> BEL`.
pub fn encode(image: &[u8], size: &AvatarSize) -> String {
    let data = base64::engine::general_purpose::STANDARD.encode(image);

    let mut buf = String::with_capacity(data.len() + 48);
    buf.push_str("\x1b]1337;File=inline=1");
    if let Some(width) = &size.width {
        buf.push_str(";width=");
        buf.push_str(width);
    }
    if let Some(height) = &size.height {
        buf.push_str(";height=");
        buf.push_str(height);
    }
    buf.push(':');
    buf.push_str(&data);
    buf.push('\x07');
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_default_size() {
        assert_eq!(
            encode(&[0xFF], &AvatarSize::default()),
            "\x1b]1337;File=inline=1;width=32px;height=32px:/w==\x07"
        );
    }

    #[test]
    fn combined_size_overrides_both() {
        let size = AvatarSize::default().with_size("64,48");
        assert_eq!(size.width.as_deref(), Some("64"));
        assert_eq!(size.height.as_deref(), Some("48"));
        assert_eq!(
            encode(b"hi", &size),
            "\x1b]1337;File=inline=1;width=64;height=48:aGk=\x07"
        );
    }

    #[test]
    fn malformed_size_keeps_previous() {
        let size = AvatarSize::new("10px", "20px");
        assert_eq!(size.clone().with_size("64"), size);
        assert_eq!(size.clone().with_size("1,2,3"), size);
        assert_eq!(size.clone().with_size(""), size);
    }

    #[test]
    fn empty_hints_are_omitted() {
        let size = AvatarSize::new("", "auto");
        assert_eq!(encode(&[], &size), "\x1b]1337;File=inline=1;height=auto:\x07");
    }
}

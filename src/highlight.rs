use inksac::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    /// A highlighter that never emits escape codes.
    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self.color_support, ColorSupport::NoColor)
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if self.is_plain() {
            return text.to_string();
        }

        let style = if bold {
            Style::builder().foreground(color).bold().build()
        } else {
            Style::builder().foreground(color).build()
        };
        text.style(style).to_string()
    }

    /// `user@host` part of the prompt.
    pub fn highlight_identity(&self, identity: &str) -> String {
        self.paint(identity, Color::Green, true)
    }

    /// Working-directory part of the prompt.
    pub fn highlight_location(&self, location: &str) -> String {
        self.paint(location, Color::Blue, true)
    }

    /// `ls` entry for a directory, decorated with a trailing `/`.
    pub fn highlight_directory(&self, name: &str) -> String {
        self.paint(&format!("{}/", name), Color::Blue, true)
    }

    /// `ls` entry for an executable file, decorated with a trailing `*`.
    pub fn highlight_executable(&self, name: &str) -> String {
        self.paint(&format!("{}*", name), Color::Green, true)
    }

    pub fn highlight_error(&self, error: &str) -> String {
        self.paint(error, Color::Red, true)
    }

    pub fn highlight_hint(&self, hint: &str) -> String {
        self.paint(hint, Color::RGB(128, 128, 128), false)
    }
}

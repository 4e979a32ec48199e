use std::env;

use crate::core::ShellState;
use crate::highlight::SyntaxHighlighter;

/// Renders `user@host:cwd$ ` with the home directory shown as `~`.
pub struct Prompt {
    identity: String,
    highlighter: SyntaxHighlighter,
}

impl Prompt {
    pub fn new(highlighter: SyntaxHighlighter) -> Self {
        let user = env::var("USER").unwrap_or_else(|_| "user".to_string());
        Prompt {
            identity: format!("{}@{}", user, hostname()),
            highlighter,
        }
    }

    pub fn render(&self, state: &ShellState) -> String {
        let location = state.paths.abbreviate(&state.cwd);
        format!(
            "{}:{}$ ",
            self.highlighter.highlight_identity(&self.identity),
            self.highlighter.highlight_location(&location)
        )
    }
}

fn hostname() -> String {
    let mut buf = [0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if rc != 0 {
        return "localhost".to_string();
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::config::AliasTable;
    use crate::input::HistoryLog;

    #[test]
    fn test_render_abbreviates_home() {
        let state = ShellState::new(
            PathBuf::from("/home/u/src"),
            Some(PathBuf::from("/home/u")),
            AliasTable::new(),
            HistoryLog::in_memory(50),
        );
        let prompt = Prompt {
            identity: "u@box".to_string(),
            highlighter: SyntaxHighlighter::plain(),
        };
        assert_eq!(prompt.render(&state), "u@box:~/src$ ");
    }

    #[test]
    fn test_hostname_not_empty() {
        assert!(!hostname().is_empty());
    }
}

use std::io::Write;

use log::{debug, warn};

use crate::core::commands::{BuiltinRegistry, Command, Context, Outcome, Streams};
use crate::core::state::ShellState;
use crate::input::{HistoryError, LineHistory};
use crate::process::{ProcessError, ProcessExecutor};

/// Turns one input line into a builtin call or an external process.
pub struct Interpreter {
    registry: BuiltinRegistry,
    state: ShellState,
    runner: ProcessExecutor,
}

impl Interpreter {
    pub fn new(state: ShellState, runner: ProcessExecutor) -> Self {
        Interpreter {
            registry: BuiltinRegistry::new(),
            state,
            runner,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn running(&self) -> bool {
        self.state.running
    }

    pub fn tokenize(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    /// Tokenizes `line` and substitutes the first token's alias, once.
    pub fn resolve(&self, line: &str) -> Vec<String> {
        self.state.aliases.expand(Self::tokenize(line))
    }

    /// Appends a non-blank line to the session history and the editor.
    pub fn record(&mut self, line: &str, editor: &mut dyn LineHistory) {
        if !self.state.history.push(line) {
            return;
        }
        if let Err(e) = editor.add(line) {
            warn!("failed to add line to editor history: {}", e);
        }
    }

    pub fn save_history(&self) -> Result<(), HistoryError> {
        self.state.history.save()
    }

    pub fn execute(&mut self, line: &str, io: &mut Streams<'_>) -> Outcome {
        let tokens = self.resolve(line);
        let Some((name, args)) = tokens.split_first() else {
            return Outcome::Noop;
        };

        if let Some(builtin) = self.registry.lookup(name) {
            debug!("dispatching builtin {} {:?}", name, args);
            let mut ctx = Context::new(builtin.name(), &mut self.state, io);
            return builtin.execute(args, &mut ctx);
        }

        debug!("dispatching external {:?}", tokens);
        let _ = io.stdout.flush();
        match self.runner.spawn_process(&tokens, &self.state.cwd) {
            Ok(()) => Outcome::Success,
            Err(e) => {
                let silent = self.runner.is_quiet() && matches!(e, ProcessError::Exited { .. });
                if !silent {
                    let message = self.state.highlighter.highlight_error(&e.to_string());
                    let _ = writeln!(io.stderr, "{}", message);
                }
                Outcome::Failure(e.kind())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use std::fs;

    use super::testing::Harness;
    use super::Interpreter;
    use crate::core::commands::{ErrorKind, Outcome};
    use crate::core::config::ConfigFile;

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(
            Interpreter::tokenize("  ls \t -la   dir "),
            vec!["ls", "-la", "dir"]
        );
        assert!(Interpreter::tokenize("   ").is_empty());
    }

    #[test]
    fn test_empty_line_is_noop() {
        let mut h = Harness::new();
        assert_eq!(h.run("").0, Outcome::Noop);
        assert_eq!(h.run("   \t ").0, Outcome::Noop);
    }

    #[test]
    fn test_alias_expands_first_token_only() {
        let mut h = Harness::new();
        h.run("alias greet=echo hello");
        assert_eq!(
            h.interpreter().resolve("greet world"),
            vec!["echo", "hello", "world"]
        );
        assert_eq!(h.interpreter().resolve("echo greet"), vec!["echo", "greet"]);

        let (outcome, out, _) = h.run("greet world");
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(out, "hello world\n");
    }

    #[test]
    fn test_alias_is_not_expanded_twice() {
        let mut h = Harness::new();
        h.run("alias first=second");
        h.run("alias second=echo nested");
        assert_eq!(h.interpreter().resolve("first x"), vec!["second", "x"]);

        let (outcome, _, err) = h.run("first x");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::NotFound));
        assert_eq!(err, "second: command not found\n");
    }

    #[test]
    fn test_unknown_command_falls_through() {
        let mut h = Harness::new();
        let (outcome, out, err) = h.run("nonexistentcmd123 --flag");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::NotFound));
        assert!(out.is_empty());
        assert_eq!(err, "nonexistentcmd123: command not found\n");
    }

    #[test]
    fn test_external_runs_in_shell_cwd() {
        let mut h = Harness::new();
        h.mkdir("inner");
        h.run("cd inner");
        assert_eq!(h.run("sh -c true").0, Outcome::Success);
        let (outcome, _, err) = h.run("sh -c false");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::GenericFailure));
        assert_eq!(err, "sh: exited with status 1\n");

        h.run("sh -c >made-here");
        assert!(h.path("inner/made-here").exists());
    }

    #[test]
    fn test_alias_round_trip_persists() {
        let mut h = Harness::new();
        h.run("alias ll=ls -la");
        let record = ConfigFile::new(h.config_path()).load().expect("load");
        assert_eq!(record.aliases.get("ll").map(String::as_str), Some("ls -la"));

        let (_, out, _) = h.run("alias");
        assert_eq!(out, "alias ll='ls -la'\n");

        h.run("unalias ll");
        let record = ConfigFile::new(h.config_path()).load().expect("load");
        assert!(record.aliases.is_empty());
        let (_, out, _) = h.run("alias");
        assert_eq!(out, "No aliases defined\n");
    }

    #[test]
    fn test_errors_do_not_stop_the_loop() {
        let mut h = Harness::new();
        h.run("cat missing");
        h.run("diff one");
        assert!(h.running());
        assert_eq!(h.run("pwd").0, Outcome::Success);
    }

    #[test]
    fn test_record_skips_blank_lines() {
        let mut h = Harness::new();
        h.record("ls");
        h.record("   ");
        h.record("pwd");
        assert_eq!(h.editor_lines(), &["ls", "pwd"]);
        assert_eq!(h.interpreter().state().history.entries(), &["ls", "pwd"]);

        h.interpreter().save_history().expect("save");
        assert_eq!(fs::read_to_string(h.history_path()).expect("read"), "ls\npwd\n");
    }
}

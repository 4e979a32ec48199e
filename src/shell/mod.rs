use std::env;
use std::fs;
use std::io::{self, Write};

use log::{debug, warn};
use rustyline::{error::ReadlineError, Config, DefaultEditor};

use crate::{
    core::{
        commands::{Outcome, Streams},
        config::{AliasTable, ConfigFile, ConfigPaths},
        Interpreter, ShellState,
    },
    error::ShellError,
    flags::Flags,
    input::{history::DEFAULT_CAPACITY, HistoryLog, LineHistory},
    process::{InterruptFlag, ProcessExecutor},
};

mod prompt;

use prompt::Prompt;

pub struct Shell {
    editor: DefaultEditor,
    interpreter: Interpreter,
    prompt: Prompt,
    flags: Flags,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let home = dirs::home_dir();
        let paths = ConfigPaths::resolve(
            home.as_deref(),
            flags.config.clone(),
            flags.history_file.clone(),
        )?;

        let aliases = load_aliases(ConfigFile::new(&paths.config_path));
        let history = HistoryLog::new(paths.history_path.clone(), flags.history_window)
            .unwrap_or_else(|e| {
                warn!("{}", e);
                eprintln!("Warning: Could not load history: {}", e);
                HistoryLog::in_memory(flags.history_window)
            });

        let config = Config::builder()
            .max_history_size(DEFAULT_CAPACITY)?
            .auto_add_history(false)
            .build();
        let mut editor = DefaultEditor::with_config(config)?;
        for entry in history.entries() {
            if let Err(e) = editor.add(entry) {
                warn!("failed to seed editor history: {}", e);
                break;
            }
        }

        let interrupt = InterruptFlag::new();
        if let Err(e) = interrupt.install() {
            warn!("Ctrl-C handler not installed: {}", e);
        }

        let cwd = fs::canonicalize(env::current_dir()?)?;
        let state = ShellState::new(cwd, home, aliases, history).with_interrupt(interrupt);
        let prompt = Prompt::new(state.highlighter);
        let interpreter = Interpreter::new(state, ProcessExecutor::new(flags.quiet));

        Ok(Shell {
            editor,
            interpreter,
            prompt,
            flags,
        })
    }

    /// Reads and runs lines until `exit`, `quit` or end of input. History
    /// is saved however the loop ends.
    pub fn run(&mut self) -> Result<(), ShellError> {
        if !self.flags.quiet {
            self.print_banner();
        }

        let result = self.read_loop();
        let saved = self.interpreter.save_history();
        result?;
        saved?;
        Ok(())
    }

    /// Runs one line without touching history.
    pub fn run_line(&mut self, line: &str) -> Outcome {
        self.interpreter.state().interrupt.reset();

        let mut stdin = io::stdin().lock();
        let mut stdout = io::stdout().lock();
        let mut stderr = io::stderr();
        let mut streams = Streams {
            stdin: &mut stdin,
            stdout: &mut stdout,
            stderr: &mut stderr,
            editor: &mut self.editor,
        };
        let outcome = self.interpreter.execute(line, &mut streams);
        let _ = streams.stdout.flush();
        debug!("{:?} -> {:?}", line, outcome);
        outcome
    }

    fn read_loop(&mut self) -> Result<(), ShellError> {
        let highlighter = self.interpreter.state().highlighter;
        while self.interpreter.running() {
            let prompt = self.prompt.render(self.interpreter.state());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    self.interpreter.record(&line, &mut self.editor);
                    self.run_line(&line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    println!("{}", highlighter.highlight_hint("(Use 'exit' or Ctrl+D to quit)"));
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(e) => {
                    eprintln!("{}", highlighter.highlight_error(&format!("Error: {}", e)));
                }
            }
        }
        Ok(())
    }

    fn print_banner(&self) {
        let rule = "=".repeat(50);
        println!("\n{}", rule);
        println!("Welcome to minish!");
        println!("Type 'help' for available commands");
        println!("Press Ctrl+R for reverse search");
        println!("Press Ctrl+C to cancel, Ctrl+D to exit");
        println!("{}\n", rule);

        let count = self.interpreter.state().aliases.len();
        if count > 0 {
            println!("Loaded {} alias(es)", count);
        }
    }
}

/// A missing config means no aliases. An unreadable one is reported and
/// the shell starts empty.
fn load_aliases(file: ConfigFile) -> AliasTable {
    match AliasTable::load(file.clone()) {
        Ok(table) => table,
        Err(e) => {
            warn!("{}", e);
            eprintln!("Warning: Could not load config: {}", e);
            AliasTable::empty_backed_by(file)
        }
    }
}

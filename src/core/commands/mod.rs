use std::collections::BTreeMap;

mod alias;
mod cd;
mod context;
mod diff;
mod files;
mod history;
mod listing;
mod outcome;
mod search;
mod session;
mod text;

pub use context::{Context, Streams};
pub use diff::unified_diff;
pub use outcome::{CommandError, ErrorKind, Outcome};
pub use text::Counts;

pub trait Command {
    fn execute(&self, args: &[String], ctx: &mut Context<'_, '_>) -> Outcome;
}

/// Every command the interpreter handles without spawning a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Pwd,
    Ls,
    Tree,
    Cat,
    Touch,
    Mkdir,
    Rm,
    Rmdir,
    Mv,
    Cp,
    Echo,
    Head,
    Tail,
    Grep,
    Wc,
    Sort,
    Diff,
    Find,
    Which,
    Du,
    Env,
    Clear,
    History,
    Alias,
    Unalias,
    Exit,
    Quit,
    Help,
}

impl Builtin {
    pub const ALL: [Builtin; 29] = [
        Builtin::Cd,
        Builtin::Pwd,
        Builtin::Ls,
        Builtin::Tree,
        Builtin::Cat,
        Builtin::Touch,
        Builtin::Mkdir,
        Builtin::Rm,
        Builtin::Rmdir,
        Builtin::Mv,
        Builtin::Cp,
        Builtin::Echo,
        Builtin::Head,
        Builtin::Tail,
        Builtin::Grep,
        Builtin::Wc,
        Builtin::Sort,
        Builtin::Diff,
        Builtin::Find,
        Builtin::Which,
        Builtin::Du,
        Builtin::Env,
        Builtin::Clear,
        Builtin::History,
        Builtin::Alias,
        Builtin::Unalias,
        Builtin::Exit,
        Builtin::Quit,
        Builtin::Help,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cd => "cd",
            Builtin::Pwd => "pwd",
            Builtin::Ls => "ls",
            Builtin::Tree => "tree",
            Builtin::Cat => "cat",
            Builtin::Touch => "touch",
            Builtin::Mkdir => "mkdir",
            Builtin::Rm => "rm",
            Builtin::Rmdir => "rmdir",
            Builtin::Mv => "mv",
            Builtin::Cp => "cp",
            Builtin::Echo => "echo",
            Builtin::Head => "head",
            Builtin::Tail => "tail",
            Builtin::Grep => "grep",
            Builtin::Wc => "wc",
            Builtin::Sort => "sort",
            Builtin::Diff => "diff",
            Builtin::Find => "find",
            Builtin::Which => "which",
            Builtin::Du => "du",
            Builtin::Env => "env",
            Builtin::Clear => "clear",
            Builtin::History => "history",
            Builtin::Alias => "alias",
            Builtin::Unalias => "unalias",
            Builtin::Exit => "exit",
            Builtin::Quit => "quit",
            Builtin::Help => "help",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Builtin::Cd => "[dir]             change directory (default: home)",
            Builtin::Pwd => "                  print working directory",
            Builtin::Ls => "[path...]         list directory contents",
            Builtin::Tree => "[dir]             show a directory tree",
            Builtin::Cat => "[file...]         print files (stdin when none)",
            Builtin::Touch => "file...           create files or update mtime",
            Builtin::Mkdir => "[-p] dir...       create directories",
            Builtin::Rm => "[-rf] path...     remove files or directories",
            Builtin::Rmdir => "dir...            remove empty directories",
            Builtin::Mv => "src... dest       move or rename",
            Builtin::Cp => "[-r] src... dest  copy files or directories",
            Builtin::Echo => "[args]            print arguments",
            Builtin::Head => "[-n N] [file...]  first lines (default 10)",
            Builtin::Tail => "[-n N] [file...]  last lines (default 10)",
            Builtin::Grep => "[-iv] pat [file...] print matching lines",
            Builtin::Wc => "[file...]         count lines, words and bytes",
            Builtin::Sort => "[-ru] [file...]   sort lines",
            Builtin::Diff => "a b               unified diff of two files",
            Builtin::Find => "[path] [-name pat] search for files",
            Builtin::Which => "cmd...            locate a command on PATH",
            Builtin::Du => "[path...]         disk usage in bytes",
            Builtin::Env => "                  print environment variables",
            Builtin::Clear => "                  clear the screen",
            Builtin::History => "[-c | N]          show or clear command history",
            Builtin::Alias => "[name[=value]]    show or define aliases",
            Builtin::Unalias => "name...           remove aliases",
            Builtin::Exit => "                  exit the shell",
            Builtin::Quit => "                  exit the shell",
            Builtin::Help => "                  show this help message",
        }
    }
}

impl Command for Builtin {
    fn execute(&self, args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
        match self {
            Builtin::Cd => cd::cd(args, ctx),
            Builtin::Pwd => cd::pwd(args, ctx),
            Builtin::Ls => listing::ls(args, ctx),
            Builtin::Tree => listing::tree(args, ctx),
            Builtin::Cat => files::cat(args, ctx),
            Builtin::Touch => files::touch(args, ctx),
            Builtin::Mkdir => files::mkdir(args, ctx),
            Builtin::Rm => files::rm(args, ctx),
            Builtin::Rmdir => files::rmdir(args, ctx),
            Builtin::Mv => files::mv(args, ctx),
            Builtin::Cp => files::cp(args, ctx),
            Builtin::Echo => text::echo(args, ctx),
            Builtin::Head => text::head(args, ctx),
            Builtin::Tail => text::tail(args, ctx),
            Builtin::Grep => text::grep(args, ctx),
            Builtin::Wc => text::wc(args, ctx),
            Builtin::Sort => text::sort(args, ctx),
            Builtin::Diff => diff::diff(args, ctx),
            Builtin::Find => search::find(args, ctx),
            Builtin::Which => search::which(args, ctx),
            Builtin::Du => search::du(args, ctx),
            Builtin::Env => search::env(args, ctx),
            Builtin::Clear => session::clear(args, ctx),
            Builtin::History => history::history(args, ctx),
            Builtin::Alias => alias::alias(args, ctx),
            Builtin::Unalias => alias::unalias(args, ctx),
            Builtin::Exit | Builtin::Quit => session::exit(args, ctx),
            Builtin::Help => session::help(args, ctx),
        }
    }
}

/// Name lookup for the builtin table.
#[derive(Debug, Clone)]
pub struct BuiltinRegistry {
    commands: BTreeMap<&'static str, Builtin>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let commands = Builtin::ALL.iter().map(|b| (b.name(), *b)).collect();
        Self { commands }
    }

    pub fn lookup(&self, name: &str) -> Option<Builtin> {
        self.commands.get(name).copied()
    }
}

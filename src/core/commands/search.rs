use std::env;
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use super::{CommandError, Context, Outcome};

struct FindQuery {
    root: String,
    pattern: Option<Pattern>,
}

impl FindQuery {
    fn parse(args: &[String]) -> Result<Self, CommandError> {
        let mut root = None;
        let mut pattern = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "-name" {
                let raw = iter
                    .next()
                    .ok_or_else(|| CommandError::InvalidArgument("-name: missing pattern".to_string()))?;
                let raw = raw.trim_matches(|c: char| c == '\'' || c == '"');
                let compiled = Pattern::new(raw).map_err(|e| {
                    CommandError::InvalidArgument(format!("{}: invalid pattern: {}", raw, e.msg))
                })?;
                pattern = Some(compiled);
            } else if root.is_none() {
                root = Some(arg.clone());
            } else {
                return Err(CommandError::usage("find [PATH] [-name PATTERN]"));
            }
        }
        Ok(FindQuery {
            root: root.unwrap_or_else(|| ".".to_string()),
            pattern,
        })
    }

    fn matches(&self, name: &str) -> bool {
        self.pattern.as_ref().map_or(true, |p| p.matches(name))
    }
}

pub fn find(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let query = match FindQuery::parse(args) {
        Ok(query) => query,
        Err(e) => return ctx.finish(Err(e)),
    };

    let root = ctx.resolve(&query.root);
    if let Err(e) = fs::symlink_metadata(&root) {
        return ctx.finish(Err(CommandError::io(&query.root, e)));
    }

    let mut results = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        if ctx.interrupted() {
            break;
        }
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let shown = e
                    .path()
                    .map(|p| display_under(&query.root, &root, p))
                    .unwrap_or_else(|| PathBuf::from(&query.root));
                let err = match e.into_io_error() {
                    Some(io_err) => CommandError::io(&shown, io_err),
                    None => CommandError::Failed {
                        target: shown.display().to_string(),
                        reason: "filesystem loop".to_string(),
                    },
                };
                results.push(Err(err));
                continue;
            }
        };

        if query.matches(&entry.file_name().to_string_lossy()) {
            let shown = display_under(&query.root, &root, entry.path());
            if let Err(e) = writeln!(ctx.io.stdout, "{}", shown.display()) {
                results.push(Err(e.into()));
                break;
            }
        }
    }
    ctx.settle(results)
}

/// `path` re-expressed relative to the argument the user typed.
fn display_under(arg: &str, root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rest) if rest.as_os_str().is_empty() => PathBuf::from(arg),
        Ok(rest) => Path::new(arg).join(rest),
        Err(_) => path.to_path_buf(),
    }
}

pub fn which(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    if args.is_empty() {
        return ctx.finish(Err(CommandError::usage("which COMMAND...")));
    }

    let mut results = Vec::with_capacity(args.len());
    for name in args {
        let result = match locate(name, ctx) {
            Some(found) => writeln!(ctx.io.stdout, "{}", found.display()).map_err(CommandError::from),
            None => Err(CommandError::UnknownName(name.clone())),
        };
        results.push(result);
    }
    ctx.settle(results)
}

fn locate(name: &str, ctx: &Context<'_, '_>) -> Option<PathBuf> {
    if name.contains('/') {
        let path = ctx.resolve(name);
        return is_executable(&path).then(|| PathBuf::from(name));
    }

    let search = env::var_os("PATH")?;
    env::split_paths(&search)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

pub fn du(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let targets: Vec<&str> = if args.is_empty() {
        vec!["."]
    } else {
        args.iter().map(String::as_str).collect()
    };

    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        let path = ctx.resolve(target);
        let result = match fs::symlink_metadata(&path) {
            Err(e) => Err(CommandError::io(target, e)),
            Ok(meta) if !meta.is_dir() => {
                writeln!(ctx.io.stdout, "{}\t{}", meta.len(), target).map_err(CommandError::from)
            }
            Ok(_) => match disk_usage(&path, ctx) {
                Some(total) => {
                    writeln!(ctx.io.stdout, "{}\t{}", total, target).map_err(CommandError::from)
                }
                None => break,
            },
        };
        results.push(result);
    }
    ctx.settle(results)
}

/// Sum of regular file sizes below `dir`. Unreadable entries are skipped.
/// `None` when interrupted.
fn disk_usage(dir: &Path, ctx: &mut Context<'_, '_>) -> Option<u64> {
    let mut total = 0;
    for entry in WalkDir::new(dir).follow_links(false).into_iter().filter_map(Result::ok) {
        if ctx.interrupted() {
            return None;
        }
        if entry.file_type().is_file() {
            total += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }
    Some(total)
}

pub fn env(_args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let mut vars: Vec<(String, String)> = env::vars_os()
        .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
        .collect();
    vars.sort();

    let result = vars
        .iter()
        .try_for_each(|(k, v)| writeln!(ctx.io.stdout, "{}={}", k, v))
        .map_err(CommandError::from);
    ctx.finish(result)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    use crate::core::commands::{ErrorKind, Outcome};
    use crate::core::interpreter::testing::Harness;

    fn lines(out: &str) -> BTreeSet<&str> {
        out.lines().collect()
    }

    #[test]
    fn test_find_by_name() {
        let mut h = Harness::new();
        h.write("a.txt", "");
        h.write("b.rs", "");
        h.write("sub/c.txt", "");
        h.mkdir("sub/d.txt");

        let (outcome, out, _) = h.run("find . -name *.txt");
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(
            lines(&out),
            BTreeSet::from(["./a.txt", "./sub/c.txt", "./sub/d.txt"])
        );
    }

    #[test]
    fn test_find_quoted_pattern_and_default_root() {
        let mut h = Harness::new();
        h.write("x/note.md", "");
        let (_, out, _) = h.run("find -name \"*.md\"");
        assert_eq!(out, "./x/note.md\n");

        let (_, out, _) = h.run("find x -name note.?d");
        assert_eq!(out, "x/note.md\n");
    }

    #[test]
    fn test_find_everything() {
        let mut h = Harness::new();
        h.write("t/one", "");
        let (_, out, _) = h.run("find t");
        assert_eq!(out, "t\nt/one\n");
    }

    #[test]
    fn test_find_missing_pattern() {
        let mut h = Harness::new();
        let (outcome, _, err) = h.run("find . -name");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::InvalidArgument));
        assert_eq!(err, "find: -name: missing pattern\n");
    }

    #[test]
    fn test_find_missing_root() {
        let mut h = Harness::new();
        let (outcome, _, err) = h.run("find ghost");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::NotFound));
        assert_eq!(err, "find: ghost: No such file or directory\n");
    }

    #[test]
    fn test_du_sizes() {
        let mut h = Harness::new();
        h.write("d/a", "12345");
        h.write("d/sub/b", "123");
        h.write("f", "1234567");

        let (outcome, out, _) = h.run("du d f");
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(out, "8\td\n7\tf\n");
    }

    #[test]
    fn test_du_continues_after_missing() {
        let mut h = Harness::new();
        h.write("f", "ab");
        let (outcome, out, err) = h.run("du nope f");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::NotFound));
        assert_eq!(out, "2\tf\n");
        assert_eq!(err, "du: nope: No such file or directory\n");
    }

    #[test]
    fn test_which_direct_path() {
        let mut h = Harness::new();
        h.write("tool.sh", "#!/bin/sh\n");
        fs::set_permissions(h.path("tool.sh"), fs::Permissions::from_mode(0o755)).expect("chmod");
        h.write("plain", "");

        let (outcome, out, _) = h.run("which ./tool.sh");
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(out, "./tool.sh\n");

        let (outcome, _, err) = h.run("which ./plain");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::NotFound));
        assert_eq!(err, "which: ./plain: not found\n");
    }

    #[test]
    fn test_which_searches_path() {
        let mut h = Harness::new();
        let (outcome, out, _) = h.run("which sh");
        assert_eq!(outcome, Outcome::Success);
        assert!(out.trim_end().ends_with("/sh"));

        let (outcome, _, _) = h.run("which definitely-not-a-command-xyz");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::NotFound));
    }

    #[test]
    fn test_env_lists_path() {
        let mut h = Harness::new();
        let (outcome, out, _) = h.run("env");
        assert_eq!(outcome, Outcome::Success);
        assert!(out.lines().any(|l| l.starts_with("PATH=")));
    }
}

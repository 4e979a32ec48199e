use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use super::{CommandError, Context, Outcome};
use crate::highlight::SyntaxHighlighter;

pub fn ls(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let targets: Vec<&str> = if args.is_empty() {
        vec!["."]
    } else {
        args.iter().map(String::as_str).collect()
    };

    let with_headers = targets.len() > 1;
    let mut results = Vec::with_capacity(targets.len());
    for (i, target) in targets.iter().enumerate() {
        let separated = if with_headers && i > 0 {
            writeln!(ctx.io.stdout).map_err(CommandError::from)
        } else {
            Ok(())
        };
        results.push(separated.and_then(|()| list_target(target, with_headers, ctx)));
    }
    ctx.settle(results)
}

fn list_target(arg: &str, header: bool, ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    let path = ctx.resolve(arg);
    let highlighter = ctx.state.highlighter;
    let metadata = fs::metadata(&path).map_err(|e| CommandError::io(arg, e))?;

    if !metadata.is_dir() {
        writeln!(ctx.io.stdout, "{}", decorate(arg, &path, &highlighter))?;
        return Ok(());
    }

    let mut names: Vec<String> = fs::read_dir(&path)
        .map_err(|e| CommandError::io(arg, e))?
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let decorated: Vec<String> = names
        .iter()
        .map(|name| decorate(name, &path.join(name), &highlighter))
        .collect();

    if header {
        writeln!(ctx.io.stdout, "{}:", arg)?;
    }
    if !decorated.is_empty() {
        writeln!(ctx.io.stdout, "{}", decorated.join("  "))?;
    }
    Ok(())
}

/// Display form of one entry. Classification never changes ordering.
fn decorate(name: &str, path: &Path, highlighter: &SyntaxHighlighter) -> String {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => highlighter.highlight_directory(name),
        Ok(meta) if meta.permissions().mode() & 0o111 != 0 => {
            highlighter.highlight_executable(name)
        }
        _ => name.to_string(),
    }
}

#[derive(Default)]
struct TreeCounts {
    directories: usize,
    files: usize,
}

pub fn tree(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let arg = args.first().map(String::as_str).unwrap_or(".");
    let result = print_tree(arg, ctx);
    ctx.finish(result)
}

fn print_tree(arg: &str, ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    let root = ctx.resolve(arg);
    let metadata = fs::metadata(&root).map_err(|e| CommandError::io(arg, e))?;
    if !metadata.is_dir() {
        return Err(CommandError::NotADirectory(arg.to_string()));
    }

    writeln!(ctx.io.stdout, "{}", arg)?;
    let mut counts = TreeCounts::default();
    if !walk_tree(&root, "", ctx, &mut counts)? {
        return Ok(());
    }
    writeln!(
        ctx.io.stdout,
        "\n{} directories, {} files",
        counts.directories, counts.files
    )?;
    Ok(())
}

/// Returns `Ok(false)` when the walk was interrupted.
fn walk_tree(
    dir: &Path,
    prefix: &str,
    ctx: &mut Context<'_, '_>,
    counts: &mut TreeCounts,
) -> Result<bool, CommandError> {
    if ctx.interrupted() {
        return Ok(false);
    }

    let Ok(read_dir) = fs::read_dir(dir) else {
        return Ok(true);
    };
    let mut entries: Vec<fs::DirEntry> = read_dir.filter_map(Result::ok).collect();
    entries.sort_by_key(|entry| entry.file_name());

    for (i, entry) in entries.iter().enumerate() {
        let is_last = i + 1 == entries.len();
        let connector = if is_last { "└── " } else { "├── " };
        writeln!(
            ctx.io.stdout,
            "{}{}{}",
            prefix,
            connector,
            entry.file_name().to_string_lossy()
        )?;

        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            counts.directories += 1;
            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            if !walk_tree(&entry.path(), &child_prefix, ctx, counts)? {
                return Ok(false);
            }
        } else {
            counts.files += 1;
        }
    }
    Ok(true)
}

use std::fs::{self, File};
use std::io::{self, Write};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use super::{CommandError, Context, Outcome};

pub fn cat(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    if args.is_empty() {
        let result = io::copy(&mut *ctx.io.stdin, &mut *ctx.io.stdout)
            .map(|_| ())
            .map_err(CommandError::from);
        return ctx.finish(result);
    }

    let mut results = Vec::with_capacity(args.len());
    for arg in args {
        results.push(cat_file(arg, ctx));
    }
    ctx.settle(results)
}

fn cat_file(arg: &str, ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    let path = ctx.resolve(arg);
    if path.is_dir() {
        return Err(CommandError::IsADirectory(arg.to_string()));
    }
    let mut file = File::open(&path).map_err(|e| CommandError::io(arg, e))?;
    io::copy(&mut file, &mut *ctx.io.stdout).map_err(|e| CommandError::io(arg, e))?;
    Ok(())
}

pub fn touch(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    if args.is_empty() {
        return ctx.finish(Err(CommandError::usage("touch FILE...")));
    }

    let results = args
        .iter()
        .map(|arg| -> Result<(), CommandError> {
            let path = ctx.resolve(arg);
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| CommandError::io(arg, e))?;
            file.set_modified(SystemTime::now())
                .map_err(|e| CommandError::io(arg, e))
        })
        .collect();
    ctx.settle(results)
}

pub fn mkdir(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let parents = args.iter().any(|a| a == "-p");
    let targets: Vec<&String> = args.iter().filter(|a| *a != "-p").collect();
    if targets.is_empty() {
        return ctx.finish(Err(CommandError::usage("mkdir [-p] DIR...")));
    }

    let results = targets
        .into_iter()
        .map(|arg| {
            let path = ctx.resolve(arg);
            let created = if parents {
                fs::create_dir_all(&path)
            } else {
                fs::create_dir(&path)
            };
            created.map_err(|e| CommandError::io(arg, e))
        })
        .collect();
    ctx.settle(results)
}

pub fn rmdir(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    if args.is_empty() {
        return ctx.finish(Err(CommandError::usage("rmdir DIR...")));
    }

    let results = args
        .iter()
        .map(|arg| fs::remove_dir(ctx.resolve(arg)).map_err(|e| CommandError::io(arg, e)))
        .collect();
    ctx.settle(results)
}

#[derive(Debug, Default, Clone, Copy)]
struct RemoveFlags {
    recursive: bool,
    force: bool,
}

impl RemoveFlags {
    /// Accepts `-r`, `-R`, `-f` and any combination such as `-rf`.
    fn absorb(&mut self, arg: &str) -> bool {
        let Some(letters) = arg.strip_prefix('-') else {
            return false;
        };
        if letters.is_empty() || !letters.chars().all(|c| matches!(c, 'r' | 'R' | 'f')) {
            return false;
        }
        self.recursive |= letters.contains(['r', 'R']);
        self.force |= letters.contains('f');
        true
    }
}

pub fn rm(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let mut flags = RemoveFlags::default();
    let targets: Vec<&String> = args.iter().filter(|a| !flags.absorb(a)).collect();
    if targets.is_empty() {
        return ctx.finish(Err(CommandError::usage("rm [-r] [-f] PATH...")));
    }

    let results = targets
        .into_iter()
        .map(|arg| remove_path(arg, &ctx.resolve(arg), flags))
        .collect();
    ctx.settle(results)
}

fn remove_path(arg: &str, path: &Path, flags: RemoveFlags) -> Result<(), CommandError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if flags.force && e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(CommandError::io(arg, e)),
    };

    if metadata.is_dir() {
        if !flags.recursive {
            return Err(CommandError::IsADirectory(arg.to_string()));
        }
        return fs::remove_dir_all(path).map_err(|e| CommandError::io(arg, e));
    }
    fs::remove_file(path).map_err(|e| CommandError::io(arg, e))
}

/// Source and destination operands shared by `cp` and `mv`.
struct Transfer<'a> {
    sources: &'a [&'a String],
    dest: PathBuf,
    into_dir: bool,
}

impl<'a> Transfer<'a> {
    /// Several sources require DEST to be a directory, created if missing.
    fn plan(
        operands: &'a [&'a String],
        usage: &str,
        ctx: &Context<'_, '_>,
    ) -> Result<Self, CommandError> {
        let Some((dest_arg, sources)) = operands.split_last() else {
            return Err(CommandError::usage(usage));
        };
        if sources.is_empty() {
            return Err(CommandError::usage(usage));
        }

        let dest = ctx.resolve(dest_arg);
        let into_dir = if sources.len() > 1 {
            if dest.exists() && !dest.is_dir() {
                return Err(CommandError::InvalidArgument(format!(
                    "target '{}' is not a directory",
                    dest_arg
                )));
            }
            fs::create_dir_all(&dest).map_err(|e| CommandError::io(dest_arg.as_str(), e))?;
            true
        } else {
            dest.is_dir()
        };

        Ok(Transfer {
            sources,
            dest,
            into_dir,
        })
    }

    fn target_for(&self, source: &Path) -> PathBuf {
        match (self.into_dir, source.file_name()) {
            (true, Some(name)) => self.dest.join(name),
            _ => self.dest.clone(),
        }
    }
}

pub fn cp(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let recursive = args.iter().any(|a| a == "-r" || a == "-R");
    let operands: Vec<&String> = args.iter().filter(|a| *a != "-r" && *a != "-R").collect();

    let transfer = match Transfer::plan(&operands, "cp [-r] SRC... DEST", ctx) {
        Ok(transfer) => transfer,
        Err(e) => return ctx.finish(Err(e)),
    };

    let results = transfer
        .sources
        .iter()
        .map(|arg| {
            let source = ctx.resolve(arg);
            let target = transfer.target_for(&source);
            copy_one(arg, &source, &target, recursive)
        })
        .collect();
    ctx.settle(results)
}

fn copy_one(arg: &str, source: &Path, target: &Path, recursive: bool) -> Result<(), CommandError> {
    let metadata = fs::metadata(source).map_err(|e| CommandError::io(arg, e))?;
    if metadata.is_dir() {
        if !recursive {
            return Err(CommandError::OmittedDirectory(arg.to_string()));
        }
        if target.starts_with(source) {
            return Err(CommandError::InvalidArgument(format!(
                "cannot copy a directory, '{}', into itself",
                arg
            )));
        }
        return copy_tree(source, target).map_err(|e| CommandError::io(arg, e));
    }
    refuse_same_file(arg, &metadata, target)?;
    fs::copy(source, target)
        .map(|_| ())
        .map_err(|e| CommandError::io(arg, e))
}

/// `fs::copy` truncates its destination first, so copying a file onto
/// itself would empty it.
fn refuse_same_file(arg: &str, source: &fs::Metadata, target: &Path) -> Result<(), CommandError> {
    match fs::metadata(target) {
        Ok(existing) if existing.dev() == source.dev() && existing.ino() == source.ino() => {
            let shown = target.file_name().map_or_else(
                || target.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );
            Err(CommandError::InvalidArgument(format!(
                "'{}' and '{}' are the same file",
                arg, shown
            )))
        }
        _ => Ok(()),
    }
}

/// Recursively copies the directory `source` to `target`.
fn copy_tree(source: &Path, target: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else {
            fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}

pub fn mv(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let operands: Vec<&String> = args.iter().collect();
    let transfer = match Transfer::plan(&operands, "mv SRC... DEST", ctx) {
        Ok(transfer) => transfer,
        Err(e) => return ctx.finish(Err(e)),
    };

    let results = transfer
        .sources
        .iter()
        .map(|arg| {
            let source = ctx.resolve(arg);
            let target = transfer.target_for(&source);
            move_one(arg, &source, &target)
        })
        .collect();
    ctx.settle(results)
}

fn move_one(arg: &str, source: &Path, target: &Path) -> Result<(), CommandError> {
    let metadata = fs::symlink_metadata(source).map_err(|e| CommandError::io(arg, e))?;
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(libc::EXDEV) => {
            let moved = if metadata.is_dir() {
                copy_tree(source, target).and_then(|()| fs::remove_dir_all(source))
            } else {
                refuse_same_file(arg, &metadata, target)?;
                fs::copy(source, target).and_then(|_| fs::remove_file(source))
            };
            moved.map_err(|e| CommandError::io(arg, e))
        }
        Err(e) => Err(CommandError::io(arg, e)),
    }
}

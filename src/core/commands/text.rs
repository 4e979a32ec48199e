use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, Read, Write};

use regex::{Regex, RegexBuilder};

use super::{CommandError, Context, Outcome};

const DEFAULT_LINES: usize = 10;
const STDIN_NAME: &str = "(standard input)";

pub(super) fn read_file(arg: &str, ctx: &Context<'_, '_>) -> Result<Vec<u8>, CommandError> {
    let path = ctx.resolve(arg);
    if path.is_dir() {
        return Err(CommandError::IsADirectory(arg.to_string()));
    }
    fs::read(&path).map_err(|e| CommandError::io(arg, e))
}

fn read_stdin(ctx: &mut Context<'_, '_>) -> Result<Vec<u8>, CommandError> {
    let mut buffer = Vec::new();
    ctx.io
        .stdin
        .read_to_end(&mut buffer)
        .map_err(|e| CommandError::io(STDIN_NAME, e))?;
    Ok(buffer)
}

fn write_lines<'l>(
    ctx: &mut Context<'_, '_>,
    lines: impl IntoIterator<Item = &'l str>,
) -> Result<(), CommandError> {
    for line in lines {
        writeln!(ctx.io.stdout, "{}", line)?;
    }
    Ok(())
}

pub fn echo(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let result = writeln!(ctx.io.stdout, "{}", args.join(" ")).map_err(CommandError::from);
    ctx.finish(result)
}

/// Splits `-n N` from file operands. A `-n` without a valid count is
/// treated as an ordinary operand.
fn parse_line_count(args: &[String]) -> (usize, Vec<&str>) {
    let mut count = DEFAULT_LINES;
    let mut files = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "-n" {
            if let Some(n) = args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                count = n;
                i += 2;
                continue;
            }
        }
        files.push(args[i].as_str());
        i += 1;
    }
    (count, files)
}

#[derive(Clone, Copy)]
enum Slice {
    Head,
    Tail,
}

impl Slice {
    fn take<'t>(self, text: &'t str, count: usize) -> Vec<&'t str> {
        match self {
            Slice::Head => text.lines().take(count).collect(),
            Slice::Tail => {
                let mut window = VecDeque::with_capacity(count);
                for line in text.lines() {
                    if count == 0 {
                        break;
                    }
                    if window.len() == count {
                        window.pop_front();
                    }
                    window.push_back(line);
                }
                window.into_iter().collect()
            }
        }
    }
}

pub fn head(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    slice_lines(Slice::Head, args, ctx)
}

pub fn tail(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    slice_lines(Slice::Tail, args, ctx)
}

fn slice_lines(slice: Slice, args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let (count, files) = parse_line_count(args);

    if files.is_empty() {
        let result = read_stdin(ctx).and_then(|input| {
            let text = String::from_utf8_lossy(&input);
            write_lines(ctx, slice.take(&text, count))
        });
        return ctx.finish(result);
    }

    let headers = files.len() > 1;
    let mut results = Vec::with_capacity(files.len());
    let mut printed_any = false;
    for file in files {
        let result = read_file(file, ctx).and_then(|content| {
            let text = String::from_utf8_lossy(&content);
            if headers {
                if printed_any {
                    writeln!(ctx.io.stdout)?;
                }
                writeln!(ctx.io.stdout, "==> {} <==", file)?;
            }
            write_lines(ctx, slice.take(&text, count))
        });
        printed_any |= result.is_ok();
        results.push(result);
    }
    ctx.settle(results)
}

pub fn grep(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let mut ignore_case = false;
    let mut invert = false;
    let mut operands = args.iter().map(String::as_str).peekable();
    while let Some(flag) = operands.next_if(|a| matches!(*a, "-i" | "-v" | "-iv" | "-vi")) {
        ignore_case |= flag.contains('i');
        invert |= flag.contains('v');
    }

    let Some(pattern) = operands.next() else {
        return ctx.finish(Err(CommandError::usage("grep [-i] [-v] PATTERN [FILE...]")));
    };
    let regex = match RegexBuilder::new(pattern).case_insensitive(ignore_case).build() {
        Ok(regex) => regex,
        Err(e) => {
            return ctx.finish(Err(CommandError::InvalidArgument(format!(
                "invalid pattern '{}': {}",
                pattern, e
            ))))
        }
    };
    let matcher = LineMatcher { regex, invert };
    let files: Vec<&str> = operands.collect();

    if files.is_empty() {
        let result = grep_stdin(&matcher, ctx);
        return ctx.finish(result);
    }

    let results = files
        .into_iter()
        .map(|file| -> Result<(), CommandError> {
            let content = read_file(file, ctx)?;
            let text = String::from_utf8_lossy(&content);
            for (index, line) in text.lines().enumerate() {
                if matcher.accepts(line) {
                    writeln!(ctx.io.stdout, "{}:{}:{}", file, index + 1, line)?;
                }
            }
            Ok(())
        })
        .collect();
    ctx.settle(results)
}

struct LineMatcher {
    regex: Regex,
    invert: bool,
}

impl LineMatcher {
    /// Unanchored search anywhere in the line.
    fn accepts(&self, line: &str) -> bool {
        self.regex.is_match(line) != self.invert
    }
}

fn grep_stdin(matcher: &LineMatcher, ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    let reader: &mut dyn BufRead = &mut *ctx.io.stdin;
    for line in reader.lines() {
        let line = line.map_err(|e| CommandError::io(STDIN_NAME, e))?;
        if matcher.accepts(&line) {
            writeln!(ctx.io.stdout, "{}", line)?;
        }
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub lines: usize,
    pub words: usize,
    pub bytes: usize,
}

impl Counts {
    /// Words are whitespace-delimited tokens; bytes are the raw length.
    pub fn of(content: &[u8]) -> Self {
        let text = String::from_utf8_lossy(content);
        Counts {
            lines: text.lines().count(),
            words: text.split_whitespace().count(),
            bytes: content.len(),
        }
    }

    fn add(&mut self, other: Counts) {
        self.lines += other.lines;
        self.words += other.words;
        self.bytes += other.bytes;
    }
}

impl std::fmt::Display for Counts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.lines, self.words, self.bytes)
    }
}

pub fn wc(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    if args.is_empty() {
        let result = read_stdin(ctx).and_then(|input| {
            writeln!(ctx.io.stdout, "{}", Counts::of(&input))?;
            Ok(())
        });
        return ctx.finish(result);
    }

    let mut total = Counts::default();
    let mut results = Vec::with_capacity(args.len());
    for file in args {
        let result = read_file(file, ctx).and_then(|content| {
            let counts = Counts::of(&content);
            total.add(counts);
            writeln!(ctx.io.stdout, "{} {}", counts, file)?;
            Ok(())
        });
        results.push(result);
    }
    if args.len() > 1 {
        results.push(writeln!(ctx.io.stdout, "{} total", total).map_err(CommandError::from));
    }
    ctx.settle(results)
}

pub fn sort(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let reverse = args.iter().any(|a| a == "-r");
    let unique = args.iter().any(|a| a == "-u");
    let files: Vec<&String> = args.iter().filter(|a| *a != "-r" && *a != "-u").collect();

    let mut lines: Vec<String> = Vec::new();
    let mut results = Vec::new();
    if files.is_empty() {
        match read_stdin(ctx) {
            Ok(input) => lines.extend(String::from_utf8_lossy(&input).lines().map(String::from)),
            Err(e) => results.push(Err(e)),
        }
    }
    for file in files {
        match read_file(file, ctx) {
            Ok(content) => {
                lines.extend(String::from_utf8_lossy(&content).lines().map(String::from))
            }
            Err(e) => results.push(Err(e)),
        }
    }

    lines.sort();
    if unique {
        lines.dedup();
    }
    if reverse {
        lines.reverse();
    }
    results.push(write_lines(ctx, lines.iter().map(String::as_str)));
    ctx.settle(results)
}

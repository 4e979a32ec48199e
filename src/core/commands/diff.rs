use std::io::Write;

use similar::{capture_diff_slices, Algorithm, DiffTag};

use super::text::read_file;
use super::{CommandError, Context, Outcome};

const CONTEXT_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit<'a> {
    Keep(&'a str),
    Delete(&'a str),
    Insert(&'a str),
}

/// Line edit script from `old` to `new`. Myers' algorithm keeps memory
/// linear in the input size.
fn edit_script<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<Edit<'a>> {
    let mut edits = Vec::with_capacity(old.len().max(new.len()));
    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        let deleted = old[old_range.clone()].iter().map(|&line| Edit::Delete(line));
        let inserted = new[new_range].iter().map(|&line| Edit::Insert(line));
        match tag {
            DiffTag::Equal => edits.extend(old[old_range].iter().map(|&line| Edit::Keep(line))),
            DiffTag::Delete => edits.extend(deleted),
            DiffTag::Insert => edits.extend(inserted),
            DiffTag::Replace => {
                edits.extend(deleted);
                edits.extend(inserted);
            }
        }
    }
    edits
}

/// A run of edits plus surrounding context, with 1-based start lines.
struct Hunk<'a> {
    old_start: usize,
    new_start: usize,
    edits: &'a [Edit<'a>],
}

impl Hunk<'_> {
    fn header(&self) -> String {
        let old_len = self
            .edits
            .iter()
            .filter(|e| !matches!(e, Edit::Insert(_)))
            .count();
        let new_len = self
            .edits
            .iter()
            .filter(|e| !matches!(e, Edit::Delete(_)))
            .count();
        format!(
            "@@ -{} +{} @@",
            range(self.old_start, old_len),
            range(self.new_start, new_len)
        )
    }
}

fn range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start.saturating_sub(1)),
        1 => start.to_string(),
        _ => format!("{},{}", start, len),
    }
}

/// Groups changes whose context windows touch into hunks.
fn hunks<'a>(edits: &'a [Edit<'a>]) -> Vec<Hunk<'a>> {
    let changed: Vec<usize> = edits
        .iter()
        .enumerate()
        .filter(|(_, e)| !matches!(e, Edit::Keep(_)))
        .map(|(i, _)| i)
        .collect();

    let mut spans: Vec<(usize, usize)> = Vec::new();
    for index in changed {
        let start = index.saturating_sub(CONTEXT_LINES);
        let end = (index + CONTEXT_LINES + 1).min(edits.len());
        match spans.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => spans.push((start, end)),
        }
    }

    spans
        .into_iter()
        .map(|(start, end)| {
            let before = &edits[..start];
            let old_start = before.iter().filter(|e| !matches!(e, Edit::Insert(_))).count() + 1;
            let new_start = before.iter().filter(|e| !matches!(e, Edit::Delete(_))).count() + 1;
            Hunk {
                old_start,
                new_start,
                edits: &edits[start..end],
            }
        })
        .collect()
}

/// Unified diff lines between two texts; empty when they are equal.
pub fn unified_diff(old_name: &str, new_name: &str, old: &str, new: &str) -> Vec<String> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let edits = edit_script(&old_lines, &new_lines);
    let hunks = hunks(&edits);
    if hunks.is_empty() {
        return Vec::new();
    }

    let mut out = vec![format!("--- {}", old_name), format!("+++ {}", new_name)];
    for hunk in hunks {
        out.push(hunk.header());
        out.extend(hunk.edits.iter().map(|edit| match edit {
            Edit::Keep(line) => format!(" {}", line),
            Edit::Delete(line) => format!("-{}", line),
            Edit::Insert(line) => format!("+{}", line),
        }));
    }
    out
}

pub fn diff(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let result = run_diff(args, ctx);
    ctx.finish(result)
}

fn run_diff(args: &[String], ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    let [first, second] = args else {
        return Err(CommandError::InvalidArgument(format!(
            "expected exactly two files, got {}",
            args.len()
        )));
    };

    let old = read_file(first, ctx)?;
    let new = read_file(second, ctx)?;
    let lines = unified_diff(
        first,
        second,
        &String::from_utf8_lossy(&old),
        &String::from_utf8_lossy(&new),
    );
    for line in lines {
        writeln!(ctx.io.stdout, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::{ErrorKind, Outcome};
    use crate::core::interpreter::testing::Harness;

    #[test]
    fn test_identical_texts() {
        assert!(unified_diff("a", "b", "x\ny\n", "x\ny\n").is_empty());
    }

    #[test]
    fn test_single_change() {
        let lines = unified_diff("a", "b", "one\ntwo\nthree\n", "one\n2\nthree\n");
        assert_eq!(
            lines,
            vec!["--- a", "+++ b", "@@ -1,3 +1,3 @@", " one", "-two", "+2", " three"]
        );
    }

    #[test]
    fn test_separate_hunks() {
        let old: String = (1..=20).map(|i| format!("{}\n", i)).collect();
        let new = old.replace("2\n", "two\n").replace("19\n", "nineteen\n");
        let lines = unified_diff("a", "b", &old, &new);
        let headers: Vec<&String> = lines.iter().filter(|l| l.starts_with("@@")).collect();
        assert_eq!(headers, vec!["@@ -1,5 +1,5 @@", "@@ -16,5 +16,5 @@"]);
    }

    #[test]
    fn test_insert_into_empty() {
        let lines = unified_diff("a", "b", "", "new\n");
        assert_eq!(lines, vec!["--- a", "+++ b", "@@ -0,0 +1 @@", "+new"]);
    }

    #[test]
    fn test_large_inputs() {
        let old: String = (1..=6000).map(|i| format!("line {}\n", i)).collect();
        let new: String = (1..=6000)
            .map(|i| match i {
                2500 => "changed\n".to_string(),
                _ => format!("line {}\n", i),
            })
            .collect();
        let lines = unified_diff("a", "b", &old, &new);
        assert_eq!(lines.len(), 2 + 1 + 8);
        assert_eq!(lines[2], "@@ -2497,7 +2497,7 @@");
        assert_eq!(lines[6], "-line 2500");
        assert_eq!(lines[7], "+changed");
    }

    #[test]
    fn test_diff_command() {
        let mut h = Harness::new();
        h.write("left", "a\nb\n");
        h.write("right", "a\nc\n");
        let (outcome, out, _) = h.run("diff left right");
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(out, "--- left\n+++ right\n@@ -1,2 +1,2 @@\n a\n-b\n+c\n");
    }

    #[test]
    fn test_diff_arity() {
        let mut h = Harness::new();
        h.write("only", "");
        let (outcome, _, err) = h.run("diff only");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::InvalidArgument));
        assert_eq!(err, "diff: expected exactly two files, got 1\n");

        let (outcome, _, _) = h.run("diff a b c");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::InvalidArgument));
    }

    #[test]
    fn test_diff_missing_file() {
        let mut h = Harness::new();
        h.write("left", "");
        let (outcome, _, err) = h.run("diff left nope");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::NotFound));
        assert_eq!(err, "diff: nope: No such file or directory\n");
    }
}

use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command as _;

use super::{Builtin, CommandError, Context, Outcome};

pub fn clear(_args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let result = clear_screen(ctx);
    ctx.finish(result)
}

fn clear_screen(ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    let mut sequence = String::new();
    Clear(ClearType::All)
        .write_ansi(&mut sequence)
        .and_then(|_| MoveTo(0, 0).write_ansi(&mut sequence))
        .map_err(|_| CommandError::Failed {
            target: "terminal".to_string(),
            reason: "cannot encode clear sequence".to_string(),
        })?;
    write!(ctx.io.stdout, "{}", sequence)?;
    ctx.io.stdout.flush()?;
    Ok(())
}

pub fn help(_args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let result = print_help(ctx);
    ctx.finish(result)
}

fn print_help(ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    let out = &mut *ctx.io.stdout;
    writeln!(out, "Built-in commands:")?;
    for builtin in Builtin::ALL {
        writeln!(out, "  {:<10} {}", builtin.name(), builtin.summary())?;
    }
    writeln!(out)?;
    writeln!(out, "Any other command is run as an external program.")?;
    writeln!(out, "Ctrl+R searches history, Ctrl+C cancels, Ctrl+D exits.")?;
    Ok(())
}

pub fn exit(_args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    ctx.state.running = false;
    let result = writeln!(ctx.io.stdout, "Goodbye!").map_err(CommandError::from);
    ctx.finish(result)
}

#[cfg(test)]
mod tests {
    use crate::core::commands::{Builtin, Outcome};
    use crate::core::interpreter::testing::Harness;

    #[test]
    fn test_clear_sequence() {
        let mut h = Harness::new();
        let (outcome, out, _) = h.run("clear");
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(out, "\x1b[2J\x1b[1;1H");
    }

    #[test]
    fn test_help_lists_every_builtin() {
        let mut h = Harness::new();
        let (outcome, out, _) = h.run("help");
        assert_eq!(outcome, Outcome::Success);
        for builtin in Builtin::ALL {
            assert!(
                out.lines()
                    .any(|l| l.split_whitespace().next() == Some(builtin.name())),
                "{} missing from help",
                builtin.name()
            );
        }
    }

    #[test]
    fn test_exit_and_quit_stop_the_loop() {
        for word in ["exit", "quit"] {
            let mut h = Harness::new();
            assert!(h.running());
            let (outcome, out, _) = h.run(word);
            assert_eq!(outcome, Outcome::Success);
            assert_eq!(out, "Goodbye!\n");
            assert!(!h.running());
        }
    }
}

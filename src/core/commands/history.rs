use std::io::Write;

use log::warn;

use super::{CommandError, Context, Outcome};

pub fn history(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let result = match args {
        [] => show(ctx.state.history.window(), ctx),
        [flag] if flag == "-c" => clear(ctx),
        [count] => match count.parse::<usize>() {
            Ok(n) => show(n, ctx),
            Err(_) => Err(CommandError::InvalidArgument(format!(
                "{}: numeric argument required",
                count
            ))),
        },
        _ => Err(CommandError::usage("history [-c | N]")),
    };
    ctx.finish(result)
}

fn show(count: usize, ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    for (i, line) in ctx.state.history.recent(count).iter().enumerate() {
        writeln!(ctx.io.stdout, "{:4}  {}", i + 1, line)?;
    }
    Ok(())
}

fn clear(ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    ctx.state.history.clear();
    if let Err(e) = ctx.io.editor.clear() {
        warn!("failed to clear line editor history: {}", e);
    }
    ctx.state.history.save().map_err(|e| CommandError::Failed {
        target: "history".to_string(),
        reason: e.to_string(),
    })?;
    writeln!(ctx.io.stdout, "History cleared")?;
    Ok(())
}

use std::io::Write;

use super::{CommandError, Context, Outcome};
use crate::core::config::ConfigError;

pub fn alias(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    if args.is_empty() {
        let result = list_aliases(ctx);
        return ctx.finish(result);
    }

    let joined = args.join(" ");
    if let Some((name, value)) = joined.split_once('=') {
        let result = define_alias(name.trim(), value, ctx);
        return ctx.finish(result);
    }

    let mut results = Vec::with_capacity(args.len());
    for name in args {
        let result = match ctx.state.aliases.get(name) {
            Some(value) => {
                let line = format!("alias {}='{}'", name, value);
                writeln!(ctx.io.stdout, "{}", line).map_err(CommandError::from)
            }
            None => Err(CommandError::UnknownName(name.clone())),
        };
        results.push(result);
    }
    ctx.settle(results)
}

fn list_aliases(ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    if ctx.state.aliases.is_empty() {
        writeln!(ctx.io.stdout, "No aliases defined")?;
        return Ok(());
    }
    for (name, value) in ctx.state.aliases.iter() {
        writeln!(ctx.io.stdout, "alias {}='{}'", name, value)?;
    }
    Ok(())
}

fn define_alias(name: &str, value: &str, ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(CommandError::InvalidArgument(format!(
            "'{}': invalid alias name",
            name
        )));
    }

    let value = value.trim_matches(|c: char| c == '\'' || c == '"');
    ctx.state
        .aliases
        .define(name, value)
        .map_err(|e| persist_failure(name, e))?;
    writeln!(ctx.io.stdout, "Alias created: {}='{}'", name, value)?;
    Ok(())
}

pub fn unalias(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    if args.is_empty() {
        return ctx.finish(Err(CommandError::usage("unalias name...")));
    }

    let mut results = Vec::with_capacity(args.len());
    for name in args {
        let result = match ctx.state.aliases.remove(name) {
            Ok(true) => writeln!(ctx.io.stdout, "Alias removed: {}", name).map_err(CommandError::from),
            Ok(false) => Err(CommandError::UnknownName(name.clone())),
            Err(e) => Err(persist_failure(name, e)),
        };
        results.push(result);
    }
    ctx.settle(results)
}

fn persist_failure(name: &str, err: ConfigError) -> CommandError {
    CommandError::Failed {
        target: name.to_string(),
        reason: err.to_string(),
    }
}

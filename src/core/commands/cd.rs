use std::ffi::CString;
use std::fs;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use super::{CommandError, Context, Outcome};

pub fn cd(args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let result = change_directory(args, ctx);
    ctx.finish(result)
}

pub fn pwd(_args: &[String], ctx: &mut Context<'_, '_>) -> Outcome {
    let result = writeln!(ctx.io.stdout, "{}", ctx.state.cwd.display()).map_err(CommandError::from);
    ctx.finish(result)
}

fn change_directory(args: &[String], ctx: &mut Context<'_, '_>) -> Result<(), CommandError> {
    let (shown, target) = match args.first() {
        Some(arg) => (arg.clone(), ctx.state.cwd.join(ctx.state.paths.expand(arg))),
        None => {
            let home = ctx
                .state
                .home()
                .ok_or_else(|| CommandError::InvalidArgument("HOME not set".to_string()))?;
            (home.display().to_string(), home.to_path_buf())
        }
    };

    let metadata = fs::metadata(&target).map_err(|e| CommandError::io(&shown, e))?;
    if !metadata.is_dir() {
        return Err(CommandError::NotADirectory(shown));
    }
    if !is_searchable(&target) {
        return Err(CommandError::PermissionDenied(shown));
    }

    let resolved: PathBuf = fs::canonicalize(&target).map_err(|e| CommandError::io(&shown, e))?;
    ctx.state.cwd = resolved;
    Ok(())
}

fn is_searchable(dir: &Path) -> bool {
    let Ok(c_path) = CString::new(dir.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}

#[cfg(test)]
mod tests {
    use crate::core::commands::{ErrorKind, Outcome};
    use crate::core::interpreter::testing::Harness;

    #[test]
    fn test_cd_relative_and_back() {
        let mut h = Harness::new();
        h.mkdir("sub/inner");

        assert_eq!(h.run("cd sub/inner").0, Outcome::Success);
        assert_eq!(h.cwd(), h.path("sub/inner"));

        assert_eq!(h.run("cd ..").0, Outcome::Success);
        assert_eq!(h.cwd(), h.path("sub"));
    }

    #[test]
    fn test_cd_home() {
        let mut h = Harness::new();
        h.mkdir("sub");
        h.run("cd sub");
        assert_eq!(h.run("cd").0, Outcome::Success);
        assert_eq!(h.cwd(), h.home());

        h.mkdir("sub/x");
        h.run("cd ~/sub/x");
        assert_eq!(h.cwd(), h.path("sub/x"));
    }

    #[test]
    fn test_cd_missing_leaves_cwd() {
        let mut h = Harness::new();
        let before = h.cwd();
        let (outcome, _, err) = h.run("cd nowhere");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::NotFound));
        assert_eq!(err, "cd: nowhere: No such file or directory\n");
        assert_eq!(h.cwd(), before);
    }

    #[test]
    fn test_cd_into_file() {
        let mut h = Harness::new();
        h.write("f.txt", "x");
        let (outcome, _, err) = h.run("cd f.txt");
        assert_eq!(outcome, Outcome::Failure(ErrorKind::GenericFailure));
        assert_eq!(err, "cd: f.txt: Not a directory\n");
    }

    #[test]
    fn test_pwd() {
        let mut h = Harness::new();
        let (outcome, out, _) = h.run("pwd");
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(out, format!("{}\n", h.cwd().display()));
    }
}

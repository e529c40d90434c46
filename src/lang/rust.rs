use std::path::{Path, PathBuf};
use std::process::Command;

use super::native_artifact;

pub(super) fn compile_command(source: &Path) -> Option<(Command, PathBuf)> {
    let artifact = native_artifact(source);
    let mut command = Command::new("rustc");
    command.arg("-O").arg(source).arg("-o").arg(&artifact);
    Some((command, artifact))
}

pub(super) fn run_command(program: &Path) -> Command {
    Command::new(program)
}

use std::path::{Path, PathBuf};
use std::process::Command;

pub(super) fn compile_command(_source: &Path) -> Option<(Command, PathBuf)> {
    None
}

pub(super) fn run_command(program: &Path) -> Command {
    let mut command = Command::new("python3");
    command.arg(program);
    command
}

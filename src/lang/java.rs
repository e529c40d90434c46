use std::path::{Path, PathBuf};
use std::process::Command;

fn class_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

/// `javac` writes `<stem>.class` next to the source, so the class must be named after the file.
pub(super) fn compile_command(source: &Path) -> Option<(Command, PathBuf)> {
    let artifact = source.with_extension("class");
    let mut command = Command::new("javac");
    command.arg(source).arg("-d").arg(class_dir(source));
    Some((command, artifact))
}

pub(super) fn run_command(program: &Path) -> Command {
    let class_name = program
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    let mut command = Command::new("java");
    command.arg("-cp").arg(class_dir(program)).arg(class_name);
    command
}

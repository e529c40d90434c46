mod c;
mod cpp;
mod java;
mod python;
mod rust;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{CpcError, Result};
use crate::models::Language;

// --- Shared helpers ---

fn native_artifact(source: &Path) -> PathBuf {
    source.with_extension("out")
}

fn describe(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().into_owned()];
    parts.extend(command.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

fn spawn_error(command: &Command, source: std::io::Error) -> CpcError {
    CpcError::Toolchain {
        command: command.get_program().to_string_lossy().into_owned(),
        source,
    }
}

// --- Dispatch functions ---

/// The compiler invocation and the artifact it produces; `None` for interpreted languages.
pub fn compile_command(lang: Language, source: &Path) -> Option<(Command, PathBuf)> {
    match lang {
        Language::Py => python::compile_command(source),
        Language::Cpp => cpp::compile_command(source),
        Language::C => c::compile_command(source),
        Language::Java => java::compile_command(source),
        Language::Rs => rust::compile_command(source),
    }
}

pub fn run_command(lang: Language, program: &Path) -> Command {
    match lang {
        Language::Py => python::run_command(program),
        Language::Cpp => cpp::run_command(program),
        Language::C => c::run_command(program),
        Language::Java => java::run_command(program),
        Language::Rs => rust::run_command(program),
    }
}

/// Compiles `source` and returns the path of the runnable program.
pub fn compile(lang: Language, source: &Path) -> Result<PathBuf> {
    if !source.exists() {
        return Err(CpcError::SolutionMissing(source.to_path_buf()));
    }

    let Some((mut command, artifact)) = compile_command(lang, source) else {
        debug!(source = %source.display(), "{} needs no compilation", lang.display_name());
        return Ok(source.to_path_buf());
    };

    debug!(command = %describe(&command), "compiling");
    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error(&command, e))?;
    debug!(status = %output.status, artifact = %artifact.display(), "compiler finished");

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CpcError::Compile {
            status: output.status.to_string(),
            output: format!("{}{}", stdout, stderr).trim().to_string(),
        });
    }

    Ok(artifact)
}

/// Runs a compiled program with the given streams and returns its exit code.
pub fn run(lang: Language, program: &Path, stdin: Stdio, stdout: Stdio) -> Result<i32> {
    let mut command = run_command(lang, program);
    debug!(command = %describe(&command), "running program");

    let status = command
        .stdin(stdin)
        .stdout(stdout)
        .status()
        .map_err(|e| spawn_error(&command, e))?;

    // Killed by a signal: no exit code.
    Ok(status.code().unwrap_or(-1))
}

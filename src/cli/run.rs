use std::process::Stdio;

use crate::error::{CpcError, Result};
use crate::judge::CODEFORCES;
use crate::lang;
use crate::models::ProblemId;

use super::Context;

/// Returns the program's exit code.
pub fn run_solution(context: &Context, problem: &ProblemId) -> Result<i32> {
    let solution = context
        .workspace
        .locate(CODEFORCES, problem, context.config.cpc.language);

    let program = match lang::compile(solution.language, &solution.path) {
        Ok(program) => program,
        Err(CpcError::Compile { status, output }) => {
            eprintln!("{}", output);
            return Err(CpcError::Compile {
                status,
                output: String::new(),
            });
        }
        Err(e) => return Err(e),
    };

    let code = lang::run(solution.language, &program, Stdio::inherit(), Stdio::inherit())?;
    if code != 0 {
        eprintln!("{} exited with {}", problem, code);
    }
    Ok(code)
}

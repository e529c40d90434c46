use crate::error::{CpcError, Result};
use crate::judge::CODEFORCES;
use crate::lang;
use crate::models::ProblemId;

use super::Context;

pub fn compile_solution(context: &Context, problem: &ProblemId) -> Result<()> {
    let solution = context
        .workspace
        .locate(CODEFORCES, problem, context.config.cpc.language);

    println!(
        "Compiling {} ({})...",
        solution.path.display(),
        solution.language.display_name()
    );

    match lang::compile(solution.language, &solution.path) {
        Ok(program) => {
            println!("Compiled to {}", program.display());
            Ok(())
        }
        Err(CpcError::Compile { status, output }) => {
            if !output.is_empty() {
                eprintln!("{}", output);
                eprintln!();
            }
            Err(CpcError::Compile {
                status,
                output: String::new(),
            })
        }
        Err(e) => Err(e),
    }
}

use chrono::Local;

use crate::error::Result;
use crate::judge::{self, CODEFORCES};
use crate::models::ProblemId;

use super::Context;

pub fn submit_solution(context: &Context, problem: &ProblemId) -> Result<()> {
    let solution = context
        .workspace
        .locate(CODEFORCES, problem, context.config.cpc.language);

    println!(
        "Submitting {} ({}) to {}...",
        solution.path.display(),
        solution.language.display_name(),
        CODEFORCES
    );

    let mut judge = judge::connect(CODEFORCES, &context.config)?;
    judge.submit(problem, &solution)?;

    println!(
        "Submitted {} at {}",
        problem,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

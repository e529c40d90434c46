use crate::error::Result;
use crate::judge::CODEFORCES;
use crate::models::{Language, ProblemId};
use crate::workspace::open_in_editor;

use super::Context;

pub fn edit_solution(context: &Context, problem: &ProblemId, language: Option<Language>) -> Result<()> {
    let language = language.unwrap_or_else(|| {
        context
            .workspace
            .locate(CODEFORCES, problem, context.config.cpc.language)
            .language
    });

    let solution = context.workspace.prepare(CODEFORCES, problem, language)?;
    open_in_editor(&context.config.editor(), &solution.path)?;

    println!(
        "{} solution for {}: {}",
        language.display_name(),
        problem,
        solution.path.display()
    );
    Ok(())
}

use crate::error::{CpcError, Result};
use crate::judge::{self, CODEFORCES};

use super::Context;

pub fn list_problems(context: &Context, contest: Option<u32>) -> Result<()> {
    let mut judge = judge::connect(CODEFORCES, &context.config)?;
    let catalogue = judge.catalogue()?;

    let Some(contest_id) = contest else {
        for contest in catalogue.labels() {
            println!("{}", contest);
        }
        println!();
        println!("{} contests", catalogue.len());
        return Ok(());
    };

    let contest = catalogue
        .find_container(&contest_id.to_string())
        .ok_or(CpcError::UnknownContest(contest_id))?;

    for problem in contest.problems() {
        let rating = problem
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:>5}  {}", rating, problem.label());
        if !problem.tags.is_empty() {
            println!("       {}", problem.tags.join(", "));
        }
    }
    Ok(())
}

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::CpcError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProblemId {
    pub contest_id: u32,
    pub index: String,
}

impl ProblemId {
    pub fn new(contest_id: u32, index: impl Into<String>) -> Self {
        Self {
            contest_id,
            index: index.into(),
        }
    }

    /// Path of the problem relative to a judge directory.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(self.contest_id.to_string()).join(&self.index)
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.contest_id, self.index)
    }
}

impl FromStr for ProblemId {
    type Err = CpcError;

    /// Parses `1352/A` as well as the compact `1352A` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CpcError::InvalidProblemId(s.to_string());

        let (contest, index) = match s.split_once('/') {
            Some((contest, index)) => (contest.trim(), index.trim()),
            None => {
                let split = s
                    .find(|c: char| !c.is_ascii_digit())
                    .ok_or_else(invalid)?;
                s.split_at(split)
            }
        };

        if index.is_empty() || !index.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        if !index.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let contest_id = contest.parse::<u32>().map_err(|_| invalid())?;

        Ok(ProblemId::new(contest_id, index.to_uppercase()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub id: ProblemId,
    pub name: String,
    pub solved_count: u64,
    pub rating: Option<u32>,
    pub tags: Vec<String>,
}

impl Problem {
    /// A problem known only by its id, e.g. when named on the command line.
    pub fn from_id(id: ProblemId) -> Self {
        Self {
            id,
            name: String::new(),
            solved_count: 0,
            rating: None,
            tags: Vec::new(),
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{}: {} (solved={})",
            self.id, self.name, self.solved_count
        )
    }
}

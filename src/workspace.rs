use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::error::{CpcError, Result};
use crate::models::{Language, ProblemId};

/// A solution file on disk and the language it is written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub path: PathBuf,
    pub language: Language,
}

/// Solutions live at `<root>/<judge>/<contest>/<index>/solution.<ext>`.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn problem_dir(&self, judge: &str, id: &ProblemId) -> PathBuf {
        self.root.join(judge).join(id.path())
    }

    pub fn solution(&self, judge: &str, id: &ProblemId, language: Language) -> Solution {
        Solution {
            path: self.problem_dir(judge, id).join(language.solution_file_name()),
            language,
        }
    }

    /// Creates the problem directory and an empty solution file if there is none yet.
    pub fn prepare(&self, judge: &str, id: &ProblemId, language: Language) -> Result<Solution> {
        let solution = self.solution(judge, id, language);
        if let Some(parent) = solution.path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&solution.path)?;
        debug!(path = %solution.path.display(), "prepared solution file");
        Ok(solution)
    }

    /// The most recently modified solution of the problem, falling back to the
    /// default language's path (which need not exist).
    pub fn locate(&self, judge: &str, id: &ProblemId, default: Language) -> Solution {
        let dir = self.problem_dir(judge, id);

        let newest = fs::read_dir(&dir)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.file_stem().is_some_and(|s| s == "solution"))
            .filter_map(|path| {
                let language = Language::from_path(&path)?;
                let modified = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                Some((modified, Solution { path, language }))
            })
            .max_by_key(|(modified, solution)| (*modified, solution.language == default))
            .map(|(_, solution)| solution);

        newest.unwrap_or_else(|| self.solution(judge, id, default))
    }
}

/// Runs `editor` (which may carry arguments, e.g. `code -w`) on `path` and waits for it.
pub fn open_in_editor(editor: &str, path: &Path) -> Result<()> {
    let mut words = editor.split_whitespace();
    let program = words.next().unwrap_or("vim");

    debug!(editor, path = %path.display(), "opening editor");
    let status = Command::new(program)
        .args(words)
        .arg(path)
        .status()
        .map_err(|source| CpcError::Toolchain {
            command: program.to_string(),
            source,
        })?;

    if !status.success() {
        warn!(%status, "editor exited unsuccessfully");
    }
    Ok(())
}

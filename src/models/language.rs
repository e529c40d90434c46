use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Py,
    Cpp,
    C,
    Java,
    Rs,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Py,
        Language::Cpp,
        Language::C,
        Language::Java,
        Language::Rs,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Py => "Python",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::Java => "Java",
            Language::Rs => "Rust",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Language::Py => "py",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Java => "java",
            Language::Rs => "rs",
        }
    }

    pub fn solution_file_name(&self) -> String {
        format!("solution.{}", self.extension())
    }

    pub fn from_extension(ext: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|l| l.extension() == ext)
    }

    pub fn from_path(path: &Path) -> Option<Language> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
    }

    /// Accepts the short name, the extension or the display name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Language> {
        let lowered = name.to_lowercase();
        Language::ALL.into_iter().find(|l| {
            lowered == l.extension()
                || lowered == l.display_name().to_lowercase()
                || (lowered == "python3" && *l == Language::Py)
                || (lowered == "c++" && *l == Language::Cpp)
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Language::from_name("cpp"), Some(Language::Cpp));
        assert_eq!(Language::from_name("C++"), Some(Language::Cpp));
        assert_eq!(Language::from_name("Python"), Some(Language::Py));
        assert_eq!(Language::from_name("python3"), Some(Language::Py));
        assert_eq!(Language::from_name("rust"), Some(Language::Rs));
        assert_eq!(Language::from_name("cobol"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path(Path::new("a/solution.java")), Some(Language::Java));
        assert_eq!(Language::from_path(Path::new("a/solution.out")), None);
        assert_eq!(Language::from_path(Path::new("a/solution")), None);
    }

    #[test]
    fn test_solution_file_name() {
        assert_eq!(Language::C.solution_file_name(), "solution.c");
        assert_eq!(Language::Rs.solution_file_name(), "solution.rs");
    }
}

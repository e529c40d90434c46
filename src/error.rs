use std::path::PathBuf;

use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, CpcError>;

#[derive(Debug, ThisError)]
pub enum CpcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Judge API error: {comment}")]
    Api { comment: String },

    #[error("Malformed judge response: {0}")]
    MalformedResponse(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Failed to start the browser: {0}")]
    BrowserStartup(String),

    #[error("Login failed; check the credentials in your config")]
    LoginFailed,

    #[error("Submission of {0} was not confirmed; check the problem page")]
    SubmitUnconfirmed(String),

    #[error("No solution found at {}", .0.display())]
    SolutionMissing(PathBuf),

    #[error("Compilation failed with {status}")]
    Compile { status: String, output: String },

    #[error("Failed to run {command}: {source}")]
    Toolchain {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid problem id '{0}', expected e.g. 1352/A")]
    InvalidProblemId(String),

    #[error("Contest {0} not found")]
    UnknownContest(u32),

    #[error("Unknown judge '{0}'")]
    UnknownJudge(String),
}

mod codeforces;

pub use codeforces::CodeforcesJudge;

use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::error::{CpcError, Result};
use crate::models::{Container, Entry, ProblemId};
use crate::workspace::Solution;

pub const CODEFORCES: &str = "Codeforces";

/// Judges listed in the menu that cpc cannot talk to yet.
pub const INCOMING: [&str; 3] = [
    "Kattis (Incoming)",
    "Project Euler (Incoming)",
    "ICPC (Incoming)",
];

/// A judge site: its problem catalogue and the browser actions on it.
pub trait Judge {
    fn name(&self) -> &str;

    fn is_logged_in(&self) -> bool;

    /// Fetches every problem, grouped into one container per contest.
    fn catalogue(&mut self) -> Result<Container>;

    fn log_in(&mut self) -> Result<()>;

    /// Shows the problem statement in the browser.
    fn load_problem(&mut self, id: &ProblemId) -> Result<()>;

    fn submit(&mut self, id: &ProblemId, solution: &Solution) -> Result<()>;
}

/// Creates judge clients by name, so the navigator can open them lazily.
pub type Connector = Box<dyn FnMut(&str) -> Result<Box<dyn Judge>>>;

pub fn connect(name: &str, config: &Config) -> Result<Box<dyn Judge>> {
    match name {
        CODEFORCES => Ok(Box::new(CodeforcesJudge::new(
            &config.codeforces,
            &config.browser,
        )?)),
        other => Err(CpcError::UnknownJudge(other.to_string())),
    }
}

/// The top-level menu: one empty container per judge, filled on first visit.
pub fn root_menu() -> Container {
    let mut entries = vec![Entry::Container(Container::empty(CODEFORCES))];
    entries.extend(
        INCOMING
            .iter()
            .map(|name| Entry::Container(Container::empty(*name))),
    );
    Container::new("cpc", entries)
}

pub fn is_supported(name: &str) -> bool {
    name == CODEFORCES
}

pub fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// Secrets only ever reach the logs as digests.
pub fn hexdigest(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_trailing_slash() {
        assert_eq!(with_trailing_slash("http://codeforces.com"), "http://codeforces.com/");
        assert_eq!(with_trailing_slash("http://codeforces.com/"), "http://codeforces.com/");
    }

    #[test]
    fn test_hexdigest() {
        assert_eq!(
            hexdigest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_root_menu() {
        let menu = root_menu();
        assert_eq!(
            menu.labels(),
            vec![
                "Codeforces (0)",
                "Kattis (Incoming) (0)",
                "Project Euler (Incoming) (0)",
                "ICPC (Incoming) (0)",
            ]
        );
        assert!(is_supported(CODEFORCES));
        assert!(!is_supported("Kattis (Incoming)"));
    }

    #[test]
    fn test_connect_unknown() {
        assert!(matches!(
            connect("Kattis (Incoming)", &Config::default()),
            Err(CpcError::UnknownJudge(_))
        ));
        let judge = connect(CODEFORCES, &Config::default()).unwrap();
        assert_eq!(judge.name(), CODEFORCES);
        assert!(!judge.is_logged_in());
    }
}

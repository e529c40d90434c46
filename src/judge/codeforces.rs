use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{hexdigest, with_trailing_slash, Judge, CODEFORCES};
use crate::browser::Browser;
use crate::config::{BrowserConfig, CodeforcesConfig};
use crate::error::{CpcError, Result};
use crate::models::{Container, Entry, Problem, ProblemId};
use crate::workspace::Solution;

const API_TIMEOUT: Duration = Duration::from_secs(60);
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    status: String,
    comment: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemsetResult {
    problems: Vec<ApiProblem>,
    problem_statistics: Vec<ApiStatistic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiProblem {
    #[serde(default)]
    contest_id: Option<u32>,
    index: String,
    name: String,
    #[serde(default)]
    rating: Option<u32>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiStatistic {
    #[serde(default)]
    contest_id: Option<u32>,
    index: String,
    solved_count: u64,
}

pub struct CodeforcesJudge {
    username: String,
    password: String,
    url: String,
    api_url: String,
    http: Client,
    browser_config: BrowserConfig,
    browser: Option<Browser>,
    logged_in: bool,
}

impl CodeforcesJudge {
    pub fn new(config: &CodeforcesConfig, browser_config: &BrowserConfig) -> Result<Self> {
        info!(username = %config.username, "codeforces username from config");
        info!(sha256 = %hexdigest(&config.password), "codeforces password from config");
        info!(sha256 = %hexdigest(&config.key), "codeforces key from config");
        info!(sha256 = %hexdigest(&config.secret), "codeforces secret from config");

        let url = with_trailing_slash(&config.url);
        let api_url = format!("{}api/", url);
        debug!(%api_url, "codeforces api");

        Ok(Self {
            username: config.username.clone(),
            password: config.password.clone(),
            url,
            api_url,
            http: Client::builder().timeout(API_TIMEOUT).build()?,
            browser_config: browser_config.clone(),
            browser: None,
            logged_in: false,
        })
    }

    pub fn problem_url(&self, id: &ProblemId) -> String {
        format!(
            "{}problemset/problem/{}/{}",
            self.url, id.contest_id, id.index
        )
    }

    /// The browser is only started once something needs it.
    fn browser(&mut self) -> Result<&Browser> {
        let browser = match self.browser.take() {
            Some(browser) => browser,
            None => {
                debug!("codeforces firing up the browser");
                Browser::launch(&self.browser_config)?
            }
        };
        Ok(self.browser.insert(browser))
    }
}

impl Judge for CodeforcesJudge {
    fn name(&self) -> &str {
        CODEFORCES
    }

    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn catalogue(&mut self) -> Result<Container> {
        let url = format!("{}problemset.problems", self.api_url);
        debug!(%url, "getting problems");

        let response = self.http.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;
        debug!(%status, bytes = body.len(), "problemset response");

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        build_catalogue(&body)
    }

    fn log_in(&mut self) -> Result<()> {
        info!(url = %self.url, username = %self.username, "attempting codeforces login");
        let enter_url = format!("{}enter", self.url);
        let username = self.username.clone();
        let password = self.password.clone();
        let home = self.url.clone();

        let browser = self.browser()?;
        browser.goto(&enter_url)?;
        browser.fill("#enterForm #handle", &username)?;
        browser.fill("#enterForm #password", &password)?;
        browser.click_and_wait("#enterForm .submit")?;

        let landed = browser.current_url();
        self.logged_in = landed == home;
        info!(logged_in = self.logged_in, %landed, "codeforces login finished");

        if self.logged_in {
            Ok(())
        } else {
            Err(CpcError::LoginFailed)
        }
    }

    fn load_problem(&mut self, id: &ProblemId) -> Result<()> {
        let url = self.problem_url(id);
        debug!(%url, "loading problem");

        let browser = self.browser()?;
        if browser.current_url() == url {
            return Ok(());
        }

        browser.goto(&url)?;
        browser.scroll_into_view(".problem-statement")?;
        browser.evaluate("window.scrollBy(-window.screenX, 0)")?;
        Ok(())
    }

    fn submit(&mut self, id: &ProblemId, solution: &Solution) -> Result<()> {
        if !solution.path.is_file() {
            return Err(CpcError::SolutionMissing(solution.path.clone()));
        }
        let path = absolute(&solution.path)?;

        if !self.logged_in {
            self.log_in()?;
        }
        self.load_problem(id)?;

        info!(problem = %id, path = %path.display(), "submitting solution");
        let problem_url = self.problem_url(id);
        let browser = self.browser()?;
        browser.attach_file("input[name=sourceFile]", &path)?;
        browser.script_click("input.submit")?;

        // The script click does not wait for the form to be posted.
        await_redirect(|| browser.current_url(), &problem_url, id, SUBMIT_TIMEOUT)
    }
}

/// Codeforces leaves the problem page once it accepts a submission; a rejected one
/// (a duplicate, say) is reported inline and the page stays.
fn await_redirect(
    mut current_url: impl FnMut() -> String,
    problem_url: &str,
    id: &ProblemId,
    timeout: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let url = current_url();
        if url != problem_url {
            info!(problem = %id, %url, "submission posted");
            return Ok(());
        }
        if Instant::now() >= deadline {
            warn!(problem = %id, "still on the problem page after submitting");
            return Err(CpcError::SubmitUnconfirmed(id.to_string()));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Failed API calls still carry a JSON comment.
fn api_error(status: StatusCode, body: &str) -> CpcError {
    let comment = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .ok()
        .and_then(|r| r.comment)
        .unwrap_or_else(|| format!("HTTP {}", status));
    CpcError::Api { comment }
}

fn absolute(path: &Path) -> Result<std::path::PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Builds the contest tree from a `problemset.problems` response body.
fn build_catalogue(body: &str) -> Result<Container> {
    let response: ApiResponse<ProblemsetResult> = serde_json::from_str(body)?;

    if response.status != "OK" {
        return Err(CpcError::Api {
            comment: response
                .comment
                .unwrap_or_else(|| format!("status {}", response.status)),
        });
    }

    let result = response
        .result
        .ok_or_else(|| CpcError::MalformedResponse("OK response without result".to_string()))?;

    if result.problems.len() != result.problem_statistics.len() {
        return Err(CpcError::MalformedResponse(format!(
            "{} problems but {} statistics",
            result.problems.len(),
            result.problem_statistics.len()
        )));
    }

    let solved: HashMap<(u32, String), u64> = result
        .problem_statistics
        .into_iter()
        .filter_map(|s| s.contest_id.map(|c| ((c, s.index), s.solved_count)))
        .collect();

    let mut contests: BTreeMap<u32, Vec<Problem>> = BTreeMap::new();
    for problem in result.problems {
        let Some(contest_id) = problem.contest_id else {
            debug!(name = %problem.name, "skipping problem without contest");
            continue;
        };
        let solved_count = match solved.get(&(contest_id, problem.index.clone())) {
            Some(count) => *count,
            None => {
                warn!(contest_id, index = %problem.index, "no statistics for problem");
                0
            }
        };
        contests.entry(contest_id).or_default().push(Problem {
            id: ProblemId::new(contest_id, problem.index),
            name: problem.name,
            solved_count,
            rating: problem.rating,
            tags: problem.tags,
        });
    }

    let entries = contests
        .into_iter()
        .map(|(contest_id, mut problems)| {
            problems.sort_by(|a, b| a.id.index.cmp(&b.id.index));
            Entry::Container(Container::new(
                contest_id.to_string(),
                problems.into_iter().map(Entry::Problem).collect(),
            ))
        })
        .collect();

    let catalogue = Container::new(CODEFORCES, entries);
    info!(contests = catalogue.len(), "codeforces catalogue loaded");
    Ok(catalogue)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEMSET: &str = r#"{
        "status": "OK",
        "result": {
            "problems": [
                {"contestId": 1352, "index": "B", "name": "Same Parity Summands", "type": "PROGRAMMING", "rating": 1200, "tags": ["constructive algorithms", "math"]},
                {"contestId": 1352, "index": "A", "name": "Sum of Round Numbers", "type": "PROGRAMMING", "rating": 800, "tags": ["implementation", "math"]},
                {"contestId": 4, "index": "A", "name": "Watermelon", "type": "PROGRAMMING", "rating": 800, "tags": ["brute force", "math"]},
                {"problemsetName": "acmsguru", "index": "100", "name": "A+B", "type": "PROGRAMMING", "tags": []}
            ],
            "problemStatistics": [
                {"contestId": 1352, "index": "B", "solvedCount": 30000},
                {"contestId": 1352, "index": "A", "solvedCount": 40000},
                {"contestId": 4, "index": "A", "solvedCount": 900000},
                {"index": "100", "solvedCount": 5}
            ]
        }
    }"#;

    fn judge(url: &str) -> CodeforcesJudge {
        let config = CodeforcesConfig {
            url: url.to_string(),
            ..CodeforcesConfig::default()
        };
        CodeforcesJudge::new(&config, &BrowserConfig::default()).unwrap()
    }

    #[test]
    fn test_build_catalogue() {
        let catalogue = build_catalogue(PROBLEMSET).unwrap();
        assert_eq!(catalogue.name, CODEFORCES);
        assert_eq!(catalogue.labels(), vec!["4 (1)", "1352 (2)"]);

        let contest = catalogue.find_container("1352").unwrap();
        assert_eq!(
            contest.labels(),
            vec![
                "1352/A: Sum of Round Numbers (solved=40000)",
                "1352/B: Same Parity Summands (solved=30000)",
            ]
        );

        let first = contest.problems().next().unwrap();
        assert_eq!(first.rating, Some(800));
        assert_eq!(first.tags, vec!["implementation", "math"]);
    }

    #[test]
    fn test_build_catalogue_failed_status() {
        let body = r#"{"status": "FAILED", "comment": "Call limit exceeded"}"#;
        match build_catalogue(body) {
            Err(CpcError::Api { comment }) => assert_eq!(comment, "Call limit exceeded"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_build_catalogue_mismatched_statistics() {
        let body = r#"{
            "status": "OK",
            "result": {
                "problems": [{"contestId": 4, "index": "A", "name": "Watermelon"}],
                "problemStatistics": []
            }
        }"#;
        assert!(matches!(
            build_catalogue(body),
            Err(CpcError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_build_catalogue_missing_statistic() {
        let body = r#"{
            "status": "OK",
            "result": {
                "problems": [{"contestId": 4, "index": "A", "name": "Watermelon"}],
                "problemStatistics": [{"contestId": 5, "index": "A", "solvedCount": 7}]
            }
        }"#;
        let catalogue = build_catalogue(body).unwrap();
        let contest = catalogue.find_container("4").unwrap();
        assert_eq!(contest.labels(), vec!["4/A: Watermelon (solved=0)"]);
    }

    #[test]
    fn test_api_error_from_failed_call() {
        let body = r#"{"status": "FAILED", "comment": "handles: User with handle x not found"}"#;
        match api_error(StatusCode::BAD_REQUEST, body) {
            CpcError::Api { comment } => {
                assert_eq!(comment, "handles: User with handle x not found")
            }
            other => panic!("unexpected {:?}", other),
        }

        match api_error(StatusCode::SERVICE_UNAVAILABLE, "<html>busy</html>") {
            CpcError::Api { comment } => assert_eq!(comment, "HTTP 503 Service Unavailable"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_await_redirect() {
        let id = ProblemId::new(4, "A");
        let problem_url = "https://codeforces.com/problemset/problem/4/A";

        let mut polls = 0;
        let result = await_redirect(
            || {
                polls += 1;
                if polls < 3 {
                    problem_url.to_string()
                } else {
                    "https://codeforces.com/problemset/status?my=on".to_string()
                }
            },
            problem_url,
            &id,
            Duration::from_secs(5),
        );
        assert!(result.is_ok());
        assert_eq!(polls, 3);
    }

    #[test]
    fn test_await_redirect_times_out_on_problem_page() {
        let id = ProblemId::new(4, "A");
        let problem_url = "https://codeforces.com/problemset/problem/4/A";
        match await_redirect(|| problem_url.to_string(), problem_url, &id, Duration::ZERO) {
            Err(CpcError::SubmitUnconfirmed(problem)) => assert_eq!(problem, "4/A"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_build_catalogue_invalid_json() {
        assert!(matches!(build_catalogue("<html>"), Err(CpcError::Json(_))));
    }

    #[test]
    fn test_urls() {
        let judge = judge("http://codeforces.com");
        assert_eq!(judge.url, "http://codeforces.com/");
        assert_eq!(judge.api_url, "http://codeforces.com/api/");
        assert_eq!(
            judge.problem_url(&ProblemId::new(1352, "A")),
            "http://codeforces.com/problemset/problem/1352/A"
        );
    }

    #[test]
    fn test_submit_requires_solution() {
        let dir = tempfile::tempdir().unwrap();
        let mut judge = judge("http://codeforces.com/");
        let solution = Solution {
            path: dir.path().join("solution.py"),
            language: crate::models::Language::Py,
        };
        assert!(matches!(
            judge.submit(&ProblemId::new(4, "A"), &solution),
            Err(CpcError::SolutionMissing(_))
        ));
        assert!(judge.browser.is_none());
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CpcError, Result};
use crate::models::Language;

pub const DEFAULT_CODEFORCES_URL: &str = "https://codeforces.com/";

const TEMPLATE: &str = r#"# cpc configuration

[cpc]
# Where solutions are stored: <path>/<judge>/<contest>/<index>/solution.<ext>
path = "~/cpc"
# editor = "vim"
language = "py"

[codeforces]
username = ""
password = ""
key = ""
secret = ""
url = "https://codeforces.com/"

[browser]
# path = "/usr/bin/chromium"
headless = false
args = ["--incognito"]
# Seconds the browser may sit idle (e.g. while you edit) before cpc drops it.
idle_timeout_secs = 3600
"#;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cpc: GeneralConfig,
    pub codeforces: CodeforcesConfig,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub path: PathBuf,
    pub editor: Option<String>,
    pub language: Language,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("~/cpc"),
            editor: None,
            language: Language::Py,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodeforcesConfig {
    pub username: String,
    pub password: String,
    pub key: String,
    pub secret: String,
    pub url: String,
}

impl Default for CodeforcesConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            key: String::new(),
            secret: String::new(),
            url: DEFAULT_CODEFORCES_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Chrome binary; found on the system when unset.
    pub path: Option<PathBuf>,
    pub headless: bool,
    pub args: Vec<String>,
    pub idle_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            path: None,
            headless: false,
            args: vec!["--incognito".to_string()],
            idle_timeout_secs: 3600,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cpc.path.as_os_str().is_empty() {
            return Err(CpcError::Config("cpc.path must not be empty".to_string()));
        }
        if self.codeforces.url.trim().is_empty() {
            return Err(CpcError::Config("codeforces.url must not be empty".to_string()));
        }
        if self.browser.idle_timeout_secs == 0 {
            return Err(CpcError::Config(
                "browser.idle_timeout_secs must not be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Root directory for solutions, with a leading `~` expanded.
    pub fn solutions_root(&self) -> PathBuf {
        expand_home(&self.cpc.path)
    }

    /// The configured editor, then `$EDITOR`, then vim.
    pub fn editor(&self) -> String {
        self.cpc
            .editor
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "vim".to_string())
    }
}

pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CpcError::Config("could not determine home directory".to_string()))?;
    Ok(home.join(".config").join("cpc").join("config.toml"))
}

/// Loads the config at `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        info!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    debug!(path = %path.display(), "reading config");
    let contents = fs::read_to_string(path)?;
    Config::parse(&contents)
}

/// Writes the commented template unless a config already exists. Returns whether it wrote.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, TEMPLATE)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    info!(path = %path.display(), "wrote config template");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses() {
        let config = Config::parse(TEMPLATE).unwrap();
        assert_eq!(config.cpc.language, Language::Py);
        assert_eq!(config.codeforces.url, DEFAULT_CODEFORCES_URL);
        assert!(!config.browser.headless);
        assert_eq!(config.browser.args, vec!["--incognito".to_string()]);
        assert_eq!(config.browser.idle_timeout_secs, 3600);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [codeforces]
            username = "tourist"
            password = "hunter2"
            "#,
        )
        .unwrap();
        assert_eq!(config.codeforces.username, "tourist");
        assert_eq!(config.codeforces.url, DEFAULT_CODEFORCES_URL);
        assert!(config.browser.path.is_none());
        assert_eq!(config.cpc.path, PathBuf::from("~/cpc"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::parse("[codeforces]\nurl = \"\"\n"),
            Err(CpcError::Config(_))
        ));
        assert!(matches!(
            Config::parse("[browser]\nidle_timeout_secs = 0\n"),
            Err(CpcError::Config(_))
        ));
        assert!(matches!(
            Config::parse("[cpc]\nlanguage = \"cobol\"\n"),
            Err(CpcError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_expand_home() {
        let absolute = PathBuf::from("/tmp/cpc");
        assert_eq!(expand_home(&absolute), absolute);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/cpc")), home.join("cpc"));
        }
    }

    #[test]
    fn test_editor_from_config() {
        let mut config = Config::default();
        config.cpc.editor = Some("nano".to_string());
        assert_eq!(config.editor(), "nano");
    }

    #[test]
    fn test_load_and_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_config(&path).unwrap();
        assert!(config.codeforces.username.is_empty());

        assert!(init_config(&path).unwrap());
        assert!(!init_config(&path).unwrap());

        let config = load_config(&path).unwrap();
        assert_eq!(config.browser.idle_timeout_secs, 3600);
    }
}

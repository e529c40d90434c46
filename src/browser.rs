use std::ffi::OsStr;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Element, LaunchOptions, Tab};
use tracing::{debug, info};

use crate::config::BrowserConfig;
use crate::error::{CpcError, Result};

/// A Chrome window with a single tab. Chrome exits when this is dropped.
pub struct Browser {
    tab: Arc<Tab>,
    _chrome: headless_chrome::Browser,
}

impl Browser {
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        info!(headless = config.headless, path = ?config.path, "launching chrome");
        let chrome = headless_chrome::Browser::new(launch_options(config)?)
            .map_err(|e| CpcError::BrowserStartup(e.to_string()))?;
        let tab = chrome.new_tab().map_err(browser_error)?;
        Ok(Self {
            tab,
            _chrome: chrome,
        })
    }

    pub fn goto(&self, url: &str) -> Result<()> {
        debug!(url, "navigating");
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(browser_error)?;
        Ok(())
    }

    pub fn current_url(&self) -> String {
        self.tab.get_url()
    }

    pub fn fill(&self, selector: &str, text: &str) -> Result<()> {
        self.find(selector)?.type_into(text).map_err(browser_error)?;
        Ok(())
    }

    /// Clicks and waits for the page it leads to.
    pub fn click_and_wait(&self, selector: &str) -> Result<()> {
        self.find(selector)?.click().map_err(browser_error)?;
        self.tab.wait_until_navigated().map_err(browser_error)?;
        Ok(())
    }

    /// Clicks through a script, for buttons hidden behind other elements.
    pub fn script_click(&self, selector: &str) -> Result<()> {
        self.find(selector)?
            .call_js_fn("function() { this.click(); }", Vec::new(), false)
            .map_err(browser_error)?;
        Ok(())
    }

    pub fn attach_file(&self, selector: &str, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.find(selector)?
            .set_input_files(&[&*path])
            .map_err(browser_error)?;
        Ok(())
    }

    pub fn scroll_into_view(&self, selector: &str) -> Result<()> {
        self.find(selector)?.scroll_into_view().map_err(browser_error)?;
        Ok(())
    }

    pub fn evaluate(&self, script: &str) -> Result<()> {
        self.tab.evaluate(script, false).map_err(browser_error)?;
        Ok(())
    }

    fn find(&self, selector: &str) -> Result<Element<'_>> {
        self.tab
            .wait_for_element(selector)
            .map_err(|e| CpcError::Browser(format!("{}: {}", selector, e)))
    }
}

fn browser_error(e: impl Display) -> CpcError {
    CpcError::Browser(e.to_string())
}

fn launch_options(config: &BrowserConfig) -> Result<LaunchOptions<'_>> {
    LaunchOptions::default_builder()
        .headless(config.headless)
        .path(config.path.clone())
        .args(config.args.iter().map(OsStr::new).collect())
        .idle_browser_timeout(Duration::from_secs(config.idle_timeout_secs))
        .build()
        .map_err(|e| CpcError::BrowserStartup(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_options_from_config() {
        let config = BrowserConfig::default();
        let options = launch_options(&config).unwrap();
        assert!(!options.headless);
        assert_eq!(options.args, vec![OsStr::new("--incognito")]);
        assert_eq!(options.idle_browser_timeout, Duration::from_secs(3600));
        assert!(options.path.is_none());
    }

    #[test]
    fn test_launch_options_custom() {
        let config = BrowserConfig {
            path: Some("/usr/bin/chromium".into()),
            headless: true,
            args: Vec::new(),
            idle_timeout_secs: 60,
        };
        let options = launch_options(&config).unwrap();
        assert!(options.headless);
        assert!(options.args.is_empty());
        assert_eq!(options.path, Some("/usr/bin/chromium".into()));
        assert_eq!(options.idle_browser_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_browser_error_keeps_message() {
        match browser_error("no node found for selector") {
            CpcError::Browser(message) => assert_eq!(message, "no node found for selector"),
            other => panic!("unexpected {:?}", other),
        }
    }
}

use std::collections::VecDeque;
use std::process::Stdio;

use tracing::{debug, info, warn};

use crate::error::{CpcError, Result};
use crate::judge::{self, Connector, Judge};
use crate::lang;
use crate::models::{Container, Entry, Language, ProblemId};
use crate::ui::list_view::wait_for_enter;
use crate::ui::{Canvas, Key, KeySource, ListView};
use crate::workspace::{open_in_editor, Workspace};

const HISTORY_LEN: usize = 3;
const PAGE: isize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Edit,
    Submit,
    Test,
    Compile,
    Run,
}

impl Command {
    const NAMES: [(&'static str, Command); 5] = [
        (":edit", Command::Edit),
        (":submit", Command::Submit),
        (":test", Command::Test),
        (":compile", Command::Compile),
        (":run", Command::Run),
    ];

    /// Any prefix of a command name selects it; earlier names win.
    pub fn parse(word: &str) -> Option<Command> {
        Self::NAMES
            .iter()
            .find(|(name, _)| name.starts_with(word))
            .map(|(_, command)| *command)
    }
}

/// The container `path` leads to, if every step is a container.
fn walk<'a>(container: &'a mut Container, path: &[usize]) -> Option<&'a mut Container> {
    match path.split_first() {
        None => Some(container),
        Some((&index, rest)) => match container.entries.get_mut(index)? {
            Entry::Container(child) => walk(child, rest),
            Entry::Problem(_) => None,
        },
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim(), ":q" | ":wq" | ":q!" | ":wq!")
}

/// The interactive navigator: a stack of containers from the judge menu down to problems.
pub struct App<C: Canvas> {
    view: ListView<C>,
    root: Container,
    /// Indices leading from `root` to the container on screen.
    path: Vec<usize>,
    judge: Option<Box<dyn Judge>>,
    connector: Connector,
    workspace: Workspace,
    language: Language,
    editor: String,
    count: usize,
    history: VecDeque<Key>,
    command: Option<String>,
}

impl<C: Canvas> App<C> {
    pub fn new(
        canvas: C,
        connector: Connector,
        workspace: Workspace,
        language: Language,
        editor: String,
    ) -> Result<Self> {
        let root = judge::root_menu();
        let mut view = ListView::new(canvas);
        view.set_selection(root.labels(), None)?;
        view.set_status_bar("")?;

        Ok(Self {
            view,
            root,
            path: Vec::new(),
            judge: None,
            connector,
            workspace,
            language,
            editor,
            count: 0,
            history: VecDeque::with_capacity(HISTORY_LEN),
            command: None,
        })
    }

    #[cfg(test)]
    pub fn view(&self) -> &ListView<C> {
        &self.view
    }

    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    #[cfg(test)]
    pub fn has_judge(&self) -> bool {
        self.judge.is_some()
    }

    fn current(&self) -> &Container {
        let mut container = &self.root;
        for &index in &self.path {
            match container.entries.get(index) {
                Some(Entry::Container(child)) => container = child,
                _ => break,
            }
        }
        container
    }

    fn selected_problem(&self) -> Option<ProblemId> {
        match self.current().get(self.view.index()) {
            Some(Entry::Problem(problem)) => Some(problem.id.clone()),
            _ => None,
        }
    }

    fn judge_name(&self) -> String {
        self.judge
            .as_ref()
            .map(|j| j.name().to_string())
            .unwrap_or_else(|| judge::CODEFORCES.to_string())
    }

    fn remember(&mut self, key: Key) {
        self.history.push_front(key);
        self.history.truncate(HISTORY_LEN);
    }

    pub fn handle_key(&mut self, key: Key) -> Result<Outcome> {
        debug!(?key, count = self.count, history = ?self.history, "key pressed");

        if key == Key::Ctrl('c') {
            info!("interrupted");
            return Ok(Outcome::Quit);
        }

        if let Some(command) = self.command.take() {
            return self.handle_command_key(command, key);
        }

        if let Key::Char(c) = key {
            if let Some(digit) = c.to_digit(10) {
                self.count = self.count.saturating_mul(10).saturating_add(digit as usize);
                debug!(count = self.count, "count changed");
                self.remember(key);
                return Ok(Outcome::Continue);
            }
        }

        let step = if self.count == 0 {
            1
        } else {
            isize::try_from(self.count).unwrap_or(isize::MAX)
        };
        let mut status = key.echo();
        let mut add_to_history = true;

        match key {
            Key::Resize => {
                // Keeps the count and history.
                self.view.refresh()?;
                return Ok(Outcome::Continue);
            }
            Key::Char('j') | Key::Down => self.view.move_selection(step)?,
            Key::Char('k') | Key::Up => self.view.move_selection(-step)?,
            Key::PageDown => self.view.move_selection(step.saturating_mul(PAGE))?,
            Key::PageUp => self.view.move_selection(-step.saturating_mul(PAGE))?,
            Key::Home => self.view.select_first()?,
            Key::Char('g') if self.history.front() == Some(&Key::Char('g')) => {
                self.view.select_first()?;
                self.history.clear();
                add_to_history = false;
                status = "gg".to_string();
            }
            Key::End | Key::Char('G') => self.view.select_last()?,
            Key::Ctrl('e') => self.view.move_viewport(step)?,
            Key::Ctrl('y') => self.view.move_viewport(-step)?,
            Key::Char(':') => {
                self.command = Some(":".to_string());
                self.history.clear();
                add_to_history = false;
            }
            Key::Char('l') | Key::Right | Key::Enter => {
                if let Some(message) = self.descend()? {
                    status = message;
                }
            }
            Key::Char('h') | Key::Left | Key::Backspace => self.ascend()?,
            _ => {}
        }

        self.count = 0;
        self.view.set_status_bar(&status)?;
        if add_to_history {
            self.remember(key);
        }
        Ok(Outcome::Continue)
    }

    fn handle_command_key(&mut self, mut command: String, key: Key) -> Result<Outcome> {
        match key {
            Key::Enter => {
                info!(%command, "executing command");
                if is_quit(&command) {
                    return Ok(Outcome::Quit);
                }
                let message = self.execute(&command)?;
                self.view.set_status_bar(&message)?;
            }
            Key::Esc => self.view.set_status_bar("")?,
            Key::Backspace => {
                command.pop();
                self.view.set_status_bar(&command)?;
                if !command.is_empty() {
                    self.command = Some(command);
                }
            }
            Key::Char(c) => {
                command.push(c);
                self.view.set_status_bar(&command)?;
                self.command = Some(command);
            }
            Key::Resize => {
                self.view.refresh()?;
                self.command = Some(command);
            }
            _ => self.command = Some(command),
        }
        Ok(Outcome::Continue)
    }

    /// Runs a `:` command line and returns the status bar message.
    fn execute(&mut self, line: &str) -> Result<String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = words.first() else {
            return Ok(String::new());
        };

        let message = match Command::parse(first) {
            Some(Command::Edit) => match words.get(1) {
                Some(name) => match Language::from_name(name) {
                    Some(language) => self.edit_selected(Some(language))?,
                    None => format!("Unknown language '{}'", name),
                },
                None => self.edit_selected(None)?,
            },
            Some(Command::Submit) => self.submit_selected(),
            Some(Command::Test) => "Testing is not implemented".to_string(),
            Some(Command::Compile) => self.compile_selected()?,
            Some(Command::Run) => self.run_selected()?,
            None => "Not a command".to_string(),
        };
        Ok(message)
    }

    fn save_status(&mut self) {
        let status = self.view.status();
        if let Some(container) = walk(&mut self.root, &self.path) {
            container.status = Some(status);
        }
    }

    fn show_current(&mut self) -> Result<()> {
        let current = self.current();
        let labels = current.labels();
        let status = current.status;
        self.view.set_selection(labels, status)
    }

    /// Enters the selected container or opens the selected problem.
    fn descend(&mut self) -> Result<Option<String>> {
        let index = self.view.index();
        let (name, is_empty) = match self.current().get(index) {
            Some(Entry::Container(container)) => (container.name.clone(), container.is_empty()),
            Some(Entry::Problem(problem)) => {
                let id = problem.id.clone();
                return self.open_problem(id).map(Some);
            }
            None => return Ok(None),
        };

        if self.path.is_empty() {
            if !judge::is_supported(&name) {
                return Ok(Some(format!("{} is not supported yet", name)));
            }
            if self.judge.is_none() {
                match (self.connector)(&name) {
                    Ok(judge) => self.judge = Some(judge),
                    Err(e) => return Ok(Some(format!("Failed to open {}: {}", name, e))),
                }
            }
            if is_empty {
                self.view.set_status_bar(&format!("Loading {}...", name))?;
                let catalogue = match self.judge.as_mut() {
                    Some(judge) => judge.catalogue(),
                    None => return Ok(None),
                };
                match catalogue {
                    Ok(catalogue) => self.root.entries[index] = Entry::Container(catalogue),
                    Err(e) => {
                        warn!(error = %e, "failed to load catalogue");
                        return Ok(Some(format!("Failed to load {}: {}", name, e)));
                    }
                }
            }
        }

        self.save_status();
        self.path.push(index);
        self.show_current()?;
        Ok(None)
    }

    fn ascend(&mut self) -> Result<()> {
        if self.path.is_empty() {
            return Ok(());
        }
        self.save_status();
        self.path.pop();
        self.show_current()?;
        if self.path.is_empty() {
            // Dropping the judge closes its browser.
            debug!("back at the menu, dropping judge");
            self.judge = None;
        }
        Ok(())
    }

    fn open_problem(&mut self, id: ProblemId) -> Result<String> {
        let browser_message = match self.judge.as_mut().map(|j| j.load_problem(&id)) {
            Some(Err(e)) => {
                warn!(error = %e, problem = %id, "failed to show problem");
                Some(format!("Browser: {}", e))
            }
            _ => None,
        };

        let language = self.workspace.locate(&self.judge_name(), &id, self.language).language;
        let message = self.edit(&id, language)?;
        Ok(browser_message.unwrap_or(message))
    }

    fn edit_selected(&mut self, language: Option<Language>) -> Result<String> {
        let Some(id) = self.selected_problem() else {
            return Ok("Select a problem first".to_string());
        };
        let language = language.unwrap_or_else(|| {
            self.workspace
                .locate(&self.judge_name(), &id, self.language)
                .language
        });
        self.edit(&id, language)
    }

    fn edit(&mut self, id: &ProblemId, language: Language) -> Result<String> {
        let solution = match self.workspace.prepare(&self.judge_name(), id, language) {
            Ok(solution) => solution,
            Err(e) => return Ok(format!("Failed to prepare solution: {}", e)),
        };

        let editor = self.editor.clone();
        let mut outcome = Ok(());
        self.view
            .canvas_mut()
            .suspend(&mut || outcome = open_in_editor(&editor, &solution.path))?;
        self.view.refresh()?;

        Ok(match outcome {
            Ok(()) => String::new(),
            Err(e) => format!("Failed to edit: {}", e),
        })
    }

    fn submit_selected(&mut self) -> String {
        let Some(id) = self.selected_problem() else {
            return "Select a problem first".to_string();
        };
        let solution = self.workspace.locate(&self.judge_name(), &id, self.language);
        let Some(judge) = self.judge.as_mut() else {
            return "Open a judge first".to_string();
        };

        match judge.submit(&id, &solution) {
            Ok(()) => format!(
                "Submitted {} ({})",
                id,
                solution.language.display_name()
            ),
            Err(e) => format!("Submit failed: {}", e),
        }
    }

    fn compile_selected(&mut self) -> Result<String> {
        let Some(id) = self.selected_problem() else {
            return Ok("Select a problem first".to_string());
        };
        let solution = self.workspace.locate(&self.judge_name(), &id, self.language);

        match lang::compile(solution.language, &solution.path) {
            Ok(program) => Ok(format!("Compiled {}", program.display())),
            Err(e) => self.report_compile_error(e),
        }
    }

    /// Pages the compiler diagnostics; the status bar only gets the summary.
    fn report_compile_error(&mut self, error: CpcError) -> Result<String> {
        match &error {
            CpcError::Compile { status, output } => {
                warn!(%status, %output, "compilation failed");
                if !output.is_empty() {
                    self.view.canvas_mut().page(output)?;
                    self.view.refresh()?;
                }
            }
            other => warn!(error = %other, "compilation failed"),
        }
        Ok(error.to_string())
    }

    fn run_selected(&mut self) -> Result<String> {
        let Some(id) = self.selected_problem() else {
            return Ok("Select a problem first".to_string());
        };
        let solution = self.workspace.locate(&self.judge_name(), &id, self.language);
        let program = match lang::compile(solution.language, &solution.path) {
            Ok(program) => program,
            Err(e) => return self.report_compile_error(e),
        };

        let mut outcome = Ok(0);
        self.view.canvas_mut().suspend(&mut || {
            outcome = lang::run(solution.language, &program, Stdio::inherit(), Stdio::inherit());
            wait_for_enter();
        })?;
        self.view.refresh()?;

        Ok(match outcome {
            Ok(code) => format!("{} exited with {}", id, code),
            Err(e) => e.to_string(),
        })
    }
}

impl<C: Canvas + KeySource> App<C> {
    /// Reads keys until the user quits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let key = self.view.canvas_mut().next_key()?;
            if self.handle_key(key)? == Outcome::Quit {
                info!("user quit");
                return Ok(());
            }
        }
    }
}

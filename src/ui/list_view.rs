use std::io::{self, BufRead, Write};

use crate::error::Result;
use crate::models::ViewStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Normal,
    Reversed,
    Bold,
}

/// A grid of text rows the list view draws onto.
pub trait Canvas {
    /// `(width, height)` in cells.
    fn size(&self) -> (u16, u16);

    fn draw_line(&mut self, y: u16, text: &str, style: Style) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Hands the real terminal to `task` (an editor, a program) and takes it back after.
    fn suspend(&mut self, task: &mut dyn FnMut()) -> Result<()> {
        task();
        Ok(())
    }

    /// Shows `text` outside the list until the user presses Enter.
    fn page(&mut self, text: &str) -> Result<()> {
        self.suspend(&mut || {
            println!("{}", text);
            wait_for_enter();
        })
    }
}

pub fn wait_for_enter() {
    print!("\n[press Enter to return to cpc] ");
    let _ = io::stdout().flush();
    let _ = io::stdin().lock().read_line(&mut String::new());
}

/// A selectable list of labels with a scrolling viewport and a status bar on the last row.
pub struct ListView<C: Canvas> {
    canvas: C,
    labels: Vec<String>,
    index: usize,
    viewport_start: usize,
    status_bar: String,
}

impl<C: Canvas> ListView<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            canvas,
            labels: Vec::new(),
            index: 0,
            viewport_start: 0,
            status_bar: String::new(),
        }
    }

    #[cfg(test)]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn status(&self) -> ViewStatus {
        ViewStatus {
            index: self.index,
            viewport_start: self.viewport_start,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    #[cfg(test)]
    pub fn status_bar(&self) -> &str {
        &self.status_bar
    }

    /// Rows available to the list; the last one is the status bar.
    fn rows(&self) -> usize {
        self.canvas.size().1.saturating_sub(1) as usize
    }

    fn last_index(&self) -> usize {
        self.labels.len().saturating_sub(1)
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.draw_viewport()?;
        self.draw_status_bar()?;
        self.canvas.flush()
    }

    pub fn set_selection(&mut self, labels: Vec<String>, status: Option<ViewStatus>) -> Result<()> {
        self.labels = labels;
        let status = status.unwrap_or_default();
        self.index = status.index.min(self.last_index());
        self.viewport_start = status.viewport_start.min(self.last_index());
        self.draw_viewport()?;
        self.canvas.flush()
    }

    pub fn set_status_bar(&mut self, message: &str) -> Result<()> {
        self.status_bar = message.to_string();
        self.draw_status_bar()?;
        self.canvas.flush()
    }

    /// Moves the selection by `n`, clamped to the list, scrolling to keep it visible.
    pub fn move_selection(&mut self, n: isize) -> Result<()> {
        let target = if n < 0 {
            self.index.saturating_sub(n.unsigned_abs())
        } else {
            self.index.saturating_add(n as usize)
        };
        self.select(target)
    }

    pub fn select_first(&mut self) -> Result<()> {
        self.select(0)
    }

    pub fn select_last(&mut self) -> Result<()> {
        self.select(self.last_index())
    }

    fn select(&mut self, target: usize) -> Result<()> {
        let index = target.min(self.last_index());
        let rows = self.rows();

        if index < self.viewport_start {
            self.viewport_start = index;
        } else if rows > 0 && index >= self.viewport_start + rows {
            self.viewport_start = index + 1 - rows;
        }

        self.index = index;
        self.draw_viewport()?;
        self.canvas.flush()
    }

    /// Scrolls the list by `n` rows without moving the selection.
    pub fn move_viewport(&mut self, n: isize) -> Result<()> {
        let start = if n < 0 {
            self.viewport_start.saturating_sub(n.unsigned_abs())
        } else {
            self.viewport_start.saturating_add(n as usize)
        };
        self.viewport_start = start.min(self.last_index());
        self.draw_viewport()?;
        self.canvas.flush()
    }

    /// Truncates or pads so the text is exactly one cell narrower than the screen.
    fn fit(&self, text: &str) -> String {
        let width = self.canvas.size().0.saturating_sub(1) as usize;
        let mut line: String = text.chars().take(width).collect();
        let len = line.chars().count();
        line.extend(std::iter::repeat(' ').take(width - len));
        line
    }

    fn draw_viewport(&mut self) -> Result<()> {
        for row in 0..self.rows() {
            let position = self.viewport_start + row;
            let line = match self.labels.get(position) {
                Some(label) => self.fit(label),
                None => self.fit(""),
            };
            let style = if position == self.index && position < self.labels.len() {
                Style::Reversed
            } else {
                Style::Normal
            };
            self.canvas.draw_line(row as u16, &line, style)?;
        }
        Ok(())
    }

    fn draw_status_bar(&mut self) -> Result<()> {
        let (_, height) = self.canvas.size();
        if height == 0 {
            return Ok(());
        }
        let line = self.fit(&self.status_bar);
        self.canvas.draw_line(height - 1, &line, Style::Bold)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// An in-memory screen for driving views in tests.
    pub(crate) struct MemoryCanvas {
        pub width: u16,
        pub height: u16,
        pub lines: Vec<(String, Style)>,
        pub paged: Vec<String>,
    }

    impl MemoryCanvas {
        pub fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                lines: vec![(String::new(), Style::Normal); height as usize],
                paged: Vec::new(),
            }
        }

        pub fn text(&self, y: usize) -> &str {
            self.lines[y].0.trim_end()
        }
    }

    impl Canvas for MemoryCanvas {
        fn size(&self) -> (u16, u16) {
            (self.width, self.height)
        }

        fn draw_line(&mut self, y: u16, text: &str, style: Style) -> Result<()> {
            self.lines[y as usize] = (text.to_string(), style);
            Ok(())
        }

        fn page(&mut self, text: &str) -> Result<()> {
            self.paged.push(text.to_string());
            Ok(())
        }
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item {}", i)).collect()
    }

    fn view(n: usize, height: u16) -> ListView<MemoryCanvas> {
        let mut view = ListView::new(MemoryCanvas::new(20, height));
        view.set_selection(labels(n), None).unwrap();
        view
    }

    #[test]
    fn test_draws_selection_and_status_bar() {
        let mut view = view(3, 5);
        view.set_status_bar("ready").unwrap();

        let canvas = view.canvas();
        assert_eq!(canvas.text(0), "item 0");
        assert_eq!(canvas.lines[0].1, Style::Reversed);
        assert_eq!(canvas.lines[1].1, Style::Normal);
        assert_eq!(canvas.text(3), "");
        assert_eq!(canvas.text(4), "ready");
        assert_eq!(canvas.lines[4].1, Style::Bold);
    }

    #[test]
    fn test_lines_are_fitted_to_width() {
        let mut view = ListView::new(MemoryCanvas::new(8, 3));
        view.set_selection(vec!["a very long label".to_string(), "ab".to_string()], None)
            .unwrap();
        assert_eq!(view.canvas().lines[0].0, "a very ");
        assert_eq!(view.canvas().lines[1].0, "ab     ");
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut view = view(5, 10);
        view.move_selection(-3).unwrap();
        assert_eq!(view.index(), 0);
        view.move_selection(2).unwrap();
        assert_eq!(view.index(), 2);
        view.move_selection(100).unwrap();
        assert_eq!(view.index(), 4);
        view.select_first().unwrap();
        assert_eq!(view.index(), 0);
        view.select_last().unwrap();
        assert_eq!(view.index(), 4);
    }

    #[test]
    fn test_viewport_follows_selection() {
        // 4 list rows + status bar.
        let mut view = view(20, 5);
        view.move_selection(3).unwrap();
        assert_eq!(view.status().viewport_start, 0);

        view.move_selection(1).unwrap();
        assert_eq!(view.status(), ViewStatus { index: 4, viewport_start: 1 });
        assert_eq!(view.canvas().text(0), "item 1");
        assert_eq!(view.canvas().lines[3].1, Style::Reversed);

        view.select_last().unwrap();
        assert_eq!(view.status(), ViewStatus { index: 19, viewport_start: 16 });

        view.move_selection(-10).unwrap();
        assert_eq!(view.status(), ViewStatus { index: 9, viewport_start: 9 });
    }

    #[test]
    fn test_move_viewport_keeps_selection() {
        let mut view = view(10, 5);
        view.move_viewport(3).unwrap();
        assert_eq!(view.status(), ViewStatus { index: 0, viewport_start: 3 });
        assert_eq!(view.canvas().text(0), "item 3");

        view.move_viewport(-10).unwrap();
        assert_eq!(view.status().viewport_start, 0);

        view.move_viewport(100).unwrap();
        assert_eq!(view.status().viewport_start, 9);
    }

    #[test]
    fn test_set_selection_restores_status() {
        let mut view = view(10, 5);
        let saved = ViewStatus { index: 7, viewport_start: 5 };
        view.set_selection(labels(10), Some(saved)).unwrap();
        assert_eq!(view.status(), saved);
        assert_eq!(view.canvas().text(0), "item 5");
    }

    #[test]
    fn test_empty_selection() {
        let mut view = view(0, 5);
        view.move_selection(1).unwrap();
        view.select_last().unwrap();
        assert_eq!(view.index(), 0);
        assert_eq!(view.canvas().lines[0].1, Style::Normal);
    }
}

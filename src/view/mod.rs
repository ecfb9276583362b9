//! The diagnostic view: current page set, focus, and refresh.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::Result;
use crate::models::{Page, PageSet};
use crate::provider::{populate_fresh, PageProvider};

/// Holds the page set currently on screen and repopulates it on request.
///
/// The set is shared as an `Arc` snapshot and swapped wholesale on every
/// refresh, so a reader holding `pages()` sees either the old or the new
/// set, never a half-built one.
pub struct DiagnosticView {
    provider: Box<dyn PageProvider>,
    config: Arc<Config>,
    pages: Arc<PageSet>,
    focus: usize,
    /// Scroll offset per page index, reset when the page count changes.
    scroll: Vec<usize>,
    last_refreshed: Option<Instant>,
    refresh_count: u64,
}

impl DiagnosticView {
    pub fn new(provider: Box<dyn PageProvider>, config: Arc<Config>, pages: PageSet) -> Self {
        let mut view = Self {
            provider,
            config,
            pages: Arc::new(PageSet::new()),
            focus: 0,
            scroll: Vec::new(),
            last_refreshed: None,
            refresh_count: 0,
        };
        view.set_page_data(pages);
        view
    }

    /// Replace the current page set wholesale.
    pub fn set_page_data(&mut self, pages: PageSet) {
        if pages.len() != self.pages.len() {
            self.scroll = vec![0; pages.len()];
        }
        self.pages = Arc::new(pages);
        self.focus = self.focus.min(self.pages.len().saturating_sub(1));
        for (i, offset) in self.scroll.iter_mut().enumerate() {
            let len = self.pages.get(i).map(Page::len).unwrap_or(0);
            *offset = (*offset).min(len.saturating_sub(1));
        }
        self.last_refreshed = Some(Instant::now());
    }

    /// Repopulate from the provider and swap in the result.
    ///
    /// `forced` is recorded for diagnostics only: both kinds always
    /// repopulate. On provider failure the current set stays in place.
    pub fn refresh(&mut self, forced: bool) -> Result<()> {
        let pages = populate_fresh(self.provider.as_mut(), &self.config)?;
        self.set_page_data(pages);
        self.refresh_count += 1;
        tracing::debug!(forced, count = self.refresh_count, "view refreshed");
        Ok(())
    }

    /// Read-only snapshot of the current set.
    pub fn pages(&self) -> Arc<PageSet> {
        Arc::clone(&self.pages)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Index of the page currently in focus.
    pub fn current_focus(&self) -> usize {
        self.focus
    }

    pub fn focused_page(&self) -> Option<&Page> {
        self.pages.get(self.focus)
    }

    pub fn set_focus(&mut self, index: usize) {
        if index < self.pages.len() {
            self.focus = index;
        }
    }

    pub fn focus_next(&mut self) {
        if !self.pages.is_empty() {
            self.focus = (self.focus + 1) % self.pages.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.pages.is_empty() {
            self.focus = (self.focus + self.pages.len() - 1) % self.pages.len();
        }
    }

    /// Scroll offset of the focused page.
    pub fn scroll(&self) -> usize {
        self.scroll.get(self.focus).copied().unwrap_or(0)
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let len = self.focused_page().map(Page::len).unwrap_or(0);
        if let Some(offset) = self.scroll.get_mut(self.focus) {
            let next = (*offset as isize + delta).max(0) as usize;
            *offset = next.min(len.saturating_sub(1));
        }
    }

    pub fn scroll_home(&mut self) {
        if let Some(offset) = self.scroll.get_mut(self.focus) {
            *offset = 0;
        }
    }

    pub fn scroll_end(&mut self) {
        let len = self.focused_page().map(Page::len).unwrap_or(0);
        if let Some(offset) = self.scroll.get_mut(self.focus) {
            *offset = len.saturating_sub(1);
        }
    }

    pub fn last_refreshed(&self) -> Option<Instant> {
        self.last_refreshed
    }

    /// Number of provider-backed refreshes since construction.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }
}

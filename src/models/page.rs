use serde::Serialize;

/// A single label/value line on a diagnostics page.
/// Immutable once built; the optional category groups related lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    label: String,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl Entry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            category: None,
        }
    }

    /// Attach a category tag (e.g. "cpu", "env").
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// A named, ordered group of entries shown together as one tab.
///
/// Pages are append-only: labels need not be unique, and entries keep
/// the order the provider pushed them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    title: String,
    entries: Vec<Entry>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Append a plain label/value entry.
    pub fn add(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push(Entry::new(label, value));
        self
    }

    /// Append a prebuilt entry (keeps its category).
    pub fn push(&mut self, entry: Entry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Widest label in display columns, used to align `label: value` output.
    pub fn label_width(&self) -> usize {
        self.entries
            .iter()
            .map(|e| unicode_width::UnicodeWidthStr::width(e.label()))
            .max()
            .unwrap_or(0)
    }
}

/// The full ordered collection of pages for one population cycle.
///
/// Insertion order is tab order. A `PageSet` is built by a provider and then
/// frozen: the view only ever swaps whole sets, it never edits one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageSet {
    pages: Vec<Page>,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page and return it for filling.
    pub fn add_page(&mut self, title: impl Into<String>) -> &mut Page {
        self.pages.push(Page::new(title));
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Append an already-built page.
    pub fn push(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total entries across all pages.
    pub fn entry_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(Page::title)
    }

    /// Drop every page whose title matches one of `hidden` (case-insensitive).
    pub fn without_pages(mut self, hidden: &[String]) -> Self {
        if !hidden.is_empty() {
            self.pages
                .retain(|p| !hidden.iter().any(|h| h.eq_ignore_ascii_case(p.title())));
        }
        self
    }
}

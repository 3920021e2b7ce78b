//! Caller-defined tabs and the clamped collection that switches between them.

use std::fmt;
use std::io;

use crate::nav::{Nav, NavigationState};
use crate::tui::surface::DisplaySurface;
use crate::types::Error;

/// Renders a tab's content below its header.
pub type TabBody<'a> = Box<dyn FnMut(&mut dyn DisplaySurface) -> io::Result<()> + Send + 'a>;

/// A named view. A tab without a body draws only its header and separator.
pub struct Tab<'a> {
    pub header: String,
    pub body: Option<TabBody<'a>>,
}

impl<'a> Tab<'a> {
    pub fn new<F>(header: impl Into<String>, body: F) -> Self
    where
        F: FnMut(&mut dyn DisplaySurface) -> io::Result<()> + Send + 'a,
    {
        Tab {
            header: header.into(),
            body: Some(Box::new(body)),
        }
    }

    /// A tab that shows only its header.
    pub fn header_only(header: impl Into<String>) -> Self {
        Tab {
            header: header.into(),
            body: None,
        }
    }

    /// Run the body, if any.
    pub fn render_body(&mut self, surface: &mut dyn DisplaySurface) -> io::Result<()> {
        match self.body.as_mut() {
            Some(body) => body(surface),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Tab<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("header", &self.header)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Fixed, non-empty set of tabs with one of them selected.
#[derive(Debug)]
pub struct SwitchableTab<'a> {
    tabs: Vec<Tab<'a>>,
    nav: NavigationState,
}

impl<'a> SwitchableTab<'a> {
    /// # Errors
    /// `EmptyCollection` if `tabs` yields nothing.
    pub fn new(tabs: impl IntoIterator<Item = Tab<'a>>) -> Result<Self, Error> {
        let tabs: Vec<Tab<'a>> = tabs.into_iter().collect();
        let nav = NavigationState::new(tabs.len()).map_err(|_| Error::EmptyCollection)?;
        Ok(Self { tabs, nav })
    }

    pub fn current(&self) -> &Tab<'a> {
        &self.tabs[self.nav.current()]
    }

    pub fn current_mut(&mut self) -> &mut Tab<'a> {
        &mut self.tabs[self.nav.current()]
    }

    pub fn next(&mut self) {
        self.nav.next();
    }

    pub fn previous(&mut self) {
        self.nav.previous();
    }

    pub fn go_to_first(&mut self) {
        self.nav.first();
    }

    pub fn go_to_last(&mut self) {
        self.nav.last();
    }

    pub fn apply(&mut self, nav: Nav) {
        self.nav.apply(nav);
    }

    /// Zero-based index of the selected tab.
    pub fn index(&self) -> usize {
        self.nav.current()
    }

    pub fn len(&self) -> usize {
        self.nav.extent()
    }

    /// True when there are no tabs. Never the case after `new` succeeds.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::surface::RecordingSurface;

    fn abc() -> SwitchableTab<'static> {
        SwitchableTab::new(["A", "B", "C"].map(Tab::header_only)).unwrap()
    }

    #[test]
    fn empty_collection_is_rejected() {
        let result = SwitchableTab::new(Vec::<Tab>::new());
        assert!(matches!(result, Err(Error::EmptyCollection)));
    }

    #[test]
    fn extent_matches_tab_count() {
        for k in 1..=6 {
            let tabs = SwitchableTab::new((0..k).map(|i| Tab::header_only(format!("tab {}", i))))
                .unwrap();
            assert_eq!(tabs.len(), k);
            assert!(!tabs.is_empty());
            assert_eq!(tabs.index(), 0);
        }
    }

    #[test]
    fn last_previous_next_next_walks_abc() {
        let mut tabs = abc();
        tabs.go_to_last();
        tabs.previous();
        assert_eq!(tabs.current().header, "B");
        tabs.next();
        assert_eq!(tabs.current().header, "C");
        tabs.next();
        assert_eq!(tabs.current().header, "C");
    }

    #[test]
    fn go_to_first_returns_to_a() {
        let mut tabs = abc();
        tabs.go_to_last();
        tabs.go_to_first();
        assert_eq!(tabs.current().header, "A");
        tabs.previous();
        assert_eq!(tabs.current().header, "A");
    }

    #[test]
    fn body_renders_onto_surface() {
        let mut tab = Tab::new("Stats", |s: &mut dyn DisplaySurface| s.write_line("42 items"));
        let mut surface = RecordingSurface::new(40, 10);
        tab.render_body(&mut surface).unwrap();
        assert_eq!(surface.lines(), vec!["42 items".to_string()]);
    }

    #[test]
    fn header_only_tab_renders_nothing() {
        let mut tab = Tab::header_only("Empty");
        let mut surface = RecordingSurface::new(40, 10);
        tab.render_body(&mut surface).unwrap();
        assert!(surface.lines().is_empty());
    }
}

//! Presentation: turn a data slice or a tab set into frames.
//!
//! Each view supplies a header line and a body. `draw_frame` lays them out
//! the same way for both: a blank row, the centered header, then the body.
//! Page arithmetic lives here too and is pure.

use std::fmt::Display;
use std::io;

use crate::nav::{Nav, NavigationState};
use crate::tabs::SwitchableTab;
use crate::types::Error;

use super::surface::DisplaySurface;

/// Separator drawn under a tab header.
pub const TAB_SEPARATOR: &str = "--------------";

/// A navigable presentation the render loop can draw.
pub trait View {
    fn navigate(&mut self, nav: Nav);

    /// Text of the centered header line.
    fn header(&self) -> String;

    /// Everything below the header.
    fn draw_body(&mut self, surface: &mut dyn DisplaySurface) -> io::Result<()>;
}

/// Draw one frame of `view`. The caller clears the surface first.
pub fn draw_frame<V: View + ?Sized>(view: &mut V, surface: &mut dyn DisplaySurface) -> io::Result<()> {
    surface.write_line("")?;
    surface.write_centered(&view.header())?;
    view.draw_body(surface)
}

/// Default per-item renderer: the item's `Display` form on its own line.
pub fn write_item<T: Display>(surface: &mut dyn DisplaySurface, item: &T) -> io::Result<()> {
    surface.write_line(&item.to_string())
}

// ============================================================================
// PAGE ARITHMETIC
// ============================================================================

/// Number of pages needed for `len` items, `page_size` per page.
pub fn available_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

/// Items on zero-based page `index`. Empty past the end.
pub fn page_window<T>(data: &[T], page_size: usize, index: usize) -> &[T] {
    let start = index.saturating_mul(page_size).min(data.len());
    let end = start.saturating_add(page_size).min(data.len());
    &data[start..end]
}

/// Header shown above a page.
pub fn page_header(number: usize, total: usize) -> String {
    format!("< Page {} / {} >", number, total)
}

/// Derived view of the current page.
#[derive(Debug, PartialEq, Eq)]
pub struct PageView<'d, T> {
    /// One-based page number.
    pub number: usize,
    pub total: usize,
    pub items: &'d [T],
}

// ============================================================================
// PAGING
// ============================================================================

/// Pages over a borrowed slice, rendering each visible item with `render`.
pub struct PagedView<'d, T, F> {
    data: &'d [T],
    page_size: usize,
    nav: NavigationState,
    render: F,
}

impl<'d, T, F> PagedView<'d, T, F>
where
    F: FnMut(&mut dyn DisplaySurface, &T) -> io::Result<()>,
{
    /// Page count is fixed here, from the slice length.
    ///
    /// # Errors
    /// `InvalidConfiguration` for a zero page size, `EmptyExtent` for
    /// empty data.
    pub fn new(data: &'d [T], page_size: usize, render: F) -> Result<Self, Error> {
        if page_size == 0 {
            return Err(Error::InvalidConfiguration {
                reason: "page size must be positive, got 0".to_string(),
            });
        }
        let nav = NavigationState::new(available_pages(data.len(), page_size))?;
        Ok(Self {
            data,
            page_size,
            nav,
            render,
        })
    }

    pub fn page(&self) -> PageView<'d, T> {
        let index = self.nav.current();
        PageView {
            number: index + 1,
            total: self.nav.extent(),
            items: page_window(self.data, self.page_size, index),
        }
    }
}

impl<T, F> View for PagedView<'_, T, F>
where
    F: FnMut(&mut dyn DisplaySurface, &T) -> io::Result<()>,
{
    fn navigate(&mut self, nav: Nav) {
        self.nav.apply(nav);
    }

    fn header(&self) -> String {
        page_header(self.nav.current() + 1, self.nav.extent())
    }

    fn draw_body(&mut self, surface: &mut dyn DisplaySurface) -> io::Result<()> {
        let page = self.page();
        for item in page.items {
            (self.render)(&mut *surface, item)?;
        }
        Ok(())
    }
}

// ============================================================================
// TABS
// ============================================================================

/// Shows the selected tab of a caller-owned `SwitchableTab`.
///
/// Navigation moves the caller's selection, so it survives the session.
pub struct TabbedView<'t, 'a> {
    tabs: &'t mut SwitchableTab<'a>,
}

impl<'t, 'a> TabbedView<'t, 'a> {
    pub fn new(tabs: &'t mut SwitchableTab<'a>) -> Self {
        Self { tabs }
    }
}

impl View for TabbedView<'_, '_> {
    fn navigate(&mut self, nav: Nav) {
        self.tabs.apply(nav);
    }

    fn header(&self) -> String {
        self.tabs.current().header.clone()
    }

    fn draw_body(&mut self, surface: &mut dyn DisplaySurface) -> io::Result<()> {
        surface.write_centered(TAB_SEPARATOR)?;
        self.tabs.current_mut().render_body(surface)
    }
}

// ============================================================================
// TESTS
// ============================================================================

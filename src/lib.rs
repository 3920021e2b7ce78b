//! npage: page through data or switch between tabs in the terminal.
//!
//! A foreground loop redraws the current page or tab at a fixed cadence
//! while a background listener reads arrow/Home/End keys. See
//! [`paginate`] and [`display_tabs`] for the entry points.

pub mod cancel;
pub mod nav;
pub mod tabs;
pub mod tui;
pub mod types;

pub use cancel::CancelToken;
pub use nav::{Nav, NavigationState};
pub use tabs::{SwitchableTab, Tab};
pub use tui::keys::{KeySource, ScriptedKeys, TerminalKeys};
pub use tui::run::{
    display_tabs, display_tabs_async, display_tabs_async_on, display_tabs_on, paginate,
    paginate_async, paginate_async_on, paginate_on,
};
pub use tui::surface::{DisplaySurface, RecordingSurface, TerminalSurface};
pub use tui::update::KeyHook;
pub use tui::view::write_item;
pub use types::{Error, PagerConfig, SessionEnd};

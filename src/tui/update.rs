//! Input routing: key press → navigation step or caller hook.
//!
//! Shared by the paging and tab variants and by both suspension
//! disciplines. Fully testable without a terminal.

use crossterm::event::{KeyCode, KeyEvent};

use crate::nav::Nav;

use super::view::View;

/// Callback for keys outside the navigation set.
pub type KeyHook<'h> = &'h mut (dyn FnMut(KeyEvent) + Send);

/// Map a key press to a navigation step.
///
/// Modifiers are ignored. Returns None for keys that don't navigate.
pub fn map_key(key: &KeyEvent) -> Option<Nav> {
    match key.code {
        KeyCode::Left => Some(Nav::Previous),
        KeyCode::Right => Some(Nav::Next),
        KeyCode::Home => Some(Nav::First),
        KeyCode::End => Some(Nav::Last),
        _ => None,
    }
}

/// Apply one key press: navigate the view, or hand the key to the hook.
///
/// Keys that don't navigate are dropped when there is no hook.
pub fn route_key<V: View + ?Sized>(
    key: KeyEvent,
    view: &mut V,
    on_other_key: Option<&mut (dyn FnMut(KeyEvent) + Send + '_)>,
) {
    match map_key(&key) {
        Some(nav) => {
            tracing::trace!(?nav, "navigate");
            view.navigate(nav);
        }
        None => {
            if let Some(hook) = on_other_key {
                hook(key);
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::view::PagedView;
    use crate::tui::view::write_item;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_map_to_previous_and_next() {
        assert_eq!(map_key(&key(KeyCode::Left)), Some(Nav::Previous));
        assert_eq!(map_key(&key(KeyCode::Right)), Some(Nav::Next));
    }

    #[test]
    fn home_and_end_map_to_bounds() {
        assert_eq!(map_key(&key(KeyCode::Home)), Some(Nav::First));
        assert_eq!(map_key(&key(KeyCode::End)), Some(Nav::Last));
    }

    #[test]
    fn modifiers_do_not_change_navigation() {
        let shifted = KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(map_key(&shifted), Some(Nav::Next));
    }

    #[test]
    fn unmapped_keys_return_none() {
        for code in [KeyCode::Up, KeyCode::Down, KeyCode::Enter, KeyCode::Char('q')] {
            assert_eq!(map_key(&key(code)), None);
        }
    }

    #[test]
    fn navigation_keys_move_the_view() {
        let data: Vec<i32> = (1..=12).collect();
        let mut view = PagedView::new(&data, 5, write_item).unwrap();
        route_key(key(KeyCode::Right), &mut view, None);
        route_key(key(KeyCode::Right), &mut view, None);
        assert_eq!(view.page().number, 3);
        route_key(key(KeyCode::Home), &mut view, None);
        assert_eq!(view.page().number, 1);
    }

    #[test]
    fn other_keys_reach_the_hook_and_not_the_view() {
        let data = [1, 2, 3, 4, 5, 6];
        let mut view = PagedView::new(&data, 2, write_item).unwrap();
        let mut seen = Vec::new();
        let mut record = |k: KeyEvent| seen.push(k.code);

        route_key(key(KeyCode::Char('x')), &mut view, Some(&mut record));
        route_key(key(KeyCode::End), &mut view, Some(&mut record));

        assert_eq!(view.page().number, 3);
        assert_eq!(seen, vec![KeyCode::Char('x')]);
    }

    #[test]
    fn other_keys_without_hook_are_ignored() {
        let data = [1, 2, 3];
        let mut view = PagedView::new(&data, 1, write_item).unwrap();
        route_key(key(KeyCode::Char('z')), &mut view, None);
        assert_eq!(view.page().number, 1);
    }
}

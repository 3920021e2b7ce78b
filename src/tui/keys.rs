//! Key sources for the background listener.
//!
//! Reads are bounded by a timeout so the listener can notice a stop
//! request between key presses instead of blocking forever.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Something the listener can pull key presses from.
pub trait KeySource: Send + 'static {
    /// Wait up to `timeout` for one key press.
    ///
    /// Returns `Ok(None)` when the timeout elapses with nothing pressed.
    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>>;
}

// ============================================================================
// TERMINAL
// ============================================================================

/// Key presses from the controlling terminal via crossterm.
///
/// Mouse, resize and focus events are dropped, as are key releases and
/// repeats on platforms that report them.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

// ============================================================================
// SCRIPTED
// ============================================================================

/// Replays a fixed list of keys, then idles.
///
/// Every call to `read_key` is counted, including idle ones, so tests can
/// check whether a listener ever ran.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyEvent>,
    reads: Arc<AtomicUsize>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `read_key` calls, readable after the source has
    /// been moved into a listener.
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.keys.pop_front() {
            Some(key) => Ok(Some(key)),
            None => {
                thread::sleep(timeout);
                Ok(None)
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
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn scripted_keys_replay_in_order() {
        let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        let end = KeyEvent::new(KeyCode::End, KeyModifiers::NONE);
        let mut keys = ScriptedKeys::new([left, end]);

        let timeout = Duration::from_millis(1);
        assert_eq!(keys.read_key(timeout).unwrap(), Some(left));
        assert_eq!(keys.read_key(timeout).unwrap(), Some(end));
        assert_eq!(keys.read_key(timeout).unwrap(), None);
    }

    #[test]
    fn read_counter_counts_idle_reads() {
        let mut keys = ScriptedKeys::default();
        let counter = keys.read_counter();
        keys.read_key(Duration::ZERO).unwrap();
        keys.read_key(Duration::ZERO).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}

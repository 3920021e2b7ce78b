//! Session state algebra: what flows over the input channel and what a
//! render tick decides. Pure types, zero effects.

use std::io;

use crossterm::event::KeyEvent;

/// Everything the render task can receive from the listener.
///
/// The listener is the channel's only producer; the render task is its
/// only consumer and the only owner of navigation state.
#[derive(Debug)]
pub enum InputEvent {
    /// A key press read from the key source.
    Key(KeyEvent),
    /// The key source failed. The listener has stopped.
    Failed(io::Error),
}

/// Outcome of one render tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A frame was drawn; suspend for the interval and tick again.
    Continue,
    /// Cancellation was observed before drawing. Nothing was drawn.
    Stop,
}

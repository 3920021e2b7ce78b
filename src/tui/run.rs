//! Effects boundary: listener task, render loop, terminal lifecycle.
//!
//! Architecture: one producer feeds a single mpsc channel.
//! - Key listener (thread or blocking task): forwards key presses
//! - Render loop (caller's thread or future): owns the view and its
//!   navigation state, drains the channel at the top of each tick, draws,
//!   then suspends for the interval
//!
//! The blocking and cooperative drivers share `Session::tick` and differ
//! only in how they wait between ticks and how they join the listener.

use std::io;
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use tracing::{debug, trace, warn};

use crate::cancel::CancelToken;
use crate::tabs::SwitchableTab;
use crate::types::{Error, PagerConfig, SessionEnd};

use super::keys::{KeySource, TerminalKeys};
use super::state::{InputEvent, Tick};
use super::surface::{DisplaySurface, TerminalSurface};
use super::update::{KeyHook, route_key};
use super::view::{PagedView, TabbedView, View, draw_frame};

/// Longest the listener waits on a key read before rechecking its stop flag.
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Raw mode, alternate screen and hidden cursor for the guard's lifetime.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        // From here on, dropping the guard undoes whatever succeeded.
        let guard = TerminalGuard;
        io::stdout().execute(EnterAlternateScreen)?.execute(Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// Raw mode goes first so a dead stdout cannot leave the shell raw.
fn restore_terminal() -> io::Result<()> {
    let mut steps: [&mut dyn FnMut() -> io::Result<()>; 3] = [
        &mut disable_raw_mode,
        &mut || io::stdout().execute(Show).map(drop),
        &mut || io::stdout().execute(LeaveAlternateScreen).map(drop),
    ];
    attempt_all(&mut steps)
}

/// Run every step even after a failure. Returns the first error.
fn attempt_all(steps: &mut [&mut dyn FnMut() -> io::Result<()>]) -> io::Result<()> {
    let mut first = Ok(());
    for step in steps.iter_mut() {
        let result = (*step)();
        if first.is_ok() {
            first = result;
        }
    }
    first
}

/// Restore the terminal before the default panic output. Installed once.
fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));
    });
}

// ============================================================================
// KEY LISTENER
// ============================================================================

/// Forward key presses until stopped, the receiver is gone, or a read fails.
fn listen<K: KeySource>(mut keys: K, tx: Sender<InputEvent>, running: Arc<AtomicBool>) {
    while running.load(Ordering::SeqCst) {
        match keys.read_key(KEY_POLL_INTERVAL) {
            Ok(Some(key)) => {
                trace!(code = ?key.code, "key pressed");
                if tx.send(InputEvent::Key(key)).is_err() {
                    break; // render loop is gone
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "key read failed, listener stopping");
                let _ = tx.send(InputEvent::Failed(e));
                break;
            }
        }
    }
    trace!("key listener exited");
}

enum Worker {
    Thread(thread::JoinHandle<()>),
    Task(tokio::task::JoinHandle<()>),
}

/// Handle to the running key listener.
///
/// Dropping it only raises the stop flag; `stop`/`stop_async` also wait
/// for the listener to exit.
struct Listener {
    running: Arc<AtomicBool>,
    worker: Option<Worker>,
}

impl Listener {
    /// Run the listener on a dedicated OS thread.
    fn spawn_thread<K: KeySource>(keys: K) -> io::Result<(Self, Receiver<InputEvent>)> {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("npage-keys".to_string())
            .spawn(move || listen(keys, tx, flag))?;
        let listener = Listener {
            running,
            worker: Some(Worker::Thread(handle)),
        };
        Ok((listener, rx))
    }

    /// Run the listener on tokio's blocking pool. Needs a runtime.
    fn spawn_task<K: KeySource>(keys: K) -> (Self, Receiver<InputEvent>) {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = tokio::task::spawn_blocking(move || listen(keys, tx, flag));
        let listener = Listener {
            running,
            worker: Some(Worker::Task(handle)),
        };
        (listener, rx)
    }

    fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        match self.worker.take() {
            Some(Worker::Thread(handle)) => {
                if handle.join().is_err() {
                    warn!("key listener panicked");
                }
            }
            // Only reachable from the cooperative driver, which uses stop_async.
            Some(Worker::Task(_)) | None => {}
        }
    }

    async fn stop_async(mut self) {
        self.running.store(false, Ordering::SeqCst);
        match self.worker.take() {
            Some(Worker::Task(handle)) => {
                if let Err(e) = handle.await {
                    warn!(error = %e, "key listener task failed");
                }
            }
            Some(Worker::Thread(handle)) => {
                if handle.join().is_err() {
                    warn!("key listener panicked");
                }
            }
            None => {}
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

// ============================================================================
// RENDER LOOP
// ============================================================================

/// Render-side state of one session. Sole owner of the view.
struct Session<'s, 'h, S, V> {
    surface: &'s mut S,
    view: V,
    events: Receiver<InputEvent>,
    cancel: &'s CancelToken,
    on_other_key: Option<KeyHook<'h>>,
}

impl<S: DisplaySurface, V: View> Session<'_, '_, S, V> {
    /// One RUNNING tick: check cancellation, apply pending keys, redraw.
    fn tick(&mut self) -> Result<Tick, Error> {
        if self.cancel.is_cancelled() {
            return Ok(Tick::Stop);
        }
        self.drain_input()?;

        self.surface.clear()?;
        draw_frame(&mut self.view, &mut *self.surface)?;
        self.surface.flush()?;
        trace!(header = %self.view.header(), "frame drawn");
        Ok(Tick::Continue)
    }

    fn drain_input(&mut self) -> Result<(), Error> {
        loop {
            match self.events.try_recv() {
                Ok(InputEvent::Key(key)) => {
                    route_key(key, &mut self.view, self.on_other_key.as_deref_mut());
                }
                Ok(InputEvent::Failed(e)) => return Err(Error::Io(e)),
                // Disconnected: the listener has exited; keep drawing until cancelled.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
    }
}

/// Blocking driver: sleeps the caller's thread between ticks.
fn run_blocking<S, K, V>(
    surface: &mut S,
    keys: K,
    view: V,
    cancel: &CancelToken,
    interval: Duration,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error>
where
    S: DisplaySurface,
    K: KeySource,
    V: View,
{
    let (listener, events) = Listener::spawn_thread(keys)?;
    let mut session = Session {
        surface,
        view,
        events,
        cancel,
        on_other_key,
    };

    let result = loop {
        match session.tick() {
            Ok(Tick::Continue) => thread::sleep(interval),
            Ok(Tick::Stop) => break Ok(SessionEnd::Cancelled),
            Err(e) => break Err(e),
        }
    };

    listener.stop();
    debug!(?result, "session ended");
    result
}

/// Cooperative driver: yields to the runtime between ticks.
async fn run_cooperative<S, K, V>(
    surface: &mut S,
    keys: K,
    view: V,
    cancel: &CancelToken,
    interval: Duration,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error>
where
    S: DisplaySurface,
    K: KeySource,
    V: View,
{
    let (listener, events) = Listener::spawn_task(keys);
    let mut session = Session {
        surface,
        view,
        events,
        cancel,
        on_other_key,
    };

    let result = loop {
        match session.tick() {
            Ok(Tick::Continue) => tokio::time::sleep(interval).await,
            Ok(Tick::Stop) => break Ok(SessionEnd::Cancelled),
            Err(e) => break Err(e),
        }
    };

    listener.stop_async().await;
    debug!(?result, "session ended");
    result
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate and build the paging view. `None` means there is nothing to
/// show and no task should start.
fn paged_view<'d, T, F>(
    data: &'d [T],
    render: F,
    config: &PagerConfig,
) -> Result<Option<PagedView<'d, T, F>>, Error>
where
    F: FnMut(&mut dyn DisplaySurface, &T) -> io::Result<()>,
{
    config.validate()?;
    if data.is_empty() {
        debug!("no items to page through");
        return Ok(None);
    }
    debug!(
        items = data.len(),
        page_size = config.page_size,
        interval_ms = config.interval_ms,
        "starting paging session"
    );
    PagedView::new(data, config.page_size, render).map(Some)
}

fn tabbed_view<'t, 'a>(
    tabs: &'t mut SwitchableTab<'a>,
    config: &PagerConfig,
) -> Result<TabbedView<'t, 'a>, Error> {
    config.validate()?;
    debug!(
        tabs = tabs.len(),
        interval_ms = config.interval_ms,
        "starting tab session"
    );
    Ok(TabbedView::new(tabs))
}

// ============================================================================
// ENTRY POINTS: INJECTED SURFACE AND KEYS
// ============================================================================

/// Page through `data` on `surface`, reading keys from `keys`.
///
/// Blocks until `cancel` is observed. Empty `data` returns
/// `SessionEnd::EmptyInput` at once without starting the listener.
///
/// # Errors
/// `InvalidConfiguration` before anything starts; `Io` if drawing or
/// reading keys fails.
pub fn paginate_on<S, K, T, F>(
    surface: &mut S,
    keys: K,
    data: &[T],
    render: F,
    cancel: &CancelToken,
    config: &PagerConfig,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error>
where
    S: DisplaySurface,
    K: KeySource,
    F: FnMut(&mut dyn DisplaySurface, &T) -> io::Result<()>,
{
    let Some(view) = paged_view(data, render, config)? else {
        return Ok(SessionEnd::EmptyInput);
    };
    run_blocking(surface, keys, view, cancel, config.interval(), on_other_key)
}

/// Cooperative form of [`paginate_on`]. Must run inside a tokio runtime.
pub async fn paginate_async_on<S, K, T, F>(
    surface: &mut S,
    keys: K,
    data: &[T],
    render: F,
    cancel: &CancelToken,
    config: &PagerConfig,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error>
where
    S: DisplaySurface,
    K: KeySource,
    F: FnMut(&mut dyn DisplaySurface, &T) -> io::Result<()>,
{
    let Some(view) = paged_view(data, render, config)? else {
        return Ok(SessionEnd::EmptyInput);
    };
    run_cooperative(surface, keys, view, cancel, config.interval(), on_other_key).await
}

/// Show the selected tab of `tabs` on `surface`, reading keys from `keys`.
///
/// `config.page_size` is validated but otherwise unused.
pub fn display_tabs_on<S, K>(
    surface: &mut S,
    keys: K,
    tabs: &mut SwitchableTab<'_>,
    cancel: &CancelToken,
    config: &PagerConfig,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error>
where
    S: DisplaySurface,
    K: KeySource,
{
    let view = tabbed_view(tabs, config)?;
    run_blocking(surface, keys, view, cancel, config.interval(), on_other_key)
}

/// Cooperative form of [`display_tabs_on`]. Must run inside a tokio runtime.
pub async fn display_tabs_async_on<S, K>(
    surface: &mut S,
    keys: K,
    tabs: &mut SwitchableTab<'_>,
    cancel: &CancelToken,
    config: &PagerConfig,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error>
where
    S: DisplaySurface,
    K: KeySource,
{
    let view = tabbed_view(tabs, config)?;
    run_cooperative(surface, keys, view, cancel, config.interval(), on_other_key).await
}

// ============================================================================
// ENTRY POINTS: TERMINAL
// ============================================================================

/// Page through `data` in the terminal until `cancel` fires.
///
/// Validation happens before the terminal is touched. While the session
/// runs the terminal is in raw mode on the alternate screen; both are
/// restored before returning.
///
/// # Errors
/// See [`paginate_on`].
pub fn paginate<T, F>(
    data: &[T],
    render: F,
    cancel: &CancelToken,
    config: &PagerConfig,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error>
where
    F: FnMut(&mut dyn DisplaySurface, &T) -> io::Result<()>,
{
    let Some(view) = paged_view(data, render, config)? else {
        return Ok(SessionEnd::EmptyInput);
    };
    let _terminal = TerminalGuard::enter()?;
    let mut surface = TerminalSurface::stdout();
    run_blocking(&mut surface, TerminalKeys, view, cancel, config.interval(), on_other_key)
}

/// Cooperative form of [`paginate`]. Must run inside a tokio runtime.
pub async fn paginate_async<T, F>(
    data: &[T],
    render: F,
    cancel: &CancelToken,
    config: &PagerConfig,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error>
where
    F: FnMut(&mut dyn DisplaySurface, &T) -> io::Result<()>,
{
    let Some(view) = paged_view(data, render, config)? else {
        return Ok(SessionEnd::EmptyInput);
    };
    let _terminal = TerminalGuard::enter()?;
    let mut surface = TerminalSurface::stdout();
    run_cooperative(&mut surface, TerminalKeys, view, cancel, config.interval(), on_other_key)
        .await
}

/// Show switchable tabs in the terminal until `cancel` fires.
///
/// # Errors
/// See [`display_tabs_on`].
pub fn display_tabs(
    tabs: &mut SwitchableTab<'_>,
    cancel: &CancelToken,
    config: &PagerConfig,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error> {
    let view = tabbed_view(tabs, config)?;
    let _terminal = TerminalGuard::enter()?;
    let mut surface = TerminalSurface::stdout();
    run_blocking(&mut surface, TerminalKeys, view, cancel, config.interval(), on_other_key)
}

/// Cooperative form of [`display_tabs`]. Must run inside a tokio runtime.
pub async fn display_tabs_async(
    tabs: &mut SwitchableTab<'_>,
    cancel: &CancelToken,
    config: &PagerConfig,
    on_other_key: Option<KeyHook<'_>>,
) -> Result<SessionEnd, Error> {
    let view = tabbed_view(tabs, config)?;
    let _terminal = TerminalGuard::enter()?;
    let mut surface = TerminalSurface::stdout();
    run_cooperative(&mut surface, TerminalKeys, view, cancel, config.interval(), on_other_key)
        .await
}

// ============================================================================
// TESTS
// ============================================================================

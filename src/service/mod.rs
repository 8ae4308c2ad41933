//! The keyboard service: the component the host input framework drives.
//!
//! [`KeyboardService`] owns the keyboard view, the current text connection
//! and the translate runner.  Every method is meant to be called from the
//! host's UI thread:
//!
//! | Host event                | Method                          |
//! |---------------------------|---------------------------------|
//! | input view requested      | [`on_create_input_view`]        |
//! | field focused             | [`on_start_input`]              |
//! | field unfocused           | [`on_finish_input`]             |
//! | key tapped                | [`on_tap`] / [`on_key`]         |
//! | translate button          | [`on_translate`]                |
//! | every frame               | [`poll`]                        |
//! | service torn down         | [`on_destroy`]                  |
//!
//! [`on_create_input_view`]: KeyboardService::on_create_input_view
//! [`on_start_input`]: KeyboardService::on_start_input
//! [`on_finish_input`]: KeyboardService::on_finish_input
//! [`on_tap`]: KeyboardService::on_tap
//! [`on_key`]: KeyboardActionListener::on_key
//! [`on_translate`]: KeyboardService::on_translate
//! [`poll`]: KeyboardService::poll
//! [`on_destroy`]: KeyboardService::on_destroy

pub mod notice;

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::config::{AppConfig, AppPaths};
use crate::connection::{KeyEvent, TextConnection};
use crate::keyboard::{KeyAction, KeyCode, KeyboardActionListener, KeyboardView, Layout, LayoutError};
use crate::llm::Translator;
use crate::translate::{TranslateOutcome, TranslateRunner, TranslateState, TranslationRequest};

pub use notice::{KeyboardUi, Notice, NoticeLength};

/// Shown when translate is pressed with no focused field.
pub const NO_CONNECTION_NOTICE: &str = "No input connection";

/// Shown when translate is pressed with nothing to translate.
pub const NOTHING_TO_TRANSLATE_NOTICE: &str = "Type something to translate";

/// Keyboard plus translate action, bound to at most one text connection.
pub struct KeyboardService<C: TextConnection> {
    layout: Arc<Layout>,
    target_language: String,
    view: Option<KeyboardView>,
    connection: Option<C>,
    /// Incremented on every fresh input session.
    session: u64,
    state: TranslateState,
    runner: TranslateRunner,
    notices: Vec<Notice>,
}

impl<C: TextConnection> KeyboardService<C> {
    /// Create a service.
    ///
    /// * `layout`          — key map shared with every view this service builds.
    /// * `translator`      — remote translation backend.
    /// * `target_language` — fixed language every request translates into.
    /// * `runtime`         — tokio runtime the translate task runs on.
    pub fn new(
        layout: Arc<Layout>,
        translator: Arc<dyn Translator>,
        target_language: impl Into<String>,
        runtime: Handle,
    ) -> Self {
        Self {
            layout,
            target_language: target_language.into(),
            view: None,
            connection: None,
            session: 0,
            state: TranslateState::Idle,
            runner: TranslateRunner::new(runtime, translator),
            notices: Vec::new(),
        }
    }

    /// Create a service from settings, loading the custom layout if one is
    /// configured.
    pub fn from_config(
        config: &AppConfig,
        translator: Arc<dyn Translator>,
        runtime: Handle,
    ) -> Result<Self, LayoutError> {
        let layout = match config.keyboard.resolve_layout(&AppPaths::new().layouts_dir) {
            Some(path) => {
                log::info!("loading keyboard layout from {}", path.display());
                Layout::load(&path)?
            }
            None => Layout::qwerty(),
        };
        Ok(Self::new(
            Arc::new(layout),
            translator,
            config.translate.target_language.clone(),
            runtime,
        ))
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Build the keyboard view, or return the one already built.
    pub fn on_create_input_view(&mut self) -> &KeyboardView {
        self.view.get_or_insert_with(|| {
            log::info!("creating keyboard view ({})", self.layout.name);
            KeyboardView::new(Arc::clone(&self.layout))
        })
    }

    /// Bind `connection` as the focused field.
    ///
    /// With `restarting == true` and a field already bound, the same input
    /// session continues with the new handle (an in-flight translation
    /// still lands).  Otherwise a new session starts and any outstanding
    /// translation is cancelled.
    pub fn on_start_input(&mut self, connection: C, restarting: bool) {
        if !(restarting && self.connection.is_some()) {
            self.end_session();
            self.session += 1;
            log::debug!("input session {} started", self.session);
        }
        self.connection = Some(connection);
    }

    /// Unbind the focused field, cancelling any outstanding translation.
    ///
    /// Returns the connection to the host.
    pub fn on_finish_input(&mut self) -> Option<C> {
        self.end_session();
        log::debug!("input session {} finished", self.session);
        self.connection.take()
    }

    /// Tear everything down: cancel work, release the view and connection.
    pub fn on_destroy(&mut self) {
        self.end_session();
        self.view = None;
        self.connection = None;
        log::info!("keyboard service destroyed");
    }

    fn end_session(&mut self) {
        if let Some(request) = self.runner.cancel() {
            log::info!(
                "cancelled translation of {} chars",
                request.source.chars().count()
            );
        }
        self.state = TranslateState::Idle;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn view(&self) -> Option<&KeyboardView> {
        self.view.as_ref()
    }

    pub fn connection(&self) -> Option<&C> {
        self.connection.as_ref()
    }

    pub fn connection_mut(&mut self) -> Option<&mut C> {
        self.connection.as_mut()
    }

    pub fn state(&self) -> TranslateState {
        self.state
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Indicator and trigger state for the host to render.
    pub fn ui(&self) -> KeyboardUi {
        let busy = self.state.is_busy();
        KeyboardUi {
            progress_visible: busy,
            translate_enabled: !busy,
        }
    }

    /// Drain notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, notice: Notice) {
        log::debug!("notice: {}", notice.message);
        self.notices.push(notice);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Route a tap at normalised view coordinates through the listener
    /// callbacks.  Returns the code of the key that was hit.
    pub fn on_tap(&mut self, x: f32, y: f32) -> Option<KeyCode> {
        let code = self.view.as_ref()?.code_at(x, y)?;
        self.on_press(code);
        self.on_key(code);
        self.on_release(code);
        Some(code)
    }

    // -----------------------------------------------------------------------
    // Translate
    // -----------------------------------------------------------------------

    /// Translate the selection, or the whole field if nothing is selected.
    pub fn on_translate(&mut self) {
        if self.state.is_busy() {
            log::debug!("translate: request already in flight, ignoring");
            return;
        }

        let Some(ic) = self.connection.as_ref() else {
            self.notify(Notice::short(NO_CONNECTION_NOTICE));
            return;
        };

        let selected = ic.selected_text().filter(|s| !s.is_empty());
        let from_selection = selected.is_some();
        let captured = selected.or_else(|| ic.extracted_text());

        let Some(source) = captured.filter(|s| !s.trim().is_empty()) else {
            self.notify(Notice::short(NOTHING_TO_TRANSLATE_NOTICE));
            return;
        };

        log::info!(
            "translate: {} chars from {} → {}",
            source.chars().count(),
            if from_selection { "selection" } else { "field" },
            self.target_language
        );

        let request = TranslationRequest {
            source,
            target_language: self.target_language.clone(),
            from_selection,
            session: self.session,
        };
        if self.runner.spawn(request) {
            self.state = TranslateState::Translating;
        }
    }

    /// Apply a finished translation, if there is one.  Never blocks.
    ///
    /// Returns `true` when an outcome was consumed.
    pub fn poll(&mut self) -> bool {
        match self.runner.try_next() {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    /// Wait for the in-flight translation and apply it.
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn wait_for_translation(&mut self) -> bool {
        match self.runner.next().await {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, outcome: TranslateOutcome) {
        self.state = TranslateState::Idle;

        if outcome.request.session != self.session {
            log::debug!(
                "translate: session {} is over, dropping result",
                outcome.request.session
            );
            return;
        }

        if let Err(e) = &outcome.result {
            log::warn!("translate failed: {e}");
            self.notify(Notice::long(format!("Translate error: {e}")));
            return;
        }

        let Some(text) = outcome.commit_text() else {
            return;
        };
        match self.connection.as_mut() {
            Some(ic) => {
                if !ic.commit_text(&text, 1) {
                    log::debug!("translate: field went away, result dropped");
                }
            }
            None => log::debug!("translate: no connection, dropping result"),
        }
    }
}

impl<C: TextConnection> KeyboardActionListener for KeyboardService<C> {
    fn on_key(&mut self, code: KeyCode) {
        let Some(ic) = self.connection.as_mut() else {
            return;
        };

        match code.action() {
            KeyAction::Delete => {
                ic.delete_surrounding_text(1, 0);
            }
            KeyAction::Done => {
                ic.send_key_event(KeyEvent::down(KeyEvent::KEYCODE_ENTER));
            }
            KeyAction::Commit(c) => {
                let mut buf = [0u8; 4];
                ic.commit_text(c.encode_utf8(&mut buf), 1);
            }
            KeyAction::Ignore => log::debug!("key {} has no text effect", code.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

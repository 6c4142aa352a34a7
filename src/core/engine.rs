//! # Navigation Engine
//!
//! Turns "go to this template with this data" into a screen on the stack.
//! One attempt at a time walks through these phases:
//!
//! ```text
//!   Fetching ─▶ Validating ─▶ Resolving ─▶ LoadingScreenContent ─▶ Committing ─▶ Done
//!      │            │             │                  │                  │
//!      └────────────┴─────────────┴──────── Failed ──┴──────────────────┘
//!   (any phase) ── Back ──▶ Cancelled
//! ```
//!
//! A navigation to an inline action skips `Fetching`. Failures stop the
//! loading overlay and queue a dialog behind it; the dialog shows once the
//! overlay has faded out.
//!
//! The engine is the only owner of the stack, the overlay and the dialog.
//! It never blocks and never does I/O: `update()` returns [`Effect`]s and the
//! runtime feeds results back in as [`Action`]s. Late results are matched
//! against the attempt id and its cancellation token and dropped when stale.

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::core::action::{Action, AttemptId, Effect, LoadTarget, Timer};
use crate::core::config::{CREX_VERSION, ResolvedConfig};
use crate::core::dialog::{Dialog, DialogButton};
use crate::core::document::{CrexAction, NavigationRequest};
use crate::core::fingerprint::{fingerprint, has_changed};
use crate::core::overlay::{LoadingOverlay, Stopped};
use crate::core::screen::{ContentError, Screen, ScreenInput};
use crate::core::stack::{ScreenDescriptor, ScreenId, ScreenStack, StackError};
use crate::core::templates::{NotFoundError, TemplateRegistry};
use crate::fetch::FetchError;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub client_version: u32,
    pub root_url: String,
    pub root_template: String,
    pub spinner_delay: Duration,
    pub animation_time: Duration,
    pub content_cache_time: Duration,
}

impl EngineSettings {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            client_version: CREX_VERSION,
            root_url: config.root_url.clone().unwrap_or_default(),
            root_template: config.root_template.clone(),
            spinner_delay: config.spinner_delay,
            animation_time: config.animation_time,
            content_cache_time: config.content_cache_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    Fetching,
    Validating,
    Resolving,
    LoadingScreenContent,
    Committing,
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("content requires Crex version {required}, this client is version {running}")]
    VersionGate { required: u32, running: u32 },
    #[error(transparent)]
    UnresolvedTemplate(#[from] NotFoundError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Transition(#[from] StackError),
    #[error("navigation cancelled")]
    Cancelled,
}

/// How the latest attempt ended.
#[derive(Debug)]
pub enum NavigationOutcome {
    Done { template: String },
    Cancelled,
    Failed(NavigationError),
}

struct Attempt {
    id: AttemptId,
    request: NavigationRequest,
    phase: NavigationPhase,
    cancel: CancellationToken,
    /// Screen built in `Resolving`, waiting for its content.
    pending: Option<Box<dyn Screen>>,
}

pub struct NavigationEngine {
    settings: EngineSettings,
    registry: TemplateRegistry,
    stack: ScreenStack,
    overlay: LoadingOverlay<Dialog>,
    dialog: Option<Dialog>,
    attempt: Option<Attempt>,
    next_attempt: u64,
    next_screen: u64,
    last_outcome: Option<NavigationOutcome>,
}

impl NavigationEngine {
    pub fn new(registry: TemplateRegistry, settings: EngineSettings) -> Self {
        let overlay = LoadingOverlay::new(settings.spinner_delay, settings.animation_time);
        Self {
            settings,
            registry,
            stack: ScreenStack::new(),
            overlay,
            dialog: None,
            attempt: None,
            next_attempt: 0,
            next_screen: 0,
            last_outcome: None,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn stack(&self) -> &ScreenStack {
        &self.stack
    }

    pub fn overlay(&self) -> &LoadingOverlay<Dialog> {
        &self.overlay
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    /// Phase of the in-flight attempt, if any.
    pub fn phase(&self) -> Option<NavigationPhase> {
        self.attempt.as_ref().map(|a| a.phase)
    }

    pub fn is_busy(&self) -> bool {
        self.attempt.is_some()
    }

    pub fn last_outcome(&self) -> Option<&NavigationOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Start => {
                let root = CrexAction::new(
                    self.settings.root_template.clone(),
                    Value::String(self.settings.root_url.clone()),
                );
                self.navigate(root)
            }
            Action::NavigateToUrl(url) => self.navigate_to_url(url),
            Action::Navigate(action) => self.navigate(action),
            Action::Back => self.back(),
            Action::Input(input) => self.input(input),
            Action::DialogResponse(button) => self.respond(button),
            Action::FetchCompleted { attempt, result } => self.fetch_completed(attempt, result),
            Action::ContentLoaded { target, result } => match target {
                LoadTarget::Pending(attempt) => self.content_loaded(attempt, result),
                LoadTarget::Refresh(screen) => self.refresh_loaded(screen, result),
            },
            Action::TimerFired(timer) => self.timer_fired(timer),
        }
    }

    pub fn navigate(&mut self, action: CrexAction) -> Vec<Effect> {
        self.begin(NavigationRequest::Action(action))
    }

    pub fn navigate_to_url(&mut self, url: impl Into<String>) -> Vec<Effect> {
        self.begin(NavigationRequest::Url(url.into()))
    }

    /// The remote's Back button.
    pub fn back(&mut self) -> Vec<Effect> {
        if let Some(dialog) = &self.dialog {
            let button = dialog.cancel_button();
            return self.respond(button);
        }
        if self.overlay.has_pending_callbacks() {
            debug!("Back ignored, dialog pending");
            return Vec::new();
        }
        if self.stack.is_transitioning() {
            debug!("Back ignored during transition");
            return Vec::new();
        }

        if let Some(attempt) = self.attempt.take() {
            attempt.cancel.cancel();
            info!(
                "Cancelled navigation to {} during {:?}",
                attempt.request.describe(),
                attempt.phase
            );
            self.last_outcome = Some(NavigationOutcome::Cancelled);
            let stopped = self.overlay.stop(None);
            let mut effects = self.overlay_stopped(stopped);
            if self.stack.is_empty() {
                info!("Root load cancelled with no screen to return to, exiting");
                effects.push(Effect::Exit);
            }
            return effects;
        }

        match self.stack.pop() {
            Ok(Some(generation)) => {
                let mut effects = vec![Effect::Schedule {
                    timer: Timer::Transition(generation),
                    after: self.settings.animation_time,
                }];
                effects.extend(self.refresh_top_if_stale());
                effects
            }
            Ok(None) => {
                info!("Back on root screen, exiting");
                vec![Effect::Exit]
            }
            Err(e) => {
                warn!("Back rejected: {}", e);
                Vec::new()
            }
        }
    }

    fn begin(&mut self, request: NavigationRequest) -> Vec<Effect> {
        if let Some(current) = &self.attempt {
            error!(
                "Navigation to {} rejected: {} still in flight ({:?})",
                request.describe(),
                current.request.describe(),
                current.phase
            );
            return Vec::new();
        }
        if self.stack.is_transitioning() || self.dialog.is_some() {
            warn!("Navigation to {} ignored, UI is busy", request.describe());
            return Vec::new();
        }

        self.next_attempt += 1;
        let id = AttemptId(self.next_attempt);
        let cancel = CancellationToken::new();
        info!("Navigating to {} ({:?})", request.describe(), id);

        let mut effects = Vec::new();
        if let Some(started) = self.overlay.start() {
            for superseded in started.flushed {
                warn!("Dropping superseded dialog: {}", superseded.title);
            }
            effects.push(Effect::Schedule {
                timer: Timer::SpinnerDelay(started.generation),
                after: started.delay,
            });
        }

        self.attempt = Some(Attempt {
            id,
            request: request.clone(),
            phase: NavigationPhase::Fetching,
            cancel: cancel.clone(),
            pending: None,
        });

        match request {
            NavigationRequest::Url(url) => {
                effects.push(Effect::Fetch {
                    attempt: id,
                    url,
                    cancel,
                });
            }
            NavigationRequest::Action(action) => effects.extend(self.prepare(action)),
        }
        effects
    }

    /// Validating → Resolving → LoadingScreenContent.
    fn prepare(&mut self, action: CrexAction) -> Vec<Effect> {
        self.set_phase(NavigationPhase::Validating);
        if action.requires_newer_client(self.settings.client_version) {
            return self.fail(NavigationError::VersionGate {
                required: action.required_crex_version.unwrap_or_default(),
                running: self.settings.client_version,
            });
        }

        self.set_phase(NavigationPhase::Resolving);
        let template = action.template.clone();
        let screen = match self.registry.instantiate(&template, action.data) {
            Ok(screen) => screen,
            Err(e) => return self.fail(e.into()),
        };

        self.set_phase(NavigationPhase::LoadingScreenContent);
        let source = screen.content_source();
        let Some(attempt) = self.attempt.as_mut() else {
            return Vec::new();
        };
        debug!("Loading content for {} from {:?}", template, source);
        attempt.pending = Some(screen);
        vec![Effect::LoadContent {
            target: LoadTarget::Pending(attempt.id),
            source,
            cancel: attempt.cancel.clone(),
        }]
    }

    fn fetch_completed(
        &mut self,
        attempt: AttemptId,
        result: Result<Value, FetchError>,
    ) -> Vec<Effect> {
        if !self.is_current(attempt, NavigationPhase::Fetching) {
            debug!("Dropping stale fetch result for {:?}", attempt);
            return Vec::new();
        }

        let document = match result {
            Ok(document) => document,
            Err(e) => return self.fail(e.into()),
        };
        match serde_json::from_value::<CrexAction>(document) {
            Ok(action) => self.prepare(action),
            Err(e) => self.fail(FetchError::Decode(format!("not a Crex action: {}", e)).into()),
        }
    }

    /// Committing: render, fingerprint, push.
    fn content_loaded(
        &mut self,
        attempt: AttemptId,
        result: Result<Value, FetchError>,
    ) -> Vec<Effect> {
        if !self.is_current(attempt, NavigationPhase::LoadingScreenContent) {
            debug!("Dropping stale content for {:?}", attempt);
            return Vec::new();
        }
        let document = match result {
            Ok(document) => document,
            Err(e) => return self.fail(e.into()),
        };

        self.set_phase(NavigationPhase::Committing);
        let Some(mut screen) = self.attempt.as_mut().and_then(|a| a.pending.take()) else {
            return Vec::new();
        };
        if let Err(e) = screen.render(&document) {
            return self.fail(e.into());
        }

        self.next_screen += 1;
        let mut descriptor = ScreenDescriptor::new(ScreenId(self.next_screen), screen);
        let fp = fingerprint(&document);
        descriptor.record_load(Some(fp), Instant::now());
        let template = descriptor.template().to_string();

        let generation = match self.stack.push(descriptor) {
            Ok(generation) => generation,
            Err(e) => return self.fail(e.into()),
        };

        if let Some(done) = self.attempt.take() {
            info!(
                "Committed {} from {} ({:?}, content {})",
                template,
                done.request.describe(),
                done.id,
                fp
            );
        }
        self.last_outcome = Some(NavigationOutcome::Done { template });

        let mut effects = vec![Effect::Schedule {
            timer: Timer::Transition(generation),
            after: self.settings.animation_time,
        }];
        let stopped = self.overlay.stop(None);
        effects.extend(self.overlay_stopped(stopped));
        effects
    }

    /// Ends the attempt and queues the matching dialog behind the overlay.
    fn fail(&mut self, err: NavigationError) -> Vec<Effect> {
        let Some(attempt) = self.attempt.take() else {
            return Vec::new();
        };
        attempt.cancel.cancel();

        let dialog = match &err {
            NavigationError::Cancelled => None,
            NavigationError::VersionGate { required, running } => {
                warn!(
                    "{} needs Crex version {}, running {}",
                    attempt.request.describe(),
                    required,
                    running
                );
                Some(Dialog::update_required())
            }
            NavigationError::UnresolvedTemplate(e) => {
                warn!("Unresolved template for {}: {}", attempt.request.describe(), e);
                Some(Dialog::data_error(attempt.request.clone()))
            }
            other => {
                warn!(
                    "Navigation to {} failed in {:?}: {}",
                    attempt.request.describe(),
                    attempt.phase,
                    other
                );
                Some(Dialog::data_error(attempt.request.clone()))
            }
        };

        self.last_outcome = Some(NavigationOutcome::Failed(err));
        let stopped = self.overlay.stop(dialog);
        self.overlay_stopped(stopped)
    }

    fn overlay_stopped(&mut self, stopped: Stopped<Dialog>) -> Vec<Effect> {
        match stopped {
            Stopped::Now(dialogs) => {
                self.present(dialogs);
                Vec::new()
            }
            Stopped::Fading {
                generation,
                duration,
            } => vec![Effect::Schedule {
                timer: Timer::SpinnerFade(generation),
                after: duration,
            }],
            Stopped::AlreadyFading => Vec::new(),
        }
    }

    fn present(&mut self, dialogs: Vec<Dialog>) {
        for dialog in dialogs {
            if let Some(replaced) = self.dialog.replace(dialog) {
                warn!("Dialog '{}' replaced before it was answered", replaced.title);
            }
        }
    }

    fn respond(&mut self, button: DialogButton) -> Vec<Effect> {
        let Some(dialog) = self.dialog.take() else {
            debug!("Dialog response {:?} with no dialog open", button);
            return Vec::new();
        };
        if !dialog.has_button(button) {
            warn!("Dialog '{}' has no {:?} button", dialog.title, button);
            self.dialog = Some(dialog);
            return Vec::new();
        }

        match (button, dialog.retry) {
            (DialogButton::Retry, Some(request)) => {
                info!("Retrying {}", request.describe());
                self.begin(request)
            }
            _ if self.stack.is_empty() => {
                info!("Dialog dismissed with no screen to return to, exiting");
                vec![Effect::Exit]
            }
            _ => Vec::new(),
        }
    }

    fn input(&mut self, input: ScreenInput) -> Vec<Effect> {
        if self.overlay.has_pending_callbacks() {
            return Vec::new();
        }
        if let Some(dialog) = self.dialog.as_mut() {
            match input {
                ScreenInput::Left | ScreenInput::Up => dialog.select_previous(),
                ScreenInput::Right | ScreenInput::Down => dialog.select_next(),
                ScreenInput::Select => {
                    let button = dialog.selected_button();
                    return self.respond(button);
                }
            }
            return Vec::new();
        }
        if self.stack.is_transitioning() || self.attempt.is_some() {
            debug!("Input {:?} ignored while busy", input);
            return Vec::new();
        }

        let request = self
            .stack
            .top_mut()
            .and_then(|top| top.screen_mut().handle_input(input));
        match request {
            Some(NavigationRequest::Url(url)) => self.navigate_to_url(url),
            Some(NavigationRequest::Action(action)) => self.navigate(action),
            None => Vec::new(),
        }
    }

    /// Issues a refresh for the top screen if its content has aged out.
    fn refresh_top_if_stale(&mut self) -> Option<Effect> {
        let ttl = self.settings.content_cache_time;
        let top = self.stack.top_mut()?;
        if !top.is_stale(Instant::now(), ttl) {
            return None;
        }

        if let Some(previous) = top.pending_refresh.take() {
            previous.cancel();
        }
        let cancel = CancellationToken::new();
        top.pending_refresh = Some(cancel.clone());
        debug!(
            "Refreshing {} ({:?}), content age {:?}",
            top.template(),
            top.id(),
            top.last_loaded_at().map(|at| at.elapsed())
        );
        Some(Effect::LoadContent {
            target: LoadTarget::Refresh(top.id()),
            source: top.screen().content_source(),
            cancel,
        })
    }

    fn refresh_loaded(&mut self, id: ScreenId, result: Result<Value, FetchError>) -> Vec<Effect> {
        let Some(descriptor) = self.stack.get_mut(id) else {
            debug!("Dropping refresh for released screen {:?}", id);
            return Vec::new();
        };
        match descriptor.pending_refresh.take() {
            Some(token) if !token.is_cancelled() => {}
            _ => {
                debug!("Dropping cancelled refresh for {:?}", id);
                return Vec::new();
            }
        }

        let now = Instant::now();
        let document = match result {
            Ok(document) => document,
            Err(e) => {
                warn!("Refresh of {} failed: {}", descriptor.template(), e);
                descriptor.record_load(None, now);
                return Vec::new();
            }
        };

        let fp = fingerprint(&document);
        if !has_changed(descriptor.content_fingerprint(), &fp) {
            debug!("{} content unchanged ({}), skipping render", descriptor.template(), fp);
            descriptor.record_load(None, now);
            return Vec::new();
        }

        match descriptor.screen_mut().render(&document) {
            Ok(()) => {
                info!("Refreshed {} (content {})", descriptor.template(), fp);
                descriptor.record_load(Some(fp), now);
            }
            Err(e) => {
                warn!("Refresh of {} rejected: {}", descriptor.template(), e);
                descriptor.record_load(None, now);
            }
        }
        Vec::new()
    }

    fn timer_fired(&mut self, timer: Timer) -> Vec<Effect> {
        match timer {
            Timer::SpinnerDelay(generation) => {
                if self.overlay.delay_elapsed(generation) {
                    debug!("Spinner visible");
                }
            }
            Timer::SpinnerFade(generation) => {
                let dialogs = self.overlay.fade_finished(generation);
                self.present(dialogs);
            }
            Timer::Transition(generation) => {
                if let Some(kind) = self.stack.finish_transition(generation) {
                    debug!("{:?} transition finished, depth {}", kind, self.stack.len());
                }
            }
        }
        Vec::new()
    }

    fn is_current(&self, id: AttemptId, phase: NavigationPhase) -> bool {
        self.attempt
            .as_ref()
            .is_some_and(|a| a.id == id && a.phase == phase && !a.cancel.is_cancelled())
    }

    fn set_phase(&mut self, phase: NavigationPhase) {
        if let Some(attempt) = self.attempt.as_mut() {
            debug!("{:?}: {:?} -> {:?}", attempt.id, attempt.phase, phase);
            attempt.phase = phase;
        }
    }
}

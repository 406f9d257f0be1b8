use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::{PageRenderer, PageTransport, PagerError, Toast, TriggerState};
use crate::listing::{BatchPayload, ListNotice};
use crate::pagination::{ListWindow, OffsetLimitResolver, SortDirection, WindowRequest};

const END_OF_LIST: &str = "You reached the end of the list.";

#[derive(Debug, Clone, Copy)]
pub struct PagerSettings {
    pub limit: i64,
    pub direction: SortDirection,
    // delay between two revealed items
    pub reveal_step: Duration,
    pub request_timeout: Duration,
}

impl PagerSettings {
    #[must_use]
    pub const fn new(limit: i64, direction: SortDirection) -> Self {
        Self {
            limit,
            direction,
            reveal_step: Duration::from_millis(250),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerPhase {
    Idle,
    Loading,
    Success,
    Error,
}

/// What the page was rendered with: the window on screen and the count it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerSeed {
    pub window: ListWindow,
    pub total_count: i64,
}

impl From<&BatchPayload> for PagerSeed {
    fn from(batch: &BatchPayload) -> Self {
        Self {
            window: batch.window,
            total_count: batch.total_count,
        }
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        window: ListWindow,
        inserted: usize,
        ended: bool,
        notice: Option<ListNotice>,
    },
    // a request is already in flight, nothing was sent
    Busy,
    // nothing left to load, nothing was sent
    EndReached,
    // cancelled or reset while loading, the response was dropped
    Discarded,
    Failed(PagerError),
}

#[derive(Debug)]
struct PagerState {
    phase: PagerPhase,
    shown: ListWindow,
    total_count: i64,
    ended: bool,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl PagerState {
    fn seeded(seed: PagerSeed, generation: u64) -> Self {
        Self {
            phase: PagerPhase::Idle,
            shown: seed.window,
            total_count: seed.total_count,
            ended: is_last_window(&seed.window, seed.total_count),
            generation,
            in_flight: None,
        }
    }
}

/// Drives one "load more" list: computes the next window, fetches it, and
/// hands the items to the renderer.
///
/// At most one request is in flight at a time. `cancel` and `reset` bump a
/// generation counter, so a response that arrives afterwards is dropped
/// instead of being rendered on top of the new state.
pub struct ClientPager<T, R> {
    transport: T,
    renderer: R,
    resolver: OffsetLimitResolver,
    settings: PagerSettings,
    state: Mutex<PagerState>,
}

impl<T, R> ClientPager<T, R>
where
    T: PageTransport,
    R: PageRenderer,
{
    pub fn new(transport: T, renderer: R, settings: PagerSettings, seed: PagerSeed) -> Self {
        let state = PagerState::seeded(seed, 0);
        renderer.set_trigger(trigger_for(state.ended));
        Self {
            transport,
            renderer,
            resolver: OffsetLimitResolver::new(settings.limit),
            settings,
            state: Mutex::new(state),
        }
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub async fn phase(&self) -> PagerPhase {
        self.state.lock().await.phase
    }

    pub async fn shown_window(&self) -> ListWindow {
        self.state.lock().await.shown
    }

    pub async fn is_ended(&self) -> bool {
        self.state.lock().await.ended
    }

    #[tracing::instrument(name = "Load more", skip(self))]
    pub async fn load_more(&self) -> LoadOutcome {
        let (window, token, generation) = {
            let mut state = self.state.lock().await;
            if state.phase != PagerPhase::Idle {
                tracing::debug!(phase = ?state.phase, "Load more ignored while busy");
                return LoadOutcome::Busy;
            }
            let Some(window) = self.next_window(&state) else {
                state.ended = true;
                self.renderer.set_trigger(TriggerState::Hidden);
                return LoadOutcome::EndReached;
            };
            let token = CancellationToken::new();
            state.phase = PagerPhase::Loading;
            state.in_flight = Some(token.clone());
            (window, token, state.generation)
        };

        self.renderer.set_trigger(TriggerState::Disabled);
        self.renderer.set_busy(true);
        let guard = LoadGuard {
            state: &self.state,
            renderer: &self.renderer,
            generation,
            settled: false,
        };

        let response = tokio::select! {
            () = token.cancelled() => return guard.settle(LoadOutcome::Discarded),
            response = tokio::time::timeout(
                self.settings.request_timeout,
                self.transport.fetch(&window),
            ) => response.unwrap_or_else(|_| Err(PagerError::Timeout(self.settings.request_timeout))),
        };

        let outcome = match response {
            Ok(batch) => self.apply(batch, &token, generation).await,
            Err(e) => self.fail(e, generation).await,
        };
        guard.settle(outcome)
    }

    /// Abandon the request in flight, if any. Its response will not be rendered.
    pub async fn cancel(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        if let Some(token) = state.in_flight.take() {
            tracing::debug!("Cancelled the list request in flight");
            token.cancel();
        }
        state.phase = PagerPhase::Idle;
        self.renderer.set_busy(false);
        self.renderer.set_trigger(trigger_for(state.ended));
    }

    /// Start over from a freshly rendered page.
    pub async fn reset(&self, seed: PagerSeed) {
        let mut state = self.state.lock().await;
        if let Some(token) = state.in_flight.take() {
            token.cancel();
        }
        let generation = state.generation + 1;
        *state = PagerState::seeded(seed, generation);
        self.renderer.set_busy(false);
        self.renderer.set_trigger(trigger_for(state.ended));
    }

    // the window right after the one on screen, re-resolved the way the server does it
    fn next_window(&self, state: &PagerState) -> Option<ListWindow> {
        if state.ended || state.total_count <= 0 {
            return None;
        }
        let shown = state.shown;
        let limit = self.resolver.default_limit();
        if shown.is_empty() {
            return Some(
                self.resolver
                    .default_window(self.settings.direction, state.total_count),
            );
        }
        let offset = match shown.direction {
            SortDirection::Desc => shown.offset.saturating_sub(limit),
            SortDirection::Asc => shown.end(),
        };
        let request = WindowRequest::new(offset, Some(limit), shown.direction.as_str());
        let resolved = self.resolver.resolve(&request, state.total_count);
        (!resolved.window.is_empty()).then_some(resolved.window)
    }

    async fn apply(
        &self,
        batch: BatchPayload,
        token: &CancellationToken,
        generation: u64,
    ) -> LoadOutcome {
        {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                return LoadOutcome::Discarded;
            }
            state.phase = PagerPhase::Success;
        }

        if batch.notice.is_some() {
            self.renderer.clear_list();
        }
        for (index, entry) in batch.items.iter().enumerate() {
            if index > 0 {
                tokio::select! {
                    () = token.cancelled() => return LoadOutcome::Discarded,
                    () = tokio::time::sleep(self.settings.reveal_step) => {}
                }
            }
            if token.is_cancelled() {
                return LoadOutcome::Discarded;
            }
            self.renderer.insert(entry);
        }

        let mut state = self.state.lock().await;
        if state.generation != generation {
            return LoadOutcome::Discarded;
        }
        let ended = batch.items.is_empty() || is_last_window(&batch.window, batch.total_count);
        state.shown = batch.window;
        state.total_count = batch.total_count;
        state.ended = ended;
        state.in_flight = None;
        state.phase = PagerPhase::Idle;

        self.renderer.set_busy(false);
        // one toast per batch, the reset warning wins over the end of list
        if let Some(notice) = batch.notice {
            self.renderer.toast(Toast::warning(notice_message(notice)));
        } else if ended {
            self.renderer.toast(Toast::info(END_OF_LIST));
        }
        self.renderer.set_trigger(trigger_for(ended));
        tracing::debug!(
            offset = batch.window.offset,
            limit = batch.window.limit,
            ended,
            "List window rendered"
        );

        LoadOutcome::Loaded {
            window: batch.window,
            inserted: batch.items.len(),
            ended,
            notice: batch.notice,
        }
    }

    async fn fail(&self, error: PagerError, generation: u64) -> LoadOutcome {
        let mut state = self.state.lock().await;
        if state.generation != generation {
            return LoadOutcome::Discarded;
        }
        state.phase = PagerPhase::Error;
        tracing::warn!(error.cause_chain = ?error, error.message = %error, "Loading more items failed");

        self.renderer.set_busy(false);
        let message = match error.status() {
            Some(status) => format!("Loading more items failed (HTTP {status})."),
            None => format!("Loading more items failed: {error}."),
        };
        self.renderer.toast(Toast::error(message));
        self.renderer.set_trigger(TriggerState::Enabled);

        state.in_flight = None;
        state.phase = PagerPhase::Idle;
        LoadOutcome::Failed(error)
    }
}

// Puts the pager back to Idle when a `load_more` future is dropped before it
// settles, e.g. by a caller-side timeout or an aborted task.
struct LoadGuard<'a, R: PageRenderer> {
    state: &'a Mutex<PagerState>,
    renderer: &'a R,
    generation: u64,
    settled: bool,
}

impl<R: PageRenderer> LoadGuard<'_, R> {
    fn settle(mut self, outcome: LoadOutcome) -> LoadOutcome {
        self.settled = true;
        outcome
    }
}

impl<R: PageRenderer> Drop for LoadGuard<'_, R> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let Ok(mut state) = self.state.try_lock() else {
            tracing::warn!("Pager state busy while dropping an unfinished load");
            return;
        };
        // cancel and reset already restored a newer generation
        if state.generation != self.generation || state.phase == PagerPhase::Idle {
            return;
        }
        if let Some(token) = state.in_flight.take() {
            token.cancel();
        }
        state.phase = PagerPhase::Idle;
        self.renderer.set_busy(false);
        self.renderer.set_trigger(trigger_for(state.ended));
        tracing::debug!("Unfinished load dropped, pager back to idle");
    }
}

// rank 0 closes a DESC list, the last rank closes an ASC one
fn is_last_window(window: &ListWindow, total_count: i64) -> bool {
    if total_count <= 0 {
        return true;
    }
    if window.is_empty() {
        return false;
    }
    match window.direction {
        SortDirection::Desc => window.offset <= 0,
        SortDirection::Asc => window.end() >= total_count,
    }
}

const fn trigger_for(ended: bool) -> TriggerState {
    if ended {
        TriggerState::Hidden
    } else {
        TriggerState::Enabled
    }
}

const fn notice_message(notice: ListNotice) -> &'static str {
    match notice {
        ListNotice::Outdated => "The list changed in the meantime and was reloaded.",
        ListNotice::Reset => "The list was reinitialized after a server-side error.",
    }
}

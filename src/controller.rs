//! The bell's state machine.
//!
//! [`BellController`] runs as a single tokio task multiplexing the recurring
//! unread-count poll, user actions from the view layer, and completions of
//! in-flight fetches. State mutations all happen on that one task; the view
//! layer observes them through a watch channel of [`BellState`] snapshots.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, warn};

use crate::api::NotificationsApi;
use crate::constants::INPUT_CHANNEL_CAPACITY;
use crate::state::BellState;
use neurorecall_notifications_config::BellConfig;
use neurorecall_notifications_util::Notification;

/// Messages consumed by the controller task: user actions from the view
/// layer plus completions reported by detached fetch tasks.
#[derive(Debug)]
enum Input {
    /// Toggle the dropdown; opening triggers a list fetch
    ToggleDropdown,
    /// Close the dropdown without toggling
    Close,
    /// Request mark-one-read for the given notification id
    MarkAsRead(i64),
    /// Request mark-all-read
    MarkAllAsRead,
    /// A list fetch resolved successfully
    ListFetched(Vec<Notification>),
    /// A list fetch failed; loading ends, held entries stay
    ListFetchFailed,
    /// The server accepted a mark-one-read
    MarkedRead(i64),
    /// The server accepted a mark-all-read
    MarkedAllRead,
    /// Tear the controller down
    Shutdown,
}

/// Handle owned by the view layer.
///
/// Dropping the handle aborts the controller task, which also aborts the
/// in-flight poll fetch, so no state update can land after the component is
/// gone. Detached fetches (list, mark-read) are left to finish; their
/// completions go nowhere once the task's receiver is dropped.
pub struct BellHandle {
    input_tx: mpsc::Sender<Input>,
    state_rx: watch::Receiver<BellState>,
    task: Option<JoinHandle<()>>,
}

impl BellHandle {
    /// Subscribe to state snapshots. The receiver starts at the latest
    /// published state; `changed()` resolves on the next mutation.
    pub fn state(&self) -> watch::Receiver<BellState> {
        self.state_rx.clone()
    }

    /// The latest published state, cloned.
    pub fn current_state(&self) -> BellState {
        self.state_rx.borrow().clone()
    }

    /// Toggle the dropdown open or closed. Opening re-fetches the list.
    pub async fn toggle_dropdown(&self) {
        self.send(Input::ToggleDropdown).await;
    }

    /// Close the dropdown. In-flight list fetches are not cancelled.
    pub async fn close(&self) {
        self.send(Input::Close).await;
    }

    /// Mark one notification read. Best-effort: a failed request leaves
    /// local state untouched and is only logged.
    pub async fn mark_as_read(&self, id: i64) {
        self.send(Input::MarkAsRead(id)).await;
    }

    /// Mark every notification read in a single bulk request.
    pub async fn mark_all_as_read(&self) {
        self.send(Input::MarkAllAsRead).await;
    }

    /// Graceful teardown: stops the poll timer, aborts the in-flight count
    /// fetch, and waits for the controller task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.input_tx.send(Input::Shutdown).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    async fn send(&self, input: Input) {
        if self.input_tx.send(input).await.is_err() {
            debug!("Bell controller is gone; dropping input");
        }
    }
}

impl Drop for BellHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Owns [`BellState`] and reconciles optimistic updates with server polls.
pub struct BellController {
    api: Arc<dyn NotificationsApi>,
    config: BellConfig,
    state: BellState,
    state_tx: watch::Sender<BellState>,
    input_tx: mpsc::Sender<Input>,
}

impl BellController {
    /// Spawn the controller task. Polling starts immediately: the unread
    /// count is fetched at once and then on every interval until teardown.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(api: Arc<dyn NotificationsApi>, config: BellConfig) -> BellHandle {
        let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(BellState::new());

        let controller = BellController {
            api,
            config,
            state: BellState::new(),
            state_tx,
            input_tx: input_tx.clone(),
        };
        let task = tokio::spawn(controller.run(input_rx));

        BellHandle {
            input_tx,
            state_rx,
            task: Some(task),
        }
    }

    async fn run(mut self, mut input_rx: mpsc::Receiver<Input>) {
        // interval(0) panics; floor the configured period at 1ms
        let period = Duration::from_millis(self.config.poll_interval_ms.max(1));
        let mut interval = tokio::time::interval(period);
        let mut polls: JoinSet<Result<u64, crate::api::ApiError>> = JoinSet::new();

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let api = Arc::clone(&self.api);
                    polls.spawn(async move { api.unread_count().await });
                }
                Some(done) = polls.join_next(), if !polls.is_empty() => {
                    match done {
                        Ok(Ok(count)) => {
                            self.state.apply_count(count);
                            self.publish();
                        }
                        // Swallowed; the next poll tick self-heals
                        Ok(Err(err)) => warn!("Unread count fetch failed: {err}"),
                        Err(err) if err.is_cancelled() => {}
                        Err(err) => error!("Unread count task failed: {err}"),
                    }
                }
                input = input_rx.recv() => {
                    let Some(input) = input else { break };
                    match input {
                        Input::Shutdown => break,
                        Input::ToggleDropdown => {
                            if self.state.toggle_open() {
                                self.spawn_list_fetch();
                            }
                            self.publish();
                        }
                        Input::Close => {
                            self.state.close();
                            self.publish();
                        }
                        Input::MarkAsRead(id) => self.spawn_mark_read(id),
                        Input::MarkAllAsRead => self.spawn_mark_all_read(),
                        Input::ListFetched(list) => {
                            self.state.apply_list(list);
                            self.publish();
                        }
                        Input::ListFetchFailed => {
                            self.state.list_fetch_failed();
                            self.publish();
                        }
                        Input::MarkedRead(id) => {
                            self.state.mark_read(id);
                            self.publish();
                        }
                        Input::MarkedAllRead => {
                            self.state.mark_all_read();
                            self.publish();
                        }
                    }
                }
            }
        }

        polls.abort_all();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }

    fn spawn_list_fetch(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.input_tx.clone();
        let limit = self.config.list_limit;
        tokio::spawn(async move {
            let input = match api.recent(limit).await {
                Ok(list) => Input::ListFetched(list),
                Err(err) => {
                    warn!("Notification list fetch failed: {err}");
                    Input::ListFetchFailed
                }
            };
            // The controller may be gone by the time the fetch resolves
            if tx.send(input).await.is_err() {
                debug!("Dropping list fetch result; controller shut down");
            }
        });
    }

    fn spawn_mark_read(&self, id: i64) {
        let api = Arc::clone(&self.api);
        let tx = self.input_tx.clone();
        tokio::spawn(async move {
            match api.mark_read(id).await {
                Ok(()) => {
                    if tx.send(Input::MarkedRead(id)).await.is_err() {
                        debug!("Dropping mark-read result; controller shut down");
                    }
                }
                // No local mutation on failure
                Err(err) => warn!("Mark-read for notification {id} failed: {err}"),
            }
        });
    }

    fn spawn_mark_all_read(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.input_tx.clone();
        tokio::spawn(async move {
            match api.mark_all_read().await {
                Ok(()) => {
                    if tx.send(Input::MarkedAllRead).await.is_err() {
                        debug!("Dropping mark-all-read result; controller shut down");
                    }
                }
                Err(err) => warn!("Mark-all-read failed: {err}"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Semaphore;

    fn notification(id: i64, is_read: bool) -> Notification {
        Notification {
            id,
            message: format!("message {id}"),
            created_at: "2026-08-05T08:00:00".to_string(),
            is_read,
            user_id: 1,
            username: None,
            test_number: 1,
            attempt_number: 1,
        }
    }

    /// In-memory API double. `list_gate` holds list fetches until a permit
    /// is released, so tests can observe the loading state deterministically.
    #[derive(Default)]
    struct FakeApi {
        count: AtomicU64,
        count_calls: AtomicUsize,
        fail_count: AtomicBool,
        list: Mutex<Vec<Notification>>,
        list_gate: Option<Arc<Semaphore>>,
        fail_mark: AtomicBool,
    }

    impl FakeApi {
        fn with_count(count: u64) -> Arc<Self> {
            let api = Self::default();
            api.count.store(count, Ordering::SeqCst);
            Arc::new(api)
        }

        fn gated(count: u64, list: Vec<Notification>) -> (Arc<Self>, Arc<Semaphore>) {
            let gate = Arc::new(Semaphore::new(0));
            let api = Self {
                count: AtomicU64::new(count),
                list: Mutex::new(list),
                list_gate: Some(Arc::clone(&gate)),
                ..Self::default()
            };
            (Arc::new(api), gate)
        }

        fn count_calls(&self) -> usize {
            self.count_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationsApi for FakeApi {
        async fn unread_count(&self) -> Result<u64, ApiError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_count.load(Ordering::SeqCst) {
                return Err(ApiError::Server { status: 500 });
            }
            Ok(self.count.load(Ordering::SeqCst))
        }

        async fn recent(&self, _limit: u32) -> Result<Vec<Notification>, ApiError> {
            if let Some(gate) = &self.list_gate {
                gate.acquire().await.unwrap().forget();
            }
            Ok(self.list.lock().unwrap().clone())
        }

        async fn mark_read(&self, _id: i64) -> Result<(), ApiError> {
            if self.fail_mark.load(Ordering::SeqCst) {
                return Err(ApiError::Server { status: 500 });
            }
            Ok(())
        }

        async fn mark_all_read(&self) -> Result<(), ApiError> {
            if self.fail_mark.load(Ordering::SeqCst) {
                return Err(ApiError::Server { status: 500 });
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_poll_seeds_unread_count() {
        let api = FakeApi::with_count(5);
        let handle = BellController::spawn(api.clone(), BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().unread_count(), 5);
        assert_eq!(rx.borrow().badge_label().as_deref(), Some("5"));
        assert_eq!(api.count_calls(), 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_refreshes_on_interval() {
        let api = FakeApi::with_count(2);
        let handle = BellController::spawn(api.clone(), BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().unread_count(), 2);

        api.count.store(7, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(31)).await;

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().unread_count(), 7);
        assert_eq!(api.count_calls(), 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_failure_is_swallowed_and_self_heals() {
        let api = FakeApi::with_count(3);
        api.fail_count.store(true, Ordering::SeqCst);
        let handle = BellController::spawn(api.clone(), BellConfig::default());
        let mut rx = handle.state();

        // Failed poll publishes nothing
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow().unread_count(), 0);

        // Next tick succeeds
        api.fail_count.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(31)).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().unread_count(), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_mark_read_applies_without_count_refetch() {
        let api = FakeApi::with_count(5);
        let handle = BellController::spawn(api.clone(), BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().badge_label().as_deref(), Some("5"));

        handle.mark_as_read(7).await;
        rx.changed().await.unwrap();

        assert_eq!(rx.borrow().unread_count(), 4);
        assert_eq!(rx.borrow().badge_label().as_deref(), Some("4"));
        assert_eq!(api.count_calls(), 1, "count must not be re-fetched");

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_badge_caps_at_99() {
        let api = FakeApi::with_count(150);
        let handle = BellController::spawn(api, BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().badge_label().as_deref(), Some("99+"));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_shows_loading_then_empty() {
        let (api, gate) = FakeApi::gated(0, Vec::new());
        let handle = BellController::spawn(api, BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap(); // initial count

        handle.toggle_dropdown().await;
        rx.changed().await.unwrap();
        {
            let state = rx.borrow();
            assert!(state.is_open());
            assert!(state.loading());
            assert_eq!(state.panel_state(), crate::state::PanelState::Loading);
        }

        gate.add_permits(1);
        rx.changed().await.unwrap();
        {
            let state = rx.borrow();
            assert!(!state.loading());
            assert_eq!(state.panel_state(), crate::state::PanelState::Empty);
        }

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_does_not_cancel_list_fetch() {
        let (api, gate) = FakeApi::gated(1, vec![notification(1, false)]);
        let handle = BellController::spawn(api, BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap(); // initial count

        handle.toggle_dropdown().await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_open());

        // Toggling again closes while the fetch is still gated
        handle.toggle_dropdown().await;
        rx.changed().await.unwrap();
        assert!(!rx.borrow().is_open());
        assert!(rx.borrow().loading());

        // The fetch still lands and updates held state
        gate.add_permits(1);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().notifications().len(), 1);
        assert!(!rx.borrow().loading());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_mark_failure_leaves_state_untouched() {
        let api = FakeApi::with_count(5);
        api.fail_mark.store(true, Ordering::SeqCst);
        let handle = BellController::spawn(api, BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap();

        handle.mark_as_read(1).await;
        handle.mark_all_as_read().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow().unread_count(), 5);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_mark_all_read_clears_everything() {
        let (api, gate) = FakeApi::gated(
            150,
            vec![notification(1, false), notification(2, false)],
        );
        gate.add_permits(1);
        let handle = BellController::spawn(api, BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap(); // initial count

        handle.toggle_dropdown().await;
        loop {
            rx.changed().await.unwrap();
            if !rx.borrow().loading() {
                break;
            }
        }
        assert_eq!(rx.borrow().notifications().len(), 2);

        handle.mark_all_as_read().await;
        rx.changed().await.unwrap();
        {
            let state = rx.borrow();
            assert_eq!(state.unread_count(), 0);
            assert_eq!(state.badge_label(), None);
            assert!(state.notifications().iter().all(|n| n.is_read));
        }

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_polling_and_publishing() {
        let api = FakeApi::with_count(1);
        let handle = BellController::spawn(api.clone(), BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap();
        assert_eq!(api.count_calls(), 1);

        // Teardown while the 30s poll timer is pending
        handle.shutdown().await;

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(api.count_calls(), 1, "no polls after shutdown");
        assert!(rx.has_changed().is_err(), "state channel must be closed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_aborts_controller() {
        let api = FakeApi::with_count(1);
        let handle = BellController::spawn(api.clone(), BellConfig::default());
        let mut rx = handle.state();

        rx.changed().await.unwrap();
        drop(handle);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(api.count_calls(), 1, "no polls after the handle is gone");
    }
}

//! The authoritative state store: one mutation path for every trigger.
//!
//! [`StateStore`] owns the in-memory [`OverlayState`], the JSON file it is
//! persisted to, and the broadcast channel live displays subscribe to.
//! Every mutation -- control API, webhook, host-shell key binding, external
//! file edit -- funnels through the locked apply sequence: merge, clamp,
//! persist, broadcast. Nothing else touches the file or the channel, which
//! is what keeps HTTP callers, displays, and the persisted state agreed.
//!
//! Storage failures are never fatal: reads fall back to the in-memory
//! state and failed writes leave the previous persisted state untouched,
//! both logged.

use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, broadcast};
use tracing::{debug, error, warn};

use crate::action::Action;
use crate::state::{OverlayPatch, OverlayState};

/// Capacity of the broadcast channel for state snapshots.
///
/// A display that falls behind by more than this many snapshots receives
/// [`broadcast::error::RecvError::Lagged`] and resumes from the newest
/// one -- full snapshots make skipping safe.
const BROADCAST_CAPACITY: usize = 256;

/// The canonical overlay state plus its persistence and broadcast plumbing.
pub struct StateStore {
    path: PathBuf,
    state: Mutex<OverlayState>,
    tx: broadcast::Sender<OverlayState>,
}

impl StateStore {
    /// Open the store backed by the given JSON file.
    ///
    /// Creates the parent directory and seeds the file with the documented
    /// defaults when absent; otherwise merges the file's contents over the
    /// defaults. All storage errors degrade to in-memory defaults with a
    /// warning -- opening never fails.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(path = %parent.display(), "could not create config directory: {e}");
        }

        let mut state = OverlayState::default();
        if path.exists() {
            merge_from_disk(&path, &mut state);
        } else {
            persist(&path, &state);
        }

        Self {
            path,
            state: Mutex::new(state),
            tx,
        }
    }

    /// The durable storage location this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current in-memory snapshot. Does not touch storage.
    pub async fn snapshot(&self) -> OverlayState {
        self.state.lock().await.clone()
    }

    /// Re-read durable storage and merge it into the in-memory state.
    ///
    /// Read or parse failures log a warning and leave the in-memory state
    /// as-is; the returned snapshot is always the post-merge truth.
    pub async fn load(&self) -> OverlayState {
        let mut state = self.state.lock().await;
        merge_from_disk(&self.path, &mut state);
        state.clone()
    }

    /// The single mutation entry point: merge, clamp, persist, broadcast.
    ///
    /// The lock is held across the whole sequence, so concurrent mutations
    /// serialize and a counter increment can never be lost.
    pub async fn apply_and_persist(&self, patch: OverlayPatch) -> OverlayState {
        let mut state = self.state.lock().await;
        self.apply_locked(&mut state, patch)
    }

    /// Resolve an [`Action`] against the live counter and apply it.
    ///
    /// Resolution happens inside the critical section: two concurrent
    /// `win_plus` commands both observe the counter value left by the
    /// other, not a stale read.
    pub async fn dispatch(&self, action: Action) -> OverlayState {
        let mut state = self.state.lock().await;
        debug!(action = action.name(), "dispatching action");
        let patch = action.into_patch(state.current);
        self.apply_locked(&mut state, patch)
    }

    /// Increment the counter by one.
    ///
    /// The shared step-1 path behind `POST /api/win/plus` and any host
    /// shell key binding.
    pub async fn increment(&self) -> OverlayState {
        self.dispatch(Action::WinPlus(1)).await
    }

    /// Decrement the counter by one.
    pub async fn decrement(&self) -> OverlayState {
        self.dispatch(Action::WinMinus(1)).await
    }

    /// Subscribe to post-mutation snapshots.
    ///
    /// Subscribing is how a live display registers with the broadcast hub;
    /// dropping the receiver unregisters it. Each receiver sees snapshots
    /// in mutation order.
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayState> {
        self.tx.subscribe()
    }

    /// Re-read storage after an external edit and broadcast when it
    /// actually changed something.
    ///
    /// The value comparison filters out the filesystem events our own
    /// persists generate. Returns the new snapshot when a change was
    /// picked up.
    pub async fn reload_if_changed(&self) -> Option<OverlayState> {
        let mut state = self.state.lock().await;
        let before = state.clone();
        merge_from_disk(&self.path, &mut state);
        if *state == before {
            return None;
        }
        let snapshot = state.clone();
        drop(state);
        self.broadcast(&snapshot);
        Some(snapshot)
    }

    /// Merge + clamp + persist + broadcast, with the state lock held.
    fn apply_locked(&self, state: &mut OverlayState, patch: OverlayPatch) -> OverlayState {
        state.apply(patch);
        let snapshot = state.clone();
        persist(&self.path, &snapshot);
        self.broadcast(&snapshot);
        snapshot
    }

    /// Push a snapshot to every subscribed display.
    ///
    /// Returns the number of receivers; zero receivers is normal, not an
    /// error.
    fn broadcast(&self, snapshot: &OverlayState) -> usize {
        let receivers = self.tx.send(snapshot.clone()).unwrap_or(0);
        debug!(
            receivers,
            current = snapshot.current,
            max_win = snapshot.max_win,
            "state broadcast"
        );
        receivers
    }
}

/// Tolerantly merge the persisted JSON into `state`, clamping on the way.
fn merge_from_disk(path: &Path, state: &mut OverlayState) {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => state.apply(OverlayPatch::from_value(&value)),
            Err(e) => warn!(path = %path.display(), "config parse failed, keeping in-memory state: {e}"),
        },
        Err(e) => warn!(path = %path.display(), "config read failed, keeping in-memory state: {e}"),
    }
}

/// Overwrite durable storage with the full state. Failures log and leave
/// the previous file contents in place.
fn persist(path: &Path, state: &OverlayState) {
    match serde_json::to_string_pretty(state) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                error!(path = %path.display(), "config write failed: {e}");
            }
        }
        Err(e) => error!("config serialize failed: {e}"),
    }
}

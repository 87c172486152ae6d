//! Best-effort detection of external edits to the persisted config file.
//!
//! The overlay's config file is documented as hand-editable: a streamer can
//! open `config.json`, tweak a value, and every connected display updates.
//! The watcher observes the file's directory (so replace-by-rename editors
//! are seen too), debounces the event bursts editors produce, and funnels
//! the change through the same load-and-broadcast path every other trigger
//! uses.
//!
//! Failing to set up the watch -- platform or permission issues -- only
//! costs external-edit detection; everything else keeps working.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::store::StateStore;

/// Editors emit several filesystem events per save; collapse each burst
/// into one reload.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Start watching the store's config file for external edits.
///
/// Returns the handle of the spawned watch task, or `None` when the watch
/// could not be established (logged as a warning, not an error).
pub fn spawn(store: Arc<StateStore>) -> Option<JoinHandle<()>> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);
    let mut watcher =
        match notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            let _ = tx.blocking_send(res);
        }) {
            Ok(watcher) => watcher,
            Err(e) => {
                warn!("config watcher unavailable, external edits will not be detected: {e}");
                return None;
            }
        };

    let target = store.path().to_path_buf();
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        warn!(path = %dir.display(), "config watch failed, external edits will not be detected: {e}");
        return None;
    }

    info!(path = %target.display(), "watching config file for external edits");

    Some(tokio::spawn(async move {
        // The watcher must outlive the task or the channel closes.
        let _watcher = watcher;

        while let Some(res) = rx.recv().await {
            match res {
                Ok(event) => {
                    let touches_config = (event.kind.is_modify() || event.kind.is_create())
                        && event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == target.file_name());
                    if !touches_config {
                        continue;
                    }

                    tokio::time::sleep(DEBOUNCE).await;
                    while rx.try_recv().is_ok() {}

                    if let Some(state) = store.reload_if_changed().await {
                        info!(
                            current = state.current,
                            max_win = state.max_win,
                            "external config edit applied"
                        );
                    } else {
                        debug!("config file event carried no state change");
                    }
                }
                Err(e) => warn!("config watch error: {e}"),
            }
        }
    }))
}

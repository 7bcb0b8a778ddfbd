//! Defines Firmata-Adaptor task runner.
//!
//! Event callbacks (the I2C reply handler included) run as tokio tasks. Inside a
//! `#[firmata_adaptor::runtime]` function, every task is tracked and awaited before the function
//! returns; anywhere else tasks are simply detached.
use std::future::Future;

use log::{error, trace};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::{Mutex, OnceCell};
use tokio::task::{AbortHandle, JoinHandle};

use crate::errors::{Error, RuntimeError};

/// Handle on a running task: allows to abort it.
pub type TaskHandler = AbortHandle;

/// What a task may end with: `()` or `Result<(), Error>`.
pub trait TaskOutput: Send + 'static {
    fn into_result(self) -> Result<(), Error>;
}

impl TaskOutput for () {
    fn into_result(self) -> Result<(), Error> {
        Ok(())
    }
}

impl TaskOutput for Result<(), Error> {
    fn into_result(self) -> Result<(), Error> {
        self
    }
}

struct TaskTracker {
    sender: UnboundedSender<JoinHandle<Result<(), Error>>>,
    receiver: Mutex<UnboundedReceiver<JoinHandle<Result<(), Error>>>>,
}

static TRACKER: OnceCell<TaskTracker> = OnceCell::const_new();

/// Starts tracking the tasks spawned by [`run`] (once per process).
pub async fn init_task_channel() {
    TRACKER
        .get_or_init(|| async {
            let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
            TaskTracker {
                sender,
                receiver: Mutex::new(receiver),
            }
        })
        .await;
}

/// Awaits every tracked task, including the ones spawned while waiting.
///
/// Failing tasks are logged, not propagated.
pub async fn wait_all() {
    let Some(tracker) = TRACKER.get() else {
        return;
    };
    let mut receiver = tracker.receiver.lock().await;
    while let Ok(handle) = receiver.try_recv() {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!("Task failed: {}", err),
            Err(err) if err.is_cancelled() => trace!("Task aborted"),
            Err(err) => error!("Task panicked: {}", err),
        }
    }
}

/// Runs a given future as a Tokio task.
///
/// Inside a `#[firmata_adaptor::runtime]` function, the function will not return before the task
/// is done.
///
/// # Errors
/// Returns `RuntimeError` when called outside a tokio runtime: the future is dropped.
///
/// # Example
/// ```
/// use firmata_adaptor::utils::task;
///
/// #[firmata_adaptor::runtime]
/// async fn main() {
///     task::run(async move {
///         // whatever
///     }).unwrap();
/// }
/// ```
pub fn run<F, T>(future: F) -> Result<TaskHandler, Error>
where
    F: Future<Output = T> + Send + 'static,
    T: TaskOutput,
{
    let runtime = Handle::try_current().map_err(|_| RuntimeError)?;
    let handle = runtime.spawn(async move { future.await.into_result() });
    let abort = handle.abort_handle();

    // Untracked tasks are detached.
    if let Some(tracker) = TRACKER.get() {
        let _ = tracker.sender.send(handle);
    }
    Ok(abort)
}

#[macro_export]
macro_rules! pause {
    ($ms:expr) => {
        $crate::utils::tokio::time::sleep($crate::utils::tokio::time::Duration::from_millis(
            $ms as u64,
        ))
        .await
    };
}

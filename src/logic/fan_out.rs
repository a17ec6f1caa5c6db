use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::error::ApiError;

/// Run `task` over `items` with at most `workers` calls in flight.
///
/// A fixed set of workers pulls indexes from a shared cursor until it is
/// exhausted. Results keep the input order. After the first failure no new
/// items are started, and the failure with the lowest index is returned.
pub async fn fan_out<T, R, F, Fut>(items: Vec<T>, workers: usize, task: F) -> Result<Vec<R>, ApiError>
where
    T: Send + Sync + 'static,
    R: Send + 'static,
    F: Fn(&T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
{
    let len = items.len();
    if len == 0 {
        return Ok(Vec::new());
    }

    let items = Arc::new(items);
    let task = Arc::new(task);
    let cursor = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicBool::new(false));
    let slots: Arc<Mutex<Vec<Option<Result<R, ApiError>>>>> =
        Arc::new(Mutex::new((0..len).map(|_| None).collect()));

    let mut join_set = JoinSet::new();
    for _ in 0..workers.clamp(1, len) {
        let items = Arc::clone(&items);
        let task = Arc::clone(&task);
        let cursor = Arc::clone(&cursor);
        let failed = Arc::clone(&failed);
        let slots = Arc::clone(&slots);

        join_set.spawn(async move {
            loop {
                if failed.load(Ordering::Relaxed) {
                    break;
                }
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                if index >= items.len() {
                    break;
                }
                let outcome = (*task)(&items[index]).await;
                if outcome.is_err() {
                    failed.store(true, Ordering::Relaxed);
                }
                slots.lock()[index] = Some(outcome);
            }
        });
    }

    while let Some(joined) = join_set.join_next().await {
        joined.map_err(|e| ApiError::internal("FAN_OUT_FAILED").with_details(e.to_string()))?;
    }

    let slots = std::mem::take(&mut *slots.lock());
    if let Some(error) = slots.iter().find_map(|slot| match slot {
        Some(Err(error)) => Some(error.clone()),
        _ => None,
    }) {
        return Err(error);
    }

    slots
        .into_iter()
        .map(|slot| match slot {
            Some(Ok(value)) => Ok(value),
            _ => Err(ApiError::internal("FAN_OUT_FAILED")),
        })
        .collect()
}

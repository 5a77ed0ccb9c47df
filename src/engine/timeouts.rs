//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound the wait for the response head
//! - Bound the silence between body frames
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - `None` means no deadline
//! - The caller decides which error an elapsed deadline becomes

use std::future::Future;
use std::time::Duration;

/// Run `fut` under an optional deadline, mapping expiry with `on_elapsed`.
pub async fn with_deadline<F, T, E>(
    limit: Option<Duration>,
    fut: F,
    on_elapsed: impl FnOnce(Duration) -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(on_elapsed(limit)),
        },
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn elapsed_deadline_maps_error() {
        let result: Result<(), String> = with_deadline(
            Some(Duration::from_millis(10)),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            },
            |d| format!("after {:?}", d),
        )
        .await;
        assert_eq!(result, Err("after 10ms".to_string()));
    }

    #[tokio::test]
    async fn no_deadline_waits() {
        let result: Result<u8, String> = with_deadline(None, async { Ok(7) }, |_| unreachable!()).await;
        assert_eq!(result, Ok(7));
    }
}

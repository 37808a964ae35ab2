//! Optimistic update as a small transaction.
//!
//! 1. `apply` writes the speculative state and returns the snapshot of
//!    what it replaced (or refuses with an error, e.g. entity missing).
//! 2. `remote` builds the server call from the snapshot.
//! 3. On success `commit` sees the snapshot and the server's answer.
//! 4. On failure `rollback` receives the snapshot to restore verbatim.
//!
//! The snapshot is taken inside `apply`, atomically with the write, so a
//! rollback restores exactly the state this transaction replaced rather
//! than re-deriving it from whatever is current.

use std::future::Future;

pub async fn with_optimistic_update<S, T, E, Fut>(
    apply: impl FnOnce() -> Result<S, E>,
    remote: impl FnOnce(&S) -> Fut,
    commit: impl FnOnce(&S, &T),
    rollback: impl FnOnce(S),
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    let snapshot = apply()?;
    match remote(&snapshot).await {
        Ok(value) => {
            commit(&snapshot, &value);
            Ok(value)
        }
        Err(err) => {
            rollback(snapshot);
            Err(err)
        }
    }
}

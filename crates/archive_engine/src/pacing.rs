use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingSettings {
    /// Wait after each metadata lookup.
    pub metadata_delay: Duration,
    /// Wait between two transfers.
    pub transfer_delay: Duration,
    /// How long the completion message stays up.
    pub success_hold: Duration,
    /// How long failure and offline messages stay up.
    pub failure_hold: Duration,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            metadata_delay: Duration::from_millis(200),
            transfer_delay: Duration::from_millis(300),
            success_hold: Duration::from_millis(800),
            failure_hold: Duration::from_millis(1500),
        }
    }
}

impl PacingSettings {
    /// No waits at all; for tests and scripted runs.
    pub fn immediate() -> Self {
        Self {
            metadata_delay: Duration::ZERO,
            transfer_delay: Duration::ZERO,
            success_hold: Duration::ZERO,
            failure_hold: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceMode {
    /// Sleep after every item, including the last.
    AfterEach,
    /// Sleep only between items.
    Between,
}

/// What a stage produced before it finished or stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRun<R, E> {
    pub completed: Vec<R>,
    pub failure: Option<E>,
}

/// Runs `stage` over `items` one at a time, in order, sleeping `delay`
/// according to `mode`. The first error stops the run; later items are never
/// started.
pub async fn run_paced<'a, T, R, E, F, Fut>(
    items: &'a [T],
    delay: Duration,
    mode: PaceMode,
    mut stage: F,
) -> StageRun<R, E>
where
    F: FnMut(usize, &'a T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let mut completed = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match stage(index, item).await {
            Ok(result) => completed.push(result),
            Err(err) => {
                return StageRun {
                    completed,
                    failure: Some(err),
                }
            }
        }
        let is_last = index + 1 == items.len();
        if !delay.is_zero() && (mode == PaceMode::AfterEach || !is_last) {
            tokio::time::sleep(delay).await;
        }
    }
    StageRun {
        completed,
        failure: None,
    }
}

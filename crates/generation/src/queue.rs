//! Ordered unit-of-work queue with a bounded number of units in flight.
//!
//! Generation stages submit one unit per product (or per ad group) and the
//! queue runs them with per-unit failure isolation: a failed unit is logged
//! and simply has no result, it never aborts the rest of the batch. The
//! default bound of 1 keeps external generation load and progress reporting
//! strictly sequential.

use std::future::Future;
use std::pin::Pin;
use tokio::task::JoinSet;
use tracing::warn;

/// Future type produced for each unit of work.
pub type UnitFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;

/// Describes one unit of work inside a generation stage.
#[derive(Debug, Clone)]
pub struct WorkUnit {
    pub label: String,
    pub product_index: usize,
    /// Set for stages that fan out below the product level.
    pub ad_group_index: Option<usize>,
}

impl WorkUnit {
    pub fn for_product(label: impl Into<String>, product_index: usize) -> Self {
        Self {
            label: label.into(),
            product_index,
            ad_group_index: None,
        }
    }

    pub fn for_ad_group(
        label: impl Into<String>,
        product_index: usize,
        ad_group_index: usize,
    ) -> Self {
        Self {
            label: label.into(),
            product_index,
            ad_group_index: Some(ad_group_index),
        }
    }
}

/// Single-consumer runner over an ordered unit list.
pub struct WorkQueue {
    max_in_flight: usize,
}

impl WorkQueue {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Strictly sequential queue: one unit in flight at a time.
    pub fn serial() -> Self {
        Self::new(1)
    }

    /// Run every unit to completion and return `(unit, outcome)` pairs in
    /// submission order. A failed unit yields `None` and is reported through
    /// `on_finished`; there is no retry and no cancellation mid-run.
    pub async fn run<T, F>(
        &self,
        units: Vec<WorkUnit>,
        make: F,
        mut on_finished: impl FnMut(&WorkUnit, bool),
    ) -> Vec<(WorkUnit, Option<T>)>
    where
        T: Send + 'static,
        F: Fn(&WorkUnit) -> UnitFuture<T>,
    {
        let total = units.len();
        let mut slots: Vec<Option<(WorkUnit, Option<T>)>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);

        let mut set: JoinSet<(usize, WorkUnit, anyhow::Result<T>)> = JoinSet::new();
        let mut pending = units.into_iter().enumerate();

        loop {
            while set.len() < self.max_in_flight {
                let Some((seq, unit)) = pending.next() else {
                    break;
                };
                let future = make(&unit);
                set.spawn(async move { (seq, unit, future.await) });
            }

            match set.join_next().await {
                Some(Ok((seq, unit, Ok(value)))) => {
                    on_finished(&unit, true);
                    slots[seq] = Some((unit, Some(value)));
                }
                Some(Ok((seq, unit, Err(error)))) => {
                    warn!(unit = %unit.label, error = %error, "unit of work failed, continuing");
                    metrics::counter!("generation.unit_failures").increment(1);
                    on_finished(&unit, false);
                    slots[seq] = Some((unit, None));
                }
                Some(Err(join_error)) => {
                    // A panicked unit is treated as failed; its slot stays empty.
                    warn!(error = %join_error, "unit task aborted");
                    metrics::counter!("generation.unit_failures").increment(1);
                }
                None => break,
            }
        }

        slots.into_iter().flatten().collect()
    }
}

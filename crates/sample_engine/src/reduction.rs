//! Reduction functions and the rebindable per-sensor slot.
//!
//! A reduction is a pure function collapsing one drained window into a
//! single output value. Rebinding swaps an `Arc` atomically, so a tick
//! observes either the fully-old or the fully-new function, never a torn
//! state; the last bind wins.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use contracts::ReduceError;

/// Result of one reduction invocation.
pub type ReduceResult<T> = Result<T, ReduceError>;

type BoxedReduce<T, U> = Box<dyn Fn(&[U]) -> ReduceResult<T> + Send + Sync>;

/// Why a tick produced no value.
#[derive(Debug, thiserror::Error)]
pub enum ReduceFailure {
    /// No function bound yet
    #[error("no reduction bound")]
    Unbound,

    /// The bound function rejected the window
    #[error(transparent)]
    Failed(#[from] ReduceError),
}

/// Holds the reduction bound to one sensor.
pub struct ReductionSlot<T, U> {
    func: ArcSwapOption<BoxedReduce<T, U>>,
}

impl<T, U> ReductionSlot<T, U> {
    /// Create a slot with no function bound.
    pub fn unbound() -> Self {
        Self {
            func: ArcSwapOption::empty(),
        }
    }

    /// Bind or replace the reduction (last write wins).
    pub fn bind<F>(&self, func: F)
    where
        F: Fn(&[U]) -> ReduceResult<T> + Send + Sync + 'static,
    {
        self.func.store(Some(Arc::new(Box::new(func))));
    }

    /// Whether a function is currently bound.
    pub fn is_bound(&self) -> bool {
        self.func.load().is_some()
    }

    /// Invoke the current binding on one drained window.
    pub fn reduce(&self, values: &[U]) -> Result<T, ReduceFailure> {
        // load_full keeps an in-flight invocation alive across a rebind
        let func = self.func.load_full().ok_or(ReduceFailure::Unbound)?;
        func(values).map_err(ReduceFailure::Failed)
    }
}

impl<T, U> Default for ReductionSlot<T, U> {
    fn default() -> Self {
        Self::unbound()
    }
}

/// Ready-made reductions covering the common aggregations.
///
/// Empty-window behavior is part of each function's contract: where an
/// identity value exists it is returned, otherwise the reduction fails
/// with a [`ReduceError`].
pub mod builtins {
    use super::ReduceResult;
    use contracts::ReduceError;

    /// Sum of the window; an empty window sums to the additive identity.
    pub fn sum<U>() -> impl Fn(&[U]) -> ReduceResult<U> + Send + Sync
    where
        U: Copy + std::iter::Sum<U> + Send + Sync + 'static,
    {
        |values: &[U]| Ok(values.iter().copied().sum())
    }

    /// Arithmetic mean; an empty window yields 0.0.
    pub fn mean() -> impl Fn(&[f64]) -> ReduceResult<f64> + Send + Sync {
        |values: &[f64]| {
            if values.is_empty() {
                Ok(0.0)
            } else {
                Ok(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
    }

    /// Arithmetic mean of integer samples; an empty window yields 0.0.
    pub fn mean_int() -> impl Fn(&[i64]) -> ReduceResult<f64> + Send + Sync {
        |values: &[i64]| {
            if values.is_empty() {
                Ok(0.0)
            } else {
                Ok(values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64)
            }
        }
    }

    /// Number of samples in the window.
    pub fn count<U>() -> impl Fn(&[U]) -> ReduceResult<i64> + Send + Sync
    where
        U: Send + Sync + 'static,
    {
        |values: &[U]| Ok(values.len() as i64)
    }

    /// Most recent sample; fails on an empty window.
    pub fn last<U>() -> impl Fn(&[U]) -> ReduceResult<U> + Send + Sync
    where
        U: Clone + Send + Sync + 'static,
    {
        |values: &[U]| {
            values
                .last()
                .cloned()
                .ok_or_else(|| ReduceError::new("empty window"))
        }
    }

    /// Smallest sample; fails on an empty window.
    pub fn min<U>() -> impl Fn(&[U]) -> ReduceResult<U> + Send + Sync
    where
        U: Copy + PartialOrd + Send + Sync + 'static,
    {
        |values: &[U]| {
            values
                .iter()
                .copied()
                .reduce(|a, b| if b < a { b } else { a })
                .ok_or_else(|| ReduceError::new("empty window"))
        }
    }

    /// Largest sample; fails on an empty window.
    pub fn max<U>() -> impl Fn(&[U]) -> ReduceResult<U> + Send + Sync
    where
        U: Copy + PartialOrd + Send + Sync + 'static,
    {
        |values: &[U]| {
            values
                .iter()
                .copied()
                .reduce(|a, b| if b > a { b } else { a })
                .ok_or_else(|| ReduceError::new("empty window"))
        }
    }

    /// True when any sample is true; an empty window is false.
    pub fn any() -> impl Fn(&[bool]) -> ReduceResult<bool> + Send + Sync {
        |values: &[bool]| Ok(values.iter().any(|v| *v))
    }

    /// True when every sample is true; an empty window is true.
    pub fn all() -> impl Fn(&[bool]) -> ReduceResult<bool> + Send + Sync {
        |values: &[bool]| Ok(values.iter().all(|v| *v))
    }

    /// Join text samples with a separator; an empty window joins to "".
    pub fn concat(separator: impl Into<String>) -> impl Fn(&[String]) -> ReduceResult<String> + Send + Sync
    {
        let separator = separator.into();
        move |values: &[String]| Ok(values.join(&separator))
    }
}

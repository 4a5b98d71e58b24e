//! Builder for configuring [`DiskMerger`] runs.

use std::{fmt, sync::Arc};

use crate::{
    Result,
    distance::DistanceMetric,
    error::DiskMergeError,
    merger::DiskMerger,
    model::Relaxation,
    solver::{GoodLpOptimizer, Optimizer},
};

/// Configures and constructs [`DiskMerger`] instances.
///
/// # Examples
/// ```
/// use diskmerge_core::{DiskMergerBuilder, DistanceMetric, Relaxation};
///
/// let merger = DiskMergerBuilder::new()
///     .with_metric(DistanceMetric::Haversine)
///     .with_relaxation(Relaxation::legacy())
///     .build()?;
/// assert_eq!(merger.metric(), DistanceMetric::Haversine);
/// assert_eq!(merger.optimizer_name(), "good_lp/microlp");
/// # Ok::<(), diskmerge_core::DiskMergeError>(())
/// ```
#[derive(Clone)]
pub struct DiskMergerBuilder {
    metric: DistanceMetric,
    relaxation: Relaxation,
    optimizer: Arc<dyn Optimizer + Send + Sync>,
    verify: bool,
}

impl Default for DiskMergerBuilder {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::default(),
            relaxation: Relaxation::default(),
            optimizer: Arc::new(GoodLpOptimizer::new()),
            verify: false,
        }
    }
}

impl fmt::Debug for DiskMergerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiskMergerBuilder")
            .field("metric", &self.metric)
            .field("relaxation", &self.relaxation)
            .field("optimizer", &self.optimizer.name())
            .field("verify", &self.verify)
            .finish()
    }
}

impl DiskMergerBuilder {
    /// Creates a builder with the planar metric, tight relaxation and the
    /// bundled optimizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the configured distance metric.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Sets how disjointness rows are relaxed.
    #[must_use]
    pub fn with_relaxation(mut self, relaxation: Relaxation) -> Self {
        self.relaxation = relaxation;
        self
    }

    /// Returns the configured relaxation.
    #[must_use]
    pub fn relaxation(&self) -> Relaxation {
        self.relaxation
    }

    /// Replaces the optimizer used by [`DiskMerger::run`].
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: impl Optimizer + Send + Sync + 'static) -> Self {
        self.optimizer = Arc::new(optimizer);
        self
    }

    /// Enables checking every outcome with [`crate::verify_outcome`].
    #[must_use]
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Returns whether outcomes are verified.
    #[must_use]
    pub fn verification(&self) -> bool {
        self.verify
    }

    /// Validates the configuration and constructs a [`DiskMerger`].
    ///
    /// # Errors
    /// Returns [`DiskMergeError::InvalidRelaxation`] when a fixed relaxation
    /// constant is not finite and strictly positive.
    pub fn build(self) -> Result<DiskMerger> {
        if let Relaxation::Fixed(value) = self.relaxation
            && !(value.is_finite() && value > 0.0)
        {
            return Err(DiskMergeError::InvalidRelaxation { value });
        }
        Ok(DiskMerger::new(
            self.metric,
            self.relaxation,
            self.optimizer,
            self.verify,
        ))
    }
}

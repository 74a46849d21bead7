//! Core trait definitions for valuation models.
//!
//! The WACC calculator and the DCF engine both implement [`Model`], which
//! gives the pipeline one way to name, describe and evaluate a step.

use crate::Result;

/// A pure valuation step from typed inputs to a typed output.
///
/// Implementations hold no mutable state: evaluating twice with the same
/// input yields the same output, bit for bit.
pub trait Model: Send + Sync + std::fmt::Debug {
    /// Input consumed by one evaluation.
    type Input;

    /// Output produced by one evaluation.
    type Output;

    /// Unique identifier for this model.
    ///
    /// Should be snake_case and stable across versions.
    fn name(&self) -> &str;

    /// Human-readable description of what this model computes.
    fn description(&self) -> &str;

    /// Evaluate the model for one company.
    fn evaluate(&self, input: &Self::Input) -> Result<Self::Output>;
}

/// Marker trait for model configuration types.
///
/// All config types should implement Default, Clone, Send, Sync, and Debug.
pub trait ModelConfig: Default + Clone + Send + Sync + std::fmt::Debug {}

/// A model that supports runtime configuration.
pub trait ConfigurableModel: Model {
    /// Configuration type for this model.
    type Config: ModelConfig;

    /// Create a new model with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}

/// Blanket implementation for any type that satisfies the trait bounds.
impl<T: Default + Clone + Send + Sync + std::fmt::Debug> ModelConfig for T {}

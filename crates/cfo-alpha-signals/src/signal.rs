//! Signal traits.

use cfo_alpha_data::Dataset;
use std::fmt;

/// A column computed over a whole dataset.
///
/// Implementations never mutate their input; they return a new dataset with
/// their output column filled in.
pub trait Signal: fmt::Debug + Send + Sync {
    /// Signal name, also the name of the column it fills.
    fn name(&self) -> &str;

    /// Record fields the signal reads.
    fn required_fields(&self) -> &[&str];

    /// Compute the signal for every record.
    fn compute(&self, data: &Dataset) -> Dataset;
}

/// A signal with a configuration type.
pub trait ConfigurableSignal: Signal + Sized {
    /// Configuration type
    type Config: Default + Clone;

    /// Create the signal from a configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Current configuration.
    fn config(&self) -> &Self::Config;
}

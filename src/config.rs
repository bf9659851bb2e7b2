//! Configuration for fan-out combinators (fork and demux).

use crate::error::{PipeError, Result};
use serde::{Deserialize, Serialize};

/// Buffer size used when none is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 1000;

/// Configuration for a fan-out group.
///
/// For fork, `buffer_size` bounds how far the leading child may read ahead of
/// the slowest child. For demux, it bounds the total number of values held
/// across all children while they wait to be pulled.
///
/// # Example
///
/// ```rust
/// use pipeweave::config::FanOutConfig;
///
/// let config = FanOutConfig::new(3).with_buffer_size(64).with_name("split");
/// assert_eq!(config.num_instances, 3);
/// assert_eq!(config.buffer_size, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
  /// Number of child pipes to create.
  pub num_instances: usize,
  /// Maximum number of values buffered for lagging children.
  pub buffer_size: usize,
  /// Optional name used in log output.
  pub name: Option<String>,
}

impl Default for FanOutConfig {
  fn default() -> Self {
    Self {
      num_instances: 2,
      buffer_size: DEFAULT_BUFFER_SIZE,
      name: None,
    }
  }
}

impl FanOutConfig {
  /// Creates a configuration for `num_instances` children with the default buffer size.
  #[must_use]
  pub fn new(num_instances: usize) -> Self {
    Self {
      num_instances,
      ..Default::default()
    }
  }

  /// Sets the buffer size.
  #[must_use]
  pub fn with_buffer_size(mut self, size: usize) -> Self {
    self.buffer_size = size;
    self
  }

  /// Sets the name reported in log output.
  #[must_use]
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Checks the configuration before a controller is built from it.
  ///
  /// # Errors
  ///
  /// Returns [`PipeError::ZeroInstances`] or [`PipeError::ZeroCapacity`].
  pub fn validate(&self, combinator: &'static str) -> Result<()> {
    if self.num_instances == 0 {
      return Err(PipeError::ZeroInstances { combinator });
    }
    if self.buffer_size == 0 {
      return Err(PipeError::ZeroCapacity { combinator });
    }
    Ok(())
  }

  pub(crate) fn display_name(&self, combinator: &'static str) -> String {
    self
      .name
      .clone()
      .unwrap_or_else(|| combinator.to_string())
  }
}

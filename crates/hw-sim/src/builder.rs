//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use hw_core::HighwayConfig;
use hw_road::Highway;

use crate::{Sim, SimResult, StatsCollector, Transit};

/// Fluent builder for [`Sim<C>`].
///
/// # Required inputs
///
/// - [`HighwayConfig`]: capacities, rates, seed, grace period, …
/// - `C: StatsCollector`: receives traversal, shoulder and arrival events
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                  |
/// |-----------------|------------------------------------------|
/// | `.transit(t)`   | `Transit::from_config(&config)`          |
///
/// # Example
///
/// ```rust,ignore
/// let stats = Arc::new(TrafficStats::new(config.segment_count(), config.shoulder_count()));
/// let sim = SimBuilder::new(config, Arc::clone(&stats)).build()?;
/// let report = sim.run()?;
/// ```
pub struct SimBuilder<C: StatsCollector> {
    config:    HighwayConfig,
    collector: Arc<C>,
    transit:   Option<Transit>,
}

impl<C: StatsCollector> SimBuilder<C> {
    /// Create a builder with all required inputs.
    pub fn new(config: HighwayConfig, collector: Arc<C>) -> Self {
        Self { config, collector, transit: None }
    }

    /// Override the per-segment transit time.
    pub fn transit(mut self, transit: Transit) -> Self {
        self.transit = Some(transit);
        self
    }

    /// Build the highway and return a ready-to-run [`Sim`].  An invalid
    /// configuration is rejected by [`Highway::from_config`].
    pub fn build(self) -> SimResult<Sim<C>> {
        let highway = Highway::from_config(&self.config)?;
        let transit = self.transit.unwrap_or_else(|| Transit::from_config(&self.config));

        Ok(Sim {
            config:    self.config,
            highway:   Arc::new(highway),
            collector: self.collector,
            transit,
        })
    }
}

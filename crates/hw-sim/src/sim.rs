//! The `Sim` struct: one highway, one collector, one dispatcher run.

use std::sync::Arc;

use hw_core::HighwayConfig;
use hw_road::Highway;

use crate::{Dispatcher, DrainReport, SimResult, StatsCollector, Transit};

/// A validated, ready-to-run simulation.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<C: StatsCollector> {
    /// Configuration the highway was built from.
    pub config: HighwayConfig,

    /// Segments and shoulders, shared with every vehicle task.
    pub highway: Arc<Highway>,

    /// Statistics sink, shared with every vehicle task.
    pub collector: Arc<C>,

    pub transit: Transit,
}

impl<C: StatsCollector> Sim<C> {
    /// Generate traffic, drain, and return the run summary.
    ///
    /// The highway and collector keep their state afterwards, so
    /// [`highway`](Self::highway) and [`collector`](Self::collector) can be
    /// read for the final report.
    pub fn run(&self) -> SimResult<DrainReport> {
        self.dispatcher().run()
    }

    /// A fresh dispatcher over this simulation's highway, for driving
    /// vehicles by hand.
    pub fn dispatcher(&self) -> Dispatcher<C> {
        Dispatcher::new(
            self.config.clone(),
            Arc::clone(&self.highway),
            Arc::clone(&self.collector),
            self.transit,
        )
    }

    #[inline]
    pub fn highway(&self) -> &Highway {
        &self.highway
    }

    #[inline]
    pub fn collector(&self) -> &C {
        &self.collector
    }
}

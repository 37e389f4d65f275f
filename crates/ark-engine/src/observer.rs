//! Cycle observer that narrates the run through `tracing`.

use ark_core::registry::LayerRegistry;
use ark_core::runner::{CycleObserver, CycleSummary};
use tracing::{debug, info};

/// Logs a line per cycle and the notable events of every layer step.
#[derive(Debug, Default)]
pub struct LoggingObserver {
    spawned_total: usize,
}

impl LoggingObserver {
    /// Layers spawned over the whole run.
    pub const fn spawned_total(&self) -> usize {
        self.spawned_total
    }
}

impl CycleObserver for LoggingObserver {
    fn on_cycle(&mut self, summary: &CycleSummary, registry: &LayerRegistry) {
        for report in &summary.reports {
            debug!(
                cycle = summary.cycle,
                layer = %report.layer,
                year = report.year,
                co2_ppm = report.co2_ppm,
                temperature = report.temperature,
                collapsing = report.collapsing,
                "Layer stepped"
            );
            if let Some(ref anomaly) = report.anomaly {
                debug!(layer = %report.layer, anomaly = %anomaly, "Anomaly");
            }
            for name in &report.awakened {
                info!(layer = %report.layer, entity = %name, "Consciousness awakened");
            }
        }

        self.spawned_total = self.spawned_total.saturating_add(summary.spawned.len());
        info!(
            cycle = summary.cycle,
            layers = registry.len(),
            capacity = registry.capacity(),
            stepped = summary.reports.len(),
            frozen = summary.frozen.len(),
            spawned = summary.spawned.len(),
            rejected_spawns = summary.rejected_spawns,
            signal = summary.signal.is_some(),
            "Cycle complete"
        );
    }
}

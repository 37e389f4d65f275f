//! The probe orbiting Proxima Centauri b.
//!
//! Its quantum cores bound how many simulation layers can exist at once. The
//! probe also listens for signals from galactic depths; every detection costs
//! a little quantum stability.

use ark_types::{ContentCategory, CoreId};
use ark_world::{ContentError, ContentProvider, Entropy};
use serde::Serialize;
use tracing::info;

/// Where the probe is parked.
pub const PROBE_POSITION: &str = "Proxima Centauri b";

/// Range of the number of quantum cores aboard.
pub const CORE_COUNT: (u32, u32) = (3, 6);

/// Range of petaqubits per core (inclusive).
pub const PETAQUBITS: (u32, u32) = (50, 200);

/// Range of the entanglement level of a core.
pub const ENTANGLEMENT: (f64, f64) = (0.7, 0.99);

/// Range of the stability of a core.
pub const CORE_STABILITY: (f64, f64) = (0.8, 1.0);

/// Range of the factor quantum stability is multiplied by per signal.
pub const SIGNAL_STABILITY_LOSS: (f64, f64) = (0.95, 0.99);

/// A superqubit matrix aboard the probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantumCore {
    /// Core number, from 1.
    pub id: CoreId,
    /// Size of the matrix in petaqubits.
    pub petaqubits: u32,
    /// Entanglement level in `[0.7, 0.99)`.
    pub entanglement: f64,
    /// Stability in `[0.8, 1.0)`.
    pub stability: f64,
}

impl QuantumCore {
    /// Draw a fresh core.
    pub fn draw(id: CoreId, rng: &mut dyn Entropy) -> Self {
        Self {
            id,
            petaqubits: rng.range_inclusive(PETAQUBITS.0, PETAQUBITS.1),
            entanglement: rng.uniform(ENTANGLEMENT.0, ENTANGLEMENT.1),
            stability: rng.uniform(CORE_STABILITY.0, CORE_STABILITY.1),
        }
    }

    /// Layers this core can host: `floor(petaqubits * entanglement / 10)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn simulation_capacity(&self) -> u32 {
        let capacity = (f64::from(self.petaqubits) * self.entanglement / 10.0).floor();
        // Bounded by 200 * 0.99 / 10 for drawn cores.
        capacity.clamp(0.0, f64::from(u32::MAX)) as u32
    }
}

/// The orbiting host of every simulation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Probe {
    cores: Vec<QuantumCore>,
    detected_signals: Vec<String>,
    quantum_stability: f64,
}

impl Probe {
    /// Bring the quantum cores online.
    pub fn assemble(rng: &mut dyn Entropy) -> Self {
        let count = rng.range_inclusive(CORE_COUNT.0, CORE_COUNT.1);
        let cores: Vec<QuantumCore> = (1..=count)
            .map(|id| QuantumCore::draw(CoreId(id), rng))
            .collect();
        let probe = Self::with_cores(cores);
        info!(
            position = PROBE_POSITION,
            cores = probe.cores.len(),
            capacity = probe.simulation_capacity(),
            "Quantum cores ready"
        );
        probe
    }

    /// A probe with the given cores and full stability.
    pub const fn with_cores(cores: Vec<QuantumCore>) -> Self {
        Self {
            cores,
            detected_signals: Vec::new(),
            quantum_stability: 1.0,
        }
    }

    /// Total layers the cores can host.
    pub fn simulation_capacity(&self) -> u32 {
        self.cores
            .iter()
            .map(QuantumCore::simulation_capacity)
            .fold(0, u32::saturating_add)
    }

    /// Pick up a signal from galactic depths.
    ///
    /// The signal is logged and quantum stability drops by a factor in
    /// `[0.95, 0.99)`.
    pub fn detect_signal(
        &mut self,
        content: &dyn ContentProvider,
        rng: &mut dyn Entropy,
    ) -> Result<String, ContentError> {
        let signal = content.pick(ContentCategory::Signal, rng)?;
        self.detected_signals.push(signal.clone());
        self.quantum_stability *= rng.uniform(SIGNAL_STABILITY_LOSS.0, SIGNAL_STABILITY_LOSS.1);
        info!(
            signal = %signal,
            quantum_stability = self.quantum_stability,
            "Signal from galactic depths"
        );
        Ok(signal)
    }

    /// Quantum cores aboard.
    pub fn cores(&self) -> &[QuantumCore] {
        &self.cores
    }

    /// Every detected signal, oldest first.
    pub fn detected_signals(&self) -> &[String] {
        &self.detected_signals
    }

    /// Current quantum stability. Starts at 1.0 and only decreases.
    pub const fn quantum_stability(&self) -> f64 {
        self.quantum_stability
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use ark_world::{FixedEntropy, StoryContent};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn cores_stay_within_their_ranges() {
        for seed in 0_u64..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let probe = Probe::assemble(&mut rng);
            assert!((3..=6).contains(&probe.cores().len()));
            for core in probe.cores() {
                assert!((50..=200).contains(&core.petaqubits));
                assert!((0.7..0.99).contains(&core.entanglement));
                assert!((0.8..1.0).contains(&core.stability));
                assert!((3..=19).contains(&core.simulation_capacity()));
            }
            let sum: u32 = probe.cores().iter().map(QuantumCore::simulation_capacity).sum();
            assert_eq!(probe.simulation_capacity(), sum);
        }
    }

    #[test]
    fn core_capacity_floors() {
        let core = QuantumCore {
            id: CoreId(1),
            petaqubits: 125,
            entanglement: 0.845,
            stability: 0.9,
        };
        // 125 * 0.845 / 10 = 10.5625
        assert_eq!(core.simulation_capacity(), 10);
    }

    #[test]
    fn midpoint_probe_is_predictable() {
        let probe = Probe::assemble(&mut FixedEntropy::midpoint());
        // (3 + 6) / 2 cores, (50 + 200) / 2 petaqubits, 0.845 entanglement.
        assert_eq!(probe.cores().len(), 4);
        assert_eq!(probe.simulation_capacity(), 40);
    }

    #[test]
    fn signals_erode_stability() {
        let content = StoryContent::builtin();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut probe = Probe::with_cores(Vec::new());
        assert_eq!(probe.quantum_stability(), 1.0);

        let mut previous = probe.quantum_stability();
        for _ in 0..10 {
            probe.detect_signal(&content, &mut rng).unwrap();
            let current = probe.quantum_stability();
            assert!(current < previous);
            assert!(current >= previous * 0.95);
            previous = current;
        }
        assert_eq!(probe.detected_signals().len(), 10);
    }
}

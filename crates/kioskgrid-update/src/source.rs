//! Update sources — where simulated delays and outcomes come from.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use kiosk_core::KioskId;
use kiosk_core::config::{DEFAULT_MAX_DELAY_MS, DEFAULT_SUCCESS_RATE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How a single update request will play out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Simulated time the update takes.
    pub delay: Duration,
    /// Whether the update succeeds once the delay elapses.
    pub succeeds: bool,
}

impl UpdatePlan {
    pub fn success(delay: Duration) -> Self {
        Self {
            delay,
            succeeds: true,
        }
    }

    pub fn failure(delay: Duration) -> Self {
        Self {
            delay,
            succeeds: false,
        }
    }
}

/// Draws the plan for each update request.
///
/// Called once per request, at submission time, in submission order.
pub trait UpdateSource: Send + Sync {
    fn plan(&self, id: KioskId) -> UpdatePlan;
}

/// Uniform delay in `[0, max_delay)` and a weighted coin flip.
pub struct RandomSource {
    rng: Mutex<StdRng>,
    max_delay: Duration,
    success_rate: f64,
}

impl RandomSource {
    /// Create a source seeded from OS entropy.
    pub fn new(max_delay: Duration, success_rate: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), max_delay, success_rate)
    }

    /// Create a reproducible source.
    pub fn seeded(seed: u64, max_delay: Duration, success_rate: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), max_delay, success_rate)
    }

    fn with_rng(rng: StdRng, max_delay: Duration, success_rate: f64) -> Self {
        Self {
            rng: Mutex::new(rng),
            max_delay,
            success_rate: if success_rate.is_nan() {
                0.0
            } else {
                success_rate.clamp(0.0, 1.0)
            },
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            DEFAULT_SUCCESS_RATE,
        )
    }
}

impl UpdateSource for RandomSource {
    fn plan(&self, _id: KioskId) -> UpdatePlan {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let max_micros = self.max_delay.as_micros() as u64;
        let delay = if max_micros == 0 {
            Duration::ZERO
        } else {
            Duration::from_micros(rng.gen_range(0..max_micros))
        };
        UpdatePlan {
            delay,
            succeeds: rng.gen_bool(self.success_rate),
        }
    }
}

/// Hands out pre-scripted plans in submission order.
///
/// Once the script runs out every request gets the fallback plan.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<UpdatePlan>>,
    fallback: UpdatePlan,
}

impl ScriptedSource {
    pub fn new(steps: impl IntoIterator<Item = UpdatePlan>, fallback: UpdatePlan) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            fallback,
        }
    }

    /// Every request succeeds after `delay`.
    pub fn always_succeed(delay: Duration) -> Self {
        Self::new([], UpdatePlan::success(delay))
    }

    /// Every request fails after `delay`.
    pub fn always_fail(delay: Duration) -> Self {
        Self::new([], UpdatePlan::failure(delay))
    }

    /// Plans still queued ahead of the fallback.
    pub fn remaining(&self) -> usize {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl UpdateSource for ScriptedSource {
    fn plan(&self, _id: KioskId) -> UpdatePlan {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

//! Random number implementations.

use crate::infrastructure::ports::RandomPort;

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Adapt a port into the `FnMut(min, max)` sampler the domain expects.
pub fn sampler(random: &dyn RandomPort) -> impl FnMut(i32, i32) -> i32 + '_ {
    move |min, max| random.gen_range(min, max)
}

/// Fixed random for testing. Clamped into the requested range.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.0.clamp(min, max)
    }
}

/// Replays a script of values, then falls back to `min`.
#[cfg(test)]
pub struct ScriptedRandom(std::sync::Mutex<std::collections::VecDeque<i32>>);

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self(std::sync::Mutex::new(values.into_iter().collect()))
    }
}

#[cfg(test)]
impl RandomPort for ScriptedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        let next = self.0.lock().unwrap().pop_front();
        next.unwrap_or(min).clamp(min, max)
    }
}

use crate::clock::{Clock, SystemClock};
use crate::config::BucketConfig;
use crate::error::{check_params, BucketError};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, trace};

#[derive(Debug)]
struct State {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket admitting one unit of work per token.
///
/// Tokens accrue continuously at `rate` per second up to `capacity`. The
/// bucket starts full. Refill happens lazily inside [`TokenBucket::allow`],
/// so there is no background task.
#[derive(Debug)]
pub struct TokenBucket<C: Clock = SystemClock> {
    rate: f64,
    capacity: f64,
    clock: C,
    state: Mutex<State>,
}

impl TokenBucket<SystemClock> {
    pub fn new(rate: f64, capacity: f64) -> Result<Self, BucketError> {
        Self::with_clock(rate, capacity, SystemClock)
    }

    pub fn from_config(config: &BucketConfig) -> Result<Self, BucketError> {
        Self::new(config.rate, config.capacity)
    }
}

impl<C: Clock> TokenBucket<C> {
    pub fn with_clock(rate: f64, capacity: f64, clock: C) -> Result<Self, BucketError> {
        check_params(rate, capacity)?;
        let now = clock.now();
        debug!(rate, capacity, "token bucket created");
        Ok(Self {
            rate,
            capacity,
            clock,
            state: Mutex::new(State {
                tokens: capacity,
                last_refill: now,
            }),
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Refills, then consumes one token if at least one is available.
    /// Never waits: `false` means the caller should reject the work now.
    pub fn allow(&self) -> bool {
        let mut state = self.lock();
        self.refill(&mut state);
        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            trace!(tokens = state.tokens, "admitted");
            true
        } else {
            trace!(tokens = state.tokens, "rate limited");
            false
        }
    }

    /// Current token count after refilling. Does not consume.
    pub fn available(&self) -> f64 {
        let mut state = self.lock();
        self.refill(&mut state);
        state.tokens
    }

    // Caller holds the lock; the clock is sampled under it so concurrent
    // refills never interleave.
    fn refill(&self, state: &mut State) {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
        state.last_refill = now;
    }

    // State is two plain numbers, valid after every step, so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

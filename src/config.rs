//! # Showcase configuration.
//!
//! Provides [`Config`], the single place where every delay, capacity and
//! behavioral toggle of the showcase lives.
//!
//! ## Sentinel values
//! - `dispatch_threads = 0` → use the machine's available parallelism
//! - capacities of `0` are clamped to `1` by the accessors

use std::time::Duration;

/// How the bounded-channel action drains its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiveMode {
    /// Receive exactly as many values as the producer sends.
    #[default]
    FixedCount,
    /// Iterate until the producer closes the channel.
    UntilClosed,
}

/// Global configuration for the showcase runtime.
///
/// ## Field semantics
/// - `tick`: base time unit of every showcase delay
/// - `download_delay`: simulated latency of the stub download
/// - `dispatch_jobs`: number of blocking jobs submitted by the dispatch action
/// - `dispatch_threads`: worker threads of the blocking pool (`0` = available parallelism)
/// - `channel_capacity`: buffer of the bounded channel action
/// - `broadcast_capacity`: per-subscription buffer of the broadcast action
/// - `mailbox_capacity`: buffer of actor mailboxes
/// - `receive_mode`: fixed-count vs. iterate-until-closed consumer
/// - `join_child`: whether the launch-join parent awaits its child
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `grace`: how long a supervisor shutdown waits for its tasks
#[derive(Clone, Debug)]
pub struct Config {
    /// Base time unit.
    pub tick: Duration,

    /// Latency of the stub download.
    pub download_delay: Duration,

    /// Jobs submitted to the blocking dispatch pool.
    pub dispatch_jobs: usize,

    /// Worker threads of the blocking dispatch pool.
    ///
    /// - `0` = [`std::thread::available_parallelism`]
    pub dispatch_threads: usize,

    /// Capacity of the bounded channel.
    pub channel_capacity: usize,

    /// Per-subscription capacity of the broadcast channel.
    pub broadcast_capacity: usize,

    /// Capacity of actor mailboxes.
    pub mailbox_capacity: usize,

    /// Consumer strategy of the bounded channel action.
    pub receive_mode: ReceiveMode,

    /// Whether the launch-join parent awaits its child before finishing.
    pub join_child: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Maximum time [`Supervisor::shutdown`](crate::Supervisor::shutdown) waits.
    pub grace: Duration,
}

impl Config {
    /// Number of worker threads for the dispatch pool.
    #[inline]
    pub fn dispatch_threads(&self) -> usize {
        match self.dispatch_threads {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }

    /// Bounded channel capacity, clamped to a minimum of 1.
    #[inline]
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }

    /// Broadcast subscription capacity, clamped to a minimum of 1.
    #[inline]
    pub fn broadcast_capacity(&self) -> usize {
        self.broadcast_capacity.max(1)
    }

    /// Actor mailbox capacity, clamped to a minimum of 1.
    #[inline]
    pub fn mailbox_capacity(&self) -> usize {
        self.mailbox_capacity.max(1)
    }

    /// Bus capacity, clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns `n` ticks.
    #[inline]
    pub fn ticks(&self, n: u32) -> Duration {
        self.tick * n
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `tick = 1s`, `download_delay = 5s`
    /// - `dispatch_jobs = 100`, `dispatch_threads = 0` (available parallelism)
    /// - `channel_capacity = 64`, `broadcast_capacity = 1`, `mailbox_capacity = 1`
    /// - `receive_mode = FixedCount`, `join_child = false`
    /// - `bus_capacity = 1024`, `grace = 5s`
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            download_delay: Duration::from_secs(5),
            dispatch_jobs: 100,
            dispatch_threads: 0,
            channel_capacity: 64,
            broadcast_capacity: 1,
            mailbox_capacity: 1,
            receive_mode: ReceiveMode::default(),
            join_child: false,
            bus_capacity: 1024,
            grace: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacities_are_clamped() {
        let cfg = Config {
            channel_capacity: 0,
            broadcast_capacity: 0,
            mailbox_capacity: 0,
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.channel_capacity(), 1);
        assert_eq!(cfg.broadcast_capacity(), 1);
        assert_eq!(cfg.mailbox_capacity(), 1);
        assert_eq!(cfg.bus_capacity(), 1);
    }

    #[test]
    fn dispatch_threads_fall_back_to_parallelism() {
        let cfg = Config::default();
        assert!(cfg.dispatch_threads() >= 1);

        let fixed = Config {
            dispatch_threads: 3,
            ..Config::default()
        };
        assert_eq!(fixed.dispatch_threads(), 3);
    }

    #[test]
    fn ticks_scale_the_base_unit() {
        let cfg = Config {
            tick: Duration::from_millis(10),
            ..Config::default()
        };
        assert_eq!(cfg.ticks(3), Duration::from_millis(30));
    }
}

//! Search monitors.
//!
//! Monitors observe the search and decide when it stops. Every accepted
//! solution is reported through [`SearchMonitor::at_solution`]; between
//! moves the search polls [`SearchMonitor::check`].

use std::time::{Duration, Instant};

use tracing::debug;

/// Observer of a running search.
pub trait SearchMonitor {
    /// Called for every accepted solution. Returns `false` to stop.
    fn at_solution(&mut self, objective: i64) -> bool;

    /// Polled between moves. Returns `false` to stop.
    fn check(&mut self) -> bool {
        true
    }
}

/// Stops after a fixed number of solutions.
///
/// # Examples
///
/// ```
/// use u_vrptw::engine::{SearchMonitor, SolutionLimit};
///
/// let mut limit = SolutionLimit::new(2);
/// assert!(limit.at_solution(10));
/// assert!(!limit.at_solution(9));
/// ```
#[derive(Debug, Clone)]
pub struct SolutionLimit {
    limit: u64,
    seen: u64,
}

impl SolutionLimit {
    pub fn new(limit: u64) -> Self {
        Self { limit, seen: 0 }
    }
}

impl SearchMonitor for SolutionLimit {
    fn at_solution(&mut self, _objective: i64) -> bool {
        self.seen += 1;
        self.seen < self.limit
    }
}

/// Stops a search that keeps failing to improve its best solution.
///
/// Progress is judged once per timeout window. A window that saw a new
/// best solution restarts unchanged. A window without one ends the search
/// when more than `tolerance` non-improving solutions have been seen since
/// the last best; otherwise the window is multiplied and the search goes on.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_vrptw::engine::{NoImprovementLimit, SearchMonitor};
///
/// let mut limit = NoImprovementLimit::new(5, Duration::from_secs(30), 2);
/// assert!(limit.at_solution(100));
/// assert!(limit.at_solution(120));
/// assert_eq!(limit.stale(), 1);
/// assert!(limit.check());
/// ```
#[derive(Debug, Clone)]
pub struct NoImprovementLimit {
    tolerance: u64,
    window: Duration,
    multiplier: u32,
    best: Option<i64>,
    stale: u64,
    improved_in_window: bool,
    window_start: Instant,
}

impl NoImprovementLimit {
    pub fn new(tolerance: u64, initial_window: Duration, multiplier: u32) -> Self {
        Self {
            tolerance,
            window: initial_window,
            multiplier,
            best: None,
            stale: 0,
            improved_in_window: false,
            window_start: Instant::now(),
        }
    }

    /// Current timeout window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Non-improving solutions seen since the last best one.
    pub fn stale(&self) -> u64 {
        self.stale
    }
}

impl SearchMonitor for NoImprovementLimit {
    fn at_solution(&mut self, objective: i64) -> bool {
        match self.best {
            Some(best) if objective >= best => self.stale = self.stale.saturating_add(1),
            _ => {
                self.best = Some(objective);
                self.stale = 0;
                self.improved_in_window = true;
            }
        }
        true
    }

    fn check(&mut self) -> bool {
        if self.window_start.elapsed() < self.window {
            return true;
        }
        self.window_start = Instant::now();
        if std::mem::take(&mut self.improved_in_window) {
            return true;
        }
        if self.stale > self.tolerance {
            debug!(
                stale = self.stale,
                window_ms = self.window.as_millis() as u64,
                "no improvement within window, stopping"
            );
            return false;
        }
        self.window = self.window.saturating_mul(self.multiplier);
        debug!(
            window_ms = self.window.as_millis() as u64,
            "no improvement within window, extending"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_limit_one() {
        let mut limit = SolutionLimit::new(1);
        assert!(!limit.at_solution(0));
    }

    #[test]
    fn test_stale_count_alone_does_not_stop() {
        let mut limit = NoImprovementLimit::new(1, Duration::from_secs(60), 2);
        assert!(limit.at_solution(100));
        assert!(limit.at_solution(100));
        assert!(limit.at_solution(120));
        assert_eq!(limit.stale(), 2);
        // the window is still open
        assert!(limit.check());
    }

    #[test]
    fn test_improvement_resets() {
        let mut limit = NoImprovementLimit::new(1, Duration::from_secs(60), 2);
        assert!(limit.at_solution(100));
        assert!(limit.at_solution(100));
        assert!(limit.at_solution(90));
        assert_eq!(limit.stale(), 0);
    }

    #[test]
    fn test_improving_window_restarts_unchanged() {
        let mut limit = NoImprovementLimit::new(0, Duration::from_millis(2), 3);
        assert!(limit.at_solution(100));
        assert!(limit.at_solution(101));
        std::thread::sleep(Duration::from_millis(5));
        assert!(limit.check());
        assert_eq!(limit.window(), Duration::from_millis(2));
    }

    #[test]
    fn test_window_backoff_then_stop() {
        let mut limit = NoImprovementLimit::new(2, Duration::from_millis(2), 50);
        assert!(limit.at_solution(100));
        std::thread::sleep(Duration::from_millis(5));
        // first window found the best solution
        assert!(limit.check());

        assert!(limit.at_solution(100));
        std::thread::sleep(Duration::from_millis(5));
        // one stale solution is within tolerance: the window grows
        assert!(limit.check());
        assert_eq!(limit.window(), Duration::from_millis(100));

        assert!(limit.at_solution(105));
        assert!(limit.at_solution(110));
        std::thread::sleep(Duration::from_millis(2));
        // the grown window has not elapsed yet
        assert!(limit.check());
        std::thread::sleep(Duration::from_millis(120));
        assert!(!limit.check());
    }
}

use std::time::Duration;

/// Paces the per-chunk embedding loop: after every `every` permits a
/// fixed pause is awaited, keeping the provider call rate bounded
/// without scattering ad-hoc sleeps through the pipeline.
#[derive(Debug)]
pub struct RateLimiter {
    every: usize,
    pause: Duration,
    since_pause: usize,
}

impl RateLimiter {
    pub fn new(every: usize, pause: Duration) -> Self {
        Self {
            every,
            pause,
            since_pause: 0,
        }
    }

    /// Take one permit, pausing when the window is exhausted. Returns
    /// true when a pause was taken, which callers use as a checkpoint.
    pub async fn permit(&mut self) -> bool {
        if self.every == 0 {
            return false;
        }
        self.since_pause += 1;
        if self.since_pause >= self.every {
            self.since_pause = 0;
            tokio::time::sleep(self.pause).await;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn pauses_only_at_window_boundaries() {
        let mut limiter = RateLimiter::new(3, Duration::from_millis(100));

        assert!(!limiter.permit().await);
        assert!(!limiter.permit().await);
        assert!(limiter.permit().await);
        assert!(!limiter.permit().await);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_window_never_pauses() {
        let mut limiter = RateLimiter::new(0, Duration::from_millis(100));
        for _ in 0..10 {
            assert!(!limiter.permit().await);
        }
    }
}

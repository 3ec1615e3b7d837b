//! Suspension points of the acquisition loop

use async_trait::async_trait;
use std::time::Duration;

/// A wait the loop asks for, tagged with where it happens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Fixed delay before moving on to the next zone of the same round
    BetweenAttempts(Duration),
    /// Adaptive backoff wait after a round without success
    BetweenRounds(Duration),
}

impl Pause {
    pub fn duration(&self) -> Duration {
        match self {
            Pause::BetweenAttempts(d) | Pause::BetweenRounds(d) => *d,
        }
    }
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn pause(&self, pause: Pause);
}

/// Real timers
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn pause(&self, pause: Pause) {
        tracing::debug!(?pause, "Sleeping");
        tokio::time::sleep(pause.duration()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_duration() {
        assert_eq!(
            Pause::BetweenAttempts(Duration::from_secs(5)).duration(),
            Duration::from_secs(5)
        );
        assert_eq!(
            Pause::BetweenRounds(Duration::from_secs(120)).duration(),
            Duration::from_secs(120)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_waits_full_duration() {
        let start = tokio::time::Instant::now();
        TokioSleeper
            .pause(Pause::BetweenRounds(Duration::from_secs(600)))
            .await;
        assert!(start.elapsed() >= Duration::from_secs(600));
    }
}

//! Alert Notifier Implementation

use crate::Speaker;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Speak alerts aloud (otherwise they are only logged)
    pub enabled: bool,
    /// Pending messages held before new ones are dropped
    pub queue_capacity: usize,
    /// Text-to-speech program
    pub voice_program: String,
    /// Speech rate in words per minute
    pub voice_rate: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_capacity: 8,
            voice_program: "espeak".to_string(),
            voice_rate: 165,
        }
    }
}

/// Handle for enqueueing voice alerts.
///
/// Cloning is cheap; the notifier task stops once every handle is dropped.
#[derive(Clone)]
pub struct AlertNotifier {
    tx: Option<mpsc::Sender<String>>,
    dropped: Arc<AtomicUsize>,
}

impl AlertNotifier {
    /// Start the notifier task on the current tokio runtime
    pub fn spawn(config: &AlertConfig, speaker: Arc<dyn Speaker>) -> (Self, JoinHandle<()>) {
        info!("Starting alert notifier with config: {:?}", config);
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let handle = tokio::spawn(run_notifier(rx, speaker));
        (
            Self {
                tx: Some(tx),
                dropped: Arc::new(AtomicUsize::new(0)),
            },
            handle,
        )
    }

    /// A notifier that discards every message
    pub fn disabled() -> Self {
        Self {
            tx: None,
            dropped: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Enqueue a message. Never blocks and never fails.
    pub fn notify(&self, message: impl Into<String>) {
        let message = message.into();
        let Some(tx) = &self.tx else {
            debug!("Alert discarded (notifier disabled): {}", message);
            return;
        };

        match tx.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!("Alert queue full, dropping: {}", message);
            }
            Err(TrySendError::Closed(message)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!("Alert notifier stopped, dropping: {}", message);
            }
        }
    }

    /// Messages dropped because the queue was full or closed
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn run_notifier(mut rx: mpsc::Receiver<String>, speaker: Arc<dyn Speaker>) {
    while let Some(message) = rx.recv().await {
        let speaker = Arc::clone(&speaker);
        let text = message.clone();
        match tokio::task::spawn_blocking(move || speaker.speak(&text)).await {
            Ok(Ok(())) => debug!("Spoke alert: {}", message),
            Ok(Err(e)) => warn!("Voice alert failed: {}", e),
            Err(e) => error!("Voice alert task aborted: {}", e),
        }
    }
    debug!("Alert notifier stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlertError;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingSpeaker {
        spoken: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&self, text: &str) -> Result<(), AlertError> {
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenSpeaker;

    impl Speaker for BrokenSpeaker {
        fn speak(&self, _text: &str) -> Result<(), AlertError> {
            Err(AlertError::Unavailable("no audio device".into()))
        }
    }

    #[tokio::test]
    async fn test_messages_are_spoken_in_order() {
        let speaker = Arc::new(RecordingSpeaker::default());
        let (notifier, handle) = AlertNotifier::spawn(&AlertConfig::default(), speaker.clone());

        notifier.notify("You look drowsy");
        notifier.notify("Bad posture detected");
        drop(notifier);
        handle.await.unwrap();

        assert_eq!(
            *speaker.spoken.lock().unwrap(),
            vec!["You look drowsy".to_string(), "Bad posture detected".to_string()]
        );
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        let speaker = Arc::new(RecordingSpeaker {
            delay: Some(Duration::from_millis(100)),
            ..Default::default()
        });
        let config = AlertConfig {
            queue_capacity: 1,
            ..Default::default()
        };
        let (notifier, handle) = AlertNotifier::spawn(&config, speaker.clone());

        let started = Instant::now();
        for i in 0..5 {
            notifier.notify(format!("alert {}", i));
        }
        assert!(started.elapsed() < Duration::from_millis(50));
        assert_eq!(notifier.dropped(), 4);

        drop(notifier);
        handle.await.unwrap();
        assert_eq!(speaker.spoken.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_speaker_failure_is_swallowed() {
        let (notifier, handle) = AlertNotifier::spawn(&AlertConfig::default(), Arc::new(BrokenSpeaker));

        notifier.notify("You look drowsy");
        notifier.notify("You look drowsy");
        drop(notifier);

        // The worker survives both failures and exits cleanly
        handle.await.unwrap();
    }

    #[test]
    fn test_disabled_notifier_is_silent() {
        let notifier = AlertNotifier::disabled();
        notifier.notify("ignored");
        assert_eq!(notifier.dropped(), 0);
    }
}

//! Single-active-mode monitoring controller

use crate::config::{Mode, SessionConfig};
use crate::output::{FrameDetail, FrameOutput};
use crate::SessionError;
use alerting::AlertNotifier;
use camera_capture::{FrameSource, Severity, VideoFrame};
use desk_monitor::DeskMonitor;
use landmarks::LandmarkProvider;
use metrics::counter;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use storage::{SessionPersister, SessionSummary, WeekdaySessionSummary, YogaSessionSummary};
use tracing::{debug, info, warn};
use yoga::YogaModule;

/// Status reported for frames the landmark provider could not process
pub const NO_DETECTION_STATUS: &str = "NO DETECTION";

enum Processor {
    Desk(DeskMonitor),
    Yoga(YogaModule),
}

/// The one mode currently holding the landmark provider
struct ActiveMode {
    mode: Mode,
    processor: Processor,
    provider: Box<dyn LandmarkProvider>,
    started_at: Instant,
    /// Timestamp of the first frame, mapped onto `started_at`
    first_timestamp_ns: Option<u64>,
    last_status: Option<String>,
}

impl ActiveMode {
    fn frame_instant(&mut self, timestamp_ns: u64) -> Instant {
        let first = *self.first_timestamp_ns.get_or_insert(timestamp_ns);
        self.started_at + Duration::from_nanos(timestamp_ns.saturating_sub(first))
    }

    fn reset_session(&mut self) {
        match &mut self.processor {
            Processor::Desk(monitor) => monitor.reset_session(),
            Processor::Yoga(module) => module.reset_session(),
        }
    }

    fn release(mut self) {
        self.provider.release();
        info!("{} mode released", self.mode);
    }
}

/// Monitoring controller.
///
/// Holds at most one active mode. Activating a mode releases the previous
/// mode's landmark provider before the new one takes over.
pub struct MonitorController {
    config: SessionConfig,
    active: Mutex<Option<ActiveMode>>,
    notifier: AlertNotifier,
    persister: Arc<dyn SessionPersister>,
}

impl MonitorController {
    pub fn new(
        config: SessionConfig,
        notifier: AlertNotifier,
        persister: Arc<dyn SessionPersister>,
    ) -> Result<Self, SessionError> {
        config.desk.validate()?;
        config.yoga.validate()?;
        Ok(Self {
            config,
            active: Mutex::new(None),
            notifier,
            persister,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<ActiveMode>>, SessionError> {
        self.active.lock().map_err(|_| SessionError::Poisoned)
    }

    /// Switch to `mode`, handing it `provider`. Any previously active mode
    /// is torn down first. Posture calibration starts at `now`.
    pub fn activate(
        &self,
        mode: Mode,
        mut provider: Box<dyn LandmarkProvider>,
        now: Instant,
    ) -> Result<(), SessionError> {
        let processor = match mode {
            Mode::Weekday => DeskMonitor::new(self.config.desk.clone(), now)
                .map(Processor::Desk)
                .map_err(SessionError::from),
            Mode::Weekend => YogaModule::new(self.config.yoga.clone())
                .map(Processor::Yoga)
                .map_err(SessionError::from),
        };
        let processor = match processor {
            Ok(processor) => processor,
            Err(e) => {
                provider.release();
                return Err(e);
            }
        };

        let mut guard = self.lock()?;
        if let Some(previous) = guard.take() {
            previous.release();
        }
        *guard = Some(ActiveMode {
            mode,
            processor,
            provider,
            started_at: now,
            first_timestamp_ns: None,
            last_status: None,
        });
        info!("{} mode activated", mode);
        Ok(())
    }

    /// Tear down the active mode, if any
    pub fn deactivate(&self) -> Result<(), SessionError> {
        if let Some(previous) = self.lock()?.take() {
            previous.release();
        }
        Ok(())
    }

    pub fn active_mode(&self) -> Option<Mode> {
        self.active
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|a| a.mode))
    }

    /// Pull one frame from `source` and process it.
    ///
    /// `Ok(None)` when no frame was ready or the source hiccuped; terminal
    /// source errors are returned.
    pub fn pump(&self, source: &mut dyn FrameSource) -> Result<Option<FrameOutput>, SessionError> {
        if self.active_mode().is_none() {
            return Err(SessionError::NoActiveMode);
        }
        match source.next_frame() {
            Ok(Some(frame)) => self.process_frame(frame).map(Some),
            Ok(None) => Ok(None),
            Err(e) if !e.is_terminal() => {
                warn!("Frame source hiccup: {}", e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Run one frame through the active mode
    pub fn process_frame(&self, mut frame: VideoFrame) -> Result<FrameOutput, SessionError> {
        let mut guard = self.lock()?;
        let active = guard.as_mut().ok_or(SessionError::NoActiveMode)?;
        let mode = active.mode;

        if self.config.camera.mirror {
            frame.mirror();
        }
        let now = active.frame_instant(frame.timestamp_ns);
        counter!("wellness_frames_processed_total", "mode" => mode.as_str()).increment(1);

        let detection = match active.provider.detect(&frame) {
            Ok(detection) => detection.to_pixels(frame.width, frame.height),
            Err(e) => {
                warn!("Landmark detection failed on frame {}: {}", frame.sequence, e);
                counter!("wellness_detection_failures_total", "mode" => mode.as_str()).increment(1);
                drop(guard);
                return Ok(FrameOutput {
                    mode,
                    sequence: frame.sequence,
                    status: NO_DETECTION_STATUS.to_string(),
                    severity: Severity::Info,
                    annotations: vec![mode.banner(frame.height)],
                    alerts: Vec::new(),
                    image: self.encode(&frame),
                    detail: FrameDetail::PassThrough,
                });
            }
        };

        let (status, severity, annotations, alerts, detail) = match &mut active.processor {
            Processor::Desk(monitor) => {
                let analysis = monitor.process(&detection, now);
                (
                    analysis.status_label().to_string(),
                    analysis.severity(),
                    analysis.annotations(frame.height),
                    analysis.alerts.iter().map(|a| a.message().to_string()).collect::<Vec<_>>(),
                    FrameDetail::Weekday(analysis),
                )
            }
            Processor::Yoga(module) => {
                let analysis = module.process(&detection, now);
                (
                    analysis.status_label(),
                    analysis.severity(),
                    analysis.annotations(frame.height),
                    Vec::<String>::new(),
                    FrameDetail::Weekend(analysis),
                )
            }
        };

        if active.last_status.as_deref() != Some(status.as_str()) {
            info!(mode = mode.as_str(), "Status: {}", status);
            active.last_status = Some(status.clone());
        }
        drop(guard);

        for message in &alerts {
            counter!("wellness_alerts_total", "mode" => mode.as_str()).increment(1);
            self.notifier.notify(message.clone());
        }

        Ok(FrameOutput {
            mode,
            sequence: frame.sequence,
            status,
            severity,
            annotations,
            alerts,
            image: self.encode(&frame),
            detail,
        })
    }

    fn encode(&self, frame: &VideoFrame) -> Option<Vec<u8>> {
        if !self.config.encode_frames {
            return None;
        }
        let camera = &self.config.camera;
        frame
            .encode(camera.image_format, camera.jpeg_quality)
            .map_err(|e| warn!("Frame {} not encoded: {}", frame.sequence, e))
            .ok()
    }

    /// Zero the active mode's session counters. A no-op without an active mode.
    pub fn reset_session(&self) -> Result<(), SessionError> {
        if let Some(active) = self.lock()?.as_mut() {
            active.reset_session();
            info!("{} session counters reset", active.mode);
        }
        Ok(())
    }

    /// Summarize the active session, persist it and reset the counters
    pub fn end_session(&self, duration_secs: u64) -> Result<SessionSummary, SessionError> {
        let mut guard = self.lock()?;
        let active = guard.as_mut().ok_or(SessionError::NoActiveMode)?;

        let summary: SessionSummary = match &active.processor {
            Processor::Desk(monitor) => {
                let totals = monitor.session_totals();
                WeekdaySessionSummary::new(duration_secs, totals.blink_count, totals.bad_posture_secs)
                    .into()
            }
            Processor::Yoga(module) => YogaSessionSummary::new(duration_secs)
                .with_holds(
                    module
                        .holds_completed()
                        .iter()
                        .map(|(label, count)| (label.name().to_string(), *count)),
                )
                .into(),
        };

        let id = self.persister.save(summary.clone())?;
        active.reset_session();
        debug!("Session {} closed after {}s", id, duration_secs);
        Ok(summary)
    }
}

impl Drop for MonitorController {
    fn drop(&mut self) {
        if let Ok(active) = self.active.get_mut() {
            if let Some(active) = active.take() {
                active.release();
            }
        }
    }
}

use super::settings::ScanSettings;
use super::state::SessionState;
use crate::capture::{Camera, FrameSampler};
use crate::common::Sample;
use crate::error::{AppError, Result};
use crate::scoring::{LampQualityScorer, Report};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

struct Inner {
    state: SessionState,
    /// Cancelled when the current streaming session ends.
    stream_token: Option<CancellationToken>,
    /// Bumped on every successful `start_camera`.
    stream_generation: u64,
    active_scan: Option<Uuid>,
}

/// Owns one camera and the scan lifecycle around it.
///
/// The controller decides whether a scan may run; what a batch of samples
/// means is left to the stateless [`LampQualityScorer`]. All operations take
/// `&self`, so a session can be shared between tasks behind an `Arc`.
pub struct CaptureSession {
    id: Uuid,
    camera: tokio::sync::Mutex<Box<dyn Camera>>,
    sampler: Box<dyn FrameSampler>,
    scorer: LampQualityScorer,
    settings: ScanSettings,
    inner: Mutex<Inner>,
}

/// Releases the scanning flag however the scan future ends, including when
/// the caller drops it mid-batch.
struct ScanGuard<'a> {
    session: &'a CaptureSession,
    scan_id: Uuid,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.session.inner();
        if inner.active_scan == Some(self.scan_id) {
            inner.active_scan = None;
            inner.state.scanning = false;
        }
    }
}

impl CaptureSession {
    pub fn new(
        camera: Box<dyn Camera>,
        sampler: Box<dyn FrameSampler>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            camera: tokio::sync::Mutex::new(camera),
            sampler,
            scorer: LampQualityScorer::new(),
            settings,
            inner: Mutex::new(Inner {
                state: SessionState::default(),
                stream_token: None,
                stream_generation: 0,
                active_scan: None,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> ScanSettings {
        self.settings
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner().state.clone()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, error: AppError) -> AppError {
        warn!("Session {}: {}", self.id, error);
        self.inner().state.error = Some(error.user_message());
        error
    }

    /// Checks and, if needed, requests camera permission, then starts
    /// streaming. Calling it while already streaming is a no-op.
    pub async fn start_camera(&self) -> Result<()> {
        self.inner().state.error = None;

        let mut camera = self.camera.lock().await;
        if self.inner().state.streaming {
            return Ok(());
        }
        if !camera.is_available() {
            return Err(self.record(AppError::NoCameraDevice));
        }

        let mut permission = camera.permission_status().await;
        if !permission.is_granted() {
            debug!("Requesting camera permission (status {:?})", permission);
            permission = camera.request_permission().await;
        }
        self.inner().state.permission = Some(permission);
        if !permission.is_granted() {
            return Err(self.record(AppError::PermissionDenied));
        }

        if let Err(e) = camera.activate().await {
            return Err(self.record(e));
        }

        let mut inner = self.inner();
        inner.state.streaming = true;
        inner.stream_token = Some(CancellationToken::new());
        inner.stream_generation += 1;
        info!("Session {} started streaming", self.id);
        Ok(())
    }

    /// Ends streaming. An in-flight scan is abandoned without being scored.
    pub async fn stop_camera(&self) {
        {
            let mut inner = self.inner();
            if let Some(token) = inner.stream_token.take() {
                token.cancel();
            }
            inner.state.streaming = false;
            inner.state.scanning = false;
            inner.active_scan = None;
        }
        self.camera.lock().await.deactivate().await;
        info!("Session {} stopped streaming", self.id);
    }

    /// Clears the last report and error. Streaming is left as it is.
    pub fn reset(&self) {
        let mut inner = self.inner();
        inner.state.results = None;
        inner.state.error = None;
    }

    fn begin_scan(&self) -> Result<(Uuid, u64, CancellationToken)> {
        let mut inner = self.inner();
        let stream_token = if inner.state.streaming {
            inner.stream_token.clone()
        } else {
            None
        };
        let Some(token) = stream_token else {
            drop(inner);
            return Err(self.record(AppError::SessionNotActive));
        };
        if inner.active_scan.is_some() {
            warn!("Session {}: rejected overlapping scan", self.id);
            return Err(AppError::ConcurrentScan);
        }

        let scan_id = Uuid::new_v4();
        inner.active_scan = Some(scan_id);
        inner.state.scanning = true;
        inner.state.results = None;
        inner.state.error = None;
        Ok((scan_id, inner.stream_generation, token))
    }

    /// Captures one batch of samples, scores it and stores the report.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn scan(&self) -> Result<Report> {
        let (scan_id, generation, token) = self.begin_scan()?;
        let _guard = ScanGuard {
            session: self,
            scan_id,
        };
        info!(
            "Scan {} started: {} frames every {:?}",
            scan_id, self.settings.frame_count, self.settings.frame_interval
        );

        let outcome = match self.collect_samples(&token).await {
            Ok(samples) => self.scorer.score(&samples),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(report) => {
                let mut inner = self.inner();
                if inner.active_scan == Some(scan_id) {
                    inner.state.results = Some(report.clone());
                }
                info!("Scan {} finished with score {}", scan_id, report.score);
                Ok(report)
            }
            Err(e) => Err(self.record_for_scan(scan_id, generation, e)),
        }
    }

    /// Like `record`, but a scan outlived by a restart or a newer scan keeps
    /// its error to itself.
    fn record_for_scan(&self, scan_id: Uuid, generation: u64, error: AppError) -> AppError {
        let mut inner = self.inner();
        let superseded = inner.stream_generation != generation
            || inner.active_scan.is_some_and(|active| active != scan_id);
        if superseded {
            debug!("Session {}: stale scan {} ended with {}", self.id, scan_id, error);
            return error;
        }
        warn!("Session {}: {}", self.id, error);
        inner.state.error = Some(error.user_message());
        error
    }

    async fn collect_samples(&self, token: &CancellationToken) -> Result<Vec<Sample>> {
        let frame_count = self.settings.frame_count;
        let mut samples = Vec::with_capacity(frame_count);

        for index in 0..frame_count {
            if token.is_cancelled() {
                return Err(AppError::ScanCancelled);
            }

            let frame = {
                let mut camera = self.camera.lock().await;
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(AppError::ScanCancelled),
                    frame = camera.capture_frame() => frame?,
                }
            };
            let sample = self.sampler.sample(&frame)?;
            debug!(
                "Frame {}/{} ({}): luminance={:.2} rgb=({:.1}, {:.1}, {:.1})",
                index + 1,
                frame_count,
                self.sampler.name(),
                sample.luminance,
                sample.color.r,
                sample.color.g,
                sample.color.b
            );
            samples.push(sample);

            if index + 1 < frame_count {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(AppError::ScanCancelled),
                    _ = tokio::time::sleep(self.settings.frame_interval) => {}
                }
            }
        }

        // A stop that lands with the last capture must still win.
        if token.is_cancelled() {
            return Err(AppError::ScanCancelled);
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{MeanPixelSampler, PermissionStatus, SyntheticCamera};
    use crate::scoring::Severity;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn quick_settings(frame_count: usize) -> ScanSettings {
        ScanSettings::default()
            .frame_count(frame_count)
            .frame_interval(Duration::ZERO)
    }

    fn session_with(camera: SyntheticCamera, settings: ScanSettings) -> CaptureSession {
        CaptureSession::new(
            Box::new(camera),
            Box::new(MeanPixelSampler::new()),
            settings,
        )
    }

    #[tokio::test]
    async fn test_scan_without_camera_is_rejected() {
        let session = session_with(SyntheticCamera::new(4, 4), quick_settings(3));
        let result = session.scan().await;
        assert!(matches!(result, Err(AppError::SessionNotActive)));
        let state = session.snapshot();
        assert_eq!(
            state.error.as_deref(),
            Some("Camera not running — start camera first.")
        );
        assert!(!state.scanning);
    }

    #[tokio::test]
    async fn test_permission_denied_keeps_camera_off() {
        let session = session_with(
            SyntheticCamera::new(4, 4).denying_requests(),
            quick_settings(3),
        );
        let result = session.start_camera().await;
        assert!(matches!(result, Err(AppError::PermissionDenied)));
        let state = session.snapshot();
        assert!(!state.streaming);
        assert_eq!(state.permission, Some(PermissionStatus::Denied));
        assert_eq!(state.error.as_deref(), Some("Camera permission denied"));
    }

    #[tokio::test]
    async fn test_missing_device() {
        let session = session_with(SyntheticCamera::new(4, 4).unavailable(), quick_settings(3));
        assert!(matches!(
            session.start_camera().await,
            Err(AppError::NoCameraDevice)
        ));
        assert!(!session.snapshot().streaming);
    }

    #[tokio::test]
    async fn test_full_scan_stores_report() {
        let session = session_with(
            SyntheticCamera::new(8, 8).with_colors(vec![[150, 120, 100]]),
            quick_settings(30),
        );
        session.start_camera().await.unwrap();
        assert_eq!(session.snapshot().permission, Some(PermissionStatus::Granted));

        let report = session.scan().await.unwrap();
        assert_eq!(report.avg_luminance, 125);
        assert_eq!(report.flicker_index, 0.0);
        assert_eq!(report.color_ratio, 1.5);
        assert_eq!(report.recommendations[1].severity, Severity::Warm);
        assert_eq!(report.score, 70);

        let state = session.snapshot();
        assert_eq!(state.results, Some(report));
        assert!(!state.scanning);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_overlapping_scan_is_rejected() {
        let session = session_with(
            SyntheticCamera::new(4, 4),
            ScanSettings::default()
                .frame_count(3)
                .frame_interval(Duration::from_millis(20)),
        );
        session.start_camera().await.unwrap();

        let first = session.scan();
        futures::pin_mut!(first);
        assert!(futures::poll!(first.as_mut()).is_pending());
        assert!(session.snapshot().scanning);

        assert!(matches!(
            session.scan().await,
            Err(AppError::ConcurrentScan)
        ));

        let report = first.await.unwrap();
        assert_eq!(session.snapshot().results, Some(report));
    }

    #[tokio::test]
    async fn test_stop_mid_scan_abandons_batch() {
        let camera = SyntheticCamera::new(4, 4);
        let captured = camera.capture_counter();
        let session = session_with(
            camera,
            ScanSettings::default()
                .frame_count(10)
                .frame_interval(Duration::from_millis(50)),
        );
        session.start_camera().await.unwrap();

        let scan = session.scan();
        futures::pin_mut!(scan);
        assert!(futures::poll!(scan.as_mut()).is_pending());

        session.stop_camera().await;
        assert!(matches!(scan.await, Err(AppError::ScanCancelled)));

        let state = session.snapshot();
        assert!(state.results.is_none());
        assert!(!state.streaming);
        assert!(!state.scanning);
        assert_eq!(
            state.error.as_deref(),
            Some("Scan cancelled — the camera was stopped.")
        );
        assert_eq!(captured.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_during_last_capture_is_never_scored() {
        for _ in 0..10 {
            let session = session_with(
                SyntheticCamera::new(4, 4).with_capture_delay(Duration::from_millis(5)),
                quick_settings(1),
            );
            session.start_camera().await.unwrap();

            let scan = session.scan();
            futures::pin_mut!(scan);
            assert!(futures::poll!(scan.as_mut()).is_pending());

            // Cancels the stream, then waits for the camera held by the capture.
            let stop = session.stop_camera();
            futures::pin_mut!(stop);
            assert!(futures::poll!(stop.as_mut()).is_pending());

            // The capture is done too by now; both outcomes are ready.
            tokio::time::sleep(Duration::from_millis(15)).await;
            assert!(matches!(scan.await, Err(AppError::ScanCancelled)));
            stop.await;

            let state = session.snapshot();
            assert!(state.results.is_none());
            assert!(!state.streaming);
        }
    }

    #[tokio::test]
    async fn test_cancelled_scan_leaves_restarted_session_alone() {
        let session = session_with(
            SyntheticCamera::new(4, 4),
            ScanSettings::default()
                .frame_count(3)
                .frame_interval(Duration::from_millis(20)),
        );
        session.start_camera().await.unwrap();

        let old = session.scan();
        futures::pin_mut!(old);
        assert!(futures::poll!(old.as_mut()).is_pending());

        session.stop_camera().await;
        session.start_camera().await.unwrap();

        let new = session.scan();
        futures::pin_mut!(new);
        assert!(futures::poll!(new.as_mut()).is_pending());

        assert!(matches!(old.await, Err(AppError::ScanCancelled)));
        let state = session.snapshot();
        assert!(state.scanning);
        assert!(state.error.is_none());

        let report = new.await.unwrap();
        let state = session.snapshot();
        assert_eq!(state.results, Some(report));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_dropped_scan_releases_session() {
        let session = session_with(
            SyntheticCamera::new(4, 4),
            ScanSettings::default()
                .frame_count(3)
                .frame_interval(Duration::from_millis(20)),
        );
        session.start_camera().await.unwrap();

        {
            let scan = session.scan();
            futures::pin_mut!(scan);
            assert!(futures::poll!(scan.as_mut()).is_pending());
        }
        assert!(!session.snapshot().scanning);
        assert!(session.scan().await.is_ok());
    }

    #[tokio::test]
    async fn test_capture_failure_returns_to_ready() {
        let session = session_with(
            SyntheticCamera::new(4, 4).failing_after(2),
            quick_settings(5),
        );
        session.start_camera().await.unwrap();

        let result = session.scan().await;
        assert!(matches!(result, Err(AppError::Capture(_))));
        let state = session.snapshot();
        assert!(!state.scanning);
        assert!(state.streaming);
        assert_eq!(
            state.error.as_deref(),
            Some("Error during scanning: snapshot 3 failed")
        );

        // Still accepts new scans rather than reporting one in progress.
        assert!(matches!(session.scan().await, Err(AppError::Capture(_))));
    }

    #[tokio::test]
    async fn test_zero_frame_scan_is_invalid_input() {
        let session = session_with(SyntheticCamera::new(4, 4), quick_settings(0));
        session.start_camera().await.unwrap();
        assert!(matches!(
            session.scan().await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(!session.snapshot().scanning);
    }

    #[tokio::test]
    async fn test_reset_clears_results_but_keeps_streaming() {
        let session = session_with(SyntheticCamera::new(4, 4), quick_settings(2));
        session.start_camera().await.unwrap();
        session.scan().await.unwrap();

        session.reset();
        let state = session.snapshot();
        assert!(state.results.is_none());
        assert!(state.error.is_none());
        assert!(state.streaming);
    }

    #[tokio::test]
    async fn test_new_scan_replaces_previous_report() {
        let session = session_with(
            SyntheticCamera::new(4, 4).with_colors(vec![[10, 10, 10], [240, 240, 240]]),
            quick_settings(1),
        );
        session.start_camera().await.unwrap();
        let dim = session.scan().await.unwrap();
        let bright = session.scan().await.unwrap();
        assert_eq!(dim.recommendations[0].severity, Severity::Low);
        assert_eq!(bright.recommendations[0].severity, Severity::High);
        assert_eq!(session.snapshot().results, Some(bright));
    }

    #[tokio::test]
    async fn test_session_is_shareable_across_tasks() {
        let session = Arc::new(session_with(SyntheticCamera::new(4, 4), quick_settings(2)));
        session.start_camera().await.unwrap();
        let worker = Arc::clone(&session);
        let report = tokio::spawn(async move { worker.scan().await })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.snapshot().results, Some(report));
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let session = session_with(SyntheticCamera::new(4, 4), quick_settings(1));
        session.start_camera().await.unwrap();
        session.stop_camera().await;
        assert!(matches!(
            session.scan().await,
            Err(AppError::SessionNotActive)
        ));
        session.start_camera().await.unwrap();
        assert!(session.snapshot().error.is_none());
        assert!(session.scan().await.is_ok());
    }
}

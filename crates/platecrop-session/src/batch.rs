// SPDX-License-Identifier: MIT
//
// Batch advancement over a single preview surface.
//
// The native event loop can exist only once per process, so one window
// serves the whole batch. `BatchRunner` pulls scans from a `BatchSource`,
// runs one crop session per scan, hands accepted crops back to the source
// for persistence, and stops on operator abort or batch exhaustion. The
// runner is UI-free and fully testable headless.

use image::RgbImage;
use tracing::info;

use platecrop_analysis::{estimate_crop_bounds, scale_to_fit};
use platecrop_core::{Result, SessionConfig};

use crate::state::{CropSessionState, SessionEvent, Transition, finalize_crop};

/// Supplies scans needing a crop and persists accepted results.
///
/// Implemented by the batch driver over its scans directory; tests use
/// in-memory sources.
pub trait BatchSource {
    /// The next scan needing a crop, with its display label, or `None` when
    /// the batch is exhausted. Errors are fatal for the whole run.
    fn next_scan(&mut self) -> Result<Option<(String, RgbImage)>>;

    /// Persist the accepted crop of the most recently supplied scan.
    fn accept(&mut self, label: &str, image: RgbImage) -> Result<()>;
}

/// Terminal result of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every eligible scan was cropped and persisted.
    Completed,
    /// The operator stopped the batch; remaining scans were never pulled.
    Aborted,
}

/// What advancing to the next scan produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStep {
    /// A new scan is active and should be shown.
    Started,
    /// The source has no scans left.
    Exhausted,
}

/// How an applied event left the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDisposition {
    /// The active session continues.
    Continue,
    /// The active scan was accepted and persisted; advance to the next one.
    NextScan,
    /// The operator aborted the batch.
    Abort,
}

/// The scan currently under interactive review.
pub(crate) struct ActiveScan {
    pub(crate) label: String,
    pub(crate) scan: RgbImage,
    pub(crate) state: CropSessionState,
}

/// Drives crop sessions for a whole batch against one plate reference.
pub struct BatchRunner {
    plate: RgbImage,
    source: Box<dyn BatchSource>,
    config: SessionConfig,
    active: Option<ActiveScan>,
}

impl BatchRunner {
    pub fn new(plate: RgbImage, source: Box<dyn BatchSource>, config: SessionConfig) -> Self {
        Self {
            plate,
            source,
            config,
            active: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub(crate) fn active(&self) -> Option<&ActiveScan> {
        self.active.as_ref()
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveScan> {
        self.active.as_mut()
    }

    /// Pull the next scan and start a session for it.
    ///
    /// The boundary estimate and display scale are computed here, exactly
    /// once per scan, and never recomputed mid-session.
    pub fn advance(&mut self) -> Result<BatchStep> {
        let Some((label, scan)) = self.source.next_scan()? else {
            info!("batch exhausted");
            return Ok(BatchStep::Exhausted);
        };

        let auto = estimate_crop_bounds(&self.plate, &scan)?;
        let scale = scale_to_fit(
            scan.width(),
            scan.height(),
            self.config.max_display_width,
            self.config.max_display_height,
        );
        info!(label = %label, estimate = %auto, scale, "interactive crop session started");

        let state = CropSessionState::new(auto, scale, scan.width(), scan.height());
        self.active = Some(ActiveScan { label, scan, state });
        Ok(BatchStep::Started)
    }

    /// Apply one session event to the active scan.
    ///
    /// Accepting finalizes the crop and hands it to the source before the
    /// runner moves on. Aborting drops the active scan and leaves the rest
    /// of the batch untouched; the runner pulls nothing further.
    pub fn apply(&mut self, event: SessionEvent) -> Result<BatchDisposition> {
        let transition = match self.active.as_mut() {
            Some(active) => active.state.apply(event),
            None => return Ok(BatchDisposition::Continue),
        };

        match transition {
            Transition::Continue => Ok(BatchDisposition::Continue),
            Transition::Accept(rotation) => {
                let Some(active) = self.active.take() else {
                    return Ok(BatchDisposition::Continue);
                };
                let bounds = active.state.proposed();
                info!(label = %active.label, %bounds, ?rotation, "crop accepted");
                let cropped = finalize_crop(&active.scan, bounds, rotation);
                self.source.accept(&active.label, cropped)?;
                Ok(BatchDisposition::NextScan)
            }
            Transition::Abort => {
                info!("batch aborted by operator");
                self.active = None;
                Ok(BatchDisposition::Abort)
            }
        }
    }
}

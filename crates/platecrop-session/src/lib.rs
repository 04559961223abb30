// SPDX-License-Identifier: MIT
//
// platecrop-session — Interactive crop confirmation.
//
// Couples the analysis core to an on-screen preview: the auto-computed
// boundary estimate is shown as a tinted overlay, the operator adjusts it by
// dragging, and each session resolves to an accepted (optionally rotated)
// crop or to a batch-wide abort. One native window serves the whole batch;
// the underlying platform event loop can only ever be created once per
// process, so the window advances from scan to scan instead of reopening.

pub mod batch;
mod preview;
pub mod state;

pub use batch::{BatchOutcome, BatchRunner, BatchSource, BatchStep};
pub use state::{CropSessionState, SessionEvent, SessionOutcome, Transition, finalize_crop};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

use image::RgbImage;
use tracing::{info, instrument};

use platecrop_core::{PlatecropError, Result, SessionConfig};

use crate::preview::PreviewApp;

/// Run interactive crop sessions for every scan `source` supplies, blocking
/// until the batch resolves.
///
/// Opens a single preview window sized for `plate` (eligible scans share the
/// plate's dimensions) and drives one session per scan inside it: accepted
/// crops are handed back to the source for persistence and the window moves
/// on to the next scan. The boundary estimate and display scale are computed
/// fresh for each scan.
///
/// [`BatchOutcome::Aborted`] means the operator cancelled the run; scans not
/// yet shown were never pulled from the source. A window closed without any
/// finalize/quit decision also resolves to `Aborted`.
#[instrument(skip_all, fields(width = plate.width(), height = plate.height()))]
pub fn run_crop_batch(
    plate: RgbImage,
    source: Box<dyn BatchSource>,
    config: &SessionConfig,
) -> Result<BatchOutcome> {
    let scale = platecrop_analysis::scale_to_fit(
        plate.width(),
        plate.height(),
        config.max_display_width,
        config.max_display_height,
    );
    let initial_size = [
        (plate.width() as f64 * scale).round() as f32,
        (plate.height() as f64 * scale).round() as f32,
    ];

    let runner = BatchRunner::new(plate, source, config.clone());
    let (result_tx, result_rx) = mpsc::channel();
    let app = PreviewApp::new(runner, result_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(initial_size)
            .with_position([0.0, 0.0]),
        ..Default::default()
    };
    eframe::run_native("platecrop", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|err| PlatecropError::Surface(err.to_string()))?;

    // No result before the surface went away means the operator cancelled.
    result_rx.try_recv().unwrap_or(Ok(BatchOutcome::Aborted))
}

/// A batch of exactly one scan, resolving to that scan's outcome.
struct SingleScanSource {
    item: Option<(String, RgbImage)>,
    accepted: Rc<RefCell<Option<RgbImage>>>,
}

impl BatchSource for SingleScanSource {
    fn next_scan(&mut self) -> Result<Option<(String, RgbImage)>> {
        Ok(self.item.take())
    }

    fn accept(&mut self, _label: &str, image: RgbImage) -> Result<()> {
        *self.accepted.borrow_mut() = Some(image);
        Ok(())
    }
}

/// Run one interactive crop session for `scan`, blocking until the operator
/// resolves it.
///
/// Convenience wrapper over [`run_crop_batch`] for a single image; subject to
/// the same once-per-process event loop constraint, so it cannot be called
/// again after any preview window has run. The session never mutates `scan`'s
/// original pixels; the accepted image is a freshly sliced (and possibly
/// rotated) buffer.
pub fn run_interactive_crop_session(
    display_label: &str,
    plate: &RgbImage,
    scan: RgbImage,
    config: &SessionConfig,
) -> Result<SessionOutcome> {
    let accepted = Rc::new(RefCell::new(None));
    let source = SingleScanSource {
        item: Some((display_label.to_string(), scan)),
        accepted: Rc::clone(&accepted),
    };

    match run_crop_batch(plate.clone(), Box::new(source), config)? {
        BatchOutcome::Aborted => Ok(SessionOutcome::Aborted),
        BatchOutcome::Completed => match accepted.borrow_mut().take() {
            Some(image) => {
                info!(width = image.width(), height = image.height(), "crop session accepted");
                Ok(SessionOutcome::Accepted(image))
            }
            None => Ok(SessionOutcome::Aborted),
        },
    }
}

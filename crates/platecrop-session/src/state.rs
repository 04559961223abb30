// SPDX-License-Identifier: MIT
//
// Session state machine.
//
// The interactive session is modelled as an explicit state struct plus a
// pure transition function over a closed event enum, so every transition is
// testable without opening a window. The preview surface only translates
// raw input into `SessionEvent`s and executes terminal transitions.

use image::RgbImage;
use tracing::debug;

use platecrop_core::{CropBounds, Rotation};

/// An input event consumed by the session loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// Primary pointer button held while moving, at display coordinates
    /// relative to the preview's top-left corner.
    PointerDrag { x: f32, y: f32 },
    /// Revert the proposed bounds to the auto-computed estimate.
    Reset,
    /// Accept the proposed bounds, applying the given rotation.
    Finalize(Rotation),
    /// Stop the session and the whole batch.
    Quit,
}

/// What a transition resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The session continues; the proposal may have changed.
    Continue,
    /// Terminal: crop to the proposed bounds with this rotation.
    Accept(Rotation),
    /// Terminal: operator cancelled the whole batch.
    Abort,
}

/// Terminal outcome of one interactive session.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The operator confirmed the crop; holds the final (possibly rotated)
    /// image.
    Accepted(RgbImage),
    /// The operator requested that the batch stop.
    Aborted,
}

/// Mutable state of one interactive crop session.
///
/// The auto estimate is computed exactly once per image before the session
/// starts and never recomputed; the display scale is likewise fixed because
/// the image dimensions cannot change mid-session.
#[derive(Debug)]
pub struct CropSessionState {
    /// Auto-computed estimate, kept for reset.
    auto: CropBounds,
    /// Currently proposed bounds in native image coordinates.
    proposed: CropBounds,
    /// Bounds of the last rendered preview, to suppress redundant renders.
    last_rendered: Option<CropBounds>,
    /// Uniform display scale factor (native -> display).
    scale: f64,
    native_width: u32,
    native_height: u32,
}

impl CropSessionState {
    pub fn new(auto: CropBounds, scale: f64, native_width: u32, native_height: u32) -> Self {
        Self {
            auto: auto.clamped_to(native_width, native_height),
            proposed: auto.clamped_to(native_width, native_height),
            last_rendered: None,
            scale,
            native_width,
            native_height,
        }
    }

    /// The bounds currently proposed for the crop.
    pub fn proposed(&self) -> CropBounds {
        self.proposed
    }

    /// The display scale factor fixed at session start.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Apply one event and return the resulting transition.
    pub fn apply(&mut self, event: SessionEvent) -> Transition {
        match event {
            SessionEvent::PointerDrag { x, y } => {
                // Inverse-scale display coordinates back into native space.
                let width = (f64::from(x) / self.scale).round().max(0.0) as u32;
                let height = (f64::from(y) / self.scale).round().max(0.0) as u32;
                self.proposed = CropBounds::new(height, width)
                    .clamped_to(self.native_width, self.native_height);
                debug!(bounds = %self.proposed, "proposal adjusted by pointer");
                Transition::Continue
            }
            SessionEvent::Reset => {
                self.proposed = self.auto;
                debug!(bounds = %self.proposed, "proposal reset to auto estimate");
                Transition::Continue
            }
            SessionEvent::Finalize(rotation) => Transition::Accept(rotation),
            SessionEvent::Quit => Transition::Abort,
        }
    }

    /// Whether the proposal differs from what was last rendered.
    pub fn needs_render(&self) -> bool {
        self.last_rendered != Some(self.proposed)
    }

    /// Record that the current proposal has been rendered.
    pub fn mark_rendered(&mut self) {
        self.last_rendered = Some(self.proposed);
    }
}

/// Slice `scan` to the accepted bounds and apply the chosen rotation.
///
/// The source buffer is left untouched; the crop is a new image.
pub fn finalize_crop(scan: &RgbImage, bounds: CropBounds, rotation: Rotation) -> RgbImage {
    let bounds = bounds.clamped_to(scan.width(), scan.height());
    let cropped = image::imageops::crop_imm(scan, 0, 0, bounds.width, bounds.height).to_image();
    match rotation {
        Rotation::None => cropped,
        Rotation::Half => image::imageops::rotate180(&cropped),
        Rotation::Clockwise90 => image::imageops::rotate90(&cropped),
        Rotation::CounterClockwise90 => image::imageops::rotate270(&cropped),
    }
}

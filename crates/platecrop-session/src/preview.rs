// SPDX-License-Identifier: MIT
//
// eframe preview surface.
//
// Thin adapter between egui input and the batch runner: keys and pointer
// drags become `SessionEvent`s, accepted scans advance the runner to the
// next file in the same window, and abort or exhaustion closes the loop.
// The preview texture is re-uploaded only when the proposed bounds have
// actually changed.

use std::sync::mpsc::Sender;
use std::time::Duration;

use image::RgbImage;
use tracing::debug;

use platecrop_analysis::render_crop_overlay;
use platecrop_core::{Result, Rotation};

use crate::batch::{ActiveScan, BatchDisposition, BatchOutcome, BatchRunner, BatchStep};
use crate::state::SessionEvent;

pub(crate) struct PreviewApp {
    runner: BatchRunner,
    texture: Option<egui::TextureHandle>,
    result_tx: Sender<Result<BatchOutcome>>,
    done: bool,
}

impl PreviewApp {
    pub(crate) fn new(runner: BatchRunner, result_tx: Sender<Result<BatchOutcome>>) -> Self {
        Self {
            runner,
            texture: None,
            result_tx,
            done: false,
        }
    }

    fn finish(&mut self, ctx: &egui::Context, result: Result<BatchOutcome>) {
        self.result_tx.send(result).ok();
        self.done = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    /// Advance the runner to the next scan, retitling and resizing the
    /// window for it, or finish when the batch is exhausted.
    fn start_next(&mut self, ctx: &egui::Context) {
        match self.runner.advance() {
            Ok(BatchStep::Started) => {
                self.texture = None;
                if let Some(active) = self.runner.active() {
                    let scale = active.state.scale();
                    let size = egui::vec2(
                        (active.scan.width() as f64 * scale).round() as f32,
                        (active.scan.height() as f64 * scale).round() as f32,
                    );
                    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Title(active.label.clone()));
                }
            }
            Ok(BatchStep::Exhausted) => self.finish(ctx, Ok(BatchOutcome::Completed)),
            Err(err) => self.finish(ctx, Err(err)),
        }
    }

    /// Overlay the current proposal onto the scan and shrink to display size.
    fn render_preview(active: &ActiveScan, tint: u8) -> RgbImage {
        let overlay = render_crop_overlay(&active.scan, active.state.proposed(), tint);
        let scale = active.state.scale();
        if scale == 1.0 {
            return overlay;
        }
        let display_width = ((overlay.width() as f64 * scale).round() as u32).max(1);
        let display_height = ((overlay.height() as f64 * scale).round() as u32).max(1);
        image::imageops::resize(
            &overlay,
            display_width,
            display_height,
            image::imageops::FilterType::Triangle,
        )
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.done {
            return;
        }

        if self.runner.active().is_none() {
            self.start_next(ctx);
            if self.done {
                return;
            }
        }

        let mut events: Vec<SessionEvent> = Vec::new();
        ctx.input(|input| {
            if input.key_pressed(egui::Key::Escape) || input.key_pressed(egui::Key::Q) {
                events.push(SessionEvent::Quit);
            }
            if input.key_pressed(egui::Key::R) {
                events.push(SessionEvent::Reset);
            }
            if input.key_pressed(egui::Key::ArrowUp) {
                events.push(SessionEvent::Finalize(Rotation::None));
            }
            if input.key_pressed(egui::Key::ArrowDown) {
                events.push(SessionEvent::Finalize(Rotation::Half));
            }
            if input.key_pressed(egui::Key::ArrowLeft) {
                events.push(SessionEvent::Finalize(Rotation::Clockwise90));
            }
            if input.key_pressed(egui::Key::ArrowRight) {
                events.push(SessionEvent::Finalize(Rotation::CounterClockwise90));
            }
            // Closing the window counts as cancelling the batch.
            if input.viewport().close_requested() {
                events.push(SessionEvent::Quit);
            }
        });

        let tint = self.runner.config().overlay_tint;
        let missing_texture = self.texture.is_none();
        if let Some(active) = self.runner.active_mut() {
            if active.state.needs_render() || missing_texture {
                let preview = Self::render_preview(active, tint);
                let size = [preview.width() as usize, preview.height() as usize];
                let color_image = egui::ColorImage::from_rgb(size, preview.as_raw());
                self.texture = Some(ctx.load_texture(
                    "crop-preview",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
                active.state.mark_rendered();
                debug!(bounds = %active.state.proposed(), "preview re-rendered");
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(texture) = &self.texture {
                    let response = ui.add(
                        egui::Image::new(texture).sense(egui::Sense::click_and_drag()),
                    );
                    if response.is_pointer_button_down_on() {
                        if let Some(pos) = response.interact_pointer_pos() {
                            let relative = pos - response.rect.min;
                            events.push(SessionEvent::PointerDrag {
                                x: relative.x,
                                y: relative.y,
                            });
                        }
                    }
                }
            });

        for event in events {
            match self.runner.apply(event) {
                Ok(BatchDisposition::Continue) => {}
                Ok(BatchDisposition::NextScan) => {
                    self.start_next(ctx);
                    if self.done {
                        return;
                    }
                }
                Ok(BatchDisposition::Abort) => {
                    self.finish(ctx, Ok(BatchOutcome::Aborted));
                    return;
                }
                Err(err) => {
                    self.finish(ctx, Err(err));
                    return;
                }
            }
        }

        // Poll for new input at a bounded interval instead of busy-spinning.
        ctx.request_repaint_after(Duration::from_millis(
            self.runner.config().poll_interval_ms,
        ));
    }
}

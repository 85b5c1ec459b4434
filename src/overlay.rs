// overlay.rs - egui overlay: win banner and FPS readout
use egui::{Align2, Color32, Context, Id, Order, RichText};

pub const WIN_BANNER: &str = "You win!";

/// What the overlay shows this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlayState {
    pub won: bool,
    /// None hides the readout
    pub fps: Option<f32>,
}

impl OverlayState {
    pub fn banner(&self) -> Option<&'static str> {
        self.won.then_some(WIN_BANNER)
    }

    pub fn fps_text(&self) -> Option<String> {
        self.fps.map(|fps| format!("{:.0}", fps))
    }
}

/// Lay out the overlay; neither area takes input or draws a background
pub fn draw_overlay(ctx: &Context, state: &OverlayState) {
    if let Some(fps) = state.fps_text() {
        egui::Area::new(Id::new("fps_readout"))
            .fixed_pos(egui::pos2(10.0, 10.0))
            .interactable(false)
            .fade_in(false)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(fps)
                        .size(48.0)
                        .color(Color32::from_rgb(74, 158, 255)),
                );
                ui.label(RichText::new("FPS").size(12.0).color(Color32::GRAY));
            });
    }

    if let Some(banner) = state.banner() {
        egui::Area::new(Id::new("win_banner"))
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(Order::Foreground)
            .interactable(false)
            .fade_in(false)
            .show(ctx, |ui| {
                ui.label(RichText::new(banner).size(48.0).strong().color(Color32::WHITE));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frames(state: &OverlayState, frames: usize) -> egui::FullOutput {
        let ctx = Context::default();
        let mut output = ctx.run(egui::RawInput::default(), |ctx| draw_overlay(ctx, state));
        for _ in 1..frames {
            output = ctx.run(egui::RawInput::default(), |ctx| draw_overlay(ctx, state));
        }
        output
    }

    #[test]
    fn test_banner_only_after_win() {
        assert_eq!(OverlayState::default().banner(), None);
        let won = OverlayState { won: true, fps: None };
        assert_eq!(won.banner(), Some(WIN_BANNER));
    }

    #[test]
    fn test_fps_text_rounds() {
        let state = OverlayState { won: false, fps: Some(59.6) };
        assert_eq!(state.fps_text().as_deref(), Some("60"));
        assert_eq!(OverlayState::default().fps_text(), None);
    }

    #[test]
    fn test_headless_banner_produces_shapes() {
        let output = run_frames(&OverlayState { won: true, fps: None }, 3);
        assert!(!output.shapes.is_empty());
    }

    #[test]
    fn test_headless_idle_overlay_runs() {
        let output = run_frames(&OverlayState::default(), 2);
        assert!(output.textures_delta.free.is_empty());
    }
}

use egui::{Pos2, Rect, Vec2};

pub const MIN_VIEW_ZOOM: f32 = 0.1;
pub const MAX_VIEW_ZOOM: f32 = 3.0;
pub const VIEW_ZOOM_STEP: f32 = 0.1;
pub const DEFAULT_VIEW_ZOOM: f32 = 1.0;

/// Clamp to the supported range and snap to the step so repeated
/// zoom clicks do not accumulate float drift
pub fn clamp_view_zoom(zoom: f32) -> f32 {
    if !zoom.is_finite() {
        return DEFAULT_VIEW_ZOOM;
    }
    let snapped = (zoom / VIEW_ZOOM_STEP).round() * VIEW_ZOOM_STEP;
    snapped.clamp(MIN_VIEW_ZOOM, MAX_VIEW_ZOOM)
}

/// Where the canvas sits on screen and how much it is magnified.
///
/// View zoom only changes presentation; layer geometry stays in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasView {
    /// Screen position of canvas pixel (0, 0)
    pub origin: Pos2,
    zoom: f32,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self::new(Pos2::ZERO, DEFAULT_VIEW_ZOOM)
    }
}

impl CanvasView {
    pub fn new(origin: Pos2, zoom: f32) -> Self {
        Self {
            origin,
            zoom: clamp_view_zoom(zoom),
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = clamp_view_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + VIEW_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - VIEW_ZOOM_STEP);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = DEFAULT_VIEW_ZOOM;
    }

    pub fn screen_to_canvas(&self, pos: Pos2) -> Pos2 {
        ((pos - self.origin) / self.zoom).to_pos2()
    }

    pub fn canvas_to_screen(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2() * self.zoom
    }

    /// Screen rectangle covered by a canvas of `canvas_size` pixels
    pub fn screen_rect(&self, canvas_size: Vec2) -> Rect {
        Rect::from_min_max(
            self.canvas_to_screen(Pos2::ZERO),
            self.canvas_to_screen(canvas_size.to_pos2()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_zoom_is_clamped_and_snapped() {
        assert_eq!(clamp_view_zoom(0.0), MIN_VIEW_ZOOM);
        assert_eq!(clamp_view_zoom(7.5), MAX_VIEW_ZOOM);
        assert_eq!(clamp_view_zoom(f32::NAN), DEFAULT_VIEW_ZOOM);
        assert!((clamp_view_zoom(1.04) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_steps() {
        let mut view = CanvasView::default();
        for _ in 0..40 {
            view.zoom_in();
        }
        assert_eq!(view.zoom(), MAX_VIEW_ZOOM);
        for _ in 0..40 {
            view.zoom_out();
        }
        assert!((view.zoom() - MIN_VIEW_ZOOM).abs() < 1e-6);
        view.reset_zoom();
        assert_eq!(view.zoom(), 1.0);
    }

    #[test]
    fn test_screen_canvas_mapping() {
        let view = CanvasView::new(pos2(100.0, 50.0), 0.5);
        let canvas = view.screen_to_canvas(pos2(150.0, 60.0));
        assert_eq!(canvas, pos2(100.0, 20.0));
        assert_eq!(view.canvas_to_screen(canvas), pos2(150.0, 60.0));
    }

    #[test]
    fn test_screen_rect_follows_zoom() {
        let view = CanvasView::new(pos2(10.0, 20.0), 2.0);
        let rect = view.screen_rect(Vec2::new(300.0, 100.0));
        assert_eq!(rect.min, pos2(10.0, 20.0));
        assert_eq!(rect.max, pos2(610.0, 220.0));
    }
}

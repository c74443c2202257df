use egui::{Context, PointerButton, Pos2, Rect, Vec2};

mod view;
pub use view::{
    CanvasView, DEFAULT_VIEW_ZOOM, MAX_VIEW_ZOOM, MIN_VIEW_ZOOM, VIEW_ZOOM_STEP, clamp_view_zoom,
};

/// Pointer input already mapped into canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp(Pos2),
    /// Positive `delta_y` means scrolling down (away from the user)
    Wheel { pos: Pos2, delta_y: f32 },
}

/// The parts of one frame's pointer state the canvas cares about
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSnapshot {
    pub hover_pos: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
    /// egui convention: positive is scrolling up
    pub scroll_delta: Vec2,
}

/// Turns raw egui input into `CanvasEvent`s for the canvas area
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    /// A press started on the canvas and has not been released yet
    pointer_captured: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this frame's primary-button input from `ctx`
    pub fn process_input(
        &mut self,
        ctx: &Context,
        view: &CanvasView,
        canvas_rect: Rect,
    ) -> Vec<CanvasEvent> {
        let snapshot = ctx.input(|input| PointerSnapshot {
            hover_pos: input.pointer.hover_pos(),
            pressed: input.pointer.button_pressed(PointerButton::Primary),
            released: input.pointer.button_released(PointerButton::Primary),
            scroll_delta: input.raw_scroll_delta,
        });
        self.translate(snapshot, view, canvas_rect)
    }

    /// Map one frame of pointer state to canvas events.
    ///
    /// Presses and wheel only count inside `canvas_rect`. Moves and the release
    /// are forwarded while a press that began on the canvas is held, so a drag
    /// can leave the canvas and still end cleanly.
    pub fn translate(
        &mut self,
        snapshot: PointerSnapshot,
        view: &CanvasView,
        canvas_rect: Rect,
    ) -> Vec<CanvasEvent> {
        let mut events = Vec::new();

        let Some(screen_pos) = snapshot.hover_pos.or(self.last_pointer_pos) else {
            return events;
        };
        let over_canvas = canvas_rect.contains(screen_pos);
        let pos = view.screen_to_canvas(screen_pos);

        if snapshot.pressed && over_canvas {
            self.pointer_captured = true;
            events.push(CanvasEvent::PointerDown(pos));
        }

        let moved = snapshot.hover_pos.is_some() && snapshot.hover_pos != self.last_pointer_pos;
        if moved && (over_canvas || self.pointer_captured) {
            events.push(CanvasEvent::PointerMove(pos));
        }

        if snapshot.released && self.pointer_captured {
            self.pointer_captured = false;
            events.push(CanvasEvent::PointerUp(pos));
        }

        if over_canvas && snapshot.scroll_delta.y != 0.0 {
            events.push(CanvasEvent::Wheel {
                pos,
                delta_y: -snapshot.scroll_delta.y,
            });
        }

        if snapshot.hover_pos.is_some() {
            self.last_pointer_pos = snapshot.hover_pos;
        }
        events
    }
}

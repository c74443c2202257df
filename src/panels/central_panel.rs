use egui::{Color32, Pos2, Rect, Sense, Vec2};

use crate::ComposeApp;
use crate::input::CanvasEvent;
use crate::state::EditorState;
use crate::texture_manager::pixmap_to_color_image;

const CANVAS_MARGIN: f32 = 16.0;

/// Place the canvas centered in `available`, or pinned to its top-left when it does not fit
fn canvas_origin(available: Rect, view_size: Vec2) -> Pos2 {
    let slack = (available.size() - view_size).max(Vec2::ZERO) / 2.0;
    available.min + slack
}

/// Feed events to the editor. Returns whether a wheel event rescaled a layer.
fn apply_canvas_events(state: &mut EditorState, events: Vec<CanvasEvent>) -> bool {
    let mut wheel_used = false;
    for event in events {
        let changed = state.handle_event(event);
        if matches!(event, CanvasEvent::Wheel { .. }) {
            wheel_used |= changed;
        }
    }
    wheel_used
}

pub fn central_panel(app: &mut ComposeApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::central_panel(&ctx.style()).fill(Color32::from_gray(48)))
        .show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let canvas_size = app.state.document().canvas_size();
                let view_size = canvas_size * app.view.zoom();
                let available = ui.available_rect_before_wrap().shrink(CANVAS_MARGIN);
                app.view.origin = canvas_origin(available, view_size);

                let canvas_rect = app.view.screen_rect(canvas_size);
                let response =
                    ui.allocate_rect(canvas_rect.expand(CANVAS_MARGIN), Sense::click_and_drag());

                let events = app.input.process_input(ctx, &app.view, canvas_rect);
                if apply_canvas_events(&mut app.state, events) {
                    // The wheel zoomed a layer; keep the scroll area where it is
                    ctx.input_mut(|input| input.smooth_scroll_delta = Vec2::ZERO);
                }

                let state = &app.state;
                let texture = app.texture.get_or_upload(ctx, state.version(), || {
                    state.render_live().map(|pixmap| pixmap_to_color_image(&pixmap))
                });

                let painter = ui.painter_at(response.rect);
                painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);
                match texture {
                    Ok(id) => {
                        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                        painter.image(id, canvas_rect, uv, Color32::WHITE);
                    }
                    Err(e) => log::error!("Canvas render failed: {}", e),
                }

                if let Some(hover) = response.hover_pos() {
                    let cursor = app.state.cursor_at(app.view.screen_to_canvas(hover));
                    ctx.set_cursor_icon(cursor);
                }
            });
        });
}

use eframe::egui;

use crate::canvas::view::ViewTransform;
use crate::session::EditorSession;
use crate::utils::vector::Vec2;

/// Forward raw egui pointer events to the session, mapped through the view
/// transform into logical coordinates. Leaving the canvas area is delivered
/// as the session's abort signal.
pub fn handle_canvas_input(
    session: &mut EditorSession,
    ctx: &egui::Context,
    response: &egui::Response,
    view: &ViewTransform,
    hover_logical: &mut Option<Vec2>,
    was_inside: &mut bool,
) {
    let events = ctx.input(|i| i.events.clone());

    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => {
                let p = view.to_logical(Vec2::new(pos.x, pos.y));
                if pressed {
                    if response.hovered() && view.in_bounds(p) {
                        session.pointer_down(p);
                    }
                } else {
                    // Releases end in-progress gestures wherever they land.
                    session.pointer_up(p);
                }
            }
            egui::Event::PointerMoved(pos) => {
                let p = view.to_logical(Vec2::new(pos.x, pos.y));
                let inside = response.hovered() && view.in_bounds(p);
                if inside {
                    *hover_logical = Some(p);
                    session.pointer_move(p);
                } else {
                    *hover_logical = None;
                    if *was_inside {
                        session.pointer_leave();
                    }
                }
                *was_inside = inside;
            }
            egui::Event::PointerGone => {
                *hover_logical = None;
                if *was_inside {
                    session.pointer_leave();
                }
                *was_inside = false;
            }
            _ => {}
        }
    }
}

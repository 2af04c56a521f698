use eframe::egui::Color32;
use easel::brush_engine::brush::BrushStyle;
use easel::canvas::view::ViewTransform;
use easel::session::EditorSession;
use easel::session::tools::Tool;
use easel::utils::color::Color;
use easel::utils::vector::Vec2;

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

/// A 1px crisp dab so single pixels can be marked precisely.
fn mark_pixel(session: &mut EditorSession, x: i32, y: i32, color: Color) {
    session.set_tool(Tool::Brush);
    session.set_brush_size(1.0);
    session.brush_mut().style = BrushStyle::Hard;
    session.set_active_color(color);
    let p = v(x as f32 + 0.5, y as f32 + 0.5);
    session.pointer_down(p);
    session.pointer_up(p);
}

#[test]
fn undo_redo_inverse_law() {
    let mut session = EditorSession::new(64, 48);
    session.brush_mut().style = BrushStyle::Hard;
    session.set_brush_size(8.0);

    // Three mutating operations: stroke, clear, resize.
    session.pointer_down(v(10.0, 10.0));
    session.pointer_move(v(30.0, 20.0));
    session.pointer_up(v(30.0, 20.0));
    session.clear();
    session.resize(32, 24, false);

    let final_dims = (session.surface().width(), session.surface().height());
    let final_pixels = session.surface().pixels().to_vec();

    session.undo();
    session.undo();
    session.undo();
    assert_eq!((session.surface().width(), session.surface().height()), (64, 48));

    session.redo();
    session.redo();
    session.redo();
    assert_eq!(
        (session.surface().width(), session.surface().height()),
        final_dims
    );
    assert_eq!(session.surface().pixels(), &final_pixels[..]);
}

#[test]
fn history_is_bounded_to_twenty_snapshots() {
    let mut session = EditorSession::new(16, 16);
    for _ in 0..25 {
        session.clear();
    }
    assert_eq!(session.undo_depth(), 20);

    let mut undos = 0;
    while session.can_undo() {
        session.undo();
        undos += 1;
    }
    assert_eq!(undos, 20);

    // Further undo is a silent no-op.
    let before = session.surface().pixels().to_vec();
    session.undo();
    assert_eq!(session.surface().pixels(), &before[..]);
}

#[test]
fn negative_selection_drag_copies_the_normalized_rect() {
    let mut session = EditorSession::new(100, 100);
    let red = Color::rgba(255, 0, 0, 255);
    // Mark the expected top-left corner of the normalized rect.
    mark_pixel(&mut session, 10, 20, red);

    session.set_tool(Tool::Select);
    session.pointer_down(v(50.0, 50.0));
    session.pointer_move(v(10.0, 20.0));
    session.pointer_up(v(10.0, 20.0));
    session.copy();

    session.paste(v(60.0, 60.0));
    let overlay = session.pasted().expect("paste created an overlay");
    assert_eq!(overlay.size(), (40, 30));

    // Bake via tool switch; the clipboard's first pixel is the marked one.
    session.set_tool(Tool::Brush);
    assert_eq!(
        session.surface().pixel(60, 60),
        Some(Color32::from_rgba_unmultiplied(255, 0, 0, 255))
    );
}

#[test]
fn circle_commits_centered_on_the_drag_start() {
    let mut session = EditorSession::new(200, 200);
    session.set_tool(Tool::Circle);
    session.set_brush_size(4.0);

    session.pointer_down(v(100.0, 100.0));
    session.pointer_move(v(130.0, 100.0));
    session.pointer_up(v(130.0, 100.0));

    // Radius 30 around (100,100): both horizontal extremes are painted,
    // the center is untouched.
    assert_ne!(session.surface().pixel(130, 100), Some(Color32::WHITE));
    assert_ne!(session.surface().pixel(70, 100), Some(Color32::WHITE));
    assert_eq!(session.surface().pixel(100, 100), Some(Color32::WHITE));
}

#[test]
fn crop_shrinks_the_surface_to_the_selection() {
    let mut session = EditorSession::new(800, 600);
    let red = Color::rgba(255, 0, 0, 255);
    mark_pixel(&mut session, 150, 120, red);

    session.set_tool(Tool::Crop);
    session.pointer_down(v(100.0, 100.0));
    session.pointer_move(v(300.0, 250.0));
    session.pointer_up(v(300.0, 250.0));

    assert_eq!(
        (session.surface().width(), session.surface().height()),
        (200, 150)
    );
    // Previously selected content sits at the origin.
    assert_eq!(
        session.surface().pixel(50, 20),
        Some(Color32::from_rgba_unmultiplied(255, 0, 0, 255))
    );
    assert!(session.selection_region().is_none());

    session.undo();
    assert_eq!(
        (session.surface().width(), session.surface().height()),
        (800, 600)
    );
}

#[test]
fn display_coordinates_map_to_logical_coordinates() {
    let view = ViewTransform::new(v(0.0, 0.0), v(400.0, 300.0), 800, 600);
    assert_eq!(view.to_logical(v(200.0, 150.0)), v(400.0, 300.0));
}

#[test]
fn eraser_leaves_fully_transparent_pixels() {
    let mut session = EditorSession::new(50, 50);
    session.set_tool(Tool::Eraser);
    session.set_brush_size(10.0);
    session.set_brush_opacity(1.0);
    session.set_brush_flow(1.0);
    session.brush_mut().style = BrushStyle::Hard;

    session.pointer_down(v(25.0, 25.0));
    session.pointer_up(v(25.0, 25.0));

    let px = session.surface().pixel(25, 25).unwrap();
    assert_eq!(px.a(), 0, "erased pixel should be transparent, got {px:?}");
}

#[test]
fn starting_a_selection_clears_the_overlay_without_extra_snapshots() {
    let mut session = EditorSession::new(100, 100);
    session.set_tool(Tool::Select);
    session.pointer_down(v(10.0, 10.0));
    session.pointer_move(v(30.0, 30.0));
    session.pointer_up(v(30.0, 30.0));
    session.copy();
    session.paste(v(5.0, 5.0));
    assert!(session.pasted().is_some());

    let depth = session.undo_depth();

    // New marquee drag, anchored outside the floating overlay.
    session.pointer_down(v(60.0, 60.0));
    assert!(session.pasted().is_none());
    assert_eq!(session.undo_depth(), depth);
}

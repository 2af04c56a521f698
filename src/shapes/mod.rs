use eframe::egui::Color32;

use crate::brush_engine::brush::Brush;
use crate::brush_engine::stroke::dash_on;
use crate::canvas::surface::Surface;
use crate::utils::color::Color;
use crate::utils::vector::{Vec2, distance};

/// Shape primitives drawn with a start point and a live end point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Polygon,
}

/// Draw the dashed, half-opacity live preview onto the overlay surface.
/// The overlay is cleared first; the committed surface is never touched.
pub fn preview(
    overlay: &mut Surface,
    kind: ShapeKind,
    start: Vec2,
    end: Vec2,
    pen_size: f32,
    color: Color,
) {
    overlay.fill(Color32::TRANSPARENT);
    let mut pen = Brush::shape_pen(pen_size);
    pen.style = crate::brush_engine::brush::BrushStyle::Textured;
    stamp_outline(overlay, &mut pen, kind, start, end, color.with_alpha(color.a * 0.5));
}

/// Commit the final shape onto the surface with a crisp continuous outline.
pub fn commit(
    surface: &mut Surface,
    kind: ShapeKind,
    start: Vec2,
    end: Vec2,
    pen_size: f32,
    color: Color,
) {
    let mut pen = Brush::shape_pen(pen_size);
    stamp_outline(surface, &mut pen, kind, start, end, color);
}

fn stamp_outline(
    target: &mut Surface,
    pen: &mut Brush,
    kind: ShapeKind,
    start: Vec2,
    end: Vec2,
    color: Color,
) {
    let points = outline_points(kind, start, end, pen.spacing());
    let mut travel = 0.0;
    let mut prev: Option<Vec2> = None;
    for p in points {
        if let Some(q) = prev {
            travel += distance(q, p);
        }
        if dash_on(pen, travel) {
            pen.dab(target, p, color, false);
        }
        prev = Some(p);
    }
}

/// Dab centers along the outline of the shape, spaced `spacing` apart.
fn outline_points(kind: ShapeKind, start: Vec2, end: Vec2, spacing: f32) -> Vec<Vec2> {
    let mut points = Vec::new();
    match kind {
        ShapeKind::Line => {
            walk_segment(&mut points, start, end, spacing);
        }
        ShapeKind::Rectangle => {
            let min = Vec2::new(start.x.min(end.x), start.y.min(end.y));
            let max = Vec2::new(start.x.max(end.x), start.y.max(end.y));
            let corners = [
                min,
                Vec2::new(max.x, min.y),
                max,
                Vec2::new(min.x, max.y),
            ];
            for i in 0..4 {
                walk_segment(&mut points, corners[i], corners[(i + 1) % 4], spacing);
            }
        }
        ShapeKind::Circle => {
            // Center at the drag start; the radius is the Euclidean distance
            // to the current point, not a bounding-box fit.
            let radius = distance(start, end);
            if radius < 0.5 {
                points.push(start);
            } else {
                let steps = ((std::f32::consts::TAU * radius / spacing).ceil() as usize).max(8);
                for i in 0..=steps {
                    let theta = std::f32::consts::TAU * i as f32 / steps as f32;
                    points.push(Vec2::new(
                        start.x + radius * theta.cos(),
                        start.y + radius * theta.sin(),
                    ));
                }
            }
        }
        ShapeKind::Polygon => {
            // Default polygon: triangle over start, end, and the end point
            // mirrored across the vertical line through start.
            let mirrored = Vec2::new(2.0 * start.x - end.x, end.y);
            let verts = [start, end, mirrored];
            for i in 0..3 {
                walk_segment(&mut points, verts[i], verts[(i + 1) % 3], spacing);
            }
        }
    }
    points
}

fn walk_segment(points: &mut Vec<Vec2>, a: Vec2, b: Vec2, spacing: f32) {
    let len = distance(a, b);
    points.push(a);
    if len == 0.0 {
        return;
    }
    let step = (b - a) / len * spacing;
    let mut travelled = spacing;
    let mut cur = a;
    while travelled < len {
        cur = cur + step;
        points.push(cur);
        travelled += spacing;
    }
    points.push(b);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_is_centered_on_drag_start() {
        let mut surface = Surface::new(200, 200, Color32::TRANSPARENT);
        commit(
            &mut surface,
            ShapeKind::Circle,
            Vec2::new(100.0, 100.0),
            Vec2::new(130.0, 100.0),
            4.0,
            Color::black(),
        );
        // Outline passes through both horizontal extremes of radius 30.
        assert!(surface.pixel(130, 100).unwrap().a() > 0);
        assert!(surface.pixel(70, 100).unwrap().a() > 0);
        // The center is not part of the outline.
        assert_eq!(surface.pixel(100, 100).unwrap().a(), 0);
    }

    #[test]
    fn rectangle_outline_hits_all_corners() {
        let mut surface = Surface::new(100, 100, Color32::TRANSPARENT);
        commit(
            &mut surface,
            ShapeKind::Rectangle,
            Vec2::new(70.0, 60.0),
            Vec2::new(20.0, 10.0),
            3.0,
            Color::black(),
        );
        for (x, y) in [(20, 10), (70, 10), (70, 60), (20, 60)] {
            assert!(surface.pixel(x, y).unwrap().a() > 0, "corner ({x},{y}) missing");
        }
        assert_eq!(surface.pixel(45, 35).unwrap().a(), 0);
    }

    #[test]
    fn polygon_mirrors_third_vertex_across_start() {
        let mut surface = Surface::new(120, 120, Color32::TRANSPARENT);
        commit(
            &mut surface,
            ShapeKind::Polygon,
            Vec2::new(60.0, 20.0),
            Vec2::new(90.0, 80.0),
            3.0,
            Color::black(),
        );
        // Apex plus the dragged vertex and its mirror at (2*60-90, 80).
        for (x, y) in [(60, 20), (90, 80), (30, 80)] {
            assert!(surface.pixel(x, y).unwrap().a() > 0, "vertex ({x},{y}) missing");
        }
    }

    #[test]
    fn preview_only_touches_the_overlay() {
        let mut overlay = Surface::new(64, 64, Color32::TRANSPARENT);
        preview(
            &mut overlay,
            ShapeKind::Line,
            Vec2::new(4.0, 4.0),
            Vec2::new(60.0, 60.0),
            4.0,
            Color::black(),
        );
        assert!(overlay.pixels().iter().any(|p| p.a() > 0));
        // Redrawing with a different end point clears the previous preview.
        preview(
            &mut overlay,
            ShapeKind::Line,
            Vec2::new(4.0, 4.0),
            Vec2::new(4.0, 5.0),
            4.0,
            Color::black(),
        );
        assert_eq!(overlay.pixel(60, 60).unwrap().a(), 0);
    }
}

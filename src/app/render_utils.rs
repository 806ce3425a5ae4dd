use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};
use treescope::CameraTransform;
use treescope::scene::{LinkTone, NodeTone};

const BASE_NODE: Color32 = Color32::from_rgb(88, 160, 214);
const MATCH_NODE: Color32 = Color32::from_rgb(103, 196, 255);
const SELECTED_NODE: Color32 = Color32::from_rgb(245, 206, 93);
const HOVERED_NODE: Color32 = Color32::from_rgb(255, 164, 101);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn node_fill(tone: NodeTone) -> Color32 {
    match tone {
        NodeTone::Base => BASE_NODE,
        NodeTone::Matched => blend_color(BASE_NODE, MATCH_NODE, 0.7),
        NodeTone::Selected => SELECTED_NODE,
        NodeTone::Hovered => HOVERED_NODE,
    }
}

/// Outline width grows with emphasis.
pub(super) fn node_outline(tone: NodeTone) -> Stroke {
    let width = match tone {
        NodeTone::Selected => 2.6,
        NodeTone::Matched | NodeTone::Hovered => 1.6,
        NodeTone::Base => 1.0,
    };
    Stroke::new(width, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
}

pub(super) fn link_stroke(tone: LinkTone, scale: f32) -> Stroke {
    let zoom_sqrt = scale.sqrt();
    match tone {
        LinkTone::Path => Stroke::new(
            (3.0 * zoom_sqrt).clamp(1.7, 5.8),
            Color32::from_rgb(246, 206, 104),
        ),
        LinkTone::Base => Stroke::new(
            (1.2 * zoom_sqrt).clamp(0.6, 3.4),
            Color32::from_rgba_unmultiplied(150, 150, 150, 200),
        ),
    }
}

pub(super) fn label_visible(tone: NodeTone, screen_radius: f32) -> bool {
    match tone {
        NodeTone::Selected | NodeTone::Hovered => true,
        NodeTone::Matched => screen_radius > 6.0,
        NodeTone::Base => screen_radius > 14.0,
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, transform: &CameraTransform) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * transform.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + transform.translate;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

/// Conservative segment culling: bounding-box overlap only.
pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    Rect::from_two_pos(start, end)
        .expand(padding)
        .intersects(rect)
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn blend_endpoints_are_the_inputs() {
        let a = Color32::from_rgb(10, 20, 30);
        let b = Color32::from_rgb(200, 100, 0);
        assert_eq!(blend_color(a, b, 0.0), a);
        assert_eq!(blend_color(a, b, 1.0), b);
    }

    #[test]
    fn culling_keeps_what_touches_the_viewport() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(-5.0, 50.0), 10.0));
        assert!(!circle_visible(rect, pos2(-50.0, 50.0), 10.0));
        assert!(segment_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 1.0));
        assert!(!segment_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, -20.0), 1.0));
    }
}

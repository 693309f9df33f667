use crate::model;
use eframe::egui;

use super::geometry::{circle_radius, diamond_points};

pub(super) fn paint_block(
    painter: &egui::Painter,
    origin: egui::Pos2,
    block: &model::Block,
    is_selected: bool,
    highlight: egui::Color32,
) {
    let rect = block.rect().translate(origin.to_vec2());
    let stroke_color = if is_selected {
        highlight
    } else {
        block.style.stroke.to_color32()
    };
    let stroke = egui::Stroke::new(block.style.stroke_width, stroke_color);
    let fill = block.style.fill.to_color32();
    match block.kind {
        model::ShapeKind::Rectangle => {
            painter.rect(rect, 2.0, fill, stroke, egui::StrokeKind::Middle);
        }
        model::ShapeKind::Circle => {
            painter.circle(rect.center(), circle_radius(rect), fill, stroke);
        }
        model::ShapeKind::Diamond => {
            painter.add(egui::Shape::convex_polygon(diamond_points(rect), fill, stroke));
        }
    }
    if !block.text.is_empty() {
        draw_centered_text(
            painter,
            rect.center(),
            &block.text,
            block.style.text_size,
            block.style.text_color.to_color32(),
        );
    }
}

fn draw_centered_text(
    painter: &egui::Painter,
    center: egui::Pos2,
    text: &str,
    font_size: f32,
    color: egui::Color32,
) {
    let font_id = egui::FontId::proportional(font_size);
    let galley = painter.layout_no_wrap(text.to_string(), font_id, color);
    let min = center - galley.size() * 0.5;
    painter.galley(min, galley, color);
}

use crate::model;
use eframe::egui;

use super::geometry::{label_anchor, smooth_path};

const SMOOTH_STEPS: usize = 12;
const LABEL_SIZE: f32 = 13.0;

/// Draws `path` (surface-local) for `connector`. Selected connectors use the
/// highlight color and a wider stroke.
pub(super) fn paint_connector(
    painter: &egui::Painter,
    origin: egui::Pos2,
    path: &[model::Point],
    connector: &model::Connector,
    is_selected: bool,
    highlight: egui::Color32,
) {
    if path.len() < 2 {
        return;
    }
    let style = &connector.style;
    let stroke = if is_selected {
        egui::Stroke::new(style.stroke_width + 2.0, highlight)
    } else {
        egui::Stroke::new(style.stroke_width, style.stroke.to_color32())
    };
    let screen: Vec<egui::Pos2> = path
        .iter()
        .map(|p| origin + p.to_pos2().to_vec2())
        .collect();
    let line = smooth_path(&screen, SMOOTH_STEPS);
    painter.add(egui::Shape::line(line, stroke));

    if connector.label.is_empty() {
        return;
    }
    let Some(anchor) = label_anchor(path) else {
        return;
    };
    let center = origin + anchor.to_pos2().to_vec2();
    let color = style.label_color.to_color32();
    let galley = painter.layout_no_wrap(
        connector.label.clone(),
        egui::FontId::proportional(LABEL_SIZE),
        color,
    );
    let area = egui::Rect::from_center_size(center, galley.size());
    let backdrop = painter.ctx().style().visuals.extreme_bg_color;
    painter.rect_filled(area.expand(3.0), 3.0, backdrop);
    painter.galley(area.min, galley, color);
}

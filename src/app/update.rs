use crate::model::Selection;
use eframe::egui;

use super::help::draw_help_window;
use super::surface::SurfaceEvent;
use super::tool::{Tool, show_palette};
use super::DiagramApp;

impl eframe::App for DiagramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let wants_keyboard = ctx.wants_keyboard_input();
        let mut requested_tool = None;
        let mut cancel_pending = false;
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::NONE, egui::Key::F1) {
                self.show_help = !self.show_help;
            }
            if wants_keyboard {
                return;
            }
            requested_tool = Tool::ALL
                .into_iter()
                .find(|t| i.consume_key(egui::Modifiers::NONE, t.shortcut()));
            cancel_pending = i.consume_key(egui::Modifiers::NONE, egui::Key::Escape);
        });
        if cancel_pending {
            let outcome = self.surface.handle(SurfaceEvent::CancelPending);
            self.record(&outcome);
        }

        egui::SidePanel::left("tool_palette")
            .resizable(false)
            .default_width(170.0)
            .show(ctx, |ui| {
                ui.heading("Tools");
                ui.separator();
                if let Some(tool) = show_palette(ui, self.tool.active()) {
                    requested_tool = Some(tool);
                }
                ui.separator();
                self.selection_inspector(ui);
                ui.separator();
                let hint = self.surface.mode().hint();
                if self.surface.pending_source().is_some() {
                    ui.colored_label(ui.visuals().warn_fg_color, hint);
                } else {
                    ui.label(hint);
                }
                if let Some(status) = &self.status {
                    ui.weak(status);
                }
                if let Some(viewport) = self.surface.viewport() {
                    ui.weak(format!(
                        "Canvas {:.0}×{:.0}",
                        viewport.width, viewport.height
                    ));
                }
                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    if ui.small_button("Shortcuts (F1)").clicked() {
                        self.show_help = true;
                    }
                });
            });

        if let Some(tool) = requested_tool {
            self.select_tool(tool);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            self.measure_canvas(rect.size());
            for outcome in self.surface.show(ui, rect.min, &response) {
                self.record(&outcome);
            }
        });

        draw_help_window(ctx, &mut self.show_help);
    }
}

impl DiagramApp {
    fn selection_inspector(&mut self, ui: &mut egui::Ui) {
        let state = self.surface.state();
        match state.selection().cloned() {
            Some(Selection::Block(id)) => {
                let Some(block) = state.block(&id) else {
                    return;
                };
                ui.strong(format!("{} {}", block.kind.display_name(), block.id));
                ui.label(format!(
                    "at ({:.0}, {:.0}), {:.0}×{:.0}",
                    block.position.x, block.position.y, block.size.width, block.size.height
                ));
            }
            Some(Selection::Connector(id)) => {
                let Some(connector) = state.connector(&id) else {
                    return;
                };
                ui.strong(connector.id.to_string());
                ui.label(format!("{} → {}", connector.source, connector.target));
                let mut label = connector.label.clone();
                ui.label("Label");
                if ui.text_edit_singleline(&mut label).changed() {
                    let outcome = self.surface.handle(SurfaceEvent::Relabel {
                        connector: id,
                        label,
                    });
                    self.record(&outcome);
                }
            }
            None => {
                ui.weak("Nothing selected");
            }
        }
    }
}

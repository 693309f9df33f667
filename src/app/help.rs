use eframe::egui;

use super::tool::Tool;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Shortcuts")
        .open(open)
        .resizable(false)
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.label("Tools");
            for tool in Tool::ALL {
                help_row(ui, tool.shortcut().name(), tool.label());
            }

            ui.add_space(10.0);
            ui.label("Canvas");
            help_row(ui, "Click", "Select, place a shape, or pick a connector end");
            help_row(ui, "Drag block", "Move it (any tool)");
            help_row(ui, "Escape", "Drop the pending connector source");
            help_row(ui, "F1", "Toggle this window");
        });
}

fn help_row(ui: &mut egui::Ui, key: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [90.0, 18.0],
            egui::Label::new(egui::RichText::new(key).monospace().strong()),
        );
        ui.label(description);
    });
}

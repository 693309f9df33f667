use eframe::egui;
use log::debug;

mod connector;
mod geometry;
mod help;
mod settings;
mod shape;
mod surface;
mod tool;
mod update;

pub(crate) use settings::{AppSettings, load_settings, settings_path};

use surface::{DiagramSurface, SurfaceOutcome};
use tool::{PaletteEvent, Tool, ToolState};

/// Owns the selected tool and the diagram surface, and keeps the two in
/// step.
pub struct DiagramApp {
    tool: ToolState,
    surface: DiagramSurface,
    last_viewport: Option<egui::Vec2>,
    status: Option<String>,
    show_help: bool,
}

impl DiagramApp {
    pub(crate) fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        let tool = ToolState::default();
        let surface = DiagramSurface::new(settings.surface_config(), tool.active());
        Self {
            tool,
            surface,
            last_viewport: None,
            status: None,
            show_help: settings.show_help_on_start,
        }
    }

    fn select_tool(&mut self, tool: Tool) {
        if let Some(PaletteEvent::ToolChanged { from, to }) = self.tool.select(tool) {
            debug!("tool {from:?} -> {to:?}");
            self.surface.set_tool(to);
            self.status = None;
        }
    }

    /// Forwards the canvas size to the surface whenever it changes.
    fn measure_canvas(&mut self, size: egui::Vec2) {
        if self.last_viewport == Some(size) {
            return;
        }
        self.last_viewport = Some(size);
        match self.surface.resize(size.x, size.y) {
            Ok(viewport) => debug!("canvas resized to {}x{}", viewport.width, viewport.height),
            Err(e) => debug!("keeping previous viewport: {e}"),
        }
    }

    fn record(&mut self, outcome: &SurfaceOutcome) {
        if let Some(text) = outcome.describe() {
            self.status = Some(text);
        }
    }
}

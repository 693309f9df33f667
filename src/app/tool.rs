use crate::model::ShapeKind;
use eframe::egui;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum Tool {
    #[default]
    Select,
    Rectangle,
    Circle,
    Diamond,
    Connector,
}

impl Tool {
    pub(crate) const ALL: [Tool; 5] = [
        Tool::Select,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Diamond,
        Tool::Connector,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Diamond => "Diamond",
            Tool::Connector => "Connector",
        }
    }

    pub(crate) fn shortcut(self) -> egui::Key {
        match self {
            Tool::Select => egui::Key::V,
            Tool::Rectangle => egui::Key::R,
            Tool::Circle => egui::Key::C,
            Tool::Diamond => egui::Key::D,
            Tool::Connector => egui::Key::L,
        }
    }

    pub(crate) fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Diamond => Some(ShapeKind::Diamond),
            Tool::Select | Tool::Connector => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PaletteEvent {
    ToolChanged { from: Tool, to: Tool },
}

/// The selected tool. Exactly one tool is active at any time.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ToolState {
    active: Tool,
}

impl ToolState {
    pub(crate) fn active(&self) -> Tool {
        self.active
    }

    pub(crate) fn select(&mut self, tool: Tool) -> Option<PaletteEvent> {
        if self.active == tool {
            return None;
        }
        let from = std::mem::replace(&mut self.active, tool);
        Some(PaletteEvent::ToolChanged { from, to: tool })
    }
}

/// Draws one button per tool and returns the tool the user asked for, if
/// any. The caller decides whether to apply it.
pub(super) fn show_palette(ui: &mut egui::Ui, active: Tool) -> Option<Tool> {
    let mut requested = None;
    for tool in Tool::ALL {
        let text = format!("{}  ({})", tool.label(), tool.shortcut().name());
        if ui.selectable_label(active == tool, text).clicked() {
            requested = Some(tool);
        }
    }
    requested
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn starts_on_select() {
        assert_eq!(ToolState::default().active(), Tool::Select);
    }

    #[test]
    fn select_reports_change_once() {
        let mut state = ToolState::default();
        assert_eq!(
            state.select(Tool::Diamond),
            Some(PaletteEvent::ToolChanged {
                from: Tool::Select,
                to: Tool::Diamond
            })
        );
        assert_eq!(state.select(Tool::Diamond), None);
        assert_eq!(state.active(), Tool::Diamond);
    }

    #[rstest]
    #[case(Tool::Select, None)]
    #[case(Tool::Rectangle, Some(ShapeKind::Rectangle))]
    #[case(Tool::Circle, Some(ShapeKind::Circle))]
    #[case(Tool::Diamond, Some(ShapeKind::Diamond))]
    #[case(Tool::Connector, None)]
    fn shape_tools_map_to_kinds(#[case] tool: Tool, #[case] kind: Option<ShapeKind>) {
        assert_eq!(tool.shape_kind(), kind);
    }

    #[test]
    fn shortcuts_are_distinct() {
        let mut keys: Vec<_> = Tool::ALL.iter().map(|t| t.shortcut()).collect();
        keys.sort_by_key(|k| k.name());
        keys.dedup();
        assert_eq!(keys.len(), Tool::ALL.len());
    }
}

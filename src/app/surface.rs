use crate::error::ViewportError;
use crate::model::{
    Block, BlockId, BlockStyle, Connector, ConnectorId, ConnectorStyle, DiagramState, Point,
    Selection, ShapeKind, Size,
};
use eframe::egui;
use log::debug;

use super::connector::paint_connector;
use super::geometry::{HitTarget, connector_path, topmost_block, topmost_hit};
use super::shape::paint_block;
use super::tool::Tool;

/// How a canvas click is interpreted. The pending connection source only
/// exists while the connector tool is active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SurfaceMode {
    Idle,
    PlacingShape(ShapeKind),
    ConnectingFrom(Option<BlockId>),
}

impl SurfaceMode {
    fn for_tool(tool: Tool) -> Self {
        match (tool, tool.shape_kind()) {
            (_, Some(kind)) => SurfaceMode::PlacingShape(kind),
            (Tool::Connector, None) => SurfaceMode::ConnectingFrom(None),
            _ => SurfaceMode::Idle,
        }
    }

    pub(crate) fn hint(&self) -> String {
        match self {
            SurfaceMode::Idle => "Click to select, drag to move".to_string(),
            SurfaceMode::PlacingShape(kind) => {
                format!("Click empty canvas to place a {}", kind.display_name())
            }
            SurfaceMode::ConnectingFrom(None) => "Click the source block".to_string(),
            SurfaceMode::ConnectingFrom(Some(source)) => {
                format!("Connecting from {source}: click the target block (Esc cancels)")
            }
        }
    }
}

/// Pointer input in surface-local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SurfaceEvent {
    Click { pos: Point, target: HitTarget },
    /// Absolute new top-left position for `block`.
    DragTo { block: BlockId, pos: Point },
    Relabel { connector: ConnectorId, label: String },
    CancelPending,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SurfaceOutcome {
    Unchanged,
    Selected(Option<Selection>),
    BlockCreated(BlockId),
    SourceArmed(BlockId),
    ConnectorCreated(ConnectorId),
    BlockMoved(BlockId),
    Relabeled(ConnectorId),
    PendingCleared,
}

impl SurfaceOutcome {
    pub(crate) fn describe(&self) -> Option<String> {
        match self {
            SurfaceOutcome::Unchanged
            | SurfaceOutcome::BlockMoved(_)
            | SurfaceOutcome::Relabeled(_) => None,
            SurfaceOutcome::Selected(None) => Some("Selection cleared".to_string()),
            SurfaceOutcome::Selected(Some(Selection::Block(id))) => Some(format!("Selected {id}")),
            SurfaceOutcome::Selected(Some(Selection::Connector(id))) => {
                Some(format!("Selected {id}"))
            }
            SurfaceOutcome::BlockCreated(id) => Some(format!("Created {id}")),
            SurfaceOutcome::SourceArmed(id) => {
                Some(format!("Connecting from {id}: click a second block"))
            }
            SurfaceOutcome::ConnectorCreated(id) => Some(format!("Created {id}")),
            SurfaceOutcome::PendingCleared => Some("Connection cancelled".to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub(crate) fn new(width: f32, height: f32) -> Result<Self, ViewportError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ViewportError::Degenerate { width, height });
        }
        Ok(Self { width, height })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SurfaceConfig {
    pub block_size: Size,
    pub block_style: BlockStyle,
    pub connector_style: ConnectorStyle,
    pub highlight: egui::Color32,
    pub hit_threshold: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            block_size: Size::default(),
            block_style: BlockStyle::default(),
            connector_style: ConnectorStyle::default(),
            highlight: egui::Color32::from_rgb(90, 160, 255),
            hit_threshold: 4.0,
        }
    }
}

#[derive(Clone, Debug)]
struct DragGrab {
    block: BlockId,
    offset: egui::Vec2,
}

pub(crate) struct DiagramSurface {
    state: DiagramState,
    mode: SurfaceMode,
    config: SurfaceConfig,
    viewport: Option<Viewport>,
    next_block: u64,
    next_connector: u64,
    drag: Option<DragGrab>,
}

impl DiagramSurface {
    pub(crate) fn new(config: SurfaceConfig, tool: Tool) -> Self {
        Self {
            state: DiagramState::default(),
            mode: SurfaceMode::for_tool(tool),
            config,
            viewport: None,
            next_block: 1,
            next_connector: 1,
            drag: None,
        }
    }

    pub(crate) fn state(&self) -> &DiagramState {
        &self.state
    }

    pub(crate) fn mode(&self) -> &SurfaceMode {
        &self.mode
    }

    pub(crate) fn pending_source(&self) -> Option<&BlockId> {
        match &self.mode {
            SurfaceMode::ConnectingFrom(source) => source.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Validates and adopts the pixel size the surface renders into. A
    /// rejected size leaves the previous viewport in effect.
    pub(crate) fn resize(&mut self, width: f32, height: f32) -> Result<Viewport, ViewportError> {
        let viewport = Viewport::new(width, height)?;
        self.viewport = Some(viewport);
        Ok(viewport)
    }

    /// The area painted and hit-tested, anchored at `origin`. `None` until a
    /// valid viewport has been set.
    pub(crate) fn canvas_rect(&self, origin: egui::Pos2) -> Option<egui::Rect> {
        self.viewport
            .map(|v| egui::Rect::from_min_size(origin, egui::vec2(v.width, v.height)))
    }

    pub(crate) fn set_tool(&mut self, tool: Tool) {
        let mode = SurfaceMode::for_tool(tool);
        if mode != self.mode {
            debug!("surface mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn replace(&mut self, state: DiagramState) {
        self.state = state;
    }

    pub(crate) fn handle(&mut self, event: SurfaceEvent) -> SurfaceOutcome {
        let outcome = match event {
            SurfaceEvent::Click { pos, target } => self.click(pos, target),
            SurfaceEvent::DragTo { block, pos } => self.drag_to(block, pos),
            SurfaceEvent::Relabel { connector, label } => {
                match self.state.with_connector_label(&connector, label) {
                    Some(next) => {
                        self.replace(next);
                        SurfaceOutcome::Relabeled(connector)
                    }
                    None => SurfaceOutcome::Unchanged,
                }
            }
            SurfaceEvent::CancelPending => match &mut self.mode {
                SurfaceMode::ConnectingFrom(source @ Some(_)) => {
                    *source = None;
                    SurfaceOutcome::PendingCleared
                }
                _ => SurfaceOutcome::Unchanged,
            },
        };
        if outcome.describe().is_some() {
            debug!("surface: {outcome:?}");
        }
        outcome
    }

    fn click(&mut self, pos: Point, target: HitTarget) -> SurfaceOutcome {
        match (self.mode.clone(), target) {
            (SurfaceMode::ConnectingFrom(None), HitTarget::Block(id)) => {
                if self.state.block(&id).is_none() {
                    return SurfaceOutcome::Unchanged;
                }
                self.mode = SurfaceMode::ConnectingFrom(Some(id.clone()));
                SurfaceOutcome::SourceArmed(id)
            }
            (SurfaceMode::ConnectingFrom(Some(source)), HitTarget::Block(target)) => {
                if source == target {
                    return SurfaceOutcome::Unchanged;
                }
                self.connect(source, target)
            }
            (SurfaceMode::ConnectingFrom(_), _) => SurfaceOutcome::Unchanged,
            (SurfaceMode::PlacingShape(kind), HitTarget::Empty) => self.place(kind, pos),
            (_, HitTarget::Empty) => self.select(None),
            (_, HitTarget::Block(id)) => self.select(Some(Selection::Block(id))),
            (_, HitTarget::Connector(id)) => self.select(Some(Selection::Connector(id))),
        }
    }

    fn select(&mut self, selection: Option<Selection>) -> SurfaceOutcome {
        if self.state.selection() == selection.as_ref() {
            return SurfaceOutcome::Unchanged;
        }
        match self.state.with_selection(selection.clone()) {
            Some(next) => {
                self.replace(next);
                SurfaceOutcome::Selected(selection)
            }
            None => SurfaceOutcome::Unchanged,
        }
    }

    fn place(&mut self, kind: ShapeKind, pos: Point) -> SurfaceOutcome {
        let id = BlockId::new(format!("block-{}", self.next_block));
        let block = Block {
            id: id.clone(),
            kind,
            position: pos,
            size: self.config.block_size,
            text: kind.display_name().to_string(),
            style: self.config.block_style,
        };
        let Some(next) = self
            .state
            .with_block(block)
            .and_then(|s| s.with_selection(Some(Selection::Block(id.clone()))))
        else {
            return SurfaceOutcome::Unchanged;
        };
        self.next_block += 1;
        self.replace(next);
        SurfaceOutcome::BlockCreated(id)
    }

    fn connect(&mut self, source: BlockId, target: BlockId) -> SurfaceOutcome {
        let id = ConnectorId::new(format!("connector-{}", self.next_connector));
        let connector = Connector {
            id: id.clone(),
            source,
            target,
            label: String::new(),
            style: self.config.connector_style,
        };
        let Some(next) = self
            .state
            .with_connector(connector)
            .and_then(|s| s.with_selection(Some(Selection::Connector(id.clone()))))
        else {
            return SurfaceOutcome::Unchanged;
        };
        self.next_connector += 1;
        self.replace(next);
        self.mode = SurfaceMode::ConnectingFrom(None);
        SurfaceOutcome::ConnectorCreated(id)
    }

    fn drag_to(&mut self, block: BlockId, pos: Point) -> SurfaceOutcome {
        if self.state.block(&block).is_some_and(|b| b.position == pos) {
            return SurfaceOutcome::Unchanged;
        }
        match self.state.with_block_position(&block, pos) {
            Some(next) => {
                self.replace(next);
                SurfaceOutcome::BlockMoved(block)
            }
            None => SurfaceOutcome::Unchanged,
        }
    }

    /// Paints the diagram into the viewport anchored at `origin` and turns
    /// pointer input on `response` into surface events. Does nothing until a
    /// viewport has been set. Returns the outcomes worth reporting.
    pub(crate) fn show(
        &mut self,
        ui: &egui::Ui,
        origin: egui::Pos2,
        response: &egui::Response,
    ) -> Vec<SurfaceOutcome> {
        let Some(rect) = self.canvas_rect(origin) else {
            return Vec::new();
        };
        let threshold = self.config.hit_threshold;
        let pointer = response
            .interact_pointer_pos()
            .or_else(|| response.hover_pos())
            .filter(|p| rect.contains(*p))
            .map(|p| (p - origin).to_pos2());
        let mut outcomes = Vec::new();

        if response.drag_started() {
            let press = ui
                .input(|i| i.pointer.press_origin())
                .map(|p| (p - origin).to_pos2())
                .or(pointer);
            self.drag = press.and_then(|p| {
                topmost_block(&self.state, p, threshold).map(|b| DragGrab {
                    block: b.id.clone(),
                    offset: p - b.position.to_pos2(),
                })
            });
        }
        if response.dragged() && response.drag_delta() != egui::Vec2::ZERO {
            if let (Some(grab), Some(p)) = (&self.drag, pointer) {
                let event = SurfaceEvent::DragTo {
                    block: grab.block.clone(),
                    pos: Point::from_pos2(p - grab.offset),
                };
                outcomes.push(self.handle(event));
            }
        }
        if response.drag_stopped() {
            if let Some(grab) = self.drag.take() {
                debug!("drag of {} finished", grab.block);
            }
        }
        if response.clicked() {
            if let Some(p) = pointer {
                let target = topmost_hit(&self.state, p, threshold);
                outcomes.push(self.handle(SurfaceEvent::Click {
                    pos: Point::from_pos2(p),
                    target,
                }));
            }
        }

        self.paint(ui, rect, pointer);
        outcomes.retain(|o| !matches!(o, SurfaceOutcome::Unchanged));
        outcomes
    }

    fn paint(&self, ui: &egui::Ui, rect: egui::Rect, pointer: Option<egui::Pos2>) {
        let painter = ui.painter_at(rect);
        let origin = rect.min;
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        for connector in self.state.connectors() {
            let Some(path) = connector_path(&self.state, connector) else {
                continue;
            };
            paint_connector(
                &painter,
                origin,
                &path,
                connector,
                self.state.is_connector_selected(&connector.id),
                self.config.highlight,
            );
        }

        if let Some(source) = self.pending_source().and_then(|id| self.state.block(id)) {
            let stroke = egui::Stroke::new(1.0, self.config.highlight);
            let from = origin + source.center().to_pos2().to_vec2();
            if let Some(p) = pointer {
                painter.line_segment([from, origin + p.to_vec2()], stroke);
            }
            painter.rect_stroke(
                source.rect().translate(origin.to_vec2()).expand(4.0),
                2.0,
                stroke,
                egui::StrokeKind::Outside,
            );
        }

        for block in self.state.blocks() {
            paint_block(
                &painter,
                origin,
                block,
                self.state.is_block_selected(&block.id),
                self.config.highlight,
            );
        }
    }
}

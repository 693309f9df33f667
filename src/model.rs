use eframe::egui;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_pos2(p: egui::Pos2) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn to_pos2(self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(100.0, 60.0)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlockStyle {
    pub fill: Rgba,
    pub stroke: Rgba,
    pub stroke_width: f32,
    pub text_color: Rgba,
    pub text_size: f32,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            fill: Rgba::rgb(255, 255, 255),
            stroke: Rgba::rgb(30, 30, 30),
            stroke_width: 2.0,
            text_color: Rgba::rgb(30, 30, 30),
            text_size: 14.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectorStyle {
    pub stroke: Rgba,
    pub stroke_width: f32,
    pub label_color: Rgba,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            stroke: Rgba::rgb(60, 60, 60),
            stroke_width: 2.0,
            label_color: Rgba::rgb(30, 30, 30),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Diamond,
}

impl ShapeKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Diamond => "Diamond",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(String);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectorId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl ConnectorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub kind: ShapeKind,
    /// Top-left corner.
    pub position: Point,
    pub size: Size,
    pub text: String,
    pub style: BlockStyle,
}

impl Block {
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.size.width * 0.5,
            self.position.y + self.size.height * 0.5,
        )
    }

    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(
            self.position.to_pos2(),
            egui::vec2(self.size.width, self.size.height),
        )
    }
}

/// A directed edge between two blocks. Its path is not stored; see
/// `app::geometry::connector_path`.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
    pub id: ConnectorId,
    pub source: BlockId,
    pub target: BlockId,
    pub label: String,
    pub style: ConnectorStyle,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Block(BlockId),
    Connector(ConnectorId),
}

/// Blocks, connectors and the selection. Every mutation builds a new value;
/// entities that are not touched keep sharing their `Rc` with the previous
/// state.
#[derive(Clone, Debug, Default)]
pub struct DiagramState {
    blocks: Vec<Rc<Block>>,
    connectors: Vec<Rc<Connector>>,
    selection: Option<Selection>,
}

impl DiagramState {
    pub fn blocks(&self) -> &[Rc<Block>] {
        &self.blocks
    }

    pub fn connectors(&self) -> &[Rc<Connector>] {
        &self.connectors
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id).map(|b| b.as_ref())
    }

    pub fn connector(&self, id: &ConnectorId) -> Option<&Connector> {
        self.connectors
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.as_ref())
    }

    pub fn is_block_selected(&self, id: &BlockId) -> bool {
        matches!(&self.selection, Some(Selection::Block(s)) if s == id)
    }

    pub fn is_connector_selected(&self, id: &ConnectorId) -> bool {
        matches!(&self.selection, Some(Selection::Connector(s)) if s == id)
    }

    fn resolves(&self, selection: &Selection) -> bool {
        match selection {
            Selection::Block(id) => self.block(id).is_some(),
            Selection::Connector(id) => self.connector(id).is_some(),
        }
    }

    /// Appends `block`. Returns `None` if a block with the same id exists.
    pub fn with_block(&self, block: Block) -> Option<Self> {
        if self.block(&block.id).is_some() {
            return None;
        }
        let mut blocks = self.blocks.clone();
        blocks.push(Rc::new(block));
        Some(Self {
            blocks,
            connectors: self.connectors.clone(),
            selection: self.selection.clone(),
        })
    }

    /// Appends `connector`. Both endpoints must resolve and differ.
    pub fn with_connector(&self, connector: Connector) -> Option<Self> {
        if connector.source == connector.target
            || self.block(&connector.source).is_none()
            || self.block(&connector.target).is_none()
            || self.connector(&connector.id).is_some()
        {
            return None;
        }
        let mut connectors = self.connectors.clone();
        connectors.push(Rc::new(connector));
        Some(Self {
            blocks: self.blocks.clone(),
            connectors,
            selection: self.selection.clone(),
        })
    }

    pub fn with_block_position(&self, id: &BlockId, position: Point) -> Option<Self> {
        let idx = self.blocks.iter().position(|b| &b.id == id)?;
        let mut blocks = self.blocks.clone();
        let moved = Block {
            position,
            ..blocks[idx].as_ref().clone()
        };
        blocks[idx] = Rc::new(moved);
        Some(Self {
            blocks,
            connectors: self.connectors.clone(),
            selection: self.selection.clone(),
        })
    }

    pub fn with_connector_label(&self, id: &ConnectorId, label: String) -> Option<Self> {
        let idx = self.connectors.iter().position(|c| &c.id == id)?;
        let mut connectors = self.connectors.clone();
        let relabeled = Connector {
            label,
            ..connectors[idx].as_ref().clone()
        };
        connectors[idx] = Rc::new(relabeled);
        Some(Self {
            blocks: self.blocks.clone(),
            connectors,
            selection: self.selection.clone(),
        })
    }

    /// Replaces the selection. Returns `None` if `selection` names an
    /// element that does not exist.
    pub fn with_selection(&self, selection: Option<Selection>) -> Option<Self> {
        if let Some(s) = &selection {
            if !self.resolves(s) {
                return None;
            }
        }
        Some(Self {
            blocks: self.blocks.clone(),
            connectors: self.connectors.clone(),
            selection,
        })
    }
}

pub fn distance_to_segment(p: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    let ab = b - a;
    let ap = p - a;
    let ab_len2 = ab.x * ab.x + ab.y * ab.y;
    if ab_len2 <= f32::EPSILON {
        return (p - a).length();
    }
    let t = (ap.x * ab.x + ap.y * ab.y) / ab_len2;
    let t = t.clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str, x: f32, y: f32) -> Block {
        Block {
            id: BlockId::new(id),
            kind: ShapeKind::Rectangle,
            position: Point::new(x, y),
            size: Size::default(),
            text: String::new(),
            style: BlockStyle::default(),
        }
    }

    fn two_blocks() -> DiagramState {
        DiagramState::default()
            .with_block(block("a", 0.0, 0.0))
            .and_then(|s| s.with_block(block("b", 200.0, 0.0)))
            .unwrap()
    }

    #[test]
    fn moving_a_block_shares_untouched_entities() {
        let before = two_blocks();
        let after = before
            .with_block_position(&BlockId::new("a"), Point::new(5.0, 7.0))
            .unwrap();
        assert!(!Rc::ptr_eq(&before.blocks()[0], &after.blocks()[0]));
        assert!(Rc::ptr_eq(&before.blocks()[1], &after.blocks()[1]));
        assert_eq!(before.blocks()[0].position, Point::new(0.0, 0.0));
        assert_eq!(after.blocks()[0].position, Point::new(5.0, 7.0));
    }

    #[test]
    fn connector_endpoints_must_resolve() {
        let state = two_blocks();
        let dangling = Connector {
            id: ConnectorId::new("c"),
            source: BlockId::new("a"),
            target: BlockId::new("missing"),
            label: String::new(),
            style: ConnectorStyle::default(),
        };
        assert!(state.with_connector(dangling).is_none());

        let self_loop = Connector {
            id: ConnectorId::new("c"),
            source: BlockId::new("a"),
            target: BlockId::new("a"),
            label: String::new(),
            style: ConnectorStyle::default(),
        };
        assert!(state.with_connector(self_loop).is_none());
    }

    #[test]
    fn selection_must_reference_an_existing_element() {
        let state = two_blocks();
        assert!(
            state
                .with_selection(Some(Selection::Block(BlockId::new("zzz"))))
                .is_none()
        );
        let selected = state
            .with_selection(Some(Selection::Block(BlockId::new("b"))))
            .unwrap();
        assert!(selected.is_block_selected(&BlockId::new("b")));
        assert!(!selected.is_block_selected(&BlockId::new("a")));
    }

    #[test]
    fn duplicate_block_ids_are_rejected() {
        assert!(two_blocks().with_block(block("a", 1.0, 1.0)).is_none());
    }

    #[test]
    fn distance_to_segment_clamps_to_endpoints() {
        let d = distance_to_segment(
            egui::pos2(-3.0, 4.0),
            egui::pos2(0.0, 0.0),
            egui::pos2(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn center_is_middle_of_box() {
        assert_eq!(block("a", 10.0, 20.0).center(), Point::new(60.0, 50.0));
    }
}

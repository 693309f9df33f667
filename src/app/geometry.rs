use crate::model;
use eframe::egui;

/// Source center to target center. `None` when either endpoint is gone.
pub(super) fn connector_path(
    state: &model::DiagramState,
    connector: &model::Connector,
) -> Option<Vec<model::Point>> {
    let source = state.block(&connector.source)?;
    let target = state.block(&connector.target)?;
    Some(vec![source.center(), target.center()])
}

/// Average of the two points straddling the middle index of the path.
pub(super) fn label_anchor(path: &[model::Point]) -> Option<model::Point> {
    match path {
        [] => None,
        [only] => Some(*only),
        _ => {
            let mid = path.len() / 2;
            Some(path[mid - 1].midpoint(path[mid]))
        }
    }
}

/// Samples a Catmull-Rom spline through `points`. Two-point paths come back
/// unchanged.
pub(super) fn smooth_path(points: &[egui::Pos2], steps: usize) -> Vec<egui::Pos2> {
    if points.len() < 3 || steps == 0 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity((points.len() - 1) * steps + 1);
    for i in 0..points.len() - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(points.len() - 1)];
        for s in 0..steps {
            let t = s as f32 / steps as f32;
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    if let Some(last) = points.last() {
        out.push(*last);
    }
    out
}

fn catmull_rom(p0: egui::Pos2, p1: egui::Pos2, p2: egui::Pos2, p3: egui::Pos2, t: f32) -> egui::Pos2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let f = |a: f32, b: f32, c: f32, d: f32| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    egui::pos2(f(p0.x, p1.x, p2.x, p3.x), f(p0.y, p1.y, p2.y, p3.y))
}

pub(super) fn diamond_points(rect: egui::Rect) -> Vec<egui::Pos2> {
    vec![
        rect.center_top(),
        rect.right_center(),
        rect.center_bottom(),
        rect.left_center(),
    ]
}

pub(super) fn circle_radius(rect: egui::Rect) -> f32 {
    rect.width().min(rect.height()) * 0.5
}

pub(super) fn block_contains(block: &model::Block, p: egui::Pos2, threshold: f32) -> bool {
    let rect = block.rect();
    match block.kind {
        model::ShapeKind::Rectangle => rect.expand(threshold).contains(p),
        model::ShapeKind::Circle => (p - rect.center()).length() <= circle_radius(rect) + threshold,
        model::ShapeKind::Diamond => {
            let hw = rect.width() * 0.5 + threshold;
            let hh = rect.height() * 0.5 + threshold;
            if hw <= f32::EPSILON || hh <= f32::EPSILON {
                return false;
            }
            let v = p - rect.center();
            v.x.abs() / hw + v.y.abs() / hh <= 1.0
        }
    }
}

pub(super) fn path_contains(path: &[model::Point], p: egui::Pos2, threshold: f32) -> bool {
    path.windows(2)
        .any(|w| model::distance_to_segment(p, w[0].to_pos2(), w[1].to_pos2()) <= threshold)
}

/// What sits under a point. Blocks win over connectors; later entries win
/// over earlier ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum HitTarget {
    Empty,
    Block(model::BlockId),
    Connector(model::ConnectorId),
}

pub(super) fn topmost_hit(state: &model::DiagramState, p: egui::Pos2, threshold: f32) -> HitTarget {
    if let Some(block) = topmost_block(state, p, threshold) {
        return HitTarget::Block(block.id.clone());
    }
    for connector in state.connectors().iter().rev() {
        let Some(path) = connector_path(state, connector) else {
            continue;
        };
        if path_contains(&path, p, threshold + connector.style.stroke_width) {
            return HitTarget::Connector(connector.id.clone());
        }
    }
    HitTarget::Empty
}

pub(super) fn topmost_block<'a>(
    state: &'a model::DiagramState,
    p: egui::Pos2,
    threshold: f32,
) -> Option<&'a model::Block> {
    state
        .blocks()
        .iter()
        .rev()
        .find(|b| block_contains(b, p, threshold))
        .map(|b| b.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Block, BlockId, BlockStyle, Connector, ConnectorId, ConnectorStyle, Point, ShapeKind, Size,
    };
    use rstest::rstest;

    fn block(id: &str, kind: ShapeKind, x: f32, y: f32) -> Block {
        Block {
            id: BlockId::new(id),
            kind,
            position: Point::new(x, y),
            size: Size::new(100.0, 60.0),
            text: String::new(),
            style: BlockStyle::default(),
        }
    }

    fn connected() -> model::DiagramState {
        model::DiagramState::default()
            .with_block(block("a", ShapeKind::Rectangle, 0.0, 0.0))
            .and_then(|s| s.with_block(block("b", ShapeKind::Rectangle, 300.0, 0.0)))
            .and_then(|s| {
                s.with_connector(Connector {
                    id: ConnectorId::new("c"),
                    source: BlockId::new("a"),
                    target: BlockId::new("b"),
                    label: String::new(),
                    style: ConnectorStyle::default(),
                })
            })
            .unwrap()
    }

    #[test]
    fn path_runs_between_live_centers() {
        let state = connected();
        let c = state.connector(&ConnectorId::new("c")).unwrap();
        assert_eq!(
            connector_path(&state, c),
            Some(vec![Point::new(50.0, 30.0), Point::new(350.0, 30.0)])
        );

        let moved = state
            .with_block_position(&BlockId::new("a"), Point::new(0.0, 100.0))
            .unwrap();
        let c = moved.connector(&ConnectorId::new("c")).unwrap();
        assert_eq!(connector_path(&moved, c).unwrap()[0], Point::new(50.0, 130.0));
    }

    #[test]
    fn dangling_connector_has_no_path() {
        let state = connected();
        let orphan = Connector {
            id: ConnectorId::new("x"),
            source: BlockId::new("a"),
            target: BlockId::new("gone"),
            label: String::new(),
            style: ConnectorStyle::default(),
        };
        assert_eq!(connector_path(&state, &orphan), None);
    }

    #[rstest]
    #[case(vec![], None)]
    #[case(vec![Point::new(4.0, 4.0)], Some(Point::new(4.0, 4.0)))]
    #[case(vec![Point::new(0.0, 0.0), Point::new(10.0, 20.0)], Some(Point::new(5.0, 10.0)))]
    #[case(
        vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
        Some(Point::new(5.0, 0.0))
    )]
    #[case(
        vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 10.0), Point::new(30.0, 10.0)],
        Some(Point::new(15.0, 5.0))
    )]
    fn label_sits_between_middle_points(#[case] path: Vec<Point>, #[case] expected: Option<Point>) {
        assert_eq!(label_anchor(&path), expected);
    }

    #[rstest]
    #[case(ShapeKind::Rectangle, egui::pos2(2.0, 2.0), true)]
    #[case(ShapeKind::Circle, egui::pos2(2.0, 2.0), false)]
    #[case(ShapeKind::Circle, egui::pos2(50.0, 30.0), true)]
    #[case(ShapeKind::Diamond, egui::pos2(2.0, 2.0), false)]
    #[case(ShapeKind::Diamond, egui::pos2(50.0, 5.0), true)]
    fn hit_test_follows_shape_outline(
        #[case] kind: ShapeKind,
        #[case] p: egui::Pos2,
        #[case] expected: bool,
    ) {
        assert_eq!(block_contains(&block("a", kind, 0.0, 0.0), p, 0.0), expected);
    }

    #[test]
    fn blocks_win_over_connectors_and_later_blocks_win() {
        let state = connected()
            .with_block(block("top", ShapeKind::Rectangle, 20.0, 10.0))
            .unwrap();
        assert_eq!(
            topmost_hit(&state, egui::pos2(60.0, 30.0), 0.0),
            HitTarget::Block(BlockId::new("top"))
        );
        assert_eq!(
            topmost_hit(&state, egui::pos2(200.0, 30.0), 2.0),
            HitTarget::Connector(ConnectorId::new("c"))
        );
        assert_eq!(topmost_hit(&state, egui::pos2(200.0, 200.0), 2.0), HitTarget::Empty);
    }

    #[test]
    fn smoothing_keeps_endpoints() {
        let pts = [egui::pos2(0.0, 0.0), egui::pos2(10.0, 10.0), egui::pos2(20.0, 0.0)];
        let smooth = smooth_path(&pts, 8);
        assert_eq!(smooth.first(), Some(&pts[0]));
        assert_eq!(smooth.last(), Some(&pts[2]));
        assert_eq!(smooth.len(), 17);
        assert_eq!(smooth_path(&pts[..2], 8), pts[..2].to_vec());
    }
}

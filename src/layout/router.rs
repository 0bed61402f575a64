//! layout::router
//!
//! Arrow router: one path per (parent, child) edge.
//!
//! # Edge kinds
//!
//! | kind               | when                                   | shape          |
//! |--------------------|----------------------------------------|----------------|
//! | `Direct`           | parent on the child's branch           | line if clear  |
//! | `CrossBranch`      | parent on another branch               | curve          |
//! | `MergeIncoming`    | second parent of a merge               | curve          |
//! | `CherryPickSource` | second parent of a cherry-pick         | curve          |
//!
//! # Clearance
//!
//! Before a path is emitted, its anchor chord is checked against every
//! commit other than its endpoints. An obstructed segment gets a waypoint
//! pushed `reroute_margin` outward from the nearest obstruction, and the
//! check repeats. After [`MAX_REROUTE_ATTEMPTS`] waypoints the router gives
//! up and emits a straight line marked `degraded`.
//!
//! # Color
//!
//! A path takes the color slot of its parent's branch, except the primary
//! parent path of a merge, which takes the merge commit's branch.

use serde::Serialize;
use tracing::{debug, warn};

use super::geometry::{cubic_extrema, distance_to_segment, Point};
use super::positions::Positions;
use super::{time_direction, LayoutConfig, LayoutError};
use crate::core::model::Commit;
use crate::core::store::GraphStore;
use crate::core::types::{CommitId, Orientation};

/// Waypoints inserted for one edge before falling back to a straight line.
pub const MAX_REROUTE_ATTEMPTS: usize = 6;

/// Why an edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Direct,
    CrossBranch,
    MergeIncoming,
    CherryPickSource,
}

/// How `points` should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathShape {
    /// A polyline through every point.
    Line,
    /// Cubic Bezier segments: `[a0, c1, c2, a1, c1, c2, a2, ...]`.
    Curve,
}

/// A routed connector from a parent commit to a child commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedPath {
    pub from: CommitId,
    pub to: CommitId,
    pub kind: EdgeKind,
    pub shape: PathShape,
    pub points: Vec<Point>,
    pub color_index: usize,
    /// At least one waypoint was inserted.
    pub rerouted: bool,
    /// Rerouting gave up; `points` is the straight chord.
    pub degraded: bool,
}

impl RoutedPath {
    /// The points the path passes through, without Bezier control points.
    pub fn anchors(&self) -> Vec<Point> {
        match self.shape {
            PathShape::Line => self.points.clone(),
            PathShape::Curve => self.points.iter().step_by(3).copied().collect(),
        }
    }

    /// Points whose bounding box is the bounding box of the drawn path.
    pub fn extent(&self) -> Vec<Point> {
        match self.shape {
            PathShape::Line => self.points.clone(),
            PathShape::Curve => self
                .points
                .windows(4)
                .step_by(3)
                .flat_map(|w| cubic_extrema([w[0], w[1], w[2], w[3]]))
                .collect(),
        }
    }
}

/// Route every parent edge of every commit, children in seq order.
pub fn route(
    store: &GraphStore,
    positions: &Positions,
    config: &LayoutConfig,
) -> Result<Vec<RoutedPath>, LayoutError> {
    let commits = store.commits();
    let mut obstacles: Vec<(&CommitId, Point)> = Vec::with_capacity(commits.len());
    for commit in &commits {
        obstacles.push((&commit.id, positions.commit(&commit.id)?.point()));
    }

    let mut paths = Vec::new();
    for child in &commits {
        for (slot, parent_id) in child.parents.iter().enumerate() {
            let parent = store
                .commit_by_id(parent_id)
                .ok_or_else(|| LayoutError::MissingCommit(parent_id.clone()))?;
            paths.push(route_edge(
                parent, child, slot, positions, &obstacles, config,
            )?);
        }
    }
    Ok(paths)
}

fn classify(parent: &Commit, child: &Commit, slot: usize) -> EdgeKind {
    match (slot, child.is_merge(), child.is_cherry_pick()) {
        (1, true, _) => EdgeKind::MergeIncoming,
        (1, _, true) => EdgeKind::CherryPickSource,
        _ if parent.branch == child.branch => EdgeKind::Direct,
        _ => EdgeKind::CrossBranch,
    }
}

fn route_edge(
    parent: &Commit,
    child: &Commit,
    slot: usize,
    positions: &Positions,
    obstacles: &[(&CommitId, Point)],
    config: &LayoutConfig,
) -> Result<RoutedPath, LayoutError> {
    let kind = classify(parent, child, slot);
    let color_branch = if slot == 0 && child.is_merge() {
        &child.branch
    } else {
        &parent.branch
    };
    let color_index = config.color_index(positions.branch(color_branch)?.index);

    let from = positions.commit(&parent.id)?.point();
    let to = positions.commit(&child.id)?.point();
    let others: Vec<Point> = obstacles
        .iter()
        .filter(|(id, _)| **id != parent.id && **id != child.id)
        .map(|(_, p)| *p)
        .collect();

    let mut path = RoutedPath {
        from: parent.id.clone(),
        to: child.id.clone(),
        kind,
        shape: PathShape::Line,
        points: vec![from, to],
        color_index,
        rerouted: false,
        degraded: false,
    };

    let anchors = match clear_anchors(from, to, &others, positions.orientation, config) {
        Some(anchors) => anchors,
        None => {
            warn!(
                from = %parent.id,
                to = %child.id,
                attempts = MAX_REROUTE_ATTEMPTS,
                "reroute gave up, drawing a straight line"
            );
            path.degraded = true;
            return Ok(path);
        }
    };

    path.rerouted = anchors.len() > 2;
    if kind == EdgeKind::Direct && !path.rerouted {
        return Ok(path);
    }

    if path.rerouted {
        debug!(from = %parent.id, to = %child.id, waypoints = anchors.len() - 2, "rerouted");
    }
    path.shape = PathShape::Curve;
    path.points = bezier_through(&anchors, positions.orientation, config);
    Ok(path)
}

/// Anchor points whose chords keep `min_clearance` from every obstacle, or
/// `None` when that takes more than [`MAX_REROUTE_ATTEMPTS`] waypoints.
fn clear_anchors(
    from: Point,
    to: Point,
    obstacles: &[Point],
    orientation: Orientation,
    config: &LayoutConfig,
) -> Option<Vec<Point>> {
    let mut anchors = vec![from, to];

    for _ in 0..=MAX_REROUTE_ATTEMPTS {
        let Some((segment, obstacle)) =
            first_obstruction(&anchors, obstacles, config.min_clearance)
        else {
            return Some(anchors);
        };
        if anchors.len() - 2 == MAX_REROUTE_ATTEMPTS {
            break;
        }
        let waypoint = push_away(
            anchors[segment],
            anchors[segment + 1],
            obstacle,
            orientation,
            config.reroute_margin,
        );
        anchors.insert(segment + 1, waypoint);
    }
    None
}

/// First segment passing within `clearance` of an obstacle, paired with the
/// nearest obstacle to that segment.
fn first_obstruction(
    anchors: &[Point],
    obstacles: &[Point],
    clearance: f64,
) -> Option<(usize, Point)> {
    anchors.windows(2).enumerate().find_map(|(segment, pair)| {
        obstacles
            .iter()
            .map(|&p| (distance_to_segment(p, pair[0], pair[1]), p))
            .filter(|(d, _)| *d < clearance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| (segment, p))
    })
}

/// A waypoint `margin` from `obstacle`, on the side of segment `a`-`b`
/// opposite the obstacle. An obstacle on the chord itself is passed on the
/// side of increasing lane position.
fn push_away(a: Point, b: Point, obstacle: Point, orientation: Orientation, margin: f64) -> Point {
    let direction = b
        .sub(a)
        .normalized()
        .unwrap_or_else(|| time_direction(orientation));
    let normal = direction.perpendicular();

    let side = direction.cross(obstacle.sub(a));
    let away = if side.abs() > f64::EPSILON {
        if side > 0.0 {
            normal.scale(-1.0)
        } else {
            normal
        }
    } else {
        let lane = if orientation.is_vertical() {
            normal.x
        } else {
            normal.y
        };
        let time = normal.dot(time_direction(orientation));
        if lane > f64::EPSILON || (lane.abs() <= f64::EPSILON && time > 0.0) {
            normal
        } else {
            normal.scale(-1.0)
        }
    };

    obstacle.add(away.scale(margin))
}

/// Cubic Bezier chain through `anchors`, tangent to the time axis at both ends.
fn bezier_through(anchors: &[Point], orientation: Orientation, config: &LayoutConfig) -> Vec<Point> {
    let axis = time_direction(orientation);
    let last = anchors.len() - 1;
    let tangents: Vec<Point> = (0..anchors.len())
        .map(|i| {
            if i == 0 || i == last {
                axis
            } else {
                anchors[i + 1].sub(anchors[i - 1]).normalized().unwrap_or(axis)
            }
        })
        .collect();

    let reach = config.curve_fraction * config.branch_spacing;
    let mut points = vec![anchors[0]];
    for i in 0..last {
        let (start, end) = (anchors[i], anchors[i + 1]);
        let handle = reach.min(start.distance(end) / 2.0);
        points.push(start.add(tangents[i].scale(handle)));
        points.push(end.sub(tangents[i + 1].scale(handle)));
        points.push(end);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::{CherryPickArgs, CommitArgs, MergeArgs};
    use crate::layout::measure::MonospaceMeasurer;
    use crate::layout::positions::calculate;

    fn commit(store: &mut GraphStore, id: &str) {
        store.commit(CommitArgs::new(id).with_id(id)).unwrap();
    }

    #[test]
    fn curve_extent_ignores_overshooting_handles() {
        let path = RoutedPath {
            from: CommitId::new("a").unwrap(),
            to: CommitId::new("b").unwrap(),
            kind: EdgeKind::CrossBranch,
            shape: PathShape::Curve,
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 40.0),
                Point::new(10.0, 40.0),
                Point::new(10.0, 0.0),
            ],
            color_index: 0,
            rerouted: true,
            degraded: false,
        };

        let top = path.extent().iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!(top < 40.0);
        assert!((top - 30.0).abs() < 1e-9);
    }

    fn routed(store: &GraphStore, config: &LayoutConfig) -> Vec<RoutedPath> {
        let positions = calculate(store, config, &MonospaceMeasurer::default()).unwrap();
        route(store, &positions, config).unwrap()
    }

    fn find<'a>(paths: &'a [RoutedPath], from: &str, to: &str) -> &'a RoutedPath {
        paths
            .iter()
            .find(|p| p.from.as_str() == from && p.to.as_str() == to)
            .unwrap()
    }

    fn merged() -> GraphStore {
        let mut store = GraphStore::new();
        commit(&mut store, "root");
        store.branch("feature", None).unwrap();
        store.checkout("feature").unwrap();
        commit(&mut store, "f1");
        store.checkout("main").unwrap();
        commit(&mut store, "m1");
        store.merge(MergeArgs::new("feature").with_id("M")).unwrap();
        store
    }

    #[test]
    fn same_branch_neighbours_are_straight() {
        let mut store = GraphStore::new();
        commit(&mut store, "a");
        commit(&mut store, "b");
        let paths = routed(&store, &LayoutConfig::default());

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].kind, EdgeKind::Direct);
        assert_eq!(paths[0].shape, PathShape::Line);
        assert_eq!(paths[0].points.len(), 2);
    }

    #[test]
    fn edges_are_classified() {
        let paths = routed(&merged(), &LayoutConfig::default());

        assert_eq!(find(&paths, "root", "f1").kind, EdgeKind::CrossBranch);
        assert_eq!(find(&paths, "root", "m1").kind, EdgeKind::Direct);
        assert_eq!(find(&paths, "m1", "M").kind, EdgeKind::Direct);
        assert_eq!(find(&paths, "f1", "M").kind, EdgeKind::MergeIncoming);
        assert_eq!(find(&paths, "f1", "M").shape, PathShape::Curve);
    }

    #[test]
    fn merge_colors_follow_absorbing_branch() {
        let paths = routed(&merged(), &LayoutConfig::default());

        // main is lane 0, feature lane 1
        assert_eq!(find(&paths, "root", "f1").color_index, 0);
        assert_eq!(find(&paths, "m1", "M").color_index, 0);
        assert_eq!(find(&paths, "f1", "M").color_index, 1);
    }

    #[test]
    fn color_index_wraps_at_limit() {
        let config = LayoutConfig {
            theme_color_limit: 1,
            ..LayoutConfig::default()
        };
        let paths = routed(&merged(), &config);
        assert!(paths.iter().all(|p| p.color_index == 0));
    }

    #[test]
    fn curves_are_tangent_to_time_axis() {
        let paths = routed(&merged(), &LayoutConfig::default());
        let curve = find(&paths, "root", "f1");

        assert_eq!(curve.points.len(), 4);
        let (a0, c1) = (curve.points[0], curve.points[1]);
        assert_eq!(a0.y, c1.y);
        assert!(c1.x > a0.x);
        assert_eq!(curve.anchors().len(), 2);
    }

    #[test]
    fn anchored_cherry_pick_reroutes_around_tip() {
        // main: A - B, then a cherry-pick of S anchored on A lands after B
        // on the same lane, so the chord A -> C runs through B.
        let mut store = GraphStore::new();
        commit(&mut store, "A");
        commit(&mut store, "B");
        store.branch("side", None).unwrap();
        store.checkout("side").unwrap();
        commit(&mut store, "S");
        store.checkout("main").unwrap();
        store
            .cherry_pick(CherryPickArgs::new("S").onto("A").with_id("C"))
            .unwrap();

        let config = LayoutConfig::default();
        let paths = routed(&store, &config);
        let edge = find(&paths, "A", "C");

        assert_eq!(edge.kind, EdgeKind::Direct);
        assert!(edge.rerouted);
        assert!(!edge.degraded);
        assert_eq!(edge.shape, PathShape::Curve);
        // B sits on lane 0 at x = 60; the waypoint passes on the positive lane side
        let waypoint = edge.anchors()[1];
        assert_eq!(waypoint, Point::new(60.0, 20.0));
    }

    #[test]
    fn non_degraded_chords_keep_clearance() {
        let mut store = merged();
        store.branch("hotfix", None).unwrap();
        store.checkout("hotfix").unwrap();
        commit(&mut store, "h1");
        store.checkout("feature").unwrap();
        commit(&mut store, "f2");
        store.checkout("main").unwrap();
        store.merge(MergeArgs::new("hotfix").with_id("M2")).unwrap();

        for orientation in [Orientation::LR, Orientation::TB, Orientation::BT] {
            store.set_orientation(orientation);
            let config = LayoutConfig::default();
            let positions = calculate(&store, &config, &MonospaceMeasurer::default()).unwrap();
            let paths = route(&store, &positions, &config).unwrap();

            for path in paths.iter().filter(|p| !p.degraded) {
                for (id, commit) in &positions.commits {
                    if *id == path.from || *id == path.to {
                        continue;
                    }
                    for pair in path.anchors().windows(2) {
                        let d = distance_to_segment(commit.point(), pair[0], pair[1]);
                        assert!(d >= config.min_clearance, "{} -> {} near {}", path.from, path.to, id);
                    }
                }
            }
        }
    }

    #[test]
    fn gives_up_after_bounded_attempts() {
        // A wall of obstacles across the chord can never be cleared.
        let obstacles: Vec<Point> = (-40..=40)
            .map(|i| Point::new(50.0, i as f64 * 5.0))
            .collect();
        let anchors = clear_anchors(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            &obstacles,
            Orientation::LR,
            &LayoutConfig::default(),
        );
        assert!(anchors.is_none());
    }

    #[test]
    fn push_away_picks_far_side() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        let above = push_away(a, b, Point::new(50.0, 3.0), Orientation::LR, 20.0);
        assert_eq!(above, Point::new(50.0, -17.0));
        let on_chord = push_away(a, b, Point::new(50.0, 0.0), Orientation::LR, 20.0);
        assert_eq!(on_chord, Point::new(50.0, 20.0));
    }
}

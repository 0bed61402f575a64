//! layout
//!
//! Layout engine: turns a store snapshot into renderer-ready geometry.
//!
//! # Pipeline
//!
//! 1. [`fast_verify`] the snapshot. A failing snapshot is a defect and is
//!    reported as [`LayoutError::Invariant`], never laid out with guesses.
//! 2. [`positions::calculate`] assigns branch lanes and commit coordinates.
//! 3. [`router::route`] builds one path per parent edge.
//! 4. Bounds are accumulated over everything that will be drawn.
//!
//! The engine only reads the store. Calling [`layout`] twice on the same
//! snapshot yields identical output.
//!
//! # Example
//!
//! ```
//! use gitgraph::core::store::{CommitArgs, GraphStore};
//! use gitgraph::layout::{layout, measure::MonospaceMeasurer, LayoutConfig};
//!
//! let mut store = GraphStore::new();
//! store.commit(CommitArgs::new("root")).unwrap();
//! let geometry = layout(&store, &LayoutConfig::default(), &MonospaceMeasurer::default()).unwrap();
//! assert_eq!(geometry.commit_positions.len(), 1);
//! ```

pub mod geometry;
pub mod measure;
pub mod positions;
pub mod router;

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::core::store::GraphStore;
use crate::core::types::{BranchName, CommitId, Orientation};
use crate::core::verify::{fast_verify, VerifyError};

use geometry::{Bounds, Point};
use measure::{FontConfig, TextMeasurer};
use positions::{BranchPosition, CommitPositionOffset, Positions};
use router::RoutedPath;

/// Extra lane pitch when commit labels are rotated.
pub const ROTATED_LABEL_PITCH: f64 = 40.0;

/// Errors from the layout engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("snapshot failed verification: {}", summarize(.0))]
    Invariant(Vec<VerifyError>),

    #[error("commit '{0}' has no position")]
    MissingCommit(CommitId),

    #[error("branch '{0}' has no lane")]
    MissingBranch(BranchName),
}

fn summarize(errors: &[VerifyError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Settings consumed by the position calculator and the router.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub commit_spacing: f64,
    pub branch_spacing: f64,
    pub layout_offset: f64,
    pub commit_radius: f64,
    pub rotate_commit_label: bool,
    pub show_commit_label: bool,
    pub parallel_commits: bool,
    pub diagram_padding: f64,
    pub theme_color_limit: usize,
    pub min_clearance: f64,
    pub reroute_margin: f64,
    pub curve_fraction: f64,
    pub font: FontConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            commit_spacing: 50.0,
            branch_spacing: 50.0,
            layout_offset: 10.0,
            commit_radius: 10.0,
            rotate_commit_label: false,
            show_commit_label: true,
            parallel_commits: true,
            diagram_padding: 8.0,
            theme_color_limit: 8,
            min_clearance: 10.0,
            reroute_margin: 20.0,
            curve_fraction: 0.4,
            font: FontConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Distance between neighbouring branch lanes.
    pub fn lane_pitch(&self) -> f64 {
        if self.rotate_commit_label {
            self.branch_spacing + ROTATED_LABEL_PITCH
        } else {
            self.branch_spacing
        }
    }

    /// Color slot for a branch index.
    pub fn color_index(&self, branch_index: usize) -> usize {
        branch_index % self.theme_color_limit.max(1)
    }
}

/// Geometry bundle handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub orientation: Orientation,
    pub branch_positions: BTreeMap<BranchName, BranchPosition>,
    pub commit_positions: BTreeMap<CommitId, CommitPositionOffset>,
    pub paths: Vec<RoutedPath>,
    pub bounds: Bounds,
}

impl Layout {
    /// Paths that fell back to a straight line after rerouting gave up.
    pub fn degraded_paths(&self) -> impl Iterator<Item = &RoutedPath> {
        self.paths.iter().filter(|p| p.degraded)
    }
}

/// Lay out a store snapshot.
pub fn layout(
    store: &GraphStore,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> Result<Layout, LayoutError> {
    let verified = fast_verify(store);
    if !verified.ok {
        return Err(LayoutError::Invariant(verified.errors));
    }

    let positions = positions::calculate(store, config, measurer)?;
    let paths = router::route(store, &positions, config)?;
    let bounds = diagram_bounds(&positions, &paths, config);

    debug!(
        commits = positions.commits.len(),
        branches = positions.branches.len(),
        paths = paths.len(),
        orientation = %positions.orientation,
        "layout complete"
    );

    let Positions {
        orientation,
        branches,
        commits,
        ..
    } = positions;

    Ok(Layout {
        orientation,
        branch_positions: branches,
        commit_positions: commits,
        paths,
        bounds,
    })
}

/// Minimal rectangle covering markers, lane lines, labels and paths, plus padding.
fn diagram_bounds(positions: &Positions, paths: &[RoutedPath], config: &LayoutConfig) -> Bounds {
    let mut bounds = Bounds::empty();
    let radius = config.commit_radius;

    for commit in positions.commits.values() {
        bounds.include_box(commit.point(), radius, radius);
        if let Some(label) = &commit.label {
            let (half_width, half_height) = label.half_extents();
            bounds.include_box(label.center, half_width, half_height);
        }
    }

    let (start, end) = positions.time_extent(config);
    for branch in positions.branches.values() {
        for t in [start, end] {
            bounds.include(positions.orientation_point(t, branch.pos));
        }
    }

    for path in paths {
        for point in path.extent() {
            bounds.include(point);
        }
    }

    bounds.padded(config.diagram_padding)
}

/// Unit vector pointing from older to newer commits.
pub(crate) fn time_direction(orientation: Orientation) -> Point {
    match orientation {
        Orientation::LR => Point::new(1.0, 0.0),
        Orientation::TB => Point::new(0.0, 1.0),
        Orientation::BT => Point::new(0.0, -1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::measure::MonospaceMeasurer;
    use super::*;
    use crate::core::store::{CommitArgs, MergeArgs};

    fn feature_merge() -> GraphStore {
        let mut store = GraphStore::new();
        store.commit(CommitArgs::new("root").with_id("root")).unwrap();
        store.branch("feature", None).unwrap();
        store.checkout("feature").unwrap();
        store.commit(CommitArgs::new("f1").with_id("f1")).unwrap();
        store.checkout("main").unwrap();
        store.commit(CommitArgs::new("m1").with_id("m1")).unwrap();
        store.merge(MergeArgs::new("feature").with_id("M")).unwrap();
        store
    }

    #[test]
    fn lays_out_every_commit_and_edge() {
        let store = feature_merge();
        let geometry = layout(&store, &LayoutConfig::default(), &MonospaceMeasurer::default()).unwrap();

        assert_eq!(geometry.commit_positions.len(), 4);
        assert_eq!(geometry.branch_positions.len(), 2);
        // root->f1, root->m1, m1->M, f1->M
        assert_eq!(geometry.paths.len(), 4);
        assert_eq!(geometry.degraded_paths().count(), 0);
    }

    #[test]
    fn bounds_cover_everything() {
        let store = feature_merge();
        let config = LayoutConfig::default();
        let geometry = layout(&store, &config, &MonospaceMeasurer::default()).unwrap();

        for commit in geometry.commit_positions.values() {
            assert!(geometry.bounds.contains(commit.point()));
        }
        for path in &geometry.paths {
            for point in path.anchors().into_iter().chain(path.extent()) {
                assert!(geometry.bounds.contains(point));
            }
        }
    }

    #[test]
    fn empty_store_still_has_lane_and_bounds() {
        let store = GraphStore::new();
        let geometry = layout(&store, &LayoutConfig::default(), &MonospaceMeasurer::default()).unwrap();

        assert!(geometry.commit_positions.is_empty());
        assert!(geometry.paths.is_empty());
        assert_eq!(geometry.branch_positions.len(), 1);
        assert!(geometry.bounds.width() > 0.0);
    }

    #[test]
    fn repeated_layout_is_identical() {
        let mut store = feature_merge();
        store.set_orientation(Orientation::BT);
        let config = LayoutConfig::default();
        let measurer = MonospaceMeasurer::default();

        let first = layout(&store, &config, &measurer).unwrap();
        let second = layout(&store, &config, &measurer).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn serializes_bundle() {
        let store = feature_merge();
        let geometry = layout(&store, &LayoutConfig::default(), &MonospaceMeasurer::default()).unwrap();
        let json = serde_json::to_value(&geometry).unwrap();

        assert_eq!(json["orientation"], "LR");
        assert!(json["commit_positions"]["M"]["pos_with_offset"].is_number());
        assert!(json["bounds"]["width"].is_number());
        assert_eq!(json["paths"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn lane_pitch_grows_for_rotated_labels() {
        let config = LayoutConfig {
            rotate_commit_label: true,
            ..LayoutConfig::default()
        };
        assert_eq!(config.lane_pitch(), 90.0);
        assert_eq!(config.color_index(9), 1);
    }
}

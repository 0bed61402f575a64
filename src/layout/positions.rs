//! layout::positions
//!
//! Position calculator.
//!
//! # Branch lanes
//!
//! Branches with an explicit `order` come first, ascending. Unordered
//! branches follow by the seq of their first commit, and branches without
//! commits go last in creation order. Each branch gets a 0-based `index` and
//! a lane at `index * lane_pitch` on the axis orthogonal to time.
//!
//! # Time ranks
//!
//! Commits are sorted by `(seq, id)`. In LR and TB every commit gets its own
//! rank. In BT with `parallel_commits`, consecutive independent commits on
//! different lanes may share a rank (see [`pack_ranks`]).
//!
//! The calculator is a pure function of the snapshot and the config.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::FRAC_1_SQRT_2;

use serde::Serialize;

use super::geometry::{distance_to_segment, Point};
use super::measure::TextMeasurer;
use super::{LayoutConfig, LayoutError};
use crate::core::graph::CommitGraph;
use crate::core::model::{Branch, Commit};
use crate::core::store::GraphStore;
use crate::core::types::{BranchName, CommitId, CommitKind, Orientation};

/// Gap between a commit marker and its label.
pub const LABEL_GAP: f64 = 4.0;

/// Lane assigned to a branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BranchPosition {
    /// Coordinate on the axis orthogonal to time.
    pub pos: f64,
    /// Display index, used for color selection.
    pub index: usize,
}

/// Marker drawn for a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitSymbol {
    Circle,
    Cross,
    Square,
    DoubleCircle,
    CherryPick,
}

impl CommitSymbol {
    pub fn for_kind(kind: CommitKind) -> Self {
        match kind {
            CommitKind::Normal => CommitSymbol::Circle,
            CommitKind::Reverse => CommitSymbol::Cross,
            CommitKind::Highlight => CommitSymbol::Square,
            CommitKind::Merge => CommitSymbol::DoubleCircle,
            CommitKind::CherryPick => CommitSymbol::CherryPick,
        }
    }
}

/// Where a commit label sits. `width`/`height` are the unrotated text size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelBox {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

impl LabelBox {
    /// Half extents of the axis-aligned box around the label.
    pub fn half_extents(&self) -> (f64, f64) {
        if self.rotated {
            let half = (self.width + self.height) * FRAC_1_SQRT_2 / 2.0;
            (half, half)
        } else {
            (self.width / 2.0, self.height / 2.0)
        }
    }
}

/// A commit's coordinates plus its label placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitPositionOffset {
    pub x: f64,
    pub y: f64,
    /// Orthogonal-axis coordinate of the label center. Equals the lane
    /// position when labels are hidden.
    pub pos_with_offset: f64,
    pub rank: usize,
    pub symbol: CommitSymbol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelBox>,
}

impl CommitPositionOffset {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Output of the calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct Positions {
    pub orientation: Orientation,
    pub branches: BTreeMap<BranchName, BranchPosition>,
    pub commits: BTreeMap<CommitId, CommitPositionOffset>,
    pub max_rank: usize,
}

impl Positions {
    /// Time coordinate of a rank.
    pub fn time_of(&self, rank: usize, config: &LayoutConfig) -> f64 {
        time_coordinate(self.orientation, rank, self.max_rank, config)
    }

    /// Smallest and largest time coordinate in use.
    pub fn time_extent(&self, config: &LayoutConfig) -> (f64, f64) {
        let a = self.time_of(0, config);
        let b = self.time_of(self.max_rank, config);
        (a.min(b), a.max(b))
    }

    /// Map a (time, lane) pair to diagram coordinates.
    pub fn orientation_point(&self, time: f64, lane: f64) -> Point {
        to_point(self.orientation, time, lane)
    }

    pub fn commit(&self, id: &CommitId) -> Result<&CommitPositionOffset, LayoutError> {
        self.commits
            .get(id)
            .ok_or_else(|| LayoutError::MissingCommit(id.clone()))
    }

    pub fn branch(&self, name: &BranchName) -> Result<&BranchPosition, LayoutError> {
        self.branches
            .get(name)
            .ok_or_else(|| LayoutError::MissingBranch(name.clone()))
    }
}

/// Compute branch lanes and commit coordinates for a snapshot.
pub fn calculate(
    store: &GraphStore,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> Result<Positions, LayoutError> {
    let orientation = store.orientation();
    let commits = store.commits();

    let branches: BTreeMap<BranchName, BranchPosition> = ordered_branches(store, &commits)
        .into_iter()
        .enumerate()
        .map(|(index, branch)| {
            let position = BranchPosition {
                pos: index as f64 * config.lane_pitch(),
                index,
            };
            (branch.name.clone(), position)
        })
        .collect();

    let ranks = if orientation == Orientation::BT && config.parallel_commits {
        pack_ranks(store, &commits, &branches, config)?
    } else {
        commits.iter().map(|c| c.id.clone()).zip(0..).collect()
    };
    let max_rank = ranks.values().copied().max().unwrap_or(0);

    let mut placed = BTreeMap::new();
    for commit in &commits {
        let lane = branches
            .get(&commit.branch)
            .ok_or_else(|| LayoutError::MissingBranch(commit.branch.clone()))?
            .pos;
        let rank = ranks
            .get(&commit.id)
            .copied()
            .ok_or_else(|| LayoutError::MissingCommit(commit.id.clone()))?;

        let time = time_coordinate(orientation, rank, max_rank, config);
        let point = to_point(orientation, time, lane);
        let label = label_box(commit, point, orientation, config, measurer);
        let pos_with_offset = match (&label, orientation.is_vertical()) {
            (Some(label), false) => label.center.y,
            (Some(label), true) => label.center.x,
            (None, _) => lane,
        };

        placed.insert(
            commit.id.clone(),
            CommitPositionOffset {
                x: point.x,
                y: point.y,
                pos_with_offset,
                rank,
                symbol: CommitSymbol::for_kind(commit.display_kind()),
                label,
            },
        );
    }

    Ok(Positions {
        orientation,
        branches,
        commits: placed,
        max_rank,
    })
}

fn ordered_branches<'a>(store: &'a GraphStore, commits: &[&Commit]) -> Vec<&'a Branch> {
    let mut first_seq: HashMap<&BranchName, u64> = HashMap::new();
    for commit in commits {
        first_seq.entry(&commit.branch).or_insert(commit.seq);
    }

    let mut branches = store.branches();
    branches.sort_by_key(|b| match (b.order, first_seq.get(&b.name)) {
        (Some(order), _) => (0u8, order, 0u64, b.created),
        (None, Some(&seq)) => (1, 0, seq, b.created),
        (None, None) => (2, 0, 0, b.created),
    });
    branches
}

/// Assign shared ranks to runs of parallel commits (bottom-to-top only).
///
/// A commit joins the current group when its seq directly follows the
/// previous commit's, its lane is not used in the group, it is independent
/// of every group member, all of its parents sit on earlier ranks, and no
/// commit already sits on its lane between a parent and the group's rank.
/// Its parent chords must also keep `min_clearance` from every placed
/// commit, and it must keep that clearance from the chords already ending
/// in the group. Otherwise it opens a new group on the next rank.
fn pack_ranks(
    store: &GraphStore,
    commits: &[&Commit],
    lanes: &BTreeMap<BranchName, BranchPosition>,
    config: &LayoutConfig,
) -> Result<HashMap<CommitId, usize>, LayoutError> {
    let graph = CommitGraph::from_store(store);
    let lane_of = |commit: &Commit| {
        lanes
            .get(&commit.branch)
            .copied()
            .ok_or_else(|| LayoutError::MissingBranch(commit.branch.clone()))
    };
    // Distances do not depend on the final BT flip, so ranks map straight to time.
    let point_at = |rank: usize, lane: &BranchPosition| {
        Point::new(rank as f64 * config.commit_spacing, lane.pos)
    };

    let mut ranks: HashMap<CommitId, usize> = HashMap::new();
    let mut points: Vec<(CommitId, Point)> = Vec::new();
    let mut lane_ranks: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut group: Vec<(&Commit, usize)> = Vec::new();
    // Parent-to-child segments ending in the current group.
    let mut group_chords: Vec<(Point, Point)> = Vec::new();
    let mut group_rank = 0usize;

    for &commit in commits {
        let lane = lane_of(commit)?;

        let joins = match group.last() {
            Some((last, _)) => {
                let point = point_at(group_rank, &lane);
                commit.seq == last.seq + 1
                    && group.iter().all(|&(member, member_lane)| {
                        member_lane != lane.index && graph.independent(&member.id, &commit.id)
                    })
                    && parents_settled(commit, &ranks, lane_ranks.get(&lane.index), group_rank)
                    && chords_clear(commit, point, &points, &group_chords, config.min_clearance)
            }
            None => false,
        };

        if !joins {
            if !group.is_empty() {
                group_rank += 1;
            }
            group.clear();
            group_chords.clear();
        }

        let point = point_at(group_rank, &lane);
        for parent in &commit.parents {
            if let Some((_, start)) = points.iter().find(|(id, _)| id == parent) {
                group_chords.push((*start, point));
            }
        }

        ranks.insert(commit.id.clone(), group_rank);
        points.push((commit.id.clone(), point));
        lane_ranks.entry(lane.index).or_default().push(group_rank);
        group.push((commit, lane.index));
    }

    Ok(ranks)
}

fn parents_settled(
    commit: &Commit,
    ranks: &HashMap<CommitId, usize>,
    lane_ranks: Option<&Vec<usize>>,
    group_rank: usize,
) -> bool {
    commit.parents.iter().all(|parent| match ranks.get(parent) {
        Some(&parent_rank) if parent_rank < group_rank => lane_ranks
            .map(|used| !used.iter().any(|&r| r > parent_rank && r <= group_rank))
            .unwrap_or(true),
        _ => false,
    })
}

/// True when putting `commit` at `point` leaves every chord clear of
/// every commit other than its own endpoints.
fn chords_clear(
    commit: &Commit,
    point: Point,
    placed: &[(CommitId, Point)],
    group_chords: &[(Point, Point)],
    min_clearance: f64,
) -> bool {
    let own = commit.parents.iter().all(|parent| {
        let Some((_, start)) = placed.iter().find(|(id, _)| id == parent) else {
            return false;
        };
        placed
            .iter()
            .filter(|(id, _)| id != parent)
            .all(|(_, other)| distance_to_segment(*other, *start, point) >= min_clearance)
    });

    own && group_chords
        .iter()
        .all(|&(start, end)| distance_to_segment(point, start, end) >= min_clearance)
}

fn time_coordinate(
    orientation: Orientation,
    rank: usize,
    max_rank: usize,
    config: &LayoutConfig,
) -> f64 {
    let steps = match orientation {
        Orientation::BT => max_rank.saturating_sub(rank),
        Orientation::LR | Orientation::TB => rank,
    };
    config.layout_offset + steps as f64 * config.commit_spacing
}

fn to_point(orientation: Orientation, time: f64, lane: f64) -> Point {
    if orientation.is_vertical() {
        Point::new(lane, time)
    } else {
        Point::new(time, lane)
    }
}

/// Labels sit below the marker in LR and left of it in TB/BT.
fn label_box(
    commit: &Commit,
    point: Point,
    orientation: Orientation,
    config: &LayoutConfig,
    measurer: &dyn TextMeasurer,
) -> Option<LabelBox> {
    if !config.show_commit_label {
        return None;
    }

    let size = measurer.measure(commit.display_label(), &config.font);
    let mut label = LabelBox {
        center: point,
        width: size.width,
        height: size.height,
        rotated: config.rotate_commit_label,
    };
    let (half_width, half_height) = label.half_extents();
    let reach = config.commit_radius + LABEL_GAP;

    label.center = if orientation.is_vertical() {
        Point::new(point.x - reach - half_width, point.y)
    } else {
        Point::new(point.x, point.y + reach + half_height)
    };
    Some(label)
}

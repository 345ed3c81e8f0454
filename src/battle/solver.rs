//! Match resolution: group detection, clearing, gravity and refill.

use serde::Serialize;

use super::grid::{Grid, GridPos, SphereType, DIRECTIONS, GRID_H, GRID_W, SPHERE_TYPES};
use super::rng::{pick, RandomSource};

/// Smallest connected group that counts as a match.
pub const MIN_MATCH: usize = 3;

/// A 4-connected component of same-typed cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub sphere: Option<SphereType>,
    pub cells: Vec<GridPos>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_match(&self) -> bool {
        self.sphere.is_some() && self.cells.len() >= MIN_MATCH
    }
}

/// One cell rewritten by collapse + refill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CellChange {
    pub y: usize,
    pub old: Option<SphereType>,
    pub new: SphereType,
}

/// Rewritten cells of one column, top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRefill {
    pub x: usize,
    pub changes: Vec<CellChange>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Cleared cell count per type, indexed by [`SphereType::index`].
    pub cleared_by_type: [u32; 5],
    /// Matched groups, captured before clearing.
    pub groups: Vec<Group>,
    pub refills: Vec<ColumnRefill>,
}

impl Resolution {
    pub fn total_cleared(&self) -> u32 {
        self.cleared_by_type.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_cleared() == 0
    }

    /// Matched cells of one type across every group.
    pub fn cells_of(&self, sphere: SphereType) -> Vec<GridPos> {
        self.groups
            .iter()
            .filter(|g| g.sphere == Some(sphere))
            .flat_map(|g| g.cells.iter().copied())
            .collect()
    }
}

// ── Group detection ─────────────────────────────────────────

/// Partition the grid into 4-connected same-type components, scanning
/// cells in storage order. Each component lists its seed cell first.
pub fn find_groups(grid: &Grid) -> Vec<Group> {
    let mut visited = vec![false; GRID_W * GRID_H];
    let mut groups = Vec::new();

    for cell in grid.cells() {
        if visited[cell.index()] {
            continue;
        }
        visited[cell.index()] = true;

        let mut members = vec![cell.pos];
        let mut stack = vec![cell.pos];
        while let Some(pos) = stack.pop() {
            for dir in DIRECTIONS {
                let Some(next) = pos.step(dir) else { continue };
                if visited[next.index()] || grid.at(next).map(|c| c.sphere) != Some(cell.sphere) {
                    continue;
                }
                visited[next.index()] = true;
                members.push(next);
                stack.push(next);
            }
        }

        groups.push(Group {
            sphere: cell.sphere,
            cells: members,
        });
    }

    groups
}

/// Components large enough to clear.
pub fn matched_groups(grid: &Grid) -> Vec<Group> {
    find_groups(grid).into_iter().filter(Group::is_match).collect()
}

/// Empty every cell belonging to `groups`; returns the count per type.
pub fn clear_matches(grid: &mut Grid, groups: &[Group]) -> [u32; 5] {
    let mut counts = [0u32; 5];
    for group in groups {
        let Some(sphere) = group.sphere else { continue };
        for pos in &group.cells {
            if grid.set(pos.x, pos.y, None) {
                counts[sphere.index()] += 1;
            }
        }
    }
    counts
}

// ── Gravity + refill ────────────────────────────────────────

/// Drop survivors to the bottom of each column and fill the vacated top
/// with random spheres. Columns without gaps are left untouched and not
/// reported. Draws happen top to bottom, columns left to right.
pub fn collapse_and_refill(grid: &mut Grid, rng: &mut dyn RandomSource) -> Vec<ColumnRefill> {
    let mut refills = Vec::new();

    for x in 0..GRID_W {
        let old = grid.column(x);
        let Some(last_gap) = old.iter().rposition(Option::is_none) else {
            continue;
        };

        let survivors: Vec<SphereType> = old.iter().flatten().copied().collect();
        let gaps = GRID_H - survivors.len();
        let mut new: Vec<SphereType> = Vec::with_capacity(GRID_H);
        for _ in 0..gaps {
            new.push(pick(rng, &SPHERE_TYPES).unwrap_or(SphereType::Red));
        }
        new.extend(survivors);

        let column: Vec<Option<SphereType>> = new.iter().copied().map(Some).collect();
        grid.set_column(x, &column);

        let changes = (0..=last_gap)
            .map(|y| CellChange {
                y,
                old: old[y],
                new: new[y],
            })
            .collect();
        refills.push(ColumnRefill { x, changes });
    }

    refills
}

/// Run one full match pass. With no matches the grid is left untouched
/// and an empty resolution is returned.
pub fn resolve(grid: &mut Grid, rng: &mut dyn RandomSource) -> Resolution {
    let groups = matched_groups(grid);
    if groups.is_empty() {
        return Resolution::default();
    }

    let cleared_by_type = clear_matches(grid, &groups);
    let refills = collapse_and_refill(grid, rng);

    Resolution {
        cleared_by_type,
        groups,
        refills,
    }
}

// Static collision footprints on the XZ plane.
//
// Every maze wall cell and every solid scene object becomes one axis-aligned
// square. The index is plain data: rebuilt from scratch when the maze or the
// object list changes, then swapped in by value.

use glam::Vec2;

use super::maze::MazeGrid;

// ============================================================================
// OBSTACLE
// ============================================================================

/// Axis-aligned square footprint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// World XZ center (`y` holds world Z).
    pub center: Vec2,
    pub half_extent: f32,
}

/// How far a circle sinks into an obstacle, and which way pushes it out.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Penetration {
    /// Overlap along the shallower axis.
    pub depth: f32,
    /// Unit axis (±X or ±Z) pointing from the obstacle toward the circle.
    pub normal: Vec2,
}

impl Obstacle {
    pub fn new(center: Vec2, half_extent: f32) -> Self {
        Self { center, half_extent }
    }

    /// Circle-vs-square overlap test.
    ///
    /// Treats the circle as its bounding square: a hit needs positive overlap
    /// `half_extent + radius - |d|` on both axes. Near the square's corners
    /// this blocks earlier than an exact distance test would. Corridor
    /// movement is tuned around that.
    pub fn penetration(&self, pos: Vec2, radius: f32) -> Option<Penetration> {
        let reach = self.half_extent + radius;
        let d = pos - self.center;

        // Broad phase: anything clearly out of reach is skipped before the
        // per-axis work.
        if d.length() > reach * 1.5 {
            return None;
        }

        let overlap_x = reach - d.x.abs();
        let overlap_z = reach - d.y.abs();
        if overlap_x <= 0.0 || overlap_z <= 0.0 {
            return None;
        }

        let penetration = if overlap_x < overlap_z {
            Penetration {
                depth: overlap_x,
                normal: Vec2::new(if pos.x < self.center.x { -1.0 } else { 1.0 }, 0.0),
            }
        } else {
            Penetration {
                depth: overlap_z,
                normal: Vec2::new(0.0, if pos.y < self.center.y { -1.0 } else { 1.0 }),
            }
        };
        Some(penetration)
    }
}

// ============================================================================
// OBSTACLE INDEX
// ============================================================================

/// Flat list of every obstacle the agent collides with.
///
/// An empty index is valid: nothing ever blocks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstacleIndex {
    obstacles: Vec<Obstacle>,
}

impl ObstacleIndex {
    /// One obstacle per wall cell (half extent `cell_scale / 2`), then one per
    /// entry of `extra_objects`. The caller drops non-solid objects beforehand.
    pub fn build(maze: &MazeGrid, cell_scale: f32, extra_objects: &[(Vec2, f32)]) -> Self {
        let half = cell_scale * 0.5;
        let mut obstacles: Vec<Obstacle> = maze
            .wall_cells()
            .map(|(x, y)| Obstacle::new(maze.cell_world_position(x, y, cell_scale), half))
            .collect();
        obstacles.extend(extra_objects.iter().map(|&(center, he)| Obstacle::new(center, he)));

        log::debug!(
            "obstacle index: {} walls + {} objects",
            obstacles.len() - extra_objects.len(),
            extra_objects.len()
        );
        Self { obstacles }
    }

    #[cfg(test)]
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// True if a circle at `pos` overlaps any obstacle.
    pub fn collides(&self, pos: Vec2, radius: f32) -> bool {
        self.obstacles.iter().any(|o| o.penetration(pos, radius).is_some())
    }

    /// The overlap with the greatest depth at `pos`, if any.
    pub fn deepest_penetration(&self, pos: Vec2, radius: f32) -> Option<Penetration> {
        self.obstacles
            .iter()
            .filter_map(|o| o.penetration(pos, radius))
            .max_by(|a, b| a.depth.total_cmp(&b.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::maze;
    use approx::assert_relative_eq;

    #[test]
    fn walls_become_obstacles() {
        let grid = maze::generate(11, 9, 2).unwrap();
        let extra = [(Vec2::new(9.5, 4.5), 0.5), (Vec2::new(9.5, 6.5), 0.25)];
        let index = ObstacleIndex::build(&grid, 1.0, &extra);

        assert_eq!(index.len(), grid.wall_count() + 2);
        assert!(index.obstacles()[..grid.wall_count()].iter().all(|o| o.half_extent == 0.5));
        assert_eq!(index.obstacles()[0].center, Vec2::new(-5.5, -4.5));
        assert_eq!(index.obstacles().last(), Some(&Obstacle::new(Vec2::new(9.5, 6.5), 0.25)));
    }

    #[test]
    fn cell_scale_sets_half_extent() {
        let grid = maze::generate(5, 5, 0).unwrap();
        let index = ObstacleIndex::build(&grid, 3.0, &[]);
        assert!(index.obstacles().iter().all(|o| o.half_extent == 1.5));
    }

    #[test]
    fn overlap_needs_both_axes() {
        let wall = Obstacle::new(Vec2::new(1.0, 0.0), 0.5);
        assert!(wall.penetration(Vec2::new(0.25, 0.0), 0.3).is_some());
        assert!(wall.penetration(Vec2::new(0.2, 0.0), 0.3).is_none());
        assert!(wall.penetration(Vec2::new(1.0, 0.85), 0.3).is_none());
    }

    #[test]
    fn corner_uses_square_approximation() {
        // Exact circle-vs-square distance here is ~0.212 > 0.2 (no hit), the
        // square approximation still reports overlap.
        let wall = Obstacle::new(Vec2::ZERO, 0.5);
        let p = Vec2::splat(0.5 + 0.15);
        assert!(wall.penetration(p, 0.2).is_some());
    }

    #[test]
    fn normal_points_out_of_the_shallow_side() {
        let wall = Obstacle::new(Vec2::new(1.0, 0.0), 0.5);
        let pen = wall.penetration(Vec2::new(0.3, 0.1), 0.3).unwrap();
        assert_relative_eq!(pen.depth, 0.1, epsilon = 1e-6);
        assert_eq!(pen.normal, Vec2::new(-1.0, 0.0));

        let pen = wall.penetration(Vec2::new(0.9, 0.7), 0.3).unwrap();
        assert_eq!(pen.normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn deepest_wins() {
        let index = ObstacleIndex::from_obstacles(vec![
            Obstacle::new(Vec2::new(0.7, 0.0), 0.5),
            Obstacle::new(Vec2::new(-0.6, 0.0), 0.5),
        ]);
        let pen = index.deepest_penetration(Vec2::ZERO, 0.3).unwrap();
        assert_eq!(pen.normal, Vec2::new(1.0, 0.0));
        assert!(index.deepest_penetration(Vec2::new(0.0, 5.0), 0.3).is_none());
    }

    #[test]
    fn empty_index_never_collides() {
        let index = ObstacleIndex::default();
        assert!(index.is_empty());
        assert!(!index.collides(Vec2::ZERO, 10.0));
    }
}

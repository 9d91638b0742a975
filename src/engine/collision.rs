// Agent-vs-obstacle movement resolution on the XZ plane.
//
// Per frame:
//   1. Try the full displacement.
//   2. If blocked, probe X-only and Z-only moves.
//   3. If either probe is clear, slide along the deepest obstacle's surface.
//   4. Otherwise stay put. A blocked frame is not an error.
//
// An agent that already overlaps something (a wall regenerated on top of it)
// is not held by what it overlaps: it may move anywhere that does not touch
// a new obstacle, until it is clear again.
//
// The agent's height is pinned to eye level; there is no vertical physics.

use glam::{Vec2, Vec3};

use super::obstacles::ObstacleIndex;

/// The player's collision body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Agent {
    pub position: Vec3,
    pub radius: f32,
    /// World Y the agent is always held at.
    pub eye_height: f32,
}

impl Agent {
    pub fn new(position: Vec3, radius: f32, eye_height: f32) -> Self {
        Self {
            position: Vec3::new(position.x, eye_height, position.z),
            radius,
            eye_height,
        }
    }

    /// Position on the XZ plane (`y` holds world Z).
    #[inline]
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }
}

/// Corrected position for `agent` after trying to move by `desired_delta` (XZ).
///
/// Pure: reads only the agent, the delta and the index. Starting from a clear
/// position, the result is always either clear of every obstacle or the
/// agent's current XZ position.
pub fn resolve(index: &ObstacleIndex, agent: &Agent, desired_delta: Vec2) -> Vec3 {
    let current = agent.planar();
    let at_eye = |p: Vec2| Vec3::new(p.x, agent.eye_height, p.y);

    if desired_delta == Vec2::ZERO {
        return at_eye(current);
    }

    let r = agent.radius;
    let candidate = current + desired_delta;
    if index.is_empty() {
        return at_eye(candidate);
    }

    if index.collides(current, r) {
        return at_eye(escape(index, current, candidate, r));
    }

    let Some(hit) = index.deepest_penetration(candidate, r) else {
        return at_eye(candidate);
    };

    let x_clear = !index.collides(current + Vec2::new(desired_delta.x, 0.0), r);
    let z_clear = !index.collides(current + Vec2::new(0.0, desired_delta.y), r);
    if !x_clear && !z_clear {
        return at_eye(current);
    }

    // Drop the component pushing into the surface, keep the tangential part.
    let slide = desired_delta - hit.normal * desired_delta.dot(hit.normal);
    let slid = current + slide;
    if slide != Vec2::ZERO && !index.collides(slid, r) {
        at_eye(slid)
    } else {
        at_eye(current)
    }
}

/// Move for an agent that starts embedded: only obstacles it does not
/// already overlap can block.
fn escape(index: &ObstacleIndex, current: Vec2, candidate: Vec2, r: f32) -> Vec2 {
    let blocked = index.obstacles().iter().any(|o| {
        o.penetration(candidate, r).is_some() && o.penetration(current, r).is_none()
    });
    if blocked { current } else { candidate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::maze;
    use crate::engine::obstacles::Obstacle;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const EYE: f32 = 1.62;

    fn agent_at(x: f32, z: f32) -> Agent {
        Agent::new(Vec3::new(x, 0.0, z), 0.3, EYE)
    }

    fn single_wall() -> ObstacleIndex {
        ObstacleIndex::from_obstacles(vec![Obstacle::new(Vec2::new(1.0, 0.0), 0.5)])
    }

    #[test]
    fn zero_delta_keeps_position() {
        let agent = agent_at(0.4, -2.0);
        assert_eq!(resolve(&single_wall(), &agent, Vec2::ZERO), agent.position);
    }

    #[test]
    fn free_move_is_accepted() {
        let agent = agent_at(0.0, 0.0);
        let p = resolve(&single_wall(), &agent, Vec2::new(-1.0, 0.5));
        assert_eq!(p, Vec3::new(-1.0, EYE, 0.5));
    }

    #[test]
    fn head_on_into_wall_is_blocked() {
        let agent = agent_at(0.0, 0.0);
        let p = resolve(&single_wall(), &agent, Vec2::new(1.0, 0.0));
        assert!(p.x <= 0.2);
        assert_eq!(p, Vec3::new(0.0, EYE, 0.0));
    }

    #[test]
    fn diagonal_into_wall_slides_along_it() {
        let agent = agent_at(0.1, 0.0);
        let p = resolve(&single_wall(), &agent, Vec2::new(0.2, 0.2));
        assert_relative_eq!(p.x, 0.1);
        assert_relative_eq!(p.z, 0.2);
        assert_relative_eq!(p.y, EYE);
    }

    #[test]
    fn corner_pocket_does_not_move() {
        let index = ObstacleIndex::from_obstacles(vec![
            Obstacle::new(Vec2::new(1.0, 0.0), 0.5),
            Obstacle::new(Vec2::new(0.0, 1.0), 0.5),
        ]);
        let agent = agent_at(0.15, 0.15);
        let p = resolve(&index, &agent, Vec2::new(0.2, 0.2));
        assert_eq!(p, Vec3::new(0.15, EYE, 0.15));
    }

    #[test]
    fn empty_index_never_blocks() {
        let agent = agent_at(3.0, 3.0);
        let p = resolve(&ObstacleIndex::default(), &agent, Vec2::new(-10.0, 4.0));
        assert_eq!(p, Vec3::new(-7.0, EYE, 7.0));
    }

    #[test]
    fn height_is_pinned_to_eye_level() {
        let mut agent = agent_at(-3.0, 0.0);
        agent.position.y = 20.0;
        let p = resolve(&single_wall(), &agent, Vec2::new(0.1, 0.0));
        assert_eq!(p.y, EYE);
    }

    #[test]
    fn embedded_agent_can_walk_out() {
        let index = ObstacleIndex::from_obstacles(vec![
            Obstacle::new(Vec2::new(0.0, 0.0), 0.5),
            Obstacle::new(Vec2::new(2.0, 0.0), 0.5),
        ]);
        let mut agent = agent_at(0.1, 0.0);
        assert!(index.collides(agent.planar(), agent.radius));

        // Into a wall it is not touching yet: blocked.
        let p = resolve(&index, &agent, Vec2::new(1.3, 0.0));
        assert_eq!(p, Vec3::new(0.1, EYE, 0.0));

        // Away from everything: moves, and keeps moving until clear.
        for _ in 0..30 {
            agent.position = resolve(&index, &agent, Vec2::new(-0.04, 0.0));
        }
        assert_relative_eq!(agent.position.x, -1.1, epsilon = 1e-4);
        assert!(!index.collides(agent.planar(), agent.radius));
    }

    #[test]
    fn walking_a_maze_corridor_stays_clear() {
        let grid = maze::generate(19, 19, 42).unwrap();
        let index = ObstacleIndex::build(&grid, 1.0, &[]);
        let (sx, sy) = grid.start();
        let start = grid.cell_world_position(sx, sy, 1.0);
        let mut agent = agent_at(start.x, start.y);

        for step in 0..400 {
            let angle = step as f32 * 0.37;
            let delta = Vec2::new(angle.cos(), angle.sin()) * 0.05;
            agent.position = resolve(&index, &agent, delta);
            assert!(!index.collides(agent.planar(), agent.radius));
        }
    }

    proptest! {
        #[test]
        fn never_ends_inside_an_obstacle(
            walls in prop::collection::vec((-3.0f32..3.0, -3.0f32..3.0, 0.1f32..0.8), 0..8),
            dx in -1.0f32..1.0,
            dz in -1.0f32..1.0,
        ) {
            let index = ObstacleIndex::from_obstacles(
                walls.iter().map(|&(x, z, he)| Obstacle::new(Vec2::new(x, z), he)).collect(),
            );
            let agent = agent_at(0.0, 0.0);
            prop_assume!(!index.collides(agent.planar(), agent.radius));

            let p = resolve(&index, &agent, Vec2::new(dx, dz));
            prop_assert!(!index.collides(Vec2::new(p.x, p.z), agent.radius));
            prop_assert_eq!(p.y, EYE);
        }
    }
}

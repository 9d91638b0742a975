// Perfect-maze generation on an odd-sized cell grid.
//
// Odd (x, y) cells are "rooms", the cells between two rooms are "corridors".
// Carving is a randomized depth-first search driven by an explicit stack,
// so large mazes never recurse. The carved passages form a spanning tree
// over the rooms: exactly one simple path between any two passage cells.

use glam::{Mat4, Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fmt;

use super::error::WorldError;

/// Smallest maze side that still contains a carvable room lattice.
pub const MIN_MAZE_SIZE: u32 = 5;

/// Neighbour offsets in carving order before shuffling: up, right, down, left.
const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

// ============================================================================
// CELLS
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Passage,
    /// Interior cell next to the entrance opening.
    Start,
    /// Interior cell next to the exit opening.
    End,
}

impl Cell {
    /// Anything that is not a wall can be walked on.
    #[cfg(test)]
    pub fn is_open(self) -> bool {
        self != Cell::Wall
    }

    fn glyph(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Passage => '.',
            Cell::Start => 's',
            Cell::End => 'e',
        }
    }
}

// ============================================================================
// MAZE GRID
// ============================================================================

/// Row-major `width x height` grid of cells, indexed by `y * width + x`.
///
/// Read-only once generated. Regeneration builds a new grid and the owner
/// swaps it in wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    cells: Vec<Cell>,
    width: u32,
    height: u32,
    seed: u64,
}

impl MazeGrid {
    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    /// Seed this grid was carved with.
    pub fn seed(&self) -> u64 { self.seed }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Cell at `(x, y)`. Out-of-range coordinates are clamped to the border.
    #[cfg(test)]
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        let cx = x.clamp(0, self.width as i32 - 1) as u32;
        let cy = y.clamp(0, self.height as i32 - 1) as u32;
        self.cells[self.idx(cx, cy)]
    }

    /// Border opening on the left edge.
    pub fn entrance(&self) -> (u32, u32) {
        (0, 1)
    }

    /// Border opening on the right edge, diagonally opposite the entrance.
    pub fn exit(&self) -> (u32, u32) {
        (self.width - 1, self.height - 2)
    }

    pub fn start(&self) -> (u32, u32) {
        (1, 1)
    }

    pub fn end(&self) -> (u32, u32) {
        (self.width - 2, self.height - 2)
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Wall).count()
    }

    /// Coordinates of every walkable cell, in row-major order.
    #[cfg(test)]
    pub fn passage_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.cells[self.idx(x, y)].is_open())
    }

    /// Coordinates of every wall cell, in row-major order.
    pub fn wall_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.cells[self.idx(x, y)] == Cell::Wall)
    }

    /// World-space XZ position of a cell. The grid is shifted by half its size
    /// so the maze sits around the world origin.
    pub fn cell_world_position(&self, x: u32, y: u32, cell_scale: f32) -> Vec2 {
        Vec2::new(
            (x as f32 - self.width as f32 / 2.0) * cell_scale,
            (y as f32 - self.height as f32 / 2.0) * cell_scale,
        )
    }

    /// One model transform per wall cube, for the renderer.
    pub fn wall_transforms(&self, cell_scale: f32, elevation: f32) -> Vec<Mat4> {
        self.wall_cells()
            .map(|(x, y)| {
                let p = self.cell_world_position(x, y, cell_scale);
                Mat4::from_scale_rotation_translation(
                    Vec3::splat(cell_scale),
                    glam::Quat::IDENTITY,
                    Vec3::new(p.x, elevation, p.y),
                )
            })
            .collect()
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            let line: String = row.iter().map(|c| c.glyph()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Fresh seed from the OS-seeded thread RNG, for "give me a new maze".
pub fn entropy_seed() -> u64 {
    use rand::RngCore;
    rand::thread_rng().next_u64()
}

/// Carve a perfect maze of `width x height` cells.
///
/// Both sides must be odd and at least [`MIN_MAZE_SIZE`]. The same seed always
/// produces the same grid.
pub fn generate(width: u32, height: u32, seed: u64) -> Result<MazeGrid, WorldError> {
    if width < MIN_MAZE_SIZE || height < MIN_MAZE_SIZE || width % 2 == 0 || height % 2 == 0 {
        return Err(WorldError::InvalidDimensions { width, height });
    }

    let mut grid = MazeGrid {
        cells: vec![Cell::Wall; width as usize * height as usize],
        width,
        height,
        seed,
    };
    let mut rng = StdRng::seed_from_u64(seed);

    let (sx, sy) = grid.start();
    let start_idx = grid.idx(sx, sy);
    grid.cells[start_idx] = Cell::Passage;
    let mut stack: Vec<(u32, u32)> = vec![(sx, sy)];

    let (wi, hi) = (width as i32, height as i32);
    while let Some(&(cx, cy)) = stack.last() {
        let mut dirs = DIRECTIONS;
        dirs.shuffle(&mut rng);

        // First shuffled room two steps away that is strictly inside the
        // border and still uncarved.
        let next = dirs.iter().find_map(|&(dx, dy)| {
            let nx = cx as i32 + dx * 2;
            let ny = cy as i32 + dy * 2;
            let inside = nx >= 1 && nx < wi - 1 && ny >= 1 && ny < hi - 1;
            if inside && grid.cells[grid.idx(nx as u32, ny as u32)] == Cell::Wall {
                Some((dx, dy, nx as u32, ny as u32))
            } else {
                None
            }
        });

        match next {
            Some((dx, dy, nx, ny)) => {
                let corridor = grid.idx((cx as i32 + dx) as u32, (cy as i32 + dy) as u32);
                let room = grid.idx(nx, ny);
                grid.cells[corridor] = Cell::Passage;
                grid.cells[room] = Cell::Passage;
                stack.push((nx, ny));
            }
            None => {
                stack.pop();
            }
        }
    }

    // Openings on the border, each a leaf hanging off an interior room.
    let (ex, ey) = grid.entrance();
    let (xx, xy) = grid.exit();
    let (ux, uy) = grid.start();
    let (vx, vy) = grid.end();
    let entrance = grid.idx(ex, ey);
    let exit = grid.idx(xx, xy);
    let start = grid.idx(ux, uy);
    let end = grid.idx(vx, vy);
    grid.cells[entrance] = Cell::Passage;
    grid.cells[exit] = Cell::Passage;
    grid.cells[start] = Cell::Start;
    grid.cells[end] = Cell::End;

    log::debug!("carved {width}x{height} maze (seed {seed}):\n{grid}");
    Ok(grid)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    /// Connected and `edges == nodes - 1` over open cells, i.e. a tree.
    fn is_perfect(grid: &MazeGrid) -> bool {
        let open: Vec<(u32, u32)> = grid.passage_cells().collect();
        let is_open = |x: i32, y: i32| {
            x >= 0 && y >= 0 && x < grid.width() as i32 && y < grid.height() as i32
                && grid.cell(x, y).is_open()
        };

        let mut edges = 0;
        for &(x, y) in &open {
            if is_open(x as i32 + 1, y as i32) { edges += 1; }
            if is_open(x as i32, y as i32 + 1) { edges += 1; }
        }
        if edges + 1 != open.len() {
            return false;
        }

        let mut seen = vec![false; (grid.width() * grid.height()) as usize];
        let mut queue = VecDeque::from([open[0]]);
        seen[grid.idx(open[0].0, open[0].1)] = true;
        let mut reached = 1;
        while let Some((x, y)) = queue.pop_front() {
            for (dx, dy) in DIRECTIONS {
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                if is_open(nx, ny) {
                    let i = grid.idx(nx as u32, ny as u32);
                    if !seen[i] {
                        seen[i] = true;
                        reached += 1;
                        queue.push_back((nx as u32, ny as u32));
                    }
                }
            }
        }
        reached == open.len()
    }

    fn border_openings(grid: &MazeGrid) -> Vec<(u32, u32)> {
        let (w, h) = (grid.width(), grid.height());
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| x == 0 || y == 0 || x == w - 1 || y == h - 1)
            .filter(|&(x, y)| grid.cell(x as i32, y as i32).is_open())
            .collect()
    }

    #[test]
    fn rejects_even_or_small_dimensions() {
        for (w, h) in [(4, 7), (7, 4), (3, 9), (9, 3), (10, 11), (1, 1)] {
            assert_eq!(
                generate(w, h, 0),
                Err(WorldError::InvalidDimensions { width: w, height: h })
            );
        }
    }

    #[test]
    fn nineteen_square_seed_42() {
        let grid = generate(19, 19, 42).unwrap();
        assert_eq!(grid.entrance(), (0, 1));
        assert_eq!(grid.exit(), (18, 17));
        assert_eq!(grid.cell(0, 1), Cell::Passage);
        assert_eq!(grid.cell(18, 17), Cell::Passage);
        assert_eq!(grid.cell(1, 1), Cell::Start);
        assert_eq!(grid.cell(17, 17), Cell::End);
        assert_eq!(grid, generate(19, 19, 42).unwrap());
        assert!(is_perfect(&grid));
    }

    #[test]
    fn every_room_is_carved() {
        let grid = generate(21, 15, 7).unwrap();
        for y in (1..grid.height()).step_by(2) {
            for x in (1..grid.width()).step_by(2) {
                assert!(grid.cell(x as i32, y as i32).is_open(), "room ({x},{y}) left as wall");
            }
        }
    }

    #[test]
    fn smallest_maze_is_valid() {
        let grid = generate(5, 5, 1).unwrap();
        assert!(is_perfect(&grid));
        assert_eq!(border_openings(&grid), vec![(0, 1), (4, 3)]);
    }

    #[test]
    fn clamped_reads_hit_the_border() {
        let grid = generate(9, 9, 3).unwrap();
        assert_eq!(grid.cell(-5, 1), grid.cell(0, 1));
        assert_eq!(grid.cell(100, 100), grid.cell(8, 8));
    }

    #[test]
    fn display_marks_start_and_end() {
        let grid = generate(7, 7, 11).unwrap();
        let text = grid.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with(".s"));
        assert!(lines[5].ends_with("e."));
        assert_eq!(text.matches('#').count(), grid.wall_count());
    }

    #[test]
    fn wall_transforms_match_wall_cells() {
        let grid = generate(9, 7, 5).unwrap();
        let transforms = grid.wall_transforms(2.0, 0.5);
        assert_eq!(transforms.len(), grid.wall_count());

        let corner = transforms[0].transform_point3(Vec3::ZERO);
        assert_eq!(corner, Vec3::new(-9.0, 0.5, -7.0));
    }

    proptest! {
        #[test]
        fn generated_mazes_are_perfect(
            half_w in 2u32..20,
            half_h in 2u32..20,
            seed in any::<u64>(),
        ) {
            let (w, h) = (half_w * 2 + 1, half_h * 2 + 1);
            let grid = generate(w, h, seed).unwrap();
            prop_assert!(is_perfect(&grid));
            prop_assert_eq!(border_openings(&grid), vec![(0, 1), (w - 1, h - 2)]);
            prop_assert_eq!(&grid, &generate(w, h, seed).unwrap());
        }
    }
}

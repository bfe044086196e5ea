//! Bresenham ray traversal over grid cells.
//!
//! Inserters walk every cell between a ray origin and its endpoint:
//!
//! ```text
//! From (0,0) to (7,3):
//!
//!     3 │              ●
//!     2 │         ● ●
//!     1 │   ● ● ●
//!     0 ● ●
//!       └──────────────────
//!        0 1 2 3 4 5 6 7
//! ```
//!
//! Integer arithmetic only, so the same ray always covers the same cells
//! and consecutive cells are 8-connected.

use crate::core::{GridCoord, WorldPoint};

use super::limits::MapLimits;

/// Iterator over the cells of a line, both ends included.
#[derive(Clone, Debug)]
pub struct BresenhamLine {
    current: GridCoord,
    end: GridCoord,
    dx: i32,
    dy: i32,
    step_x: i32,
    step_y: i32,
    error: i32,
    done: bool,
}

impl BresenhamLine {
    /// Line from `start` to `end`.
    pub fn new(start: GridCoord, end: GridCoord) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = -(end.y - start.y).abs();
        Self {
            current: start,
            end,
            dx,
            dy,
            step_x: if start.x < end.x { 1 } else { -1 },
            step_y: if start.y < end.y { 1 } else { -1 },
            error: dx + dy,
            done: false,
        }
    }

    /// Line between the cells containing two points of a grid.
    pub fn from_points(limits: &MapLimits, start: WorldPoint, end: WorldPoint) -> Self {
        Self::new(limits.cell_index(start), limits.cell_index(end))
    }

    /// Remaining cells, ignoring the endpoint.
    pub fn excluding_end(self) -> impl Iterator<Item = GridCoord> {
        let end = self.end;
        self.take_while(move |cell| *cell != end)
    }
}

impl Iterator for BresenhamLine {
    type Item = GridCoord;

    fn next(&mut self) -> Option<GridCoord> {
        if self.done {
            return None;
        }
        let cell = self.current;
        if cell == self.end {
            self.done = true;
            return Some(cell);
        }

        let doubled = 2 * self.error;
        if doubled >= self.dy {
            self.error += self.dy;
            self.current.x += self.step_x;
        }
        if doubled <= self.dx {
            self.error += self.dx;
            self.current.y += self.step_y;
        }
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = (self.end.x - self.current.x)
            .abs()
            .max((self.end.y - self.current.y).abs()) as usize
            + 1;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::limits::CellLimits;

    fn line(start: (i32, i32), end: (i32, i32)) -> Vec<GridCoord> {
        BresenhamLine::new(GridCoord::new(start.0, start.1), GridCoord::new(end.0, end.1))
            .collect()
    }

    #[test]
    fn test_horizontal_and_vertical() {
        let cells = line((0, 0), (5, 0));
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[5], GridCoord::new(5, 0));

        let cells = line((0, 0), (0, -4));
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[4], GridCoord::new(0, -4));
    }

    #[test]
    fn test_diagonal_reversed() {
        let cells = line((5, 5), (0, 0));
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], GridCoord::new(5, 5));
        assert_eq!(cells[3], GridCoord::new(2, 2));
    }

    #[test]
    fn test_steep_line_is_connected() {
        let cells = line((0, 0), (2, 7));
        assert_eq!(cells.first(), Some(&GridCoord::new(0, 0)));
        assert_eq!(cells.last(), Some(&GridCoord::new(2, 7)));
        for pair in cells.windows(2) {
            assert!((pair[1].x - pair[0].x).abs() <= 1);
            assert!((pair[1].y - pair[0].y).abs() <= 1);
        }
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn test_single_cell() {
        assert_eq!(line((3, 3), (3, 3)), vec![GridCoord::new(3, 3)]);
    }

    #[test]
    fn test_excluding_end() {
        let cells: Vec<_> = BresenhamLine::new(GridCoord::new(0, 0), GridCoord::new(5, 2))
            .excluding_end()
            .collect();
        assert_eq!(cells.len(), 5);
        assert!(!cells.contains(&GridCoord::new(5, 2)));
    }

    #[test]
    fn test_from_points() {
        let limits = MapLimits::new(0.1, WorldPoint::ZERO, CellLimits::new(10, 10));
        let cells: Vec<_> = BresenhamLine::from_points(
            &limits,
            WorldPoint::new(0.05, 0.05),
            WorldPoint::new(0.45, 0.05),
        )
        .collect();
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[4], GridCoord::new(4, 0));
    }
}

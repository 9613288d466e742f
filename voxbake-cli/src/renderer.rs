/// Top-down ASCII height map of an occupancy grid
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Vector3;
use std::io::Write;
use voxbake_core::OccupancyGrid;

/// Character luminosity ramp for height (lowest to highest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Renders the highest occupied `y` of every `(x, z)` column
pub struct HeightMapRenderer {
    size: usize,
    char_buffer: Vec<char>,
}

impl HeightMapRenderer {
    pub fn new(grid: &OccupancyGrid) -> Self {
        let size = grid.world_size();
        let mut char_buffer = vec![' '; size * size];

        for z in 0..size {
            for x in 0..size {
                let top = (0..size).rev().find(|&y| {
                    grid.is_occupied(Vector3::new(x as i64, y as i64, z as i64))
                });
                if let Some(y) = top {
                    char_buffer[z * size + x] = height_char(y, size);
                }
            }
        }

        Self { size, char_buffer }
    }

    pub fn char_at(&self, x: usize, z: usize) -> char {
        self.char_buffer[z * self.size + x]
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for z in 0..self.size {
            for x in 0..self.size {
                let c = self.char_at(x, z);

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        writer.flush()
    }
}

/// Occupied columns never map to the blank first ramp entry.
fn height_char(y: usize, size: usize) -> char {
    let levels = LUMINOSITY_RAMP.len() - 1;
    let index = if size <= 1 {
        levels
    } else {
        1 + y * (levels - 1) / (size - 1)
    };
    LUMINOSITY_RAMP[index.min(levels)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_char_range() {
        assert_eq!(height_char(0, 8), '.');
        assert_eq!(height_char(7, 8), '@');
        assert_eq!(height_char(0, 1), '@');
    }

    #[test]
    fn test_highest_voxel_wins() {
        let mut grid = OccupancyGrid::new(4).unwrap();
        grid.set(Vector3::new(1, 0, 2)).unwrap();
        grid.set(Vector3::new(1, 3, 2)).unwrap();
        grid.set(Vector3::new(2, 0, 0)).unwrap();

        let renderer = HeightMapRenderer::new(&grid);
        assert_eq!(renderer.char_at(1, 2), '@');
        assert_eq!(renderer.char_at(2, 0), '.');
        assert_eq!(renderer.char_at(0, 0), ' ');
    }

    #[test]
    fn test_draw_rows() {
        let mut grid = OccupancyGrid::new(2).unwrap();
        grid.set(Vector3::new(0, 1, 1)).unwrap();
        let mut out = Vec::new();
        HeightMapRenderer::new(&grid).draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('\n').count(), 2);
        assert!(text.contains('@'));
    }
}

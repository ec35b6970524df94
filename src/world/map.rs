//! Tile map and the ray query the renderer consumes.
//!
//! The renderer only ever sees [`RayCastMap`]; [`GridMap`] is the stock
//! implementation (square cells of one map unit, DDA traversal).

use std::str::FromStr;

use glam::{Vec2, vec2};
use thiserror::Error;

/// Nearest wall hit along one ray.
///
/// The distance/origin pairs are named after the axis the hit face runs
/// along. `side == false` selects `x_dist`/`x_map` (face parallel to the x
/// axis, texture runs along x); `side == true` selects `y_dist`/`y_map`.
/// Distances are perpendicular, i.e. measured in units of the (unnormalized)
/// ray direction, so `origin + dist * dir` is the hit point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub x_dist: f32,
    pub y_dist: f32,
    pub x_map: f32,
    pub y_map: f32,
    pub side: bool,
}

/// "Cast a ray, report the nearest hit." All the renderer needs from a map.
pub trait RayCastMap {
    fn cast_ray(&self, origin: Vec2, dir: Vec2) -> HitResult;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tile {
    #[default]
    Empty,
    /// Solid cell; the payload is the wall style from the map source.
    Wall(u8),
}

impl Tile {
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Wall(_))
    }
}

/// Errors that can be encountered while parsing an ASCII map.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,

    /// Every row must be as wide as the first one.
    #[error("line {line}: expected {expected} columns, found {found}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column {col}: unknown tile `{ch}`")]
    UnknownTile { ch: char, line: usize, col: usize },
}

/// Row-major grid of square cells. Row 0 of the text is `y = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
    player_start: Option<Vec2>,
    props: Vec<Vec2>,
}

impl GridMap {
    /// All-empty map of `width`×`height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Tile::Empty; width * height],
            player_start: None,
            props: Vec::new(),
        }
    }

    /// Empty room with a one-cell solid border.
    pub fn walled(width: usize, height: usize) -> Self {
        let mut map = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    map.set(x, y, Tile::Wall(1));
                }
            }
        }
        map
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        self.cells[y * self.width + x] = tile;
    }

    /// Tile at a cell; anything outside the grid reads as solid.
    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Tile::Wall(0);
        }
        self.cells[y as usize * self.width + x as usize]
    }

    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_solid()
    }

    /// True if the axis-aligned box centred on `(x, y)` overlaps a solid cell.
    pub fn collide(&self, x: f32, y: f32, half_w: f32, half_h: f32) -> bool {
        let x0 = (x - half_w).floor() as i32;
        let x1 = (x + half_w).floor() as i32;
        let y0 = (y - half_h).floor() as i32;
        let y1 = (y + half_h).floor() as i32;
        (y0..=y1).any(|cy| (x0..=x1).any(|cx| self.is_solid(cx, cy)))
    }

    /// Centre of the `@` cell, if the source had one.
    pub fn player_start(&self) -> Option<Vec2> {
        self.player_start
    }

    /// Centres of the `*` cells.
    pub fn props(&self) -> &[Vec2] {
        &self.props
    }
}

impl RayCastMap for GridMap {
    /// Classic grid DDA: step cell by cell along whichever gridline is
    /// crossed next until a solid cell is entered. The starting cell is
    /// never tested.
    fn cast_ray(&self, origin: Vec2, dir: Vec2) -> HitResult {
        let mut map_x = origin.x.floor() as i32;
        let mut map_y = origin.y.floor() as i32;

        let (step_x, delta_x, mut side_x) = axis_setup(origin.x, map_x, dir.x);
        let (step_y, delta_y, mut side_y) = axis_setup(origin.y, map_y, dir.y);

        // terminates: outside cells are solid and one coordinate moves
        // monotonically every iteration
        let crossed_vertical = loop {
            let vertical = side_x < side_y;
            if vertical {
                side_x += delta_x;
                map_x += step_x;
            } else {
                side_y += delta_y;
                map_y += step_y;
            }
            if self.is_solid(map_x, map_y) {
                break vertical;
            }
        };

        HitResult {
            // face along x ⇔ crossed a horizontal gridline
            x_dist: last_crossing(side_y, delta_y),
            y_dist: last_crossing(side_x, delta_x),
            x_map: map_x as f32,
            y_map: map_y as f32,
            side: crossed_vertical,
        }
    }
}

/// Step direction, per-cell ray distance and distance to the first
/// gridline for one axis.
#[inline]
fn axis_setup(origin: f32, cell: i32, dir: f32) -> (i32, f32, f32) {
    if dir == 0.0 || dir.is_nan() {
        return (1, f32::INFINITY, f32::INFINITY);
    }
    let delta = (1.0 / dir).abs();
    if dir < 0.0 {
        (-1, delta, (origin - cell as f32) * delta)
    } else {
        (1, delta, (cell as f32 + 1.0 - origin) * delta)
    }
}

#[inline]
fn last_crossing(side: f32, delta: f32) -> f32 {
    if delta.is_finite() {
        side - delta
    } else {
        f32::INFINITY
    }
}

impl FromStr for GridMap {
    type Err = MapError;

    /// `#` or `1`-`9` wall, `.` or space empty, `@` player start,
    /// `*` prop. Trailing blank lines are ignored.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<&str> = src.lines().map(|l| l.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|l| l.is_empty()) {
            rows.pop();
        }
        let Some(first) = rows.first() else {
            return Err(MapError::Empty);
        };

        let width = first.chars().count();
        if width == 0 {
            return Err(MapError::Empty);
        }
        let mut map = GridMap::new(width, rows.len());

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MapError::Ragged {
                    line: y + 1,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let centre = vec2(x as f32 + 0.5, y as f32 + 0.5);
                let tile = match ch {
                    '#' => Tile::Wall(1),
                    '1'..='9' => Tile::Wall(ch as u8 - b'0'),
                    '.' | ' ' => Tile::Empty,
                    '@' => {
                        map.player_start = Some(centre);
                        Tile::Empty
                    }
                    '*' => {
                        map.props.push(centre);
                        Tile::Empty
                    }
                    _ => {
                        return Err(MapError::UnknownTile {
                            ch,
                            line: y + 1,
                            col: x + 1,
                        });
                    }
                };
                map.set(x, y, tile);
            }
        }
        Ok(map)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/

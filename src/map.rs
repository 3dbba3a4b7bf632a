//! Grid model. Row-major flat storage, one object kind plus an optional
//! background color per cell.

use crate::objects::ObjectKind;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub kind: ObjectKind,
    pub bg: Option<String>,
}

pub struct Map {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Map {
    pub fn new(width: usize, height: usize) -> Self {
        let mut map = Self { width, height, cells: Vec::new() };
        map.reset();
        map
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.cells.resize(self.width * self.height, Cell::default());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell at `(x, y)`. Panics when out of bounds; callers check first.
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.idx(x, y)]
    }

    pub fn object_at(&self, x: usize, y: usize) -> ObjectKind {
        self.cell(x, y).kind
    }

    pub fn place_object(&mut self, x: usize, y: usize, kind: ObjectKind, bg: Option<&str>) {
        let idx = self.idx(x, y);
        self.cells[idx] = Cell { kind, bg: bg.and_then(non_empty) };
    }

    /// An empty color clears the square's background.
    pub fn set_square_color(&mut self, x: usize, y: usize, bg: &str) {
        let idx = self.idx(x, y);
        self.cells[idx].bg = non_empty(bg);
    }

    pub fn can_move_to(&self, x: i64, y: i64) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.object_at(x as usize, y as usize).passable()
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }
}

fn non_empty(color: &str) -> Option<String> {
    (!color.is_empty()).then(|| color.to_string())
}

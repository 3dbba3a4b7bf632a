/// Four-way movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Legacy `keyCode` values for the arrow keys.
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            37 => Some(Direction::Left),
            38 => Some(Direction::Up),
            39 => Some(Direction::Right),
            40 => Some(Direction::Down),
            _ => None,
        }
    }

    /// `KeyboardEvent.key` names for the arrow keys.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" => Some(Direction::Left),
            "ArrowUp" | "Up" => Some(Direction::Up),
            "ArrowRight" | "Right" => Some(Direction::Right),
            "ArrowDown" | "Down" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    x: usize,
    y: usize,
}

impl Player {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn at_location(&self, x: usize, y: usize) -> bool {
        self.x == x && self.y == y
    }

    /// Square one step away; may be off the board.
    pub fn target(&self, dir: Direction) -> (i64, i64) {
        let (dx, dy) = dir.delta();
        (self.x as i64 + dx, self.y as i64 + dy)
    }

    pub(crate) fn set_position(&mut self, x: usize, y: usize) {
        self.x = x;
        self.y = y;
    }
}

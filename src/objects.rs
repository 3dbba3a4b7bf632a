//! Object type registry.
//!
//! Every grid cell holds exactly one [`ObjectKind`]. The registry maps each kind
//! to how it is drawn, whether the player may walk onto it, and what happens
//! when the player does.

use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Default foreground for objects without an explicit color.
pub const DEFAULT_FG: &str = "#fff";
/// Default background for cells without an explicit color.
pub const DEFAULT_BG: &str = "#000";

/// Kinds of objects that occupy grid cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    #[default]
    Empty,
    Block,
    Tree,
    Trap,
    Exit,
    Player,
}

/// What stepping onto a tile does to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    /// Player dies; the payload names the killer.
    Kill(&'static str),
    /// Advance to the next level.
    NextLevel,
}

#[derive(Clone, Copy, Debug)]
pub struct ObjectDef {
    pub symbol: char,
    pub color: Option<&'static str>,
    pub passable: bool,
    pub on_collision: Option<Collision>,
}

impl ObjectDef {
    pub fn fg(&self) -> &'static str {
        self.color.unwrap_or(DEFAULT_FG)
    }
}

static EMPTY: ObjectDef = ObjectDef { symbol: ' ', color: None, passable: true, on_collision: None };
static BLOCK: ObjectDef = ObjectDef { symbol: '#', color: Some("#f00"), passable: false, on_collision: None };
static TREE: ObjectDef = ObjectDef { symbol: '♣', color: Some("#080"), passable: false, on_collision: None };
static TRAP: ObjectDef = ObjectDef {
    symbol: ' ',
    color: None,
    passable: true,
    on_collision: Some(Collision::Kill("an invisible trap")),
};
static EXIT: ObjectDef = ObjectDef {
    symbol: '\u{2588}',
    color: Some("#0ff"),
    passable: true,
    on_collision: Some(Collision::NextLevel),
};
static PLAYER: ObjectDef = ObjectDef { symbol: '@', color: Some("#0f0"), passable: false, on_collision: None };

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Empty,
        ObjectKind::Block,
        ObjectKind::Tree,
        ObjectKind::Trap,
        ObjectKind::Exit,
        ObjectKind::Player,
    ];

    pub fn def(self) -> &'static ObjectDef {
        match self {
            ObjectKind::Empty => &EMPTY,
            ObjectKind::Block => &BLOCK,
            ObjectKind::Tree => &TREE,
            ObjectKind::Trap => &TRAP,
            ObjectKind::Exit => &EXIT,
            ObjectKind::Player => &PLAYER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Empty => "empty",
            ObjectKind::Block => "block",
            ObjectKind::Tree => "tree",
            ObjectKind::Trap => "trap",
            ObjectKind::Exit => "exit",
            ObjectKind::Player => "player",
        }
    }

    pub fn passable(self) -> bool {
        self.def().passable
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| GameError::UnknownObject(s.to_string()))
    }
}

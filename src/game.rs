//! Game state machine: level loading, code execution and player movement.

use crate::config::GameConfig;
use crate::display::{Display, draw_object};
use crate::editor::CodeEditor;
use crate::error::{GameError, GameResult};
use crate::level;
use crate::map::Map;
use crate::objects::{Collision, ObjectKind};
use crate::player::{Direction, Player};
use crate::script::{LevelHost, LevelPlan, ScriptCommand};

/// Outcome of one player move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Moved { x: usize, y: usize },
    Blocked { x: i64, y: i64 },
    /// The player died; the current level has been reloaded.
    Killed { killer: String },
    /// The exit was reached; `next` is the level now loaded.
    LevelCompleted { next: usize },
}

impl GameEvent {
    pub fn death_message(&self) -> Option<String> {
        match self {
            GameEvent::Killed { killer } => Some(format!("You have been killed by {killer}!")),
            _ => None,
        }
    }
}

pub struct Game<D: Display> {
    config: GameConfig,
    display: D,
    map: Map,
    player: Option<Player>,
    host: LevelHost,
    editor: Option<CodeEditor>,
    current_level: usize,
}

impl<D: Display> Game<D> {
    pub fn new(config: GameConfig, display: D) -> Self {
        let map = Map::new(config.width, config.height);
        let host = LevelHost::new(config.max_operations);
        Self { config, display, map, player: None, host, editor: None, current_level: 0 }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn editor(&self) -> Option<&CodeEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut CodeEditor> {
        self.editor.as_mut()
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    /// Load level `number` from the catalog into the editor and run it.
    pub fn load_level(&mut self, number: usize) -> GameResult<()> {
        let file = level::level(number);
        log::info!("loading level {number} ({})", file.file_name);
        self.load_source(number, file.source)
    }

    /// Load an arbitrary level source as level `number`. Nothing changes
    /// unless the source parses and its code runs cleanly.
    pub fn load_source(&mut self, number: usize, source: &str) -> GameResult<()> {
        let editor = CodeEditor::from_source(source)?;
        let plan = self.plan(number, &editor.text())?;
        self.current_level = number;
        self.editor = Some(editor);
        self.start_level(&plan);
        Ok(())
    }

    /// Run the editor's current code. On failure the board is left as it was.
    pub fn execute(&mut self) -> GameResult<()> {
        let code = self.editor.as_ref().ok_or(GameError::NoLevel)?.text();
        let plan = self.plan(self.current_level, &code)?;
        self.start_level(&plan);
        Ok(())
    }

    fn plan(&self, number: usize, code: &str) -> GameResult<LevelPlan> {
        self.host.run(code, self.map.width(), self.map.height()).inspect_err(|err| {
            log::warn!("level {number} code rejected: {err}");
        })
    }

    fn start_level(&mut self, plan: &LevelPlan) {
        self.map.reset();
        self.display.clear();
        self.player = None;
        for command in &plan.commands {
            match command {
                ScriptCommand::PlaceObject { x, y, kind, bg } => {
                    self.map.place_object(*x, *y, *kind, bg.as_deref());
                    self.draw_cell(*x, *y);
                }
                ScriptCommand::SetSquareColor { x, y, color } => {
                    self.map.set_square_color(*x, *y, color);
                    self.draw_cell(*x, *y);
                }
                ScriptCommand::PlacePlayer { x, y } => self.player = Some(Player::new(*x, *y)),
            }
        }
        self.draw_player();
    }

    fn draw_cell(&mut self, x: usize, y: usize) {
        let cell = self.map.cell(x, y);
        draw_object(&mut self.display, x, y, cell.kind, cell.bg.as_deref());
    }

    fn draw_player(&mut self) {
        if let Some(p) = self.player {
            let bg = self.map.cell(p.x(), p.y()).bg.clone();
            draw_object(&mut self.display, p.x(), p.y(), ObjectKind::Player, bg.as_deref());
        }
    }

    /// Arrow-key dispatch; other keys are ignored.
    pub fn handle_key(&mut self, key: &str, key_code: u32) -> Option<GameResult<GameEvent>> {
        let dir = Direction::from_key(key).or_else(|| Direction::from_key_code(key_code))?;
        Some(self.move_player(dir))
    }

    pub fn move_player(&mut self, dir: Direction) -> GameResult<GameEvent> {
        let mut player = self.player.ok_or(GameError::NoLevel)?;
        let (nx, ny) = player.target(dir);
        if !self.map.can_move_to(nx, ny) {
            log::debug!("Can't move to {nx}, {ny}");
            return Ok(GameEvent::Blocked { x: nx, y: ny });
        }

        let (ox, oy) = (player.x(), player.y());
        let (nx, ny) = (nx as usize, ny as usize);
        self.draw_cell(ox, oy);
        player.set_position(nx, ny);
        self.player = Some(player);
        self.draw_player();

        match self.map.object_at(nx, ny).def().on_collision {
            Some(Collision::Kill(killer)) => {
                self.killed_by(killer)?;
                Ok(GameEvent::Killed { killer: killer.to_string() })
            }
            Some(Collision::NextLevel) => {
                self.move_to_next_level()?;
                Ok(GameEvent::LevelCompleted { next: self.current_level })
            }
            None => Ok(GameEvent::Moved { x: nx, y: ny }),
        }
    }

    /// Reload the current level from its pristine source.
    pub fn killed_by(&mut self, killer: &str) -> GameResult<()> {
        log::info!("You have been killed by {killer}!");
        self.load_level(self.current_level)
    }

    pub fn move_to_next_level(&mut self) -> GameResult<()> {
        log::info!("On exit square!");
        self.load_level(self.current_level + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::BufferDisplay;

    const ROOM: &str = r#"// {"editable": [[3, 3]]}
fn start_level(map) {
    map.place_player(1, 1);
    map.place_object(3, 1, "block");
    map.place_object(1, 2, "trap");
    map.place_object(0, 1, "exit");
}"#;

    fn game() -> Game<BufferDisplay> {
        let config = GameConfig::default();
        let display = BufferDisplay::new(config.width, config.height);
        let mut game = Game::new(config, display);
        game.load_source(0, ROOM).unwrap();
        game
    }

    #[test]
    fn loading_draws_objects_then_player() {
        let g = game();
        assert!(g.display().row(1).starts_with("█@ # "));
        assert_eq!(g.player().map(|p| (p.x(), p.y())), Some((1, 1)));
    }

    #[test]
    fn walls_and_edges_block() {
        let mut g = game();
        assert_eq!(g.move_player(Direction::Right).unwrap(), GameEvent::Moved { x: 2, y: 1 });
        assert_eq!(g.move_player(Direction::Right).unwrap(), GameEvent::Blocked { x: 3, y: 1 });
        assert_eq!(g.move_player(Direction::Up).unwrap(), GameEvent::Moved { x: 2, y: 0 });
        assert_eq!(g.move_player(Direction::Up).unwrap(), GameEvent::Blocked { x: 2, y: -1 });
        assert!(g.display().row(1).starts_with("█  # "));
        assert_eq!(g.display().symbol(2, 0), '@');
    }

    #[test]
    fn trap_kills_and_reloads_level() {
        let mut g = game();
        g.editor_mut().unwrap().set_line(2, r#"    map.place_object(4, 3, "block");"#);
        let event = g.move_player(Direction::Down).unwrap();
        assert_eq!(event.death_message().as_deref(), Some("You have been killed by an invisible trap!"));
        // Reload comes from the catalog, not the edited text.
        assert_eq!(g.current_level(), 0);
        assert!(!g.editor().unwrap().text().contains("place_object(4, 3"));
    }

    #[test]
    fn exit_advances_to_next_level() {
        let mut g = game();
        let event = g.move_player(Direction::Left).unwrap();
        assert_eq!(event, GameEvent::LevelCompleted { next: 1 });
        assert_eq!(g.current_level(), 1);
    }

    #[test]
    fn rejected_code_keeps_the_board() {
        let mut g = game();
        assert!(g.editor_mut().unwrap().set_line(2, r#"    map.place_object(3, 1, "lava");"#));
        assert!(matches!(g.execute(), Err(GameError::Validation(_))));
        assert!(g.display().row(1).starts_with("█@ # "));
        assert_eq!(g.map().object_at(3, 1), ObjectKind::Block);
    }

    #[test]
    fn failed_load_keeps_the_current_level() {
        let mut g = game();
        g.move_player(Direction::Right).unwrap();
        let broken = r#"// {"editable": []}
fn start_level(map) {
    map.place_object(0, 0, "block");
}"#;
        assert!(matches!(g.load_source(1, broken), Err(GameError::Validation(_))));
        assert_eq!(g.current_level(), 0);
        assert_eq!(g.editor().unwrap().text(), ROOM.split_once('\n').unwrap().1);
        assert_eq!(g.player().map(|p| (p.x(), p.y())), Some((2, 1)));
        assert_eq!(g.map().object_at(0, 0), ObjectKind::Empty);

        assert!(matches!(g.load_source(1, "no header"), Err(GameError::MissingHeader)));
        assert_eq!(g.current_level(), 0);
    }

    #[test]
    fn editing_and_executing_changes_the_level() {
        let mut g = game();
        assert!(g.editor_mut().unwrap().set_line(2, r#"    map.place_object(3, 1, "tree");"#));
        g.execute().unwrap();
        assert_eq!(g.map().object_at(3, 1), ObjectKind::Tree);
        assert_eq!(g.display().symbol(3, 1), '♣');
    }

    #[test]
    fn non_arrow_keys_are_ignored() {
        let mut g = game();
        assert!(g.handle_key("a", 65).is_none());
        assert_eq!(g.handle_key("ArrowRight", 0).unwrap().unwrap(), GameEvent::Moved { x: 2, y: 1 });
        assert_eq!(g.handle_key("", 39).unwrap().unwrap(), GameEvent::Blocked { x: 3, y: 1 });
    }
}

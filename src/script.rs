//! Level code host.
//!
//! Level code is Rhai source defining `fn start_level(map)`. The script never
//! touches the game state directly: calls on the `map` handle queue
//! [`ScriptCommand`]s, which the game applies only after the whole run has
//! been validated.

use std::cell::RefCell;
use std::rc::Rc;

use rhai::{Dynamic, Engine, EvalAltResult, INT, Scope};

use crate::error::{GameError, GameResult};
use crate::objects::ObjectKind;

pub const ENTRY_POINT: &str = "start_level";

const MAX_EXPR_DEPTH: usize = 128;
const MAX_FUNCTION_EXPR_DEPTH: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptCommand {
    PlaceObject { x: usize, y: usize, kind: ObjectKind, bg: Option<String> },
    PlacePlayer { x: usize, y: usize },
    SetSquareColor { x: usize, y: usize, color: String },
}

#[derive(Default)]
struct SharedState {
    width: usize,
    height: usize,
    commands: Vec<ScriptCommand>,
    logs: Vec<String>,
    errors: Vec<String>,
}

/// The `map` handle passed to `start_level`.
#[derive(Clone)]
pub struct ScriptMap {
    state: Rc<RefCell<SharedState>>,
}

impl ScriptMap {
    fn get_width(&mut self) -> INT {
        self.state.borrow().width as INT
    }

    fn get_height(&mut self) -> INT {
        self.state.borrow().height as INT
    }

    fn place_object(&mut self, x: INT, y: INT, kind: &str) {
        self.place(x, y, kind, None);
    }

    fn place_object_with_color(&mut self, x: INT, y: INT, kind: &str, bg: &str) {
        let bg = (!bg.is_empty()).then(|| bg.to_string());
        self.place(x, y, kind, bg);
    }

    fn set_square_color(&mut self, x: INT, y: INT, color: &str) {
        if let Some((x, y)) = self.checked_position("set_square_color", x, y) {
            self.state
                .borrow_mut()
                .commands
                .push(ScriptCommand::SetSquareColor { x, y, color: color.to_string() });
        }
    }

    fn place_player(&mut self, x: INT, y: INT) {
        if let Some((x, y)) = self.checked_position("place_player", x, y) {
            self.state.borrow_mut().commands.push(ScriptCommand::PlacePlayer { x, y });
        }
    }

    fn place(&mut self, x: INT, y: INT, kind: &str, bg: Option<String>) {
        let kind: ObjectKind = match kind.parse() {
            Ok(kind) => kind,
            Err(err) => {
                self.state.borrow_mut().errors.push(err.to_string());
                return;
            }
        };
        let Some((x, y)) = self.checked_position("place_object", x, y) else {
            return;
        };
        let mut state = self.state.borrow_mut();
        if kind != ObjectKind::Player {
            state.commands.push(ScriptCommand::PlaceObject { x, y, kind, bg });
            return;
        }
        state.commands.push(ScriptCommand::PlacePlayer { x, y });
        if let Some(color) = bg {
            state.commands.push(ScriptCommand::SetSquareColor { x, y, color });
        }
    }

    fn checked_position(&mut self, label: &str, x: INT, y: INT) -> Option<(usize, usize)> {
        let mut state = self.state.borrow_mut();
        let (w, h) = (state.width as INT, state.height as INT);
        if x < 0 || y < 0 || x >= w || y >= h {
            state.errors.push(format!("{label}({x}, {y}) is outside the {w}x{h} map"));
            return None;
        }
        Some((x as usize, y as usize))
    }
}

/// Result of a successful, validated level run.
#[derive(Clone, Debug, Default)]
pub struct LevelPlan {
    pub commands: Vec<ScriptCommand>,
    pub logs: Vec<String>,
}

impl LevelPlan {
    pub fn player(&self) -> Option<(usize, usize)> {
        self.commands.iter().find_map(|c| match c {
            ScriptCommand::PlacePlayer { x, y } => Some((*x, *y)),
            _ => None,
        })
    }
}

pub struct LevelHost {
    engine: Engine,
    shared: Rc<RefCell<SharedState>>,
}

impl LevelHost {
    pub fn new(max_operations: u64) -> Self {
        let shared = Rc::new(RefCell::new(SharedState::default()));
        let mut engine = Engine::new();
        engine.set_fast_operators(true);
        engine.set_max_operations(max_operations);
        // Debug builds otherwise default to half these depths.
        engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_FUNCTION_EXPR_DEPTH);
        engine.on_print(|text| log::info!("[level] {text}"));
        register_api(&mut engine, shared.clone());
        Self { engine, shared }
    }

    /// Compile and run level code against a `width` x `height` map.
    pub fn run(&self, source: &str, width: usize, height: usize) -> GameResult<LevelPlan> {
        *self.shared.borrow_mut() = SharedState { width, height, ..Default::default() };

        let ast = self.engine.compile(source).map_err(|err| GameError::Compile(err.to_string()))?;
        if !ast.iter_functions().any(|f| f.name == ENTRY_POINT && f.params.len() == 1) {
            return Err(GameError::MissingEntryPoint);
        }

        let mut scope = Scope::new();
        let map = ScriptMap { state: self.shared.clone() };
        if let Err(err) = self.engine.call_fn::<Dynamic>(&mut scope, &ast, ENTRY_POINT, (map,)) {
            return Err(match *err {
                EvalAltResult::ErrorTooManyOperations(_) => {
                    GameError::Validation("level code exceeded its operation budget".to_string())
                }
                other => GameError::Runtime(other.to_string()),
            });
        }

        let state = std::mem::take(&mut *self.shared.borrow_mut());
        if !state.errors.is_empty() {
            return Err(GameError::Validation(state.errors.join("; ")));
        }
        let players = state.commands.iter().filter(|c| matches!(c, ScriptCommand::PlacePlayer { .. })).count();
        if players != 1 {
            return Err(GameError::Validation(format!("level must place exactly one player (placed {players})")));
        }
        Ok(LevelPlan { commands: state.commands, logs: state.logs })
    }
}

fn register_api(engine: &mut Engine, shared: Rc<RefCell<SharedState>>) {
    engine.register_type_with_name::<ScriptMap>("LevelMap");
    engine.register_fn("get_width", ScriptMap::get_width);
    engine.register_fn("get_height", ScriptMap::get_height);
    engine.register_fn("place_object", ScriptMap::place_object);
    engine.register_fn("place_object", ScriptMap::place_object_with_color);
    engine.register_fn("set_square_color", ScriptMap::set_square_color);
    engine.register_fn("place_player", ScriptMap::place_player);
    engine.register_fn("log", move |message: &str| {
        shared.borrow_mut().logs.push(message.to_string());
        log::info!("[level] {message}");
    });
}

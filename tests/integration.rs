// Integration tests (native) for the `untrusted` crate.
// These drive the game through the public API with an in-memory display.

use untrusted::display::BufferDisplay;
use untrusted::objects::ObjectKind;
use untrusted::player::Direction;
use untrusted::{Game, GameConfig, GameEvent};

fn new_game() -> Game<BufferDisplay> {
    let cfg = GameConfig::default();
    let display = BufferDisplay::new(cfg.width, cfg.height);
    Game::new(cfg, display)
}

fn walk(game: &mut Game<BufferDisplay>, dir: Direction, steps: usize) -> GameEvent {
    let mut last = None;
    for _ in 0..steps {
        last = Some(game.move_player(dir).expect("move"));
    }
    last.expect("at least one step")
}

#[test]
fn first_level_is_a_locked_cell() {
    let mut game = new_game();
    game.load_level(0).unwrap();
    let player = *game.player().unwrap();
    assert_eq!((player.x(), player.y()), (7, 5));
    assert_eq!(game.display().symbol(7, 5), '@');
    assert_eq!(walk(&mut game, Direction::Down, 20), GameEvent::Blocked { x: 7, y: 21 });
}

#[test]
fn removing_the_bottom_wall_opens_the_way_out() {
    let mut game = new_game();
    game.load_level(0).unwrap();
    let editor = game.editor_mut().unwrap();
    assert!(!editor.set_line(8, "    map.place_player(48, 22);"));
    assert!(editor.set_line(15, "        // the bottom wall is gone"));
    game.execute().unwrap();
    assert_eq!(game.map().object_at(7, 21), ObjectKind::Empty);

    assert_eq!(walk(&mut game, Direction::Down, 18), GameEvent::Moved { x: 7, y: 23 });
    assert_eq!(walk(&mut game, Direction::Right, 40), GameEvent::Moved { x: 47, y: 23 });
    assert_eq!(game.move_player(Direction::Right).unwrap(), GameEvent::LevelCompleted { next: 1 });
    assert_eq!(game.current_level(), 1);
    assert_eq!(game.editor().unwrap().metadata().name.as_deref(), Some("theForest"));
}

#[test]
fn invisible_traps_kill_and_reset_edits() {
    let mut game = new_game();
    game.load_level(3).unwrap();
    assert_eq!(game.display().symbol(5, 12), ' ');
    let event = walk(&mut game, Direction::Right, 3);
    assert_eq!(event, GameEvent::Killed { killer: "an invisible trap".into() });
    assert_eq!(game.current_level(), 3);
    let player = *game.player().unwrap();
    assert_eq!((player.x(), player.y()), (2, 12));
}

#[test]
fn a_safe_row_leads_past_the_last_level() {
    let mut game = new_game();
    game.load_level(3).unwrap();
    assert!(game.editor_mut().unwrap().set_line(5, "    let safe_row = h / 2;"));
    game.execute().unwrap();
    assert_eq!(walk(&mut game, Direction::Right, 44), GameEvent::Moved { x: 46, y: 12 });
    assert_eq!(game.move_player(Direction::Right).unwrap(), GameEvent::LevelCompleted { next: 4 });
    assert_eq!(game.editor().unwrap().metadata().name.as_deref(), Some("theEnd"));
}

#[test]
fn colored_squares_survive_the_player_walking_over_them() {
    let mut game = new_game();
    game.load_level(2).unwrap();
    let start = *game.player().unwrap();
    assert_eq!(game.display().glyph(start.x(), start.y()).bg, "#030");
    game.move_player(Direction::Left).unwrap();
    let glyph = game.display().glyph(start.x(), start.y());
    assert_eq!(glyph.symbol, ' ');
    assert_eq!(glyph.bg, "#030");
}

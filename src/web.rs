//! Browser front end: canvas, code panel and DOM event wiring.
//!
//! The game lives in a thread-local so the event closures can reach it.
//! Listeners are leaked with `forget()`, so each element is wired at most
//! once; starting again only swaps the game and redraws.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent, window};

use crate::config::GameConfig;
use crate::display::CanvasDisplay;
use crate::editor::CodeEditor;
use crate::game::{Game, GameEvent};
use crate::logger;

const EXECUTE_ID: &str = "ut-execute";
const STATUS_ID: &str = "ut-status";
const WIRED_ATTR: &str = "data-ut-wired";

thread_local! {
    static GAME: RefCell<Option<Game<CanvasDisplay>>> = const { RefCell::new(None) };
}

#[wasm_bindgen]
pub fn start_game_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(config_json)?;
    logger::init(config.log_level());

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    // Create / reuse the screen canvas
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(&config.canvas_id) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(&config.canvas_id);
        body.append_child(&c)?;
        c
    };
    // Focusable so it receives keydown.
    canvas.set_tab_index(0);
    let display = CanvasDisplay::new(canvas.clone(), &config)?;

    let editor_el = ensure_element(&doc, &config.editor_id, "div")?;
    let execute = ensure_element(&doc, EXECUTE_ID, "button")?;
    execute.set_text_content(Some("Execute"));
    ensure_element(&doc, STATUS_ID, "div")?;

    let mut game = Game::new(config, display);
    if let Err(err) = game.load_level(0) {
        log::error!("failed to load the first level: {err}");
        set_status(&doc, &err.to_string());
    }
    render_editor(&doc, &editor_el, game.editor())?;
    GAME.with(|cell| cell.replace(Some(game)));

    if mark_wired(&canvas)? {
        wire_screen(&canvas, &editor_el)?;
    }
    if mark_wired(&editor_el)? {
        wire_editor(&canvas, &editor_el)?;
    }
    if mark_wired(&execute)? {
        wire_execute(&execute)?;
    }

    let _ = canvas.class_list().add_1("focus");
    canvas.focus()?;
    Ok(())
}

/// Flag `el` as carrying our listeners. Returns false if it already did.
fn mark_wired(el: &Element) -> Result<bool, JsValue> {
    if el.has_attribute(WIRED_ATTR) {
        return Ok(false);
    }
    el.set_attribute(WIRED_ATTR, "")?;
    Ok(true)
}

fn wire_screen(canvas: &HtmlCanvasElement, editor_el: &Element) -> Result<(), JsValue> {
    // Arrow keys move the player
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            let outcome = GAME.with(|cell| {
                cell.borrow_mut().as_mut().and_then(|game| game.handle_key(&evt.key(), evt.key_code()))
            });
            let Some(outcome) = outcome else {
                return;
            };
            evt.prevent_default();
            match outcome {
                Ok(event) => on_game_event(&event),
                Err(err) => log::error!("{err}"),
            }
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Focus toggling between screen and code panel
    let canvas_focus = canvas.clone();
    let editor_focus = editor_el.clone();
    let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
        let _ = canvas_focus.class_list().add_1("focus");
        let _ = editor_focus.class_list().remove_1("focus");
        let _ = canvas_focus.focus();
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_editor(canvas: &HtmlCanvasElement, editor_el: &Element) -> Result<(), JsValue> {
    {
        let canvas_blur = canvas.clone();
        let editor_focus = editor_el.clone();
        let closure = Closure::wrap(Box::new(move |_evt: Event| {
            let _ = editor_focus.class_list().add_1("focus");
            let _ = canvas_blur.class_list().remove_1("focus");
        }) as Box<dyn FnMut(_)>);
        editor_el.add_event_listener_with_callback("focusin", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Line edits go through the editable-line guard
    let closure = Closure::wrap(Box::new(move |evt: Event| {
        let Some(input) = evt.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
            return;
        };
        let Some(line) = input.get_attribute("data-line").and_then(|v| v.parse::<usize>().ok()) else {
            return;
        };
        let value = input.value();
        GAME.with(|cell| {
            if let Some(editor) = cell.borrow_mut().as_mut().and_then(|g| g.editor_mut()) {
                if !editor.set_line(line, &value) {
                    if let Some(current) = editor.lines().get(line) {
                        input.set_value(current);
                    }
                }
            }
        });
    }) as Box<dyn FnMut(_)>);
    editor_el.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// Execute re-runs the edited level code
fn wire_execute(execute: &Element) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
        let result = GAME.with(|cell| cell.borrow_mut().as_mut().map(|game| game.execute()));
        if let Some(doc) = window().and_then(|w| w.document()) {
            match result {
                Some(Err(err)) => set_status(&doc, &err.to_string()),
                _ => set_status(&doc, ""),
            }
        }
    }) as Box<dyn FnMut(_)>);
    execute.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_game_event(event: &GameEvent) {
    if let Some(message) = event.death_message() {
        if let Some(win) = window() {
            let _ = win.alert_with_message(&message);
        }
    }
    if matches!(event, GameEvent::Killed { .. } | GameEvent::LevelCompleted { .. }) {
        if let Err(err) = refresh_editor() {
            log::error!("failed to redraw code panel: {err:?}");
        }
    }
}

fn refresh_editor() -> Result<(), JsValue> {
    let doc = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    set_status(&doc, "");
    GAME.with(|cell| {
        let game = cell.borrow();
        let Some(game) = game.as_ref() else {
            return Ok(());
        };
        match doc.get_element_by_id(&game.config().editor_id) {
            Some(container) => render_editor(&doc, &container, game.editor()),
            None => Ok(()),
        }
    })
}

/// One row per code line; only editable lines get an input.
fn render_editor(doc: &Document, container: &Element, editor: Option<&CodeEditor>) -> Result<(), JsValue> {
    container.set_inner_html("");
    let Some(editor) = editor else {
        return Ok(());
    };
    for (idx, text) in editor.lines().iter().enumerate() {
        let editable = editor.is_editable(idx);
        let row = doc.create_element("div")?;
        row.set_class_name(if editable { "line" } else { "line disabled" });
        let number = doc.create_element("span")?;
        number.set_class_name("line-number");
        number.set_text_content(Some(&(idx + 1).to_string()));
        row.append_child(&number)?;
        if editable {
            let input: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
            input.set_type("text");
            input.set_class_name("code");
            input.set_value(text);
            input.set_attribute("data-line", &idx.to_string())?;
            input.set_attribute("spellcheck", "false")?;
            row.append_child(&input)?;
        } else {
            let code = doc.create_element("span")?;
            code.set_class_name("code");
            code.set_text_content(Some(text));
            row.append_child(&code)?;
        }
        container.append_child(&row)?;
    }
    Ok(())
}

fn ensure_element(doc: &Document, id: &str, tag: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    doc.body().ok_or_else(|| JsValue::from_str("no body"))?.append_child(&el)?;
    Ok(el)
}

fn set_status(doc: &Document, message: &str) {
    if let Some(el) = doc.get_element_by_id(STATUS_ID) {
        el.set_text_content(Some(message));
    }
}

//! Tagline Web - WebAssembly version of the span tagging tool
//!
//! This crate provides a browser-based version of Tagline using Ratzilla
//! for terminal rendering in the DOM.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::Terminal;
use ratzilla::{event::KeyCode, DomBackend, WebRenderer};
use wasm_bindgen::prelude::*;

use tagline_core::{App, Effect, Key, PageStore, Session, EXPORT_FILE_NAME, EXPORT_PATH};

pub mod io;
mod ui;

/// Demo pages used when the host page embeds no dataset
const SAMPLE_PAGES: &[&str] = &[
    "Acme Corp called today and the support team solved my problem in minutes.",
    "Acme said Acme is great, but the delivery was two days late.",
    "The new Globex phone has a bright screen and a weak battery.",
    "Nothing special about this one, just an ordinary afternoon.",
];

/// Initialize the Tagline web application
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    let session = match io::embedded_dataset() {
        Ok(Some(session)) => session,
        Ok(None) => Session::new("demo", PageStore::from_texts(SAMPLE_PAGES.iter().copied())),
        Err(e) => {
            web_sys::console::error_2(&"Failed to read embedded dataset:".into(), &e);
            Session::new("demo", PageStore::from_texts(SAMPLE_PAGES.iter().copied()))
        }
    };

    let mut app = App::new(session);
    app.set_status("Welcome to Tagline! Press 1-4 to pick a tag, 'v' to select, '?' for help");

    // Wrap in Rc<RefCell> for shared state
    let app_state = Rc::new(RefCell::new(app));

    // Create terminal with DOM backend
    let backend = DomBackend::new()
        .map_err(|e| JsValue::from_str(&format!("Failed to create backend: {:?}", e)))?;
    let mut terminal = Terminal::new(backend)
        .map_err(|e| JsValue::from_str(&format!("Failed to create terminal: {:?}", e)))?;

    // Set up keyboard handler
    terminal.on_key_event({
        let app_state_cloned = app_state.clone();
        move |event| {
            let Some(key) = map_key(event.code) else {
                return;
            };
            let effect = app_state_cloned.borrow_mut().handle_key(key);
            if effect == Effect::Export {
                export(&app_state_cloned);
            }
        }
    });

    // Draw loop
    terminal.draw_web(move |frame| {
        let app = app_state.borrow();
        ui::draw(frame, &app);
    });

    web_sys::console::log_1(&"Tagline WASM initialized".into());

    Ok(())
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

/// Offer the download, then POST the same payload in the background
fn export(app_state: &Rc<RefCell<App>>) {
    let json = {
        let mut app = app_state.borrow_mut();
        match app.export_json() {
            Ok(json) => json,
            Err(e) => {
                app.set_status(&format!("Serialization failed: {}", e));
                return;
            }
        }
    };

    {
        let mut app = app_state.borrow_mut();
        match io::download_json(EXPORT_FILE_NAME, &json) {
            Ok(()) => app.set_status(&format!("Exported to {}, uploading...", EXPORT_FILE_NAME)),
            Err(e) => app.set_status(&format!("Export failed: {:?}", e)),
        }
    }

    let app_state = app_state.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = io::post_json(EXPORT_PATH, &json).await;
        let mut app = app_state.borrow_mut();
        match result {
            Ok(success) => {
                web_sys::console::log_1(&format!("export stored, success = {:?}", success).into());
                if success == Some(false) {
                    app.set_status("Server rejected the export");
                } else {
                    app.set_status("Export uploaded");
                }
            }
            Err(e) => {
                web_sys::console::error_2(&"Export upload failed:".into(), &e);
                app.set_status("Upload failed, see console");
            }
        }
    });
}

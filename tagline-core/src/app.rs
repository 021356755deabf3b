use tracing::debug;

use crate::command::{parse_page_jump, Command, Key};
use crate::cursor::CursorState;
use crate::error::{AnnotateError, ErrorKind};
use crate::export::{to_json, ExportRecord};
use crate::model::{Page, Span, Tag, TextRange};
use crate::session::Session;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Visual,
    PageJump,
    Alert,
    Help,
}

/// Work the front end has to carry out after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Build the export record and hand it to both sinks
    Export,
}

/// One character of the active page as the editor draws it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorCell {
    pub ch: char,
    pub tag: Option<Tag>,
    pub selected: bool,
    pub caret: bool,
}

impl EditorCell {
    const CARET: EditorCell = EditorCell {
        ch: ' ',
        tag: None,
        selected: false,
        caret: true,
    };
}

/// Platform-agnostic application state
pub struct App {
    pub session: Session,
    pub cursor: CursorState,
    pub mode: Mode,
    pub running: bool,

    // Selection state
    pub selection_anchor: Option<usize>,

    // Page-jump field
    pub jump_buffer: String,

    // Status line and blocking alert text
    pub status_message: Option<String>,
    pub alert: Option<String>,

    /// Page index the cursor was loaded from
    cursor_page: usize,
}

impl App {
    pub fn new(session: Session) -> Self {
        let mut app = Self {
            session,
            cursor: CursorState::new(),
            mode: Mode::Normal,
            running: true,
            selection_anchor: None,
            jump_buffer: String::new(),
            status_message: None,
            alert: None,
            cursor_page: 0,
        };
        app.reload_cursor();
        app
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.session.store.active_page()
    }

    /// Span under the caret, if any
    pub fn span_under_cursor(&self) -> Option<&Span> {
        self.active_page()?.span_at(self.cursor.offset())
    }

    fn active_text(&self) -> &str {
        self.active_page().map(|p| p.text()).unwrap_or("")
    }

    /// Point the cursor at the active page's text
    fn reload_cursor(&mut self) {
        let text = self.active_text().to_string();
        self.cursor.set_content(&text);
        self.cursor_page = self.session.store.active_index();
        self.selection_anchor = None;
        if self.mode == Mode::Visual {
            self.mode = Mode::Normal;
        }
    }

    /// Get selection range for highlighting
    pub fn selection_range(&self) -> Option<TextRange> {
        if self.mode != Mode::Visual {
            return None;
        }
        let anchor = self.selection_anchor?;
        Some(TextRange::new(anchor, self.cursor.offset()))
    }

    /// Feed one key press through the active mode
    pub fn handle_key(&mut self, key: Key) -> Effect {
        self.clear_status();

        match self.mode {
            Mode::Normal => return self.handle_normal(key),
            Mode::Visual => self.handle_visual(key),
            Mode::PageJump => self.handle_page_jump(key),
            Mode::Alert => {
                self.alert = None;
                self.mode = Mode::Normal;
            }
            Mode::Help => self.mode = Mode::Normal,
        }
        Effect::None
    }

    fn handle_normal(&mut self, key: Key) -> Effect {
        match key {
            Key::Char('?') => self.mode = Mode::Help,
            Key::Char('h') => self.cursor.move_left(),
            Key::Char('l') => self.cursor.move_right(),
            Key::Char('j') | Key::Down => self.cursor.move_down(),
            Key::Char('k') | Key::Up => self.cursor.move_up(),
            Key::Char('w') => self.move_word_forward(),
            Key::Char('b') => self.move_word_back(),
            Key::Char('0') => self.cursor.move_to_start(),
            Key::Char('$') => self.cursor.move_to_end(),
            Key::Char('v') => self.enter_visual_mode(),
            Key::Char('g') => {
                self.jump_buffer.clear();
                self.mode = Mode::PageJump;
            }
            Key::Char('s') => return Effect::Export,
            _ => {
                if let Some(command) = Command::from_key(key) {
                    self.run(command);
                }
            }
        }
        Effect::None
    }

    fn handle_visual(&mut self, key: Key) {
        match key {
            Key::Esc => self.exit_visual_mode(),
            Key::Char('h') | Key::Left => self.cursor.move_left(),
            Key::Char('l') | Key::Right => self.cursor.move_right(),
            Key::Char('j') | Key::Down => self.cursor.move_down(),
            Key::Char('k') | Key::Up => self.cursor.move_up(),
            Key::Char('w') => self.move_word_forward(),
            Key::Char('b') => self.move_word_back(),
            Key::Char('0') => self.cursor.move_to_start(),
            Key::Char('$') => self.cursor.move_to_end(),
            Key::Enter | Key::Char('a') => {
                self.commit_selection();
            }
            // Pick a tag and apply it to the current selection in one go
            Key::Char(c @ '1'..='4') => {
                if let Some(tag) = c.to_digit(10).and_then(Tag::from_digit) {
                    let previous = self.session.active_tag();
                    self.session.set_active_tag(Some(tag));
                    if !self.commit_selection() {
                        self.session.set_active_tag(previous);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_page_jump(&mut self, key: Key) {
        match key {
            Key::Esc => {
                self.jump_buffer.clear();
                self.mode = Mode::Normal;
            }
            Key::Backspace => {
                self.jump_buffer.pop();
            }
            Key::Char(c) if !c.is_control() => self.jump_buffer.push(c),
            Key::Enter => {
                let total = self.session.store.total_pages();
                let result = parse_page_jump(&self.jump_buffer, total);
                self.jump_buffer.clear();
                self.mode = Mode::Normal;
                match result {
                    Ok(n) => self.run(Command::GotoPage(n)),
                    // The field falls back to showing the active page
                    Err(err) => self.report(err),
                }
            }
            _ => {}
        }
    }

    /// Apply a command and refresh derived state
    pub fn run(&mut self, command: Command) {
        let result = self.session.apply(command);
        let deleted = command == Command::Delete && result.is_ok();
        match result {
            Ok(()) => {
                debug!(?command, "applied command");
                match command {
                    Command::SetTag(tag) => self.set_status(&format!("Tag: {}", tag.name())),
                    Command::ClearTag => self.set_status("Tag cleared"),
                    Command::Delete => self.set_status("Page deleted"),
                    _ => {}
                }
            }
            Err(err) => self.report(err),
        }
        if deleted || self.cursor_page != self.session.store.active_index() {
            self.reload_cursor();
        }
    }

    /// Enter visual/selection mode
    pub fn enter_visual_mode(&mut self) {
        self.mode = Mode::Visual;
        self.selection_anchor = Some(self.cursor.offset());
    }

    pub fn exit_visual_mode(&mut self) {
        self.mode = Mode::Normal;
        self.selection_anchor = None;
    }

    /// Commit the visual selection under the active tag.
    ///
    /// Returns `false` when the selection was rejected.
    pub fn commit_selection(&mut self) -> bool {
        let Some(range) = self.selection_range() else {
            return true;
        };
        if self.session.active_tag().is_none() {
            self.set_status("Pick a tag (1-4) before selecting");
            self.exit_visual_mode();
            return true;
        }
        match self.session.commit_selection(range) {
            Ok(Some(span)) => {
                self.set_status(&format!("{} \"{}\"", span.tag.name(), span.text));
                self.exit_visual_mode();
                true
            }
            Ok(None) => {
                self.exit_visual_mode();
                true
            }
            // Keep the selection so it can be adjusted
            Err(err) => {
                self.report(err);
                false
            }
        }
    }

    /// Lay the active page out as rows of cells, one row per text line.
    ///
    /// A caret on a line break or past the last character gets a blank cell
    /// of its own.
    pub fn editor_rows(&self) -> Vec<Vec<EditorCell>> {
        let Some(page) = self.active_page() else {
            return Vec::new();
        };
        let selection = self.selection_range();
        let caret = self.cursor.offset();

        let mut rows = Vec::new();
        let mut row = Vec::new();
        for segment in page.segments() {
            for (i, ch) in segment.text.chars().enumerate() {
                let offset = segment.range.start_offset + i;
                if ch == '\n' {
                    if offset == caret {
                        row.push(EditorCell::CARET);
                    }
                    rows.push(std::mem::take(&mut row));
                    continue;
                }
                row.push(EditorCell {
                    ch,
                    tag: segment.tag,
                    selected: selection.is_some_and(|r| r.contains(offset)),
                    caret: offset == caret,
                });
            }
        }
        if caret >= page.char_len() {
            row.push(EditorCell::CARET);
        }
        rows.push(row);
        rows
    }

    /// The payload both export sinks receive
    pub fn export_json(&self) -> serde_json::Result<String> {
        to_json(&ExportRecord::from(&self.session))
    }

    fn move_word_forward(&mut self) {
        let text = self.active_text().to_string();
        self.cursor.move_word_forward(&text);
    }

    fn move_word_back(&mut self) {
        let text = self.active_text().to_string();
        self.cursor.move_word_back(&text);
    }

    fn report(&mut self, err: AnnotateError) {
        match err.kind() {
            ErrorKind::LastPageDeletion => {
                self.alert = Some(err.to_string());
                self.mode = Mode::Alert;
            }
            ErrorKind::Validation => self.set_status(&err.to_string()),
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Text shown in the page-jump field
    pub fn jump_field(&self) -> String {
        if self.mode == Mode::PageJump {
            self.jump_buffer.clone()
        } else {
            self.session.store.active_index().to_string()
        }
    }

    /// Get title for display
    pub fn title(&self) -> &str {
        if self.session.dataset_name.is_empty() {
            "Untitled"
        } else {
            &self.session.dataset_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PageStore;
    use pretty_assertions::assert_eq;

    fn app(texts: &[&str]) -> App {
        App::new(Session::new("demo", PageStore::from_texts(texts.iter().copied())))
    }

    fn keys(app: &mut App, keys: &[Key]) {
        for key in keys {
            app.handle_key(*key);
        }
    }

    #[test]
    fn test_select_and_tag_with_keys() {
        let mut app = app(&["Acme Corp called today"]);
        keys(
            &mut app,
            &[Key::Char('1'), Key::Char('v'), Key::Char('w'), Key::Char('w'), Key::Enter],
        );

        let page = app.active_page().unwrap();
        assert_eq!(page.spans().len(), 1);
        assert_eq!(page.spans()[0].text, "Acme Corp");
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_visual_digit_tags_selection() {
        let mut app = app(&["Acme Corp called today"]);
        keys(&mut app, &[Key::Char('v'), Key::Char('w'), Key::Char('4')]);

        let span = &app.active_page().unwrap().spans()[0];
        assert_eq!(span.tag, Tag::Negatif);
        assert_eq!(span.text, "Acme");
        assert_eq!(app.session.active_tag(), Some(Tag::Negatif));
    }

    #[test]
    fn test_selection_without_tag_is_dropped() {
        let mut app = app(&["Acme Corp called today"]);
        keys(&mut app, &[Key::Char('v'), Key::Char('w'), Key::Enter]);
        assert_eq!(app.session.store.span_count(), 0);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_overlap_keeps_selection_open() {
        let mut app = app(&["Acme Corp called today"]);
        keys(
            &mut app,
            &[Key::Char('1'), Key::Char('v'), Key::Char('w'), Key::Enter],
        );
        // Back to the start and select over the existing span
        keys(&mut app, &[Key::Char('0'), Key::Char('v'), Key::Char('w'), Key::Enter]);

        assert_eq!(app.session.store.span_count(), 1);
        assert_eq!(app.mode, Mode::Visual);
        assert!(app.status_message.as_deref().unwrap_or("").contains("overlaps"));
    }

    #[test]
    fn test_rejected_digit_keeps_previous_tag() {
        let mut app = app(&["Acme Corp called today"]);
        keys(
            &mut app,
            &[Key::Char('1'), Key::Char('v'), Key::Char('w'), Key::Enter],
        );
        keys(&mut app, &[Key::Char('0'), Key::Char('v'), Key::Char('w'), Key::Char('4')]);

        assert_eq!(app.session.store.span_count(), 1);
        assert_eq!(app.session.active_tag(), Some(Tag::Firma));
        assert_eq!(app.mode, Mode::Visual);
    }

    #[test]
    fn test_span_under_cursor() {
        let mut app = app(&["Acme Corp called today"]);
        keys(
            &mut app,
            &[Key::Char('2'), Key::Char('v'), Key::Char('w'), Key::Enter],
        );
        app.handle_key(Key::Char('0'));
        assert_eq!(app.span_under_cursor().map(|s| s.text.as_str()), Some("Acme"));

        app.handle_key(Key::Char('$'));
        assert!(app.span_under_cursor().is_none());
    }

    #[test]
    fn test_editor_rows() {
        let mut app = app(&["ab\ncd"]);
        keys(
            &mut app,
            &[Key::Char('3'), Key::Char('v'), Key::Char('l'), Key::Enter],
        );

        let rows = app.editor_rows();
        assert_eq!(rows.len(), 2);
        let first: String = rows[0].iter().map(|c| c.ch).collect();
        assert_eq!(first, "ab");
        assert_eq!(rows[0][0].tag, Some(Tag::Notr));
        assert_eq!(rows[0][1].tag, None);
        assert!(rows[0][1].caret);
        assert!(rows.iter().flatten().all(|c| !c.selected));

        keys(&mut app, &[Key::Char('j'), Key::Char('$'), Key::Char('v'), Key::Char('h')]);
        let rows = app.editor_rows();
        let second: String = rows[1].iter().map(|c| c.ch).collect();
        assert_eq!(second, "cd");
        assert!(rows[1][1].caret);
        assert!(rows[1][1].selected);
        assert!(!rows[1][0].selected);
    }

    #[test]
    fn test_caret_past_end_gets_blank_cell() {
        let mut app = app(&["ab"]);
        app.handle_key(Key::Char('$'));
        let rows = app.editor_rows();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][2], EditorCell::CARET);
    }

    #[test]
    fn test_page_jump_field() {
        let mut app = app(&["a", "b", "c"]);
        keys(&mut app, &[Key::Char('g'), Key::Char('3'), Key::Enter]);
        assert_eq!(app.session.store.active_index(), 3);

        keys(&mut app, &[Key::Char('g'), Key::Char('9'), Key::Enter]);
        assert_eq!(app.session.store.active_index(), 3);
        assert_eq!(app.jump_field(), "3");
        assert!(app.status_message.is_some());

        keys(&mut app, &[Key::Char('g'), Key::Char('x'), Key::Enter]);
        assert_eq!(app.session.store.active_index(), 3);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_last_page_delete_raises_alert() {
        let mut app = app(&["only page"]);
        app.handle_key(Key::Char('d'));
        assert_eq!(app.mode, Mode::Alert);
        assert!(app.alert.is_some());
        assert_eq!(app.session.store.total_pages(), 1);

        // Any key dismisses
        app.handle_key(Key::Char('x'));
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_failed_delete_keeps_cursor() {
        let mut app = app(&["only page here"]);
        app.handle_key(Key::Char('w'));
        let before = app.cursor.offset();
        assert!(before > 0);

        app.handle_key(Key::Char('d'));
        assert_eq!(app.mode, Mode::Alert);
        assert_eq!(app.cursor.offset(), before);
    }

    #[test]
    fn test_export_json_matches_record() {
        let mut app = app(&["Acme Corp called today"]);
        keys(
            &mut app,
            &[Key::Char('1'), Key::Char('v'), Key::Char('w'), Key::Enter],
        );
        let json = app.export_json().unwrap();
        assert_eq!(json, to_json(&ExportRecord::from(&app.session)).unwrap());
        assert!(json.contains(r#""text":"Acme""#));
    }

    #[test]
    fn test_page_change_resets_cursor() {
        let mut app = app(&["first page", "second"]);
        keys(&mut app, &[Key::Char('w'), Key::Char('v'), Key::Right]);
        assert_eq!(app.cursor.offset(), 6);

        app.handle_key(Key::Esc);
        app.handle_key(Key::Char('e'));
        assert_eq!(app.session.store.active_index(), 2);
        assert_eq!(app.cursor.offset(), 0);
        assert_eq!(app.handle_key(Key::Char('s')), Effect::Export);
    }
}

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::api::types::{
    ShoppingListDetail, ShoppingListItem, UpdateShoppingListItem, UpdateShoppingListRequest,
};
use crate::error::Result;
use crate::export;

use super::app::{ApiRequest, ViewCommand};

/// Editable copy of one list row. `id` stays `None` for rows added locally
/// until the backend assigns an identity on save.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableItem {
    pub id: Option<i64>,
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

impl EditableItem {
    fn from_item(item: &ShoppingListItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.clone(),
            quantity: item.quantity.clone().unwrap_or_default(),
            unit: item.unit.clone().unwrap_or_default(),
        }
    }

    fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            quantity: String::new(),
            unit: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Quantity,
    Unit,
    Name,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Quantity => Field::Unit,
            Field::Unit => Field::Name,
            Field::Name => Field::Quantity,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::Quantity => Field::Name,
            Field::Unit => Field::Quantity,
            Field::Name => Field::Unit,
        }
    }
}

/// Edit-session buffer: a snapshot of the list's name and items that only
/// reaches the backend as a whole on save. Row 0 is the list name, item rows
/// start at 1.
struct ListEditor {
    name: String,
    items: Vec<EditableItem>,
    row: usize,
    field: Field,
}

impl ListEditor {
    fn new(list: &ShoppingListDetail) -> Self {
        Self {
            name: list.name.clone(),
            items: list.items.iter().map(EditableItem::from_item).collect(),
            row: 0,
            field: Field::Quantity,
        }
    }

    fn current_field(&mut self) -> &mut String {
        if self.row == 0 {
            return &mut self.name;
        }
        let item = &mut self.items[self.row - 1];
        match self.field {
            Field::Quantity => &mut item.quantity,
            Field::Unit => &mut item.unit,
            Field::Name => &mut item.name,
        }
    }

    fn add_item(&mut self) {
        self.items.push(EditableItem::blank());
        self.row = self.items.len();
        self.field = Field::Quantity;
    }

    fn remove_item(&mut self) {
        if self.row == 0 || self.items.is_empty() {
            return;
        }
        self.items.remove(self.row - 1);
        self.row = self.row.min(self.items.len());
    }

    fn move_row(&mut self, delta: isize) {
        self.row = self.row.saturating_add_signed(delta).min(self.items.len());
    }

    /// Blank quantity/unit strings go back to null on the wire.
    fn to_request(&self) -> UpdateShoppingListRequest {
        fn blank_to_none(value: &str) -> Option<String> {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }

        UpdateShoppingListRequest {
            name: self.name.clone(),
            items: self
                .items
                .iter()
                .map(|item| UpdateShoppingListItem {
                    id: item.id,
                    name: item.name.clone(),
                    quantity: blank_to_none(&item.quantity),
                    unit: blank_to_none(&item.unit),
                })
                .collect(),
        }
    }
}

/// Detail view for one shopping list: loading, then viewing with a local
/// checklist, with an edit session layered on top when requested.
///
/// A load failure is fatal to the view; action failures (delete, save) leave
/// it usable. The checklist set is never persisted: it resets whenever the
/// list is reloaded and deliberately survives a save.
pub struct ListDetailView {
    list_id: i64,
    list: Option<ShoppingListDetail>,
    load_error: Option<String>,
    error: Option<String>,
    status: Option<String>,
    checked: HashSet<i64>,
    cursor: usize,
    editor: Option<ListEditor>,
    saving: bool,
}

impl ListDetailView {
    pub fn new(list_id: i64) -> Self {
        Self {
            list_id,
            list: None,
            load_error: None,
            error: None,
            status: None,
            checked: HashSet::new(),
            cursor: 0,
            editor: None,
            saving: false,
        }
    }

    pub fn list_id(&self) -> i64 {
        self.list_id
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ViewCommand {
        if self.editor.is_some() {
            return self.handle_edit_key(key);
        }
        if self.list.is_none() {
            // Nothing loaded yet (or the load failed): only navigation works,
            // so export and editing are unreachable here.
            return match key.code {
                KeyCode::Esc => ViewCommand::CloseDetail,
                _ => ViewCommand::Unhandled,
            };
        }
        self.handle_view_key(key)
    }

    fn handle_view_key(&mut self, key: KeyEvent) -> ViewCommand {
        let item_count = self.list.as_ref().map(|list| list.items.len()).unwrap_or(0);
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => ViewCommand::CloseDetail,
            KeyCode::Down | KeyCode::Char('j') => {
                if item_count > 0 {
                    self.cursor = (self.cursor + 1).min(item_count - 1);
                }
                ViewCommand::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                ViewCommand::None
            }
            KeyCode::Char(' ') => {
                let id = self
                    .list
                    .as_ref()
                    .and_then(|list| list.items.get(self.cursor))
                    .map(|item| item.id);
                if let Some(id) = id {
                    if !self.checked.remove(&id) {
                        self.checked.insert(id);
                    }
                }
                ViewCommand::None
            }
            KeyCode::Char('e') => {
                if let Some(list) = self.list.as_ref() {
                    self.editor = Some(ListEditor::new(list));
                    self.status = None;
                }
                ViewCommand::None
            }
            KeyCode::Char('d') => {
                self.status = None;
                ViewCommand::Request(ApiRequest::DeleteList { id: self.list_id })
            }
            KeyCode::Char('x') => {
                self.export();
                ViewCommand::None
            }
            _ => ViewCommand::Unhandled,
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> ViewCommand {
        // Control chords carry the commands; plain keys edit the fields.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => {
                    if let Some(editor) = self.editor.as_mut() {
                        editor.add_item();
                    }
                }
                KeyCode::Char('d') => {
                    if let Some(editor) = self.editor.as_mut() {
                        editor.remove_item();
                    }
                }
                KeyCode::Char('s') => return self.save(),
                _ => {}
            }
            return ViewCommand::None;
        }

        if key.code == KeyCode::Esc {
            // Cancel discards the whole buffer, persisted state untouched.
            self.editor = None;
            self.error = None;
            return ViewCommand::None;
        }

        let Some(editor) = self.editor.as_mut() else {
            return ViewCommand::None;
        };
        match key.code {
            KeyCode::Char(c) => {
                editor.current_field().push(c);
                ViewCommand::None
            }
            KeyCode::Backspace => {
                editor.current_field().pop();
                ViewCommand::None
            }
            KeyCode::Tab => {
                editor.field = editor.field.next();
                ViewCommand::None
            }
            KeyCode::BackTab => {
                editor.field = editor.field.previous();
                ViewCommand::None
            }
            KeyCode::Down => {
                editor.move_row(1);
                ViewCommand::None
            }
            KeyCode::Up => {
                editor.move_row(-1);
                ViewCommand::None
            }
            _ => ViewCommand::None,
        }
    }

    /// Submit the whole edit buffer as one replace-all update.
    fn save(&mut self) -> ViewCommand {
        if self.saving {
            return ViewCommand::None;
        }
        let Some(editor) = self.editor.as_ref() else {
            return ViewCommand::None;
        };
        let request = editor.to_request();
        self.saving = true;
        self.error = None;
        ViewCommand::Request(ApiRequest::SaveList {
            id: self.list_id,
            request,
        })
    }

    /// Export always reads the loaded list, never the edit buffer.
    fn export(&mut self) {
        let Some(list) = self.list.as_ref() else {
            return;
        };
        match export::open_in_browser(list) {
            Ok(path) => self.status = Some(format!("Exported to {}", path.display())),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn on_loaded(&mut self, result: Result<ShoppingListDetail>) {
        match result {
            Ok(list) => {
                self.list = Some(list);
                self.load_error = None;
                // Checklist state never survives a reload.
                self.checked.clear();
                self.cursor = 0;
            }
            Err(err) => {
                if self.list.is_none() {
                    self.load_error = Some(err.to_string());
                } else {
                    self.error = Some(err.to_string());
                }
            }
        }
    }

    pub fn on_saved(&mut self, result: Result<ShoppingListDetail>) {
        self.saving = false;
        match result {
            Ok(list) => {
                // The canonical record replaces local state and the edit
                // session ends; the checklist is deliberately left alone.
                self.cursor = self.cursor.min(list.items.len().saturating_sub(1));
                self.list = Some(list);
                self.editor = None;
            }
            Err(err) => {
                // Buffer stays up for retry or cancel.
                self.error = Some(err.to_string());
            }
        }
    }

    /// Returns true when the delete landed and the view should be torn down.
    pub fn on_deleted(&mut self, outcome: Result<()>) -> bool {
        match outcome {
            Ok(()) => true,
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(error) = &self.load_error {
            frame.render_widget(
                Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
                area,
            );
            return;
        }
        let Some(list) = self.list.as_ref() else {
            frame.render_widget(Paragraph::new("Loading..."), area);
            return;
        };

        match self.editor.as_ref() {
            Some(editor) => self.render_editor(frame, area, editor),
            None => self.render_view(frame, area, list),
        }
    }

    fn render_view(&self, frame: &mut Frame, area: Rect, list: &ShoppingListDetail) {
        let recipe_rows = (list.recipes.len() as u16).min(6) + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(recipe_rows),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(list.name.as_str()).style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from(format!("Created: {}", list.created_at)),
        ]);
        frame.render_widget(header, chunks[0]);

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
                chunks[1],
            );
        } else if let Some(status) = &self.status {
            frame.render_widget(Paragraph::new(status.as_str()), chunks[1]);
        }

        let recipe_lines: Vec<Line> = list
            .recipes
            .iter()
            .map(|recipe| Line::from(format!("{} ({})", recipe.title, recipe.url)))
            .collect();
        let recipes = Paragraph::new(recipe_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Recipes ({})", list.recipes.len())),
        );
        frame.render_widget(recipes, chunks[2]);

        let mut item_lines = Vec::new();
        for (index, item) in list.items.iter().enumerate() {
            let checked = self.checked.contains(&item.id);
            let marker = if checked { "[x]" } else { "[ ]" };
            let mut style = Style::default();
            if checked {
                style = style.add_modifier(Modifier::CROSSED_OUT).fg(Color::DarkGray);
            }
            if index == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            item_lines
                .push(Line::from(format!("{} {}", marker, export::format_item(item))).style(style));
        }
        let items = Paragraph::new(item_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Shopping Items ({})", list.items.len())),
        );
        frame.render_widget(items, chunks[3]);

        frame.render_widget(
            Paragraph::new("space tick | e edit | x export | d delete | Esc back"),
            chunks[4],
        );
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect, editor: &ListEditor) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
                chunks[0],
            );
        } else if self.saving {
            frame.render_widget(Paragraph::new("Saving..."), chunks[0]);
        }

        let mut lines = Vec::new();
        let mut name_line = Line::from(format!("Name: {}", editor.name));
        if editor.row == 0 {
            name_line = name_line.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        lines.push(name_line);

        for (index, item) in editor.items.iter().enumerate() {
            let row = index + 1;
            let text = format!(
                "{} | {} | {}",
                field_text(&item.quantity, "qty", editor.row == row && editor.field == Field::Quantity),
                field_text(&item.unit, "unit", editor.row == row && editor.field == Field::Unit),
                field_text(&item.name, "item name", editor.row == row && editor.field == Field::Name),
            );
            let mut line = Line::from(text);
            if editor.row == row {
                line = line.style(Style::default().add_modifier(Modifier::BOLD));
            }
            lines.push(line);
        }

        let body = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Editing ({} items)", editor.items.len())),
        );
        frame.render_widget(body, chunks[1]);

        frame.render_widget(
            Paragraph::new(
                "type to edit | Tab field | up/down row | Ctrl-N add | Ctrl-D remove | Ctrl-S save | Esc cancel",
            ),
            chunks[2],
        );
    }
}

fn field_text(value: &str, placeholder: &str, active: bool) -> String {
    let shown = if value.is_empty() { placeholder } else { value };
    if active {
        format!("[{}]", shown)
    } else {
        shown.to_string()
    }
}

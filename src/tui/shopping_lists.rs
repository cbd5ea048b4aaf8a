use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::api::types::ShoppingList;
use crate::error::Result;

use super::app::{ApiRequest, ViewCommand};

/// Shopping list collection: browse, delete, and open one in detail.
pub struct ShoppingListsView {
    lists: Vec<ShoppingList>,
    cursor: usize,
    error: Option<String>,
}

impl ShoppingListsView {
    pub fn new() -> Self {
        Self {
            lists: Vec::new(),
            cursor: 0,
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ViewCommand {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.lists.is_empty() {
                    self.cursor = (self.cursor + 1).min(self.lists.len() - 1);
                }
                ViewCommand::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                ViewCommand::None
            }
            KeyCode::Enter => match self.lists.get(self.cursor) {
                Some(list) => ViewCommand::OpenList(list.id),
                None => ViewCommand::None,
            },
            KeyCode::Char('d') => match self.lists.get(self.cursor) {
                Some(list) => ViewCommand::Request(ApiRequest::DeleteList { id: list.id }),
                None => ViewCommand::None,
            },
            _ => ViewCommand::Unhandled,
        }
    }

    pub fn on_lists(&mut self, result: Result<Vec<ShoppingList>>) {
        match result {
            Ok(lists) => {
                self.lists = lists;
                self.cursor = self.cursor.min(self.lists.len().saturating_sub(1));
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn on_deleted(&mut self, id: i64, outcome: Result<()>) {
        match outcome {
            Ok(()) => {
                self.lists.retain(|list| list.id != id);
                self.cursor = self.cursor.min(self.lists.len().saturating_sub(1));
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        if let Some(error) = &self.error {
            let line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
            frame.render_widget(line, chunks[0]);
        }

        let mut lines = Vec::new();
        for (index, list) in self.lists.iter().enumerate() {
            let mut line = Line::from(format!(
                "{}  ({} recipes, {} items, created {})",
                list.name, list.recipe_count, list.item_count, list.created_at
            ));
            if index == self.cursor {
                line = line.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            lines.push(line);
        }
        if self.lists.is_empty() {
            lines.push(Line::from(
                "No shopping lists yet. Select recipes to create one.",
            ));
        }
        let table = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Shopping Lists"),
        );
        frame.render_widget(table, chunks[1]);

        frame.render_widget(Paragraph::new("Enter open | d delete"), chunks[2]);
    }
}

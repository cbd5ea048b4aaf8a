use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::api::types::{Recipe, RecipeDetail, ShoppingList, ShoppingListDetail};
use crate::error::Result;

use super::app::{ApiRequest, ViewCommand};

/// Name given to a shopping list created with the name input left blank.
const DEFAULT_LIST_NAME: &str = "Shopping List";

/// Which control owns keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Table,
    Search,
    ListName,
    PickTarget,
}

/// Recipe browser: searchable collection, a selection set, and the two
/// routes from a selection into a shopping list (create new, append to
/// existing).
pub struct RecipeListView {
    recipes: Vec<Recipe>,
    selected: HashSet<i64>,
    cursor: usize,
    focus: Focus,
    search: String,
    list_name: String,
    targets: Vec<ShoppingList>,
    target_cursor: usize,
    error: Option<String>,
    detail: Option<RecipeDetail>,
}

impl RecipeListView {
    pub fn new() -> Self {
        Self {
            recipes: Vec::new(),
            selected: HashSet::new(),
            cursor: 0,
            focus: Focus::Table,
            search: String::new(),
            list_name: String::new(),
            targets: Vec::new(),
            target_cursor: 0,
            error: None,
            detail: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ViewCommand {
        if self.detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.detail = None;
            }
            return ViewCommand::None;
        }
        match self.focus {
            Focus::Table => self.handle_table_key(key),
            Focus::Search => self.handle_search_key(key),
            Focus::ListName => self.handle_name_key(key),
            Focus::PickTarget => self.handle_target_key(key),
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> ViewCommand {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(1);
                ViewCommand::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(-1);
                ViewCommand::None
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.recipes.get(self.cursor).map(|recipe| recipe.id) {
                    if !self.selected.remove(&id) {
                        self.selected.insert(id);
                    }
                }
                ViewCommand::None
            }
            KeyCode::Char('d') => match self.recipes.get(self.cursor) {
                Some(recipe) => ViewCommand::Request(ApiRequest::DeleteRecipe { id: recipe.id }),
                None => ViewCommand::None,
            },
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                ViewCommand::None
            }
            KeyCode::Char('n') => {
                self.focus = Focus::ListName;
                ViewCommand::None
            }
            KeyCode::Char('c') => self.create_list(),
            KeyCode::Char('a') => {
                if !self.selected.is_empty() && !self.targets.is_empty() {
                    self.target_cursor = 0;
                    self.focus = Focus::PickTarget;
                }
                ViewCommand::None
            }
            KeyCode::Enter => match self.recipes.get(self.cursor) {
                Some(recipe) => {
                    ViewCommand::Request(ApiRequest::LoadRecipeDetail { id: recipe.id })
                }
                None => ViewCommand::None,
            },
            _ => ViewCommand::Unhandled,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> ViewCommand {
        match key.code {
            KeyCode::Char(c) => {
                self.search.push(c);
                ViewCommand::None
            }
            KeyCode::Backspace => {
                self.search.pop();
                ViewCommand::None
            }
            KeyCode::Enter => {
                self.focus = Focus::Table;
                let search = if self.search.is_empty() {
                    None
                } else {
                    Some(self.search.clone())
                };
                ViewCommand::Request(ApiRequest::LoadRecipes { search })
            }
            KeyCode::Esc => {
                self.focus = Focus::Table;
                if self.search.is_empty() {
                    ViewCommand::None
                } else {
                    // Clearing the filter re-fetches unfiltered.
                    self.search.clear();
                    ViewCommand::Request(ApiRequest::LoadRecipes { search: None })
                }
            }
            _ => ViewCommand::None,
        }
    }

    fn handle_name_key(&mut self, key: KeyEvent) -> ViewCommand {
        match key.code {
            KeyCode::Char(c) => {
                self.list_name.push(c);
                ViewCommand::None
            }
            KeyCode::Backspace => {
                self.list_name.pop();
                ViewCommand::None
            }
            KeyCode::Enter => {
                self.focus = Focus::Table;
                self.create_list()
            }
            KeyCode::Esc => {
                self.focus = Focus::Table;
                ViewCommand::None
            }
            _ => ViewCommand::None,
        }
    }

    fn handle_target_key(&mut self, key: KeyEvent) -> ViewCommand {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.targets.is_empty() {
                    self.target_cursor = (self.target_cursor + 1).min(self.targets.len() - 1);
                }
                ViewCommand::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.target_cursor = self.target_cursor.saturating_sub(1);
                ViewCommand::None
            }
            KeyCode::Enter => {
                self.focus = Focus::Table;
                match self.targets.get(self.target_cursor) {
                    Some(target) if !self.selected.is_empty() => {
                        ViewCommand::Request(ApiRequest::AddRecipesToList {
                            list_id: target.id,
                            recipe_ids: self.selected.iter().copied().collect(),
                        })
                    }
                    _ => ViewCommand::None,
                }
            }
            KeyCode::Esc => {
                self.focus = Focus::Table;
                ViewCommand::None
            }
            _ => ViewCommand::None,
        }
    }

    fn create_list(&mut self) -> ViewCommand {
        if self.selected.is_empty() {
            return ViewCommand::None;
        }
        let name = if self.list_name.is_empty() {
            DEFAULT_LIST_NAME
        } else {
            self.list_name.as_str()
        };
        ViewCommand::Request(ApiRequest::CreateShoppingList {
            name: name.to_string(),
            recipe_ids: self.selected.iter().copied().collect(),
        })
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.recipes.is_empty() {
            self.cursor = 0;
            return;
        }
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.recipes.len() - 1);
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.recipes.len().saturating_sub(1));
    }

    pub fn on_recipes(&mut self, result: Result<Vec<Recipe>>) {
        match result {
            Ok(recipes) => {
                self.recipes = recipes;
                self.clamp_cursor();
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Append targets are decorative; a failed fetch keeps the old ones.
    pub fn on_targets(&mut self, result: Result<Vec<ShoppingList>>) {
        if let Ok(lists) = result {
            self.targets = lists;
        }
    }

    pub fn on_deleted(&mut self, id: i64, outcome: Result<()>) {
        match outcome {
            Ok(()) => {
                // Local removal happens only once the backend agreed.
                self.recipes.retain(|recipe| recipe.id != id);
                self.selected.remove(&id);
                self.clamp_cursor();
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Returns true when the list was created so the app can bump the
    /// shopping-list refresh counter.
    pub fn on_list_created(&mut self, result: Result<ShoppingListDetail>) -> bool {
        match result {
            Ok(_) => {
                self.selected.clear();
                self.list_name.clear();
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Same contract as [`Self::on_list_created`], for the append route.
    pub fn on_recipes_appended(&mut self, result: Result<ShoppingListDetail>) -> bool {
        match result {
            Ok(_) => {
                self.selected.clear();
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub fn on_recipe_detail(&mut self, result: Result<RecipeDetail>) {
        match result {
            Ok(detail) => self.detail = Some(detail),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(detail) = &self.detail {
            let mut lines = vec![
                Line::from(detail.url.as_str()),
                Line::from(format!("Ingredients ({})", detail.ingredients.len())),
            ];
            for ingredient in &detail.ingredients {
                lines.push(Line::from(format!("  - {}", ingredient.raw_text)));
            }
            let panel = Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} (Esc to close)", detail.title)),
            );
            frame.render_widget(panel, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(area);

        let search_title = if self.focus == Focus::Search {
            "Search by title (Enter to search, Esc to clear)"
        } else {
            "Search (press / to focus)"
        };
        let search = Paragraph::new(self.search.as_str())
            .block(Block::default().borders(Borders::ALL).title(search_title));
        frame.render_widget(search, chunks[0]);

        if let Some(error) = &self.error {
            let line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
            frame.render_widget(line, chunks[1]);
        }

        let mut lines = Vec::new();
        for (index, recipe) in self.recipes.iter().enumerate() {
            let marker = if self.selected.contains(&recipe.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let mut line = Line::from(format!(
                "{} {}  ({} ingredients, added {})",
                marker, recipe.title, recipe.ingredient_count, recipe.created_at
            ));
            if index == self.cursor && self.focus == Focus::Table {
                line = line.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            lines.push(line);
        }
        if self.recipes.is_empty() {
            lines.push(Line::from(if self.search.is_empty() {
                "No recipes yet. Add one from the Add Recipe screen."
            } else {
                "No recipes match your search."
            }));
        }
        let table = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Recipes ({} selected)", self.selected.len())),
        );
        frame.render_widget(table, chunks[2]);

        self.render_action_bar(frame, chunks[3]);
    }

    fn render_action_bar(&self, frame: &mut Frame, area: Rect) {
        let bar = match self.focus {
            Focus::ListName => Paragraph::new(self.list_name.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Shopping list name (Enter to create from selection)"),
            ),
            Focus::PickTarget => {
                let target = self
                    .targets
                    .get(self.target_cursor)
                    .map(|list| list.name.as_str())
                    .unwrap_or("-");
                Paragraph::new(format!("-> {}  (j/k to change, Enter to add, Esc to cancel)", target))
                    .block(
                        Block::default().borders(Borders::ALL).title(format!(
                            "Add {} selected recipe(s) to existing list",
                            self.selected.len()
                        )),
                    )
            }
            _ => {
                let hint = if self.selected.is_empty() {
                    "space select | d delete | / search | Enter detail".to_string()
                } else {
                    format!(
                        "c create list ({} selected) | n name it | a add to existing | space select | d delete",
                        self.selected.len()
                    )
                };
                Paragraph::new(hint).block(Block::default().borders(Borders::ALL))
            }
        };
        frame.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SniperError;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(view: &mut RecipeListView, text: &str) {
        for c in text.chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn recipe(id: i64, title: &str) -> Recipe {
        Recipe {
            id,
            url: format!("https://example.com/{}", id),
            title: title.to_string(),
            ingredient_count: 3,
            created_at: "2026-01-15T00:00:00Z".to_string(),
        }
    }

    fn created_list() -> ShoppingListDetail {
        ShoppingListDetail {
            id: 9,
            name: "Weekly".to_string(),
            created_at: "2026-01-15T00:00:00Z".to_string(),
            recipes: vec![],
            items: vec![],
        }
    }

    fn loaded_view() -> RecipeListView {
        let mut view = RecipeListView::new();
        view.on_recipes(Ok(vec![recipe(1, "Soup"), recipe(2, "Pie")]));
        view
    }

    #[test]
    fn test_space_toggles_selection() {
        let mut view = loaded_view();

        view.handle_key(key(KeyCode::Char(' ')));
        assert!(view.selected.contains(&1));

        view.handle_key(key(KeyCode::Char(' ')));
        assert!(view.selected.is_empty());
    }

    #[test]
    fn test_create_requires_selection() {
        let mut view = loaded_view();

        let command = view.handle_key(key(KeyCode::Char('c')));

        assert!(matches!(command, ViewCommand::None));
    }

    #[test]
    fn test_create_defaults_blank_name() {
        let mut view = loaded_view();
        view.handle_key(key(KeyCode::Char(' ')));

        let command = view.handle_key(key(KeyCode::Char('c')));

        match command {
            ViewCommand::Request(ApiRequest::CreateShoppingList { name, recipe_ids }) => {
                assert_eq!(name, "Shopping List");
                assert_eq!(recipe_ids, vec![1]);
            }
            _ => panic!("expected a create request"),
        }
    }

    #[test]
    fn test_create_uses_typed_name() {
        let mut view = loaded_view();
        view.handle_key(key(KeyCode::Char(' ')));
        view.handle_key(key(KeyCode::Char('n')));
        type_text(&mut view, "Weekly Shop");

        let command = view.handle_key(key(KeyCode::Enter));

        match command {
            ViewCommand::Request(ApiRequest::CreateShoppingList { name, .. }) => {
                assert_eq!(name, "Weekly Shop");
            }
            _ => panic!("expected a create request"),
        }
    }

    #[test]
    fn test_delete_is_applied_only_after_success() {
        let mut view = loaded_view();
        view.handle_key(key(KeyCode::Char(' ')));

        let command = view.handle_key(key(KeyCode::Char('d')));
        assert!(matches!(
            command,
            ViewCommand::Request(ApiRequest::DeleteRecipe { id: 1 })
        ));
        // Nothing removed until the call settles.
        assert_eq!(view.recipes.len(), 2);
        assert!(view.selected.contains(&1));

        view.on_deleted(1, Ok(()));
        assert_eq!(view.recipes.len(), 1);
        assert!(!view.selected.contains(&1));
    }

    #[test]
    fn test_failed_delete_leaves_state_unchanged() {
        let mut view = loaded_view();
        view.handle_key(key(KeyCode::Char(' ')));

        view.on_deleted(1, Err(SniperError::Api("in use".to_string())));

        assert_eq!(view.recipes.len(), 2);
        assert!(view.selected.contains(&1));
        assert_eq!(view.error.as_deref(), Some("in use"));
    }

    #[test]
    fn test_search_submit_and_clear() {
        let mut view = loaded_view();
        view.handle_key(key(KeyCode::Char('/')));
        type_text(&mut view, "pasta");

        let command = view.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            command,
            ViewCommand::Request(ApiRequest::LoadRecipes { search: Some(ref s) }) if s == "pasta"
        ));

        view.handle_key(key(KeyCode::Char('/')));
        let command = view.handle_key(key(KeyCode::Esc));
        assert!(matches!(
            command,
            ViewCommand::Request(ApiRequest::LoadRecipes { search: None })
        ));
        assert!(view.search.is_empty());
    }

    #[test]
    fn test_list_created_clears_selection_and_name() {
        let mut view = loaded_view();
        view.handle_key(key(KeyCode::Char(' ')));
        view.handle_key(key(KeyCode::Char('n')));
        type_text(&mut view, "Weekly");
        view.handle_key(key(KeyCode::Esc));

        let refreshed = view.on_list_created(Ok(created_list()));

        assert!(refreshed);
        assert!(view.selected.is_empty());
        assert!(view.list_name.is_empty());
    }

    #[test]
    fn test_append_to_existing_list() {
        let mut view = loaded_view();
        view.on_targets(Ok(vec![ShoppingList {
            id: 4,
            name: "Pantry".to_string(),
            recipe_count: 0,
            item_count: 0,
            created_at: "2026-01-15T00:00:00Z".to_string(),
        }]));
        view.handle_key(key(KeyCode::Char(' ')));
        view.handle_key(key(KeyCode::Char('a')));

        let command = view.handle_key(key(KeyCode::Enter));

        match command {
            ViewCommand::Request(ApiRequest::AddRecipesToList {
                list_id,
                recipe_ids,
            }) => {
                assert_eq!(list_id, 4);
                assert_eq!(recipe_ids, vec![1]);
            }
            _ => panic!("expected an append request"),
        }

        assert!(view.on_recipes_appended(Ok(created_list())));
        assert!(view.selected.is_empty());
    }

    #[test]
    fn test_target_fetch_failure_is_ignored() {
        let mut view = loaded_view();
        view.on_targets(Ok(vec![ShoppingList {
            id: 4,
            name: "Pantry".to_string(),
            recipe_count: 0,
            item_count: 0,
            created_at: "2026-01-15T00:00:00Z".to_string(),
        }]));

        view.on_targets(Err(SniperError::Api("down".to_string())));

        assert_eq!(view.targets.len(), 1);
        assert!(view.error.is_none());
    }
}

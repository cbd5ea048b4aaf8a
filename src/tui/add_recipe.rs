use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::api::types::RecipeDetail;
use crate::error::Result;

use super::app::{ApiRequest, ViewCommand};

/// URL submission screen: idle until submit, then one in-flight scrape whose
/// result or error replaces the previous one.
///
/// While a scrape is in flight only re-submission is blocked; the URL field
/// stays editable, mirroring a disabled submit button next to a live input.
pub struct AddRecipeView {
    url: String,
    submitting: bool,
    result: Option<RecipeDetail>,
    error: Option<String>,
}

impl AddRecipeView {
    pub fn new() -> Self {
        Self {
            url: String::new(),
            submitting: false,
            result: None,
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ViewCommand {
        match key.code {
            KeyCode::Char(c) => {
                self.url.push(c);
                ViewCommand::None
            }
            KeyCode::Backspace => {
                self.url.pop();
                ViewCommand::None
            }
            KeyCode::Enter => {
                if self.submitting || self.url.is_empty() {
                    return ViewCommand::None;
                }
                self.submitting = true;
                self.result = None;
                self.error = None;
                ViewCommand::Request(ApiRequest::AddRecipe {
                    url: self.url.clone(),
                })
            }
            _ => ViewCommand::Unhandled,
        }
    }

    /// Returns true when the scrape succeeded so the app can refresh the
    /// recipe collection.
    pub fn on_submitted(&mut self, result: Result<RecipeDetail>) -> bool {
        self.submitting = false;
        match result {
            Ok(recipe) => {
                self.result = Some(recipe);
                self.url.clear();
                true
            }
            Err(err) => {
                // The typed URL stays put so the user can correct it.
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(area);

        let title = if self.submitting {
            "Recipe URL (scraping...)"
        } else {
            "Recipe URL (Enter to scrape)"
        };
        let input = Paragraph::new(self.url.as_str())
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(input, chunks[0]);

        if let Some(error) = &self.error {
            let line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
            frame.render_widget(line, chunks[1]);
        }

        if let Some(recipe) = &self.result {
            let mut lines = vec![
                Line::from(recipe.url.as_str()),
                Line::from(format!("Ingredients ({})", recipe.ingredients.len())),
            ];
            for ingredient in &recipe.ingredients {
                lines.push(Line::from(format!("  - {}", ingredient.raw_text)));
            }
            let panel = Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(recipe.title.as_str()),
            );
            frame.render_widget(panel, chunks[2]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Ingredient;
    use crate::error::SniperError;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(view: &mut AddRecipeView, text: &str) {
        for c in text.chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn scraped() -> RecipeDetail {
        RecipeDetail {
            id: 1,
            url: "https://example.com/pie".to_string(),
            title: "Pie".to_string(),
            created_at: "2026-01-15T00:00:00Z".to_string(),
            ingredients: vec![Ingredient {
                id: 1,
                name: "apples".to_string(),
                quantity: Some("4".to_string()),
                unit: None,
                raw_text: "4 apples".to_string(),
            }],
        }
    }

    #[test]
    fn test_submit_emits_request_and_blocks_resubmit() {
        let mut view = AddRecipeView::new();
        type_text(&mut view, "https://example.com/pie");

        let command = view.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            command,
            ViewCommand::Request(ApiRequest::AddRecipe { ref url }) if url == "https://example.com/pie"
        ));
        assert!(view.submitting);

        // A second Enter while in flight does nothing.
        let command = view.handle_key(key(KeyCode::Enter));
        assert!(matches!(command, ViewCommand::None));
    }

    #[test]
    fn test_empty_url_does_not_submit() {
        let mut view = AddRecipeView::new();

        let command = view.handle_key(key(KeyCode::Enter));

        assert!(matches!(command, ViewCommand::None));
        assert!(!view.submitting);
    }

    #[test]
    fn test_success_clears_url_and_keeps_result() {
        let mut view = AddRecipeView::new();
        type_text(&mut view, "https://example.com/pie");
        view.handle_key(key(KeyCode::Enter));

        let refreshed = view.on_submitted(Ok(scraped()));

        assert!(refreshed);
        assert!(!view.submitting);
        assert!(view.url.is_empty());
        assert_eq!(view.result.as_ref().map(|r| r.title.as_str()), Some("Pie"));
        assert!(view.error.is_none());
    }

    #[test]
    fn test_failure_preserves_url_and_shows_error() {
        let mut view = AddRecipeView::new();
        type_text(&mut view, "https://example.com/404");
        view.handle_key(key(KeyCode::Enter));

        let refreshed = view.on_submitted(Err(SniperError::Api("No recipe found".to_string())));

        assert!(!refreshed);
        assert_eq!(view.url, "https://example.com/404");
        assert_eq!(view.error.as_deref(), Some("No recipe found"));
        assert!(view.result.is_none());
    }

    #[test]
    fn test_resubmit_clears_previous_result_and_error() {
        let mut view = AddRecipeView::new();
        type_text(&mut view, "https://example.com/pie");
        view.handle_key(key(KeyCode::Enter));
        view.on_submitted(Err(SniperError::Api("boom".to_string())));

        view.handle_key(key(KeyCode::Enter));

        assert!(view.error.is_none());
        assert!(view.result.is_none());
        assert!(view.submitting);
    }
}

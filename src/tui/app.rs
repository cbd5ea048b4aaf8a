use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::api::SniperClient;
use crate::api::types::{
    Recipe, RecipeDetail, ShoppingList, ShoppingListDetail, UpdateShoppingListRequest,
};
use crate::error::Result;

use super::add_recipe::AddRecipeView;
use super::list_detail::ListDetailView;
use super::recipes::RecipeListView;
use super::shopping_lists::ShoppingListsView;

/// Terminal input or a settled API call, delivered over the app channel.
pub enum AppEvent {
    Input(KeyEvent),
    Api(ApiOutcome),
    Resize,
}

/// One REST call a view wants executed.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    LoadRecipes { search: Option<String> },
    LoadRecipeDetail { id: i64 },
    AddRecipe { url: String },
    DeleteRecipe { id: i64 },
    CreateShoppingList { name: String, recipe_ids: Vec<i64> },
    AddRecipesToList { list_id: i64, recipe_ids: Vec<i64> },
    LoadShoppingLists,
    LoadListTargets,
    LoadListDetail { id: i64 },
    SaveList { id: i64, request: UpdateShoppingListRequest },
    DeleteList { id: i64 },
}

/// The settled result of an [`ApiRequest`], tagged for routing back to the
/// view that asked for it.
pub enum ApiOutcome {
    Recipes(Result<Vec<Recipe>>),
    RecipeDetail(Result<RecipeDetail>),
    RecipeAdded(Result<RecipeDetail>),
    RecipeDeleted { id: i64, outcome: Result<()> },
    ListCreated(Result<ShoppingListDetail>),
    RecipesAppended(Result<ShoppingListDetail>),
    ShoppingLists(Result<Vec<ShoppingList>>),
    ListTargets(Result<Vec<ShoppingList>>),
    ListDetail(Result<ShoppingListDetail>),
    ListSaved(Result<ShoppingListDetail>),
    ListDeleted { id: i64, outcome: Result<()> },
}

/// Run one request against the client and wrap the result for routing.
pub async fn execute(client: &SniperClient, request: ApiRequest) -> ApiOutcome {
    match request {
        ApiRequest::LoadRecipes { search } => {
            ApiOutcome::Recipes(client.get_recipes(search.as_deref()).await)
        }
        ApiRequest::LoadRecipeDetail { id } => ApiOutcome::RecipeDetail(client.get_recipe(id).await),
        ApiRequest::AddRecipe { url } => ApiOutcome::RecipeAdded(client.add_recipe(&url).await),
        ApiRequest::DeleteRecipe { id } => ApiOutcome::RecipeDeleted {
            id,
            outcome: client.delete_recipe(id).await,
        },
        ApiRequest::CreateShoppingList { name, recipe_ids } => {
            ApiOutcome::ListCreated(client.create_shopping_list(&name, recipe_ids).await)
        }
        ApiRequest::AddRecipesToList {
            list_id,
            recipe_ids,
        } => ApiOutcome::RecipesAppended(
            client.add_recipes_to_shopping_list(list_id, recipe_ids).await,
        ),
        ApiRequest::LoadShoppingLists => {
            ApiOutcome::ShoppingLists(client.get_shopping_lists().await)
        }
        ApiRequest::LoadListTargets => ApiOutcome::ListTargets(client.get_shopping_lists().await),
        ApiRequest::LoadListDetail { id } => {
            ApiOutcome::ListDetail(client.get_shopping_list(id).await)
        }
        ApiRequest::SaveList { id, request } => {
            ApiOutcome::ListSaved(client.update_shopping_list(id, request).await)
        }
        ApiRequest::DeleteList { id } => ApiOutcome::ListDeleted {
            id,
            outcome: client.delete_shopping_list(id).await,
        },
    }
}

/// What a view asks of the app after handling a key.
pub enum ViewCommand {
    /// Key consumed, nothing else to do.
    None,
    /// Key consumed; run this call.
    Request(ApiRequest),
    /// Navigate into a shopping list.
    OpenList(i64),
    /// Leave the detail view and refresh the list collection.
    CloseDetail,
    /// Key not consumed; the app may apply global bindings.
    Unhandled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Recipes,
    AddRecipe,
    ShoppingLists,
}

pub struct App {
    pub screen: Screen,
    pub recipes: RecipeListView,
    pub add_recipe: AddRecipeView,
    pub shopping_lists: ShoppingListsView,
    pub detail: Option<ListDetailView>,
    pub should_quit: bool,
    // Parent-owned refresh counters: mutations elsewhere bump them, screens
    // re-fetch when the value they last loaded at falls behind.
    recipes_refresh: u64,
    lists_refresh: u64,
    recipes_seen: Option<u64>,
    lists_seen: Option<u64>,
}

impl App {
    /// Create the app on the recipe screen, returning the initial loads.
    pub fn new() -> (Self, Vec<ApiRequest>) {
        let mut app = Self {
            screen: Screen::Recipes,
            recipes: RecipeListView::new(),
            add_recipe: AddRecipeView::new(),
            shopping_lists: ShoppingListsView::new(),
            detail: None,
            should_quit: false,
            recipes_refresh: 0,
            lists_refresh: 0,
            recipes_seen: None,
            lists_seen: None,
        };
        let requests = app.sync_screen();
        (app, requests)
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<ApiRequest> {
        match event {
            AppEvent::Input(key) => self.handle_key(key),
            AppEvent::Api(outcome) => self.handle_api(outcome),
            AppEvent::Resize => Vec::new(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<ApiRequest> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }

        let command = match self.screen {
            Screen::Recipes => self.recipes.handle_key(key),
            Screen::AddRecipe => self.add_recipe.handle_key(key),
            Screen::ShoppingLists => match self.detail.as_mut() {
                Some(detail) => detail.handle_key(key),
                None => self.shopping_lists.handle_key(key),
            },
        };

        match command {
            ViewCommand::None => Vec::new(),
            ViewCommand::Request(request) => vec![request],
            ViewCommand::OpenList(id) => {
                self.detail = Some(ListDetailView::new(id));
                vec![ApiRequest::LoadListDetail { id }]
            }
            ViewCommand::CloseDetail => {
                self.detail = None;
                self.lists_seen = Some(self.lists_refresh);
                vec![ApiRequest::LoadShoppingLists]
            }
            ViewCommand::Unhandled => self.handle_global_key(key),
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> Vec<ApiRequest> {
        match key.code {
            KeyCode::Tab => {
                self.screen = match self.screen {
                    Screen::Recipes => Screen::AddRecipe,
                    Screen::AddRecipe => Screen::ShoppingLists,
                    Screen::ShoppingLists => Screen::Recipes,
                };
                self.sync_screen()
            }
            KeyCode::BackTab => {
                self.screen = match self.screen {
                    Screen::Recipes => Screen::ShoppingLists,
                    Screen::AddRecipe => Screen::Recipes,
                    Screen::ShoppingLists => Screen::AddRecipe,
                };
                self.sync_screen()
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Re-fetch the active screen's data if it has never loaded or a
    /// mutation elsewhere bumped its refresh counter.
    fn sync_screen(&mut self) -> Vec<ApiRequest> {
        match self.screen {
            Screen::Recipes => {
                if self.recipes_seen == Some(self.recipes_refresh) {
                    return Vec::new();
                }
                self.recipes_seen = Some(self.recipes_refresh);
                vec![
                    ApiRequest::LoadRecipes { search: None },
                    ApiRequest::LoadListTargets,
                ]
            }
            Screen::AddRecipe => Vec::new(),
            Screen::ShoppingLists => {
                if self.lists_seen == Some(self.lists_refresh) {
                    return Vec::new();
                }
                self.lists_seen = Some(self.lists_refresh);
                vec![ApiRequest::LoadShoppingLists]
            }
        }
    }

    fn handle_api(&mut self, outcome: ApiOutcome) -> Vec<ApiRequest> {
        match outcome {
            ApiOutcome::Recipes(result) => self.recipes.on_recipes(result),
            ApiOutcome::RecipeDetail(result) => self.recipes.on_recipe_detail(result),
            ApiOutcome::RecipeAdded(result) => {
                if self.add_recipe.on_submitted(result) {
                    self.recipes_refresh += 1;
                }
            }
            ApiOutcome::RecipeDeleted { id, outcome } => self.recipes.on_deleted(id, outcome),
            ApiOutcome::ListCreated(result) => {
                if self.recipes.on_list_created(result) {
                    self.lists_refresh += 1;
                }
            }
            ApiOutcome::RecipesAppended(result) => {
                if self.recipes.on_recipes_appended(result) {
                    self.lists_refresh += 1;
                }
            }
            ApiOutcome::ShoppingLists(result) => self.shopping_lists.on_lists(result),
            ApiOutcome::ListTargets(result) => self.recipes.on_targets(result),
            ApiOutcome::ListDetail(result) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.on_loaded(result);
                }
            }
            ApiOutcome::ListSaved(result) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.on_saved(result);
                }
            }
            ApiOutcome::ListDeleted { id, outcome } => match self.detail.as_mut() {
                Some(detail) if detail.list_id() == id => {
                    if detail.on_deleted(outcome) {
                        self.detail = None;
                        self.lists_seen = Some(self.lists_refresh);
                        return vec![ApiRequest::LoadShoppingLists];
                    }
                }
                _ => self.shopping_lists.on_deleted(id, outcome),
            },
        }
        Vec::new()
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(frame.area());

        self.render_tabs(frame, chunks[0]);
        match self.screen {
            Screen::Recipes => self.recipes.render(frame, chunks[1]),
            Screen::AddRecipe => self.add_recipe.render(frame, chunks[1]),
            Screen::ShoppingLists => match self.detail.as_ref() {
                Some(detail) => detail.render(frame, chunks[1]),
                None => self.shopping_lists.render(frame, chunks[1]),
            },
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles = [
            (Screen::Recipes, "Recipes"),
            (Screen::AddRecipe, "Add Recipe"),
            (Screen::ShoppingLists, "Shopping Lists"),
        ];

        let mut spans = vec![Span::raw(" ")];
        for (screen, title) in titles {
            let style = if screen == self.screen {
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            spans.push(Span::styled(title, style));
            spans.push(Span::raw("   "));
        }
        spans.push(Span::raw("(Tab switches screen)"));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Ingredient;
    use crate::error::SniperError;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_detail() -> RecipeDetail {
        RecipeDetail {
            id: 7,
            url: "https://example.com/soup".to_string(),
            title: "Soup".to_string(),
            created_at: "2026-01-15T00:00:00Z".to_string(),
            ingredients: vec![Ingredient {
                id: 1,
                name: "carrot".to_string(),
                quantity: Some("2".to_string()),
                unit: None,
                raw_text: "2 carrots".to_string(),
            }],
        }
    }

    fn sample_list() -> ShoppingList {
        ShoppingList {
            id: 3,
            name: "Weekly".to_string(),
            recipe_count: 1,
            item_count: 2,
            created_at: "2026-01-15T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_startup_loads_recipes_and_targets() {
        let (_, requests) = App::new();

        assert_eq!(
            requests,
            vec![
                ApiRequest::LoadRecipes { search: None },
                ApiRequest::LoadListTargets,
            ]
        );
    }

    #[test]
    fn test_tab_cycles_screens_and_loads_once() {
        let (mut app, _) = App::new();

        let requests = app.handle_event(AppEvent::Input(key(KeyCode::Tab)));
        assert_eq!(app.screen, Screen::AddRecipe);
        assert!(requests.is_empty());

        let requests = app.handle_event(AppEvent::Input(key(KeyCode::Tab)));
        assert_eq!(app.screen, Screen::ShoppingLists);
        assert_eq!(requests, vec![ApiRequest::LoadShoppingLists]);

        // Back to recipes: nothing changed, so nothing reloads.
        let requests = app.handle_event(AppEvent::Input(key(KeyCode::Tab)));
        assert_eq!(app.screen, Screen::Recipes);
        assert!(requests.is_empty());
    }

    #[test]
    fn test_added_recipe_triggers_refresh_on_next_visit() {
        let (mut app, _) = App::new();

        app.handle_event(AppEvent::Api(ApiOutcome::RecipeAdded(Ok(sample_detail()))));

        // Cycle all the way around back to the recipe screen.
        app.handle_event(AppEvent::Input(key(KeyCode::Tab)));
        app.handle_event(AppEvent::Input(key(KeyCode::Tab)));
        let requests = app.handle_event(AppEvent::Input(key(KeyCode::Tab)));

        assert_eq!(
            requests,
            vec![
                ApiRequest::LoadRecipes { search: None },
                ApiRequest::LoadListTargets,
            ]
        );
    }

    #[test]
    fn test_failed_add_does_not_bump_refresh() {
        let (mut app, _) = App::new();

        app.handle_event(AppEvent::Api(ApiOutcome::RecipeAdded(Err(
            SniperError::Api("scrape failed".to_string()),
        ))));

        app.handle_event(AppEvent::Input(key(KeyCode::Tab)));
        app.handle_event(AppEvent::Input(key(KeyCode::Tab)));
        let requests = app.handle_event(AppEvent::Input(key(KeyCode::Tab)));

        assert!(requests.is_empty());
    }

    #[test]
    fn test_enter_opens_list_detail() {
        let (mut app, _) = App::new();
        app.handle_event(AppEvent::Input(key(KeyCode::Tab)));
        app.handle_event(AppEvent::Input(key(KeyCode::Tab)));
        app.handle_event(AppEvent::Api(ApiOutcome::ShoppingLists(Ok(vec![
            sample_list(),
        ]))));

        let requests = app.handle_event(AppEvent::Input(key(KeyCode::Enter)));

        assert!(app.detail.is_some());
        assert_eq!(requests, vec![ApiRequest::LoadListDetail { id: 3 }]);
    }

    #[test]
    fn test_deleted_list_closes_detail_and_reloads() {
        let (mut app, _) = App::new();
        app.screen = Screen::ShoppingLists;
        app.detail = Some(ListDetailView::new(3));

        let requests = app.handle_event(AppEvent::Api(ApiOutcome::ListDeleted {
            id: 3,
            outcome: Ok(()),
        }));

        assert!(app.detail.is_none());
        assert_eq!(requests, vec![ApiRequest::LoadShoppingLists]);
    }

    #[test]
    fn test_failed_list_delete_keeps_detail_open() {
        let (mut app, _) = App::new();
        app.screen = Screen::ShoppingLists;
        app.detail = Some(ListDetailView::new(3));

        let requests = app.handle_event(AppEvent::Api(ApiOutcome::ListDeleted {
            id: 3,
            outcome: Err(SniperError::Api("nope".to_string())),
        }));

        assert!(app.detail.is_some());
        assert!(requests.is_empty());
    }
}

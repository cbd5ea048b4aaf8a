use serde::{Deserialize, Serialize};

/// Recipe summary row as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub ingredient_count: i64,
    pub created_at: String,
}

/// One parsed ingredient line belonging to a recipe.
///
/// `quantity` and `unit` are whatever the scraper managed to extract and may
/// be absent; `raw_text` is always the original unparsed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub raw_text: String,
}

/// Complete recipe with its ordered ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub created_at: String,
    pub ingredients: Vec<Ingredient>,
}

/// Shopping list summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: i64,
    pub name: String,
    pub recipe_count: i64,
    pub item_count: i64,
    pub created_at: String,
}

/// One purchasable line entry within a shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: i64,
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

/// Complete shopping list with contributing recipes and owned items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListDetail {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub recipes: Vec<Recipe>,
    pub items: Vec<ShoppingListItem>,
}

// Request payloads.

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct AddRecipeRequest {
    pub url: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShoppingListRequest {
    pub name: String,
    pub recipe_ids: Vec<i64>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecipesRequest {
    pub recipe_ids: Vec<i64>,
}

/// Full replacement of a list's name and items.
///
/// An item with `id: None` is one the user created locally; the backend
/// assigns its identity on save. Items carrying an id are updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateShoppingListRequest {
    pub name: String,
    pub items: Vec<UpdateShoppingListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateShoppingListItem {
    pub id: Option<i64>,
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

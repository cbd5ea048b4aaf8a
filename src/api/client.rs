use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::types::*;
use crate::error::{Result, SniperError};

/// HTTP client for the Recipe Sniper API.
///
/// Every method issues exactly one request and fails fast: no retries and no
/// request-level timeout beyond what the transport imposes.
pub struct SniperClient {
    base_url: String,
    client: reqwest::Client,
}

impl SniperClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reduce a non-success response to the message the UI should display.
    ///
    /// The API reports failures as a JSON body with an `error` string field.
    /// A missing or unparseable body is tolerated and replaced with a generic
    /// message carrying the status code.
    async fn api_error(response: reqwest::Response) -> SniperError {
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed: {}", status.as_u16()));
        tracing::error!("API request failed with status {}: {}", status, message);
        SniperError::Api(message)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// Like [`Self::read_json`] for endpoints that return no body on success.
    async fn read_no_content(response: reqwest::Response) -> Result<()> {
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }

    // Recipe operations

    /// Submit a URL for scraping. Returns the full scraped recipe.
    pub async fn add_recipe(&self, url: &str) -> Result<RecipeDetail> {
        let endpoint = format!("{}/api/recipes", self.base_url);
        let request = AddRecipeRequest {
            url: url.to_string(),
        };

        tracing::debug!("Scraping recipe from {}", url);
        let response = self.client.post(&endpoint).json(&request).send().await?;
        Self::read_json(response).await
    }

    /// List recipe summaries, optionally filtered server-side by title.
    pub async fn get_recipes(&self, search: Option<&str>) -> Result<Vec<Recipe>> {
        let mut endpoint = format!("{}/api/recipes", self.base_url);
        if let Some(query) = search {
            endpoint.push_str(&format!("?search={}", urlencoding::encode(query)));
        }

        let response = self.client.get(&endpoint).send().await?;
        Self::read_json(response).await
    }

    pub async fn get_recipe(&self, id: i64) -> Result<RecipeDetail> {
        let endpoint = format!("{}/api/recipes/{}", self.base_url, id);

        let response = self.client.get(&endpoint).send().await?;
        Self::read_json(response).await
    }

    pub async fn delete_recipe(&self, id: i64) -> Result<()> {
        let endpoint = format!("{}/api/recipes/{}", self.base_url, id);

        let response = self.client.delete(&endpoint).send().await?;
        Self::read_no_content(response).await
    }

    // Shopping list operations

    pub async fn create_shopping_list(
        &self,
        name: &str,
        recipe_ids: Vec<i64>,
    ) -> Result<ShoppingListDetail> {
        let endpoint = format!("{}/api/shopping-lists", self.base_url);
        let request = CreateShoppingListRequest {
            name: name.to_string(),
            recipe_ids,
        };

        tracing::debug!("Creating shopping list with {} recipes", request.recipe_ids.len());
        let response = self.client.post(&endpoint).json(&request).send().await?;
        Self::read_json(response).await
    }

    pub async fn get_shopping_lists(&self) -> Result<Vec<ShoppingList>> {
        let endpoint = format!("{}/api/shopping-lists", self.base_url);

        let response = self.client.get(&endpoint).send().await?;
        Self::read_json(response).await
    }

    pub async fn get_shopping_list(&self, id: i64) -> Result<ShoppingListDetail> {
        let endpoint = format!("{}/api/shopping-lists/{}", self.base_url, id);

        let response = self.client.get(&endpoint).send().await?;
        Self::read_json(response).await
    }

    /// Replace a list's name and entire item collection in one call.
    pub async fn update_shopping_list(
        &self,
        id: i64,
        request: UpdateShoppingListRequest,
    ) -> Result<ShoppingListDetail> {
        let endpoint = format!("{}/api/shopping-lists/{}", self.base_url, id);

        let response = self.client.put(&endpoint).json(&request).send().await?;
        Self::read_json(response).await
    }

    /// Append more recipes' ingredients to an existing list.
    pub async fn add_recipes_to_shopping_list(
        &self,
        id: i64,
        recipe_ids: Vec<i64>,
    ) -> Result<ShoppingListDetail> {
        let endpoint = format!("{}/api/shopping-lists/{}/recipes", self.base_url, id);
        let request = AddRecipesRequest { recipe_ids };

        let response = self.client.post(&endpoint).json(&request).send().await?;
        Self::read_json(response).await
    }

    pub async fn delete_shopping_list(&self, id: i64) -> Result<()> {
        let endpoint = format!("{}/api/shopping-lists/{}", self.base_url, id);

        let response = self.client.delete(&endpoint).send().await?;
        Self::read_no_content(response).await
    }
}

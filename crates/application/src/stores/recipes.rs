//! Recipe store: paginated list and detail view state.
//!
//! Every operation catches its errors into the `error` field of the
//! state; nothing here propagates a failure to the caller. Prior list
//! content is left untouched when a fetch fails.

use std::sync::Arc;

use ladle_domain::{PageBody, Recipe, RecipeForm, RecipeRef, recipe::validate_board_no};
use tokio::sync::RwLock;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::ports::{ApiRequest, HttpTransport, RawResponse};

/// Search filters. `None` clears the corresponding filter, matching the
/// behavior of submitting an empty search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Keyword to match against titles; trimmed before use.
    pub keyword: Option<String>,
    /// Category to restrict the listing to.
    pub category_no: Option<u64>,
}

/// Explicit arguments for a list fetch. `None` falls back to the stored
/// state; an explicit argument wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    /// 1-based page to fetch.
    pub page: Option<u32>,
    /// Page size.
    pub size: Option<u32>,
    /// Keyword filter override.
    pub keyword: Option<String>,
    /// Category filter override.
    pub category_no: Option<u64>,
}

impl ListArgs {
    /// Arguments selecting only a page.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}

/// View state held by the store.
///
/// Invariants: `page >= 1`; `has_next ⟺ page < total_pages` unless the
/// server stated otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeListState {
    /// Current page of records.
    pub items: Vec<Recipe>,
    /// Detail selection.
    pub selected: Option<Recipe>,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Last error, empty when the last operation succeeded.
    pub error: String,
    /// Active keyword filter.
    pub keyword: String,
    /// Active category filter.
    pub category_no: Option<u64>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Total number of records.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Whether a further page exists.
    pub has_next: bool,
}

impl RecipeListState {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }
}

impl Default for RecipeListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: String::new(),
            keyword: String::new(),
            category_no: None,
            page: 1,
            size: 10,
            total: 0,
            total_pages: 0,
            has_next: false,
        }
    }
}

/// Recipe CRUD and pagination over a shared client.
#[derive(Debug)]
pub struct RecipeStore<T> {
    client: Arc<ApiClient<T>>,
    state: Arc<RwLock<RecipeListState>>,
}

impl<T> Clone for RecipeStore<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: HttpTransport> RecipeStore<T> {
    /// Creates the store over a shared client.
    #[must_use]
    pub fn new(client: Arc<ApiClient<T>>) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(RecipeListState::default())),
        }
    }

    /// Snapshot of the current view state.
    pub async fn state(&self) -> RecipeListState {
        self.state.read().await.clone()
    }

    /// Applies new filters without fetching.
    pub async fn set_filters(&self, filters: Filters) {
        let mut state = self.state.write().await;
        Self::apply_filters(&mut state, filters);
    }

    fn apply_filters(state: &mut RecipeListState, filters: Filters) {
        state.keyword = filters.keyword.unwrap_or_default().trim().to_string();
        state.category_no = filters.category_no;
    }

    /// Restores the initial list state, keeping the active filters.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let keyword = std::mem::take(&mut state.keyword);
        let category_no = state.category_no;
        *state = RecipeListState {
            keyword,
            category_no,
            ..RecipeListState::default()
        };
    }

    /// Fetches a page, merging explicit arguments over stored state.
    pub async fn fetch_list(&self, args: ListArgs) {
        let (page, size, keyword, category_no) = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error.clear();
            (
                args.page.unwrap_or(state.page),
                args.size.unwrap_or(state.size),
                args.keyword.unwrap_or_else(|| state.keyword.clone()),
                args.category_no.or(state.category_no),
            )
        };

        let mut request = ApiRequest::get("/recipes")
            .with_query("page", page.to_string())
            .with_query("size", size.to_string());
        if !keyword.is_empty() {
            request = request.with_query("keyword", keyword);
        }
        if let Some(category) = category_no {
            request = request.with_query("categoryNo", category.to_string());
        }

        let result: ApiResult<PageBody> = self.client.send_json(request).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(body) => {
                let fetched = body.normalize(page, size);
                state.items = fetched.items;
                state.page = fetched.page;
                state.size = fetched.size;
                state.total = fetched.total;
                state.total_pages = fetched.total_pages;
                state.has_next = fetched.has_next;
            }
            Err(error) => {
                tracing::debug!(%error, "recipe list fetch failed");
                state.error = error.server_message();
            }
        }
    }

    /// Applies filters and fetches page 1. The filter and page writes
    /// happen in one critical section, so no reader observes partial
    /// filter state.
    pub async fn search(&self, filters: Filters) {
        {
            let mut state = self.state.write().await;
            Self::apply_filters(&mut state, filters);
            state.page = 1;
        }
        self.fetch_list(ListArgs::page(1)).await;
    }

    /// Fetches the requested page, clamped into `[1, total_pages]`.
    /// Before any page count is known the lower clamp alone applies.
    pub async fn go_to(&self, page: u32) {
        let target = {
            let state = self.state.read().await;
            let upper = if state.total_pages == 0 {
                page
            } else {
                page.min(state.total_pages)
            };
            upper.max(1)
        };
        self.fetch_list(ListArgs::page(target)).await;
    }

    /// Steps to the next page, a no-op on the last page.
    pub async fn next(&self) {
        let (page, total_pages) = {
            let state = self.state.read().await;
            (state.page, state.total_pages)
        };
        if page < total_pages {
            self.go_to(page + 1).await;
        }
    }

    /// Steps to the previous page, a no-op on page 1.
    pub async fn prev(&self) {
        let page = self.state.read().await.page;
        if page > 1 {
            self.go_to(page - 1).await;
        }
    }

    /// Fetches a single recipe into `selected`.
    pub async fn fetch_detail(&self, board_no: u64) {
        if let Err(error) = validate_board_no(board_no) {
            self.store_error(error.to_string()).await;
            return;
        }

        self.begin().await;
        let result: ApiResult<Recipe> = self
            .client
            .send_json(ApiRequest::get(format!("/recipes/{board_no}")))
            .await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(recipe) => state.selected = Some(recipe),
            Err(error) => state.error = error.server_message(),
        }
    }

    /// Creates a recipe and returns the confirmed board number.
    ///
    /// `selected` is updated only when the server echoes the full
    /// record back. Returns `None` on any failure; the error channel
    /// carries the reason.
    pub async fn create(&self, form: &RecipeForm) -> Option<u64> {
        if let Err(error) = form.validate() {
            self.store_error(error.to_string()).await;
            return None;
        }

        self.begin().await;
        let result = self
            .client
            .send(ApiRequest::post("/recipes").with_body(form))
            .await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(response) => {
                if let Ok(recipe) = response.json::<Recipe>() {
                    state.selected = Some(recipe);
                }
                Self::confirmed_board_no(&response, &mut state)
            }
            Err(error) => {
                state.error = error.server_message();
                None
            }
        }
    }

    fn confirmed_board_no(response: &RawResponse, state: &mut RecipeListState) -> Option<u64> {
        match response.json::<RecipeRef>() {
            Ok(reference) => Some(reference.board_no),
            Err(error) => {
                state.error = format!("failed to decode response: {error}");
                None
            }
        }
    }

    /// Updates a recipe. The list entry and `selected` are replaced only
    /// after server confirmation.
    pub async fn update(&self, board_no: u64, form: &RecipeForm) -> bool {
        if let Err(error) = validate_board_no(board_no).and(form.validate()) {
            self.store_error(error.to_string()).await;
            return false;
        }

        self.begin().await;
        let result = self
            .client
            .send(ApiRequest::put(format!("/recipes/{board_no}")).with_body(form))
            .await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(response) => {
                let confirmed = response.json::<Recipe>().unwrap_or_else(|_| Recipe {
                    board_no,
                    title: form.title.clone(),
                    content: form.content.clone(),
                    category_no: form.category_no,
                    writer: None,
                });
                if let Some(entry) = state.items.iter_mut().find(|r| r.board_no == board_no) {
                    *entry = confirmed.clone();
                }
                if state
                    .selected
                    .as_ref()
                    .is_some_and(|r| r.board_no == board_no)
                {
                    state.selected = Some(confirmed);
                }
                true
            }
            Err(error) => {
                state.error = error.server_message();
                false
            }
        }
    }

    /// Deletes a recipe. The list entry and a matching `selected` are
    /// removed only after server confirmation.
    pub async fn delete(&self, board_no: u64) -> bool {
        if let Err(error) = validate_board_no(board_no) {
            self.store_error(error.to_string()).await;
            return false;
        }

        self.begin().await;
        let result = self
            .client
            .send(ApiRequest::delete(format!("/recipes/{board_no}")))
            .await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(_) => {
                state.items.retain(|r| r.board_no != board_no);
                if state
                    .selected
                    .as_ref()
                    .is_some_and(|r| r.board_no == board_no)
                {
                    state.selected = None;
                }
                true
            }
            Err(error) => {
                state.error = error.server_message();
                false
            }
        }
    }

    async fn begin(&self) {
        let mut state = self.state.write().await;
        state.loading = true;
        state.error.clear();
    }

    async fn store_error(&self, message: String) {
        let mut state = self.state.write().await;
        state.loading = false;
        state.error = message;
    }
}

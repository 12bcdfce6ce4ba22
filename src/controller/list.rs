//! Paginated, searchable, filterable list of one resource.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::api::types::entity_id;
use crate::api::{ApiError, ListPage, ListQuery, Metadata, Resource};
use crate::config::Credential;
use crate::controller::catalog::{self, Column};
use crate::controller::{ActionRequest, ConfirmPrompt, DetailAction};
use crate::ui::fetch::{
    FetchIntent, FetchReducer, FetchState, MutationIntent, MutationKind, MutationReducer,
    MutationState,
};
use crate::ui::mvi::Reducer;
use crate::ui::notice::Notice;
use crate::ui::pagination::{row_offset, show_pager, total_pages, PageSize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub page: u32,
    pub page_size: PageSize,
    pub keyword: String,
    pub filters: BTreeMap<String, String>,
}

impl QueryParams {
    /// Page 1, no keyword, every filter at its default option.
    pub fn new(resource: Resource, page_size: PageSize) -> Self {
        let filters = resource
            .filters()
            .iter()
            .map(|filter| (filter.key.to_string(), filter.default_value().to_string()))
            .collect();
        Self {
            page: 1,
            page_size,
            keyword: String::new(),
            filters,
        }
    }

    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            keyword: self.keyword.clone(),
            result_per_page: self.page_size.as_u32(),
            current_page: self.page,
            filters: self.filters.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub resource: Resource,
    pub generation: u64,
    pub query: ListQuery,
    pub credential: Credential,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub resource: Resource,
    pub id: String,
    pub credential: Credential,
}

/// Everything a list fetch depends on. A new key means a new request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DepsKey {
    credential: Credential,
    params: QueryParams,
    delete_toggle: bool,
    unlock_toggle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    Skeleton(usize),
    Empty,
    Rows(Vec<ListRow>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub number: u64,
    pub id: Option<String>,
    pub cells: Vec<String>,
    /// The row offers the list's row action (unlock on locked users).
    pub actionable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterView {
    pub label: &'static str,
    pub value: &'static str,
}

/// Render model of a list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub title: &'static str,
    /// Number of entities matching search and filters.
    pub badge: Option<u64>,
    pub headers: Vec<&'static str>,
    pub body: ListBody,
    pub page: u32,
    pub page_size: PageSize,
    pub total_pages: u64,
    pub show_pager: bool,
    pub keyword: String,
    pub search_draft: String,
    pub filters: Vec<FilterView>,
    pub selected: Option<usize>,
    pub deleting: bool,
    /// Label of the per-row action, when the resource has one.
    pub row_action: Option<&'static str>,
    pub unlocking: bool,
}

pub struct ListController {
    resource: Resource,
    credential: Option<Credential>,
    params: QueryParams,
    search_draft: String,
    delete_toggle: bool,
    state: FetchState<ListPage>,
    delete: MutationState,
    pending_delete: Option<String>,
    unlock_toggle: bool,
    unlock: MutationState,
    pending_unlock: Option<String>,
    selected: usize,
    last_issued: Option<DepsKey>,
}

impl ListController {
    pub fn new(resource: Resource, page_size: PageSize, credential: Option<Credential>) -> Self {
        Self {
            resource,
            credential,
            params: QueryParams::new(resource, page_size),
            search_draft: String::new(),
            delete_toggle: false,
            state: FetchState::default(),
            delete: MutationState::new(MutationKind::Delete),
            pending_delete: None,
            unlock_toggle: false,
            unlock: MutationState::new(MutationKind::Unlock),
            pending_unlock: None,
            selected: 0,
            last_issued: None,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn state(&self) -> &FetchState<ListPage> {
        &self.state
    }

    pub fn delete_state(&self) -> &MutationState {
        &self.delete
    }

    pub fn unlock_state(&self) -> &MutationState {
        &self.unlock
    }

    pub fn search_draft(&self) -> &str {
        &self.search_draft
    }

    pub fn set_credential(&mut self, credential: Option<Credential>) {
        self.credential = credential;
    }

    /// Issue a fetch if anything the list depends on changed since the
    /// last one. Mounting counts as a change.
    pub fn poll_effect(&mut self) -> Option<ListRequest> {
        let credential = self.credential.clone()?;
        let key = DepsKey {
            credential: credential.clone(),
            params: self.params.clone(),
            delete_toggle: self.delete_toggle,
            unlock_toggle: self.unlock_toggle,
        };
        if self.last_issued.as_ref() == Some(&key) {
            return None;
        }
        self.last_issued = Some(key);

        let generation = self.state.next_generation();
        self.dispatch(FetchIntent::Request { generation });
        tracing::debug!(
            resource = %self.resource,
            page = self.params.page,
            page_size = self.params.page_size.as_u32(),
            keyword = %self.params.keyword,
            generation,
            "list fetch"
        );
        Some(ListRequest {
            resource: self.resource,
            generation,
            query: self.params.to_query(),
            credential,
        })
    }

    /// Feed back the outcome of a [`ListRequest`]. Returns a notice on failure.
    pub fn on_list_result(
        &mut self,
        generation: u64,
        result: Result<ListPage, ApiError>,
    ) -> Option<Notice> {
        let current = generation == self.state.generation;
        match result {
            Ok(page) => {
                let mut extra = Metadata::new();
                extra.insert(
                    self.resource.count_key().to_string(),
                    Value::from(page.total_count),
                );
                self.dispatch(FetchIntent::Success {
                    generation,
                    data: page,
                    extra,
                });
                self.clamp_selection();
                None
            }
            Err(err) => {
                let message = err.user_message();
                self.dispatch(FetchIntent::Fail {
                    generation,
                    message: message.clone(),
                });
                current.then(|| Notice::error(message))
            }
        }
    }

    /// Forget the last issued fetch so the next poll sends it again.
    pub fn refetch(&mut self) {
        self.last_issued = None;
    }

    pub fn set_page(&mut self, page: u32) {
        let mut page = page.max(1);
        if let Some(data) = &self.state.data {
            let last = total_pages(data.filtered_count, self.params.page_size).max(1);
            page = page.min(u32::try_from(last).unwrap_or(u32::MAX));
        }
        if page != self.params.page {
            self.params.page = page;
            self.selected = 0;
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.params.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.params.page.saturating_sub(1));
    }

    /// Changing the page size starts over at page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        if page_size == self.params.page_size {
            return;
        }
        self.params.page_size = page_size;
        self.params.page = 1;
        self.selected = 0;
    }

    /// Set a select filter. Unknown keys or options are ignored.
    pub fn set_filter(&mut self, key: &str, value: &str) -> bool {
        let Some(spec) = self.resource.filters().iter().find(|f| f.key == key) else {
            return false;
        };
        if !spec.options.iter().any(|(option, _)| *option == value) {
            return false;
        }
        if self.params.filters.get(key).map(String::as_str) != Some(value) {
            self.params.filters.insert(key.to_string(), value.to_string());
            self.params.page = 1;
            self.selected = 0;
        }
        true
    }

    /// Advance the filter at `index` to its next option.
    pub fn cycle_filter(&mut self, index: usize) {
        let Some(spec) = self.resource.filters().get(index) else {
            return;
        };
        if spec.options.is_empty() {
            return;
        }
        let current = self
            .params
            .filters
            .get(spec.key)
            .map(String::as_str)
            .unwrap_or(spec.default_value());
        let position = spec
            .options
            .iter()
            .position(|(option, _)| *option == current)
            .unwrap_or(0);
        let (next, _) = spec.options[(position + 1) % spec.options.len()];
        self.set_filter(spec.key, next);
    }

    /// Edit the search box. Nothing is fetched until [`Self::submit_search`].
    pub fn type_search(&mut self, ch: char) {
        self.search_draft.push(ch);
    }

    pub fn backspace_search(&mut self) {
        self.search_draft.pop();
    }

    pub fn submit_search(&mut self) {
        if self.search_draft != self.params.keyword {
            self.params.keyword = self.search_draft.clone();
            self.params.page = 1;
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        let rows = self.row_count();
        if rows > 0 {
            self.selected = (self.selected + 1) % rows;
        }
    }

    pub fn select_prev(&mut self) {
        let rows = self.row_count();
        if rows > 0 {
            self.selected = (self.selected + rows - 1) % rows;
        }
    }

    pub fn selected_id(&self) -> Option<String> {
        self.state
            .ready()?
            .items
            .get(self.selected)
            .and_then(entity_id)
            .map(str::to_string)
    }

    /// Ask before deleting. `None` when the resource cannot be deleted.
    pub fn request_delete(&mut self, id: &str) -> Option<ConfirmPrompt> {
        if !self.resource.can_delete() || self.delete.loading {
            return None;
        }
        self.pending_delete = Some(id.to_string());
        Some(ConfirmPrompt {
            title: format!("Delete {}", self.resource.singular()),
            message: self.resource.delete_prompt(),
        })
    }

    /// Answer the pending prompt. Declining sends nothing.
    pub fn confirm_delete(&mut self, accept: bool) -> Option<DeleteRequest> {
        let id = self.pending_delete.take()?;
        if !accept {
            tracing::debug!(resource = %self.resource, %id, "delete declined");
            return None;
        }
        let credential = self.credential.clone()?;
        self.dispatch_delete(MutationIntent::Request);
        Some(DeleteRequest {
            resource: self.resource,
            id,
            credential,
        })
    }

    /// On success the delete toggle flips, which triggers exactly one refetch.
    pub fn on_delete_result(&mut self, result: Result<(), ApiError>) -> Notice {
        match result {
            Ok(()) => {
                self.dispatch_delete(MutationIntent::Success);
                self.delete_toggle = !self.delete_toggle;
                Notice::success(format!(
                    "{} Deleted Successfully",
                    self.resource.singular()
                ))
            }
            Err(err) => {
                let message = err.user_message();
                self.dispatch_delete(MutationIntent::Fail {
                    message: message.clone(),
                });
                Notice::error(message)
            }
        }
    }

    /// Unlocking is offered on user rows whose account is locked.
    pub fn can_unlock(&self, id: &str) -> bool {
        self.resource == Resource::User
            && self.state.ready().is_some_and(|data| {
                data.items
                    .iter()
                    .any(|entity| entity_id(entity) == Some(id) && is_locked(entity))
            })
    }

    /// Ask before unlocking. `None` when the row is not locked.
    pub fn request_unlock(&mut self, id: &str) -> Option<ConfirmPrompt> {
        if self.unlock.loading || !self.can_unlock(id) {
            return None;
        }
        self.pending_unlock = Some(id.to_string());
        Some(DetailAction::Unlock.prompt(self.resource))
    }

    /// Answer the pending unlock prompt. Declining sends nothing.
    pub fn confirm_unlock(&mut self, accept: bool) -> Option<ActionRequest> {
        let id = self.pending_unlock.take()?;
        if !accept {
            tracing::debug!(resource = %self.resource, %id, "unlock declined");
            return None;
        }
        let credential = self.credential.clone()?;
        self.dispatch_unlock(MutationIntent::Request);
        Some(ActionRequest {
            action: DetailAction::Unlock,
            resource: self.resource,
            id,
            credential,
        })
    }

    /// On success the unlock toggle flips, which triggers exactly one refetch.
    pub fn on_unlock_result(&mut self, result: Result<String, ApiError>) -> Notice {
        match result {
            Ok(message) => {
                self.dispatch_unlock(MutationIntent::Success);
                self.unlock_toggle = !self.unlock_toggle;
                if message.trim().is_empty() {
                    Notice::success(DetailAction::Unlock.success_message())
                } else {
                    Notice::success(message)
                }
            }
            Err(err) => {
                let message = err.user_message();
                self.dispatch_unlock(MutationIntent::Fail {
                    message: message.clone(),
                });
                Notice::error(message)
            }
        }
    }

    pub fn view(&self) -> ListView {
        let columns = catalog::columns(self.resource);
        let page_size = self.params.page_size;
        let filtered = self.state.data.as_ref().map(|data| data.filtered_count);

        let body = if self.state.loading {
            ListBody::Skeleton(page_size.as_u32() as usize)
        } else if let Some(message) = self.state.failure() {
            ListBody::Error(message.to_string())
        } else {
            match &self.state.data {
                Some(data) if !data.items.is_empty() => {
                    let offset = row_offset(self.params.page, page_size);
                    ListBody::Rows(
                        data.items
                            .iter()
                            .enumerate()
                            .map(|(index, entity)| ListRow {
                                number: offset + index as u64 + 1,
                                id: entity_id(entity).map(str::to_string),
                                cells: render_cells(entity, columns),
                                actionable: self.resource == Resource::User
                                    && is_locked(entity),
                            })
                            .collect(),
                    )
                }
                _ => ListBody::Empty,
            }
        };

        let selected = match &body {
            ListBody::Rows(rows) if !rows.is_empty() => Some(self.selected.min(rows.len() - 1)),
            _ => None,
        };

        let filters = self
            .resource
            .filters()
            .iter()
            .map(|spec| {
                let value = self
                    .params
                    .filters
                    .get(spec.key)
                    .and_then(|current| {
                        spec.options
                            .iter()
                            .find(|(option, _)| *option == current.as_str())
                            .map(|(_, label)| *label)
                    })
                    .unwrap_or("All");
                FilterView {
                    label: spec.label,
                    value,
                }
            })
            .collect();

        ListView {
            title: self.resource.plural(),
            badge: filtered,
            headers: columns.iter().map(|column| column.header).collect(),
            body,
            page: self.params.page,
            page_size,
            total_pages: filtered.map(|f| total_pages(f, page_size)).unwrap_or(0),
            show_pager: filtered.is_some_and(|f| show_pager(page_size, f)),
            keyword: self.params.keyword.clone(),
            search_draft: self.search_draft.clone(),
            filters,
            selected,
            deleting: self.delete.loading,
            row_action: (self.resource == Resource::User).then_some("Unlock"),
            unlocking: self.unlock.loading,
        }
    }

    fn row_count(&self) -> usize {
        self.state.ready().map(|data| data.items.len()).unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        let rows = self.row_count();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
    }

    fn dispatch(&mut self, intent: FetchIntent<ListPage>) {
        self.state = FetchReducer::<ListPage>::reduce(std::mem::take(&mut self.state), intent);
    }

    fn dispatch_delete(&mut self, intent: MutationIntent) {
        self.delete = MutationReducer::reduce(std::mem::take(&mut self.delete), intent);
    }

    fn dispatch_unlock(&mut self, intent: MutationIntent) {
        self.unlock = MutationReducer::reduce(std::mem::take(&mut self.unlock), intent);
    }
}

fn is_locked(entity: &Value) -> bool {
    entity.get("is_locked").and_then(Value::as_bool) == Some(true)
}

fn render_cells(entity: &Value, columns: &[Column]) -> Vec<String> {
    columns
        .iter()
        .map(|column| catalog::format_cell(entity, column.path, column.format))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn controller(resource: Resource) -> ListController {
        ListController::new(resource, PageSize::Ten, Some(Credential::new("tok")))
    }

    fn page_of(count: usize, filtered: u64) -> ListPage {
        ListPage {
            items: (0..count).map(|i| json!({"_id": format!("id{}", i)})).collect(),
            total_count: filtered,
            filtered_count: filtered,
        }
    }

    fn settle(list: &mut ListController, page: ListPage) {
        let request = list.poll_effect().expect("request");
        assert!(list.on_list_result(request.generation, Ok(page)).is_none());
    }

    #[test]
    fn mount_issues_exactly_one_request() {
        let mut list = controller(Resource::Vehicle);
        let request = list.poll_effect().expect("mount request");
        assert_eq!(request.query.current_page, 1);
        assert_eq!(request.query.result_per_page, 10);
        assert_eq!(request.query.keyword, "");
        assert!(list.poll_effect().is_none());
    }

    #[test]
    fn no_credential_no_request() {
        let mut list = ListController::new(Resource::User, PageSize::Ten, None);
        assert!(list.poll_effect().is_none());
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut list = controller(Resource::User);
        settle(&mut list, page_of(10, 40));
        list.set_page(3);
        settle(&mut list, page_of(10, 40));

        list.set_page_size(PageSize::Five);
        let request = list.poll_effect().expect("refetch");
        assert_eq!(request.query.result_per_page, 5);
        assert_eq!(request.query.current_page, 1);
        assert!(list.poll_effect().is_none());
    }

    #[test]
    fn typing_does_not_fetch_but_submit_does() {
        let mut list = controller(Resource::Vehicle);
        settle(&mut list, page_of(3, 3));

        for ch in "Toyota".chars() {
            list.type_search(ch);
            assert!(list.poll_effect().is_none());
        }
        list.submit_search();
        let request = list.poll_effect().expect("search request");
        assert_eq!(request.query.keyword, "Toyota");
        assert!(list.poll_effect().is_none());
    }

    #[test]
    fn filter_change_resets_page_and_fetches() {
        let mut list = controller(Resource::Transaction);
        settle(&mut list, page_of(10, 30));
        list.set_page(2);
        settle(&mut list, page_of(10, 30));

        assert!(list.set_filter("status", "REFUNDED"));
        let request = list.poll_effect().expect("filtered request");
        assert_eq!(request.query.current_page, 1);
        assert_eq!(
            request.query.filters.get("status").map(String::as_str),
            Some("REFUNDED")
        );
        assert!(!list.set_filter("status", "BOGUS"));
        assert!(!list.set_filter("nope", "all"));
    }

    #[test]
    fn rows_are_numbered_from_page_offset() {
        let mut list = controller(Resource::Bid);
        settle(&mut list, page_of(10, 25));
        list.set_page(3);
        settle(&mut list, page_of(5, 25));

        let view = list.view();
        match view.body {
            ListBody::Rows(rows) => {
                assert_eq!(rows[0].number, 21);
                assert_eq!(rows[4].number, 25);
            }
            other => panic!("expected rows, got {:?}", other),
        }
        assert_eq!(view.total_pages, 3);
        assert!(view.show_pager);
        assert_eq!(view.badge, Some(25));
    }

    #[test]
    fn loading_shows_skeleton_rows() {
        let mut list = controller(Resource::User);
        list.poll_effect();
        assert_eq!(list.view().body, ListBody::Skeleton(10));
    }

    #[test]
    fn empty_and_error_bodies() {
        let mut list = controller(Resource::User);
        settle(&mut list, page_of(0, 0));
        assert_eq!(list.view().body, ListBody::Empty);
        assert!(!list.view().show_pager);

        list.set_page_size(PageSize::Five);
        let request = list.poll_effect().expect("request");
        let notice = list.on_list_result(
            request.generation,
            Err(ApiError::Status {
                status: 500,
                message: "Server down".to_string(),
            }),
        );
        assert!(notice.is_some());
        assert_eq!(list.view().body, ListBody::Error("Server down".to_string()));
    }

    #[test]
    fn stale_page_is_ignored() {
        let mut list = controller(Resource::User);
        let first = list.poll_effect().expect("first");
        list.set_page_size(PageSize::Fifteen);
        let second = list.poll_effect().expect("second");

        list.on_list_result(second.generation, Ok(page_of(2, 2)));
        let notice = list.on_list_result(
            first.generation,
            Err(ApiError::Network {
                message: "late".to_string(),
            }),
        );
        assert!(notice.is_none());
        assert!(matches!(list.view().body, ListBody::Rows(ref rows) if rows.len() == 2));
    }

    #[test]
    fn confirmed_delete_sends_one_delete_then_one_refetch() {
        let mut list = controller(Resource::User);
        settle(&mut list, page_of(3, 3));

        let prompt = list.request_delete("abc123").expect("prompt");
        assert!(prompt.message.contains("delete this User"));
        let delete = list.confirm_delete(true).expect("delete request");
        assert_eq!(delete.id, "abc123");
        assert!(list.delete_state().loading);
        assert!(list.poll_effect().is_none());

        let notice = list.on_delete_result(Ok(()));
        assert_eq!(notice, Notice::success("User Deleted Successfully"));
        assert!(list.poll_effect().is_some());
        assert!(list.poll_effect().is_none());
    }

    #[test]
    fn declined_delete_sends_nothing() {
        let mut list = controller(Resource::Vehicle);
        settle(&mut list, page_of(3, 3));
        let prompt = list.request_delete("c1").expect("prompt");
        assert!(prompt.message.contains("related auctions"));
        assert!(list.confirm_delete(false).is_none());
        assert!(list.poll_effect().is_none());
        assert!(list.delete_state().error.is_none());
    }

    #[test]
    fn failed_delete_keeps_table() {
        let mut list = controller(Resource::Auction);
        settle(&mut list, page_of(3, 3));
        list.request_delete("a1");
        list.confirm_delete(true);
        let notice = list.on_delete_result(Err(ApiError::Status {
            status: 404,
            message: "Auction not found".to_string(),
        }));
        assert_eq!(notice, Notice::error("Auction not found"));
        assert!(list.poll_effect().is_none());
        assert!(matches!(list.view().body, ListBody::Rows(_)));
    }

    #[test]
    fn locked_user_row_unlocks_then_refetches_once() {
        let mut list = controller(Resource::User);
        settle(
            &mut list,
            ListPage {
                items: vec![
                    json!({"_id": "u1", "is_locked": true}),
                    json!({"_id": "u2", "is_locked": false}),
                ],
                total_count: 2,
                filtered_count: 2,
            },
        );
        match list.view().body {
            ListBody::Rows(rows) => {
                assert!(rows[0].actionable);
                assert!(!rows[1].actionable);
            }
            other => panic!("expected rows, got {:?}", other),
        }
        assert!(list.request_unlock("u2").is_none());

        let prompt = list.request_unlock("u1").expect("prompt");
        assert_eq!(prompt.title, "Unlock User");
        let request = list.confirm_unlock(true).expect("unlock request");
        assert_eq!(request.action, DetailAction::Unlock);
        assert_eq!(request.id, "u1");
        assert!(list.unlock_state().loading);
        assert!(list.request_unlock("u1").is_none());
        assert!(list.poll_effect().is_none());

        let notice = list.on_unlock_result(Ok(String::new()));
        assert_eq!(notice, Notice::success("User unlocked successfully"));
        assert!(!list.unlock_state().loading);
        assert!(list.poll_effect().is_some());
        assert!(list.poll_effect().is_none());
    }

    #[test]
    fn declined_or_failed_unlock_leaves_list_alone() {
        let mut list = controller(Resource::User);
        settle(
            &mut list,
            ListPage {
                items: vec![json!({"_id": "u1", "is_locked": true})],
                total_count: 1,
                filtered_count: 1,
            },
        );
        list.request_unlock("u1").expect("prompt");
        assert!(list.confirm_unlock(false).is_none());
        assert!(list.poll_effect().is_none());

        list.request_unlock("u1").expect("prompt");
        list.confirm_unlock(true).expect("unlock request");
        let notice = list.on_unlock_result(Err(ApiError::Status {
            status: 404,
            message: "User not found".to_string(),
        }));
        assert_eq!(notice, Notice::error("User not found"));
        assert!(list.poll_effect().is_none());
    }

    #[test]
    fn only_user_lists_offer_unlock() {
        let mut list = controller(Resource::Vehicle);
        settle(
            &mut list,
            ListPage {
                items: vec![json!({"_id": "c1", "is_locked": true})],
                total_count: 1,
                filtered_count: 1,
            },
        );
        assert!(list.request_unlock("c1").is_none());
        assert_eq!(list.view().row_action, None);
    }

    #[test]
    fn refetch_reissues_the_same_query() {
        let mut list = controller(Resource::Bid);
        let first = list.poll_effect().expect("mount");
        list.refetch();
        let second = list.poll_effect().expect("refetch");
        assert_eq!(first.query, second.query);
        assert!(second.generation > first.generation);
    }

    #[test]
    fn transactions_cannot_be_deleted() {
        let mut list = controller(Resource::Transaction);
        assert!(list.request_delete("t1").is_none());
    }
}

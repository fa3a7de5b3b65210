//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::api::normalize_name;
use crate::effect::Effect;
use crate::error::FetchError;
use crate::state::{AppState, DetailState, Favorites, FetchOrdering, FocusArea, ListStatus};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let cursor = state.settings.start_cursor.clone();
            start_page(state, cursor)
        }

        Action::PageNext => {
            let Some(cursor) = state.cursors.next.clone() else {
                return DispatchResult::unchanged();
            };
            start_page(state, cursor)
        }

        Action::PagePrev => {
            let Some(cursor) = state.cursors.previous.clone() else {
                return DispatchResult::unchanged();
            };
            start_page(state, cursor)
        }

        Action::PageDidLoad { seq, page } => {
            if is_stale(state.settings.ordering, seq, state.list_seq) {
                tracing::debug!(seq, latest = state.list_seq, "dropping stale page");
                return DispatchResult::unchanged();
            }
            state.list = page.items;
            state.cursors = page.cursors;
            state.list_status = ListStatus::Loaded;
            state.selected_index = 0;
            state.error = None;
            DispatchResult::changed()
        }

        Action::PageDidError { seq, error } => {
            if is_stale(state.settings.ordering, seq, state.list_seq) {
                tracing::debug!(seq, latest = state.list_seq, "dropping stale page error");
                return DispatchResult::unchanged();
            }
            state.list_status = ListStatus::Errored;
            state.error = Some(list_error_message(&error));
            DispatchResult::changed()
        }

        Action::DetailOpen(name) => open_detail(state, &name),

        Action::DetailClose => {
            if matches!(state.detail, DetailState::Closed | DetailState::Failed { .. }) {
                return DispatchResult::unchanged();
            }
            state.detail = DetailState::Closed;
            // fences out a lookup still in flight under LatestIssued
            state.detail_seq += 1;
            DispatchResult::changed()
        }

        Action::DetailDidLoad { seq, detail } => {
            if is_stale(state.settings.ordering, seq, state.detail_seq) {
                tracing::debug!(seq, latest = state.detail_seq, "dropping stale detail");
                return DispatchResult::unchanged();
            }
            state.detail = DetailState::Open(Box::new(detail));
            DispatchResult::changed()
        }

        Action::DetailDidError { seq, name, error } => {
            if is_stale(state.settings.ordering, seq, state.detail_seq) {
                tracing::debug!(seq, latest = state.detail_seq, "dropping stale detail error");
                return DispatchResult::unchanged();
            }
            state.error = Some(detail_error_message(&name, &error));
            state.detail = match std::mem::take(&mut state.detail) {
                DetailState::Opening {
                    previous: Some(previous),
                    ..
                } => DetailState::Open(previous),
                DetailState::Open(detail) => DetailState::Open(detail),
                _ => DetailState::Failed { name },
            };
            DispatchResult::changed()
        }

        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.query.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            let query = state.search.query.trim().to_string();
            if query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            open_detail(state, &query)
        }

        Action::FavoriteToggle(name) => {
            if name.is_empty() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed_with(Effect::ToggleFavorite { name })
        }

        Action::FavoritesDidChange(names) => {
            state.favorites = Favorites::new(names);
            if state.favorite_index >= state.favorites.len() {
                state.favorite_index = state.favorites.len().saturating_sub(1);
            }
            if state.favorites.is_empty() && state.focus == FocusArea::Favorites {
                state.focus = FocusArea::Grid;
            }
            DispatchResult::changed()
        }

        Action::ThemeToggle => DispatchResult::changed_with(Effect::ToggleTheme),

        Action::ThemeDidChange(dark) => {
            if state.dark == dark {
                return DispatchResult::unchanged();
            }
            state.dark = dark;
            DispatchResult::changed()
        }

        Action::StorageDidError(message) => {
            state.error = Some(message);
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let index = clamp_index(state.selected_index, state.list.len(), delta);
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SelectionRow(delta) => {
            let step = delta.saturating_mul(state.grid_columns() as i16);
            let index = clamp_index(state.selected_index, state.list.len(), step);
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::FavoriteSelect(index) => {
            if index >= state.favorites.len() || index == state.favorite_index {
                return DispatchResult::unchanged();
            }
            state.favorite_index = index;
            DispatchResult::changed()
        }

        Action::FocusNext => {
            let next = match state.focus {
                FocusArea::Grid => FocusArea::Favorites,
                FocusArea::Favorites => FocusArea::Grid,
            };
            set_focus(state, next)
        }

        Action::FocusSet(area) => set_focus(state, area),

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            if !state.is_animating() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn start_page(state: &mut AppState, cursor: String) -> DispatchResult<Effect> {
    state.list_seq += 1;
    state.list_status = ListStatus::Loading;
    state.current_cursor = Some(cursor.clone());
    state.error = None;
    state.tick = 0;
    DispatchResult::changed_with(Effect::LoadPage {
        seq: state.list_seq,
        cursor,
    })
}

fn open_detail(state: &mut AppState, name: &str) -> DispatchResult<Effect> {
    let name = normalize_name(name);
    if name.is_empty() {
        return DispatchResult::unchanged();
    }
    state.detail_seq += 1;
    let previous = match std::mem::take(&mut state.detail) {
        DetailState::Open(detail) => Some(detail),
        DetailState::Opening { previous, .. } => previous,
        DetailState::Closed | DetailState::Failed { .. } => None,
    };
    state.detail = DetailState::Opening {
        name: name.clone(),
        previous,
    };
    state.error = None;
    DispatchResult::changed_with(Effect::LoadDetail {
        seq: state.detail_seq,
        name,
    })
}

fn set_focus(state: &mut AppState, area: FocusArea) -> DispatchResult<Effect> {
    if state.focus == area || (area == FocusArea::Favorites && state.favorites.is_empty()) {
        return DispatchResult::unchanged();
    }
    state.focus = area;
    DispatchResult::changed()
}

fn is_stale(ordering: FetchOrdering, seq: u64, latest: u64) -> bool {
    ordering == FetchOrdering::LatestIssued && seq != latest
}

fn list_error_message(error: &FetchError) -> String {
    match error.status() {
        Some(status) => format!("Failed to load list ({status})"),
        None => format!("Failed to load list: {error}"),
    }
}

fn detail_error_message(name: &str, error: &FetchError) -> String {
    if error.is_not_found() {
        "Pokémon not found".to_string()
    } else {
        format!("Could not load {name}: {error}")
    }
}

fn clamp_index(current: usize, len: usize, delta: i16) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as i64 + delta as i64;
    next.clamp(0, len as i64 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CatalogEntry, CatalogPage, EntryDetail, ImageUrls, PageCursors};
    use pretty_assertions::assert_eq;

    fn page(count: usize, next: Option<&str>, previous: Option<&str>) -> CatalogPage {
        CatalogPage {
            items: (1..=count)
                .map(|id| CatalogEntry {
                    name: format!("mon-{id}"),
                    url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
                })
                .collect(),
            cursors: PageCursors {
                next: next.map(str::to_string),
                previous: previous.map(str::to_string),
            },
        }
    }

    fn detail(name: &str) -> EntryDetail {
        EntryDetail {
            id: 1,
            name: name.to_string(),
            images: ImageUrls::default(),
            categories: vec!["grass".into()],
            abilities: vec![],
            base_stats: vec![],
            height_decimetres: 7,
            weight_hectograms: 69,
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        reducer(
            &mut state,
            Action::PageDidLoad {
                seq: 1,
                page: page(24, Some("https://next"), None),
            },
        );
        state
    }

    #[test]
    fn init_loads_first_page() {
        let mut state = AppState::default();
        assert_eq!(state.list_status, ListStatus::Idle);

        let result = reducer(&mut state, Action::Init);

        assert!(result.changed);
        assert!(state.is_list_loading());
        assert_eq!(
            result.effects,
            vec![Effect::LoadPage {
                seq: 1,
                cursor: "https://pokeapi.co/api/v2/pokemon?limit=24&offset=0".into(),
            }]
        );
    }

    #[test]
    fn page_load_replaces_list_and_clears_error() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Init);
        state.error = Some("old".into());

        reducer(
            &mut state,
            Action::PageDidLoad {
                seq: 1,
                page: page(24, Some("https://next"), None),
            },
        );

        assert_eq!(state.list_status, ListStatus::Loaded);
        assert_eq!(state.list.len(), 24);
        assert!(state.can_page_next());
        assert!(!state.can_page_prev());
        assert_eq!(state.error, None);
    }

    #[test]
    fn page_error_keeps_previous_list() {
        let mut state = loaded_state();
        reducer(&mut state, Action::PageNext);

        reducer(
            &mut state,
            Action::PageDidError {
                seq: 2,
                error: FetchError::Status { status: 500 },
            },
        );

        assert_eq!(state.list_status, ListStatus::Errored);
        assert_eq!(state.list.len(), 24);
        assert_eq!(state.error.as_deref(), Some("Failed to load list (500)"));
    }

    #[test]
    fn paging_without_cursor_is_noop() {
        let mut state = loaded_state();
        let result = reducer(&mut state, Action::PagePrev);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.list_status, ListStatus::Loaded);
    }

    #[test]
    fn paging_uses_cursor_verbatim() {
        let mut state = loaded_state();
        let result = reducer(&mut state, Action::PageNext);
        assert_eq!(
            result.effects,
            vec![Effect::LoadPage {
                seq: 2,
                cursor: "https://next".into(),
            }]
        );
        assert!(state.is_list_loading());
        assert_eq!(state.list.len(), 24);
    }

    #[test]
    fn empty_search_submit_is_noop() {
        let mut state = loaded_state();
        reducer(&mut state, Action::SearchStart);
        reducer(&mut state, Action::SearchInput(' '));
        let before = state.detail_seq;

        let result = reducer(&mut state, Action::SearchSubmit);

        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert!(state.search.active);
        assert_eq!(state.detail_seq, before);
    }

    #[test]
    fn search_submit_opens_normalized_name() {
        let mut state = loaded_state();
        reducer(&mut state, Action::SearchStart);
        for ch in " Pikachu ".chars() {
            reducer(&mut state, Action::SearchInput(ch));
        }

        let result = reducer(&mut state, Action::SearchSubmit);

        assert!(!state.search.active);
        assert_eq!(
            result.effects,
            vec![Effect::LoadDetail {
                seq: 1,
                name: "pikachu".into(),
            }]
        );
        assert!(state.detail.is_opening());
    }

    #[test]
    fn failed_lookup_never_opens_empty_modal() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("missing-name-xyz".into()));

        reducer(
            &mut state,
            Action::DetailDidError {
                seq: 1,
                name: "missing-name-xyz".into(),
                error: FetchError::NotFound {
                    name: "missing-name-xyz".into(),
                },
            },
        );

        assert!(!state.is_modal_open());
        assert!(matches!(state.detail, DetailState::Failed { .. }));
        assert_eq!(state.error.as_deref(), Some("Pokémon not found"));
        assert_eq!(state.list.len(), 24);
        assert_eq!(state.list_status, ListStatus::Loaded);
    }

    #[test]
    fn failed_lookup_restores_open_detail() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("bulbasaur".into()));
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail("bulbasaur"),
            },
        );
        reducer(&mut state, Action::DetailOpen("nope".into()));
        assert_eq!(state.detail.shown().map(|d| d.name.as_str()), Some("bulbasaur"));

        reducer(
            &mut state,
            Action::DetailDidError {
                seq: 2,
                name: "nope".into(),
                error: FetchError::Network("reset".into()),
            },
        );

        assert!(matches!(&state.detail, DetailState::Open(d) if d.name == "bulbasaur"));
        assert_eq!(
            state.error.as_deref(),
            Some("Could not load nope: Network error: reset")
        );
    }

    #[test]
    fn close_discards_detail() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("bulbasaur".into()));
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail("bulbasaur"),
            },
        );

        assert!(reducer(&mut state, Action::DetailClose).changed);
        assert_eq!(state.detail, DetailState::Closed);
        assert!(!reducer(&mut state, Action::DetailClose).changed);
    }

    #[test]
    fn last_resolved_detail_wins_by_default() {
        let mut state = loaded_state();
        reducer(&mut state, Action::DetailOpen("bulbasaur".into()));
        reducer(&mut state, Action::DetailOpen("charmander".into()));

        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 2,
                detail: detail("charmander"),
            },
        );
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail("bulbasaur"),
            },
        );

        assert_eq!(state.detail.shown().map(|d| d.name.as_str()), Some("bulbasaur"));
    }

    #[test]
    fn latest_issued_ordering_drops_stale_results() {
        let mut state = loaded_state();
        state.settings.ordering = FetchOrdering::LatestIssued;
        reducer(&mut state, Action::DetailOpen("bulbasaur".into()));
        reducer(&mut state, Action::DetailOpen("charmander".into()));

        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 2,
                detail: detail("charmander"),
            },
        );
        let result = reducer(
            &mut state,
            Action::DetailDidLoad {
                seq: 1,
                detail: detail("bulbasaur"),
            },
        );

        assert!(!result.changed);
        assert_eq!(state.detail.shown().map(|d| d.name.as_str()), Some("charmander"));
    }

    #[test]
    fn latest_issued_ordering_drops_stale_pages() {
        let mut state = loaded_state();
        state.settings.ordering = FetchOrdering::LatestIssued;
        reducer(&mut state, Action::PageNext);
        reducer(&mut state, Action::PageNext);

        let result = reducer(
            &mut state,
            Action::PageDidLoad {
                seq: 2,
                page: page(3, None, Some("https://prev")),
            },
        );

        assert!(!result.changed);
        assert!(state.is_list_loading());
        assert_eq!(state.list.len(), 24);
    }

    #[test]
    fn favorite_toggle_goes_through_store() {
        let mut state = loaded_state();
        let result = reducer(&mut state, Action::FavoriteToggle("pikachu".into()));
        assert_eq!(
            result.effects,
            vec![Effect::ToggleFavorite {
                name: "pikachu".into()
            }]
        );
        assert!(!state.favorites.contains("pikachu"));

        reducer(&mut state, Action::FavoritesDidChange(vec!["pikachu".into()]));
        assert!(state.favorites.contains("pikachu"));
    }

    #[test]
    fn emptied_favorites_return_focus_to_grid() {
        let mut state = loaded_state();
        reducer(&mut state, Action::FavoritesDidChange(vec!["a".into(), "b".into()]));
        reducer(&mut state, Action::FocusNext);
        reducer(&mut state, Action::FavoriteSelect(1));
        assert_eq!(state.focus, FocusArea::Favorites);

        reducer(&mut state, Action::FavoritesDidChange(vec!["a".into()]));
        assert_eq!(state.favorite_index, 0);
        reducer(&mut state, Action::FavoritesDidChange(vec![]));
        assert_eq!(state.focus, FocusArea::Grid);
    }

    #[test]
    fn focus_skips_empty_favorites() {
        let mut state = loaded_state();
        assert!(!reducer(&mut state, Action::FocusNext).changed);
        assert_eq!(state.focus, FocusArea::Grid);
    }

    #[test]
    fn theme_toggle_goes_through_store() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::ThemeToggle);
        assert_eq!(result.effects, vec![Effect::ToggleTheme]);
        assert!(!state.dark);

        assert!(reducer(&mut state, Action::ThemeDidChange(true)).changed);
        assert!(state.dark);
        assert!(!reducer(&mut state, Action::ThemeDidChange(true)).changed);
    }

    #[test]
    fn selection_moves_by_row() {
        let mut state = loaded_state();
        state.terminal_size = (90, 30);
        let columns = state.grid_columns();

        reducer(&mut state, Action::SelectionRow(1));
        assert_eq!(state.selected_index, columns);
        reducer(&mut state, Action::SelectionMove(-1));
        assert_eq!(state.selected_index, columns - 1);
        reducer(&mut state, Action::SelectionRow(-5));
        assert_eq!(state.selected_index, 0);
        reducer(&mut state, Action::SelectionMove(100));
        assert_eq!(state.selected_index, 23);
    }

    #[test]
    fn tick_only_changes_while_loading() {
        let mut state = loaded_state();
        assert!(!reducer(&mut state, Action::Tick).changed);

        reducer(&mut state, Action::PageNext);
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick, 1);
    }

    #[test]
    fn clamp_index_bounds() {
        assert_eq!(clamp_index(0, 0, 5), 0);
        assert_eq!(clamp_index(2, 5, -10), 0);
        assert_eq!(clamp_index(2, 5, 10), 4);
        assert_eq!(clamp_index(2, 5, 1), 3);
    }
}

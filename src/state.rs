//! Application state - single source of truth for what is rendered

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::api::{initial_cursor, DEFAULT_API_BASE, DEFAULT_PAGE_SIZE};

const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Terminal columns taken by one card in the grid.
pub const CARD_WIDTH: u16 = 22;
/// Placeholder cards drawn while a page is loading.
pub const SKELETON_CARDS: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
}

impl CatalogEntry {
    /// Numeric id taken from the last path segment of the entry URL.
    pub fn id(&self) -> Option<&str> {
        self.url.split('/').filter(|part| !part.is_empty()).last()
    }

    pub fn artwork_url(&self) -> Option<String> {
        self.id().map(|id| format!("{ARTWORK_BASE}/{id}.png"))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageCursors {
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogPage {
    pub items: Vec<CatalogEntry>,
    pub cursors: PageCursors,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageUrls {
    pub primary: Option<String>,
    pub fallback: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BaseStat {
    pub name: String,
    pub value: u16,
}

/// A base stat shaped for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatPoint {
    pub name: String,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntryDetail {
    pub id: u32,
    pub name: String,
    pub images: ImageUrls,
    pub categories: Vec<String>,
    pub abilities: Vec<String>,
    pub base_stats: Vec<BaseStat>,
    pub height_decimetres: u32,
    pub weight_hectograms: u32,
}

impl EntryDetail {
    /// High resolution artwork when the catalog has it, default sprite otherwise.
    pub fn image_url(&self) -> Option<&str> {
        self.images
            .primary
            .as_deref()
            .or(self.images.fallback.as_deref())
    }

    pub fn stat_points(&self) -> Vec<StatPoint> {
        self.base_stats
            .iter()
            .map(|stat| StatPoint {
                name: humanize(&stat.name),
                value: stat.value,
            })
            .collect()
    }

    pub fn height_metres(&self) -> f32 {
        self.height_decimetres as f32 / 10.0
    }

    pub fn weight_kilograms(&self) -> f32 {
        self.weight_hectograms as f32 / 10.0
    }
}

/// Replace catalog separators with spaces: `special-attack` -> `special attack`.
pub fn humanize(name: &str) -> String {
    name.replace(['-', '_'], " ")
}

/// Favorited names in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Favorites(Vec<String>);

impl Favorites {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut favorites = Self::default();
        for name in names {
            if !favorites.contains(&name) {
                favorites.0.push(name);
            }
        }
        favorites
    }

    /// Flip membership and return the new state.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(pos) = self.0.iter().position(|entry| entry == name) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(name.to_string());
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|entry| entry == name)
    }

    pub fn all(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How results of overlapping fetches of the same kind are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FetchOrdering {
    /// Apply every result as it arrives; the last one to resolve wins.
    #[default]
    LastResolved,
    /// Drop results whose request is no longer the latest issued.
    LatestIssued,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DetailState {
    #[default]
    Closed,
    /// Lookup in flight. `previous` is what the modal showed before, if anything.
    Opening {
        name: String,
        previous: Option<Box<EntryDetail>>,
    },
    Open(Box<EntryDetail>),
    /// Last lookup failed and there was nothing to fall back to.
    Failed { name: String },
}

impl DetailState {
    /// The detail currently shown in the modal, if the modal is up.
    pub fn shown(&self) -> Option<&EntryDetail> {
        match self {
            DetailState::Open(detail) => Some(detail),
            DetailState::Opening {
                previous: Some(detail),
                ..
            } => Some(detail),
            _ => None,
        }
    }

    pub fn is_opening(&self) -> bool {
        matches!(self, DetailState::Opening { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FocusArea {
    #[default]
    Grid,
    Favorites,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViewSettings {
    pub start_cursor: String,
    pub ordering: FetchOrdering,
}

impl ViewSettings {
    pub fn new(api_base: &str, page_size: u32, ordering: FetchOrdering) -> Self {
        Self {
            start_cursor: initial_cursor(api_base, page_size),
            ordering,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_PAGE_SIZE, FetchOrdering::default())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub settings: ViewSettings,
    pub terminal_size: (u16, u16),
    pub focus: FocusArea,

    pub list: Vec<CatalogEntry>,
    pub cursors: PageCursors,
    pub list_status: ListStatus,
    pub current_cursor: Option<String>,
    pub selected_index: usize,

    pub detail: DetailState,
    pub search: SearchState,

    pub favorites: Favorites,
    pub favorite_index: usize,
    pub dark: bool,

    /// Global banner, cleared by the next list load or detail open.
    pub error: Option<String>,

    /// Latest issued request numbers, per fetch kind.
    pub list_seq: u64,
    pub detail_seq: u64,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewSettings::default(), Favorites::default(), false)
    }
}

impl AppState {
    pub fn new(settings: ViewSettings, favorites: Favorites, dark: bool) -> Self {
        Self {
            settings,
            terminal_size: (80, 24),
            focus: FocusArea::Grid,
            list: Vec::new(),
            cursors: PageCursors::default(),
            list_status: ListStatus::Idle,
            current_cursor: None,
            selected_index: 0,
            detail: DetailState::Closed,
            search: SearchState::default(),
            favorites,
            favorite_index: 0,
            dark,
            error: None,
            list_seq: 0,
            detail_seq: 0,
            tick: 0,
        }
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.list.get(self.selected_index)
    }

    pub fn selected_favorite(&self) -> Option<&str> {
        self.favorites.get(self.favorite_index)
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.list.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.list.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn grid_columns(&self) -> usize {
        (self.terminal_size.0.saturating_sub(2) / CARD_WIDTH).max(1) as usize
    }

    pub fn is_list_loading(&self) -> bool {
        self.list_status == ListStatus::Loading
    }

    pub fn is_modal_open(&self) -> bool {
        self.detail.shown().is_some()
    }

    pub fn can_page_next(&self) -> bool {
        self.cursors.next.is_some()
    }

    pub fn can_page_prev(&self) -> bool {
        self.cursors.previous.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.is_list_loading() || self.detail.is_opening()
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("List")
                .entry("status", ron_string(&self.list_status))
                .entry("items", ron_string(&self.list.len()))
                .entry("cursor", ron_string(&self.current_cursor))
                .entry("next", ron_string(&self.cursors.next))
                .entry("previous", ron_string(&self.cursors.previous))
                .entry("selected", ron_string(&self.selected_index))
                .entry("seq", ron_string(&self.list_seq)),
            DebugSection::new("Detail")
                .entry(
                    "shown",
                    ron_string(&self.detail.shown().map(|detail| detail.name.clone())),
                )
                .entry("opening", ron_string(&self.detail.is_opening()))
                .entry("seq", ron_string(&self.detail_seq))
                .entry("ordering", ron_string(&self.settings.ordering)),
            DebugSection::new("Prefs")
                .entry("favorites", ron_string(&self.favorites.all()))
                .entry("dark", ron_string(&self.dark))
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("focus", ron_string(&self.focus))
                .entry("error", ron_string(&self.error)),
        ]
    }
}

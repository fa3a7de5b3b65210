use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::state::{CatalogPage, EntryDetail, FocusArea};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    PageNext,
    PagePrev,
    /// `seq` is the request number the page was issued under.
    PageDidLoad { seq: u64, page: CatalogPage },
    PageDidError { seq: u64, error: FetchError },

    DetailOpen(String),
    DetailClose,
    DetailDidLoad { seq: u64, detail: EntryDetail },
    DetailDidError { seq: u64, name: String, error: FetchError },

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    FavoriteToggle(String),
    FavoritesDidChange(Vec<String>),
    ThemeToggle,
    ThemeDidChange(bool),
    StorageDidError(String),

    SelectionMove(i16),
    SelectionRow(i16),
    FavoriteSelect(usize),
    FocusNext,
    FocusSet(FocusArea),

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}

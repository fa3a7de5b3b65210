//! Event routing: which component receives keys for a given state.

use tui_dispatch::EventRoutingState;

use crate::state::{AppState, FocusArea};

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ViewComponentId {
    Grid,
    Favorites,
    Detail,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewContext {
    Grid,
    Favorites,
    Detail,
    Search,
}

impl EventRoutingState<ViewComponentId, ViewContext> for AppState {
    fn focused(&self) -> Option<ViewComponentId> {
        if let Some(modal) = self.modal() {
            return Some(modal);
        }
        match self.focus {
            FocusArea::Grid => Some(ViewComponentId::Grid),
            FocusArea::Favorites => Some(ViewComponentId::Favorites),
        }
    }

    // Search input sits above the detail modal.
    fn modal(&self) -> Option<ViewComponentId> {
        if self.search.active {
            Some(ViewComponentId::Search)
        } else if self.is_modal_open() {
            Some(ViewComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: ViewComponentId) -> ViewContext {
        match id {
            ViewComponentId::Grid => ViewContext::Grid,
            ViewComponentId::Favorites => ViewContext::Favorites,
            ViewComponentId::Detail => ViewContext::Detail,
            ViewComponentId::Search => ViewContext::Search,
        }
    }

    fn default_context(&self) -> ViewContext {
        ViewContext::Grid
    }
}

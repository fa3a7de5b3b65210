//! Effect execution: fetches run as tasks, preference writes run inline and
//! report back through a ready task.

use std::sync::{Arc, Mutex, MutexGuard};

use tui_dispatch::{EffectContext, TaskKey};

use crate::action::Action;
use crate::api::Catalog;
use crate::effect::Effect;
use crate::persist::{FavoritesStore, ThemePreference};

pub struct EffectRunner {
    catalog: Arc<dyn Catalog>,
    favorites: Mutex<FavoritesStore>,
    theme: Mutex<ThemePreference>,
}

impl EffectRunner {
    pub fn new(catalog: Arc<dyn Catalog>, favorites: FavoritesStore, theme: ThemePreference) -> Self {
        Self {
            catalog,
            favorites: Mutex::new(favorites),
            theme: Mutex::new(theme),
        }
    }

    pub fn handle(&self, effect: Effect, ctx: &mut EffectContext<Action>) {
        match effect {
            // One key per request: an older fetch is never cancelled, so
            // ordering is decided by the reducer alone.
            Effect::LoadPage { seq, cursor } => {
                let catalog = Arc::clone(&self.catalog);
                ctx.tasks().spawn(TaskKey::new(format!("page_{seq}")), async move {
                    fetch_page(catalog.as_ref(), seq, &cursor).await
                });
            }
            Effect::LoadDetail { seq, name } => {
                let catalog = Arc::clone(&self.catalog);
                ctx.tasks().spawn(TaskKey::new(format!("detail_{seq}")), async move {
                    fetch_detail(catalog.as_ref(), seq, name).await
                });
            }
            Effect::ToggleFavorite { name } => {
                let action = self.toggle_favorite(&name);
                ctx.tasks()
                    .spawn(TaskKey::new("favorites"), async move { action });
            }
            Effect::ToggleTheme => {
                let action = self.toggle_theme();
                ctx.tasks().spawn(TaskKey::new("theme"), async move { action });
            }
        }
    }

    pub fn toggle_favorite(&self, name: &str) -> Action {
        let mut favorites = lock(&self.favorites);
        match favorites.toggle(name) {
            Ok(_) => Action::FavoritesDidChange(favorites.all().to_vec()),
            Err(err) => {
                tracing::error!(name, error = %err, "failed to save favorites");
                Action::StorageDidError(format!("Could not save favorites: {err}"))
            }
        }
    }

    pub fn toggle_theme(&self) -> Action {
        let mut theme = lock(&self.theme);
        match theme.toggle() {
            Ok(dark) => Action::ThemeDidChange(dark),
            Err(err) => {
                tracing::error!(dark = !theme.get(), error = %err, "failed to save theme");
                Action::StorageDidError(format!("Could not save theme: {err}"))
            }
        }
    }
}

pub async fn fetch_page(catalog: &dyn Catalog, seq: u64, cursor: &str) -> Action {
    match catalog.load_page(cursor).await {
        Ok(page) => Action::PageDidLoad { seq, page },
        Err(error) => Action::PageDidError { seq, error },
    }
}

pub async fn fetch_detail(catalog: &dyn Catalog, seq: u64, name: String) -> Action {
    match catalog.load_detail(&name).await {
        Ok(detail) => Action::DetailDidLoad { seq, detail },
        Err(error) => Action::DetailDidError { seq, name, error },
    }
}

// A panic while holding a store lock leaves the value itself intact.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::persist::{MemoryStore, DARK_MODE_KEY, FAVORITES_KEY};
    use crate::state::{CatalogPage, EntryDetail};
    use async_trait::async_trait;

    struct EmptyCatalog;

    #[async_trait]
    impl Catalog for EmptyCatalog {
        async fn load_page(&self, _cursor: &str) -> Result<CatalogPage, FetchError> {
            Ok(CatalogPage::default())
        }

        async fn load_detail(&self, name: &str) -> Result<EntryDetail, FetchError> {
            Err(FetchError::NotFound {
                name: name.to_string(),
            })
        }
    }

    fn runner(store: &MemoryStore) -> EffectRunner {
        EffectRunner::new(
            Arc::new(EmptyCatalog),
            FavoritesStore::load(Box::new(store.clone())),
            ThemePreference::load(Box::new(store.clone()), Box::new(|_| {})),
        )
    }

    #[test]
    fn favorite_toggle_reports_full_set() {
        let store = MemoryStore::new();
        let runner = runner(&store);

        assert_eq!(
            runner.toggle_favorite("pikachu"),
            Action::FavoritesDidChange(vec!["pikachu".into()])
        );
        assert_eq!(
            runner.toggle_favorite("pikachu"),
            Action::FavoritesDidChange(vec![])
        );
        assert_eq!(store.raw(FAVORITES_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn theme_toggle_is_persisted() {
        let store = MemoryStore::new();
        let runner = runner(&store);
        assert_eq!(runner.toggle_theme(), Action::ThemeDidChange(true));
        assert_eq!(store.raw(DARK_MODE_KEY).as_deref(), Some("true"));
        assert_eq!(runner.toggle_theme(), Action::ThemeDidChange(false));
        assert_eq!(store.raw(DARK_MODE_KEY).as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn fetches_carry_their_sequence_number() {
        let catalog = EmptyCatalog;
        assert_eq!(
            fetch_page(&catalog, 3, "https://example.test").await,
            Action::PageDidLoad {
                seq: 3,
                page: CatalogPage::default()
            }
        );
        assert!(matches!(
            fetch_detail(&catalog, 7, "missingno".into()).await,
            Action::DetailDidError { seq: 7, ref name, .. } if name == "missingno"
        ));
    }
}

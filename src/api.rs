//! PokeAPI catalog client: paginated list and per-entry detail.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::FetchError;
use crate::state::{BaseStat, CatalogEntry, CatalogPage, EntryDetail, ImageUrls, PageCursors};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2/pokemon";
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Cursor for the first page of the catalog.
pub fn initial_cursor(base: &str, page_size: u32) -> String {
    format!("{}?limit={page_size}&offset=0", base.trim_end_matches('/'))
}

/// Lookup key for a detail request.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Remote catalog of entries.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch one page. `cursor` is an absolute URL, used verbatim.
    async fn load_page(&self, cursor: &str) -> Result<CatalogPage, FetchError>;

    /// Fetch one entry's full record.
    async fn load_detail(&self, name: &str) -> Result<EntryDetail, FetchError>;
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
    next: Option<String>,
    previous: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    abilities: Vec<PokemonAbilitySlot>,
    #[serde(default)]
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    sprites: Sprites,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
    #[serde(default)]
    other: OtherSprites,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Artwork,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct Artwork {
    front_default: Option<String>,
}

fn page_from_response(response: ListResponse) -> CatalogPage {
    CatalogPage {
        items: response
            .results
            .into_iter()
            .map(|entry| CatalogEntry {
                name: entry.name,
                url: entry.url,
            })
            .collect(),
        cursors: PageCursors {
            next: response.next,
            previous: response.previous,
        },
    }
}

fn detail_from_response(response: PokemonResponse) -> EntryDetail {
    EntryDetail {
        id: response.id,
        name: response.name,
        images: ImageUrls {
            primary: response.sprites.other.official_artwork.front_default,
            fallback: response.sprites.front_default,
        },
        categories: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        base_stats: response
            .stats
            .into_iter()
            .map(|slot| BaseStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        height_decimetres: response.height,
        weight_hectograms: response.weight,
    }
}

/// [`Catalog`] backed by the PokeAPI REST endpoints.
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base: String,
}

impl HttpCatalog {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn load_page(&self, cursor: &str) -> Result<CatalogPage, FetchError> {
        tracing::debug!(%cursor, "loading catalog page");
        let response = self.get(cursor).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%cursor, status = status.as_u16(), "catalog page request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let body: ListResponse = response
            .json()
            .await
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        let page = page_from_response(body);
        tracing::debug!(items = page.items.len(), "catalog page loaded");
        Ok(page)
    }

    async fn load_detail(&self, name: &str) -> Result<EntryDetail, FetchError> {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(FetchError::NotFound {
                name: name.to_string(),
            });
        }
        let url = format!("{}/{}", self.base, urlencoding::encode(&key));
        tracing::debug!(%url, "loading entry detail");
        let response = self.get(&url).await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::info!(name = %key, "entry not found");
                Err(FetchError::NotFound { name: key })
            }
            status if !status.is_success() => Err(FetchError::Status {
                status: status.as_u16(),
            }),
            _ => {
                let body: PokemonResponse = response
                    .json()
                    .await
                    .map_err(|err| FetchError::Decode(err.to_string()))?;
                Ok(detail_from_response(body))
            }
        }
    }
}

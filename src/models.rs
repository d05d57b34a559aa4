use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    entities::{category, episode, film},
    pagination::{PaginationInfo, Window},
};

#[derive(Clone, Debug, Default)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Create-film multipart body as received.
#[derive(Debug, Default)]
pub struct FilmForm {
    pub title: Option<String>,
    pub year: Option<String>,
    pub category_id: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<UploadedFile>,
    pub unknown: Vec<String>,
}

#[derive(Debug)]
pub struct NewFilm {
    pub title: String,
    pub year: String,
    /// `None` when the submitted id is not an integer.
    pub category_id: Option<i32>,
    pub description: String,
    pub thumbnail: UploadedFile,
}

/// Update-film JSON body as received. The category arrives as a nested
/// object here, unlike the bare `categoryId` of the create form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFilmInput {
    pub title: Option<Value>,
    pub thumbnail_film: Option<Value>,
    pub year: Option<Value>,
    pub category: Option<Value>,
    pub description: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilmChanges {
    pub title: String,
    pub thumbnail_film: String,
    pub year: String,
    pub category_id: i32,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListParams {
    pub page: u64,
    pub limit: u64,
    pub category_id: Option<i32>,
    pub window: Window,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewCategoryInput {
    pub name: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewEpisodeInput {
    pub title: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEpisode {
    pub title: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
}

impl From<category::Model> for CategoryView {
    fn from(model: category::Model) -> Self {
        Self { id: model.id, name: model.name }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeView {
    pub id: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub film_id: Option<i32>,
}

impl EpisodeView {
    pub fn new(model: episode::Model) -> Self {
        Self { id: model.id, title: model.title, film_id: None }
    }

    pub fn with_film_id(model: episode::Model) -> Self {
        let film_id = Some(model.film_id);
        Self { film_id, ..Self::new(model) }
    }
}

/// Film as returned to clients. Timestamps never leave the store; the raw
/// `categoryId` only appears in the create response.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmView {
    pub id: i32,
    pub title: String,
    pub thumbnail_film: String,
    pub year: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i32>,
    pub category: Option<CategoryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<Vec<EpisodeView>>,
}

impl FilmView {
    pub fn new(film: film::Model, category: Option<category::Model>) -> Self {
        Self {
            id: film.id,
            title: film.title,
            thumbnail_film: film.thumbnail_film,
            year: film.year,
            description: film.description,
            category_id: None,
            category: category.map(CategoryView::from),
            episodes: None,
        }
    }

    pub fn with_category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_episodes(mut self, episodes: Vec<EpisodeView>) -> Self {
        self.episodes = Some(episodes);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmPage {
    pub data: Vec<FilmView>,
    pub pagination_info: PaginationInfo,
}

#[derive(Debug, Serialize)]
pub struct DeletedFilm {
    pub id: i32,
}

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        CategoryView, DataResponse, DeletedFilm, EditFilmInput, EpisodeView, FilmForm, FilmPage,
        FilmView, ListQuery, NewCategoryInput, NewEpisodeInput, UploadedFile,
    },
    pagination::PaginationInfo,
    validation::{self, parse_id},
};

const FILMS_NOT_FOUND: &str = "Films Not Found";
const FILM_NOT_FOUND: &str = "Film Not Found";
const CATEGORY_NOT_FOUND: &str = "Category Not Found";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_films(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<FilmPage>> {
    let Query(query) = query?;
    let params = validation::validate_list_query(query, state.config.default_page_size)?;
    let rows = state.store.list_films(params.category_id, params.window).await?;
    tracing::debug!(
        page = params.page,
        limit = params.limit,
        category_id = ?params.category_id,
        returned = rows.len(),
        "listed films"
    );

    Ok(Json(FilmPage {
        data: rows.into_iter().map(|(film, category)| FilmView::new(film, category)).collect(),
        pagination_info: PaginationInfo { current_page: params.page, limit: params.limit },
    }))
}

pub async fn list_films_with_relations(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<DataResponse<Vec<FilmView>>>> {
    let rows = state.store.list_films_with_episodes().await?;

    let data = rows
        .into_iter()
        .map(|((film, category), episodes)| {
            FilmView::new(film, category)
                .with_episodes(episodes.into_iter().map(EpisodeView::with_film_id).collect())
        })
        .collect();
    Ok(Json(DataResponse { data }))
}

pub async fn film_detail(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<DataResponse<FilmView>>> {
    let Path(id) = id?;
    let id = parse_id(&id).ok_or(AppError::NotFound(FILMS_NOT_FOUND))?;

    let ((film, category), episodes) =
        state.store.film_detail(id).await?.ok_or(AppError::NotFound(FILMS_NOT_FOUND))?;

    let data = FilmView::new(film, category)
        .with_episodes(episodes.into_iter().map(EpisodeView::new).collect());
    Ok(Json(DataResponse { data }))
}

pub async fn create_film(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<DataResponse<FilmView>>> {
    let form = read_film_form(multipart?).await?;
    let new = validation::validate_new_film(form)?;

    let category_id = new.category_id.ok_or(AppError::NotFound(CATEGORY_NOT_FOUND))?;
    if state.store.find_category(category_id).await?.is_none() {
        return Err(AppError::NotFound(CATEGORY_NOT_FOUND));
    }

    let stored = state.uploads.save(&new.thumbnail).await?;
    let created = state
        .store
        .create_film(new.title, new.year, new.description, category_id, stored.clone())
        .await;

    let (film, category) = match created {
        Ok(Some(row)) => row,
        Ok(None) => {
            state.uploads.discard(&stored).await;
            return Err(AppError::NotFound("Please Try Again"));
        },
        Err(err) => {
            state.uploads.discard(&stored).await;
            return Err(err);
        },
    };

    tracing::info!(film_id = film.id, category_id, stored = %stored, "film created");
    let category_id = film.category_id;
    Ok(Json(DataResponse { data: FilmView::new(film, category).with_category_id(category_id) }))
}

pub async fn update_film(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<EditFilmInput>, JsonRejection>,
) -> AppResult<Json<DataResponse<FilmView>>> {
    let Json(body) = body?;
    let changes = validation::validate_film_changes(body)?;

    let Path(id) = id?;
    let id = parse_id(&id).ok_or(AppError::NotFound(FILMS_NOT_FOUND))?;

    if state.store.find_category(changes.category_id).await?.is_none() {
        return Err(AppError::NotFound(CATEGORY_NOT_FOUND));
    }

    let (film, category) =
        state.store.update_film(id, changes).await?.ok_or(AppError::NotFound(FILMS_NOT_FOUND))?;

    tracing::info!(film_id = film.id, category_id = film.category_id, "film updated");
    Ok(Json(DataResponse { data: FilmView::new(film, category) }))
}

pub async fn delete_film(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<DataResponse<DeletedFilm>>> {
    let Path(id) = id?;
    let id = parse_id(&id).ok_or(AppError::NotFound(FILM_NOT_FOUND))?;

    if !state.store.delete_film(id).await? {
        return Err(AppError::NotFound(FILM_NOT_FOUND));
    }

    tracing::info!(film_id = id, "film deleted");
    Ok(Json(DataResponse { data: DeletedFilm { id } }))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<DataResponse<Vec<CategoryView>>>> {
    let categories = state.store.list_categories().await?;
    Ok(Json(DataResponse { data: categories.into_iter().map(CategoryView::from).collect() }))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewCategoryInput>, JsonRejection>,
) -> AppResult<Json<DataResponse<CategoryView>>> {
    let Json(body) = body?;
    let new = validation::validate_new_category(body)?;

    let category = state.store.create_category(new).await?;
    tracing::info!(category_id = category.id, "category created");
    Ok(Json(DataResponse { data: category.into() }))
}

pub async fn create_episode(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<NewEpisodeInput>, JsonRejection>,
) -> AppResult<Json<DataResponse<EpisodeView>>> {
    let Json(body) = body?;
    let new = validation::validate_new_episode(body)?;

    let Path(id) = id?;
    let film_id = parse_id(&id).ok_or(AppError::NotFound(FILM_NOT_FOUND))?;
    if state.store.find_film(film_id).await?.is_none() {
        return Err(AppError::NotFound(FILM_NOT_FOUND));
    }

    let episode = state.store.create_episode(film_id, new).await?;
    tracing::info!(film_id, episode_id = episode.id, "episode created");
    Ok(Json(DataResponse { data: EpisodeView::with_film_id(episode) }))
}

/// Collects the create form. The first part carrying a filename is the
/// thumbnail; any other named part is a text field.
async fn read_film_form(mut multipart: Multipart) -> AppResult<FilmForm> {
    let mut form = FilmForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let bytes = field.bytes().await?;
            if form.thumbnail.is_none() {
                form.thumbnail = Some(UploadedFile { file_name, bytes });
            }
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "title" => form.title = Some(value),
            "year" => form.year = Some(value),
            "categoryId" => form.category_id = Some(value),
            "description" => form.description = Some(value),
            _ => form.unknown.push(name),
        }
    }

    Ok(form)
}

//! Request validation.
//!
//! Each operation has a raw input type (everything optional, exactly as it
//! arrived) and a validator that turns it into a typed value or the full list
//! of violations. Rules run in declaration order, so the first violation is
//! the one a client sees. Messages follow the `"<field>" <problem>` shape.

use serde_json::Value;

use crate::{
    models::{
        EditFilmInput, FilmChanges, FilmForm, ListParams, ListQuery, NewCategory,
        NewCategoryInput, NewEpisode, NewEpisodeInput, NewFilm,
    },
    pagination::{MAX_PAGE_SIZE, paginate},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn push(&mut self, field: &str, problem: &str) {
        self.0.push(Violation { field: field.to_string(), message: format!("\"{field}\" {problem}") });
    }

    pub fn first_message(&self) -> Option<&str> {
        self.0.first().map(|v| v.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Violations> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

pub fn validate_new_film(form: FilmForm) -> Result<NewFilm, Violations> {
    let mut v = Violations::default();

    let title = text(&mut v, "title", form.title, 3);
    let year = text(&mut v, "year", form.year, 0);
    if form.category_id.is_none() {
        v.push("categoryId", "is required");
    }
    let description = text(&mut v, "description", form.description, 0);
    if form.thumbnail.is_none() {
        v.push("thumbnail", "is required");
    }
    for key in &form.unknown {
        v.push(key, "is not allowed");
    }

    v.finish(|| NewFilm {
        title: title.unwrap_or_default(),
        year: year.unwrap_or_default(),
        category_id: form.category_id.as_deref().and_then(parse_id),
        description: description.unwrap_or_default(),
        thumbnail: form.thumbnail.unwrap_or_default(),
    })
}

pub fn validate_film_changes(input: EditFilmInput) -> Result<FilmChanges, Violations> {
    let mut v = Violations::default();

    let title = json_text(&mut v, "title", input.title, 3);
    let thumbnail_film = json_text(&mut v, "thumbnailFilm", input.thumbnail_film, 0);
    let year = match input.year {
        None => {
            v.push("year", "is required");
            None
        },
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            v.push("year", "must be a string or number");
            None
        },
    };
    let category_id = match input.category {
        None => {
            v.push("category", "is required");
            None
        },
        Some(Value::Object(category)) => match category.get("id") {
            None | Some(Value::Null) => {
                v.push("category.id", "is required");
                None
            },
            Some(id) => {
                let parsed = match id {
                    Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
                    Value::String(s) => parse_id(s),
                    _ => None,
                };
                if parsed.is_none() {
                    v.push("category.id", "must be an integer");
                }
                parsed
            },
        },
        Some(_) => {
            v.push("category", "must be of type object");
            None
        },
    };
    let description = json_text(&mut v, "description", input.description, 10);
    for key in input.extra.keys() {
        v.push(key, "is not allowed");
    }

    v.finish(|| FilmChanges {
        title: title.unwrap_or_default(),
        thumbnail_film: thumbnail_film.unwrap_or_default(),
        year: year.unwrap_or_default(),
        category_id: category_id.unwrap_or_default(),
        description: description.unwrap_or_default(),
    })
}

pub fn validate_list_query(query: ListQuery, default_size: u64) -> Result<ListParams, Violations> {
    let mut v = Violations::default();

    let page = positive(&mut v, "page", query.page.as_deref()).unwrap_or(1);
    let limit = positive(&mut v, "limit", query.limit.as_deref()).unwrap_or(default_size);
    let category_id = match query.category_id.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => {
            let id = parse_id(raw);
            if id.is_none() {
                v.push("categoryId", "must be an integer");
            }
            id
        },
    };

    let window = if limit > MAX_PAGE_SIZE {
        v.push("limit", &format!("must be less than or equal to {MAX_PAGE_SIZE}"));
        None
    } else {
        let window = paginate(page, limit);
        if window.is_none() {
            v.push("page", "is too large");
        }
        window
    };

    v.finish(|| ListParams { page, limit, category_id, window: window.unwrap_or_default() })
}

pub fn validate_new_category(input: NewCategoryInput) -> Result<NewCategory, Violations> {
    let mut v = Violations::default();
    let name = json_text(&mut v, "name", input.name, 3);
    for key in input.extra.keys() {
        v.push(key, "is not allowed");
    }
    v.finish(|| NewCategory { name: name.unwrap_or_default() })
}

pub fn validate_new_episode(input: NewEpisodeInput) -> Result<NewEpisode, Violations> {
    let mut v = Violations::default();
    let title = json_text(&mut v, "title", input.title, 3);
    for key in input.extra.keys() {
        v.push(key, "is not allowed");
    }
    v.finish(|| NewEpisode { title: title.unwrap_or_default() })
}

/// Parses a record id. Anything that is not a plain integer can never match a
/// row, so callers treat `None` as "no such record".
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

fn text(v: &mut Violations, field: &str, value: Option<String>, min: usize) -> Option<String> {
    let Some(value) = value else {
        v.push(field, "is required");
        return None;
    };
    if value.is_empty() {
        v.push(field, "is not allowed to be empty");
        return None;
    }
    if value.chars().count() < min {
        v.push(field, &format!("length must be at least {min} characters long"));
        return None;
    }
    Some(value)
}

fn json_text(v: &mut Violations, field: &str, value: Option<Value>, min: usize) -> Option<String> {
    match value {
        None => text(v, field, None, min),
        Some(Value::String(s)) => text(v, field, Some(s), min),
        Some(_) => {
            v.push(field, "must be a string");
            None
        },
    }
}

fn positive(v: &mut Violations, field: &str, raw: Option<&str>) -> Option<u64> {
    let raw = raw.filter(|s| !s.is_empty())?;
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            v.push(field, "must be a positive integer");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{models::UploadedFile, pagination::Window};

    fn form() -> FilmForm {
        FilmForm {
            title: Some("Spirited Away".to_string()),
            year: Some("2001".to_string()),
            category_id: Some("1".to_string()),
            description: Some("A girl wanders into a world of spirits.".to_string()),
            thumbnail: Some(UploadedFile {
                file_name: "poster.png".to_string(),
                bytes: vec![1, 2, 3].into(),
            }),
            unknown: Vec::new(),
        }
    }

    fn edit(body: Value) -> EditFilmInput {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn accepts_complete_film_form() {
        let film = validate_new_film(form()).unwrap();
        assert_eq!(film.title, "Spirited Away");
        assert_eq!(film.category_id, Some(1));
        assert_eq!(film.thumbnail.file_name, "poster.png");
    }

    #[test]
    fn reports_short_title_first() {
        let err = validate_new_film(FilmForm { title: Some("Up".into()), year: None, ..form() })
            .unwrap_err();
        assert_eq!(err.first_message(), Some("\"title\" length must be at least 3 characters long"));
        assert_eq!(err.iter().count(), 2);
    }

    #[test]
    fn empty_description_is_rejected() {
        let err = validate_new_film(FilmForm { description: Some(String::new()), ..form() })
            .unwrap_err();
        assert_eq!(err.first_message(), Some("\"description\" is not allowed to be empty"));
    }

    #[test]
    fn missing_upload_and_unknown_fields() {
        let err = validate_new_film(FilmForm {
            thumbnail: None,
            unknown: vec!["rating".to_string()],
            ..form()
        })
        .unwrap_err();
        let messages: Vec<_> = err.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, ["\"thumbnail\" is required", "\"rating\" is not allowed"]);
    }

    #[test]
    fn non_numeric_category_passes_validation_without_id() {
        let film =
            validate_new_film(FilmForm { category_id: Some("drama".into()), ..form() }).unwrap();
        assert_eq!(film.category_id, None);
    }

    #[test]
    fn changes_take_id_from_nested_category() {
        let changes = validate_film_changes(edit(json!({
            "title": "Princess Mononoke",
            "thumbnailFilm": "mononoke.png",
            "year": 1997,
            "category": { "id": 4, "name": "Anime" },
            "description": "A prince is cursed by a boar god.",
        })))
        .unwrap();
        assert_eq!(changes.year, "1997");
        assert_eq!(changes.category_id, 4);
    }

    #[test]
    fn changes_need_longer_description() {
        let err = validate_film_changes(edit(json!({
            "title": "Princess Mononoke",
            "thumbnailFilm": "mononoke.png",
            "year": "1997",
            "category": { "id": 4 },
            "description": "Too short",
        })))
        .unwrap_err();
        assert_eq!(
            err.first_message(),
            Some("\"description\" length must be at least 10 characters long")
        );
    }

    #[test]
    fn changes_reject_bare_category_id() {
        let err = validate_film_changes(edit(json!({
            "title": "Princess Mononoke",
            "thumbnailFilm": "mononoke.png",
            "year": "1997",
            "categoryId": 4,
            "description": "A prince is cursed by a boar god.",
        })))
        .unwrap_err();
        let messages: Vec<_> = err.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, ["\"category\" is required", "\"categoryId\" is not allowed"]);
    }

    #[test]
    fn list_query_defaults_and_errors() {
        let params = validate_list_query(ListQuery::default(), 10).unwrap();
        assert_eq!(
            params,
            ListParams {
                page: 1,
                limit: 10,
                category_id: None,
                window: Window { offset: 0, limit: 10 },
            }
        );

        let params = validate_list_query(
            ListQuery { page: Some("3".into()), limit: Some("5".into()), category_id: Some("2".into()) },
            10,
        )
        .unwrap();
        assert_eq!(
            params,
            ListParams {
                page: 3,
                limit: 5,
                category_id: Some(2),
                window: Window { offset: 10, limit: 5 },
            }
        );

        let err = validate_list_query(ListQuery { page: Some("0".into()), ..Default::default() }, 10)
            .unwrap_err();
        assert_eq!(err.first_message(), Some("\"page\" must be a positive integer"));
    }

    #[test]
    fn empty_query_values_fall_back_to_defaults() {
        let params = validate_list_query(
            ListQuery { page: Some(String::new()), limit: None, category_id: Some(String::new()) },
            25,
        )
        .unwrap();
        assert_eq!(params.window, Window { offset: 0, limit: 25 });
        assert_eq!(params.category_id, None);
    }

    #[test]
    fn oversized_paging_is_rejected() {
        let err = validate_list_query(
            ListQuery { limit: Some(u64::MAX.to_string()), ..Default::default() },
            10,
        )
        .unwrap_err();
        assert_eq!(err.first_message(), Some("\"limit\" must be less than or equal to 100"));

        let err = validate_list_query(
            ListQuery { page: Some(u64::MAX.to_string()), ..Default::default() },
            10,
        )
        .unwrap_err();
        assert_eq!(err.first_message(), Some("\"page\" is too large"));

        let err = validate_list_query(
            ListQuery { page: Some("99999999999999999999".into()), ..Default::default() },
            10,
        )
        .unwrap_err();
        assert_eq!(err.first_message(), Some("\"page\" must be a positive integer"));
    }
}

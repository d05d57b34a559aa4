use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::Expr,
};

use crate::{
    entities::{category, episode, film},
    error::AppResult,
    models::{FilmChanges, NewCategory, NewEpisode},
    pagination::Window,
};

pub type FilmRow = (film::Model, Option<category::Model>);

#[derive(Clone)]
pub struct FilmStore {
    db: DatabaseConnection,
}

impl FilmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Newest first, with the category joined in.
    pub async fn list_films(
        &self,
        category_id: Option<i32>,
        window: Window,
    ) -> AppResult<Vec<FilmRow>> {
        let mut query = film::Entity::find().find_also_related(category::Entity);
        if let Some(category_id) = category_id {
            query = query.filter(film::Column::CategoryId.eq(category_id));
        }

        let rows = query
            .order_by_desc(film::Column::CreatedAt)
            .order_by_desc(film::Column::Id)
            .offset(window.offset)
            .limit(window.limit)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn list_films_with_episodes(
        &self,
    ) -> AppResult<Vec<(FilmRow, Vec<episode::Model>)>> {
        let rows = film::Entity::find()
            .find_also_related(category::Entity)
            .order_by_desc(film::Column::CreatedAt)
            .order_by_desc(film::Column::Id)
            .all(&self.db)
            .await?;

        let films: Vec<film::Model> = rows.iter().map(|(film, _)| film.clone()).collect();
        let episodes = films.load_many(episode::Entity, &self.db).await?;

        Ok(rows.into_iter().zip(episodes).collect())
    }

    /// Film with its category and its episodes sorted by title.
    pub async fn film_detail(
        &self,
        id: i32,
    ) -> AppResult<Option<(FilmRow, Vec<episode::Model>)>> {
        let Some(row) = film_with_category(&self.db, id).await? else {
            return Ok(None);
        };

        let episodes = row
            .0
            .find_related(episode::Entity)
            .order_by_asc(episode::Column::Title)
            .all(&self.db)
            .await?;

        Ok(Some((row, episodes)))
    }

    pub async fn find_film(&self, id: i32) -> AppResult<Option<film::Model>> {
        Ok(film::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_category(&self, id: i32) -> AppResult<Option<category::Model>> {
        Ok(category::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Inserts the film and reads it back in the same transaction.
    pub async fn create_film(
        &self,
        title: String,
        year: String,
        description: String,
        category_id: i32,
        thumbnail_film: String,
    ) -> AppResult<Option<FilmRow>> {
        let now = now_ms();
        let txn = self.db.begin().await?;

        let model = film::ActiveModel {
            id: Default::default(),
            title: Set(title),
            thumbnail_film: Set(thumbnail_film),
            year: Set(year),
            description: Set(description),
            category_id: Set(category_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&txn).await?;
        let row = film_with_category(&txn, inserted.id).await?;

        txn.commit().await?;
        Ok(row)
    }

    /// Overwrites the film's editable columns and reads it back. `None` when
    /// no row has that id.
    pub async fn update_film(&self, id: i32, changes: FilmChanges) -> AppResult<Option<FilmRow>> {
        let txn = self.db.begin().await?;

        let result = film::Entity::update_many()
            .col_expr(film::Column::Title, Expr::value(changes.title))
            .col_expr(film::Column::ThumbnailFilm, Expr::value(changes.thumbnail_film))
            .col_expr(film::Column::Year, Expr::value(changes.year))
            .col_expr(film::Column::Description, Expr::value(changes.description))
            .col_expr(film::Column::CategoryId, Expr::value(changes.category_id))
            .col_expr(film::Column::UpdatedAt, Expr::value(now_ms()))
            .filter(film::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let row = film_with_category(&txn, id).await?;
        txn.commit().await?;
        Ok(row)
    }

    /// Returns whether a row was removed. Episodes go with it through the
    /// foreign key's cascade.
    pub async fn delete_film(&self, id: i32) -> AppResult<bool> {
        if self.find_film(id).await?.is_none() {
            return Ok(false);
        }
        film::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(true)
    }

    pub async fn list_categories(&self) -> AppResult<Vec<category::Model>> {
        Ok(category::Entity::find().order_by_asc(category::Column::Name).all(&self.db).await?)
    }

    pub async fn create_category(&self, new: NewCategory) -> AppResult<category::Model> {
        let now = now_ms();
        let model = category::ActiveModel {
            id: Default::default(),
            name: Set(new.name),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn create_episode(&self, film_id: i32, new: NewEpisode) -> AppResult<episode::Model> {
        let now = now_ms();
        let model = episode::ActiveModel {
            id: Default::default(),
            title: Set(new.title),
            film_id: Set(film_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }
}

async fn film_with_category<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Option<FilmRow>> {
    Ok(film::Entity::find_by_id(id).find_also_related(category::Entity).one(conn).await?)
}

fn now_ms() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}

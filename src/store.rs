use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};

use crate::{
    entities::movie,
    models::{Movie, MovieDraft, MovieKind, MoviePage, MoviePatch},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("movie {0} not found")]
    NotFound(i32),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Data access for the `movies` table.
#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, draft: MovieDraft) -> StoreResult<Movie> {
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(draft.title),
            kind: Set(draft.kind.as_str().to_string()),
            director: Set(draft.director),
            budget: Set(draft.budget),
            location: Set(draft.location),
            duration: Set(draft.duration),
            year: Set(draft.year),
            created_at: Set(now_ms()),
        };

        let saved = model.insert(&self.db).await?;
        tracing::debug!(id = saved.id, "inserted movie");
        to_movie(saved)
    }

    /// Newest first; `page` is 1-based.
    pub async fn list(&self, page: u64, limit: u64) -> StoreResult<MoviePage> {
        let paginator = movie::Entity::find()
            .order_by_desc(movie::Column::CreatedAt)
            .order_by_desc(movie::Column::Id)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await?;
        let index = page.saturating_sub(1);
        if index.saturating_mul(limit.max(1)) >= total {
            return Ok(MoviePage { records: Vec::new(), total });
        }

        let rows = paginator.fetch_page(index).await?;
        let records = rows.into_iter().map(to_movie).collect::<StoreResult<Vec<_>>>()?;

        Ok(MoviePage { records, total })
    }

    pub async fn get(&self, id: i32) -> StoreResult<Option<Movie>> {
        movie::Entity::find_by_id(id).one(&self.db).await?.map(to_movie).transpose()
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(movie::Entity::find().count(&self.db).await?)
    }

    /// Applies the fields present in `patch`; everything else keeps its stored value.
    pub async fn update(&self, id: i32, patch: MoviePatch) -> StoreResult<Movie> {
        let Some(existing) = movie::Entity::find_by_id(id).one(&self.db).await? else {
            return Err(StoreError::NotFound(id));
        };

        if patch.is_empty() {
            return to_movie(existing);
        }

        let mut model: movie::ActiveModel = existing.into();
        if let Some(title) = patch.title {
            model.title = Set(title);
        }
        if let Some(kind) = patch.kind {
            model.kind = Set(kind.as_str().to_string());
        }
        if let Some(director) = patch.director {
            model.director = Set(director);
        }
        if let Some(budget) = patch.budget {
            model.budget = Set(budget);
        }
        if let Some(location) = patch.location {
            model.location = Set(location);
        }
        if let Some(duration) = patch.duration {
            model.duration = Set(duration);
        }
        if let Some(year) = patch.year {
            model.year = Set(year);
        }

        let updated = model.update(&self.db).await?;
        tracing::debug!(id, "updated movie");
        to_movie(updated)
    }

    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::debug!(id, "deleted movie");
        Ok(())
    }
}

fn to_movie(row: movie::Model) -> StoreResult<Movie> {
    let kind = MovieKind::from_name(&row.kind).ok_or_else(|| {
        sea_orm::DbErr::Type(format!("movie {} has unknown kind {:?}", row.id, row.kind))
    })?;
    let created_at = jiff::Timestamp::from_millisecond(row.created_at)
        .map_err(|e| sea_orm::DbErr::Type(format!("movie {} created_at: {e}", row.id)))?;

    Ok(Movie {
        id: row.id,
        title: row.title,
        kind,
        director: row.director,
        budget: row.budget,
        location: row.location,
        duration: row.duration,
        year: row.year,
        created_at,
    })
}

fn now_ms() -> i64 {
    jiff::Timestamp::now().as_millisecond()
}

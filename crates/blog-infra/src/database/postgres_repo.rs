//! PostgreSQL post repository.

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgFunc;
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder};

use blog_core::domain::{ListOptions, Post, PostFilter, PostId, PostPatch, SortField, SortOrder};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

fn sort_column(field: SortField) -> post::Column {
    match field {
        SortField::CreatedAt => post::Column::CreatedAt,
        SortField::UpdatedAt => post::Column::UpdatedAt,
        SortField::Title => post::Column::Title,
    }
}

fn sort_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Ascending => Order::Asc,
        SortOrder::Descending => Order::Desc,
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(
        &self,
        filter: &PostFilter,
        options: ListOptions,
    ) -> Result<Vec<Post>, RepoError> {
        let select = match filter {
            PostFilter::All => PostEntity::find(),
            PostFilter::Author(author) => {
                PostEntity::find().filter(post::Column::Author.eq(author.as_str()))
            }
            PostFilter::Tag(tag) => PostEntity::find().filter(
                Expr::val(tag.as_str())
                    .eq(PgFunc::any(Expr::col((PostEntity, post::Column::Tags)))),
            ),
        };

        let result = select
            .order_by(sort_column(options.sort_by), sort_order(options.sort_order))
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn apply_patch(
        &self,
        id: PostId,
        patch: PostPatch,
    ) -> Result<Option<Post>, RepoError> {
        let mut update = PostEntity::update_many().filter(post::Column::Id.eq(id.as_uuid()));

        if let Some(title) = patch.title {
            update = update.col_expr(post::Column::Title, Expr::value(title));
        }
        if let Some(author) = patch.author {
            update = update.col_expr(post::Column::Author, Expr::value(author));
        }
        if let Some(contents) = patch.contents {
            update = update.col_expr(post::Column::Contents, Expr::value(contents));
        }
        if let Some(tags) = patch.tags {
            update = update.col_expr(post::Column::Tags, Expr::value(tags));
        }

        // Strictly later than the stored value even if the clock has not advanced.
        let now = Utc::now().trunc_subsecs(6);
        update = update.col_expr(
            post::Column::UpdatedAt,
            Expr::cust_with_values(
                r#"GREATEST($1, "updated_at" + INTERVAL '1 microsecond')"#,
                [now],
            ),
        );

        tracing::debug!(post_id = %id, "Updating post");
        let updated = update
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(updated.into_iter().next().map(Into::into))
    }
}

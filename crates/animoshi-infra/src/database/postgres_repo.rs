//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use animoshi_core::domain::{Comment, LikeIdentity, Post, PostCounter, Waifu};
use animoshi_core::error::RepoError;
use animoshi_core::ports::{CommentRepository, LikeRepository, PostRepository, WaifuRepository};
use animoshi_core::validation::Page;

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::like::{self, Entity as LikeEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::waifu::{self, Entity as WaifuEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL like repository.
pub type PostgresLikeRepository = PostgresBaseRepository<LikeEntity>;

/// PostgreSQL waifu repository.
pub type PostgresWaifuRepository = PostgresBaseRepository<WaifuEntity>;

fn counter_column(counter: PostCounter) -> post::Column {
    match counter {
        PostCounter::Likes => post::Column::Likes,
        PostCounter::Comments => post::Column::Comments,
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_recent(&self, page: Page) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_by_user(&self, user_id: &str, page: Page) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_user(&self, user_id: &str) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn increment_counter(&self, id: Uuid, counter: PostCounter) -> Result<i64, RepoError> {
        let column = counter_column(counter);
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        // UPDATE posts SET <counter> = <counter> + 1, updated_at = $1 WHERE id = $2 RETURNING *
        let updated = PostEntity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .col_expr(post::Column::UpdatedAt, Expr::value(now))
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        updated
            .into_iter()
            .next()
            .map(|model| match counter {
                PostCounter::Likes => model.likes,
                PostCounter::Comments => model.comments,
            })
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_by_post(&self, post_id: Uuid, page: Page) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn exists_for_identity(
        &self,
        post_id: Uuid,
        identity: &LikeIdentity,
    ) -> Result<bool, RepoError> {
        let mut same_identity = Condition::any().add(like::Column::UserIp.eq(identity.ip.as_str()));
        if let Some(token) = &identity.session_token {
            same_identity = same_identity.add(like::Column::SessionToken.eq(token.as_str()));
        }

        let matches = LikeEntity::find()
            .filter(like::Column::PostId.eq(post_id))
            .filter(same_identity)
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(matches > 0)
    }
}

#[async_trait]
impl WaifuRepository for PostgresWaifuRepository {
    async fn list_approved(&self, page: Page) -> Result<Vec<Waifu>, RepoError> {
        let result = WaifuEntity::find()
            .filter(waifu::Column::Status.eq(waifu::STATUS_APPROVED))
            .order_by_desc(waifu::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

//! Schema migrations, applied in order.

pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_posts;
mod m20261019_000002_create_comments_and_likes;
mod m20261019_000003_create_waifus;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_posts::Migration),
            Box::new(m20261019_000002_create_comments_and_likes::Migration),
            Box::new(m20261019_000003_create_waifus::Migration),
        ]
    }
}

use common::slug::slugify;
use sea_orm::sea_query::{
    Index, IndexCreateStatement, MysqlQueryBuilder, PostgresQueryBuilder, SqliteQueryBuilder,
};
use sea_orm::*;
use tracing::info;

use crate::entity::{category, sport, term, vote};

/// Sports seeded on first startup, from the original production dataset.
const DEFAULT_SPORTS: &[(&str, &str)] = &[
    ("Basketball", "🏀"),
    ("Football", "🏈"),
    ("Soccer", "⚽"),
    ("Baseball", "⚾"),
    ("Hockey", "🏒"),
    ("Tennis", "🎾"),
    ("Golf", "⛳"),
    ("Volleyball", "🏐"),
];

fn build_index(db: &DatabaseConnection, stmt: &IndexCreateStatement) -> String {
    match db.get_database_backend() {
        DbBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
        DbBackend::MySql => stmt.to_string(MysqlQueryBuilder),
        _ => stmt.to_string(PostgresQueryBuilder),
    }
}

/// Ensure composite unique indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes, so they are
/// created manually on startup. These are not optimizations: the
/// (user_id, definition_id) index is the one-vote invariant and the race
/// backstop for the vote engine, and the term/category indexes enforce
/// per-sport uniqueness.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        Index::create()
            .if_not_exists()
            .unique()
            .name("idx_vote_user_definition")
            .table(vote::Entity)
            .col(vote::Column::UserId)
            .col(vote::Column::DefinitionId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .unique()
            .name("idx_term_sport_text")
            .table(term::Entity)
            .col(term::Column::SportId)
            .col(term::Column::Text)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .unique()
            .name("idx_term_sport_slug")
            .table(term::Entity)
            .col(term::Column::SportId)
            .col(term::Column::Slug)
            .to_owned(),
        // At most one term per suggestion; NULLs (directly created
        // terms) are exempt in both PostgreSQL and SQLite.
        Index::create()
            .if_not_exists()
            .unique()
            .name("idx_term_suggested_term")
            .table(term::Entity)
            .col(term::Column::SuggestedTermId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .unique()
            .name("idx_category_sport_name")
            .table(category::Entity)
            .col(category::Column::SportId)
            .col(category::Column::Name)
            .to_owned(),
    ];

    for stmt in &statements {
        let sql = build_index(db, stmt);
        db.execute_unprepared(&sql).await?;
    }
    info!("Ensured {} unique indexes exist", statements.len());

    Ok(())
}

/// Seed the `sport` table with defaults. Idempotent: existing names are
/// left untouched.
pub async fn seed_sports(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &(name, emoji) in DEFAULT_SPORTS {
        let model = sport::ActiveModel {
            name: Set(name.to_string()),
            // Default names never collide, so no probe loop here.
            slug: Set(slugify(name)),
            emoji: Set(Some(emoji.to_string())),
            active: Set(true),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let result = sport::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(sport::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new sports", inserted);
    }

    Ok(())
}

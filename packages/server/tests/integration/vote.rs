use serde_json::json;

use crate::common::{TestApp, routes};

/// Seed one term with one definition, returning the definition id.
async fn seed_definition(app: &TestApp) -> i32 {
    let token = app.admin_token();
    let basketball = app.sport_id("Basketball").await;
    let term_id = app.create_term(&token, "Rebound", basketball).await;
    app.create_definition(&token, term_id, "Securing the ball after a missed shot.")
        .await
}

mod casting {
    use super::*;

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;

        let res = app.post_without_token(&routes::upvote(def), &json!({})).await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn upvote_updates_all_three_counters() {
        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;
        let token = app.user_token(10, "alice");

        let res = app.post_with_token(&routes::upvote(def), &json!({}), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["num_upvotes"], 1);
        assert_eq!(res.body["num_downvotes"], 0);
        assert_eq!(res.body["net_votes"], 1);
    }

    #[tokio::test]
    async fn opposite_vote_switches_direction() {
        use common::VoteType;
        use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
        use server::entity::vote;

        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;
        let token = app.user_token(10, "alice");

        app.post_with_token(&routes::upvote(def), &json!({}), &token).await;
        let res = app
            .post_with_token(&routes::downvote(def), &json!({}), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["num_upvotes"], 0);
        assert_eq!(res.body["num_downvotes"], 1);
        assert_eq!(res.body["net_votes"], -1);

        // Exactly one vote row survives the switch, and it points down.
        let rows = vote::Entity::find()
            .filter(vote::Column::UserId.eq(10))
            .filter(vote::Column::DefinitionId.eq(def))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vote_type, VoteType::Down);
    }

    #[tokio::test]
    async fn repeated_same_direction_vote_is_a_noop() {
        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;
        let token = app.user_token(10, "alice");

        app.post_with_token(&routes::upvote(def), &json!({}), &token).await;
        let res = app.post_with_token(&routes::upvote(def), &json!({}), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["num_upvotes"], 1);
        assert_eq!(res.body["net_votes"], 1);
    }

    #[tokio::test]
    async fn counters_stay_consistent_across_users() {
        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;

        for (uid, name) in [(11, "alice"), (12, "bob")] {
            let token = app.user_token(uid, name);
            app.post_with_token(&routes::upvote(def), &json!({}), &token).await;
        }
        let carol = app.user_token(13, "carol");
        let res = app
            .post_with_token(&routes::downvote(def), &json!({}), &carol)
            .await;

        assert_eq!(res.body["num_upvotes"], 2);
        assert_eq!(res.body["num_downvotes"], 1);
        assert_eq!(res.body["net_votes"], 1);

        // Counters match the actual vote rows.
        use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
        use server::entity::vote;
        let rows = vote::Entity::find()
            .filter(vote::Column::DefinitionId.eq(def))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(rows, 3);
    }

    #[tokio::test]
    async fn soft_deleted_definition_cannot_be_voted() {
        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;
        let admin = app.admin_token();

        let res = app.delete_with_token(&routes::definition(def), &admin).await;
        assert_eq!(res.status, 204);

        let token = app.user_token(10, "alice");
        let res = app.post_with_token(&routes::upvote(def), &json!({}), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }
}

mod interleaving {
    use std::sync::Arc;

    use rand::{Rng, SeedableRng, rngs::StdRng};
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    use common::VoteType;
    use server::entity::{definition, vote};

    use super::*;

    /// Several users hammer the same definition with a mixed stream of
    /// casts, switches and removals. Whatever the interleaving, the
    /// counters must end up equal to the surviving vote rows.
    #[tokio::test]
    async fn counters_match_vote_rows_under_interleaved_voting() {
        let app = Arc::new(TestApp::spawn().await);
        let def = seed_definition(&app).await;

        let mut tasks = Vec::new();
        for uid in 20..26 {
            let app = Arc::clone(&app);
            tasks.push(tokio::spawn(async move {
                let token = app.user_token(uid, &format!("user{uid}"));
                let mut rng = StdRng::seed_from_u64(uid as u64);
                for _ in 0..10 {
                    let res = match rng.random_range(0..4) {
                        0 => app.post_with_token(&routes::upvote(def), &json!({}), &token).await,
                        1 => app.post_with_token(&routes::downvote(def), &json!({}), &token).await,
                        2 => app.delete_with_token(&routes::upvote(def), &token).await,
                        _ => app.delete_with_token(&routes::downvote(def), &token).await,
                    };
                    assert_eq!(res.status, 200, "{}", res.text);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let row = definition::Entity::find_by_id(def)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let votes = vote::Entity::find()
            .filter(vote::Column::DefinitionId.eq(def))
            .all(&app.db)
            .await
            .unwrap();
        let ups = votes.iter().filter(|v| v.vote_type == VoteType::Up).count() as i32;
        let downs = votes.iter().filter(|v| v.vote_type == VoteType::Down).count() as i32;

        assert_eq!(row.num_upvotes, ups);
        assert_eq!(row.num_downvotes, downs);
        assert_eq!(row.net_votes, row.num_upvotes - row.num_downvotes);
    }
}

mod removal {
    use super::*;

    #[tokio::test]
    async fn removing_a_vote_decrements_its_counter() {
        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;
        let token = app.user_token(10, "alice");

        app.post_with_token(&routes::upvote(def), &json!({}), &token).await;
        let res = app.delete_with_token(&routes::upvote(def), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["num_upvotes"], 0);
        assert_eq!(res.body["net_votes"], 0);
    }

    #[tokio::test]
    async fn removing_an_absent_vote_is_a_silent_noop() {
        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;
        let token = app.user_token(10, "alice");

        let res = app.delete_with_token(&routes::downvote(def), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["num_upvotes"], 0);
        assert_eq!(res.body["num_downvotes"], 0);
        assert_eq!(res.body["net_votes"], 0);
    }

    #[tokio::test]
    async fn removing_the_wrong_direction_leaves_the_vote_alone() {
        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;
        let token = app.user_token(10, "alice");

        app.post_with_token(&routes::upvote(def), &json!({}), &token).await;
        let res = app.delete_with_token(&routes::downvote(def), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["num_upvotes"], 1);
        assert_eq!(res.body["net_votes"], 1);
    }
}

mod storage {
    use super::*;

    #[tokio::test]
    async fn duplicate_vote_pair_is_rejected_by_the_unique_index() {
        use common::VoteType;
        use sea_orm::{ActiveModelTrait, Set, SqlErr};
        use server::entity::vote;

        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;

        let row = |vote_type| vote::ActiveModel {
            user_id: Set(42),
            definition_id: Set(def),
            vote_type: Set(vote_type),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        row(VoteType::Up).insert(&app.db).await.expect("first insert");
        let err = row(VoteType::Down)
            .insert(&app.db)
            .await
            .expect_err("second insert for the same pair must fail");

        assert!(matches!(
            err.sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));
    }
}

mod moderation {
    use super::*;

    #[tokio::test]
    async fn soft_delete_requires_moderator_permission() {
        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;

        let token = app.user_token(10, "alice");
        let res = app.delete_with_token(&routes::definition(def), &token).await;
        assert_eq!(res.status, 403);

        let admin = app.admin_token();
        let res = app.delete_with_token(&routes::definition(def), &admin).await;
        assert_eq!(res.status, 204);

        // Idempotent.
        let res = app.delete_with_token(&routes::definition(def), &admin).await;
        assert_eq!(res.status, 204);
    }

    #[tokio::test]
    async fn deleted_definition_keeps_its_row_and_votes() {
        use sea_orm::EntityTrait;
        use server::entity::definition;

        let app = TestApp::spawn().await;
        let def = seed_definition(&app).await;
        let voter = app.user_token(10, "alice");
        app.post_with_token(&routes::upvote(def), &json!({}), &voter).await;

        let admin = app.admin_token();
        app.delete_with_token(&routes::definition(def), &admin).await;

        let row = definition::Entity::find_by_id(def)
            .one(&app.db)
            .await
            .unwrap()
            .expect("row survives soft delete");
        assert!(row.deleted);
        assert_eq!(row.num_upvotes, 1);
    }
}

use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

async fn suggest(app: &TestApp, token: &str, text: &str, sport_id: i32) -> TestResponse {
    app.post_with_token(
        routes::SUGGESTIONS,
        &json!({
            "text": text,
            "definition_text": format!("What '{text}' means."),
            "sport_id": sport_id,
        }),
        token,
    )
    .await
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn any_authenticated_user_can_suggest() {
        let app = TestApp::spawn().await;
        let basketball = app.sport_id("Basketball").await;

        let res = app
            .post_without_token(
                routes::SUGGESTIONS,
                &json!({"text": "Brick", "definition_text": "A badly missed shot.", "sport_id": basketball}),
            )
            .await;
        assert_eq!(res.status, 401);

        let token = app.user_token(20, "dave");
        let res = suggest(&app, &token, "Brick", basketball).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["review_status"], "pending");
        assert_eq!(res.body["user_id"], 20);
    }
}

mod queue {
    use super::*;

    #[tokio::test]
    async fn pending_queue_is_oldest_first_and_gated() {
        let app = TestApp::spawn().await;
        let basketball = app.sport_id("Basketball").await;
        let token = app.user_token(20, "dave");

        suggest(&app, &token, "Brick", basketball).await;
        suggest(&app, &token, "Swish", basketball).await;

        let res = app.get_with_token(routes::SUGGESTIONS, &token).await;
        assert_eq!(res.status, 403);

        let admin = app.admin_token();
        let res = app.get_with_token(routes::SUGGESTIONS, &admin).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["text"], "Brick");
        assert_eq!(data[1]["text"], "Swish");
    }

    #[tokio::test]
    async fn reviewed_suggestions_leave_the_queue() {
        let app = TestApp::spawn().await;
        let basketball = app.sport_id("Basketball").await;
        let admin = app.admin_token();

        let s = suggest(&app, &admin, "Brick", basketball).await;
        let res = app
            .put_with_token(
                &routes::suggestion_review(s.id()),
                &json!({"status": "rejected"}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_with_token(routes::SUGGESTIONS, &admin).await;
        assert_eq!(res.body["data"].as_array().unwrap().len(), 0);
    }
}

mod promotion {
    use super::*;

    #[tokio::test]
    async fn accepting_creates_term_and_first_definition() {
        let app = TestApp::spawn().await;
        let basketball = app.sport_id("Basketball").await;
        let admin = app.admin_token();

        let user = app.user_token(21, "erin");
        let s = suggest(&app, &user, "Pick and Roll", basketball).await;

        let res = app
            .put_with_token(
                &routes::suggestion_review(s.id()),
                &json!({"status": "accepted"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["suggestion"]["review_status"], "accepted");
        let term = &res.body["term"];
        assert_eq!(term["text"], "Pick and Roll");
        assert_eq!(term["slug"], "pick-and-roll");
        assert_eq!(term["suggested_term_id"], s.id());
        assert_eq!(term["user_id"], 21);

        // The suggestion's definition text became the first definition.
        let detail = app
            .get_without_token(&routes::term("basketball", "pick-and-roll"))
            .await;
        let definitions = detail.body["definitions"].as_array().unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0]["user_id"], 21);
    }

    #[tokio::test]
    async fn re_accepting_is_idempotent() {
        use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
        use server::entity::term;

        let app = TestApp::spawn().await;
        let basketball = app.sport_id("Basketball").await;
        let admin = app.admin_token();

        let s = suggest(&app, &admin, "Swish", basketball).await;
        let review = routes::suggestion_review(s.id());

        let first = app
            .put_with_token(&review, &json!({"status": "accepted"}), &admin)
            .await;
        assert!(first.body["term"].is_object());

        let second = app
            .put_with_token(&review, &json!({"status": "accepted"}), &admin)
            .await;
        assert_eq!(second.status, 200, "{}", second.text);
        assert!(second.body["term"].is_null());

        let count = term::Entity::find()
            .filter(term::Column::SuggestedTermId.eq(s.id()))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn rejecting_has_no_side_effects() {
        use sea_orm::{EntityTrait, PaginatorTrait};
        use server::entity::term;

        let app = TestApp::spawn().await;
        let basketball = app.sport_id("Basketball").await;
        let admin = app.admin_token();

        let s = suggest(&app, &admin, "Brick", basketball).await;
        let res = app
            .put_with_token(
                &routes::suggestion_review(s.id()),
                &json!({"status": "rejected"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["term"].is_null());
        assert_eq!(term::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn accepting_after_rejection_still_promotes_once() {
        let app = TestApp::spawn().await;
        let basketball = app.sport_id("Basketball").await;
        let admin = app.admin_token();

        let s = suggest(&app, &admin, "Swish", basketball).await;
        let review = routes::suggestion_review(s.id());

        app.put_with_token(&review, &json!({"status": "rejected"}), &admin)
            .await;
        let res = app
            .put_with_token(&review, &json!({"status": "accepted"}), &admin)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["term"].is_object());
    }

    #[tokio::test]
    async fn promotion_into_an_existing_term_conflicts_and_rolls_back() {
        let app = TestApp::spawn().await;
        let basketball = app.sport_id("Basketball").await;
        let admin = app.admin_token();

        app.create_term(&admin, "Swish", basketball).await;
        let s = suggest(&app, &admin, "Swish", basketball).await;

        let res = app
            .put_with_token(
                &routes::suggestion_review(s.id()),
                &json!({"status": "accepted"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "DUPLICATE_TERM_IN_SPORT");

        // The status change rode in the same transaction as the failed
        // promotion, so the suggestion is still pending.
        let queue = app.get_with_token(routes::SUGGESTIONS, &admin).await;
        assert_eq!(queue.body["data"].as_array().unwrap().len(), 1);
    }
}

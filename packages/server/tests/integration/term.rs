use serde_json::json;

use crate::common::{TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn creates_term_with_slug_scoped_to_sport() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        let res = app
            .post_with_token(
                routes::TERMS,
                &json!({"text": "Pick and Roll", "sport_id": basketball}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["slug"], "pick-and-roll");
        assert_eq!(res.body["approved"], true);
    }

    #[tokio::test]
    async fn duplicate_text_within_sport_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        app.create_term(&token, "Rebound", basketball).await;

        let res = app
            .post_with_token(
                routes::TERMS,
                &json!({"text": "Rebound", "sport_id": basketball}),
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "DUPLICATE_TERM_IN_SPORT");
    }

    #[tokio::test]
    async fn same_text_in_another_sport_is_allowed() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;
        let volleyball = app.sport_id("Volleyball").await;

        app.create_term(&token, "Rebound", basketball).await;

        let res = app
            .post_with_token(
                routes::TERMS,
                &json!({"text": "Rebound", "sport_id": volleyball}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["slug"], "rebound");
    }

    #[tokio::test]
    async fn colliding_slug_within_sport_gets_numbered_suffix() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        app.create_term(&token, "Rebound", basketball).await;

        // Different text, same derived slug.
        let res = app
            .post_with_token(
                routes::TERMS,
                &json!({"text": "Rebound!", "sport_id": basketball}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["slug"], "rebound-2");
    }

    #[tokio::test]
    async fn unknown_sport_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();

        let res = app
            .post_with_token(
                routes::TERMS,
                &json!({"text": "Offside", "sport_id": 99999}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn category_from_another_sport_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        let category = app
            .post_with_token(
                &routes::sport_categories("hockey"),
                &json!({"name": "Penalties"}),
                &token,
            )
            .await;
        assert_eq!(category.status, 201);

        let res = app
            .post_with_token(
                routes::TERMS,
                &json!({
                    "text": "Alley-oop",
                    "sport_id": basketball,
                    "category_ids": [category.id()],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        app.create_term(&token, "Pick and Roll", basketball).await;
        app.create_term(&token, "Rebound", basketball).await;

        let res = app.get_without_token(&format!("{}?search=PICK", routes::TERMS)).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["text"], "Pick and Roll");
    }

    #[tokio::test]
    async fn sport_filter_limits_results() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;
        let hockey = app.sport_id("Hockey").await;

        app.create_term(&token, "Rebound", basketball).await;
        app.create_term(&token, "Icing", hockey).await;

        let res = app.get_without_token(&format!("{}?sport=hockey", routes::TERMS)).await;

        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["text"], "Icing");
    }

    #[tokio::test]
    async fn counts_only_live_definitions() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        let term_id = app.create_term(&token, "Rebound", basketball).await;
        app.create_definition(&token, term_id, "Securing the ball after a missed shot.")
            .await;
        let doomed = app
            .create_definition(&token, term_id, "A second chance.")
            .await;

        let res = app
            .delete_with_token(&routes::definition(doomed), &token)
            .await;
        assert_eq!(res.status, 204);

        let res = app.get_without_token(routes::TERMS).await;
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data[0]["num_definitions"], 1);
    }

    #[tokio::test]
    async fn results_are_paginated_in_text_order() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        for text in ["Zone", "Assist", "Layup"] {
            app.create_term(&token, text, basketball).await;
        }

        let res = app
            .get_without_token(&format!("{}?page=1&per_page=2", routes::TERMS))
            .await;

        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["text"], "Assist");
        assert_eq!(data[1]["text"], "Layup");
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
    }
}

mod sport_terms {
    use super::*;

    async fn attach_categories(app: &TestApp, term_id: i32, category_ids: &[i32]) {
        use sea_orm::{ActiveModelTrait, Set};
        use server::entity::term_category;

        for &category_id in category_ids {
            term_category::ActiveModel {
                term_id: Set(term_id),
                category_id: Set(category_id),
            }
            .insert(&app.db)
            .await
            .expect("insert term_category");
        }
    }

    #[tokio::test]
    async fn category_filter_requires_all_named_categories() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        let offense = app
            .post_with_token(
                &routes::sport_categories("basketball"),
                &json!({"name": "Offense"}),
                &token,
            )
            .await
            .id();
        let slang = app
            .post_with_token(
                &routes::sport_categories("basketball"),
                &json!({"name": "Slang"}),
                &token,
            )
            .await
            .id();

        let both = app.create_term(&token, "Alley-oop", basketball).await;
        let one = app.create_term(&token, "Pick and Roll", basketball).await;
        attach_categories(&app, both, &[offense, slang]).await;
        attach_categories(&app, one, &[offense]).await;

        let res = app
            .get_without_token(&format!(
                "{}?categories=Offense,Slang",
                routes::sport_terms("basketball")
            ))
            .await;

        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["text"], "Alley-oop");

        let res = app
            .get_without_token(&format!(
                "{}?categories=Offense",
                routes::sport_terms("basketball")
            ))
            .await;
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_sport_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::sport_terms("curling")).await;

        assert_eq!(res.status, 404);
    }
}

mod detail {
    use super::*;

    #[tokio::test]
    async fn definitions_are_ranked_by_net_votes() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        let term_id = app.create_term(&token, "Rebound", basketball).await;
        let low = app.create_definition(&token, term_id, "An older take.").await;
        let high = app
            .create_definition(&token, term_id, "Securing the ball after a missed shot.")
            .await;

        let voter = app.user_token(5, "carol");
        let res = app
            .post_with_token(&routes::upvote(high), &json!({}), &voter)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app
            .get_without_token(&routes::term("basketball", "rebound"))
            .await;

        assert_eq!(res.status, 200);
        let definitions = res.body["definitions"].as_array().unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0]["id"], high);
        assert_eq!(definitions[1]["id"], low);
        assert_eq!(definitions[0]["net_votes"], 1);
    }

    #[tokio::test]
    async fn term_slug_is_scoped_to_its_sport() {
        let app = TestApp::spawn().await;
        let token = app.admin_token();
        let basketball = app.sport_id("Basketball").await;

        app.create_term(&token, "Rebound", basketball).await;

        let res = app
            .get_without_token(&routes::term("volleyball", "rebound"))
            .await;

        assert_eq!(res.status, 404);
    }
}

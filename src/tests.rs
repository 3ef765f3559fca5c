//! End-to-end tests running the full router against an in-memory SQLite
//! database, with a cookie jar standing in for the browser session.

#[cfg(test)]
mod integration_tests {
    use axum::http::StatusCode;
    use model::entities::{cafe, user, user_like_cafe};
    use sea_orm::EntityTrait;
    use serde_json::json;

    use crate::handlers::likes;
    use crate::test_utils::test_utils::{
        create_test_cafe, create_test_user, login_as, setup_test_server,
    };

    #[tokio::test]
    async fn test_health_check() {
        let (server, _state) = setup_test_server().await;

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_homepage_links_to_directory() {
        let (server, _state) = setup_test_server().await;

        let response = server.get("/").await;

        response.assert_status_ok();
        assert!(response.text().contains("/cafes"));
    }

    #[tokio::test]
    async fn test_unknown_route_renders_404_page() {
        let (server, _state) = setup_test_server().await;

        let response = server.get("/no/such/page").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("Page not found"));
    }

    #[tokio::test]
    async fn test_signup_logs_user_in() {
        let (server, state) = setup_test_server().await;

        let response = server
            .post("/signup")
            .form(&[
                ("username", "test"),
                ("first_name", "Testy"),
                ("last_name", "McTestFace"),
                ("description", ""),
                ("email", "test@example.com"),
                ("password", "secret1"),
                ("image_url", ""),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/cafes");

        // The session cookie from signup authenticates the next request
        let profile = server.get("/profile").await;
        profile.assert_status_ok();
        assert!(profile.text().contains("@test"));

        let stored = user::Entity::find()
            .one(&state.db)
            .await
            .expect("query failed")
            .expect("user missing");
        assert_eq!(stored.username, "test");
        assert!(!stored.admin);
        // Password is stored hashed, never verbatim
        assert_ne!(stored.hashed_password, "secret1");
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let (server, state) = setup_test_server().await;

        let response = server
            .post("/signup")
            .form(&[
                ("username", "test"),
                ("first_name", "Testy"),
                ("last_name", "McTestFace"),
                ("email", "test@example.com"),
                ("password", "short"),
            ])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Password must be at least 6 characters"));
        let users = user::Entity::find().all(&state.db).await.expect("query failed");
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_signup_duplicate_username_rerenders_form() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "test", "secret1", false).await;

        let response = server
            .post("/signup")
            .form(&[
                ("username", "test"),
                ("first_name", "Other"),
                ("last_name", "Person"),
                ("email", "other@example.com"),
                ("password", "secret1"),
            ])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Username or email already taken"));
    }

    #[tokio::test]
    async fn test_login_wrong_password_shows_invalid_credentials() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "test", "secret1", false).await;

        let response = server
            .post("/login")
            .form(&[("username", "test"), ("password", "wrong")])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Invalid credentials"));

        // No session was issued
        let profile = server.get("/profile").await;
        profile.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(profile.header("location"), "/login");
    }

    #[tokio::test]
    async fn test_login_unknown_user_shows_invalid_credentials() {
        let (server, _state) = setup_test_server().await;

        let response = server
            .post("/login")
            .form(&[("username", "nobody"), ("password", "secret1")])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_and_logout_cycle() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "test", "secret1", false).await;

        login_as(&server, "test", "secret1").await;
        server.get("/profile").await.assert_status_ok();

        let logout = server.post("/logout").await;
        logout.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(logout.header("location"), "/cafes");

        // Session cookie was cleared
        let profile = server.get("/profile").await;
        profile.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(profile.header("location"), "/login");
    }

    #[tokio::test]
    async fn test_cafe_list_sorted_by_name() {
        let (server, state) = setup_test_server().await;
        create_test_cafe(&state.db, "Ritual", "sf").await;
        create_test_cafe(&state.db, "Andytown", "sf").await;
        create_test_cafe(&state.db, "Mudraker", "berk").await;

        let response = server.get("/cafes").await;

        response.assert_status_ok();
        let body = response.text();
        let andytown = body.find("Andytown").expect("Andytown missing");
        let mudraker = body.find("Mudraker").expect("Mudraker missing");
        let ritual = body.find("Ritual").expect("Ritual missing");
        assert!(andytown < mudraker);
        assert!(mudraker < ritual);
    }

    #[tokio::test]
    async fn test_cafe_detail_shows_city_and_map() {
        let (server, state) = setup_test_server().await;
        let bica = create_test_cafe(&state.db, "Bica", "sf").await;

        let response = server.get(&format!("/cafes/{}", bica.id)).await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Bica"));
        assert!(body.contains("San Francisco, CA"));
        assert!(body.contains(&format!("/static/maps/{}.jpg", bica.id)));
    }

    #[tokio::test]
    async fn test_cafe_detail_unknown_id_is_404() {
        let (server, _state) = setup_test_server().await;

        server.get("/cafes/999").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_add_cafe_requires_admin() {
        let (server, state) = setup_test_server().await;

        // Anonymous
        server.get("/cafes/add").await.assert_status(StatusCode::UNAUTHORIZED);
        server.post("/cafes/add").await.assert_status(StatusCode::UNAUTHORIZED);

        // Logged in but not admin
        create_test_user(&state.db, "test", "secret1", false).await;
        login_as(&server, "test", "secret1").await;
        server.get("/cafes/add").await.assert_status(StatusCode::UNAUTHORIZED);
        server.post("/cafes/add").await.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_adds_cafe() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "admin", "secret1", true).await;
        login_as(&server, "admin", "secret1").await;

        let response = server
            .post("/cafes/add")
            .form(&[
                ("name", "Sightglass"),
                ("description", "Roaster with a big airy space"),
                ("url", "https://sightglass.example.com"),
                ("address", "270 7th St"),
                ("city_code", "sf"),
                ("image_url", ""),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        let location = response.header("location");
        let location = location.to_str().expect("bad location header");
        let cafe_id: i32 = location
            .strip_prefix("/cafes/")
            .and_then(|id| id.parse().ok())
            .expect("redirect did not point at the new cafe");

        let stored = cafe::Entity::find_by_id(cafe_id)
            .one(&state.db)
            .await
            .expect("query failed")
            .expect("cafe missing");
        assert_eq!(stored.name, "Sightglass");
        assert_eq!(stored.address, "270 7th St");
        assert_eq!(stored.city_code, "sf");
        // Empty image falls back to the placeholder
        assert_eq!(stored.image_url, cafe::DEFAULT_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_add_cafe_validation_rerenders_form() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "admin", "secret1", true).await;
        login_as(&server, "admin", "secret1").await;

        let response = server
            .post("/cafes/add")
            .form(&[
                ("name", ""),
                ("description", "No name"),
                ("url", "not-a-url"),
                ("address", "1 Somewhere"),
                ("city_code", "sf"),
            ])
            .await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("Name is required"));
        assert!(body.contains("URL must be a valid URL"));
        let cafes = cafe::Entity::find().all(&state.db).await.expect("query failed");
        assert!(cafes.is_empty());
    }

    #[tokio::test]
    async fn test_add_cafe_unknown_city_rejected() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "admin", "secret1", true).await;
        login_as(&server, "admin", "secret1").await;

        let response = server
            .post("/cafes/add")
            .form(&[
                ("name", "Nowhere Beans"),
                ("description", "A cafe in a city we do not track"),
                ("url", "https://nowhere.example.com"),
                ("address", "1 Nowhere Ln"),
                ("city_code", "atlantis"),
            ])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("City is required"));
    }

    #[tokio::test]
    async fn test_admin_edits_cafe() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "admin", "secret1", true).await;
        let bica = create_test_cafe(&state.db, "Bica", "sf").await;
        login_as(&server, "admin", "secret1").await;

        // Edit form is prefilled from the record
        let form_page = server.get(&format!("/cafes/{}/edit", bica.id)).await;
        form_page.assert_status_ok();
        assert!(form_page.text().contains("Bica"));

        let response = server
            .post(&format!("/cafes/{}/edit", bica.id))
            .form(&[
                ("name", "Bica Coffeehouse"),
                ("description", "Moved across the bay"),
                ("url", "https://bica.example.com"),
                ("address", "5701 College Ave"),
                ("city_code", "berk"),
                ("image_url", "https://bica.example.com/front.jpg"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), format!("/cafes/{}", bica.id).as_str());

        let stored = cafe::Entity::find_by_id(bica.id)
            .one(&state.db)
            .await
            .expect("query failed")
            .expect("cafe missing");
        assert_eq!(stored.name, "Bica Coffeehouse");
        assert_eq!(stored.city_code, "berk");
        assert_eq!(stored.image_url, "https://bica.example.com/front.jpg");
    }

    #[tokio::test]
    async fn test_edit_unknown_cafe_is_404() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "admin", "secret1", true).await;
        login_as(&server, "admin", "secret1").await;

        server.get("/cafes/999/edit").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_edit_updates_fields() {
        let (server, state) = setup_test_server().await;
        let created = create_test_user(&state.db, "test", "secret1", false).await;
        login_as(&server, "test", "secret1").await;

        let response = server
            .post("/profile/edit")
            .form(&[
                ("first_name", "Renamed"),
                ("last_name", "User"),
                ("description", "Coffee first"),
                ("email", "renamed@example.com"),
                ("image_url", ""),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/profile");

        let stored = user::Entity::find_by_id(created.id)
            .one(&state.db)
            .await
            .expect("query failed")
            .expect("user missing");
        assert_eq!(stored.first_name, "Renamed");
        assert_eq!(stored.email, "renamed@example.com");
        assert_eq!(stored.description.as_deref(), Some("Coffee first"));
        // Username is not editable through the profile form
        assert_eq!(stored.username, "test");
    }

    #[tokio::test]
    async fn test_profile_edit_duplicate_email_rerenders_form() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "first", "secret1", false).await;
        create_test_user(&state.db, "second", "secret1", false).await;
        login_as(&server, "second", "secret1").await;

        let response = server
            .post("/profile/edit")
            .form(&[
                ("first_name", "Test"),
                ("last_name", "User"),
                ("email", "first@example.com"),
            ])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("Email already taken"));
    }

    #[tokio::test]
    async fn test_profile_requires_login() {
        let (server, _state) = setup_test_server().await;

        let response = server.get("/profile").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");

        let edit = server.get("/profile/edit").await;
        edit.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(edit.header("location"), "/login");
    }

    #[tokio::test]
    async fn test_likes_api_anonymous_gets_soft_error() {
        let (server, _state) = setup_test_server().await;

        let status = server.get("/api/likes").add_query_param("cafe_id", 5).await;
        status.assert_status_ok();
        assert_eq!(status.json::<serde_json::Value>(), json!({"error": "Not logged in"}));

        let like = server.post("/api/like").json(&json!({"cafe_id": 5})).await;
        like.assert_status_ok();
        assert_eq!(like.json::<serde_json::Value>(), json!({"error": "Not logged in"}));

        let unlike = server.post("/api/unlike").json(&json!({"cafe_id": 5})).await;
        unlike.assert_status_ok();
        assert_eq!(unlike.json::<serde_json::Value>(), json!({"error": "Not logged in"}));
    }

    #[tokio::test]
    async fn test_like_and_status_flow() {
        let (server, state) = setup_test_server().await;
        let user = create_test_user(&state.db, "test", "secret1", false).await;
        let bica = create_test_cafe(&state.db, "Bica", "sf").await;
        login_as(&server, "test", "secret1").await;

        let before = server.get("/api/likes").add_query_param("cafe_id", bica.id).await;
        assert_eq!(before.json::<serde_json::Value>(), json!({"likes": false}));

        let liked = server.post("/api/like").json(&json!({"cafe_id": bica.id})).await;
        liked.assert_status_ok();
        assert_eq!(liked.json::<serde_json::Value>(), json!({"liked": bica.id}));

        let after = server.get("/api/likes").add_query_param("cafe_id", bica.id).await;
        assert_eq!(after.json::<serde_json::Value>(), json!({"likes": true}));

        assert!(likes::has_liked(&state.db, user.id, bica.id).await.expect("query failed"));
    }

    #[tokio::test]
    async fn test_like_twice_leaves_one_pair() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "test", "secret1", false).await;
        let bica = create_test_cafe(&state.db, "Bica", "sf").await;
        login_as(&server, "test", "secret1").await;

        for _ in 0..2 {
            let response = server.post("/api/like").json(&json!({"cafe_id": bica.id})).await;
            response.assert_status_ok();
            assert_eq!(response.json::<serde_json::Value>(), json!({"liked": bica.id}));
        }

        let pairs = user_like_cafe::Entity::find()
            .all(&state.db)
            .await
            .expect("query failed");
        assert_eq!(pairs.len(), 1);
    }

    #[tokio::test]
    async fn test_unlike_removes_pair_and_is_idempotent() {
        let (server, state) = setup_test_server().await;
        let user = create_test_user(&state.db, "test", "secret1", false).await;
        let bica = create_test_cafe(&state.db, "Bica", "sf").await;
        login_as(&server, "test", "secret1").await;

        server.post("/api/like").json(&json!({"cafe_id": bica.id})).await.assert_status_ok();

        let unliked = server.post("/api/unlike").json(&json!({"cafe_id": bica.id})).await;
        unliked.assert_status_ok();
        assert_eq!(unliked.json::<serde_json::Value>(), json!({"unliked": bica.id}));
        assert!(!likes::has_liked(&state.db, user.id, bica.id).await.expect("query failed"));

        // Unliking a cafe that was never liked is a quiet no-op
        let again = server.post("/api/unlike").json(&json!({"cafe_id": bica.id})).await;
        again.assert_status_ok();
        assert_eq!(again.json::<serde_json::Value>(), json!({"unliked": bica.id}));
    }

    #[tokio::test]
    async fn test_like_unknown_cafe_is_404() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "test", "secret1", false).await;
        login_as(&server, "test", "secret1").await;

        let like = server.post("/api/like").json(&json!({"cafe_id": 999})).await;
        like.assert_status(StatusCode::NOT_FOUND);

        let unlike = server.post("/api/unlike").json(&json!({"cafe_id": 999})).await;
        unlike.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_likes_are_per_user() {
        let (server, state) = setup_test_server().await;
        let alice = create_test_user(&state.db, "alice", "secret1", false).await;
        let bob = create_test_user(&state.db, "bob", "secret1", false).await;
        let bica = create_test_cafe(&state.db, "Bica", "sf").await;

        login_as(&server, "alice", "secret1").await;
        server.post("/api/like").json(&json!({"cafe_id": bica.id})).await.assert_status_ok();

        assert!(likes::has_liked(&state.db, alice.id, bica.id).await.expect("query failed"));
        assert!(!likes::has_liked(&state.db, bob.id, bica.id).await.expect("query failed"));
    }

    #[tokio::test]
    async fn test_tampered_session_cookie_is_anonymous() {
        let (server, state) = setup_test_server().await;
        create_test_user(&state.db, "test", "secret1", false).await;

        let response = server
            .get("/profile")
            .add_header(
                axum::http::header::COOKIE,
                axum::http::HeaderValue::from_static("cafehub_session=not-a-real-token"),
            )
            .await;

        // Garbage tokens behave like no session at all
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }
}

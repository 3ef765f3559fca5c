#[cfg(test)]
pub mod test_utils {
    use crate::auth;
    use crate::maps::MapClient;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::StatusCode;
    use axum_test::{TestServer, TestServerConfig};
    use migration::{Migrator, MigratorTrait};
    use model::entities::{cafe, city, user};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Secret used to sign session cookies in tests.
    pub const TEST_SESSION_SECRET: &str = "test-session-secret";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        // Reference cities for cafes to point at
        for (code, name, state) in [("sf", "San Francisco", "CA"), ("berk", "Berkeley", "CA")] {
            city::ActiveModel {
                code: Set(code.to_string()),
                name: Set(name.to_string()),
                state: Set(state.to_string()),
            }
            .insert(&db)
            .await
            .expect("Failed to seed test city");
        }

        // No API key: map fetches are skipped in tests
        let maps = MapClient::new(None, std::env::temp_dir().join("cafehub-test-static"))
            .expect("Failed to build map client");

        AppState {
            db,
            session_secret: TEST_SESSION_SECRET.to_string(),
            maps,
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create a test server with a cookie jar, plus the state for direct
    /// database assertions.
    pub async fn setup_test_server() -> (TestServer, AppState) {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let config = TestServerConfig {
            save_cookies: true,
            ..TestServerConfig::default()
        };
        let server = TestServer::new_with_config(app, config).expect("Failed to build test server");
        (server, state)
    }

    /// Insert a user directly with a known password.
    pub async fn create_test_user(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
        admin: bool,
    ) -> user::Model {
        let hashed = auth::hash_password(password).expect("Failed to hash test password");
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            first_name: Set("Test".to_string()),
            last_name: Set("User".to_string()),
            description: Set(None),
            image_url: Set(String::new()),
            hashed_password: Set(hashed),
            admin: Set(admin),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert test user")
    }

    /// Insert a cafe directly.
    pub async fn create_test_cafe(
        db: &DatabaseConnection,
        name: &str,
        city_code: &str,
    ) -> cafe::Model {
        cafe::ActiveModel {
            name: Set(name.to_string()),
            description: Set("A test cafe".to_string()),
            url: Set("https://cafe.example.com".to_string()),
            address: Set("123 Main St".to_string()),
            city_code: Set(city_code.to_string()),
            image_url: Set(cafe::DEFAULT_IMAGE_URL.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert test cafe")
    }

    /// Log in through the real login route so the server's cookie jar holds
    /// the session for subsequent requests.
    pub async fn login_as(server: &TestServer, username: &str, password: &str) {
        let response = server
            .post("/login")
            .form(&[("username", username), ("password", password)])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }
}

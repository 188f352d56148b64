// Test Server Helpers
//
// Spawns the real application over a MySQL pool with actix-test, plus an API key
// holding every ability.

use actix_web::App;
use sqlx::MySqlPool;

pub use actix_test::TestServer;

use stockroom::middleware::auth::{issue_api_key, Ability, MySqlApiKeyRepository};
use stockroom::AppServices;

/// Running server and a plaintext API key accepted by it
pub struct TestApp {
    pub server: TestServer,
    pub api_key: String,
}

/// Spawn the full application on a random port
pub async fn spawn_test_server(pool: MySqlPool) -> TestApp {
    let api_key = issue_test_key(&pool, &Ability::ALL).await;
    let services = AppServices::mysql(pool);

    let server = actix_test::start(move || {
        let services = services.clone();
        App::new()
            .wrap(services.auth())
            .configure(|cfg| services.configure(cfg))
    });

    TestApp { server, api_key }
}

/// Store a fresh key with the given abilities and return its plaintext
pub async fn issue_test_key(pool: &MySqlPool, abilities: &[Ability]) -> String {
    let repository = MySqlApiKeyRepository::new(pool.clone());
    issue_api_key(&repository, "integration-test", abilities)
        .await
        .expect("Failed to issue test API key")
        .1
}

// Application wiring
//
// `AppServices` owns the service graph for one backing store. `main` builds it over a
// MySQL pool; tests build it over `MemoryStore`. Both register routes through
// `configure`, so the HTTP surface is identical.

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::core::traits::HealthProbe;
use crate::middleware::auth::{ApiKeyRepository, MySqlApiKeyRepository};
use crate::middleware::{json_config, path_config, query_config, ApiKeyAuth};
use crate::modules::categories::{self, CategoryService, MySqlCategoryRepository};
use crate::modules::health;
use crate::modules::products::{self, MySqlProductRepository, ProductService};
use crate::storage::{MemoryStore, MySqlHealthProbe};

/// Services and stores shared by every worker
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub products: Arc<ProductService>,
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pub probe: Arc<dyn HealthProbe>,
}

impl AppServices {
    /// Services backed by MySQL
    pub fn mysql(pool: MySqlPool) -> Self {
        let category_repo = Arc::new(MySqlCategoryRepository::new(pool.clone()));
        let product_repo = Arc::new(MySqlProductRepository::new(pool.clone()));

        Self {
            categories: Arc::new(CategoryService::new(category_repo, product_repo.clone())),
            products: Arc::new(ProductService::new(product_repo)),
            api_keys: Arc::new(MySqlApiKeyRepository::new(pool.clone())),
            probe: Arc::new(MySqlHealthProbe::new(pool)),
        }
    }

    /// Services backed by a shared in-memory store
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(store.clone(), store.clone())),
            products: Arc::new(ProductService::new(store.clone())),
            api_keys: store.clone(),
            probe: store,
        }
    }

    /// Authentication middleware over this graph's key store
    pub fn auth(&self) -> ApiKeyAuth {
        ApiKeyAuth::new(self.api_keys.clone())
    }

    /// Register app data, extractor configs and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.categories.clone()))
            .app_data(web::Data::new(self.products.clone()))
            .app_data(web::Data::new(self.probe.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .configure(health::configure)
            .configure(categories::configure)
            .configure(products::configure);
    }
}

use crate::core::AppError;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::MySqlPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

/// Paths served without an API key
pub const PUBLIC_PATHS: &[&str] = &["/health", "/ready"];

/// Named permission checked by controllers before acting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    AccessCategories,
    CreateCategories,
    EditCategories,
    DeleteCategories,
    AccessProducts,
    CreateProducts,
    ShowProducts,
    EditProducts,
    DeleteProducts,
}

impl Ability {
    pub const ALL: [Ability; 9] = [
        Ability::AccessCategories,
        Ability::CreateCategories,
        Ability::EditCategories,
        Ability::DeleteCategories,
        Ability::AccessProducts,
        Ability::CreateProducts,
        Ability::ShowProducts,
        Ability::EditProducts,
        Ability::DeleteProducts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::AccessCategories => "access_categories",
            Ability::CreateCategories => "create_categories",
            Ability::EditCategories => "edit_categories",
            Ability::DeleteCategories => "delete_categories",
            Ability::AccessProducts => "access_products",
            Ability::CreateProducts => "create_products",
            Ability::ShowProducts => "show_products",
            Ability::EditProducts => "edit_products",
            Ability::DeleteProducts => "delete_products",
        }
    }

    /// Parse a comma-separated ability list; `*` grants every ability
    pub fn parse_list(list: &str) -> std::result::Result<Vec<Ability>, String> {
        let mut abilities = Vec::new();
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if item == "*" {
                return Ok(Ability::ALL.to_vec());
            }
            let ability: Ability = item.parse()?;
            if !abilities.contains(&ability) {
                abilities.push(ability);
            }
        }
        Ok(abilities)
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Ability {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ability::ALL
            .iter()
            .copied()
            .find(|ability| ability.as_str() == s)
            .ok_or_else(|| format!("Invalid ability: {}", s))
    }
}

/// Authenticated caller, stored in request extensions by [`ApiKeyAuth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub key_id: String,
    pub name: String,
    pub abilities: Vec<Ability>,
}

impl Principal {
    pub fn can(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }

    /// Fail with `Forbidden` unless the caller holds `ability`
    pub fn authorize(&self, ability: Ability) -> crate::core::Result<()> {
        if self.can(ability) {
            return Ok(());
        }

        tracing::warn!(
            key_id = %self.key_id,
            ability = %ability,
            "Ability denied"
        );
        Err(AppError::forbidden(format!("Missing ability '{}'", ability)))
    }
}

impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Principal>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("Missing X-API-Key header")),
        )
    }
}

/// Stored API key; only the SHA-256 of the plaintext key is kept
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ApiKeyRecord {
    pub id: String,
    pub name: String,
    pub key_hash: String,
    /// Comma-separated ability names, or `*`
    pub abilities: String,
    pub is_active: bool,
}

impl ApiKeyRecord {
    fn into_principal(self) -> crate::core::Result<Principal> {
        let abilities = Ability::parse_list(&self.abilities).map_err(AppError::internal)?;
        Ok(Principal {
            key_id: self.id,
            name: self.name,
            abilities,
        })
    }
}

/// Storage for API keys
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Look up an active key by its hash
    async fn find_active_by_hash(
        &self,
        key_hash: &str,
    ) -> crate::core::Result<Option<ApiKeyRecord>>;

    /// Store a new key record
    async fn insert(&self, record: &ApiKeyRecord) -> crate::core::Result<()>;
}

/// API key repository backed by MySQL
#[derive(Clone)]
pub struct MySqlApiKeyRepository {
    pool: MySqlPool,
}

impl MySqlApiKeyRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for MySqlApiKeyRepository {
    async fn find_active_by_hash(
        &self,
        key_hash: &str,
    ) -> crate::core::Result<Option<ApiKeyRecord>> {
        let record = sqlx::query_as::<_, ApiKeyRecord>(
            r#"
            SELECT id, name, key_hash, abilities, is_active
            FROM api_keys
            WHERE key_hash = ? AND is_active = TRUE
            LIMIT 1
            "#,
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn insert(&self, record: &ApiKeyRecord) -> crate::core::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (id, name, key_hash, abilities, is_active)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.key_hash)
        .bind(&record.abilities)
        .bind(record.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Hash an API key for storage and lookup (SHA-256, hex encoded)
pub fn hash_api_key(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}

/// Create and store a new API key, returning the record and the plaintext key.
///
/// The plaintext is only available here; callers must hand it over immediately.
pub async fn issue_api_key(
    repository: &dyn ApiKeyRepository,
    name: &str,
    abilities: &[Ability],
) -> crate::core::Result<(ApiKeyRecord, String)> {
    if name.trim().is_empty() {
        return Err(AppError::validation("API key name is required"));
    }
    if abilities.is_empty() {
        return Err(AppError::validation("API key needs at least one ability"));
    }

    let plaintext = format!("sk_{}", Uuid::new_v4().simple());
    let record = ApiKeyRecord {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        key_hash: hash_api_key(&plaintext),
        abilities: abilities
            .iter()
            .map(Ability::as_str)
            .collect::<Vec<_>>()
            .join(","),
        is_active: true,
    };

    repository.insert(&record).await?;

    tracing::info!(key_id = %record.id, name = %record.name, "API key issued");

    Ok((record, plaintext))
}

/// API Key authentication middleware
pub struct ApiKeyAuth {
    keys: Arc<dyn ApiKeyRepository>,
}

impl ApiKeyAuth {
    pub fn new(keys: Arc<dyn ApiKeyRepository>) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
            keys: self.keys.clone(),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
    keys: Arc<dyn ApiKeyRepository>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let keys = self.keys.clone();

        Box::pin(async move {
            // Skip authentication for health and readiness probes
            if PUBLIC_PATHS.contains(&req.path()) {
                return svc.call(req).await.map(|res| res.map_into_left_body());
            }

            match authenticate(keys.as_ref(), &req).await {
                Ok(principal) => {
                    req.extensions_mut().insert(principal);
                    svc.call(req).await.map(|res| res.map_into_left_body())
                }
                Err(err) => {
                    tracing::warn!(path = %req.path(), error = %err, "Authentication failed");
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(
    keys: &dyn ApiKeyRepository,
    req: &ServiceRequest,
) -> crate::core::Result<Principal> {
    let api_key = req
        .headers()
        .get("X-API-Key")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::unauthorized("Missing X-API-Key header"))?;

    let record = keys
        .find_active_by_hash(&hash_api_key(api_key))
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid API key"))?;

    if !record.is_active {
        return Err(AppError::unauthorized("API key is inactive"));
    }

    record.into_principal()
}

use async_trait::async_trait;

use crate::core::Result;

/// Liveness check against the backing store, used by the readiness endpoint
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Round-trip to the store; `Ok(())` when it can serve queries
    async fn ping(&self) -> Result<()>;
}

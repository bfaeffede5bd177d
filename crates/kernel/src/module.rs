//! The unit of composition for the service.
//!
//! At startup the bootstrap applies every module's [`Migration`]s, then calls
//! [`Module::init`] and [`Module::start`] on each module in registration order,
//! mounts [`Module::routes`] and serves. On shutdown [`Module::stop`] runs in
//! reverse registration order.

use async_trait::async_trait;
use axum::Router;

/// Borrowed startup state handed to [`Module::init`] and [`Module::start`].
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// A schema change owned by one module, applied at most once per database.
///
/// `id` orders migrations within the module; `up` may hold several statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

#[async_trait]
pub trait Module: Sync + Send {
    /// Registry key and mount segment (`{api_prefix}/{name}`).
    fn name(&self) -> &'static str;

    /// Runs once the schema is migrated, before any module starts.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes relative to the mount point; `/` is the mount point itself.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with `paths` and `components.schemas`, merged into
    /// the served document with paths prefixed by the mount point.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Runs after every module is initialized and before the listener binds.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs after the server has drained.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

//! Identity Module
//!
//! Stable, opaque device id used only to key mutation planning. The engine
//! never inspects its contents.

pub mod storage;

pub use storage::FileIdentityStore;

use crate::logic::error::RiskResult;

/// Identity collaborator
pub trait IdentityProvider: Send + Sync {
    fn get_or_create(&self) -> RiskResult<String>;
}

/// Fixed id supplied by the host
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub String);

impl StaticIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl IdentityProvider for StaticIdentity {
    fn get_or_create(&self) -> RiskResult<String> {
        Ok(self.0.clone())
    }
}

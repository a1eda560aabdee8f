pub mod identity_mapper;
pub mod reconciliation_engine;

pub use identity_mapper::IdentityMapper;
pub use reconciliation_engine::ReconciliationEngine;

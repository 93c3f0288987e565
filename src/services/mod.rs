// Service exports
pub mod auth;
pub mod cache;
pub mod ledger;
pub mod store;

pub use auth::{issue_token, AuthError, Claims, TokenVerifier};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use ledger::{AuditFilter, LedgerError, MatchLedger};
pub use store::{AdoptionStore, StoreError};

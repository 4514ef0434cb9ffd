//! CardRush Reprice Common Library
//!
//! 商品マスタと買取表の照合・値付けロジック（IOなし）

pub mod types;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod bucket;
pub mod similarity;
pub mod matcher;
pub mod price;
pub mod reconcile;

pub use types::{CatalogRecord, MatchResult, RawPrice, Record};
pub use config::{MatchConfig, PriceRules};
pub use error::{Error, Result};
pub use normalizer::normalize_key;
pub use bucket::{fragment, BucketIndex, BucketKey};
pub use similarity::similarity;
pub use matcher::{MatchContext, Matcher};
pub use price::{transform, PriceOutcome};
pub use reconcile::{reconcile, Reconciliation, ReconcileStats, RepricedEntry};

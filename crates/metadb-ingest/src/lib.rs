//! Entity aggregation and cross-reference scoring.
//!
//! A pass consumes one triple stream, folds every statement about an accepted
//! subject into a single growing record, and (for some sources) seeds the
//! reference-score table that later passes read. Passes run in a fixed
//! data-dependency order enforced by the orchestrator; the table is threaded
//! by value from pass to pass so that ordering is a type-level contract.

pub mod entity;
pub mod schema;
pub mod score;
pub mod statement;

pub use entity::{Entity, EntityAccumulator};
pub use score::{seed_entity_scores, tally_relation_objects, RefScoreTable, ScoreStrategy};
pub use statement::{Statement, StatementAccumulator};

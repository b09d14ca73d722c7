//! Gamebook adventures for the Gamebook D20 engine.
//!
//! An [`Adventure`] is a graph of [`Node`]s joined by requirement-gated
//! choices. Nodes may hold traps, treasure, on-enter effects, and monster
//! encounters. [`GameEngine`] walks the graph for one character, hands
//! encounters to [`gb_mechanics::CombatSession`], and applies the outcome.
//!
//! Adventures load from and export to JSON ([`schema`]), games save to
//! JSON snapshots ([`save`]), and [`validate`] checks an adventure's
//! structure before play.

pub mod adventure;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod node;
pub mod requirement;
pub mod sample;
pub mod save;
pub mod schema;
pub mod trap;
pub mod validate;

pub use adventure::Adventure;
pub use config::EngineConfig;
pub use effect::{EnterHook, OnEnterEffect};
pub use engine::{CombatResolution, GameEngine, NodeOutcome, NodeReport};
pub use error::{StoryError, StoryResult};
pub use node::{Choice, Ending, Node};
pub use requirement::Requirements;
pub use save::SaveState;
pub use schema::{AdventureFile, NodeFile};
pub use trap::Trap;
pub use validate::{ValidationIssue, has_errors, validate_adventure};

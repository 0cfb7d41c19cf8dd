//! Runtime implementation for `ndlr` parse tables.

pub mod definition;
pub mod recognizer;
pub mod stack;

pub use crate::{
    definition::{ParseAction, ParserDef},
    recognizer::recognize,
    stack::{NodeID, StackGraph},
};

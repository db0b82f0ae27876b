//! Actors backing the editing engine

pub mod session;

pub use session::{SessionActor, SessionArguments, SessionError, SessionMsg};

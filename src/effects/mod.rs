//! Effect libraries built on top of the handlers
//!
//! Each module provides the requests of one effect together with a runner attaching a handler
//! for them.

pub mod defer;
pub mod exception;
pub mod flip;
pub mod future;
pub mod reader;
pub mod rendezvous;
pub mod state;

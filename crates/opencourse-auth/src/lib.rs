//! Session-token types shared by token issuing (auth handlers) and
//! validation (the [`session::Session`] extractor).

pub mod cookie;
pub mod session;
pub mod token;

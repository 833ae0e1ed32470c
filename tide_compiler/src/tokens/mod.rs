//! Token model shared by every stage after the tokenizer
//!
//! The tokenizer produces a flat `Vec<Token>`; the grammar validator, the
//! scope checker and the IR builder each walk it through their own
//! [`TokenStream`] cursor, so no cursor state is shared between passes.

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenKind};
pub use token_stream::TokenStream;

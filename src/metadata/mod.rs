//! Metadata entities referenced from instruction streams.
//!
//! - [`token`] - the raw 32-bit tokens carried by instructions
//! - [`reference`] - resolved type, method and field descriptors
//! - [`resolver`] - the [`resolver::TokenResolver`] seam the decoder resolves tokens through

pub mod reference;
pub mod resolver;
pub mod token;

//! Token resolution seam between the decoder and the host's metadata.
//!
//! The decoder never reads metadata tables itself. Whenever an instruction carries a
//! token it asks a [`TokenResolver`], which stands for the module that owns the method
//! body being decoded. Hosts backed by a full metadata reader implement the trait on
//! their module type; [`MapResolver`] covers hosts that already hold resolved entities
//! and is what the tests use.

use std::collections::HashMap;

use crate::{
    metadata::{
        reference::{FieldRef, MemberRef, MethodRef, TypeRef},
        token::Token,
    },
    LookupKind, ResolutionError,
};

/// Resolves tokens embedded in an instruction stream in the context of one module.
///
/// Each call either returns the descriptor or fails with a [`ResolutionError`]. The
/// decoder propagates failures unchanged, so implementations should be deterministic.
pub trait TokenResolver {
    /// Resolve a type, method or field token.
    ///
    /// # Errors
    /// Returns a [`ResolutionError`] if `token` does not name a known member.
    fn resolve_member(&self, token: Token) -> Result<MemberRef, ResolutionError>;

    /// Resolve a user string token (`ldstr`).
    ///
    /// # Errors
    /// Returns a [`ResolutionError`] if `token` does not name a known string.
    fn resolve_string(&self, token: Token) -> Result<String, ResolutionError>;

    /// Resolve a standalone signature token (`calli`) into its raw signature blob.
    ///
    /// # Errors
    /// Returns a [`ResolutionError`] if `token` does not name a known signature.
    fn resolve_signature(&self, token: Token) -> Result<Vec<u8>, ResolutionError>;
}

/// An in-memory [`TokenResolver`] filled through builder methods.
///
/// # Examples
///
/// ```rust
/// use cilfmt::{metadata::reference::TypeRef, MapResolver, Token, TokenResolver};
///
/// let resolver = MapResolver::new()
///     .with_string(Token::new(0x7000_0001), "hello")
///     .with_member(Token::new(0x0100_0001), TypeRef::system("System.Int32"));
///
/// assert_eq!(resolver.resolve_string(Token::new(0x7000_0001)).unwrap(), "hello");
/// assert!(resolver.resolve_member(Token::new(0x0100_0002)).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    members: HashMap<Token, MemberRef>,
    strings: HashMap<Token, String>,
    signatures: HashMap<Token, Vec<u8>>,
}

impl MapResolver {
    /// Create an empty resolver, which fails every lookup
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member under `token`
    #[must_use]
    pub fn with_member(mut self, token: Token, member: impl Into<MemberRef>) -> Self {
        self.insert_member(token, member);
        self
    }

    /// Register a type under `token`
    #[must_use]
    pub fn with_type(self, token: Token, ty: TypeRef) -> Self {
        self.with_member(token, ty)
    }

    /// Register a method under `token`
    #[must_use]
    pub fn with_method(self, token: Token, method: MethodRef) -> Self {
        self.with_member(token, method)
    }

    /// Register a field under `token`
    #[must_use]
    pub fn with_field(self, token: Token, field: FieldRef) -> Self {
        self.with_member(token, field)
    }

    /// Register a user string under `token`
    #[must_use]
    pub fn with_string(mut self, token: Token, value: impl Into<String>) -> Self {
        self.strings.insert(token, value.into());
        self
    }

    /// Register a signature blob under `token`
    #[must_use]
    pub fn with_signature(mut self, token: Token, blob: impl Into<Vec<u8>>) -> Self {
        self.signatures.insert(token, blob.into());
        self
    }

    /// Register a member under `token`, replacing any previous entry
    pub fn insert_member(&mut self, token: Token, member: impl Into<MemberRef>) {
        self.members.insert(token, member.into());
    }

    /// Number of registered members, strings and signatures
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len() + self.strings.len() + self.signatures.len()
    }

    /// `true` if nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenResolver for MapResolver {
    fn resolve_member(&self, token: Token) -> Result<MemberRef, ResolutionError> {
        self.members
            .get(&token)
            .cloned()
            .ok_or(ResolutionError::new(token, LookupKind::Member))
    }

    fn resolve_string(&self, token: Token) -> Result<String, ResolutionError> {
        self.strings
            .get(&token)
            .cloned()
            .ok_or(ResolutionError::new(token, LookupKind::String))
    }

    fn resolve_signature(&self, token: Token) -> Result<Vec<u8>, ResolutionError> {
        self.signatures
            .get(&token)
            .cloned()
            .ok_or(ResolutionError::new(token, LookupKind::Signature))
    }
}

//! Reference descriptors produced by a [`crate::TokenResolver`].
//!
//! These types describe the metadata entities that instruction operands point to, in
//! just enough detail to render them in ILDasm notation: types (including generic
//! parameters and pointer/by-ref/array wrapping), methods and constructors, and fields.
//!
//! # Examples
//!
//! ```rust
//! use cilfmt::metadata::reference::{MethodRef, TypeRef};
//!
//! let console = TypeRef::named("System.Console", "System.Console");
//! let write_line = MethodRef::new(console, "WriteLine", TypeRef::system("System.Void"))
//!     .with_parameters(vec![TypeRef::system("System.String")]);
//!
//! assert!(write_line.is_static);
//! assert_eq!(write_line.signature.parameters.len(), 1);
//! ```

/// Name of the core library that hosts the primitive types
pub const CORE_LIBRARY: &str = "System.Private.CoreLib";

/// A reference to a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A named type, identified by the assembly that defines it and its full name
    /// (namespace and name, nested types joined with `/`)
    Named {
        /// The full name, e.g. `System.Collections.Generic.List`1`
        full_name: String,
        /// Simple name of the defining assembly
        assembly: String,
    },
    /// A generic parameter of the enclosing type (`!0`)
    GenericTypeParameter {
        /// Zero-based position in the type's generic parameter list
        position: u16,
        /// Declared name, e.g. `TKey`
        name: String,
    },
    /// A generic parameter of the enclosing method (`!!0`)
    GenericMethodParameter {
        /// Zero-based position in the method's generic parameter list
        position: u16,
        /// Declared name, e.g. `T`
        name: String,
    },
    /// An unmanaged pointer to the inner type
    Pointer(Box<TypeRef>),
    /// A managed reference to the inner type
    ByRef(Box<TypeRef>),
    /// An array of the element type
    Array {
        /// The element type
        element: Box<TypeRef>,
        /// Number of dimensions, 1 for vectors
        rank: u32,
    },
    /// A generic type instantiated with concrete arguments
    GenericInstance {
        /// The open generic definition
        definition: Box<TypeRef>,
        /// The type arguments, in declaration order
        arguments: Vec<TypeRef>,
    },
}

impl TypeRef {
    /// A type defined in `assembly`
    #[must_use]
    pub fn named(assembly: impl Into<String>, full_name: impl Into<String>) -> Self {
        TypeRef::Named {
            full_name: full_name.into(),
            assembly: assembly.into(),
        }
    }

    /// A type defined in the core library
    #[must_use]
    pub fn system(full_name: impl Into<String>) -> Self {
        TypeRef::named(CORE_LIBRARY, full_name)
    }

    /// The generic parameter at `position` of the enclosing type
    #[must_use]
    pub fn type_parameter(position: u16, name: impl Into<String>) -> Self {
        TypeRef::GenericTypeParameter {
            position,
            name: name.into(),
        }
    }

    /// The generic parameter at `position` of the enclosing method
    #[must_use]
    pub fn method_parameter(position: u16, name: impl Into<String>) -> Self {
        TypeRef::GenericMethodParameter {
            position,
            name: name.into(),
        }
    }

    /// Wrap this type into an unmanaged pointer
    #[must_use]
    pub fn pointer(self) -> Self {
        TypeRef::Pointer(Box::new(self))
    }

    /// Wrap this type into a managed reference
    #[must_use]
    pub fn by_ref(self) -> Self {
        TypeRef::ByRef(Box::new(self))
    }

    /// An array of this type with `rank` dimensions
    #[must_use]
    pub fn array(self, rank: u32) -> Self {
        TypeRef::Array {
            element: Box::new(self),
            rank,
        }
    }

    /// Instantiate this generic definition with `arguments`
    #[must_use]
    pub fn instantiate(self, arguments: Vec<TypeRef>) -> Self {
        TypeRef::GenericInstance {
            definition: Box::new(self),
            arguments,
        }
    }

    /// `true` for generic parameters of either the type or the method
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(
            self,
            TypeRef::GenericTypeParameter { .. } | TypeRef::GenericMethodParameter { .. }
        )
    }
}

/// Whether a method reference names a regular method or a constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MethodKind {
    /// A regular method
    #[default]
    Method,
    /// An instance (`.ctor`) or type (`.cctor`) constructor
    Constructor,
}

/// Return and parameter types of a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// The return type
    pub return_type: TypeRef,
    /// Parameter types in declaration order, excluding `this`
    pub parameters: Vec<TypeRef>,
}

impl MethodSignature {
    /// Create a signature
    #[must_use]
    pub fn new(return_type: TypeRef, parameters: Vec<TypeRef>) -> Self {
        MethodSignature {
            return_type,
            parameters,
        }
    }
}

/// A reference to a method or constructor.
///
/// For a generic method instantiation (`Generic<int32>`), `generic_arguments` holds the
/// bound arguments and `generic_definition` the signature of the open definition, in which
/// generic parameters still appear as [`TypeRef::GenericMethodParameter`]. The reference
/// formatter prints return and parameter types from the definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    /// The type declaring the method
    pub declaring_type: TypeRef,
    /// The method name, `.ctor` or `.cctor` for constructors
    pub name: String,
    /// Method or constructor
    pub kind: MethodKind,
    /// `true` if the method has no `this` parameter
    pub is_static: bool,
    /// The signature as seen at the call site
    pub signature: MethodSignature,
    /// Generic arguments; empty for non-generic methods
    pub generic_arguments: Vec<TypeRef>,
    /// Signature of the generic method definition, for generic methods
    pub generic_definition: Option<MethodSignature>,
}

impl MethodRef {
    /// A static, non-generic method with no parameters
    #[must_use]
    pub fn new(declaring_type: TypeRef, name: impl Into<String>, return_type: TypeRef) -> Self {
        MethodRef {
            declaring_type,
            name: name.into(),
            kind: MethodKind::Method,
            is_static: true,
            signature: MethodSignature::new(return_type, Vec::new()),
            generic_arguments: Vec::new(),
            generic_definition: None,
        }
    }

    /// An instance constructor of `declaring_type`
    #[must_use]
    pub fn constructor(declaring_type: TypeRef, parameters: Vec<TypeRef>) -> Self {
        MethodRef {
            declaring_type,
            name: ".ctor".to_string(),
            kind: MethodKind::Constructor,
            is_static: false,
            signature: MethodSignature::new(TypeRef::system("System.Void"), parameters),
            generic_arguments: Vec::new(),
            generic_definition: None,
        }
    }

    /// Mark the method as an instance method
    #[must_use]
    pub fn instance(mut self) -> Self {
        self.is_static = false;
        self
    }

    /// Replace the parameter list
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<TypeRef>) -> Self {
        self.signature.parameters = parameters;
        self
    }

    /// Attach generic arguments and the signature of the open generic definition
    #[must_use]
    pub fn with_generic(mut self, arguments: Vec<TypeRef>, definition: MethodSignature) -> Self {
        self.generic_arguments = arguments;
        self.generic_definition = Some(definition);
        self
    }

    /// `true` if the method has generic parameters
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    /// The signature to print: the generic definition's if present, else the call site's
    #[must_use]
    pub fn display_signature(&self) -> &MethodSignature {
        self.generic_definition.as_ref().unwrap_or(&self.signature)
    }
}

/// A reference to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    /// The type declaring the field
    pub declaring_type: TypeRef,
    /// The field name
    pub name: String,
    /// The field's type
    pub field_type: TypeRef,
}

/// A resolved member token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberRef {
    /// A type (`box`, `newarr`, `ldtoken` on a type, ...)
    Type(TypeRef),
    /// A method or constructor (`call`, `newobj`, `ldftn`, ...)
    Method(MethodRef),
    /// A field (`ldfld`, `stsfld`, ...)
    Field(FieldRef),
}

impl From<TypeRef> for MemberRef {
    fn from(value: TypeRef) -> Self {
        MemberRef::Type(value)
    }
}

impl From<MethodRef> for MemberRef {
    fn from(value: MethodRef) -> Self {
        MemberRef::Method(value)
    }
}

impl From<FieldRef> for MemberRef {
    fn from(value: FieldRef) -> Self {
        MemberRef::Field(value)
    }
}

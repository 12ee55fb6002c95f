//! Declaration attribute flags (ECMA-335 II.23.1).
//!
//! The raw values match the metadata encoding, so hosts reading real assemblies can feed
//! table columns straight into [`TypeAttributes::from_bits_retain`] and friends. Grouped
//! fields such as visibility or code type are extracted with their masks and mapped to the
//! ILAsm keyword by the helper methods below.

use bitflags::bitflags;

/// Bitmask for type visibility extraction
pub const TYPE_VISIBILITY_MASK: u32 = 0x0000_0007;
/// Bitmask for string format extraction
pub const TYPE_STRING_FORMAT_MASK: u32 = 0x0003_0000;
/// Bitmask for member access extraction
pub const METHOD_ACCESS_MASK: u32 = 0x0007;
/// Bitmask for `CODE_TYPE` extraction
pub const METHOD_IMPL_CODE_TYPE_MASK: u32 = 0x0003;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Flags of a `TypeDef` row
    pub struct TypeAttributes: u32 {
        /// Visible outside the assembly
        const PUBLIC = 0x0000_0001;
        /// Nested, visible wherever the enclosing type is
        const NESTED_PUBLIC = 0x0000_0002;
        /// Nested, visible to the enclosing type only
        const NESTED_PRIVATE = 0x0000_0003;
        /// Nested, visible to the enclosing type and subtypes
        const NESTED_FAMILY = 0x0000_0004;
        /// Nested, visible inside the assembly
        const NESTED_ASSEMBLY = 0x0000_0005;
        /// Nested, visible to subtypes inside the assembly
        const NESTED_FAM_AND_ASSEM = 0x0000_0006;
        /// Nested, visible to subtypes or inside the assembly
        const NESTED_FAM_OR_ASSEM = 0x0000_0007;
        /// Fields are laid out sequentially
        const SEQUENTIAL_LAYOUT = 0x0000_0008;
        /// Fields carry explicit offsets
        const EXPLICIT_LAYOUT = 0x0000_0010;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Type cannot be instantiated
        const ABSTRACT = 0x0000_0080;
        /// Type cannot be derived from
        const SEALED = 0x0000_0100;
        /// Name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// The runtime checks the name encoding
        const RT_SPECIAL_NAME = 0x0000_0800;
        /// Type is imported
        const IMPORT = 0x0000_1000;
        /// Type is serializable
        const SERIALIZABLE = 0x0000_2000;
        /// Strings are marshalled as UTF-16
        const UNICODE_CLASS = 0x0001_0000;
        /// Strings are marshalled per platform
        const AUTO_CLASS = 0x0002_0000;
        /// Static fields may be initialised lazily
        const BEFORE_FIELD_INIT = 0x0010_0000;
    }
}

impl TypeAttributes {
    /// The visibility keyword, `private` for non-public top-level types
    #[must_use]
    pub fn visibility_keyword(&self) -> &'static str {
        match self.bits() & TYPE_VISIBILITY_MASK {
            0 => "private",
            1 => "public",
            2 => "nested public",
            3 => "nested private",
            4 => "nested family",
            5 => "nested assembly",
            6 => "nested famandassem",
            _ => "nested famorassem",
        }
    }

    /// The layout keyword.
    ///
    /// Both layout bits set is not a valid encoding; explicit layout wins.
    #[must_use]
    pub fn layout_keyword(&self) -> &'static str {
        if self.contains(TypeAttributes::EXPLICIT_LAYOUT) {
            "explicit"
        } else if self.contains(TypeAttributes::SEQUENTIAL_LAYOUT) {
            "sequential"
        } else {
            "auto"
        }
    }

    /// The string format keyword
    #[must_use]
    pub fn string_format_keyword(&self) -> &'static str {
        match self.bits() & TYPE_STRING_FORMAT_MASK {
            0 => "ansi",
            0x0001_0000 => "unicode",
            _ => "autochar",
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Flags of a `MethodDef` row
    pub struct MethodAttributes: u32 {
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessible by anyone in the assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessible by sub-types anywhere, plus anyone in the assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessible by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method may not be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name and signature, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method always gets a new slot in the vtable
        const NEW_SLOT = 0x0100;
        /// Method can only be overridden if also accessible
        const STRICT = 0x0200;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// The runtime checks the name encoding
        const RT_SPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through P/Invoke
        const PINVOKE_IMPL = 0x2000;
        /// Method has security associated with it
        const HAS_SECURITY = 0x4000;
        /// Method calls another method containing security code
        const REQUIRE_SEC_OBJECT = 0x8000;
    }
}

impl MethodAttributes {
    /// The member access keyword
    #[must_use]
    pub fn access_keyword(&self) -> &'static str {
        match self.bits() & METHOD_ACCESS_MASK {
            0 => "compilercontrolled",
            1 => "private",
            2 => "famandassem",
            3 => "assembly",
            4 => "family",
            5 => "famorassem",
            // 7 is unused by the encoding
            _ => "public",
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Implementation flags of a `MethodDef` row
    pub struct MethodImplAttributes: u32 {
        /// Method impl is native
        const NATIVE = 0x0001;
        /// Method impl is OPTIL
        const OPTIL = 0x0002;
        /// Method impl is provided by the runtime
        const RUNTIME = 0x0003;
        /// Method impl is unmanaged, otherwise managed
        const UNMANAGED = 0x0004;
        /// Method cannot be inlined
        const NO_INLINING = 0x0008;
        /// Method is defined; used primarily in merge scenarios
        const FORWARD_REF = 0x0010;
        /// Method is single-threaded through the body
        const SYNCHRONIZED = 0x0020;
        /// Method may not be optimized by the JIT
        const NO_OPTIMIZATION = 0x0040;
        /// Method signature is exported exactly as declared
        const PRESERVE_SIG = 0x0080;
        /// Method should be inlined if possible
        const AGGRESSIVE_INLINING = 0x0100;
        /// Method is implemented inside the runtime
        const INTERNAL_CALL = 0x1000;
    }
}

impl MethodImplAttributes {
    /// The code type keyword
    #[must_use]
    pub fn code_type_keyword(&self) -> &'static str {
        match self.bits() & METHOD_IMPL_CODE_TYPE_MASK {
            0 => "cil",
            1 => "native",
            2 => "optil",
            _ => "runtime",
        }
    }

    /// The managed/unmanaged keyword
    #[must_use]
    pub fn management_keyword(&self) -> &'static str {
        if self.contains(MethodImplAttributes::UNMANAGED) {
            "unmanaged"
        } else {
            "managed"
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Flags of a `GenericParam` row
    pub struct GenericParameterAttributes: u16 {
        /// The parameter is covariant (`+`)
        const COVARIANT = 0x0001;
        /// The parameter is contravariant (`-`)
        const CONTRAVARIANT = 0x0002;
        /// The argument must be a reference type (`class`)
        const REFERENCE_TYPE_CONSTRAINT = 0x0004;
        /// The argument must be a non-nullable value type (`valuetype`)
        const NOT_NULLABLE_VALUE_TYPE_CONSTRAINT = 0x0008;
        /// The argument must have a public default constructor (`.ctor`)
        const DEFAULT_CONSTRUCTOR_CONSTRAINT = 0x0010;
    }
}

//! ILDasm-style rendering of metadata references.
//!
//! These functions turn the descriptors returned by a [`crate::TokenResolver`] into the
//! text that appears after an opcode in a disassembly listing, e.g.
//! `void [System.Console]System.Console::WriteLine(string)`.
//!
//! All functions are pure; the same input always yields the same text.
//!
//! # Examples
//!
//! ```rust
//! use cilfmt::{formatter::reference::format_type, metadata::reference::TypeRef};
//!
//! assert_eq!(format_type(&TypeRef::system("System.Int32")), "int32");
//! assert_eq!(format_type(&TypeRef::system("System.Byte").array(1)), "unsigned int8[]");
//! assert_eq!(
//!     format_type(&TypeRef::named("MyLib", "MyLib.Widget").by_ref()),
//!     "[MyLib]MyLib.Widget&"
//! );
//! ```

use crate::{
    metadata::reference::{FieldRef, MemberRef, MethodKind, MethodRef, TypeRef},
    MemberKind, Result,
};

/// How generic parameters are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GenericStyle {
    /// `!0` / `!!0`, used in references
    Position,
    /// `!T` / `!!T`, used in declarations
    Name,
}

/// Returns the reserved ILAsm spelling of a primitive type, if `full_name` names one.
#[must_use]
pub fn primitive_name(full_name: &str) -> Option<&'static str> {
    let name = match full_name {
        "System.Object" => "object",
        "System.Void" => "void",
        "System.Boolean" => "bool",
        "System.Char" => "char",
        "System.String" => "string",
        "System.TypedReference" => "typedref",

        "System.SByte" => "int8",
        "System.Int16" => "int16",
        "System.Int32" => "int32",
        "System.Int64" => "int64",

        "System.Byte" => "unsigned int8",
        "System.UInt16" => "unsigned int16",
        "System.UInt32" => "unsigned int32",
        "System.UInt64" => "unsigned int64",

        "System.IntPtr" => "native int",
        "System.UIntPtr" => "native unsigned int",

        "System.Single" => "float32",
        "System.Double" => "float64",
        _ => return None,
    };

    Some(name)
}

/// Formats a type reference.
///
/// Primitives use their reserved spelling, other named types are prefixed with their
/// assembly in brackets, and generic parameters print by position (`!0`, `!!1`).
#[must_use]
pub fn format_type(ty: &TypeRef) -> String {
    let mut out = String::new();
    write_type(&mut out, ty, GenericStyle::Position);
    out
}

/// Formats a type as written in a declaration, where generic parameters print by name
/// (`!T`, `!!TResult`).
#[must_use]
pub fn format_declared_type(ty: &TypeRef) -> String {
    let mut out = String::new();
    write_type(&mut out, ty, GenericStyle::Name);
    out
}

fn write_type(out: &mut String, ty: &TypeRef, style: GenericStyle) {
    match ty {
        TypeRef::Pointer(inner) => {
            write_type(out, inner, style);
            out.push('*');
        }
        TypeRef::ByRef(inner) => {
            write_type(out, inner, style);
            out.push('&');
        }
        TypeRef::Named {
            full_name,
            assembly,
        } => match primitive_name(full_name) {
            Some(primitive) => out.push_str(primitive),
            None => {
                out.push('[');
                out.push_str(assembly);
                out.push(']');
                out.push_str(full_name);
            }
        },
        TypeRef::GenericTypeParameter { position, name } => {
            out.push('!');
            write_generic_parameter(out, *position, name, style);
        }
        TypeRef::GenericMethodParameter { position, name } => {
            out.push_str("!!");
            write_generic_parameter(out, *position, name, style);
        }
        TypeRef::Array { element, rank } => {
            write_type(out, element, style);
            out.push('[');
            for _ in 1..*rank {
                out.push(',');
            }
            out.push(']');
        }
        TypeRef::GenericInstance {
            definition,
            arguments,
        } => {
            write_type(out, definition, style);
            write_type_list(out, '<', arguments, '>', style);
        }
    }
}

fn write_generic_parameter(out: &mut String, position: u16, name: &str, style: GenericStyle) {
    match style {
        GenericStyle::Position => out.push_str(&position.to_string()),
        GenericStyle::Name => out.push_str(name),
    }
}

fn write_type_list(out: &mut String, open: char, types: &[TypeRef], close: char, style: GenericStyle) {
    out.push(open);
    for (i, ty) in types.iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        write_type(out, ty, style);
    }
    out.push(close);
}

/// Formats a method or constructor reference.
///
/// The layout is `[instance ]<return> <declaring type>::<name>[<generic args>](<params>)`.
/// Constructors always return `void`. For generic method instantiations the return and
/// parameter types are taken from the open definition, so they print as `!!0`.
///
/// # Examples
///
/// ```rust
/// use cilfmt::{
///     formatter::reference::format_method,
///     metadata::reference::{MethodRef, TypeRef},
/// };
///
/// let object = TypeRef::system("System.Object");
/// let ctor = MethodRef::constructor(object, Vec::new());
/// assert_eq!(
///     format_method(&ctor),
///     "instance void object::.ctor()"
/// );
/// ```
#[must_use]
pub fn format_method(method: &MethodRef) -> String {
    let signature = method.display_signature();
    let mut out = String::new();

    if !method.is_static {
        out.push_str("instance ");
    }

    match method.kind {
        MethodKind::Constructor => out.push_str("void"),
        MethodKind::Method => write_type(&mut out, &signature.return_type, GenericStyle::Position),
    }
    out.push(' ');

    write_type(&mut out, &method.declaring_type, GenericStyle::Position);
    out.push_str("::");
    out.push_str(&method.name);

    if method.is_generic() {
        write_type_list(
            &mut out,
            '<',
            &method.generic_arguments,
            '>',
            GenericStyle::Position,
        );
    }

    write_type_list(
        &mut out,
        '(',
        &signature.parameters,
        ')',
        GenericStyle::Position,
    );
    out
}

/// Formats a field reference.
///
/// # Errors
/// Always returns [`crate::Error::UnsupportedMemberKind`] with [`MemberKind::Field`]; field
/// references are not rendered.
pub fn format_field(field: &FieldRef) -> Result<String> {
    log::debug!("field reference {} cannot be formatted", field.name);
    Err(unsupported_error!(MemberKind::Field))
}

/// Formats any resolved member.
///
/// # Errors
/// Returns [`crate::Error::UnsupportedMemberKind`] for field references.
pub fn format_member(member: &MemberRef) -> Result<String> {
    match member {
        MemberRef::Type(ty) => Ok(format_type(ty)),
        MemberRef::Method(method) => Ok(format_method(method)),
        MemberRef::Field(field) => format_field(field),
    }
}

/// Formats a byte blob as space separated upper-case hex pairs in parentheses.
///
/// ```rust
/// use cilfmt::formatter::reference::format_bytes;
///
/// assert_eq!(format_bytes(&[0x01, 0xFF, 0x00]), "(01 FF 00)");
/// assert_eq!(format_bytes(&[]), "()");
/// ```
#[must_use]
pub fn format_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3 + 2);
    out.push('(');
    for (i, byte) in bytes.iter().enumerate() {
        if i != 0 {
            out.push(' ');
        }
        out.push_str(&format!("{byte:02X}"));
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::reference::{MethodSignature, TypeRef},
        Error,
    };

    fn int32() -> TypeRef {
        TypeRef::system("System.Int32")
    }

    #[test]
    fn primitives() {
        let cases = [
            ("System.Object", "object"),
            ("System.Void", "void"),
            ("System.Boolean", "bool"),
            ("System.String", "string"),
            ("System.SByte", "int8"),
            ("System.Byte", "unsigned int8"),
            ("System.UInt64", "unsigned int64"),
            ("System.IntPtr", "native int"),
            ("System.UIntPtr", "native unsigned int"),
            ("System.Single", "float32"),
            ("System.Double", "float64"),
        ];

        for (full_name, expected) in cases {
            assert_eq!(format_type(&TypeRef::system(full_name)), expected);
        }
    }

    #[test]
    fn named_types() {
        let ty = TypeRef::named("System.Console", "System.Console");
        assert_eq!(format_type(&ty), "[System.Console]System.Console");

        let nested = TypeRef::named("App", "App.Outer/Inner");
        assert_eq!(format_type(&nested), "[App]App.Outer/Inner");
    }

    #[test]
    fn wrapped_types() {
        assert_eq!(format_type(&int32().pointer()), "int32*");
        assert_eq!(format_type(&int32().by_ref()), "int32&");
        assert_eq!(format_type(&int32().pointer().by_ref()), "int32*&");
        assert_eq!(format_type(&int32().array(1)), "int32[]");
        assert_eq!(format_type(&int32().array(3)), "int32[,,]");
    }

    #[test]
    fn generic_parameters() {
        assert_eq!(format_type(&TypeRef::type_parameter(0, "T")), "!0");
        assert_eq!(format_type(&TypeRef::method_parameter(1, "U")), "!!1");
        assert_eq!(format_declared_type(&TypeRef::type_parameter(0, "T")), "!T");
        assert_eq!(
            format_declared_type(&TypeRef::method_parameter(1, "U").array(1)),
            "!!U[]"
        );
    }

    #[test]
    fn generic_instance() {
        let dictionary = TypeRef::system("System.Collections.Generic.Dictionary`2")
            .instantiate(vec![TypeRef::system("System.String"), int32()]);

        assert_eq!(
            format_type(&dictionary),
            "[System.Private.CoreLib]System.Collections.Generic.Dictionary`2<string, int32>"
        );
    }

    #[test]
    fn instance_method() {
        let holder = TypeRef::named("Tests", "Tests.Holder");
        let method = MethodRef::new(holder, "Name", TypeRef::system("System.Single"))
            .instance()
            .with_parameters(vec![int32()]);

        assert_eq!(
            format_method(&method),
            "instance float32 [Tests]Tests.Holder::Name(int32)"
        );
    }

    #[test]
    fn static_method_with_parameters() {
        let math = TypeRef::system("System.Math");
        let method = MethodRef::new(math, "Max", int32()).with_parameters(vec![int32(), int32()]);

        assert_eq!(
            format_method(&method),
            "int32 [System.Private.CoreLib]System.Math::Max(int32, int32)"
        );
    }

    #[test]
    fn generic_method_uses_definition() {
        let holder = TypeRef::named("Tests", "Tests.Holder");
        let t = TypeRef::method_parameter(0, "T");
        let method = MethodRef::new(holder, "Generic", int32())
            .with_parameters(vec![int32()])
            .with_generic(vec![int32()], MethodSignature::new(t.clone(), vec![t]));

        assert_eq!(
            format_method(&method),
            "!!0 [Tests]Tests.Holder::Generic<int32>(!!0)"
        );
    }

    #[test]
    fn generic_method_arguments_are_separated() {
        let holder = TypeRef::named("Tests", "Tests.Holder");
        let void = TypeRef::system("System.Void");
        let method = MethodRef::new(holder, "Pair", void.clone()).with_generic(
            vec![int32(), TypeRef::system("System.String")],
            MethodSignature::new(void, Vec::new()),
        );

        assert_eq!(
            format_method(&method),
            "void [Tests]Tests.Holder::Pair<int32, string>()"
        );
    }

    #[test]
    fn constructor_returns_void() {
        let list = TypeRef::system("System.Collections.Generic.List`1").instantiate(vec![int32()]);
        let ctor = MethodRef::constructor(list, vec![int32()]);

        assert_eq!(
            format_method(&ctor),
            "instance void [System.Private.CoreLib]System.Collections.Generic.List`1<int32>::.ctor(int32)"
        );
    }

    #[test]
    fn fields_are_unsupported() {
        let field = FieldRef {
            declaring_type: TypeRef::named("Tests", "Tests.Holder"),
            name: "counter".to_string(),
            field_type: int32(),
        };

        assert!(matches!(
            format_field(&field),
            Err(Error::UnsupportedMemberKind(MemberKind::Field))
        ));
        assert!(format_member(&MemberRef::Field(field)).is_err());
    }

    #[test]
    fn members() {
        assert_eq!(format_member(&MemberRef::Type(int32())).unwrap(), "int32");
    }

    #[test]
    fn bytes() {
        assert_eq!(format_bytes(&[0x01, 0xFF, 0x00]), "(01 FF 00)");
        assert_eq!(format_bytes(&[0x0A]), "(0A)");
        assert_eq!(format_bytes(&[]), "()");
    }
}

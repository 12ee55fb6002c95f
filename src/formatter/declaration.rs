//! ILAsm-style declaration envelopes around method bodies.
//!
//! The declaration model is a plain description of an assembly, its types and their
//! methods, built by the host from whatever metadata source it has. The
//! [`DeclarationFormatter`] renders it as `.assembly`, `.class` and `.method` blocks with
//! the decoded instruction bodies inside.
//!
//! Only methods are rendered. Fields, events, properties, constructors, nested types and
//! P/Invoke methods fail with [`crate::Error::UnsupportedMemberKind`], as do method bodies
//! that reference a field. The check runs before anything is written, so a rejected
//! declaration leaves the sink untouched.
//!
//! # Examples
//!
//! ```rust
//! use cilfmt::{
//!     decode,
//!     formatter::{
//!         DeclarationFormatter, FormatterOptions, MethodAttributes, MethodDecl, TypeAttributes,
//!         TypeDecl,
//!     },
//!     metadata::reference::TypeRef,
//!     MapResolver,
//! };
//!
//! let body = decode(&[0x2A], &MapResolver::new())?;
//! let method = MethodDecl::new(
//!     "Run",
//!     MethodAttributes::PUBLIC | MethodAttributes::STATIC,
//!     TypeRef::system("System.Void"),
//! )
//! .with_body(body);
//! let ty = TypeDecl::new("App.Program", TypeAttributes::PUBLIC).with_method(method);
//!
//! let mut out = Vec::new();
//! DeclarationFormatter::new(FormatterOptions::compact()).format_type(&ty, &mut out)?;
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.starts_with(".class public auto ansi App.Program\n{\n"));
//! assert!(text.contains("    .method public static void Run () cil managed\n"));
//! # Ok::<(), cilfmt::Error>(())
//! ```

use std::io::Write;

use crate::{
    disassembler::{Instruction, Operand},
    formatter::{
        attributes::{
            GenericParameterAttributes, MethodAttributes, MethodImplAttributes, TypeAttributes,
        },
        config::FormatterOptions,
        instruction::InstructionFormatter,
        reference::{format_declared_type, format_type},
        text::TextBuilder,
    },
    metadata::reference::{MemberRef, TypeRef},
    MemberKind, Result,
};

/// An assembly and the types it defines.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyDecl {
    /// Simple assembly name
    pub name: String,
    /// Types in declaration order
    pub types: Vec<TypeDecl>,
}

impl AssemblyDecl {
    /// An assembly without types
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        AssemblyDecl {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// Append a type
    #[must_use]
    pub fn with_type(mut self, ty: TypeDecl) -> Self {
        self.types.push(ty);
        self
    }
}

/// A type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Namespace-qualified name
    pub full_name: String,
    /// `TypeDef` flags
    pub attributes: TypeAttributes,
    /// Generic parameters of the type
    pub generic_parameters: Vec<GenericParameterDecl>,
    /// The base type, `None` for interfaces and `System.Object`
    pub base_type: Option<TypeRef>,
    /// Members in declaration order
    pub members: Vec<MemberDecl>,
}

impl TypeDecl {
    /// A non-generic type without base type or members
    #[must_use]
    pub fn new(full_name: impl Into<String>, attributes: TypeAttributes) -> Self {
        TypeDecl {
            full_name: full_name.into(),
            attributes,
            generic_parameters: Vec::new(),
            base_type: None,
            members: Vec::new(),
        }
    }

    /// Set the base type
    #[must_use]
    pub fn with_base(mut self, base_type: TypeRef) -> Self {
        self.base_type = Some(base_type);
        self
    }

    /// Append a generic parameter
    #[must_use]
    pub fn with_generic_parameter(mut self, parameter: GenericParameterDecl) -> Self {
        self.generic_parameters.push(parameter);
        self
    }

    /// Append a member
    #[must_use]
    pub fn with_member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }

    /// Append a method
    #[must_use]
    pub fn with_method(self, method: MethodDecl) -> Self {
        self.with_member(MemberDecl::Method(method))
    }

    /// The kind of the first member that cannot be rendered
    #[must_use]
    pub fn unsupported_member(&self) -> Option<MemberKind> {
        self.members.iter().find_map(MemberDecl::unsupported_kind)
    }
}

/// A member of a type.
///
/// Every variant except [`MemberDecl::Method`] is recognised but not rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberDecl {
    /// A method with a body
    Method(MethodDecl),
    /// A field, by name
    Field(String),
    /// An event, by name
    Event(String),
    /// A property, by name
    Property(String),
    /// An instance or type constructor
    Constructor(MethodDecl),
    /// A nested type
    NestedType(Box<TypeDecl>),
}

impl MemberDecl {
    /// Which kind of member this is, if it cannot be rendered
    #[must_use]
    pub fn unsupported_kind(&self) -> Option<MemberKind> {
        match self {
            MemberDecl::Method(method) => method.unsupported_kind(),
            MemberDecl::Field(_) => Some(MemberKind::Field),
            MemberDecl::Event(_) => Some(MemberKind::Event),
            MemberDecl::Property(_) => Some(MemberKind::Property),
            MemberDecl::Constructor(_) => Some(MemberKind::Constructor),
            MemberDecl::NestedType(_) => Some(MemberKind::NestedType),
        }
    }
}

/// A method definition and its decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Method name
    pub name: String,
    /// `MethodDef` flags
    pub attributes: MethodAttributes,
    /// `MethodDef` implementation flags
    pub impl_flags: MethodImplAttributes,
    /// Return type
    pub return_type: TypeRef,
    /// Parameters, excluding `this`
    pub parameters: Vec<ParameterDecl>,
    /// Generic parameters of the method
    pub generic_parameters: Vec<GenericParameterDecl>,
    /// Decoded body
    pub body: Vec<Instruction>,
}

impl MethodDecl {
    /// A non-generic IL method without parameters or body
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: MethodAttributes, return_type: TypeRef) -> Self {
        MethodDecl {
            name: name.into(),
            attributes,
            impl_flags: MethodImplAttributes::empty(),
            return_type,
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Set the implementation flags
    #[must_use]
    pub fn with_impl_flags(mut self, impl_flags: MethodImplAttributes) -> Self {
        self.impl_flags = impl_flags;
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append a generic parameter
    #[must_use]
    pub fn with_generic_parameter(mut self, parameter: GenericParameterDecl) -> Self {
        self.generic_parameters.push(parameter);
        self
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: Vec<Instruction>) -> Self {
        self.body = body;
        self
    }

    /// `true` if the method is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.attributes.contains(MethodAttributes::STATIC)
    }

    /// `true` if the method is implemented through P/Invoke
    #[must_use]
    pub fn is_pinvoke(&self) -> bool {
        self.attributes.contains(MethodAttributes::PINVOKE_IMPL)
    }

    /// Why the method cannot be rendered, if it cannot.
    ///
    /// P/Invoke methods report [`MemberKind::PInvoke`]; a body with a field operand reports
    /// [`MemberKind::Field`].
    #[must_use]
    pub fn unsupported_kind(&self) -> Option<MemberKind> {
        if self.is_pinvoke() {
            return Some(MemberKind::PInvoke);
        }

        self.body
            .iter()
            .any(|instruction| {
                matches!(instruction.operand, Operand::Member(MemberRef::Field(_)))
            })
            .then_some(MemberKind::Field)
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
    /// Parameter type
    pub parameter_type: TypeRef,
    /// Parameter name, if the metadata has one
    pub name: Option<String>,
}

impl ParameterDecl {
    /// A named parameter
    #[must_use]
    pub fn new(parameter_type: TypeRef, name: impl Into<String>) -> Self {
        ParameterDecl {
            parameter_type,
            name: Some(name.into()),
        }
    }

    /// A parameter without a name
    #[must_use]
    pub fn unnamed(parameter_type: TypeRef) -> Self {
        ParameterDecl {
            parameter_type,
            name: None,
        }
    }
}

/// A generic parameter of a type or method.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParameterDecl {
    /// Declared name
    pub name: String,
    /// Variance and special constraint flags
    pub attributes: GenericParameterAttributes,
    /// Type constraints
    pub constraints: Vec<TypeRef>,
}

impl GenericParameterDecl {
    /// An unconstrained, invariant parameter
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        GenericParameterDecl {
            name: name.into(),
            attributes: GenericParameterAttributes::empty(),
            constraints: Vec::new(),
        }
    }

    /// Set the flags
    #[must_use]
    pub fn with_attributes(mut self, attributes: GenericParameterAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Append a type constraint
    #[must_use]
    pub fn with_constraint(mut self, constraint: TypeRef) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Renders declaration models with their method bodies.
#[derive(Debug, Clone, Default)]
pub struct DeclarationFormatter {
    instructions: InstructionFormatter,
}

impl DeclarationFormatter {
    /// Create a formatter; `options` applies to the method bodies
    #[must_use]
    pub fn new(options: FormatterOptions) -> Self {
        DeclarationFormatter {
            instructions: InstructionFormatter::new(options),
        }
    }

    /// Writes an assembly header followed by every type.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedMemberKind`] before writing anything if any type
    /// has a member that cannot be rendered, and [`crate::Error::FileError`] if the sink
    /// fails.
    pub fn format_assembly<W: Write>(&self, assembly: &AssemblyDecl, sink: W) -> Result<()> {
        for ty in &assembly.types {
            check_supported(ty)?;
        }

        log::debug!(
            "formatting assembly {} with {} types",
            assembly.name,
            assembly.types.len()
        );

        let mut builder = TextBuilder::new(sink);
        builder.append(".assembly ")?;
        builder.line(&assembly.name)?;
        builder.line("{}")?;

        for ty in &assembly.types {
            self.write_type(ty, &mut builder)?;
        }

        builder.flush()
    }

    /// Writes a single type declaration.
    ///
    /// # Errors
    /// Same as [`DeclarationFormatter::format_assembly`].
    pub fn format_type<W: Write>(&self, ty: &TypeDecl, sink: W) -> Result<()> {
        check_supported(ty)?;

        let mut builder = TextBuilder::new(sink);
        self.write_type(ty, &mut builder)?;
        builder.flush()
    }

    /// Writes a single method declaration.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedMemberKind`] before writing anything for P/Invoke
    /// methods and bodies with field operands, and [`crate::Error::FileError`] if the sink
    /// fails.
    pub fn format_method<W: Write>(&self, method: &MethodDecl, sink: W) -> Result<()> {
        if let Some(kind) = method.unsupported_kind() {
            return Err(unsupported_error!(kind));
        }

        let mut builder = TextBuilder::new(sink);
        self.write_method(method, &mut builder)?;
        builder.flush()
    }

    fn write_type<W: Write>(&self, ty: &TypeDecl, builder: &mut TextBuilder<W>) -> Result<()> {
        builder.append(".class ")?;
        builder.append(&type_attributes(ty.attributes))?;
        builder.append(&ty.full_name)?;
        if !ty.generic_parameters.is_empty() {
            builder.append(&generic_parameters(&ty.generic_parameters))?;
        }
        builder.end_line()?;

        if let Some(base_type) = &ty.base_type {
            builder.indented(|b| {
                b.append("extends ")?;
                b.line(&format_type(base_type))
            })?;
        }

        builder.line("{")?;
        builder.indented(|b| {
            for member in &ty.members {
                if let MemberDecl::Method(method) = member {
                    self.write_method(method, b)?;
                }
            }
            Ok(())
        })?;
        builder.line("}")?;
        builder.end_line()
    }

    fn write_method<W: Write>(
        &self,
        method: &MethodDecl,
        builder: &mut TextBuilder<W>,
    ) -> Result<()> {
        builder.append(".method ")?;
        builder.append(&method_attributes(method.attributes))?;
        if !method.is_static() {
            builder.append("instance ")?;
        }

        builder.append(&format_declared_type(&method.return_type))?;
        builder.append(" ")?;
        builder.append(&method.name)?;
        if !method.generic_parameters.is_empty() {
            builder.append(&generic_parameters(&method.generic_parameters))?;
        }

        write_parameters(&method.parameters, builder)?;
        builder.line(&impl_flags(method.impl_flags))?;

        builder.line("{")?;
        builder.indented(|b| self.instructions.write(&method.body, b))?;
        builder.line("}")
    }
}

fn check_supported(ty: &TypeDecl) -> Result<()> {
    match ty.unsupported_member() {
        Some(kind) => Err(unsupported_error!(kind)),
        None => Ok(()),
    }
}

/// Writes ` (<params>) `; more than one parameter moves the list to its own indented line
fn write_parameters<W: Write>(
    parameters: &[ParameterDecl],
    builder: &mut TextBuilder<W>,
) -> Result<()> {
    let list: Vec<String> = parameters.iter().map(parameter_text).collect();
    let list = list.join(", ");

    if parameters.len() <= 1 {
        builder.append(" (")?;
        builder.append(&list)?;
        return builder.append(") ");
    }

    builder.line(" (")?;
    builder.indented(|b| b.append(&list))?;
    builder.append(") ")
}

fn parameter_text(parameter: &ParameterDecl) -> String {
    let mut text = format_declared_type(&parameter.parameter_type);
    if let Some(name) = &parameter.name {
        text.push(' ');
        text.push_str(name);
    }
    text
}

/// Keywords of a `.class` line, each followed by a space
fn type_attributes(attributes: TypeAttributes) -> String {
    let mut out = String::new();
    let mut push = |keyword: &str| {
        out.push_str(keyword);
        out.push(' ');
    };

    if attributes.contains(TypeAttributes::INTERFACE) {
        push("interface");
    }
    if attributes.contains(TypeAttributes::ABSTRACT) {
        push("abstract");
    }
    push(attributes.visibility_keyword());
    push(attributes.layout_keyword());
    push(attributes.string_format_keyword());
    if attributes.contains(TypeAttributes::SEALED) {
        push("sealed");
    }
    if attributes.contains(TypeAttributes::SERIALIZABLE) {
        push("serializable");
    }
    if attributes.contains(TypeAttributes::BEFORE_FIELD_INIT) {
        push("beforefieldinit");
    }
    if attributes.contains(TypeAttributes::SPECIAL_NAME) {
        push("specialname");
    }
    if attributes.contains(TypeAttributes::RT_SPECIAL_NAME) {
        push("rtspecialname");
    }

    out
}

/// Keywords of a `.method` line up to the return type, each followed by a space
fn method_attributes(attributes: MethodAttributes) -> String {
    let flags = [
        (MethodAttributes::HIDE_BY_SIG, "hidebysig"),
        (MethodAttributes::FINAL, "final"),
        (MethodAttributes::NEW_SLOT, "newslot"),
        (MethodAttributes::SPECIAL_NAME, "specialname"),
        (MethodAttributes::RT_SPECIAL_NAME, "rtspecialname"),
        (MethodAttributes::STATIC, "static"),
        (MethodAttributes::STRICT, "strict"),
        (MethodAttributes::VIRTUAL, "virtual"),
    ];

    let mut out = String::from(attributes.access_keyword());
    out.push(' ');
    for (flag, keyword) in flags {
        if attributes.contains(flag) {
            out.push_str(keyword);
            out.push(' ');
        }
    }
    out
}

fn impl_flags(flags: MethodImplAttributes) -> String {
    let options = [
        (MethodImplAttributes::FORWARD_REF, "forwardref"),
        (MethodImplAttributes::INTERNAL_CALL, "internalcall"),
        (MethodImplAttributes::NO_INLINING, "noinlining"),
        (MethodImplAttributes::NO_OPTIMIZATION, "nooptimization"),
        (MethodImplAttributes::SYNCHRONIZED, "synchronized"),
    ];

    let mut keywords = vec![flags.code_type_keyword(), flags.management_keyword()];
    for (flag, keyword) in options {
        if flags.contains(flag) {
            keywords.push(keyword);
        }
    }
    keywords.join(" ")
}

/// `<...>` list of generic parameter declarations
fn generic_parameters(parameters: &[GenericParameterDecl]) -> String {
    let parameters: Vec<String> = parameters.iter().map(generic_parameter).collect();
    format!("<{}>", parameters.join(", "))
}

fn generic_parameter(parameter: &GenericParameterDecl) -> String {
    let attributes = parameter.attributes;
    let mut out = String::new();

    if attributes.contains(GenericParameterAttributes::NOT_NULLABLE_VALUE_TYPE_CONSTRAINT) {
        out.push_str("valuetype ");
    }
    if attributes.contains(GenericParameterAttributes::REFERENCE_TYPE_CONSTRAINT) {
        out.push_str("class ");
    }
    if attributes.contains(GenericParameterAttributes::DEFAULT_CONSTRUCTOR_CONSTRAINT) {
        out.push_str(".ctor ");
    }

    if !parameter.constraints.is_empty() {
        let constraints: Vec<String> = parameter
            .constraints
            .iter()
            .map(format_declared_type)
            .collect();
        out.push('(');
        out.push_str(&constraints.join(", "));
        out.push_str(") ");
    }

    if attributes.contains(GenericParameterAttributes::COVARIANT) {
        out.push('+');
    }
    if attributes.contains(GenericParameterAttributes::CONTRAVARIANT) {
        out.push('-');
    }

    out.push_str(&parameter.name);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, metadata::reference::FieldRef, Error, MapResolver, Token};

    fn int32() -> TypeRef {
        TypeRef::system("System.Int32")
    }

    fn object() -> TypeRef {
        TypeRef::system("System.Object")
    }

    fn render_type(ty: &TypeDecl) -> Result<String> {
        let mut out = Vec::new();
        DeclarationFormatter::new(FormatterOptions::compact()).format_type(ty, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn render_method(method: &MethodDecl) -> String {
        let mut out = Vec::new();
        DeclarationFormatter::new(FormatterOptions::compact())
            .format_method(method, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn add_method() -> MethodDecl {
        // ldarg.0, ldarg.1, add, ret
        let body = decode(&[0x02, 0x03, 0x58, 0x2A], &MapResolver::new()).unwrap();

        MethodDecl::new(
            "Add",
            MethodAttributes::PUBLIC | MethodAttributes::HIDE_BY_SIG | MethodAttributes::STATIC,
            int32(),
        )
        .with_parameter(ParameterDecl::new(int32(), "a"))
        .with_parameter(ParameterDecl::new(int32(), "b"))
        .with_body(body)
    }

    #[test]
    fn multi_parameter_method() {
        assert_eq!(
            render_method(&add_method()),
            ".method public hidebysig static int32 Add (\n\
             \x20   int32 a, int32 b) cil managed\n\
             {\n\
             \x20   0: ldarg.0\n\
             \x20   1: ldarg.1\n\
             \x20   2: add\n\
             \x20   3: ret\n\
             }\n"
        );
    }

    #[test]
    fn single_parameter_is_inline() {
        let method = MethodDecl::new(
            "Negate",
            MethodAttributes::ASSEM | MethodAttributes::VIRTUAL | MethodAttributes::NEW_SLOT,
            int32(),
        )
        .with_parameter(ParameterDecl::unnamed(int32()));

        assert_eq!(
            render_method(&method),
            ".method assembly newslot virtual instance int32 Negate (int32) cil managed\n{\n}\n"
        );
    }

    #[test]
    fn impl_flag_keywords() {
        let flags = MethodImplAttributes::RUNTIME
            | MethodImplAttributes::INTERNAL_CALL
            | MethodImplAttributes::NO_INLINING
            | MethodImplAttributes::SYNCHRONIZED;
        assert_eq!(
            impl_flags(flags),
            "runtime managed internalcall noinlining synchronized"
        );
        assert_eq!(
            impl_flags(MethodImplAttributes::UNMANAGED | MethodImplAttributes::FORWARD_REF),
            "cil unmanaged forwardref"
        );
    }

    #[test]
    fn method_access_keywords() {
        assert_eq!(
            method_attributes(MethodAttributes::empty()),
            "compilercontrolled "
        );
        assert_eq!(
            method_attributes(
                MethodAttributes::FAMILY
                    | MethodAttributes::FINAL
                    | MethodAttributes::SPECIAL_NAME
                    | MethodAttributes::RT_SPECIAL_NAME
                    | MethodAttributes::STRICT
            ),
            "family final specialname rtspecialname strict "
        );
    }

    #[test]
    fn generic_method_declaration() {
        let t = TypeRef::method_parameter(0, "T");
        let method = MethodDecl::new(
            "Identity",
            MethodAttributes::PUBLIC | MethodAttributes::STATIC,
            t.clone(),
        )
        .with_generic_parameter(GenericParameterDecl::new("T"))
        .with_parameter(ParameterDecl::new(t, "value"));

        assert_eq!(
            render_method(&method),
            ".method public static !!T Identity<T> (!!T value) cil managed\n{\n}\n"
        );
    }

    #[test]
    fn generic_parameter_constraints() {
        let value = GenericParameterDecl::new("T").with_attributes(
            GenericParameterAttributes::NOT_NULLABLE_VALUE_TYPE_CONSTRAINT
                | GenericParameterAttributes::DEFAULT_CONSTRUCTOR_CONSTRAINT,
        );
        assert_eq!(generic_parameter(&value), "valuetype .ctor T");

        let covariant = GenericParameterDecl::new("TOut")
            .with_attributes(
                GenericParameterAttributes::REFERENCE_TYPE_CONSTRAINT
                    | GenericParameterAttributes::COVARIANT,
            )
            .with_constraint(TypeRef::system("System.IDisposable"));
        assert_eq!(
            generic_parameter(&covariant),
            "class ([System.Private.CoreLib]System.IDisposable) +TOut"
        );

        let contravariant = GenericParameterDecl::new("TIn")
            .with_attributes(GenericParameterAttributes::CONTRAVARIANT);
        assert_eq!(
            generic_parameters(&[covariant, contravariant]),
            "<class ([System.Private.CoreLib]System.IDisposable) +TOut, -TIn>"
        );
    }

    #[test]
    fn type_declaration() {
        let ty = TypeDecl::new(
            "Tests.Calculator",
            TypeAttributes::PUBLIC | TypeAttributes::BEFORE_FIELD_INIT,
        )
        .with_base(object())
        .with_method(add_method());

        let text = render_type(&ty).unwrap();

        assert!(text.starts_with(
            ".class public auto ansi beforefieldinit Tests.Calculator\n\
             \x20   extends object\n\
             {\n\
             \x20   .method public hidebysig static int32 Add (\n\
             \x20       int32 a, int32 b) cil managed\n\
             \x20   {\n\
             \x20       0: ldarg.0\n"
        ));
        assert!(text.ends_with("        3: ret\n    }\n}\n\n"));
    }

    #[test]
    fn type_attribute_order() {
        let attrs = TypeAttributes::INTERFACE
            | TypeAttributes::ABSTRACT
            | TypeAttributes::NESTED_PRIVATE
            | TypeAttributes::EXPLICIT_LAYOUT
            | TypeAttributes::SEALED
            | TypeAttributes::SERIALIZABLE
            | TypeAttributes::SPECIAL_NAME
            | TypeAttributes::RT_SPECIAL_NAME;

        assert_eq!(
            type_attributes(attrs),
            "interface abstract nested private explicit ansi sealed serializable specialname rtspecialname "
        );
    }

    #[test]
    fn generic_type_header() {
        let ty = TypeDecl::new("Tests.Box`1", TypeAttributes::PUBLIC | TypeAttributes::SEALED)
            .with_generic_parameter(GenericParameterDecl::new("T"));

        assert_eq!(
            render_type(&ty).unwrap(),
            ".class public auto ansi sealed Tests.Box`1<T>\n{\n}\n\n"
        );
    }

    #[test]
    fn assembly_header() {
        let assembly = AssemblyDecl::new("Tests")
            .with_type(TypeDecl::new("Tests.Empty", TypeAttributes::empty()));

        let mut out = Vec::new();
        DeclarationFormatter::default()
            .format_assembly(&assembly, &mut out)
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            ".assembly Tests\n{}\n.class private auto ansi Tests.Empty\n{\n}\n\n"
        );
    }

    #[test]
    fn unsupported_members() {
        let cases = [
            (MemberDecl::Field("count".to_string()), MemberKind::Field),
            (MemberDecl::Event("Changed".to_string()), MemberKind::Event),
            (MemberDecl::Property("Name".to_string()), MemberKind::Property),
            (
                MemberDecl::Constructor(MethodDecl::new(
                    ".ctor",
                    MethodAttributes::PUBLIC,
                    TypeRef::system("System.Void"),
                )),
                MemberKind::Constructor,
            ),
            (
                MemberDecl::NestedType(Box::new(TypeDecl::new(
                    "Inner",
                    TypeAttributes::NESTED_PUBLIC,
                ))),
                MemberKind::NestedType,
            ),
        ];

        for (member, kind) in cases {
            let ty = TypeDecl::new("Tests.Holder", TypeAttributes::PUBLIC)
                .with_method(add_method())
                .with_member(member);

            let mut out = Vec::new();
            let result = DeclarationFormatter::default().format_type(&ty, &mut out);

            match result {
                Err(Error::UnsupportedMemberKind(found)) => assert_eq!(found, kind),
                other => panic!("Expected UnsupportedMemberKind, got {other:?}"),
            }
            assert!(out.is_empty());
        }
    }

    #[test]
    fn pinvoke_is_unsupported() {
        let method = MethodDecl::new(
            "MessageBox",
            MethodAttributes::PUBLIC | MethodAttributes::STATIC | MethodAttributes::PINVOKE_IMPL,
            int32(),
        );

        let mut out = Vec::new();
        assert!(matches!(
            DeclarationFormatter::default().format_method(&method, &mut out),
            Err(Error::UnsupportedMemberKind(MemberKind::PInvoke))
        ));

        let ty = TypeDecl::new("Tests.Native", TypeAttributes::PUBLIC).with_method(method);
        assert!(render_type(&ty).is_err());
    }

    #[test]
    fn field_operand_rejects_before_writing() {
        let field = FieldRef {
            declaring_type: TypeRef::named("Tests", "Tests.Holder"),
            name: "count".to_string(),
            field_type: int32(),
        };
        let resolver = MapResolver::new().with_field(Token::new(0x0400_0001), field);
        // ldsfld, ret
        let body = decode(&[0x7E, 0x01, 0x00, 0x00, 0x04, 0x2A], &resolver).unwrap();
        let method = MethodDecl::new(
            "Get",
            MethodAttributes::PUBLIC | MethodAttributes::STATIC,
            int32(),
        )
        .with_body(body);
        assert_eq!(method.unsupported_kind(), Some(MemberKind::Field));

        let formatter = DeclarationFormatter::default();

        let mut out = Vec::new();
        assert!(matches!(
            formatter.format_method(&method, &mut out),
            Err(Error::UnsupportedMemberKind(MemberKind::Field))
        ));
        assert!(out.is_empty());

        let ty = TypeDecl::new("Tests.Holder", TypeAttributes::PUBLIC).with_method(method);
        let mut out = Vec::new();
        assert!(matches!(
            formatter.format_type(&ty, &mut out),
            Err(Error::UnsupportedMemberKind(MemberKind::Field))
        ));
        assert!(out.is_empty());

        let assembly = AssemblyDecl::new("Tests").with_type(ty);
        let mut out = Vec::new();
        assert!(formatter.format_assembly(&assembly, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn method_operands_are_supported() {
        assert_eq!(add_method().unsupported_kind(), None);
    }
}

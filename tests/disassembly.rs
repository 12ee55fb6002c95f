//! End-to-end tests through the public API: decode a method body, then render it.

use cilfmt::{
    decode, disassemble, disassemble_to_string,
    disassembler::{FlowControl, Operand},
    formatter::{
        reference::{format_bytes, format_method},
        AssemblyDecl, DeclarationFormatter, FormatterOptions, MethodAttributes, MethodDecl,
        ParameterDecl, TypeAttributes, TypeDecl,
    },
    metadata::reference::{MethodRef, MethodSignature, TypeRef},
    Error, MapResolver, Token,
};

const GREETING: Token = Token::new(0x7000_0001);
const WRITE_LINE: Token = Token::new(0x0A00_0001);

fn resolver() -> MapResolver {
    MapResolver::new()
        .with_string(GREETING, "Hello, World!")
        .with_method(
            WRITE_LINE,
            MethodRef::new(
                TypeRef::named("System.Console", "System.Console"),
                "WriteLine",
                TypeRef::system("System.Void"),
            )
            .with_parameters(vec![TypeRef::system("System.String")]),
        )
}

/// `for (i = 0; i < 10; i++) {}` followed by a greeting
fn loop_body() -> Vec<u8> {
    vec![
        0x16, // 00 ldc.i4.0
        0x0A, // 01 stloc.0
        0x2B, 0x04, // 02 br.s 8
        0x06, // 04 ldloc.0
        0x17, // 05 ldc.i4.1
        0x58, // 06 add
        0x0A, // 07 stloc.0
        0x06, // 08 ldloc.0
        0x1F, 0x0A, // 09 ldc.i4.s 10
        0x32, 0xF7, // 11 blt.s 4
        0x72, 0x01, 0x00, 0x00, 0x70, // 13 ldstr
        0x28, 0x01, 0x00, 0x00, 0x0A, // 18 call
        0x2A, // 23 ret
    ]
}

#[test]
fn offsets_tile_the_body() {
    let code = loop_body();
    let instructions = decode(&code, &resolver()).unwrap();

    let mut expected = 0;
    for instruction in &instructions {
        assert_eq!(instruction.offset, expected);
        expected = instruction.next_offset();
    }
    assert_eq!(expected, code.len());
}

#[test]
fn loop_branches_resolve() {
    let instructions = decode(&loop_body(), &resolver()).unwrap();

    assert_eq!(instructions[2].mnemonic(), "br.s");
    assert_eq!(instructions[2].operand, Operand::Target(8));
    assert_eq!(instructions[2].flow(), FlowControl::Branch);

    assert_eq!(instructions[9].mnemonic(), "blt.s");
    assert_eq!(instructions[9].branch_targets(), &[4]);
    assert_eq!(instructions[9].flow(), FlowControl::ConditionalBranch);
}

#[test]
fn listing_offsets_round_trip() {
    let code = loop_body();
    let instructions = decode(&code, &resolver()).unwrap();
    let text = disassemble_to_string(&code, &resolver(), FormatterOptions::default()).unwrap();

    let offsets: Vec<usize> = text
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.split(':').next().unwrap().parse().unwrap())
        .collect();
    let decoded: Vec<usize> = instructions.iter().map(|i| i.offset).collect();

    assert_eq!(offsets, decoded);
}

#[test]
fn loop_listing() {
    let text = disassemble_to_string(&loop_body(), &resolver(), FormatterOptions::default())
        .unwrap();

    assert_eq!(
        text,
        "00: ldc.i4.0\n\
         01: stloc.0\n\
         02: br.s 8\n\
         \n\
         04: ldloc.0\n\
         05: ldc.i4.1\n\
         06: add\n\
         07: stloc.0\n\
         08: ldloc.0\n\
         09: ldc.i4.s 10\n\
         11: blt.s 4\n\
         \n\
         13: ldstr \"Hello, World!\"\n\
         18: call void [System.Console]System.Console::WriteLine(string)\n\
         23: ret\n\
         \n"
    );
}

#[test]
fn short_branch_forward() {
    // br.s +5 lands past five nops
    let code = [0x2B, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A];
    let instructions = decode(&code, &MapResolver::new()).unwrap();

    assert_eq!(instructions[0].operand, Operand::Target(7));
}

#[test]
fn streams_into_writer() {
    let mut out = Vec::new();
    disassemble(&[0x00, 0x2A], &MapResolver::new(), FormatterOptions::compact(), &mut out)
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "0: nop\n1: ret\n");
}

#[test]
fn decoding_errors() {
    let empty = MapResolver::new();

    match decode(&[0x00, 0xA6], &empty) {
        Err(Error::UnknownOpcode { offset, .. }) => assert_eq!(offset, 1),
        other => panic!("Expected UnknownOpcode, got {other:?}"),
    }

    match decode(&[0x00, 0x20, 0x01, 0x02], &empty) {
        Err(Error::UnexpectedEndOfStream { offset }) => assert_eq!(offset, 1),
        other => panic!("Expected UnexpectedEndOfStream, got {other:?}"),
    }

    match decode(&[0x72, 0x05, 0x00, 0x00, 0x70], &empty) {
        Err(Error::UnresolvedToken { offset, token, .. }) => {
            assert_eq!(offset, 0);
            assert_eq!(token, Token::new(0x7000_0005));
        }
        other => panic!("Expected UnresolvedToken, got {other:?}"),
    }

    // br.s +1 lands inside the following ldc.i4.s
    match decode(&[0x2B, 0x01, 0x1F, 0x05, 0x2A], &empty) {
        Err(Error::InvalidBranchTarget { offset, target }) => {
            assert_eq!(offset, 0);
            assert_eq!(target, 3);
        }
        other => panic!("Expected InvalidBranchTarget, got {other:?}"),
    }
}

#[test]
fn instance_method_reference() {
    let method = MethodRef::new(
        TypeRef::named("Tests", "Tests.Holder"),
        "Name",
        TypeRef::system("System.Single"),
    )
    .instance()
    .with_parameters(vec![TypeRef::system("System.Int32")]);

    assert_eq!(
        format_method(&method),
        "instance float32 [Tests]Tests.Holder::Name(int32)"
    );
}

#[test]
fn generic_method_reference() {
    let int32 = TypeRef::system("System.Int32");
    let t = TypeRef::method_parameter(0, "T");
    let method = MethodRef::new(TypeRef::named("Tests", "Tests.Holder"), "Generic", int32.clone())
        .with_parameters(vec![int32.clone()])
        .with_generic(vec![int32], MethodSignature::new(t.clone(), vec![t]));

    assert_eq!(
        format_method(&method),
        "!!0 [Tests]Tests.Holder::Generic<int32>(!!0)"
    );
}

#[test]
fn byte_blob() {
    assert_eq!(format_bytes(&[0x01, 0xFF, 0x00]), "(01 FF 00)");
    assert_eq!(format_bytes(&[]), "()");
}

#[test]
fn assembly_declaration() {
    let body = decode(
        &[
            0x72, 0x01, 0x00, 0x00, 0x70, // ldstr
            0x28, 0x01, 0x00, 0x00, 0x0A, // call
            0x2A, // ret
        ],
        &resolver(),
    )
    .unwrap();

    let main = MethodDecl::new(
        "Main",
        MethodAttributes::PUBLIC | MethodAttributes::HIDE_BY_SIG | MethodAttributes::STATIC,
        TypeRef::system("System.Void"),
    )
    .with_parameter(ParameterDecl::new(
        TypeRef::system("System.String").array(1),
        "args",
    ))
    .with_body(body);

    let program = TypeDecl::new(
        "Hello.Program",
        TypeAttributes::PUBLIC | TypeAttributes::BEFORE_FIELD_INIT,
    )
    .with_base(TypeRef::system("System.Object"))
    .with_method(main);

    let assembly = AssemblyDecl::new("Hello").with_type(program);

    let mut out = Vec::new();
    DeclarationFormatter::new(FormatterOptions::compact())
        .format_assembly(&assembly, &mut out)
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        ".assembly Hello\n\
         {}\n\
         .class public auto ansi beforefieldinit Hello.Program\n\
         \x20   extends object\n\
         {\n\
         \x20   .method public hidebysig static void Main (string[] args) cil managed\n\
         \x20   {\n\
         \x20       00: ldstr \"Hello, World!\"\n\
         \x20       05: call void [System.Console]System.Console::WriteLine(string)\n\
         \x20       10: ret\n\
         \x20   }\n\
         }\n\
         \n"
    );
}

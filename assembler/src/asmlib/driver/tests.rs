use super::*;
use crate::types::ErrorKind;

fn assemble_ok(source: &str) -> Vec<u32> {
    match assemble_source(source) {
        Ok(program) => program.into_words(),
        Err(e) => panic!("failed to assemble:\n{source}\nerror: {e}"),
    }
}

fn assemble_err(source: &str) -> LineError {
    match assemble_source(source) {
        Ok(program) => panic!("expected an error, got {:x?}", program.words()),
        Err(e) => e,
    }
}

#[test]
fn test_empty_source() {
    assert!(assemble_ok("").is_empty());
    assert!(assemble_ok("# only a comment\n\n   \n").is_empty());
}

#[test]
fn test_straight_line_program() {
    let words = assemble_ok(concat!(
        "    ldi r0, 5\n",
        "    ldi r1, 7\n",
        "    add r2, r0, r1\n",
        "end:\n",
        "    b end\n",
    ));
    assert_eq!(
        words,
        vec![0x2000_0005, 0x2010_0007, 0x0020_0100, 0xC000_0000]
    );
}

#[test]
fn test_backward_branch() {
    let words = assemble_ok(concat!(
        "loop:\n",
        "    subi r3, r3, 1\n",
        "    add r4, r4, r3\n",
        "    bne loop\n",
    ));
    assert_eq!(words, vec![0x1033_1001, 0x0044_0300, 0xC8FF_FFFE]);
}

#[test]
fn test_forward_reference() {
    let words = assemble_ok(concat!(
        "    b skip\n",
        "    ldi r1, 1\n",
        "skip:\n",
        "    ldi r1, 2\n",
    ));
    assert_eq!(words, vec![0xC000_0002, 0x2010_0001, 0x2010_0002]);
}

#[test]
fn test_origin_and_data() {
    let words = assemble_ok(concat!(
        "    ldi r1, msg\n",
        "    .WORD msg\n",
        "    .ORG 0x100\n",
        "msg:\n",
        "    .STR \"ABC\"   # packed\n",
        "    .STRW \"ok\"\n",
    ));
    assert_eq!(
        words,
        vec![0x2010_0100, 0x0000_0100, 0x0043_4241, 0x6F, 0x6B]
    );
}

#[test]
fn test_stack_pseudo_instructions() {
    let words = assemble_ok(concat!(
        "    push lr\n",
        "    pop lr\n",
        "    rts\n",
    ));
    assert_eq!(words, vec![0xA0DE_0000, 0x60ED_0004, 0xF000_0000]);
}

#[test]
fn test_case_insensitive_mnemonics_and_registers() {
    assert_eq!(assemble_ok("    ADDEQ R2, R0, R1\n"), vec![0x0920_0100]);
    assert_eq!(assemble_ok("\tLdw r1, SP, 0x4\r\n"), vec![0x601D_0004]);
}

#[test]
fn test_labels_are_case_sensitive() {
    let e = assemble_err("Loop:\n    b loop\n");
    assert_eq!(e.kind, ErrorKind::UndefinedLabel);
    assert_eq!(e.line, 2);
}

#[test]
fn test_error_reports_line_number() {
    let e = assemble_err("    ldi r1, 1\n\n    frob r1\n");
    assert_eq!(e.kind, ErrorKind::UnknownMnemonic);
    assert_eq!(e.line, 3);
}

#[test]
fn test_duplicate_label() {
    let e = assemble_err("here:\n    ldi r1, 1\nhere:\n");
    assert_eq!(e.kind, ErrorKind::Syntax);
    assert_eq!(e.line, 3);
}

#[test]
fn test_branch_out_of_range() {
    let e = assemble_err("    b 0x1000000\n");
    assert_eq!(e.kind, ErrorKind::OutOfRange);
    assert_eq!(e.line, 1);
}

#[test]
fn test_unindented_instruction() {
    let e = assemble_err("    ldi r1, 1\nadd r1, r1, r1\n");
    assert_eq!(e.kind, ErrorKind::Syntax);
    assert_eq!(e.line, 2);
}

#[test]
fn test_bad_register() {
    let e = assemble_err("    add r1, r2, r99\n");
    assert_eq!(e.kind, ErrorKind::BadRegister);
}

#[test]
fn test_write_output_file() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let input = dir.path().join("prog.s");
    let output = dir.path().join("prog.hex");
    std::fs::write(&input, "    ldi r1, 0x2a\n").expect("should be able to write test input");
    let program = assemble_file(input.as_os_str(), Some(&output)).expect("assembly succeeds");
    assert_eq!(program.words(), &[0x2010_002A]);
    let written = std::fs::read_to_string(&output).expect("output exists");
    assert_eq!(written, "2010002a\n");
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let input = dir.path().join("absent.s");
    match assemble_file(input.as_os_str(), None) {
        Err(AssemblerFailure::IoErrorOnInput { line_number, .. }) => {
            assert_eq!(line_number, None);
        }
        other => panic!("expected an input error, got {other:?}"),
    }
}

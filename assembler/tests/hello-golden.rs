use std::fs;
use std::path::PathBuf;

use assembler::*;

fn get_test_input_file_name(relative_to_manifest: &str) -> PathBuf {
    let mut location = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    location.push(relative_to_manifest);
    if location.exists() {
        location
    } else {
        panic!(
            "Cannot find input {relative_to_manifest}: {} does not exist",
            location.display()
        );
    }
}

fn get_temp_output_file_name() -> tempfile::TempPath {
    tempfile::Builder::new()
        .suffix(".hex")
        .tempfile()
        .expect("should be able to create a temporary file")
        .into_temp_path()
}

/// Compare two program images line by line, so that a mismatch
/// names the word which differs.
fn images_are_identical(expected: &str, got: &str) -> Result<(), String> {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let got_lines: Vec<&str> = got.lines().collect();
    for (index, (e, g)) in expected_lines.iter().zip(got_lines.iter()).enumerate() {
        if e != g {
            return Err(format!(
                "difference at word {index} (address {:#x}): expected {e} but got {g}",
                index * 4
            ));
        }
    }
    if expected_lines.len() != got_lines.len() {
        return Err(format!(
            "wrong length: expected {} words but got {}",
            expected_lines.len(),
            got_lines.len()
        ));
    }
    Ok(())
}

fn assembler_golden_output_test(
    input_relative_path: &str,
    golden_output_relative_path: &str,
) -> Result<(), String> {
    let input = get_test_input_file_name(input_relative_path);
    let golden = get_test_input_file_name(golden_output_relative_path);
    let actual_output = get_temp_output_file_name();

    match assemble_file(input.as_os_str(), Some(&*actual_output)) {
        Ok(_) => {
            let expected = fs::read_to_string(&golden)
                .map_err(|e| format!("failed to read {}: {e}", golden.display()))?;
            let got = fs::read_to_string(&actual_output)
                .map_err(|e| format!("failed to read {}: {e}", actual_output.display()))?;
            images_are_identical(&expected, &got).map_err(|e| {
                format!(
                    "{} and {} are not identical: {e}",
                    golden.display(),
                    actual_output.display(),
                )
            })
        }
        Err(e) => Err(format!("failed to assemble {input_relative_path}: {e}")),
    }
}

#[test]
fn golden_output_assembling_hello_program() {
    assembler_golden_output_test("demos/hello.s", "demos/hello.hex")
        .expect("actual and golden outputs should have been identical");
}

#[test]
fn assembly_error_exit_codes() {
    let cases = [
        ("    frob r1\n", 2),
        ("    add r1, r2\n", 4),
        ("    b nowhere\n", 5),
        ("    add r1, r2, r16\n", 6),
        ("    ldi r1, 0x100000\n", 7),
        ("ldi r1, 1\n", 1),
    ];
    for (source, expected) in cases {
        match assemble_source(source) {
            Ok(program) => panic!("{source:?} should not assemble, got {:x?}", program.words()),
            Err(e) => {
                assert_eq!(
                    AssemblerFailure::from(e).exit_code(),
                    expected,
                    "wrong exit status for {source:?}"
                );
            }
        }
    }
}

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn speedyfx_exe() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_speedyfx"))
}

fn fresh_dir(name: &str) -> PathBuf {
    let temp = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&temp);
    fs::create_dir_all(&temp).unwrap();
    temp
}

fn set_bits(bytes: &[u8]) -> Vec<usize> {
    bytes
        .iter()
        .enumerate()
        .flat_map(|(i, &b)| (0..8usize).filter(move |bit| b & (1u8 << bit) != 0).map(move |bit| i * 8 + bit))
        .collect()
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(speedyfx_exe())
        .args(args)
        .output()
        .expect("Failed to run speedyfx")
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_sketch_file_to_stdout() {
    let temp = fresh_dir("speedyfx_cli_stdout");
    let input = temp.join("input.txt");
    fs::write(&input, b"Hello,,,, world").unwrap();

    let output = run(&["sketch", "--quiet", path_str(&input)]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "speedyfx sketch failed:\nstderr: {}", stderr);

    assert_eq!(output.stdout.len(), 131_072, "default vector is 128 KiB, no header");
    assert_eq!(set_bits(&output.stdout), vec![136_787, 414_231]);

    let _ = fs::remove_dir_all(&temp);
}

#[test]
fn test_sketch_file_to_output_with_custom_width() {
    let temp = fresh_dir("speedyfx_cli_output");
    let input = temp.join("input.txt");
    let out = temp.join("fv.bin");
    fs::write(&input, b"the cat sat on the mat").unwrap();

    let output = run(&[
        "sketch",
        path_str(&input),
        "--output",
        path_str(&out),
        "--bits",
        "100",
        "--seed",
        "0xDEADBEEF",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "speedyfx sketch failed:\nstderr: {}", stderr);
    assert!(output.stdout.is_empty(), "vector must go to the file, not stdout");
    assert!(stderr.contains("Bits set:"), "summary expected on stderr:\n{}", stderr);

    let fv = fs::read(&out).unwrap();
    assert_eq!(fv.len(), 13);
    assert!(set_bits(&fv).iter().all(|&bit| bit < 100));
    assert!(!set_bits(&fv).is_empty());

    let _ = fs::remove_dir_all(&temp);
}

#[test]
fn test_sketch_stdin_matches_file() {
    let temp = fresh_dir("speedyfx_cli_stdin");
    let input = temp.join("input.txt");
    let text = b"Reading from a pipe should give the same vector as a file.\n";
    fs::write(&input, text).unwrap();

    let from_file = run(&["sketch", "-q", path_str(&input)]);
    assert!(from_file.status.success());

    let mut child = Command::new(speedyfx_exe())
        .args(["sketch", "-q", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn speedyfx");
    child.stdin.take().unwrap().write_all(text).unwrap();
    let from_stdin = child.wait_with_output().unwrap();
    assert!(from_stdin.status.success());

    assert_eq!(from_stdin.stdout, from_file.stdout);

    let _ = fs::remove_dir_all(&temp);
}

#[test]
fn test_empty_file_gives_zero_vector() {
    let temp = fresh_dir("speedyfx_cli_empty");
    let input = temp.join("empty.txt");
    fs::write(&input, b"").unwrap();

    let output = run(&["sketch", "-q", path_str(&input), "--bits", "64"]);
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0u8; 8]);

    let _ = fs::remove_dir_all(&temp);
}

#[test]
fn test_zero_bits_rejected() {
    let temp = fresh_dir("speedyfx_cli_zero_bits");
    let input = temp.join("input.txt");
    fs::write(&input, b"hello").unwrap();

    let output = run(&["sketch", path_str(&input), "--bits", "0"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr.contains("Invalid bit width"), "stderr: {}", stderr);

    let _ = fs::remove_dir_all(&temp);
}

#[test]
fn test_missing_input_reports_path() {
    let output = run(&["sketch", "/no/such/speedyfx/input.txt"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("/no/such/speedyfx/input.txt"), "stderr: {}", stderr);
}

#[test]
fn test_batch_directory_tree() {
    let temp = fresh_dir("speedyfx_cli_batch");
    let input = temp.join("corpus");
    let out = temp.join("vectors");
    fs::create_dir_all(input.join("docs/nested")).unwrap();
    fs::write(input.join("readme.txt"), b"hello world").unwrap();
    fs::write(input.join("docs/a.txt"), b"HELLO WORLD").unwrap();
    fs::write(input.join("docs/nested/b.md"), b"ab").unwrap();

    let output = run(&[
        "batch",
        "--input",
        path_str(&input),
        "--output",
        path_str(&out),
        "--bits",
        "4096",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "speedyfx batch failed:\nstderr: {}", stderr);
    assert!(stderr.contains("Files sketched: 3"), "stderr: {}", stderr);

    let readme = fs::read(out.join("readme.txt.fv")).unwrap();
    let a = fs::read(out.join("docs/a.txt.fv")).unwrap();
    let b = fs::read(out.join("docs/nested/b.md.fv")).unwrap();
    assert_eq!(readme.len(), 512);
    assert_eq!(readme, a);
    assert_eq!(set_bits(&b).len(), 1);

    // A batch vector is byte-identical to the single-file command's output.
    let single = run(&["sketch", "-q", path_str(&input.join("readme.txt")), "--bits", "4096"]);
    assert!(single.status.success());
    assert_eq!(single.stdout, readme);

    let _ = fs::remove_dir_all(&temp);
}

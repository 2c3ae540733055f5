use std::path::PathBuf;
use std::process::{Command, Output};

fn csim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_csim"))
        .args(args)
        .output()
        .unwrap()
}

fn temp_trace(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("csim-cli-{}-{name}.trace", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn unreadable_trace_prints_only_the_summary() {
    let output = csim(&["-s", "1", "-E", "1", "-b", "1", "-t", "/nonexistent/csim.trace"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "hits:0 misses:0 evictions:0\n"
    );
    assert!(String::from_utf8(output.stderr).unwrap().contains("unable to read trace file"));
}

#[test]
fn verbose_keeps_diagnostics_off_stdout() {
    let path = temp_trace("verbose", " L 10,1\n garbage\n M 20,1\n");
    let output = csim(&["-v", "-s", "4", "-E", "1", "-b", "4", "-t", path.to_str().unwrap()]);
    std::fs::remove_file(&path).unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "L 10,1 miss",
            "M 20,1 miss hit",
            "hits:1 misses:2 evictions:0",
            "Percent Hits: 33.333%",
            "Percent Misses: 66.667%",
        ]
    );
}

#[test]
fn missing_arguments_fail() {
    let output = csim(&["-s", "1", "-E", "1"]);
    assert!(!output.status.success());
}

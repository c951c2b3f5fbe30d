use std::{
    env,
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};

const OUTPUT_VAR: &str = "GITHUB_OUTPUT";
const ACTIONS_VAR: &str = "GITHUB_ACTIONS";

/// Exposes `name=value` as a step output when running under GitHub Actions.
pub fn set_output(name: &str, value: &str) -> io::Result<()> {
    match env::var_os(OUTPUT_VAR) {
        Some(path) if !path.is_empty() => append_output(Path::new(&path), name, value),
        _ => Ok(()),
    }
}

fn append_output(path: &Path, name: &str, value: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}={}", name, value)
}

/// Raises an error annotation in the Actions UI; a no-op anywhere else.
pub fn error(message: &str) {
    if is_actions() {
        println!("{}", annotation("error", message));
    }
}

fn is_actions() -> bool {
    env::var(ACTIONS_VAR).is_ok_and(|value| value == "true")
}

fn annotation(command: &str, message: &str) -> String {
    format!("::{}::{}", command, escape(message))
}

fn escape(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

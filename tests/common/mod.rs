use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_psan") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "psan.exe" } else { "psan" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve psan binary path for integration test"),
    }
}

pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    run_cli_case_in(case_name, args, None)
}

/// Run the binary with an optional working directory.
///
/// HOME is pointed at a scratch dir so a developer's real
/// `~/.config/psan/config.toml` can never leak into a test run.
pub fn run_cli_case_in(case_name: &str, args: &[&str], cwd: Option<&Path>) -> CmdResult {
    let root = std::env::temp_dir().join("psan-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let scratch_home = root.join(format!("home-{}", sanitize(case_name)));
    fs::create_dir_all(&scratch_home).expect("create scratch home dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let mut command = Command::new(&bin_path);
    command
        .args(args)
        .env("HOME", &scratch_home)
        .env("RUST_BACKTRACE", "1");
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    let output = command.output().expect("execute psan command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

// ──────────────────── build-output fixtures ────────────────────

pub const GOOD_HTML: &str =
    "<html><head><title>Fixture</title></head><body>content</body></html>";
pub const GOOD_META: &str = r#"{"status":200,"headers":{"x-prerender":"1"}}"#;

/// Create `<target>/.next/server/app` and return it.
pub fn build_output(target: &Path) -> PathBuf {
    let app = target.join(".next").join("server").join("app");
    fs::create_dir_all(&app).expect("create app server dir");
    app
}

/// Write a full artifact triple for one route.
pub fn write_route(app: &Path, route: &str, html: &str, meta: &str) {
    fs::write(app.join(format!("{route}.html")), html).expect("write html");
    fs::write(app.join(format!("{route}.meta")), meta).expect("write meta");
    fs::write(app.join(format!("{route}.rsc")), "rsc payload").expect("write rsc");
}

/// Whether all three members of a route's triple exist.
pub fn triple_exists(app: &Path, route: &str) -> bool {
    ["html", "meta", "rsc"]
        .iter()
        .all(|ext| app.join(format!("{route}.{ext}")).exists())
}

/// Whether every member of a route's triple is gone.
pub fn triple_gone(app: &Path, route: &str) -> bool {
    ["html", "meta", "rsc"]
        .iter()
        .all(|ext| !app.join(format!("{route}.{ext}")).exists())
}

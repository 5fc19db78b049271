//! Supervisor tests with a toolchain that emits shell scripts.
#![cfg(unix)]

use super::*;
use std::{
    os::unix::fs::PermissionsExt,
    sync::atomic::AtomicUsize,
    time::{Duration, Instant},
};
use tempfile::TempDir;

const SLEEPER: &str = "#!/bin/sh\nexec sleep 30\n";
const CRASHER: &str = "#!/bin/sh\necho boom >&2\nexit 3\n";

/// How the fake toolchain treats normal and diagnostic sources.
#[derive(Clone)]
enum Plan {
    Binary(&'static str),
    Fail(BuildOutcome),
}

struct ScriptToolchain {
    normal: Plan,
    diagnostic: Plan,
    compiles: AtomicUsize,
}

impl ScriptToolchain {
    fn new(normal: Plan, diagnostic: Plan) -> Self {
        Self {
            normal,
            diagnostic,
            compiles: AtomicUsize::new(0),
        }
    }
}

impl Toolchain for ScriptToolchain {
    fn compile(&self, source: &Path, output: &Path) -> anyhow::Result<BuildOutcome> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        let text = fs::read_to_string(source)?;
        let plan = if text.contains("const page = ") {
            &self.diagnostic
        } else {
            &self.normal
        };
        match plan {
            Plan::Binary(script) => {
                fs::write(output, script)?;
                fs::set_permissions(output, fs::Permissions::from_mode(0o755))?;
                Ok(BuildOutcome::Success)
            }
            Plan::Fail(outcome) => Ok(outcome.clone()),
        }
    }
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let controllers = dir.path().join("app/controllers");
    fs::create_dir_all(&controllers).unwrap();
    fs::write(
        controllers.join("home_controller.go"),
        "package controllers\n\ntype HomeController struct{}\n\nfunc (c HomeController) Index() {}\n",
    )
    .unwrap();
    dir
}

fn supervisor(dir: &TempDir, toolchain: ScriptToolchain) -> Arc<Supervisor> {
    let settings = Settings {
        layout: Layout::with_root(dir.path()),
        app_name: "shop".into(),
        backend_port: 5000,
    };
    Arc::new(Supervisor::new(
        settings,
        Box::new(toolchain),
        Box::new(EmbeddedTemplates),
    ))
}

fn wait_until(timeout: Duration, cond: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    cond()
}

const TIMEOUT: Duration = Duration::from_secs(10);

#[test]
fn test_rapid_restarts_keep_one_backend() {
    let dir = project();
    let sup = supervisor(
        &dir,
        ScriptToolchain::new(Plan::Binary(SLEEPER), Plan::Binary(SLEEPER)),
    );

    for _ in 0..8 {
        sup.restart();
        thread::sleep(Duration::from_millis(15));
    }
    assert!(wait_until(TIMEOUT, || sup.running_role() == Some(Role::Normal)));
    thread::sleep(Duration::from_millis(200));

    assert_eq!(sup.live_high_water(), 1);
    sup.shutdown();
    assert!(!sup.is_running());
}

#[test]
fn test_compile_failure_serves_diagnostic() {
    let dir = project();
    let sup = supervisor(
        &dir,
        ScriptToolchain::new(
            Plan::Fail(BuildOutcome::Failed {
                excerpt: "app/controllers/home_controller.go:5:1: undefined: Foo".into(),
            }),
            Plan::Binary(SLEEPER),
        ),
    );

    sup.restart();
    assert!(wait_until(TIMEOUT, || sup.running_role() == Some(Role::Diagnostic)));

    let server = fs::read_to_string(&sup.settings().layout.server_file).unwrap();
    assert!(server.contains("undefined: Foo"));
    assert!(server.contains("<li class='err'>func (c HomeController) Index() {}</li>"));
    sup.shutdown();
}

#[test]
fn test_generated_server_error_keeps_code_block() {
    let dir = project();
    let sup = supervisor(
        &dir,
        ScriptToolchain::new(
            Plan::Fail(BuildOutcome::Failed {
                excerpt: ".ego-genfiles/server.go:3:1: undefined: controllers.Missing".into(),
            }),
            Plan::Binary(SLEEPER),
        ),
    );

    sup.restart();
    assert!(wait_until(TIMEOUT, || sup.running_role() == Some(Role::Diagnostic)));

    let server = fs::read_to_string(&sup.settings().layout.server_file).unwrap();
    assert!(server.contains("undefined: controllers.Missing"));
    assert!(server.contains("<ol><li>"));
    assert!(server.contains("<li class='err'>"));
    sup.shutdown();
}

#[test]
fn test_parse_error_serves_diagnostic() {
    let dir = project();
    fs::write(
        dir.path().join("app/controllers/home_controller.go"),
        "package controllers\n\nfunc (c HomeController) Index( {\n",
    )
    .unwrap();
    let sup = supervisor(
        &dir,
        ScriptToolchain::new(Plan::Binary(SLEEPER), Plan::Binary(SLEEPER)),
    );

    match sup.build_once() {
        CycleOutcome::Failed(failure) => {
            assert_eq!(failure.filename, "app/controllers/home_controller.go");
            assert!(failure.line_number() >= 3);
        }
        other => panic!("expected failure, got {other:?}"),
    }

    sup.restart();
    assert!(wait_until(TIMEOUT, || sup.running_role() == Some(Role::Diagnostic)));
    sup.shutdown();
}

#[test]
fn test_unexpected_exit_falls_back_to_diagnostic() {
    let dir = project();
    let sup = supervisor(
        &dir,
        ScriptToolchain::new(Plan::Binary(CRASHER), Plan::Binary(SLEEPER)),
    );

    sup.restart();
    assert!(wait_until(TIMEOUT, || sup.running_role() == Some(Role::Diagnostic)));

    let server = fs::read_to_string(&sup.settings().layout.server_file).unwrap();
    assert!(server.contains("backend exited unexpectedly"));
    assert_eq!(sup.live_high_water(), 1);
    sup.shutdown();
}

#[test]
fn test_second_level_failure_leaves_no_backend() {
    let dir = project();
    let failing = || {
        Plan::Fail(BuildOutcome::Unclassified {
            message: "exit status: 1".into(),
        })
    };
    let toolchain = ScriptToolchain::new(failing(), failing());
    let sup = supervisor(&dir, toolchain);

    sup.restart();
    // normal compile + diagnostic compile
    assert!(wait_until(TIMEOUT, || {
        fs::read_to_string(&sup.settings().layout.server_file)
            .is_ok_and(|s| s.contains("const page = "))
    }));
    thread::sleep(Duration::from_millis(200));
    assert!(!sup.is_running());
    assert_eq!(sup.live_high_water(), 0);
    sup.shutdown();
}

#[test]
fn test_missing_controllers_is_fatal() {
    let dir = TempDir::new().unwrap();
    let sup = supervisor(
        &dir,
        ScriptToolchain::new(Plan::Binary(SLEEPER), Plan::Binary(SLEEPER)),
    );
    assert!(matches!(
        sup.build_once(),
        CycleOutcome::Fatal(InspectError::Read { .. })
    ));
}

#[test]
fn test_build_once_writes_server_and_purges_genfiles() {
    let dir = project();
    let sup = supervisor(
        &dir,
        ScriptToolchain::new(Plan::Binary(SLEEPER), Plan::Binary(SLEEPER)),
    );
    let layout = sup.settings().layout.clone();
    fs::create_dir_all(&layout.genfiles).unwrap();
    fs::write(layout.genfiles.join("stale.txt"), "old").unwrap();

    assert!(matches!(sup.build_once(), CycleOutcome::Built));
    assert!(!layout.genfiles.join("stale.txt").exists());
    let server = fs::read_to_string(&layout.server_file).unwrap();
    assert!(server.contains("\"shop/app/controllers\""));
    assert!(server.contains("controllers.HomeController{}.Index()"));
    assert!(layout.binary.exists());
    assert!(!sup.is_running());
}

#[test]
fn test_stop_without_backend_is_noop() {
    let dir = project();
    let sup = supervisor(
        &dir,
        ScriptToolchain::new(Plan::Binary(SLEEPER), Plan::Binary(SLEEPER)),
    );
    sup.stop();
    sup.stop();
    assert!(!sup.is_running());
    assert_eq!(sup.live_high_water(), 0);
}

#[test]
fn test_restart_after_shutdown_does_nothing() {
    let dir = project();
    let sup = supervisor(
        &dir,
        ScriptToolchain::new(Plan::Binary(SLEEPER), Plan::Binary(SLEEPER)),
    );
    sup.shutdown();
    sup.restart();
    thread::sleep(Duration::from_millis(200));
    assert!(!sup.is_running());
}

#[test]
fn test_controllers_import_path() {
    let settings = Settings {
        layout: Layout::with_root(Path::new("/work/shop")),
        app_name: "shop".into(),
        backend_port: 5000,
    };
    assert_eq!(settings.controllers_import(), "shop/app/controllers");
}

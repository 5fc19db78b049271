//! Process supervisor: inspect → generate → compile → run, with a diagnostic
//! stand-in whenever that chain breaks.
//!
//! # Lifecycle
//!
//! ```text
//! restart() ──► stop() ──► [cycle worker]
//!                            │
//!                            ├─ inspect + render + compile ── ok ──► launch(Normal) ──► wait
//!                            │                                                          │
//!                            └─ failure ◄────────────── unexpected exit ◄───────────────┘
//!                                  │
//!                                  └─► render diagnostic + compile ──► launch(Diagnostic) ──► wait
//! ```
//!
//! Every `restart()` bumps a generation. A cycle only launches while its
//! generation is current, and launching always stops the previous backend
//! first, so at most one backend holds the backend port.

mod backend;
mod guard;

#[cfg(test)]
mod tests;

pub use backend::Role;

use std::{
    fs, io,
    path::{Component, Path},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use parking_lot::Mutex;

use crate::{
    build::{BuildOutcome, GoToolchain, Toolchain},
    config::{DevConfig, Layout},
    debug,
    diagnostic::{self, FailureInfo},
    inspector::{self, InspectError},
    log, logger,
    template::{EmbeddedTemplates, ServerVars, TemplateRenderer},
};
use backend::BackendHandle;
use guard::guarded;

/// Interval at which a cycle worker polls its backend for exit.
const EXIT_POLL: Duration = Duration::from_millis(50);

/// Result of an inspect-generate-compile pass.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The server binary is ready to launch.
    Built,
    /// Recoverable failure, shown through the diagnostic server.
    Failed(FailureInfo),
    /// The controllers directory is unreadable.
    Fatal(InspectError),
}

/// Values the supervisor needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct Settings {
    pub layout: Layout,
    pub app_name: String,
    pub backend_port: u16,
}

impl Settings {
    pub fn from_config(config: &DevConfig) -> Self {
        Self {
            layout: config.layout(),
            app_name: config.app.name.clone(),
            backend_port: config.serve.backend_port,
        }
    }

    /// Go import path of the controllers package: `<app>/<controllers dir>`.
    pub fn controllers_import(&self) -> String {
        let rel = self
            .layout
            .controllers
            .strip_prefix(&self.layout.root)
            .unwrap_or(&self.layout.controllers);
        let mut import = self.app_name.clone();
        for component in rel.components() {
            if let Component::Normal(part) = component {
                import.push('/');
                import.push_str(&part.to_string_lossy());
            }
        }
        import
    }
}

/// Owner of the backend process.
pub struct Supervisor {
    settings: Settings,
    toolchain: Box<dyn Toolchain>,
    renderer: Box<dyn TemplateRenderer>,
    backend: Mutex<Option<BackendHandle>>,
    /// Serialises generate/compile; both write into the genfiles directory.
    cycle_lock: Mutex<()>,
    generation: AtomicU64,
    next_id: AtomicU64,
    live: AtomicUsize,
    high_water: AtomicUsize,
    closed: AtomicBool,
}

impl Supervisor {
    pub fn new(
        settings: Settings,
        toolchain: Box<dyn Toolchain>,
        renderer: Box<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            settings,
            toolchain,
            renderer,
            backend: Mutex::new(None),
            cycle_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            next_id: AtomicU64::new(0),
            live: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Supervisor with the Go toolchain and the embedded templates.
    pub fn from_config(config: &DevConfig) -> Self {
        Self::new(
            Settings::from_config(config),
            Box::new(GoToolchain::new(&config.build, &config.root)),
            Box::new(EmbeddedTemplates),
        )
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ========================================================================
    // public operations
    // ========================================================================

    /// Stop the current backend and start a fresh cycle on its own worker.
    pub fn restart(self: &Arc<Self>) {
        if self.is_closed() {
            return;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.stop();

        let this = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(format!("ego-cycle-{generation}"))
            .spawn(move || this.run_cycle(generation));
        if let Err(err) = spawned {
            log!("error"; "cannot start build worker: {}", err);
        }
    }

    /// Terminate the live backend, if any, and wait until it has exited.
    pub fn stop(&self) {
        let mut slot = self.backend.lock();
        if let Some(handle) = slot.take() {
            self.terminate(handle);
        }
    }

    /// Final stop: no cycle may launch anything afterwards.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.stop();
    }

    /// One inspect-generate-compile pass, without launching.
    pub fn build_once(&self) -> CycleOutcome {
        let _cycle = self.cycle_lock.lock();
        let layout = &self.settings.layout;

        if let Err(err) = reset_genfiles(&layout.genfiles) {
            return CycleOutcome::Failed(FailureInfo::unclassified(format!(
                "cannot prepare {}: {err}",
                layout.genfiles.display()
            )));
        }

        let actions = match inspector::inspect(&layout.controllers) {
            Ok(actions) => actions,
            Err(err @ InspectError::Read { .. }) => return CycleOutcome::Fatal(err),
            Err(err) => return CycleOutcome::Failed(FailureInfo::from_inspect(&err, &layout.root)),
        };
        debug!("build"; "{} action(s) in {} controller(s)", actions.len(), actions.controllers().len());

        let source = self.renderer.render_server(&ServerVars {
            app_name: self.settings.app_name.clone(),
            controllers_import: self.settings.controllers_import(),
            actions,
            port: self.settings.backend_port,
        });
        match self.compile(&source) {
            Ok(()) => CycleOutcome::Built,
            Err(failure) => CycleOutcome::Failed(failure),
        }
    }

    /// Whether a backend process is currently held.
    pub fn is_running(&self) -> bool {
        self.backend.lock().is_some()
    }

    /// Role of the live backend.
    pub fn running_role(&self) -> Option<Role> {
        self.backend.lock().as_ref().map(|h| h.role)
    }

    /// Largest number of simultaneously live backends seen so far.
    pub fn live_high_water(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }

    // ========================================================================
    // cycle
    // ========================================================================

    fn run_cycle(&self, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        log!("build"; "rebuilding {}", self.settings.app_name);

        let outcome = guarded(|| self.build_once()).unwrap_or_else(CycleOutcome::Failed);
        match outcome {
            CycleOutcome::Built => self.run_normal(generation),
            CycleOutcome::Failed(failure) => self.run_diagnostic(generation, failure),
            CycleOutcome::Fatal(err) => {
                log!("fatal"; "{:#}", anyhow::Error::new(err));
                self.shutdown();
                crate::core::request_shutdown(1);
            }
        }
    }

    fn run_normal(&self, generation: u64) {
        let launched = guarded(|| self.launch(generation, Role::Normal)).and_then(|r| r);
        let id = match launched {
            Ok(Some(id)) => id,
            Ok(None) => return,
            Err(failure) => return self.run_diagnostic(generation, failure),
        };
        logger::status_success(&format!(
            "{} running on :{}",
            self.settings.app_name, self.settings.backend_port
        ));

        if let Some(status) = self.wait(id) {
            if self.is_closed() || !self.is_current(generation) {
                return;
            }
            let failure = FailureInfo::unclassified(format!("backend exited unexpectedly ({status})"));
            self.run_diagnostic(generation, failure);
        }
    }

    fn run_diagnostic(&self, generation: u64, failure: FailureInfo) {
        if !self.is_current(generation) {
            debug!("build"; "discarding stale failure: {}", failure);
            return;
        }
        logger::status_error("serving diagnostic page", &failure.to_string());

        let built = guarded(|| self.build_diagnostic(&failure)).and_then(|r| r);
        if let Err(second) = built {
            log!("error"; "diagnostic server failed to build: {}", second);
            return;
        }

        match guarded(|| self.launch(generation, Role::Diagnostic)).and_then(|r| r) {
            Ok(Some(id)) => {
                if let Some(status) = self.wait(id)
                    && !self.is_closed()
                {
                    logger::status_warning(&format!(
                        "diagnostic backend exited unexpectedly ({status})"
                    ));
                }
            }
            Ok(None) => {}
            Err(err) => log!("error"; "diagnostic backend failed to start: {}", err),
        }
    }

    fn build_diagnostic(&self, failure: &FailureInfo) -> Result<(), FailureInfo> {
        let _cycle = self.cycle_lock.lock();
        let layout = &self.settings.layout;

        // The failing file may be the generated server itself; read it
        // before the genfiles directory is purged.
        let source = diagnostic::render(
            failure,
            &layout.root,
            self.settings.backend_port,
            self.renderer.as_ref(),
        );

        reset_genfiles(&layout.genfiles)
            .map_err(|err| FailureInfo::unclassified(err.to_string()))?;
        self.compile(&source)
    }

    /// Write `source` to the server file and compile it. Caller holds the
    /// cycle lock.
    fn compile(&self, source: &str) -> Result<(), FailureInfo> {
        let layout = &self.settings.layout;
        fs::write(&layout.server_file, source).map_err(|err| {
            FailureInfo::unclassified(format!("cannot write {}: {err}", layout.server_file.display()))
        })?;

        match self.toolchain.compile(&layout.server_file, &layout.binary) {
            Ok(BuildOutcome::Success) => Ok(()),
            Ok(BuildOutcome::Failed { excerpt }) => Err(FailureInfo::classify(&excerpt)),
            Ok(BuildOutcome::Unclassified { message }) => Err(FailureInfo::unclassified(message)),
            Err(err) => Err(FailureInfo::unclassified(format!("{err:#}"))),
        }
    }

    // ========================================================================
    // backend handle
    // ========================================================================

    /// Start the compiled binary unless `generation` went stale. Returns the
    /// handle id to wait on.
    fn launch(&self, generation: u64, role: Role) -> Result<Option<u64>, FailureInfo> {
        let mut slot = self.backend.lock();
        if !self.is_current(generation) {
            debug!("build"; "generation {} superseded, not launching", generation);
            return Ok(None);
        }
        if let Some(previous) = slot.take() {
            self.terminate(previous);
        }

        let layout = &self.settings.layout;
        let child = backend::spawn(&layout.binary, &layout.root, self.settings.backend_port)
            .map_err(|err| FailureInfo::unclassified(format!("{err:#}")))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("backend"; "started {} (pid {})", role.as_str(), child.id());
        *slot = Some(BackendHandle {
            id,
            role,
            generation,
            expected_exit: false,
            child,
        });

        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(live, Ordering::SeqCst);
        Ok(Some(id))
    }

    /// Block until backend `id` exits on its own. `None` once someone else
    /// took the handle (a deliberate stop).
    fn wait(&self, id: u64) -> Option<std::process::ExitStatus> {
        loop {
            thread::sleep(EXIT_POLL);
            let mut slot = self.backend.lock();
            let polled = match slot.as_mut() {
                Some(handle) if handle.id == id => handle.child.try_wait(),
                _ => return None,
            };
            match polled {
                Ok(None) => continue,
                Ok(Some(status)) => {
                    if let Some(handle) = slot.take() {
                        self.release(&handle);
                    }
                    return Some(status);
                }
                Err(err) => {
                    log!("error"; "cannot poll backend: {}", err);
                    if let Some(handle) = slot.take() {
                        self.terminate(handle);
                    }
                    return None;
                }
            }
        }
    }

    /// Kill and reap. Caller holds the backend lock.
    fn terminate(&self, mut handle: BackendHandle) {
        handle.expected_exit = true;
        if let Err(err) = handle.child.kill() {
            debug!("backend"; "kill: {}", err);
        }
        match handle.child.wait() {
            Ok(status) => debug!(
                "backend"; "stopped {} #{} gen {} ({})",
                handle.role.as_str(), handle.id, handle.generation, status
            ),
            Err(err) => log!("error"; "cannot reap backend: {}", err),
        }
        self.release(&handle);
    }

    fn release(&self, handle: &BackendHandle) {
        if !handle.expected_exit {
            debug!("backend"; "{} #{} exited on its own", handle.role.as_str(), handle.id);
        }
        self.live.fetch_sub(1, Ordering::SeqCst);
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.is_closed() && self.generation.load(Ordering::SeqCst) == generation
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Purge and recreate the generated-artifacts directory.
fn reset_genfiles(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    fs::create_dir_all(dir)
}

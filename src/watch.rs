use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{error, info, warn};

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::generator::generate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    RunningWithPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Caller should start a run now.
    Start,
    /// A run is in progress; one follow-up has been scheduled.
    Deferred,
}

/// Single-flight admission: at most one run at a time, and any number of
/// requests during a run collapse into one follow-up.
#[derive(Debug, Default)]
pub struct RunGate {
    state: RunState,
}

impl RunGate {
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn request(&mut self) -> Admission {
        match self.state {
            RunState::Idle => {
                self.state = RunState::Running;
                Admission::Start
            }
            RunState::Running | RunState::RunningWithPending => {
                self.state = RunState::RunningWithPending;
                Admission::Deferred
            }
        }
    }

    /// Marks the current run as done. Returns `true` when a deferred request
    /// means the caller must immediately run again.
    pub fn finish(&mut self) -> bool {
        match self.state {
            RunState::RunningWithPending => {
                self.state = RunState::Running;
                true
            }
            RunState::Running | RunState::Idle => {
                self.state = RunState::Idle;
                false
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatchStats {
    pub runs: usize,
    pub failures: usize,
}

pub struct WatchLoop {
    debounce: Duration,
    run_on_start: bool,
}

impl WatchLoop {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            run_on_start: false,
        }
    }

    pub fn run_on_start(mut self) -> Self {
        self.run_on_start = true;
        self
    }

    /// Drives `job` from change notifications until `shutdown` resolves or
    /// the event channel closes and all outstanding work is done. Job
    /// failures are logged and never stop the loop.
    pub async fn run<F>(
        &self,
        mut events: mpsc::UnboundedReceiver<()>,
        shutdown: impl Future<Output = ()>,
        job: F,
    ) -> WatchStats
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        let job = Arc::new(job);
        let mut gate = RunGate::default();
        let mut stats = WatchStats::default();
        let mut deadline: Option<Instant> = None;
        let mut running: Option<JoinHandle<Result<()>>> = None;
        let mut events_open = true;
        tokio::pin!(shutdown);

        if self.run_on_start && gate.request() == Admission::Start {
            running = Some(spawn_job(&job));
        }

        loop {
            if !events_open && deadline.is_none() && running.is_none() {
                break;
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping watcher");
                    if let Some(handle) = running.take() {
                        record(&mut stats, handle.await);
                    }
                    break;
                }
                event = events.recv(), if events_open => match event {
                    Some(()) => deadline = Some(Instant::now() + self.debounce),
                    None => events_open = false,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    if gate.request() == Admission::Start {
                        running = Some(spawn_job(&job));
                    }
                }
                result = async {
                    match running.as_mut() {
                        Some(handle) => handle.await,
                        None => std::future::pending().await,
                    }
                }, if running.is_some() => {
                    running = None;
                    record(&mut stats, result);
                    if gate.finish() {
                        running = Some(spawn_job(&job));
                    }
                }
            }
        }

        stats
    }
}

fn spawn_job<F>(job: &Arc<F>) -> JoinHandle<Result<()>>
where
    F: Fn() -> Result<()> + Send + Sync + 'static,
{
    let job = Arc::clone(job);
    tokio::task::spawn_blocking(move || job())
}

fn record(stats: &mut WatchStats, result: std::result::Result<Result<()>, tokio::task::JoinError>) {
    stats.runs += 1;
    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            stats.failures += 1;
            error!(error = %err, "Generation failed, still watching");
        }
        Err(err) => {
            stats.failures += 1;
            error!(error = %err, "Generation task aborted, still watching");
        }
    }
}

/// Whether a filesystem event should trigger a regeneration.
pub fn is_relevant(event: &Event, output: &Path) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    let mut tmp = output.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    // our own writes show up here when the output lives inside the watched tree
    event.paths.is_empty() || !event.paths.iter().all(|p| p == output || *p == tmp)
}

/// Generates once, then regenerates on every change below the locations
/// directory until Ctrl-C.
pub async fn watch_locations(config: GeneratorConfig, debounce: Duration) -> Result<WatchStats> {
    let (tx, rx) = mpsc::unbounded_channel();
    let output = config.output.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if is_relevant(&event, &output) => {
            let _ = tx.send(());
        }
        Ok(_) => {}
        Err(err) => warn!(error = %err, "Filesystem watch error"),
    })?;
    watcher.watch(&config.locations_dir, RecursiveMode::Recursive)?;
    info!(dir = %config.locations_dir.display(), "Watching for changes");

    let job = move || generate(&config).map(|_| ());
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let stats = WatchLoop::new(debounce)
        .run_on_start()
        .run(rx, shutdown, job)
        .await;
    drop(watcher);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn gate_starts_when_idle() {
        let mut gate = RunGate::default();
        assert_eq!(gate.request(), Admission::Start);
        assert_eq!(gate.state(), RunState::Running);
        assert!(!gate.finish());
        assert_eq!(gate.state(), RunState::Idle);
    }

    #[test]
    fn gate_collapses_requests_during_a_run() {
        let mut gate = RunGate::default();
        gate.request();
        for _ in 0..5 {
            assert_eq!(gate.request(), Admission::Deferred);
        }
        assert_eq!(gate.state(), RunState::RunningWithPending);

        assert!(gate.finish());
        assert_eq!(gate.state(), RunState::Running);
        assert!(!gate.finish());
        assert_eq!(gate.state(), RunState::Idle);
    }

    #[test]
    fn access_events_are_ignored() {
        let event = Event::new(EventKind::Access(AccessKind::Any)).add_path("/a/x.jpg".into());
        assert!(!is_relevant(&event, Path::new("/out/locations.json")));
    }

    #[test]
    fn own_output_writes_are_ignored() {
        let out = Path::new("/site/assets/lucrari/locations.json");
        let own = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(out.to_path_buf())
            .add_path("/site/assets/lucrari/locations.json.tmp".into());
        assert!(!is_relevant(&own, out));

        let image = Event::new(EventKind::Create(CreateKind::File))
            .add_path("/site/assets/lucrari/pod/1.jpg".into());
        assert!(is_relevant(&image, out));
    }
}

use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use archive_core::{update, ActionState, AppState, AppViewModel, CatalogIndex, Msg};
use archive_engine::BatchOutcome;
use archive_logging::{archive_debug, archive_info, archive_warn};

use super::cli::{Cli, Command, LookupArgs, PickArgs};
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::render::Renderer;

const EVENT_POLL: Duration = Duration::from_millis(75);
// Extra wait on top of the health timeout for the first probe result.
const FIRST_PROBE_GRACE: Duration = Duration::from_secs(2);

/// Process exit status of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    NotFound,
    Offline,
    TransferFailed,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::Success => 0,
            Status::Error => 1,
            Status::NotFound => 2,
            Status::Offline => 3,
            Status::TransferFailed => 4,
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status.code())
    }
}

impl From<&BatchOutcome> for Status {
    fn from(outcome: &BatchOutcome) -> Self {
        match outcome {
            BatchOutcome::Completed { .. } => Status::Success,
            BatchOutcome::Offline => Status::Offline,
            BatchOutcome::TransferFailed { .. } | BatchOutcome::Aborted { .. } => {
                Status::TransferFailed
            }
        }
    }
}

pub fn run_app(cli: Cli) -> Result<Status> {
    let config_path = AppConfig::locate(cli.config.as_deref());
    let mut config = AppConfig::load(config_path.as_deref())?;
    config.apply_overrides(&cli);
    logging::init(cli.verbose, config.log_file.as_deref());
    if let Some(path) = &config_path {
        archive_info!("loaded config from {}", path.display());
    }

    let runner = EffectRunner::new(config.engine_config())?;
    let catalog = runner.load_catalog(&config.catalog);
    if catalog.is_empty() {
        archive_warn!("catalog {} has no groups", config.catalog);
    }
    let mut renderer = Renderer::stdout();

    match cli.command {
        Command::Groups => {
            renderer.list(&catalog.group_names())?;
            Ok(Status::Success)
        }
        Command::Items { group } => list_items(&catalog, &group, &mut renderer),
        Command::Show { lookup } => {
            let mut session = Session::new(catalog, runner);
            if !session.search(&lookup) {
                renderer.not_found()?;
                return Ok(Status::NotFound);
            }
            renderer.rows(&session.view())?;
            Ok(Status::Success)
        }
        Command::Download { lookup, pick } => {
            let mut session = Session::new(catalog, runner);
            if !session.search(&lookup) {
                renderer.not_found()?;
                return Ok(Status::NotFound);
            }
            session.pick(&pick)?;
            renderer.rows(&session.view())?;
            session.wait_for_liveness(config.health_timeout() + FIRST_PROBE_GRACE);
            session.download(&mut renderer)
        }
    }
}

fn list_items(
    catalog: &CatalogIndex,
    group: &str,
    renderer: &mut Renderer<std::io::Stdout>,
) -> Result<Status> {
    let Some(items) = catalog.items(group) else {
        renderer.not_found()?;
        return Ok(Status::NotFound);
    };
    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("{}\t{}\t{} document(s)", item.code, item.name, item.documents.len()))
        .collect();
    renderer.list(&lines)?;
    Ok(Status::Success)
}

/// Drives one state machine the way a user would: messages in, effects out.
struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    fn new(catalog: CatalogIndex, runner: EffectRunner) -> Self {
        Self {
            state: AppState::with_catalog(catalog),
            runner,
        }
    }

    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) {
        archive_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Enters the lookup and presses the action control once. Returns whether
    /// the item's rows are shown.
    fn search(&mut self, lookup: &LookupArgs) -> bool {
        for msg in lookup.messages() {
            self.dispatch(msg);
        }
        self.dispatch(Msg::ActionClicked);
        let view = self.view();
        !view.not_found_visible && view.rows_visible
    }

    fn pick(&mut self, pick: &PickArgs) -> Result<()> {
        let indices = pick.row_indices(self.view().rows.len())?;
        for index in indices {
            // Rows sharing a URL share their check mark.
            let already_checked = self
                .view()
                .rows
                .get(index)
                .is_some_and(|row| row.checked);
            if !already_checked {
                self.dispatch(Msg::RowToggled(index));
            }
        }
        if self.view().selected_count == 0 {
            bail!("no documents selected");
        }
        Ok(())
    }

    /// Feeds engine events until the first liveness result arrives or
    /// `limit` passes.
    fn wait_for_liveness(&mut self, limit: Duration) {
        let deadline = Instant::now() + limit;
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            match self.runner.next_msg(remaining.min(EVENT_POLL)) {
                Some(msg @ Msg::LivenessChanged(_)) => {
                    self.dispatch(msg);
                    return;
                }
                Some(msg) => self.dispatch(msg),
                None => {}
            }
        }
        archive_warn!("no liveness result after {:?}", limit);
    }

    fn download(&mut self, renderer: &mut Renderer<std::io::Stdout>) -> Result<Status> {
        self.dispatch(Msg::ActionClicked);
        if self.state.action() != ActionState::Downloading {
            bail!("download did not start");
        }
        while self.state.action() == ActionState::Downloading {
            let msg = self.runner.next_msg(EVENT_POLL).unwrap_or(Msg::Tick);
            self.dispatch(msg);
            if self.state.consume_dirty() {
                renderer.progress(&self.view())?;
            }
        }
        let Some(outcome) = self.runner.take_outcome() else {
            bail!("batch ended without an outcome");
        };
        renderer.outcome(&outcome)?;
        Ok(Status::from(&outcome))
    }
}

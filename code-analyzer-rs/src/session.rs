//! Interactive session state
//!
//! Owns the current inputs and the connectivity flag, submits analyses
//! through the dispatcher and always hands back something printable: the
//! module's report on success, an explanatory failure report otherwise.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

use analysis_sdk::config::{
    CompositeConfigProvider, EnvConfigProvider, JsonFileConfigProvider, ENV_PREFIX,
};
use analysis_sdk::render::{failure_report, functions_report, status_report};
use analysis_sdk::{AnalysisInputs, ApiSettings, Dispatcher, HealthState, Module, Report};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cli::AnalyzeArgs;

/// Load settings from the environment layered over an optional settings file
pub fn load_settings(config_path: &Path) -> Result<ApiSettings> {
    let mut provider =
        CompositeConfigProvider::new().with_provider(EnvConfigProvider::new().with_prefix(ENV_PREFIX));

    if config_path.exists() {
        let file = JsonFileConfigProvider::from_path(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        provider.add_provider(file);
    } else {
        warn!(
            "Settings file {} not found, using environment and defaults",
            config_path.display()
        );
    }

    ApiSettings::from_provider(&provider).context("Invalid ApiSettings")
}

/// Collect the analysis inputs named on the command line
pub fn read_inputs(args: &AnalyzeArgs) -> Result<AnalysisInputs> {
    let code = match (&args.code, &args.file) {
        (Some(code), _) => code.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read source from stdin")?;
            buffer
        }
    };

    let filename = args
        .filename
        .clone()
        .or_else(|| {
            args.file
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    Ok(AnalysisInputs::new(code)
        .filename(filename)
        .function_name(args.function_name.clone()))
}

/// One user session against the analysis server
pub struct Session {
    dispatcher: Dispatcher,
    health: HealthState,
    /// Startup health check, until its result has been observed
    startup_check: Option<JoinHandle<bool>>,
    module: Module,
    inputs: AnalysisInputs,
}

impl Session {
    pub fn new(dispatcher: Dispatcher, health: HealthState, startup_check: JoinHandle<bool>) -> Self {
        Self {
            dispatcher,
            health,
            startup_check: Some(startup_check),
            module: Module::Debugging,
            inputs: AnalysisInputs::default(),
        }
    }

    pub fn select(&mut self, module: Module) {
        self.module = module;
    }

    pub fn set_inputs(&mut self, inputs: AnalysisInputs) {
        self.inputs = inputs;
    }

    /// Last known connectivity, as published by the monitor
    pub fn is_connected(&self) -> bool {
        self.health.is_connected()
    }

    /// Wait up to `limit` for the startup health check.
    ///
    /// Returns the result once known, `None` while it is still running.
    /// A check that outlives `limit` keeps running in the background.
    pub async fn settle_startup_check(&mut self, limit: Duration) -> Option<bool> {
        let handle = match self.startup_check.as_mut() {
            Some(handle) => handle,
            None => return Some(self.is_connected()),
        };

        match tokio::time::timeout(limit, handle).await {
            Ok(joined) => {
                self.startup_check = None;
                let connected = joined.unwrap_or(false);
                info!("Startup health check finished: analysis server {}", connection_word(connected));
                Some(connected)
            }
            Err(_) => {
                debug!("Startup health check still running after {:?}", limit);
                None
            }
        }
    }

    /// Connection indicator text
    pub fn connection_label(&self) -> &'static str {
        if self.startup_check.is_some() {
            "checking"
        } else {
            connection_word(self.is_connected())
        }
    }

    /// Run the selected module. Returns the report to show and whether it succeeded.
    pub async fn run(&self, cancel: &CancellationToken) -> (Report, bool) {
        match self
            .dispatcher
            .dispatch_cancellable(self.module, &self.inputs, cancel)
            .await
        {
            Ok(report) => (report, true),
            Err(e) => {
                warn!("{} analysis failed: {}", self.module, e);
                (failure_report(self.module, &e), false)
            }
        }
    }

    /// Readiness report of one module
    pub async fn status(&self, module: Module) -> (Report, bool) {
        match self.dispatcher.status(module).await {
            Ok(snapshot) => (status_report(module, &snapshot), true),
            Err(e) => {
                warn!("{} status query failed: {}", module, e);
                (failure_report(module, &e), false)
            }
        }
    }

    /// Function listing of the NLP module
    pub async fn functions(&self) -> (Report, bool) {
        match self.dispatcher.list_functions().await {
            Ok(listing) => (functions_report(&listing), true),
            Err(e) => {
                warn!("Function listing failed: {}", e);
                (failure_report(Module::Nlp, &e), false)
            }
        }
    }
}

fn connection_word(connected: bool) -> &'static str {
    if connected {
        "connected"
    } else {
        "disconnected"
    }
}

/// Namespaced key of the history record inside the state file
pub(crate) const HISTORY_KEY: &str = "quicktemp.history";

/// Upper bound on remembered history entries
pub(crate) const MAX_HISTORY_ITEMS: usize = 20;

/// Extension used when neither the call nor the config provides one
pub(crate) const DEFAULT_EXTENSION: &str = ".txt";

/// Environment variable that relocates config and state (used by tests and portable setups)
pub(crate) const HOME_ENV: &str = "QUICKTEMP_HOME";

/// Environment variable holding a tracing filter directive
pub(crate) const LOG_ENV: &str = "QUICKTEMP_LOG";

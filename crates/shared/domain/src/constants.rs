/// Application name, also the default log file prefix.
pub const APP_NAME: &str = "strongbox";

/// Prefix of environment variables overriding file configuration (`SBOX__STORAGE__DATA_DIR`).
pub const ENV_PREFIX: &str = "SBOX";

/// Config file looked up when no path is given (any extension the loader understands).
pub const DEFAULT_CONFIG_FILE: &str = "strongbox";

/// Storage collection holding one document per owner.
pub const VARIABLES_COLLECTION: &str = "variables";

/// Associated-data label every variable value is encrypted under.
pub const VALUE_CONTEXT: &str = "sbox.variable.value";

/// Field stripped from variable records on listing paths.
pub const VALUE_FIELD: &str = "value";

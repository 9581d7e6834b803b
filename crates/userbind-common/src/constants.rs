//! System-wide constants and default paths.

/// Default location of the runtime configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/userbind/userbind.conf";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "USERBIND_CONFIG";

/// Configuration key that enables or disables passwd materialization.
pub const CONFIG_PASSWD_KEY: &str = "config passwd";

/// Default value of [`CONFIG_PASSWD_KEY`] when the key is absent.
pub const CONFIG_PASSWD_DEFAULT: bool = true;

/// Location of the identity database inside the container.
pub const CONTAINER_PASSWD_PATH: &str = "/etc/passwd";

/// File name of the staged passwd copy inside the session directory.
pub const STAGED_PASSWD_NAME: &str = "passwd";

/// Placeholder written in the password field of synthesized records.
pub const PASSWORD_PLACEHOLDER: &str = "x";

/// Process exit status for any fatal materialization error.
pub const FATAL_EXIT_CODE: i32 = 255;

/// Binary name for the CLI.
pub const BIN_NAME: &str = "userbind";

/// Corpus root used when neither the CLI nor a config file sets one.
pub(crate) const DEFAULT_CORPUS_PATH: &str = "./hlcupdocs/";
pub(crate) const DEFAULT_SERVER_ADDR: &str = "http://127.0.0.1:80";
pub(crate) const DEFAULT_DURATION: &str = "10s";
/// Per-request timeout applied by the transport.
pub(crate) const DEFAULT_TIMEOUT: &str = "2s";
/// Config filenames checked in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["ammocheck.toml", "ammocheck.json"];

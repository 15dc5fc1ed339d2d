use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::debug;

use crate::args::CheckArgs;
use crate::config::{RunConfig, apply_config, load_config};
use crate::error::AppResult;

/// Parses the command line, merges the config file, and runs one check on a
/// multi-threaded runtime.
///
/// # Errors
///
/// Returns an error when arguments or configuration are invalid, or when the
/// run itself fails before verification.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    let config_file = load_config(args.config.as_deref())?;
    if let Some(config_file) = config_file.as_ref() {
        apply_config(&mut args, &matches, config_file)?;
    }

    crate::system::logger::init_logging(args.verbose, args.no_color);
    if config_file.is_some() {
        debug!("Configuration file applied");
    }

    let run_config = RunConfig::from_args(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        crate::app::run_check(&run_config).await?;
        Ok(())
    })
}

fn parse_args() -> AppResult<(CheckArgs, ArgMatches)> {
    let matches = CheckArgs::command().get_matches();
    let args = CheckArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

mod cli;

use anyhow::Result;

fn main() -> Result<()> {
    let args = cli::parse_args();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    cli::run_with_args(
        args,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )
}

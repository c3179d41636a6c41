use dw_battle_sim::{run, CliOptions, Mode};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: cargo run --release -- [--scenario scenario.json] \
[--mode battle|many|repeated|zone] [--iterations N] [--seed SEED] [--parallel] [--json] \
[--log-json log.json]"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut scenario_path = PathBuf::from("scenario.json");
    let mut mode = Mode::Many;
    let mut iterations = 1000usize;
    let mut seed = 0u64;
    let mut parallel = false;
    let mut json = false;
    let mut log_json = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scenario" => {
                scenario_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--scenario requires a path (e.g. --scenario scenario.json)")
                })?;
            }
            "--mode" => {
                let val = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--mode requires battle, many, repeated or zone")
                })?;
                mode = Mode::parse(&val)?;
            }
            "--iterations" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--iterations requires a number"))?;
                iterations = val.parse()?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = val.parse()?;
            }
            "--parallel" => parallel = true,
            "--json" => json = true,
            "--log-json" => {
                log_json = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--log-json requires a path (e.g. --log-json log.json)")
                })?);
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    Ok(CliOptions {
        scenario_path,
        mode,
        iterations,
        seed,
        parallel,
        json,
        log_json,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    let opts = parse_args()?;
    run(opts)
}

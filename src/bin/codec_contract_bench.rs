use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use codec_contract_bench::codecs::{self, Strategy};
use codec_contract_bench::harness::{BenchConfig, Limits, Profile};
use codec_contract_bench::schema::{ComparisonDocument, RunMeta};
use codec_contract_bench::{ExecutionMode, Orchestrator};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Quick,
    Full,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Quick => Profile::Quick,
            ProfileArg::Full => Profile::Full,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Instantiate/serialize/deserialize benchmark across strategies.
    Run {
        /// Records per batch. Defaults to the profile's batch size.
        #[arg(long)]
        batch_size: Option<usize>,

        /// Iterations to average over. Defaults to the profile's iteration count.
        #[arg(long)]
        iterations: Option<usize>,

        #[arg(long, value_enum, default_value_t = ExecutionMode::Sequential)]
        mode: ExecutionMode,

        /// Strategy to include. Can be provided multiple times; defaults to all.
        #[arg(long = "strategy", value_name = "NAME", action = clap::ArgAction::Append)]
        strategies: Vec<String>,
    },

    /// Small sequential run over every strategy (100 records, 5 iterations).
    Quick,

    /// List the available strategies.
    Frameworks,
}

#[derive(Parser, Debug)]
#[command(name = "codec-contract-bench")]
#[command(about = "Compare record codecs on instantiate/serialize/deserialize cost (JSON output)")]
struct Args {
    #[arg(long, value_enum, default_value_t = ProfileArg::Quick, global = true)]
    profile: ProfileArg,

    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,

    /// Where to write the JSON output. If omitted, prints to stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Debug-level logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

fn now_utc_rfc3339() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

fn git_sha_short() -> Option<String> {
    // Best-effort: read from environment set by CI/build scripts.
    std::env::var("GIT_SHA")
        .ok()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .map(|s| s.chars().take(12).collect())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "codec_contract_bench=debug"
    } else {
        "codec_contract_bench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emit(json: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let cfg = BenchConfig {
        profile: args.profile.into(),
        seed: args.seed,
        limits: Limits::default(),
    };

    let (batch_size, iterations, mode, names) = match args.cmd {
        Command::Frameworks => {
            let infos: Vec<_> = codecs::default_strategies()
                .iter()
                .map(|s| s.describe())
                .collect();
            let json = serde_json::to_string_pretty(&infos)?;
            return emit(&json, args.out.as_deref());
        }
        Command::Quick => (
            Profile::Quick.batch_size(),
            Profile::Quick.iterations(),
            ExecutionMode::Sequential,
            Vec::new(),
        ),
        Command::Run {
            batch_size,
            iterations,
            mode,
            strategies,
        } => (
            batch_size.unwrap_or(cfg.profile.batch_size()),
            iterations.unwrap_or(cfg.profile.iterations()),
            mode,
            strategies,
        ),
    };

    let strategies = codecs::select_strategies(&names)?;
    info!(
        batch_size,
        iterations,
        %mode,
        strategies = strategies.len(),
        seed = cfg.seed,
        "starting benchmark"
    );

    let mut orchestrator = Orchestrator::new(cfg.record_source()).with_limits(cfg.limits);
    let report = orchestrator
        .execute(&strategies, batch_size, iterations, mode)
        .context("benchmark run failed")?;

    let document = ComparisonDocument {
        run: RunMeta {
            schema_version: 1,
            bench_version: env!("CARGO_PKG_VERSION").to_string(),
            profile: cfg.profile.as_str().to_string(),
            seed: cfg.seed,
            timestamp_utc: now_utc_rfc3339(),
            git_sha: git_sha_short(),
        },
        report,
    };

    let json = serde_json::to_string_pretty(&document)?;
    emit(&json, args.out.as_deref())
}

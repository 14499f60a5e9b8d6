//! gallery: run shooting-gallery rounds headless.
//!
//! Usage:
//!   gallery [--config round.json] [--seed N] [--duration SECS] [--rounds N]
//!           [--fire-every TICKS | --no-fire] [--max-ticks N] [--fast] [--json]

use std::path::{Path, PathBuf};
use std::process;

use gallery_app::game_loop::{spawn_game_loop, LoopOptions};
use gallery_app::AppError;
use gallery_core::config::GalleryConfig;

struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    duration: Option<f32>,
    options: LoopOptions,
    json: bool,
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| matches!(a.as_str(), "help" | "--help" | "-h")) {
        print_usage();
        return;
    }

    if let Err(err) = run(&args) {
        tracing::error!(%err, "gallery failed");
        if matches!(err, AppError::Usage(_)) {
            print_usage();
        }
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn print_usage() {
    eprintln!(
        "gallery: headless shooting-gallery runner\n\
         \n\
           --config <path>      JSON round config (missing fields use defaults)\n\
           --seed <N>           RNG seed override\n\
           --duration <secs>    Round duration override\n\
           --rounds <N>         Rounds to play, 0 = until interrupted (default: 1)\n\
           --fire-every <N>     Auto-fire period in ticks (default: 10)\n\
           --no-fire            Never fire\n\
           --max-ticks <N>      Stop after N ticks\n\
           --fast               Do not sleep between ticks\n\
           --json               Print the run summary as JSON on stdout\n\
         \n\
         Logging: RUST_LOG (default info), LOG_FORMAT=json for JSON lines.\n"
    );
}

fn run(raw: &[String]) -> Result<(), AppError> {
    let args = parse_args(raw)?;

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GalleryConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(duration) = args.duration {
        config.round_duration_secs = duration;
    }
    config.validate()?;

    tracing::info!(
        seed = config.seed,
        duration_secs = config.round_duration_secs,
        shapes = config.shape_scores.len(),
        rounds = args.options.rounds,
        "starting"
    );
    let summary = spawn_game_loop(config, args.options)?.wait()?;

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => tracing::error!(%err, "failed to serialize summary"),
        }
    } else {
        println!(
            "score {} | targets {} | shots {} | hit ratio {:.2} | rounds {} | ticks {}",
            summary.round.score,
            summary.round.targets_destroyed,
            summary.round.shots_fired,
            summary.shots_hit_ratio,
            summary.rounds_completed,
            summary.ticks,
        );
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<GalleryConfig, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(GalleryConfig::from_json_str(&text)?)
}

fn parse_args(args: &[String]) -> Result<Args, AppError> {
    let mut parsed = Args {
        config: None,
        seed: None,
        duration: None,
        options: LoopOptions::default(),
        json: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value(args, i)?)),
            "--seed" => parsed.seed = Some(number(args, i)?),
            "--duration" => parsed.duration = Some(number(args, i)?),
            "--rounds" => parsed.options.rounds = number(args, i)?,
            "--fire-every" => parsed.options.fire_every = Some(number(args, i)?),
            "--max-ticks" => parsed.options.max_ticks = Some(number(args, i)?),
            "--no-fire" => {
                parsed.options.fire_every = None;
                i += 1;
                continue;
            }
            "--fast" => {
                parsed.options.realtime = false;
                i += 1;
                continue;
            }
            "--json" => {
                parsed.json = true;
                i += 1;
                continue;
            }
            other => return Err(AppError::Usage(format!("unknown argument `{other}`"))),
        }
        i += 2;
    }
    Ok(parsed)
}

fn value(args: &[String], i: usize) -> Result<&str, AppError> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| AppError::Usage(format!("`{}` needs a value", args[i])))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize) -> Result<T, AppError> {
    let raw = value(args, i)?;
    raw.parse()
        .map_err(|_| AppError::Usage(format!("`{}` expects a number, got `{raw}`", args[i])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parses_flags_and_values() {
        let parsed = parse_args(&args(&[
            "--seed", "9", "--duration", "12.5", "--rounds", "3", "--fast", "--no-fire", "--json",
        ]))
        .unwrap();
        assert_eq!(parsed.seed, Some(9));
        assert_eq!(parsed.duration, Some(12.5));
        assert_eq!(parsed.options.rounds, 3);
        assert!(!parsed.options.realtime);
        assert!(parsed.options.fire_every.is_none());
        assert!(parsed.json);
    }

    #[test]
    fn test_rejects_unknown_and_missing_values() {
        assert!(matches!(
            parse_args(&args(&["--bogus"])),
            Err(AppError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&args(&["--seed"])),
            Err(AppError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&args(&["--seed", "abc"])),
            Err(AppError::Usage(_))
        ));
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let err = load_config(Path::new("/nonexistent/round.json")).unwrap_err();
        assert!(matches!(err, AppError::ReadConfig { .. }));
    }
}

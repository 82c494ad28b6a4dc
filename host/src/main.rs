use std::io::Read;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn, LevelFilter, Log, Metadata, Record};
use serde::Serialize;

use stickfight_core::{
    default_config, hash_transcript, CombatStats, MatchConfig, MatchController,
    MatchEvent, PlayerInput, Slot, Tuning, NULL_INPUT,
};

/// Ten minutes of play at 60 Hz.
const DEFAULT_MAX_TICKS: u64 = 36_000;

// ============================================================================
// Logging
// ============================================================================

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{:<5} {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Level from `STICKFIGHT_LOG` (error/warn/info/debug/trace), info by default.
fn init_logging() {
    let level = std::env::var("STICKFIGHT_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
    debug!("log level {level}");
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, PartialEq)]
struct Args {
    seed: u32,
    max_ticks: u64,
    tuning: Option<String>,
    /// Input transcript file, or "-" for stdin.
    transcript: Option<String>,
    /// Player numbers driven by the AI. Defaults to both without a transcript, neither with one.
    ai: Option<Vec<u8>>,
    survival: bool,
    hardcore: bool,
    pretty: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 1,
            max_ticks: DEFAULT_MAX_TICKS,
            tuning: None,
            transcript: None,
            ai: None,
            survival: false,
            hardcore: false,
            pretty: false,
        }
    }
}

const USAGE: &str = "usage: stickfight-host [--seed N] [--ticks N] [--tuning FILE.ron] \
[--transcript FILE|-] [--ai 1,2] [--survival] [--hardcore] [--pretty]";

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        let mut value = |name: &str| it.next().with_context(|| format!("{name} needs a value"));
        match arg.as_str() {
            "--seed" => {
                let v = value("--seed")?;
                parsed.seed = v.parse().with_context(|| format!("bad seed: {v}"))?;
            }
            "--ticks" => {
                let v = value("--ticks")?;
                parsed.max_ticks = v.parse().with_context(|| format!("bad tick count: {v}"))?;
            }
            "--tuning" => parsed.tuning = Some(value("--tuning")?),
            "--transcript" => parsed.transcript = Some(value("--transcript")?),
            "--ai" => {
                let v = value("--ai")?;
                let players = v
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| match s.trim() {
                        "1" => Ok(1),
                        "2" => Ok(2),
                        other => bail!("--ai expects player numbers 1 and/or 2, got {other}"),
                    })
                    .collect::<Result<Vec<u8>>>()?;
                parsed.ai = Some(players);
            }
            "--survival" => parsed.survival = true,
            "--hardcore" => parsed.hardcore = true,
            "--pretty" => parsed.pretty = true,
            "--help" | "-h" => bail!("{USAGE}"),
            other => bail!("unknown argument {other}\n{USAGE}"),
        }
    }
    Ok(parsed)
}

fn build_config(args: &Args) -> Result<MatchConfig> {
    let mut config = default_config(args.seed);
    if let Some(path) = &args.tuning {
        config.tuning =
            Tuning::load(path).with_context(|| format!("loading tuning from {path}"))?;
    }
    let ai = args.ai.clone().unwrap_or_else(|| {
        if args.transcript.is_some() {
            Vec::new()
        } else {
            vec![1, 2]
        }
    });
    config.ai_enabled = [ai.contains(&1), ai.contains(&2)];
    config.survival = args.survival;
    config.hardcore = args.hardcore;
    Ok(config)
}

/// A transcript is a JSON array of per-tick input pairs.
fn load_transcript(source: &str) -> Result<Vec<[PlayerInput; 2]>> {
    let json = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading transcript from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading transcript {source}"))?
    };
    serde_json::from_str(&json).context("parsing transcript JSON")
}

// ============================================================================
// Run
// ============================================================================

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventCounts {
    attacks_landed: u32,
    weapons_dropped: u32,
    weapons_picked_up: u32,
    weapons_broken: u32,
    weapons_expired: u32,
    respawns: u32,
}

impl EventCounts {
    fn record(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::AttackLanded { .. } => self.attacks_landed += 1,
            MatchEvent::WeaponDropped { .. } => self.weapons_dropped += 1,
            MatchEvent::WeaponPickedUp { .. } => self.weapons_picked_up += 1,
            MatchEvent::WeaponBroken { .. } => self.weapons_broken += 1,
            MatchEvent::WeaponExpired { .. } => self.weapons_expired += 1,
            MatchEvent::CombatantRespawned { .. } => self.respawns += 1,
            _ => {}
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    seed: u32,
    ticks: u64,
    game_over: bool,
    /// Winning player number.
    winner: Option<u8>,
    survival_wave: u32,
    final_hp: [i32; 2],
    stats: [CombatStats; 2],
    events: EventCounts,
    /// Hash of every input pair fed, padding included.
    transcript_hash: String,
    state_digest: String,
}

fn run(config: MatchConfig, script: &[[PlayerInput; 2]], max_ticks: u64) -> Report {
    let seed = config.seed;
    let mut m = MatchController::new(config);
    let mut fed = Vec::new();
    let mut counts = EventCounts::default();

    for t in 0..max_ticks {
        let inputs = script.get(t as usize).copied().unwrap_or([NULL_INPUT; 2]);
        m.tick(inputs);
        fed.push(inputs);
        for event in m.take_events() {
            counts.record(&event);
        }
        if m.is_game_over() {
            break;
        }
    }

    let snap = m.snapshot();
    Report {
        seed,
        ticks: m.tick_count(),
        game_over: m.is_game_over(),
        winner: m.winner().map(Slot::player_number),
        survival_wave: m.survival_wave(),
        final_hp: [snap.fighters[0].hp, snap.fighters[1].hp],
        stats: [snap.fighters[0].stats, snap.fighters[1].stats],
        events: counts,
        transcript_hash: hex::encode(hash_transcript(&fed)),
        state_digest: hex::encode(m.state_digest()),
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = parse_args(std::env::args().skip(1))?;
    let config = build_config(&args)?;

    let script = match &args.transcript {
        Some(source) => {
            let script = load_transcript(source)?;
            info!("transcript loaded: {} ticks", script.len());
            script
        }
        None => Vec::new(),
    };

    info!(
        "seed={} ai={:?} survival={} hardcore={}",
        config.seed, config.ai_enabled, config.survival, config.hardcore
    );
    let start = Instant::now();
    let report = run(config, &script, args.max_ticks);
    info!(
        "{} ticks simulated in {:.1}ms",
        report.ticks,
        start.elapsed().as_secs_f64() * 1000.0
    );
    if !report.game_over {
        warn!("tick limit reached before the match ended");
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("encoding report")?;
    println!("{json}");
    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hecs::World;

use undertow::app::Session;
use undertow::config::ModeParameters;
use undertow::components::Effect;
use undertow::scene::script::{Scenario, Script};
use undertow::scene::test_scene::load_test_scene;
use undertow::systems::Cue;

#[derive(Parser)]
#[command(name = "undertow", about = "Headless locomotion and vehicle possession driver")]
struct Args {
    /// Scripted input to play back
    #[arg(long, value_enum, default_value_t = Scenario::Tour)]
    scenario: Scenario,
    /// Number of frames to run (defaults to the scenario's length)
    #[arg(long)]
    frames: Option<u64>,
    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// Movement parameters TOML file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the status panel every N frames (0 disables it)
    #[arg(long, default_value_t = 30)]
    hud_every: u64,
}

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();

    let args = Args::parse();
    if !(args.dt > 0.0) {
        log::error!("--dt must be positive, got {}", args.dt);
        return ExitCode::FAILURE;
    }

    let params = match &args.config {
        Some(path) => match ModeParameters::from_file(path) {
            Ok(params) => params,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => ModeParameters::default(),
    };

    let mut world = World::new();
    let scene = load_test_scene(&mut world);
    let mut session = match Session::new(world, scene.player, params, args.dt) {
        Ok(session) => session,
        Err(err) => {
            log::error!("scene setup failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if args.hud_every == 0 {
        session.hud.toggle();
    }

    let mut script = Script::for_scenario(args.scenario);
    let frames = args
        .frames
        .unwrap_or_else(|| (script.duration() / args.dt).ceil() as u64);
    log::info!(
        "running {:?} for {} frames at dt {:.4}",
        args.scenario,
        frames,
        args.dt
    );

    for _ in 0..frames {
        let window_end = session.clock.elapsed + session.clock.dt;
        let events = script.events_until(window_end);
        let report = session.frame(&events);

        for event in &report.volume_events {
            log::debug!("[frame {}] {:?}", report.frame, event);
        }
        for effect in &report.effects {
            match effect {
                Effect::Ignored(refusal) => {
                    log::debug!("[frame {}] ignored {:?}", report.frame, refusal)
                }
                _ => log::info!("[frame {}] {:?}", report.frame, effect),
            }
        }
        if let Cue::Footstep { pitch } = report.cue {
            log::trace!("[frame {}] footstep at pitch {pitch}", report.frame);
        }
        if session.hud.is_visible() && report.frame % args.hud_every == 0 {
            for line in session.hud_lines() {
                log::info!("[hud] {line}");
            }
        }
    }

    log::info!(
        "finished in mode {} ({:.2}s in mode) after {:.2}s",
        session.controller.mode(),
        session.controller.machine().fsm().elapsed,
        session.clock.elapsed
    );
    ExitCode::SUCCESS
}

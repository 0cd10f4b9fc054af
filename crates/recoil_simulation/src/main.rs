//! Headless симуляция Recoil
//!
//! Запускает Bevy App без рендера: scripted input (seeded), RapierPhysics,
//! N кадров. После game over ждёт `--restart-delay` кадров и перезапускает.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use recoil_simulation::{
    create_headless_app, format_time, init_logger, log_error, log_info, GameState, Hud,
    PlatformerConfig, RecoilWeapon, RestartRequested,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed для scripted input
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Сколько кадров (шагов) прогнать
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// TOML с tunables и layout уровня (по умолчанию встроенные)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Кадров после game over до restart (0 = без restart)
    #[arg(long, default_value_t = 120)]
    restart_delay: u32,
}

fn main() -> ExitCode {
    init_logger();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match PlatformerConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("Failed to load config {}: {}", path.display(), err));
                return ExitCode::FAILURE;
            }
        },
        None => PlatformerConfig::default(),
    };

    log_info(&format!(
        "Starting Recoil headless simulation (seed: {}, frames: {}, {} fps)",
        args.seed, args.frames, config.frame_rate
    ));

    let mut app = create_headless_app(args.seed, config);

    let mut sessions = 1u32;
    let mut best_score = 0u32;
    let mut over_for = 0u32;

    for frame in 0..args.frames {
        app.update();

        let state = app.world().resource::<GameState>();
        best_score = best_score.max(state.score());

        if state.is_game_over() {
            over_for += 1;

            if args.restart_delay > 0 && over_for >= args.restart_delay {
                app.world_mut().send_event(RestartRequested);
                sessions += 1;
                over_for = 0;
            }
        }

        if frame % 600 == 0 {
            let state = app.world().resource::<GameState>();
            log_info(&format!(
                "Frame {}: score {}, time {}, over {}",
                frame,
                state.score(),
                format_time(state.elapsed_secs()),
                state.is_game_over()
            ));
        }
    }

    let world = app.world_mut();
    let ammo = world
        .query::<&RecoilWeapon>()
        .iter(world)
        .next()
        .map(|weapon| weapon.current_ammo());

    let hud = world.resource::<Hud>();
    let score_text = hud.score_text.clone().unwrap_or_default();
    let timer_text = hud.timer_text.clone().unwrap_or_default();

    println!("Simulation complete!");
    println!("  sessions:   {sessions}");
    println!("  best score: {best_score}");
    println!("  hud:        {score_text} | {timer_text}");
    if let Some(ammo) = ammo {
        println!("  ammo:       {ammo}");
    }

    ExitCode::SUCCESS
}

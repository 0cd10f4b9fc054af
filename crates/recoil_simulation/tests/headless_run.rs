//! Длинный headless прогон: scripted input + RapierPhysics + restart
//!
//! Проверяем инварианты оружия и сессии на каждом шаге.

use bevy::prelude::*;
use recoil_simulation::{
    create_headless_app, format_time, Dead, GameState, Hud, PlatformerConfig, Player,
    PlayerController, RecoilWeapon, RestartRequested, ScriptedInput,
};

const FRAMES: usize = 3000;

fn player_state(app: &mut App) -> Option<(PlayerController, RecoilWeapon, bool)> {
    let world = app.world_mut();
    world
        .query_filtered::<(&PlayerController, &RecoilWeapon, Has<Dead>), With<Player>>()
        .iter(world)
        .next()
        .map(|(controller, weapon, dead)| (*controller, *weapon, dead))
}

#[test]
fn test_ammo_invariants_over_long_run() {
    let mut app = create_headless_app(2024, PlatformerConfig::default());

    for frame in 0..FRAMES {
        app.update();

        let Some((controller, weapon, _)) = player_state(&mut app) else {
            panic!("frame {frame}: игрок пропал");
        };

        assert!(weapon.current_ammo() <= weapon.max_ammo, "frame {frame}");
        if controller.grounded {
            assert_eq!(weapon.current_ammo(), weapon.max_ammo, "frame {frame}");
        }

        if app.world().resource::<GameState>().is_game_over() {
            app.world_mut().send_event(RestartRequested);
        }
    }
}

#[test]
fn test_player_lands_on_floor() {
    let mut config = PlatformerConfig::default();
    // Спавн в воздухе над полом
    config.level.player_spawn = Vec2::new(0.0, 3.0);
    config.level.hazards.clear();

    let mut app = create_headless_app(1, config);
    // Без input: игрок просто падает
    app.world_mut().insert_resource(ScriptedInput {
        axis_change_chance: 0.0,
        jump_chance: 0.0,
        fire_chance: 0.0,
        cursor_change_chance: 0.0,
    });

    for _ in 0..180 {
        app.update();
    }

    let (controller, weapon, dead) = player_state(&mut app).unwrap();
    assert!(!dead);
    assert!(controller.grounded);
    assert_eq!(weapon.current_ammo(), weapon.max_ammo);

    let world = app.world_mut();
    let transform = world
        .query_filtered::<&Transform, With<Player>>()
        .single(world)
        .unwrap();
    // Пол на y = -0.5, half extent 0.5
    assert!(
        transform.translation.y.abs() < 0.05,
        "y = {}",
        transform.translation.y
    );
}

#[test]
fn test_hud_mirrors_game_state() {
    let mut app = create_headless_app(99, PlatformerConfig::default());

    for _ in 0..600 {
        app.update();

        let state = app.world().resource::<GameState>().clone();
        let hud = app.world().resource::<Hud>();

        assert_eq!(
            hud.score_text.as_deref(),
            Some(format!("Coins: {}", state.score()).as_str())
        );
        assert_eq!(
            hud.timer_text.as_deref(),
            Some(format_time(state.elapsed_secs()).as_str())
        );

        let panel_visible = hud
            .game_over_panel
            .as_ref()
            .map(|panel| panel.visible)
            .unwrap_or(false);
        assert_eq!(panel_visible, state.is_game_over());
    }
}

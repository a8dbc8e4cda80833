//! Last Light headless runner.
//!
//! Plays a session without a window: an autopilot feeds key and mouse events
//! into the same input path a windowed host would use, turning toward the
//! nearest zombie and firing once lined up.

use anyhow::{bail, Result};
use engine_core::{Time, Vec3};
use game::{GameConfig, GameSession, HeadlessPresentation, SessionPhase};
use input::{ElementState, InputState, KeyCode, MouseButton};
use std::f32::consts::{PI, TAU};
use std::time::Duration;

const STEP: Duration = Duration::from_nanos(16_666_667);
/// Largest view turn per frame, radians.
const MAX_TURN: f32 = 0.12;
/// Height on the target the autopilot aims at.
const AIM_HEIGHT: f32 = 1.2;
/// Fraction of the aim error corrected per frame. Look motion lands one
/// frame late, so a full correction would overshoot.
const AIM_GAIN: f32 = 0.5;
/// Back away from anything closer than this.
const RETREAT_DISTANCE: f32 = 6.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut write_config = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--write-config" => write_config = true,
            other => bail!("unknown argument {other:?} (expected --write-config)"),
        }
    }

    let config = GameConfig::load();
    if write_config {
        config.save();
    }

    println!("╔════════════════════════════════════════════╗");
    println!("║                 LAST LIGHT                 ║");
    println!("╠════════════════════════════════════════════╣");
    println!("║  Headless run, autopilot at the controls   ║");
    println!("║  RUST_LOG=debug for spawns, kills, reloads ║");
    println!("╚════════════════════════════════════════════╝");

    let duration = Duration::from_secs_f32(config.demo.duration_secs.max(0.0));
    let realtime = config.demo.realtime;
    let mut session = GameSession::new(config);
    let mut presentation = HeadlessPresentation::new();
    let mut input = InputState::new();
    let mut time = Time::new();
    let mut autopilot = Autopilot::default();

    // Start overlay: click to capture the pointer, Enter to begin.
    input.set_cursor_locked(true);
    tap_key(&mut input, KeyCode::Enter);

    while session.phase() != SessionPhase::GameOver && time.elapsed() < duration {
        if realtime {
            std::thread::sleep(STEP);
            time.update();
        } else {
            time.advance(STEP);
        }

        let frame = input.frame();
        session.tick(&frame, time.delta_seconds(), &mut presentation);
        input.begin_frame();
        autopilot.drive(&session, &mut input);

        if time.frame_count() % 600 == 0 {
            log::info!(
                "t={:.0}s round {} kills {} health {:.0} ammo {} zombies {}",
                time.elapsed_seconds(),
                session.horde.rounds.round,
                session.horde.rounds.total_kills,
                session.player.health.current,
                session.weapon.ammo_display(),
                session.horde.active_count()
            );
        }
    }

    if presentation.pointer_released {
        input.set_cursor_locked(false);
    }

    match session.summary() {
        Some(summary) => println!(
            "Overrun in round {} after {} kills ({:.1}s).",
            summary.final_round,
            summary.final_kills,
            time.elapsed_seconds()
        ),
        None => println!(
            "Survived {:.1}s: round {}, {} kills, {:.0} health left.",
            time.elapsed_seconds(),
            session.horde.rounds.round,
            session.horde.rounds.total_kills,
            session.player.health.current
        ),
    }
    log::info!(
        "Actors spawned {}, despawned {}, effects played {}",
        presentation.actors_spawned,
        presentation.actors_despawned,
        presentation.effects_played
    );

    Ok(())
}

/// Scripted player that produces raw input events.
#[derive(Default)]
struct Autopilot {
    retreating: bool,
}

impl Autopilot {
    fn drive(&mut self, session: &GameSession, input: &mut InputState) {
        if session.phase() != SessionPhase::Running {
            return;
        }
        let eye = session.player.position();
        let weapon = &session.weapon;

        if weapon.current_ammo == 0 && weapon.reserve_ammo > 0 && !weapon.is_reloading() {
            tap_key(input, KeyCode::KeyR);
        }

        let Some(target) = nearest(session, eye) else {
            self.set_retreat(input, false);
            return;
        };

        let to_target = Vec3::new(target.x - eye.x, AIM_HEIGHT - eye.y, target.z - eye.z);
        let flat = Vec3::new(to_target.x, 0.0, to_target.z).length();
        self.set_retreat(input, flat < RETREAT_DISTANCE);

        let want_yaw = (-to_target.x).atan2(-to_target.z);
        let want_pitch = to_target.y.atan2(flat);
        let yaw_err = wrap_angle(want_yaw - session.player.yaw());
        let pitch_err = want_pitch - session.player.pitch();

        let sensitivity = session.config().look_sensitivity();
        let turn_yaw = (yaw_err * AIM_GAIN).clamp(-MAX_TURN, MAX_TURN);
        let turn_pitch = (pitch_err * AIM_GAIN).clamp(-MAX_TURN, MAX_TURN);
        input.process_mouse_motion(((-turn_yaw / sensitivity) as f64, (-turn_pitch / sensitivity) as f64));

        if yaw_err.abs() < 0.02 && pitch_err.abs() < 0.05 && weapon.can_fire(session.clock()) {
            input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
            input.process_mouse_button(MouseButton::Left, ElementState::Released);
        }
    }

    fn set_retreat(&mut self, input: &mut InputState, retreat: bool) {
        if retreat == self.retreating {
            return;
        }
        self.retreating = retreat;
        let state = if retreat { ElementState::Pressed } else { ElementState::Released };
        input.process_keyboard(KeyCode::KeyS, state);
        input.process_keyboard(KeyCode::ShiftLeft, state);
    }
}

fn nearest(session: &GameSession, eye: Vec3) -> Option<Vec3> {
    session
        .horde
        .positions()
        .into_iter()
        .map(|(_, p)| p)
        .min_by(|a, b| {
            let da = (*a - eye).length_squared();
            let db = (*b - eye).length_squared();
            da.total_cmp(&db)
        })
}

fn tap_key(input: &mut InputState, key: KeyCode) {
    input.process_keyboard(key, ElementState::Pressed);
    input.process_keyboard(key, ElementState::Released);
}

fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

//! Game session: the single owner of all simulation state and the per-frame
//! tick that drives it.
//!
//! Tick order: timers, look and movement, reload, fire, spawning, zombie AI
//! and contact damage, regeneration, HUD.

use engine_core::MAX_FRAME_DELTA;
use input::FrameInput;
use std::time::Duration;

use crate::assets::ModelStatus;
use crate::combat::{self, HitResult, ShotReport};
use crate::config::GameConfig;
use crate::effects::{effect_lifetime, EffectIds};
use crate::horde::{HitOutcome, Horde};
use crate::hud::{damage_overlay_intensity, GameSummary, HudSnapshot};
use crate::player::PlayerController;
use crate::presentation::{EffectKind, Presentation};
use crate::schedule::{Scheduler, TimerEvent};
use crate::weapons::Weapon;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Start overlay is up; nothing simulates.
    NotStarted,
    Running,
    /// Terminal.
    GameOver,
}

pub struct GameSession {
    pub player: PlayerController,
    pub weapon: Weapon,
    pub horde: Horde,
    phase: SessionPhase,
    /// Bumped when the session is torn down; stale timers are ignored.
    epoch: u32,
    clock: Duration,
    scheduler: Scheduler,
    effect_ids: EffectIds,
    hud_last: Option<HudSnapshot>,
    summary: Option<GameSummary>,
    config: GameConfig,
}

impl GameSession {
    /// Build a session, resolving the configured zombie model.
    pub fn new(config: GameConfig) -> Self {
        let model = ModelStatus::resolve(config.zombie_model.as_deref());
        let horde = Horde::new(config.horde.clone(), config.gibs.clone(), model);
        Self::with_horde(config, horde)
    }

    pub fn with_horde(config: GameConfig, horde: Horde) -> Self {
        Self {
            player: PlayerController::new(config.player.clone(), config.look_sensitivity()),
            weapon: Weapon::new(&config.weapon),
            horde,
            phase: SessionPhase::NotStarted,
            epoch: 0,
            clock: Duration::ZERO,
            scheduler: Scheduler::new(),
            effect_ids: EffectIds::default(),
            hud_last: None,
            summary: None,
            config,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Simulated time since the session started running.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn summary(&self) -> Option<GameSummary> {
        self.summary
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// NotStarted → Running. Ignored in any other phase.
    pub fn start(&mut self, presentation: &mut dyn Presentation) {
        if self.phase != SessionPhase::NotStarted {
            return;
        }
        self.phase = SessionPhase::Running;
        log::info!("Session started (round {})", self.horde.rounds.round);
        presentation.phase_changed(self.phase);
        presentation.model_status(&self.horde.model_status().message());
        self.refresh_hud(presentation);
    }

    /// Advance the simulation by one frame.
    pub fn tick(&mut self, input: &FrameInput, dt: f32, presentation: &mut dyn Presentation) {
        match self.phase {
            SessionPhase::NotStarted if input.start => self.start(presentation),
            SessionPhase::NotStarted | SessionPhase::GameOver => return,
            SessionPhase::Running => {}
        }

        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DELTA.as_secs_f32()) } else { 0.0 };
        self.clock += Duration::from_secs_f32(dt);
        self.run_timers(presentation);

        self.player.apply_look(input.look_delta);
        let pose = self.player.integrate(input, dt);

        if input.reload {
            combat::request_reload(&mut self.weapon, &mut self.scheduler, self.clock, self.epoch);
        }

        if input.fire {
            let shot = combat::fire(
                &mut self.weapon,
                &pose,
                &mut self.horde,
                self.clock,
                self.config.effects.miss_tracer_length,
                presentation,
            );
            if let Some(report) = shot {
                self.show_shot(&report, presentation);
                if let Some(HitResult { outcome: HitOutcome::Killed { round_cleared: true, .. }, .. }) = report.hit {
                    self.horde
                        .advance_round(&mut self.player.health, self.config.session.round_clear_heal);
                }
            }
        }

        self.horde.try_spawn(presentation);
        let contact = self.horde.update(pose.position, dt, presentation);
        if contact > 0.0 {
            self.damage_player(contact, presentation);
            if self.phase != SessionPhase::Running {
                return;
            }
        }

        let health = &mut self.player.health;
        if !health.is_dead() && !health.is_full() {
            health.heal(self.config.session.regen_per_second * dt);
        }

        self.refresh_hud(presentation);
    }

    /// Hurt the player. Only has an effect while running; reaching zero ends
    /// the session.
    pub fn damage_player(&mut self, amount: f32, presentation: &mut dyn Presentation) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.player.take_damage(amount);
        if self.player.is_dead() {
            self.refresh_hud(presentation);
            self.end(presentation);
        }
    }

    fn end(&mut self, presentation: &mut dyn Presentation) {
        // Effects still on screen are cleared now; a pending reload is abandoned.
        for event in self.scheduler.drain_due(Duration::MAX, self.epoch) {
            if let TimerEvent::EffectExpired(id) = event {
                presentation.clear_effect(id);
            }
        }
        self.phase = SessionPhase::GameOver;
        self.epoch += 1;

        let summary = GameSummary {
            final_round: self.horde.rounds.round,
            final_kills: self.horde.rounds.total_kills,
        };
        self.summary = Some(summary);
        log::info!(
            "Game over: reached round {} with {} kills",
            summary.final_round,
            summary.final_kills
        );
        presentation.release_pointer();
        presentation.game_over(&summary);
        presentation.phase_changed(self.phase);
    }

    fn run_timers(&mut self, presentation: &mut dyn Presentation) {
        for event in self.scheduler.drain_due(self.clock, self.epoch) {
            match event {
                TimerEvent::ReloadComplete => {
                    self.weapon.finish_reload();
                    log::debug!("Reload complete: {}", self.weapon.ammo_display());
                }
                TimerEvent::EffectExpired(id) => presentation.clear_effect(id),
            }
        }
    }

    fn show_shot(&mut self, report: &ShotReport, presentation: &mut dyn Presentation) {
        self.play_effect(EffectKind::MuzzleFlash, report, presentation);
        self.play_effect(EffectKind::Tracer, report, presentation);
        if let Some(HitResult { outcome: HitOutcome::Damaged { .. }, .. }) = report.hit {
            self.play_effect(EffectKind::HitFlash, report, presentation);
        }
    }

    fn play_effect(&mut self, kind: EffectKind, report: &ShotReport, presentation: &mut dyn Presentation) {
        let id = self.effect_ids.next();
        presentation.play_effect(id, kind, report.origin, report.end);
        let due = self.clock + effect_lifetime(kind, &self.config.effects);
        self.scheduler.schedule(due, self.epoch, TimerEvent::EffectExpired(id));
    }

    fn refresh_hud(&mut self, presentation: &mut dyn Presentation) {
        let snapshot = HudSnapshot::capture(&self.weapon, &self.player.health, &self.horde.rounds);
        for change in snapshot.diff(self.hud_last.as_ref()) {
            presentation.hud_changed(change);
        }
        self.hud_last = Some(snapshot);
        presentation.damage_overlay(damage_overlay_intensity(&self.player.health, &self.config.session));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContactDamage, HordeTuning};
    use crate::hud::HudChange;
    use crate::presentation::HeadlessPresentation;
    use engine_core::Vec3;
    use input::MoveKeys;
    use rand::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn session_with(config: GameConfig) -> GameSession {
        let horde = Horde::with_rng(
            config.horde.clone(),
            config.gibs.clone(),
            ModelStatus::Procedural,
            StdRng::seed_from_u64(2024),
        );
        GameSession::with_horde(config, horde)
    }

    fn running(config: GameConfig, p: &mut HeadlessPresentation) -> GameSession {
        let mut s = session_with(config);
        s.start(p);
        s
    }

    fn fire() -> FrameInput {
        FrameInput { fire: true, ..Default::default() }
    }

    #[test]
    fn waits_for_start() {
        let mut p = HeadlessPresentation::new();
        let mut s = session_with(GameConfig::default());
        s.tick(&fire(), DT, &mut p);
        assert_eq!(s.phase(), SessionPhase::NotStarted);
        assert_eq!(s.weapon.current_ammo, 30);
        assert_eq!(s.clock(), Duration::ZERO);

        s.tick(&FrameInput { start: true, ..Default::default() }, DT, &mut p);
        assert_eq!(s.phase(), SessionPhase::Running);
        assert_eq!(p.phase, Some(SessionPhase::Running));
        assert_eq!(p.model_message.as_deref(), Some("Using procedural zombies"));
        assert!(p.hud.contains(&HudChange::Round(1)));
    }

    #[test]
    fn clearing_round_one_advances_and_heals() {
        let mut config = GameConfig::default();
        config.weapon.fire_cooldown_ms = 0;
        config.session.regen_per_second = 0.0;
        config.horde.spawn_chance = 0.0;
        let mut p = HeadlessPresentation::new();
        let mut s = running(config, &mut p);
        s.player.health.current = 50.0;

        for i in 0..6 {
            s.horde
                .spawn_at(Vec3::new(0.0, 0.0, -10.0 - 5.0 * i as f32), &mut p)
                .expect("spawn");
        }
        for _ in 0..6 {
            s.tick(&fire(), DT, &mut p);
        }

        let rounds = &s.horde.rounds;
        assert_eq!(rounds.round, 2);
        assert_eq!((rounds.spawned, rounds.killed), (0, 0));
        assert_eq!(rounds.quota, 9);
        assert_eq!(rounds.total_kills, 6);
        assert_eq!(s.player.health.current, 70.0);
        assert_eq!(s.weapon.current_ammo, 24);
        assert!(p.hud.contains(&HudChange::Round(2)));
    }

    #[test]
    fn death_ends_the_session_exactly_once() {
        let mut config = GameConfig::default();
        config.horde.contact_damage = ContactDamage::Lump { per_tick: 19.5 };
        let mut p = HeadlessPresentation::new();
        let mut s = running(config, &mut p);
        s.horde.spawn_at(Vec3::new(1.0, 0.0, 0.0), &mut p).expect("spawn");

        let mut ticks = 0;
        while s.phase() == SessionPhase::Running {
            s.tick(&FrameInput::default(), DT, &mut p);
            ticks += 1;
            assert!(ticks < 10);
        }
        assert_eq!(ticks, 6);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert_eq!(s.player.health.current, 0.0);
        assert_eq!(s.epoch(), 1);
        assert!(p.pointer_released);
        assert_eq!(p.summary, Some(GameSummary { final_round: 1, final_kills: 0 }));

        for _ in 0..30 {
            s.tick(&FrameInput::default(), DT, &mut p);
        }
        s.damage_player(50.0, &mut p);
        s.start(&mut p);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert_eq!(s.epoch(), 1);
        assert_eq!(s.player.health.current, 0.0);
    }

    #[test]
    fn one_zombie_in_contact_outpaces_regen() {
        let mut p = HeadlessPresentation::new();
        let mut config = GameConfig::default();
        config.horde.spawn_chance = 0.0;
        let mut s = running(config, &mut p);
        s.horde.spawn_at(Vec3::new(1.0, 0.0, 0.0), &mut p).expect("spawn");

        // 10 hp/s of contact against 6 hp/s of regen: about 25 s to die.
        let mut ticks = 0;
        while s.phase() == SessionPhase::Running {
            s.tick(&FrameInput::default(), DT, &mut p);
            ticks += 1;
            assert!(ticks < 40 * 60, "still alive at {}", s.player.health.current);
        }
        assert!(ticks > 20 * 60);
        assert_eq!(s.summary(), Some(GameSummary { final_round: 1, final_kills: 0 }));
    }

    #[test]
    fn unusable_frame_deltas_are_tamed() {
        let mut p = HeadlessPresentation::new();
        let mut s = running(GameConfig::default(), &mut p);
        s.tick(&FrameInput::default(), f32::INFINITY, &mut p);
        s.tick(&FrameInput::default(), f32::NAN, &mut p);
        s.tick(&FrameInput::default(), -1.0, &mut p);
        let one_frame = s.clock();
        assert!(one_frame.abs_diff(MAX_FRAME_DELTA) < Duration::from_micros(1));
        s.tick(&FrameInput::default(), 5.0, &mut p);
        assert_eq!(s.clock(), one_frame * 2);
    }

    #[test]
    fn reload_completes_after_its_delay() {
        let mut p = HeadlessPresentation::new();
        let mut s = running(GameConfig::default(), &mut p);
        s.weapon.current_ammo = 25;
        s.weapon.reserve_ammo = 10;

        s.tick(&FrameInput { reload: true, ..Default::default() }, DT, &mut p);
        assert!(s.weapon.is_reloading());
        // Fire is refused mid-reload.
        s.tick(&fire(), DT, &mut p);
        assert_eq!(s.weapon.current_ammo, 25);

        for _ in 0..125 {
            s.tick(&FrameInput::default(), DT, &mut p);
        }
        assert!(!s.weapon.is_reloading());
        assert_eq!((s.weapon.current_ammo, s.weapon.reserve_ammo), (30, 5));
        assert!(p.hud.contains(&HudChange::CurrentAmmo(30)));
    }

    #[test]
    fn reload_pending_at_death_never_lands() {
        let mut p = HeadlessPresentation::new();
        let mut s = running(GameConfig::default(), &mut p);
        s.weapon.current_ammo = 25;
        s.weapon.reserve_ammo = 10;
        s.tick(&FrameInput { reload: true, ..Default::default() }, DT, &mut p);
        s.damage_player(1000.0, &mut p);
        assert_eq!(s.phase(), SessionPhase::GameOver);

        for _ in 0..300 {
            s.tick(&FrameInput::default(), DT, &mut p);
        }
        assert_eq!((s.weapon.current_ammo, s.weapon.reserve_ammo), (25, 10));
    }

    #[test]
    fn dry_fire_leaves_everything_alone() {
        let mut p = HeadlessPresentation::new();
        let mut s = running(GameConfig::default(), &mut p);
        let e = s.horde.spawn_at(Vec3::new(0.0, 0.0, -10.0), &mut p).expect("spawn");
        s.weapon.current_ammo = 0;
        s.tick(&fire(), DT, &mut p);
        assert!(s.horde.is_alive(e));
        assert_eq!(s.weapon.reserve_ammo, 120);
        assert_eq!(p.effects_played, 0);
    }

    #[test]
    fn shot_effects_expire_on_schedule() {
        let mut p = HeadlessPresentation::new();
        let mut s = running(GameConfig::default(), &mut p);
        s.tick(&fire(), DT, &mut p);
        assert_eq!(p.effects_played, 2);
        assert_eq!(p.active_effects.len(), 2);

        // Muzzle flash lasts 50 ms, tracer 140 ms.
        for _ in 0..4 {
            s.tick(&FrameInput::default(), DT, &mut p);
        }
        assert_eq!(p.active_effects.len(), 1);
        for _ in 0..6 {
            s.tick(&FrameInput::default(), DT, &mut p);
        }
        assert!(p.active_effects.is_empty());
    }

    #[test]
    fn wounded_hit_flashes_the_target() {
        let mut config = GameConfig::default();
        config.horde.health_base = 3.0;
        let mut p = HeadlessPresentation::new();
        let mut s = running(config, &mut p);
        s.horde.spawn_at(Vec3::new(0.0, 0.0, -10.0), &mut p).expect("spawn");
        s.tick(&fire(), DT, &mut p);
        assert_eq!(p.effects_played, 3);
        assert!(p.active_effects.values().any(|k| *k == EffectKind::HitFlash));
    }

    #[test]
    fn health_regenerates_toward_max() {
        let mut p = HeadlessPresentation::new();
        let mut s = running(GameConfig::default(), &mut p);
        s.player.health.current = 90.0;
        for _ in 0..60 {
            s.tick(&FrameInput::default(), DT, &mut p);
        }
        assert!((s.player.health.current - 96.0).abs() < 0.01);
        for _ in 0..600 {
            s.tick(&FrameInput::default(), DT, &mut p);
        }
        assert_eq!(s.player.health.current, 100.0);
        assert!((p.overlay - 0.05).abs() < 1e-6);
    }

    #[test]
    fn invariants_hold_under_random_play() {
        let mut config = GameConfig::default();
        config.horde = HordeTuning { spawn_chance: 0.2, ..Default::default() };
        let mut p = HeadlessPresentation::new();
        let mut s = running(config, &mut p);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..6000 {
            let input = FrameInput {
                movement: MoveKeys {
                    forward: rng.gen_bool(0.5),
                    backward: rng.gen_bool(0.2),
                    left: rng.gen_bool(0.3),
                    right: rng.gen_bool(0.3),
                },
                sprint: rng.gen_bool(0.3),
                jump: rng.gen_bool(0.05),
                fire: rng.gen_bool(0.3),
                reload: rng.gen_bool(0.02),
                start: false,
                look_delta: engine_core::Vec2::new(rng.gen_range(-40.0..40.0), rng.gen_range(-40.0..40.0)),
            };
            s.tick(&input, DT, &mut p);

            let h = &s.player.health;
            assert!(h.current >= 0.0 && h.current <= h.max);
            assert!(s.weapon.current_ammo <= s.weapon.magazine_capacity);
            assert!(s.horde.active_count() <= 24);
            assert!(s.horde.rounds.killed <= s.horde.rounds.quota);
            assert!(s.player.position().y >= 1.6);
            assert!(s.player.pitch().abs() <= std::f32::consts::FRAC_PI_2);
            assert_eq!(p.live_actors(), s.horde.active_count());
        }
    }
}

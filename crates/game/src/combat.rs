//! Hitscan resolution: spend a round, cast from the eye along the view, hurt
//! whatever live zombie is closest.

use engine_core::{Entity, Vec3};
use std::time::Duration;

use crate::horde::{HitOutcome, Horde};
use crate::player::PlayerPose;
use crate::presentation::{ActorHandle, Presentation};
use crate::schedule::{Scheduler, TimerEvent};
use crate::weapons::Weapon;
use crate::zombie::BodyPart;

/// A resolved hit on one zombie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub entity: Entity,
    pub actor: ActorHandle,
    /// Reported for feedback only; every part takes the same damage.
    pub part: BodyPart,
    pub point: Vec3,
    pub distance: f32,
    pub outcome: HitOutcome,
}

/// One accepted shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotReport {
    pub origin: Vec3,
    /// Tracer endpoint: the hit point, or a fixed distance along the view on a miss.
    pub end: Vec3,
    pub hit: Option<HitResult>,
}

/// Try to fire. Returns `None` when the weapon refuses (cooldown, empty,
/// reloading); nothing changes in that case.
pub fn fire(
    weapon: &mut Weapon,
    pose: &PlayerPose,
    horde: &mut Horde,
    now: Duration,
    miss_tracer_length: f32,
    presentation: &mut dyn Presentation,
) -> Option<ShotReport> {
    if !weapon.fire(now) {
        return None;
    }

    let origin = pose.position;
    let direction = pose.forward.normalize_or_zero();

    let Some(found) = horde.raycast(origin, direction, weapon.range) else {
        log::trace!("Shot missed ({} left)", weapon.current_ammo);
        return Some(ShotReport {
            origin,
            end: origin + direction * miss_tracer_length,
            hit: None,
        });
    };

    let outcome = horde.apply_damage(found.entity, weapon.damage, presentation);
    log::trace!(
        "Shot hit {:?} {:?} at {:.2}: {:?}",
        found.entity,
        found.part,
        found.ray.distance,
        outcome
    );
    Some(ShotReport {
        origin,
        end: found.ray.point,
        hit: Some(HitResult {
            entity: found.entity,
            actor: found.actor,
            part: found.part,
            point: found.ray.point,
            distance: found.ray.distance,
            outcome,
        }),
    })
}

/// Begin a reload and queue its completion. Returns false if the weapon
/// refused (full, no reserve, already reloading).
pub fn request_reload(weapon: &mut Weapon, scheduler: &mut Scheduler, now: Duration, epoch: u32) -> bool {
    if !weapon.start_reload() {
        return false;
    }
    scheduler.schedule(now + weapon.reload_time, epoch, TimerEvent::ReloadComplete);
    log::debug!("Reloading ({} in reserve)", weapon.reserve_ammo);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ModelStatus;
    use crate::config::{GibTuning, HordeTuning, WeaponTuning};
    use crate::presentation::HeadlessPresentation;
    use engine_core::Health;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup() -> (Weapon, Horde, HeadlessPresentation) {
        let horde = Horde::with_rng(
            HordeTuning::default(),
            GibTuning::default(),
            ModelStatus::Procedural,
            StdRng::seed_from_u64(17),
        );
        (Weapon::new(&WeaponTuning::default()), horde, HeadlessPresentation::new())
    }

    fn pose_looking(forward: Vec3) -> PlayerPose {
        PlayerPose { position: Vec3::new(0.0, 1.6, 0.0), forward, yaw: 0.0, pitch: 0.0 }
    }

    #[test]
    fn shot_kills_the_zombie_in_front() {
        let (mut w, mut h, mut p) = setup();
        let e = h.spawn_at(Vec3::new(0.0, 0.0, -15.0), &mut p).expect("spawn");
        let report = fire(&mut w, &pose_looking(Vec3::NEG_Z), &mut h, Duration::ZERO, 24.0, &mut p).expect("fired");
        let hit = report.hit.expect("hit");
        assert_eq!(hit.entity, e);
        assert_eq!(hit.part, BodyPart::Head);
        assert!(matches!(hit.outcome, HitOutcome::Killed { .. }));
        assert_eq!(report.end, hit.point);
        assert_eq!(w.current_ammo, 29);
        assert!(!h.is_alive(e));
    }

    #[test]
    fn miss_still_spends_ammo_and_draws_full_tracer() {
        let (mut w, mut h, mut p) = setup();
        let report = fire(&mut w, &pose_looking(Vec3::NEG_Z), &mut h, Duration::ZERO, 24.0, &mut p).expect("fired");
        assert!(report.hit.is_none());
        assert!((report.end - Vec3::new(0.0, 1.6, -24.0)).length() < 1e-5);
        assert_eq!(w.current_ammo, 29);
    }

    #[test]
    fn empty_magazine_changes_nothing() {
        let (mut w, mut h, mut p) = setup();
        let e = h.spawn_at(Vec3::new(0.0, 0.0, -15.0), &mut p).expect("spawn");
        w.current_ammo = 0;
        assert!(fire(&mut w, &pose_looking(Vec3::NEG_Z), &mut h, Duration::ZERO, 24.0, &mut p).is_none());
        assert_eq!(w.reserve_ammo, 120);
        assert_eq!(h.world.get::<&Health>(e).map(|hp| hp.current).ok(), Some(1.0));
    }

    #[test]
    fn nearer_zombie_shields_the_farther_one() {
        let (mut w, mut h, mut p) = setup();
        let near = h.spawn_at(Vec3::new(0.0, 0.0, -8.0), &mut p).expect("spawn");
        let far = h.spawn_at(Vec3::new(0.0, 0.0, -16.0), &mut p).expect("spawn");
        fire(&mut w, &pose_looking(Vec3::NEG_Z), &mut h, Duration::ZERO, 24.0, &mut p);
        assert!(!h.is_alive(near));
        assert!(h.is_alive(far));
        // Second shot during cooldown is refused, then reaches the far one.
        assert!(fire(&mut w, &pose_looking(Vec3::NEG_Z), &mut h, Duration::from_millis(500), 24.0, &mut p).is_none());
        fire(&mut w, &pose_looking(Vec3::NEG_Z), &mut h, Duration::from_millis(1000), 24.0, &mut p);
        assert!(!h.is_alive(far));
        assert_eq!(h.rounds.total_kills, 2);
    }

    #[test]
    fn reload_is_queued_with_its_delay() {
        let (mut w, _, _) = setup();
        let mut s = Scheduler::new();
        w.current_ammo = 25;
        w.reserve_ammo = 10;
        assert!(request_reload(&mut w, &mut s, Duration::from_secs(3), 0));
        assert!(!request_reload(&mut w, &mut s, Duration::from_secs(3), 0));
        assert!(s.drain_due(Duration::from_millis(4999), 0).is_empty());
        assert_eq!(s.drain_due(Duration::from_secs(5), 0), vec![TimerEvent::ReloadComplete]);
    }
}

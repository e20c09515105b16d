use std::time::Duration;

use asylum_core::{
    Command, EnemyId, EnemyKind, EntityId, Event, GamePhase, PickupId, PickupKind, ProjectileId,
    SpawnRejection, Tuning, WeaponSlot,
};
use asylum_world::{self as world, query, World};
use glam::Vec3;

const EYE: Vec3 = Vec3::new(0.0, 5.0, 0.0);

fn playing(tuning: Tuning) -> World {
    let mut world = World::with_tuning(tuning, 7);
    let mut events = Vec::new();
    world::apply(&mut world, Command::Activate, &mut events);
    world
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn tick(world: &mut World, millis: u64) -> Vec<Event> {
    run(
        world,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
    )
}

fn spawn(world: &mut World, kind: EnemyKind, position: Vec3) -> Option<EnemyId> {
    run(
        world,
        Command::SpawnEnemy {
            kind,
            position,
            speed: 2.0,
        },
    )
    .into_iter()
    .find_map(|event| match event {
        Event::EnemySpawned { enemy, .. } => Some(enemy),
        _ => None,
    })
}

fn fire(world: &mut World) -> Vec<ProjectileId> {
    run(world, Command::FireWeapon { aim: Vec3::NEG_Z })
        .into_iter()
        .filter_map(|event| match event {
            Event::ProjectileSpawned { projectile, .. } => Some(projectile),
            _ => None,
        })
        .collect()
}

fn pistol_ammo(world: &World) -> Option<u32> {
    query::ammo(world, WeaponSlot::new(1))
}

#[test]
fn pistol_respects_fire_interval() {
    let mut world = playing(Tuning::default());

    assert_eq!(fire(&mut world).len(), 1);
    assert_eq!(pistol_ammo(&world), Some(14));

    let _ = tick(&mut world, 100);
    assert!(fire(&mut world).is_empty());
    assert_eq!(pistol_ammo(&world), Some(14));

    let _ = tick(&mut world, 150);
    assert_eq!(fire(&mut world).len(), 1);
    assert_eq!(pistol_ammo(&world), Some(13));
}

#[test]
fn reload_at_capacity_emits_nothing() {
    let mut world = playing(Tuning::default());
    assert!(run(&mut world, Command::ReloadWeapon).is_empty());

    let _ = fire(&mut world);
    let events = run(&mut world, Command::ReloadWeapon);
    assert!(events.contains(&Event::WeaponReloaded {
        slot: WeaponSlot::new(1)
    }));
    assert_eq!(pistol_ammo(&world), Some(15));
    assert!(run(&mut world, Command::ReloadWeapon).is_empty());
}

#[test]
fn switching_to_unknown_slot_is_ignored() {
    let mut world = playing(Tuning::default());
    assert!(run(
        &mut world,
        Command::SwitchWeapon {
            slot: WeaponSlot::new(9)
        }
    )
    .is_empty());
    assert_eq!(query::active_slot(&world), WeaponSlot::new(1));

    let events = run(
        &mut world,
        Command::SwitchWeapon {
            slot: WeaponSlot::new(3),
        },
    );
    assert!(events.contains(&Event::WeaponSwitched {
        from: WeaponSlot::new(1),
        to: WeaponSlot::new(3),
    }));
    assert!(events.contains(&Event::AmmoChanged {
        slot: WeaponSlot::new(3),
        ammo: 30,
        capacity: 30,
    }));
}

#[test]
fn two_pistol_hits_kill_a_forty_health_enemy() {
    let mut tuning = Tuning::default();
    tuning.stalker.health = 40;
    let mut world = playing(tuning);

    let enemy = spawn(&mut world, EnemyKind::Stalker, Vec3::new(0.0, 5.0, -1.5)).expect("spawn");
    let _ = tick(&mut world, 16);

    let first = fire(&mut world)[0];
    let events = run(
        &mut world,
        Command::StrikeEnemy {
            projectile: first,
            enemy,
        },
    );
    assert!(events.contains(&Event::EnemyHit {
        enemy,
        projectile: first,
        remaining: 15,
    }));
    assert_eq!(query::player(&world).score, 0);

    let _ = tick(&mut world, 200);
    let second = fire(&mut world)[0];
    let events = run(
        &mut world,
        Command::StrikeEnemy {
            projectile: second,
            enemy,
        },
    );
    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    assert_eq!(kills, 1);
    assert!(events.contains(&Event::ScoreChanged { score: 100 }));
    assert_eq!(query::player(&world).score, 100);
}

#[test]
fn consumed_projectile_cannot_strike_twice() {
    let mut world = playing(Tuning::default());
    let enemy = spawn(&mut world, EnemyKind::Stalker, Vec3::new(0.0, 5.0, -1.0)).expect("spawn");
    let _ = tick(&mut world, 16);
    let projectile = fire(&mut world)[0];

    let strike = Command::StrikeEnemy { projectile, enemy };
    assert!(!run(&mut world, strike.clone()).is_empty());
    assert!(run(&mut world, strike).is_empty());

    let health = query::enemy_view(&world)
        .iter()
        .find(|snapshot| snapshot.id == enemy)
        .map(|snapshot| snapshot.health);
    assert_eq!(health, Some(75));
}

#[test]
fn strike_out_of_reach_is_rejected() {
    let mut world = playing(Tuning::default());
    let enemy = spawn(&mut world, EnemyKind::Stalker, Vec3::new(0.0, 5.0, -10.0)).expect("spawn");
    let projectile = fire(&mut world)[0];
    assert!(run(&mut world, Command::StrikeEnemy { projectile, enemy }).is_empty());
}

#[test]
fn contact_damage_respects_attack_interval() {
    let mut world = playing(Tuning::default());
    let enemy = spawn(&mut world, EnemyKind::Stalker, Vec3::new(0.0, 5.0, -2.0)).expect("spawn");

    let events = run(&mut world, Command::StrikePlayer { enemy });
    assert!(events.contains(&Event::HealthChanged {
        health: 90,
        max: 100
    }));

    let _ = tick(&mut world, 900);
    assert!(run(&mut world, Command::StrikePlayer { enemy }).is_empty());
    assert_eq!(query::player(&world).health, 90);

    let _ = tick(&mut world, 101);
    let _ = run(&mut world, Command::StrikePlayer { enemy });
    assert_eq!(query::player(&world).health, 80);
}

#[test]
fn lethal_contact_ends_the_run_and_freezes_gameplay() {
    let mut tuning = Tuning::default();
    tuning.stalker.contact_damage = 150;
    let mut world = playing(tuning);
    let enemy = spawn(&mut world, EnemyKind::Stalker, Vec3::new(1.0, 5.0, 0.0)).expect("spawn");

    let events = run(&mut world, Command::StrikePlayer { enemy });
    assert!(events.contains(&Event::HealthChanged { health: 0, max: 100 }));
    assert!(events.contains(&Event::PhaseChanged {
        from: GamePhase::Playing,
        to: GamePhase::GameOver,
    }));
    assert_eq!(query::phase(&world), GamePhase::GameOver);

    assert!(fire(&mut world).is_empty());
    assert!(spawn(&mut world, EnemyKind::Stalker, Vec3::new(30.0, 2.0, 0.0)).is_none());
    let _ = tick(&mut world, 2000);
    assert!(run(&mut world, Command::StrikePlayer { enemy }).is_empty());
}

#[test]
fn population_cap_drops_scare_spawn() {
    let mut world = playing(Tuning::default());
    for index in 0..15 {
        let angle = index as f32;
        let position = Vec3::new(angle.cos() * 40.0, 2.0, angle.sin() * 40.0);
        assert!(spawn(&mut world, EnemyKind::Stalker, position).is_some());
    }
    assert_eq!(query::living_enemies(&world), 15);

    let events = run(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Apparition,
            position: Vec3::new(8.0, 2.0, 0.0),
            speed: 3.0,
        },
    );
    assert_eq!(
        events,
        vec![Event::EnemySpawnRejected {
            kind: EnemyKind::Apparition,
            reason: SpawnRejection::PopulationCap,
        }]
    );
    assert_eq!(query::living_enemies(&world), 15);
}

#[test]
fn apparition_spawn_announces_scare() {
    let mut world = playing(Tuning::default());
    let events = run(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Apparition,
            position: Vec3::new(8.0, 2.0, 0.0),
            speed: 3.0,
        },
    );
    let enemy = events
        .iter()
        .find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .expect("apparition spawned");
    assert!(events.contains(&Event::ScareTriggered { enemy }));

    let snapshot = query::enemy_view(&world).into_vec()[0];
    assert_eq!(snapshot.health, 50);
    assert_eq!(snapshot.contact_damage, 15);
}

fn drop_pickup(world: &mut World, kind: PickupKind, position: Vec3) -> PickupId {
    run(world, Command::SpawnPickup { kind, position })
        .into_iter()
        .find_map(|event| match event {
            Event::PickupSpawned { pickup, .. } => Some(pickup),
            _ => None,
        })
        .expect("pickup spawned")
}

#[test]
fn pickup_effect_applies_exactly_once() {
    let mut world = playing(Tuning::default());
    let enemy = spawn(&mut world, EnemyKind::Stalker, Vec3::new(0.0, 5.0, -2.0)).expect("spawn");
    let _ = run(&mut world, Command::StrikePlayer { enemy });
    assert_eq!(query::player(&world).health, 90);

    let pickup = drop_pickup(&mut world, PickupKind::Health, Vec3::new(1.0, 4.0, 0.0));
    let first = run(&mut world, Command::CollectPickup { pickup });
    let second = run(&mut world, Command::CollectPickup { pickup });

    assert!(first.contains(&Event::PickupCollected {
        pickup,
        kind: PickupKind::Health,
    }));
    assert!(second.is_empty());
    assert_eq!(query::player(&world).health, 100);
    assert_eq!(query::pickup_view(&world).iter().count(), 0);

    let reaped = run(&mut world, Command::Reap);
    assert!(reaped.contains(&Event::Despawned {
        entity: EntityId::Pickup(pickup),
    }));
}

#[test]
fn ammo_pickup_refills_active_weapon() {
    let mut world = playing(Tuning::default());
    let _ = fire(&mut world);
    let pickup = drop_pickup(&mut world, PickupKind::Ammo, EYE);
    let events = run(&mut world, Command::CollectPickup { pickup });
    assert!(events.contains(&Event::AmmoChanged {
        slot: WeaponSlot::new(1),
        ammo: 15,
        capacity: 15,
    }));
}

#[test]
fn distant_pickup_is_not_collected() {
    let mut world = playing(Tuning::default());
    let pickup = drop_pickup(&mut world, PickupKind::Ammo, Vec3::new(10.0, 1.0, 0.0));
    assert!(run(&mut world, Command::CollectPickup { pickup }).is_empty());
    assert_eq!(query::pickup_view(&world).iter().count(), 1);
}

#[test]
fn dead_enemy_lingers_for_death_animation() {
    let mut tuning = Tuning::default();
    tuning.stalker.health = 25;
    let mut world = playing(tuning);
    let enemy = spawn(&mut world, EnemyKind::Stalker, Vec3::new(0.0, 5.0, -1.0)).expect("spawn");
    let _ = tick(&mut world, 16);
    let projectile = fire(&mut world)[0];
    let _ = run(&mut world, Command::StrikeEnemy { projectile, enemy });

    assert_eq!(query::living_enemies(&world), 0);
    assert!(run(&mut world, Command::Reap)
        .iter()
        .all(|event| *event != Event::Despawned {
            entity: EntityId::Enemy(enemy)
        }));

    let _ = tick(&mut world, 999);
    let dying = query::enemy_view(&world).into_vec()[0];
    assert_eq!(dying.dying_for, Some(Duration::from_millis(999)));
    assert!(!run(&mut world, Command::Reap).contains(&Event::Despawned {
        entity: EntityId::Enemy(enemy)
    }));

    let _ = tick(&mut world, 1);
    assert!(run(&mut world, Command::Reap).contains(&Event::Despawned {
        entity: EntityId::Enemy(enemy)
    }));
}

#[test]
fn enemy_killed_in_its_spawn_step_is_reaped_immediately() {
    let mut tuning = Tuning::default();
    tuning.stalker.health = 25;
    let mut world = playing(tuning);
    let projectile = fire(&mut world)[0];
    let enemy = spawn(&mut world, EnemyKind::Stalker, Vec3::new(0.0, 5.0, -1.0)).expect("spawn");
    let _ = run(&mut world, Command::StrikeEnemy { projectile, enemy });

    assert!(run(&mut world, Command::Reap).contains(&Event::Despawned {
        entity: EntityId::Enemy(enemy)
    }));
}

#[test]
fn projectiles_expire_after_lifetime_steps() {
    let mut tuning = Tuning::default();
    tuning.projectile.lifetime_steps = 3;
    let mut world = playing(tuning);
    let projectile = fire(&mut world)[0];

    let mut despawned = false;
    for _ in 0..4 {
        let _ = tick(&mut world, 16);
        let _ = run(&mut world, Command::AdvanceEntities);
        despawned |= run(&mut world, Command::Reap).contains(&Event::Despawned {
            entity: EntityId::Projectile(projectile),
        });
    }
    assert!(despawned);
    assert_eq!(query::projectile_view(&world).iter().count(), 0);
}

#[test]
fn enemies_close_in_on_the_player() {
    let mut world = playing(Tuning::default());
    let start = Vec3::new(30.0, 2.0, 0.0);
    let enemy = spawn(&mut world, EnemyKind::Stalker, start).expect("spawn");

    let _ = tick(&mut world, 16);
    let _ = run(&mut world, Command::AdvanceEntities);
    let _ = tick(&mut world, 500);
    let _ = run(&mut world, Command::AdvanceEntities);

    let snapshot = query::enemy_view(&world)
        .iter()
        .find(|snapshot| snapshot.id == enemy)
        .copied()
        .expect("enemy");
    let expected = start.distance(EYE) - 2.0 * 0.516;
    assert!((snapshot.position.distance(EYE) - expected).abs() < 1e-3);
    assert!(snapshot.facing.dot((EYE - snapshot.position).normalize()) > 0.999);
}

#[test]
fn restart_is_a_full_reset() {
    let mut tuning = Tuning::default();
    tuning.stalker.contact_damage = 100;
    let mut world = playing(tuning);

    let enemy = spawn(&mut world, EnemyKind::Stalker, Vec3::new(0.0, 5.0, -2.0)).expect("spawn");
    let _ = fire(&mut world);
    let _ = drop_pickup(&mut world, PickupKind::Ammo, Vec3::new(20.0, 1.0, 0.0));
    let _ = run(&mut world, Command::StrikePlayer { enemy });
    assert_eq!(query::phase(&world), GamePhase::GameOver);

    let events = run(&mut world, Command::Restart);
    let despawned = events
        .iter()
        .filter(|event| matches!(event, Event::Despawned { .. }))
        .count();
    assert_eq!(despawned, 3);
    assert!(events.contains(&Event::PhaseChanged {
        from: GamePhase::GameOver,
        to: GamePhase::Playing,
    }));

    assert_eq!(query::enemy_view(&world).iter().count(), 0);
    assert_eq!(query::projectile_view(&world).iter().count(), 0);
    assert_eq!(query::pickup_view(&world).iter().count(), 0);
    let player = query::player(&world);
    assert_eq!(player.health, player.max_health);
    assert_eq!(player.score, 0);
    assert_eq!(player.position, EYE);
    assert_eq!(pistol_ammo(&world), Some(15));
}

#[test]
fn restart_is_ignored_while_playing() {
    let mut world = playing(Tuning::default());
    let _ = fire(&mut world);
    assert!(run(&mut world, Command::Restart).is_empty());
    assert_eq!(pistol_ammo(&world), Some(14));
}

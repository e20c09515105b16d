use std::time::Duration;

use asylum_core::{planar_distance, Command, EnemyKind, Event, GamePhase, Tuning};
use asylum_system_spawning::{Config, Spawning};
use asylum_world::{self as world, query, World};
use glam::Vec3;

const PLAY: Event = Event::PhaseChanged {
    from: GamePhase::NotStarted,
    to: GamePhase::Playing,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn spawns_at(spawning: &mut Spawning, events: &[Event], now: u64, living: usize) -> usize {
    let mut commands = Vec::new();
    spawning.handle(events, GamePhase::Playing, ms(now), living, &mut commands);
    commands.len()
}

#[test]
fn run_start_front_loads_staggered_spawns() {
    let mut spawning = Spawning::new(Config::from_tuning(&Tuning::default(), 0x1234_5678));

    // One periodic spawn plus the first front-loaded one.
    assert_eq!(spawns_at(&mut spawning, &[PLAY], 0, 0), 2);
    assert_eq!(spawns_at(&mut spawning, &[], 999, 2), 0);
    assert_eq!(spawns_at(&mut spawning, &[], 1000, 2), 1);
    assert_eq!(spawns_at(&mut spawning, &[], 2000, 3), 1);
    assert_eq!(spawns_at(&mut spawning, &[], 2500, 4), 0);
}

#[test]
fn periodic_interval_must_be_exceeded() {
    let mut tuning = Tuning::default();
    tuning.spawning.front_load = 0;
    let mut spawning = Spawning::new(Config::from_tuning(&tuning, 9));

    assert_eq!(spawns_at(&mut spawning, &[PLAY], 0, 0), 1);
    assert_eq!(spawns_at(&mut spawning, &[], 3000, 1), 0);
    assert_eq!(spawns_at(&mut spawning, &[], 3001, 1), 1);
    assert_eq!(spawns_at(&mut spawning, &[], 6001, 2), 0);
    assert_eq!(spawns_at(&mut spawning, &[], 6002, 2), 1);
}

#[test]
fn capped_interval_still_stamps_the_timer() {
    let mut tuning = Tuning::default();
    tuning.spawning.front_load = 0;
    let mut spawning = Spawning::new(Config::from_tuning(&tuning, 5));

    assert_eq!(spawns_at(&mut spawning, &[PLAY], 0, 15), 0);
    assert_eq!(spawns_at(&mut spawning, &[], 1500, 14), 0);
    assert_eq!(spawns_at(&mut spawning, &[], 3001, 14), 1);
}

#[test]
fn leaving_play_discards_pending_front_load() {
    let mut spawning = Spawning::new(Config::from_tuning(&Tuning::default(), 3));
    assert_eq!(spawns_at(&mut spawning, &[PLAY], 0, 0), 2);

    let mut commands = Vec::new();
    spawning.handle(
        &[Event::PhaseChanged {
            from: GamePhase::Playing,
            to: GamePhase::GameOver,
        }],
        GamePhase::GameOver,
        ms(500),
        2,
        &mut commands,
    );
    assert!(commands.is_empty());

    let restart = Event::PhaseChanged {
        from: GamePhase::GameOver,
        to: GamePhase::Playing,
    };
    assert_eq!(spawns_at(&mut spawning, &[restart], 8000, 0), 2);
    assert_eq!(spawns_at(&mut spawning, &[], 9000, 2), 1);
}

#[test]
fn spawns_land_on_the_ring() {
    let tuning = Tuning::default();
    let mut spawning = Spawning::new(Config::from_tuning(&tuning, 0xfeed));
    let mut commands = Vec::new();
    spawning.handle(&[PLAY], GamePhase::Playing, ms(0), 0, &mut commands);
    for step in 1..=40 {
        spawning.handle(&[], GamePhase::Playing, ms(step * 3001), 0, &mut commands);
    }

    // Two at the start, the remaining front-load at the first check, then one
    // per interval.
    assert_eq!(commands.len(), 44);
    for command in &commands {
        let Command::SpawnEnemy {
            kind,
            position,
            speed,
        } = command
        else {
            panic!("unexpected command emitted: {command:?}");
        };
        assert_eq!(*kind, EnemyKind::Stalker);
        let distance = planar_distance(*position, Vec3::ZERO);
        assert!((29.999..50.001).contains(&distance), "distance {distance}");
        assert_eq!(position.y, 2.0);
        assert!((2.0..3.0).contains(speed), "speed {speed}");
    }
}

#[test]
fn world_population_never_exceeds_cap() {
    let tuning = Tuning::default();
    let mut spawning = Spawning::new(Config::new(ms(10), 15, 77));
    let mut world = World::with_tuning(tuning, 77);
    let mut events = Vec::new();
    world::apply(&mut world, Command::Activate, &mut events);

    for _ in 0..200 {
        world::apply(&mut world, Command::Tick { dt: ms(16) }, &mut events);
        let mut commands = Vec::new();
        spawning.handle(
            &events,
            query::phase(&world),
            query::now(&world),
            query::living_enemies(&world),
            &mut commands,
        );
        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        // A second requester in the same step must not push past the cap.
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Apparition,
                position: Vec3::new(8.0, 2.0, 0.0),
                speed: 3.0,
            },
            &mut events,
        );
        assert!(query::living_enemies(&world) <= 15);
    }
    assert_eq!(query::living_enemies(&world), 15);
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let replay = || {
        let mut spawning = Spawning::new(Config::from_tuning(&Tuning::default(), 0x4d59_5df4));
        let mut commands = Vec::new();
        spawning.handle(&[PLAY], GamePhase::Playing, ms(0), 0, &mut commands);
        for step in 1..=100 {
            spawning.handle(&[], GamePhase::Playing, ms(step * 250), 0, &mut commands);
        }
        commands
    };

    let first = replay();
    assert!(!first.is_empty());
    assert_eq!(first, replay(), "replay diverged between runs");
}

//! Integration tests for the HEXARIO engine
//!
//! Drives the public `Engine` facade the way an environment adapter would:
//! setup, actions, counters, observations.

use hexario_core::{
    ActionSpace, Engine, EngineConfig, FeatureCode, GameState, Hex, HexarioError, ObservationKind,
    Perspective, RecordingSink, TileState, ValidationError, WinRule, CENTER,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn engine(radius: u32, players: usize) -> Engine {
    Engine::setup(EngineConfig::new(radius, players).with_velocity(1.0)).unwrap()
}

/// Discrete action vector with the same axis for every player
fn all(players: usize, axis: u8) -> Vec<f32> {
    vec![axis as f32; players]
}

// ============================================================================
// SETUP
// ============================================================================

#[test]
fn test_setup_spawns_every_player() {
    let engine = engine(8, 4);
    for id in 0..4 {
        assert!(!engine.is_dead(id).unwrap());
        assert_eq!(engine.num_kills(id).unwrap(), 0);
        assert_eq!(engine.num_captures(id).unwrap(), 0);
        assert_eq!(engine.num_claims(id).unwrap(), 0);
    }
    // later homes may overlap earlier ones, the last is always whole
    assert_eq!(engine.state().board().territory(3), 7);
    assert_eq!(engine.state().board().num_tiles(), 169);
}

#[test]
fn test_setup_rejects_invalid_configs() {
    for config in [
        EngineConfig::new(2, 1),
        EngineConfig::new(6, 0),
        EngineConfig::new(6, 1).with_observation_radius(1),
        EngineConfig::new(6, 1).with_velocity(0.0),
        EngineConfig::new(6, 1).with_win_rule(WinRule::Coverage(1.5)),
    ] {
        assert!(matches!(Engine::setup(config), Err(HexarioError::Config(_))));
    }
}

#[test]
fn test_config_file_round_trip() {
    let config = EngineConfig::new(7, 3)
        .with_perspective(Perspective::Global)
        .with_seed(99);
    let path = std::env::temp_dir().join(format!("hexario-config-{}.json", std::process::id()));
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = EngineConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_file_errors_name_the_file() {
    let missing = std::env::temp_dir().join("hexario-no-such-config.json");
    let err = EngineConfig::load(&missing).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read config"));
    assert!(err.to_string().contains("hexario-no-such-config.json"));

    let path = std::env::temp_dir().join(format!("hexario-bad-config-{}.json", std::process::id()));
    std::fs::write(&path, "{ not json").unwrap();
    let parse = EngineConfig::load(&path).unwrap_err();
    std::fs::write(&path, r#"{ "map_radius": 2 }"#).unwrap();
    let invalid = EngineConfig::load(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(parse.to_string().starts_with("Failed to parse config"));
    assert!(invalid.to_string().starts_with("Invalid config"));
    assert!(format!("{:#}", invalid).contains("map radius must be greater than 2"));
}

// ============================================================================
// ACTIONS
// ============================================================================

#[test]
fn test_wrong_length_leaves_state_untouched() {
    let mut engine = engine(6, 2);
    let before = engine.snapshot();

    let err = engine.take_actions(&[0.0, 1.0, 2.0]).unwrap_err();
    assert_eq!(
        err,
        HexarioError::Validation(ValidationError::ActionCount { expected: 2, actual: 3 })
    );
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn test_one_bad_action_rejects_the_whole_tick() {
    let mut engine = engine(6, 3);
    let before = engine.snapshot();

    let err = engine.take_actions(&[0.0, 2.0, -1.0]).unwrap_err();
    assert!(matches!(
        err,
        HexarioError::Validation(ValidationError::DiscreteAction { player: 2, .. })
    ));
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn test_slow_players_need_several_ticks() {
    let config = EngineConfig::new(6, 1).with_velocity(0.25);
    let mut engine = Engine::setup(config).unwrap();
    let start = engine.state().player(0).unwrap().head();

    for _ in 0..3 {
        engine.take_actions(&[3.0]).unwrap();
    }
    assert_eq!(engine.state().player(0).unwrap().head(), start);

    engine.take_actions(&[3.0]).unwrap();
    assert_eq!(engine.state().player(0).unwrap().head(), Hex::new(start.q - 1, start.r));
}

#[test]
fn test_continuous_heading_snaps_to_axis() {
    let config = EngineConfig::new(6, 1)
        .with_velocity(1.0)
        .with_action_space(ActionSpace::Continuous);
    let mut engine = Engine::setup(config).unwrap();
    let start = engine.state().player(0).unwrap().head();

    // pi/2 is due west
    engine.take_actions(&[std::f32::consts::FRAC_PI_2]).unwrap();
    assert_eq!(engine.state().player(0).unwrap().head(), Hex::new(start.q - 1, start.r));
}

// ============================================================================
// GAMEPLAY
// ============================================================================

#[test]
fn test_walking_into_border_is_harmless() {
    let mut engine = engine(5, 1);
    for _ in 0..20 {
        engine.take_actions(&all(1, 0)).unwrap();
        assert!(!engine.is_dead(0).unwrap());
    }
    let head = engine.state().player(0).unwrap().head();
    assert_eq!(head.distance_to_center(), 4);
    assert_eq!(engine.distances(0).unwrap()[0], 1);
}

#[test]
fn test_loop_through_home_captures() {
    let config = EngineConfig::new(6, 1).with_velocity(1.0).with_spawn_radius(1);
    let mut state = GameState::with_spawns(&config, &[CENTER]).unwrap();
    let dir = |i| hexario_core::Direction::from_index(i).unwrap();

    // out east past home, up, west, then back down into home
    for d in [0, 0, 2, 2, 3, 3, 5] {
        state.step(&[dir(d)]).unwrap();
    }

    assert!(state.player(0).unwrap().trail().is_empty());
    assert!(state.num_captures(0).unwrap() > 0);
    assert_eq!(state.board().count(TileState::Claimed), 0);
    assert_eq!(
        state.board().territory(0),
        7 + state.num_captures(0).unwrap() as usize
    );
}

#[test]
fn test_reset_player_revives() {
    let mut engine = engine(6, 2);
    // wander until someone dies or time runs out
    let mut ticks = 0;
    while !engine.is_dead(0).unwrap() && !engine.is_dead(1).unwrap() && ticks < 200 {
        engine.take_actions(&[ticks as f32 % 6.0, 3.0]).unwrap();
        ticks += 1;
    }

    for id in 0..2 {
        engine.reset_player(id).unwrap();
        assert!(!engine.is_dead(id).unwrap());
        assert_eq!(engine.num_kills(id).unwrap(), 0);
        assert_eq!(engine.num_claims(id).unwrap(), 0);
        assert!(engine.state().player(id).unwrap().trail().is_empty());
    }
    assert!(engine.reset_player(2).is_err());
}

#[test]
fn test_last_survivor_is_winner() {
    let config = EngineConfig::new(6, 2).with_velocity(1.0).with_spawn_radius(0);
    let mut state = GameState::with_spawns(&config, &[Hex::new(-1, 0), Hex::new(1, 0)]).unwrap();
    let east = hexario_core::Direction::from_index(0).unwrap();
    let west = hexario_core::Direction::from_index(3).unwrap();

    state.step(&[east, west]).unwrap();
    assert!(state.is_dead(1).unwrap());
    assert!(state.is_winner(0).unwrap());
    assert!(!state.is_winner(1).unwrap());
}

// ============================================================================
// OBSERVATIONS
// ============================================================================

#[test]
fn test_local_observation_starts_with_own_head() {
    let engine = engine(8, 1);
    let obs = engine.observation(0).unwrap();
    assert_eq!(obs.len(), 61);
    assert_eq!(obs[0], FeatureCode::OwnPosition.value());
    // home ring around the head
    assert!(obs[1..7].iter().all(|&v| v == FeatureCode::OwnCapture.value()));
}

#[test]
fn test_global_observation_uses_board_order() {
    let config = EngineConfig::new(6, 1)
        .with_perspective(Perspective::Global)
        .with_observation_radius(20);
    let engine = Engine::setup(config).unwrap();
    let obs = engine.observation(0).unwrap();

    assert_eq!(obs.len(), engine.state().board().num_tiles());
    assert!(!obs.contains(&FeatureCode::Hidden.value()));
    let own = obs
        .iter()
        .filter(|&&v| v == FeatureCode::OwnCapture.value() || v == FeatureCode::OwnPosition.value())
        .count();
    assert_eq!(own, 7);
}

#[test]
fn test_observe_into_validates_buffer() {
    let config = EngineConfig::new(6, 2)
        .with_observation(ObservationKind::Pixels)
        .with_pixels(24, 24);
    let engine = Engine::setup(config).unwrap();

    let mut buf = vec![0.0; engine.observation_len()];
    engine.observe_into(1, &mut buf).unwrap();
    assert!(buf.iter().any(|&v| v > 0.0));

    let mut short = vec![0.0; 10];
    assert!(matches!(
        engine.observe_into(1, &mut short),
        Err(HexarioError::Validation(ValidationError::BufferLength { .. }))
    ));
}

#[test]
fn test_show_hands_frames_to_sink() {
    let mut engine = engine(5, 2);
    let mut sink = RecordingSink {
        quit_after: Some(3),
        ..Default::default()
    };

    let mut quit = false;
    for _ in 0..10 {
        if engine.show(&mut sink) {
            quit = true;
            break;
        }
        engine.take_actions(&all(2, 1)).unwrap();
    }
    assert!(quit);
    assert_eq!(sink.frames.len(), 3);
    assert_eq!(sink.frames[2].tick, 2);
}

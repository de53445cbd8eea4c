//! Tests for solver configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "full_assert"
        random_seed = 42

        [termination]
        seconds_spent_limit = 30
        best_score_limit = "0hard/0soft"

        [[phases]]
        type = "construction_heuristic"
        construction_heuristic_type = "first_fit_decreasing"
        pick_early_type = "first_non_deteriorating_score"
        move_thread_count = 2

        [phases.entity_selector]
        selection_order = "sorted"
        cache_type = "phase"

        [[phases]]
        type = "exhaustive_search"
        exhaustive_search_type = "brute_force"

        [phases.termination]
        step_count_limit = 100
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.random_seed, Some(42));
    let termination = config.termination.as_ref().unwrap();
    assert_eq!(termination.seconds_spent_limit, Some(30));
    assert_eq!(termination.best_score_limit.as_deref(), Some("0hard/0soft"));
    assert_eq!(config.phases.len(), 2);

    match &config.phases[0] {
        PhaseConfig::ConstructionHeuristic(ch) => {
            assert_eq!(
                ch.construction_heuristic_type,
                ConstructionHeuristicType::FirstFitDecreasing
            );
            assert_eq!(
                ch.pick_early_type,
                ConstructionHeuristicPickEarlyType::FirstNonDeterioratingScore
            );
            assert_eq!(ch.move_thread_count, Some(2));
            assert_eq!(
                ch.entity_selector,
                Some(SelectorConfig::new(
                    SelectionOrder::Sorted,
                    SelectionCacheType::Phase
                ))
            );
        }
        other => panic!("unexpected phase {other:?}"),
    }

    match &config.phases[1] {
        PhaseConfig::ExhaustiveSearch(es) => {
            assert_eq!(es.exhaustive_search_type, ExhaustiveSearchType::BruteForce);
            assert_eq!(es.entity_cache_type, SelectionCacheType::Phase);
            assert_eq!(
                es.resolved_node_exploration_type(),
                NodeExplorationType::OriginalOrder
            );
        }
        other => panic!("unexpected phase {other:?}"),
    }
    assert_eq!(
        config.phases[1].termination().unwrap().step_count_limit,
        Some(100)
    );
    config.validate().unwrap();
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: reproducible
        random_seed: 42
        termination:
          millis_spent_limit: 500
          unimproved_step_count_limit: 10
        phases:
          - type: construction_heuristic
            construction_heuristic_type: strongest_fit
            skip_undo: true
          - type: exhaustive_search
            node_exploration_type: optimistic_bound_first
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.time_limit(), Some(Duration::from_millis(500)));
    match &config.phases[1] {
        PhaseConfig::ExhaustiveSearch(es) => {
            assert_eq!(es.exhaustive_search_type, ExhaustiveSearchType::BranchAndBound);
            assert_eq!(
                es.resolved_node_exploration_type(),
                NodeExplorationType::OptimisticBoundFirst
            );
        }
        other => panic!("unexpected phase {other:?}"),
    }
    config.validate().unwrap();
}

#[test]
fn test_defaults() {
    let config = SolverConfig::from_toml_str("").unwrap();
    assert_eq!(config, SolverConfig::default());
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert!(config.phases.is_empty());
    assert_eq!(config.time_limit(), None);

    let es = ExhaustiveSearchConfig::default();
    assert_eq!(es.resolved_node_exploration_type(), NodeExplorationType::DepthFirst);
    assert!(es.exhaustive_search_type.is_bounding_enabled());
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_random_seed(123)
        .with_termination_seconds(60)
        .with_environment_mode(EnvironmentMode::FastAssert)
        .with_phase(PhaseConfig::ConstructionHeuristic(
            ConstructionHeuristicConfig::default(),
        ))
        .with_phase(PhaseConfig::ExhaustiveSearch(ExhaustiveSearchConfig::default()));

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Some(Duration::from_secs(60)));
    assert_eq!(config.phases.len(), 2);
    assert!(config.environment_mode.is_asserted());
    assert!(!config.environment_mode.is_full_asserted());
}

#[test]
fn test_time_limit_sums_units() {
    let termination = TerminationConfig {
        millis_spent_limit: Some(250),
        seconds_spent_limit: Some(1),
        minutes_spent_limit: Some(1),
        ..TerminationConfig::default()
    };
    assert_eq!(termination.time_limit(), Some(Duration::from_millis(61_250)));
    assert!(!termination.is_empty());
    assert!(TerminationConfig::default().is_empty());
}

#[test]
fn test_brute_force_rejects_other_exploration() {
    let config = SolverConfig::new().with_phase(PhaseConfig::ExhaustiveSearch(
        ExhaustiveSearchConfig {
            exhaustive_search_type: ExhaustiveSearchType::BruteForce,
            node_exploration_type: Some(NodeExplorationType::DepthFirst),
            ..ExhaustiveSearchConfig::default()
        },
    ));

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("brute_force")));
}

#[test]
fn test_exhaustive_requires_phase_cache() {
    let es = ExhaustiveSearchConfig {
        entity_cache_type: SelectionCacheType::Step,
        ..ExhaustiveSearchConfig::default()
    };
    assert!(es.validate().is_err());
}

#[test]
fn test_exhaustive_rejects_never_ending_selector() {
    let es = ExhaustiveSearchConfig {
        entity_selector: Some(SelectorConfig::new(
            SelectionOrder::Random,
            SelectionCacheType::Phase,
        )),
        ..ExhaustiveSearchConfig::default()
    };
    assert!(es.validate().is_err());
}

#[test]
fn test_sorted_selector_requires_cache() {
    let selector = SelectorConfig::new(SelectionOrder::Sorted, SelectionCacheType::JustInTime);
    assert!(selector.validate().is_err());
    assert!(SelectorConfig::new(SelectionOrder::Shuffled, SelectionCacheType::Step)
        .validate()
        .is_ok());
    assert!(SelectorConfig::new(SelectionOrder::Random, SelectionCacheType::JustInTime)
        .validate()
        .is_ok());
}

#[test]
fn test_construction_thread_rules() {
    let zero_threads = ConstructionHeuristicConfig {
        move_thread_count: Some(0),
        ..ConstructionHeuristicConfig::default()
    };
    assert!(zero_threads.validate().is_err());

    let skip_undo_threads = ConstructionHeuristicConfig {
        move_thread_count: Some(2),
        skip_undo: true,
        ..ConstructionHeuristicConfig::default()
    };
    assert!(skip_undo_threads.validate().is_err());
}

#[test]
fn test_validation_error_names_phase() {
    let config = SolverConfig::new()
        .with_phase(PhaseConfig::ConstructionHeuristic(
            ConstructionHeuristicConfig::default(),
        ))
        .with_phase(PhaseConfig::ExhaustiveSearch(ExhaustiveSearchConfig {
            entity_cache_type: SelectionCacheType::JustInTime,
            ..ExhaustiveSearchConfig::default()
        }));

    let err = config.validate().unwrap_err();
    assert!(err.to_string().starts_with("Invalid configuration: phase 1:"));

    let converted: PhaseForgeError = err.into();
    assert!(matches!(converted, PhaseForgeError::Config(ref m) if m.starts_with("phase 1:")));
}

#[test]
fn test_sorter_manners() {
    assert_eq!(
        ConstructionHeuristicType::FirstFit.entity_sorter_manner(),
        EntitySorterManner::None
    );
    assert_eq!(
        ConstructionHeuristicType::WeakestFitDecreasing.entity_sorter_manner(),
        EntitySorterManner::DecreasingDifficulty
    );
    assert_eq!(
        ConstructionHeuristicType::StrongestFit.value_sorter_manner(),
        ValueSorterManner::DecreasingStrength
    );
    assert_eq!(
        ConstructionHeuristicType::WeakestFit.value_sorter_manner(),
        ValueSorterManner::IncreasingStrength
    );
    assert_eq!(
        ConstructionHeuristicType::CheapestInsertion.entity_sorter_manner(),
        EntitySorterManner::DecreasingDifficultyIfAvailable
    );
    assert_eq!(
        ConstructionHeuristicType::AllocateToValueFromQueue.value_sorter_manner(),
        ValueSorterManner::IncreasingStrengthIfAvailable
    );
}

#[test]
fn test_placer_types() {
    let parse = |text: &str| -> ConstructionHeuristicType {
        let config: ConstructionHeuristicConfig =
            toml::from_str(&format!("construction_heuristic_type = \"{text}\"")).unwrap();
        config.construction_heuristic_type
    };
    assert_eq!(parse("first_fit_decreasing").placer_type(), PlacerType::QueuedEntity);
    assert_eq!(parse("allocate_entity_from_queue").placer_type(), PlacerType::QueuedEntity);
    assert_eq!(parse("allocate_to_value_from_queue").placer_type(), PlacerType::QueuedValue);
    assert_eq!(parse("cheapest_insertion").placer_type(), PlacerType::Pooled);
    assert_eq!(parse("allocate_from_pool").placer_type(), PlacerType::Pooled);
}

#[test]
fn test_selection_order_resolution() {
    assert_eq!(
        SelectionOrder::Inherit.resolve(SelectionOrder::Inherit),
        SelectionOrder::Original
    );
    assert_eq!(
        SelectionOrder::Inherit.resolve(SelectionOrder::Random),
        SelectionOrder::Random
    );
    assert_eq!(
        SelectionOrder::Sorted.resolve(SelectionOrder::Random),
        SelectionOrder::Sorted
    );
    assert!(SelectionOrder::Probabilistic.is_never_ending());
    assert!(!SelectionOrder::Shuffled.is_never_ending());
    assert!(SelectionCacheType::Phase > SelectionCacheType::Step);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = SolverConfig::load("definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[cfg(test)]
mod tests {
    use crate::numerical::adaptive_refinement::admissible_set::{
        AdmissibleSet, AdmissibleSparseGridNodeSet, RefinableNodesSet,
    };
    use crate::numerical::adaptive_refinement::config::{
        LookAheadNormalization, RefinementConfig, RefinementSettings,
    };
    use crate::numerical::adaptive_refinement::criterion::{
        RankingParams, RefinementCriterion, SurplusRanking, surplus_of,
    };
    use crate::numerical::adaptive_refinement::error::RefinementError;
    use crate::numerical::adaptive_refinement::knowledge::{KnowledgeType, MemoryKnowledge};
    use crate::numerical::adaptive_refinement::manager::RefinementManager;
    use crate::numerical::adaptive_refinement::observer::{EventRecorder, RefinementEvent};
    use crate::numerical::sparse_grid::balancing::is_balanced;
    use crate::numerical::sparse_grid::grid::{Grid, GridType};
    use crate::numerical::sparse_grid::grid_point::GridPoint;
    use crate::numerical::sparse_grid::local_refinement::{
        AddNode, CreateAllChildrenRefinement, LocalRefinementStrategy, RefinementLimits,
    };
    use approx::assert_relative_eq;
    use nalgebra::DVector;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    const QOI: &str = "u";

    fn p(level: u32, index: u32) -> GridPoint {
        GridPoint::new(vec![level], vec![index])
    }

    // coefficient vector in grid order
    fn alphas_by<F: Fn(&GridPoint) -> f64>(grid: &Grid, f: F) -> DVector<f64> {
        DVector::from_iterator(grid.size(), grid.storage().iter().map(|point| f(point)))
    }

    fn knowledge_for(grid: &Grid, timesteps: &[f64], alphas: &DVector<f64>) -> MemoryKnowledge {
        let mut knowledge = MemoryKnowledge::new();
        for &t in timesteps {
            knowledge.set_alpha(QOI, t, KnowledgeType::Simple, alphas.clone());
        }
        assert_eq!(alphas.len(), grid.size());
        knowledge
    }

    fn quiet<A: AdmissibleSet + 'static>(admissible: A) -> RefinementManager {
        RefinementManager::new(admissible, SurplusRanking, CreateAllChildrenRefinement)
            .with_observer(EventRecorder::new())
    }

    /// criterion counting its rank evaluations
    struct CountingCriterion {
        calls: Rc<Cell<usize>>,
    }

    impl RefinementCriterion for CountingCriterion {
        fn knowledge_type(&self) -> KnowledgeType {
            KnowledgeType::Simple
        }

        fn rank(
            &self,
            grid: &Grid,
            point: &GridPoint,
            alphas: &DVector<f64>,
            _params: &RankingParams,
        ) -> f64 {
            self.calls.set(self.calls.get() + 1);
            surplus_of(grid, point, alphas).abs()
        }
    }

    /// creates all children on every other call, nothing otherwise
    struct EveryOtherCall {
        calls: Cell<usize>,
    }

    impl LocalRefinementStrategy for EveryOtherCall {
        fn refine(
            &self,
            grid: &mut Grid,
            point: &GridPoint,
            limits: &RefinementLimits,
        ) -> Vec<GridPoint> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call % 2 == 1 {
                return Vec::new();
            }
            CreateAllChildrenRefinement.refine(grid, point, limits)
        }

        fn name(&self) -> &str {
            "every other call"
        }
    }

    /// inserts children but reports none of them
    struct Unreported;

    impl LocalRefinementStrategy for Unreported {
        fn refine(
            &self,
            grid: &mut Grid,
            point: &GridPoint,
            limits: &RefinementLimits,
        ) -> Vec<GridPoint> {
            CreateAllChildrenRefinement.refine(grid, point, limits);
            Vec::new()
        }

        fn name(&self) -> &str {
            "unreported"
        }
    }

    #[test]
    fn test_num_of_points_to_refine() {
        let grid = Grid::regular(GridType::Linear, 1, 2);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        assert_relative_eq!(manager.get_num_of_points_to_refine(100), 0.0);
        manager.set_adapt_points(5);
        assert_relative_eq!(manager.get_num_of_points_to_refine(100), 5.0);
        manager.set_adapt_points(0);
        manager.set_adapt_rate(0.1);
        assert_relative_eq!(manager.get_num_of_points_to_refine(30), 3.0);
        manager.set_adapt_points(5);
        assert_relative_eq!(manager.get_num_of_points_to_refine(30), 3.0);
        assert_relative_eq!(manager.get_num_of_points_to_refine(100), 5.0);
    }

    #[test]
    fn test_max_level_is_capped() {
        let grid = Grid::regular(GridType::Linear, 1, 2);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        assert_eq!(manager.adapt_max_level(), 30);
        manager.set_adapt_max_level(40);
        assert_eq!(manager.adapt_max_level(), 31);
    }

    #[test]
    fn test_candidates_threshold_and_order() {
        // refinable points of the level 2 grid: (2,1) and (2,3)
        let grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |point| match point.index(0) {
            _ if point.level(0) == 1 => 1.0,
            1 => 0.5,
            _ => -2.0,
        });
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));

        let all = manager
            .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].point, p(2, 1));
        assert_relative_eq!(all[0].score, 0.5);
        assert_eq!(all[1].point, p(2, 3));
        assert_relative_eq!(all[1].score, 2.0);

        manager.set_adapt_threshold(1.0);
        let above = manager
            .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_eq!(above.len(), 1);
        assert_eq!(above[0].point, p(2, 3));
        // strictly above
        manager.set_adapt_threshold(2.0);
        let none = manager
            .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_reduces_over_timesteps() {
        let grid = Grid::regular(GridType::Linear, 1, 2);
        let mut knowledge = MemoryKnowledge::new();
        knowledge.set_alpha(
            QOI,
            0.0,
            KnowledgeType::Simple,
            alphas_by(&grid, |point| if point.index(0) == 1 { 1.0 } else { 3.0 }),
        );
        knowledge.set_alpha(
            QOI,
            1.0,
            KnowledgeType::Simple,
            alphas_by(&grid, |point| if point.index(0) == 1 { 4.0 } else { 0.5 }),
        );
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        let b = manager
            .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &[0.0, 1.0])
            .unwrap();
        // max over time: (2,1) -> 4.0, (2,3) -> 3.0
        assert_eq!(b[0].point, p(2, 3));
        assert_relative_eq!(b[0].score, 3.0);
        assert_eq!(b[1].point, p(2, 1));
        assert_relative_eq!(b[1].score, 4.0);
    }

    #[test]
    fn test_refine_grid_creates_children_of_best_point() {
        let mut grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |point| if point.index(0) == 3 { 2.0 } else { 0.5 });
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_points(1);

        let new_points = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_eq!(new_points, vec![p(3, 5), p(3, 7)]);
        assert_eq!(grid.size(), 5);
        let mut values = manager.admissible_set().values();
        values.sort();
        assert_eq!(values, vec![p(2, 1), p(3, 5), p(3, 7)]);
    }

    #[test]
    fn test_size_invariant_and_fresh_points() {
        let mut grid = Grid::regular(GridType::Linear, 2, 3);
        let before: Vec<GridPoint> = grid.storage().iter().cloned().collect();
        let alphas = alphas_by(&grid, |point| point.level_sum() as f64);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_rate(0.5);

        let new_points = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert!(!new_points.is_empty());
        assert_eq!(grid.size(), before.len() + new_points.len());
        for point in &new_points {
            assert!(!before.contains(point));
            assert!(grid.contains(point));
        }
    }

    #[test]
    fn test_noop_refinements_do_not_consume_budget() {
        let mut grid = Grid::regular(GridType::Linear, 1, 3);
        // refinable: the four level 3 points, scored 1..4 by index
        let alphas = alphas_by(&grid, |point| {
            if point.level(0) == 3 {
                ((point.index(0) + 1) / 2) as f64
            } else {
                0.0
            }
        });
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = RefinementManager::new(
            RefinableNodesSet::from_grid(&grid, 30),
            SurplusRanking,
            EveryOtherCall {
                calls: Cell::new(0),
            },
        )
        .with_observer(EventRecorder::new());
        manager.set_adapt_points(2);

        let report = manager
            .refine_grid_with_report(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_eq!(report.candidates, 4);
        assert_relative_eq!(report.budget, 2.0);
        // (3,5) is skipped by the no-op call
        assert_eq!(report.refined_points, vec![p(3, 7), p(3, 3)]);
        assert_eq!(report.new_points.len(), 4);
        assert_eq!(grid.size(), 11);
        assert_eq!(report.added(), 4);
    }

    #[test]
    fn test_budget_runs_out_of_candidates() {
        let mut grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |_| 1.0);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_points(10);
        let report = manager
            .refine_grid_with_report(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_eq!(report.refined_points.len(), 2);
        assert_eq!(grid.size(), 7);
    }

    #[test]
    fn test_fractional_budget_rounds_up() {
        let mut grid = Grid::regular(GridType::Linear, 1, 3);
        let alphas = alphas_by(&grid, |point| point.index(0) as f64);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        // 0.3 * 4 candidates = 1.2
        manager.set_adapt_rate(0.3);
        let report = manager
            .refine_grid_with_report(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_relative_eq!(report.budget, 1.2, epsilon = 1e-12);
        assert_eq!(report.refined_points.len(), 2);
    }

    #[test]
    fn test_empty_admissible_set_is_a_noop() {
        let mut grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |_| 1.0);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(AdmissibleSparseGridNodeSet::new(30));
        manager.set_adapt_points(3);
        let new_points = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert!(new_points.is_empty());
        assert_eq!(grid.size(), 3);
        assert_eq!(manager.admissible_set().size(), 0);
    }

    #[test]
    fn test_all_below_threshold_is_a_noop() {
        let mut grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |_| 1.0);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_points(3);
        manager.set_adapt_threshold(100.0);
        manager.set_balancing(true);
        let admissible_before = manager.admissible_set().values();
        let new_points = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert!(new_points.is_empty());
        assert_eq!(grid.size(), 3);
        assert_eq!(manager.admissible_set().values(), admissible_before);
    }

    #[test]
    fn test_balancing_adds_missing_parents() {
        let setup = || {
            let mut grid = Grid::new(GridType::Linear, 2);
            grid.insert(GridPoint::root(2));
            grid.insert(GridPoint::new(vec![2, 1], vec![1, 1]));
            let alphas = alphas_by(&grid, |point| if point.level(0) == 2 { 5.0 } else { 0.1 });
            let knowledge = knowledge_for(&grid, &[0.0], &alphas);
            (grid, knowledge)
        };

        let (mut grid, knowledge) = setup();
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_points(1);
        manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        // (2,1)x(2,1) lacks its parent (1,1)x(2,1)
        assert_eq!(grid.size(), 6);
        assert!(!is_balanced(&grid));

        let (mut grid, knowledge) = setup();
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_points(1);
        manager.set_balancing(true);
        let report = manager
            .refine_grid_with_report(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert!(is_balanced(&grid));
        assert_eq!(report.balanced_points, 2);
        assert_eq!(report.new_points.len(), 6);
        assert_eq!(grid.size(), 8);
        assert!(grid.contains(&GridPoint::new(vec![1, 2], vec![1, 1])));
        assert!(grid.contains(&GridPoint::new(vec![1, 2], vec![1, 3])));
    }

    #[test]
    fn test_unsupported_grid_type() {
        let mut grid = Grid::regular(GridType::Bspline, 1, 2);
        let alphas = alphas_by(&grid, |_| 1.0);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_points(1);
        let err = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap_err();
        assert_eq!(err, RefinementError::UnsupportedGridType(GridType::Bspline));
        assert_eq!(grid.size(), 3);
    }

    #[test]
    fn test_missing_knowledge_and_wrong_length() {
        let mut grid = Grid::regular(GridType::Linear, 1, 2);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_points(1);
        let err = manager
            .refine_grid(&mut grid, &MemoryKnowledge::new(), &RankingParams::new(), QOI, &[0.0])
            .unwrap_err();
        assert!(matches!(err, RefinementError::MissingKnowledge { .. }));

        let short = MemoryKnowledge::new().with_alpha(
            QOI,
            0.0,
            KnowledgeType::Simple,
            DVector::from_vec(vec![1.0, 2.0]),
        );
        let err = manager
            .refine_grid(&mut grid, &short, &RankingParams::new(), QOI, &[0.0])
            .unwrap_err();
        assert_eq!(
            err,
            RefinementError::CoefficientLength {
                expected: 3,
                actual: 2
            }
        );
        assert_eq!(grid.size(), 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |_| 1.0);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_rate(-1.0);
        let err = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap_err();
        assert!(matches!(err, RefinementError::InvalidConfig(_)));
    }

    #[test]
    fn test_unreported_points_violate_invariant() {
        let mut grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |_| 1.0);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = RefinementManager::new(
            RefinableNodesSet::from_grid(&grid, 30),
            SurplusRanking,
            Unreported,
        )
        .with_observer(EventRecorder::new());
        manager.set_adapt_points(1);
        let err = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap_err();
        assert!(matches!(
            err,
            RefinementError::InvariantViolation {
                expected: 0,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_cache_reused_by_look_ahead() {
        let timesteps = [0.0, 0.5, 1.0];
        let grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |point| point.index(0) as f64);
        let knowledge = knowledge_for(&grid, &timesteps, &alphas);
        let admissible = AdmissibleSparseGridNodeSet::from_grid(&grid, 30);
        let n_candidates = admissible.size();
        assert_eq!(n_candidates, 4);

        let calls = Rc::new(Cell::new(0));
        let mut manager = RefinementManager::new(
            admissible,
            CountingCriterion {
                calls: calls.clone(),
            },
            AddNode,
        )
        .with_observer(EventRecorder::new());
        manager.set_adapt_points(1);
        manager
            .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &timesteps)
            .unwrap();
        assert_eq!(calls.get(), n_candidates * timesteps.len());

        // the simulated points are the candidates themselves: all cache hits
        calls.set(0);
        manager.set_average_weightening(true);
        manager
            .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &timesteps)
            .unwrap();
        assert_eq!(calls.get(), n_candidates * timesteps.len());
    }

    #[test]
    fn test_look_ahead_normalization() {
        let grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |point| match point.level(0) {
            1 => 1.0,
            _ if point.index(0) == 1 => 2.0,
            _ => 4.0,
        });
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let admissible = AdmissibleSparseGridNodeSet::from_grid(&grid, 30);
        let order = admissible.values();
        let plain: Vec<f64> = order
            .iter()
            .map(|point| surplus_of(&grid, point, &alphas).abs())
            .collect();

        let run = |normalization: LookAheadNormalization| -> HashMap<GridPoint, f64> {
            let mut manager =
                RefinementManager::new(admissible.clone(), SurplusRanking, AddNode)
                    .with_observer(EventRecorder::new())
                    .with_config(
                        RefinementConfig::new()
                            .with_adapt_points(1)
                            .with_average_weightening(true)
                            .with_look_ahead_normalization(normalization),
                    );
            manager
                .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
                .unwrap()
                .into_iter()
                .map(|c| (c.point, c.score))
                .collect()
        };

        let global = run(LookAheadNormalization::Global);
        let mut running = 0.0;
        for (point, rank) in order.iter().zip(plain.iter()) {
            running += rank;
            assert_relative_eq!(global[point], running / order.len() as f64);
        }

        let per_candidate = run(LookAheadNormalization::PerCandidate);
        for (point, rank) in order.iter().zip(plain.iter()) {
            assert_relative_eq!(per_candidate[point], *rank);
        }
    }

    #[test]
    fn test_look_ahead_needs_node_set() {
        let grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |point| point.index(0) as f64);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        let plain = manager
            .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        manager.set_average_weightening(true);
        let weighted = manager
            .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_eq!(plain, weighted);
    }

    #[test]
    fn test_observer_receives_episode() {
        let mut grid = Grid::regular(GridType::Linear, 1, 3);
        let alphas = alphas_by(&grid, |point| point.index(0) as f64);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let recorder = EventRecorder::new();
        let mut manager = RefinementManager::new(
            RefinableNodesSet::from_grid(&grid, 30),
            SurplusRanking,
            CreateAllChildrenRefinement,
        )
        .with_observer(recorder.clone());
        manager.set_adapt_points(2);
        manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();

        let events = recorder.events();
        assert_eq!(
            events.first(),
            Some(&RefinementEvent::RankingStarted {
                candidates: 4,
                timesteps: 1
            })
        );
        assert_eq!(
            events.last(),
            Some(&RefinementEvent::EpisodeFinished {
                new_points: 4,
                grid_size: 11
            })
        );
        let refined = events
            .iter()
            .filter(|e| matches!(e, RefinementEvent::PointRefined { .. }))
            .count();
        assert_eq!(refined, 2);
    }

    #[test]
    fn test_refine_window_and_settings() {
        let task = "
        refinement
        adapt_points: 1
        adapt_time_window: 0.0, 1.0
        balancing: true
        admissible_set
        kind: sparse_grid_nodes
        strategy
        kind: add_node
        ";
        let settings = RefinementSettings::from_task_str(task).unwrap();
        let mut grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |point| point.index(0) as f64);
        let knowledge = knowledge_for(&grid, &[0.0, 1.0], &alphas);
        let mut manager =
            RefinementManager::from_settings(&settings, &grid).with_observer(EventRecorder::new());
        assert_eq!(manager.adapt_time_window(), &[0.0, 1.0]);
        assert!(manager.has_balancing());
        assert_eq!(manager.local_refinement_strategy().name(), "add node");

        let new_points = manager
            .refine_window(&mut grid, &knowledge, &RankingParams::new(), QOI)
            .unwrap();
        // children of (2,3) are predicted highest
        assert_eq!(new_points.len(), 1);
        assert_eq!(new_points[0].level(0), 3);
        assert!(new_points[0].index(0) >= 5);
        assert_eq!(grid.size(), 4);
        assert_eq!(manager.admissible_set().size(), 5);
    }

    #[test]
    fn test_lowered_max_level_retires_candidates() {
        let mut grid = Grid::regular(GridType::Linear, 1, 2);
        let alphas = alphas_by(&grid, |_| 1.0);
        let knowledge = knowledge_for(&grid, &[0.0], &alphas);
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        assert_eq!(manager.admissible_set().size(), 2);
        manager.set_adapt_max_level(2);
        manager.set_adapt_points(5);

        let b = manager
            .candidates(&grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert!(b.is_empty());
        assert_eq!(manager.admissible_set().limits().max_level, 2);
        let new_points = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert!(new_points.is_empty());
        assert_eq!(manager.admissible_set().size(), 0);
        assert_eq!(grid.size(), 3);

        // raising it again brings the leaves back
        manager.set_adapt_max_level(3);
        let new_points = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_eq!(new_points.len(), 4);
    }

    #[test]
    fn test_border_points_retired_when_border_refinement_is_off() {
        let setup = || {
            let mut grid = Grid::new(GridType::LinearBoundary, 1);
            grid.insert(GridPoint::new(vec![0], vec![0]));
            grid.insert(GridPoint::new(vec![0], vec![1]));
            let alphas = alphas_by(&grid, |_| 1.0);
            let knowledge = knowledge_for(&grid, &[0.0], &alphas);
            (grid, knowledge)
        };

        let (mut grid, knowledge) = setup();
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        manager.set_adapt_points(5);
        let new_points = manager
            .refine_grid(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_eq!(new_points, vec![p(1, 1)]);

        let (mut grid, knowledge) = setup();
        let mut manager = quiet(RefinableNodesSet::from_grid(&grid, 30));
        assert_eq!(manager.admissible_set().size(), 2);
        manager.set_adapt_points(5);
        manager.refine_on_the_border(false);
        let report = manager
            .refine_grid_with_report(&mut grid, &knowledge, &RankingParams::new(), QOI, &[0.0])
            .unwrap();
        assert_eq!(report.candidates, 0);
        assert!(report.new_points.is_empty());
        assert_eq!(grid.size(), 2);
        assert_eq!(manager.admissible_set().size(), 0);
    }
}

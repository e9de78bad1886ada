#![allow(non_snake_case)]
use RustedSparseRefine::Utils::logger::{init_logger, timestamped_log_file};
use RustedSparseRefine::numerical::adaptive_refinement::config::RefinementSettings;
use RustedSparseRefine::numerical::adaptive_refinement::criterion::{
    RankingParams, RefinementCriterion,
};
use RustedSparseRefine::numerical::adaptive_refinement::error::RefinementError;
use RustedSparseRefine::numerical::adaptive_refinement::knowledge::MemoryKnowledge;
use RustedSparseRefine::numerical::adaptive_refinement::manager::RefinementManager;
use RustedSparseRefine::numerical::sparse_grid::grid::{Grid, GridType};
use log::info;
use nalgebra::DVector;
use rand::Rng;
use std::path::Path;

const DEFAULT_TASK: &str = "
refinement
adapt_rate: 0.2
adapt_threshold: 1e-4
adapt_time_window: 0.0, 1.0
balancing: true
criterion
kind: surplus
logging
level: info
";

// surpluses of a function with a steep front near x = 0.75, scaled in time
fn synthetic_knowledge(
    grid: &Grid,
    settings: &RefinementSettings,
    window: &[f64],
) -> MemoryKnowledge {
    let mut rng = rand::rng();
    let mut knowledge = MemoryKnowledge::new();
    for &t in window {
        let alphas = DVector::from_iterator(
            grid.size(),
            grid.storage().iter().map(|p| {
                let x = p.coordinate(0);
                let front = (-(x - 0.75).powi(2) * 200.0).exp();
                let noise = 1.0 + 0.05 * rng.random_range(-1.0..1.0);
                (1.0 + t) * front * noise * 2.0_f64.powi(-(p.level_sum() as i32))
            }),
        );
        knowledge.set_alpha("u", t, settings.criterion.knowledge_type(), alphas);
    }
    knowledge
}

fn main() -> Result<(), RefinementError> {
    // optional argument: path to a task document
    let settings = match std::env::args().nth(1) {
        Some(path) => RefinementSettings::from_file(path)?,
        None => RefinementSettings::from_task_str(DEFAULT_TASK)?,
    };
    let log_file = settings
        .log_to_file
        .then(|| timestamped_log_file(Path::new(".")));
    init_logger(settings.loglevel.as_deref(), log_file.as_deref())?;

    let window = if settings.config.adapt_time_window.is_empty() {
        vec![0.0]
    } else {
        settings.config.adapt_time_window.clone()
    };
    let mut grid = Grid::regular(GridType::Linear, 2, 3);
    let mut manager = RefinementManager::from_settings(&settings, &grid);
    for episode in 0..4 {
        let knowledge = synthetic_knowledge(&grid, &settings, &window);
        let report = manager.refine_grid_with_report(
            &mut grid,
            &knowledge,
            &RankingParams::new(),
            "u",
            &window,
        )?;
        info!("episode {}\n{}", episode, report.to_table());
        if report.new_points.is_empty() {
            break;
        }
    }
    info!("final grid has {} points", grid.size());
    Ok(())
}

//! Progress reporting of refinement episodes.
//!
//! The manager never prints: every step is emitted as a [`RefinementEvent`] to the
//! installed [`RefinementObserver`]. [`LogObserver`] forwards to the `log` macros,
//! [`EventRecorder`] keeps the events for inspection.
use crate::numerical::sparse_grid::grid_point::GridPoint;
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum RefinementEvent {
    RankingStarted {
        candidates: usize,
        timesteps: usize,
    },
    TimestepRanked {
        timestep: f64,
        cache_hits: usize,
        cache_misses: usize,
    },
    LookAheadStarted {
        candidates: usize,
    },
    CandidatesSelected {
        selected: usize,
        threshold: f64,
    },
    PointRefined {
        point: GridPoint,
        score: f64,
        budget_left: f64,
        candidates_left: usize,
        new_points: usize,
        refined_points: usize,
    },
    Balanced {
        added: usize,
    },
    EpisodeFinished {
        new_points: usize,
        grid_size: usize,
    },
}

pub trait RefinementObserver {
    fn on_event(&mut self, event: &RefinementEvent);
}

/// Writes events through `log`: episode milestones at info level, steps at debug level
#[derive(Debug, Clone, Default)]
pub struct LogObserver;

impl RefinementObserver for LogObserver {
    fn on_event(&mut self, event: &RefinementEvent) {
        match event {
            RefinementEvent::RankingStarted {
                candidates,
                timesteps,
            } => info!(
                "compute ranking of {} candidates over {} time steps",
                candidates, timesteps
            ),
            RefinementEvent::TimestepRanked {
                timestep,
                cache_hits,
                cache_misses,
            } => debug!(
                "ranked time step {} (cache hits {}, misses {})",
                timestep, cache_hits, cache_misses
            ),
            RefinementEvent::LookAheadStarted { candidates } => {
                info!("compute merged ranking by simulating {} refinements", candidates)
            }
            RefinementEvent::CandidatesSelected {
                selected,
                threshold,
            } => info!("{} candidates above threshold {}", selected, threshold),
            RefinementEvent::PointRefined {
                point,
                score,
                budget_left,
                candidates_left,
                new_points,
                refined_points,
            } => info!(
                "refine {}/{} ({}, {}) {} = {:e}",
                budget_left, candidates_left, new_points, refined_points, point, score
            ),
            RefinementEvent::Balanced { added } => info!("balancing added {} points", added),
            RefinementEvent::EpisodeFinished {
                new_points,
                grid_size,
            } => info!(
                "refinement finished: {} new points, grid size {}",
                new_points, grid_size
            ),
        }
    }
}

/// Records events into a shared buffer; clone the recorder to keep a handle
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<RefinementEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        EventRecorder::default()
    }

    pub fn events(&self) -> Vec<RefinementEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl RefinementObserver for EventRecorder {
    fn on_event(&mut self, event: &RefinementEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

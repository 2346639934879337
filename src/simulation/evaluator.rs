//! Generation evaluator: runs one episode for a whole population.
//!
//! Every member gets a fresh vehicle at the starting pose. All live vehicles
//! advance in lockstep, in index order, until none is left alive. While a
//! vehicle is alive its member's fitness grows by the vehicle's cumulative
//! distance every tick, so fitness is the sum of the running distance over
//! the vehicle's lifetime rather than the final distance alone.

use super::controller::Controller;
use super::params::Params;
use super::track::Track;
use super::vehicle::Vehicle;

/// One population entry as seen by the evaluator.
///
/// The fitness slot belongs to the optimizer; the evaluator only adds to it.
pub struct Member<'a> {
    /// Decision function for this member's vehicle.
    pub controller: &'a dyn Controller,
    /// Fitness accumulator owned by the optimizer.
    pub fitness: &'a mut f64,
}

impl<'a> Member<'a> {
    /// Pairs a controller with its fitness accumulator.
    pub fn new(controller: &'a dyn Controller, fitness: &'a mut f64) -> Self {
        Self {
            controller,
            fitness,
        }
    }
}

/// Whether the caller should keep going after a presented frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep simulating.
    Continue,
    /// Stop immediately; the whole run should end.
    Quit,
}

/// State of one tick, handed to the presenter after all vehicles moved.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Generation number supplied by the optimizer.
    pub generation: u32,
    /// Ticks completed in this episode, including the current one.
    pub tick: u64,
    /// Vehicles that were alive when the tick started.
    pub alive: usize,
    /// All vehicles, in population order.
    pub vehicles: &'a [Vehicle],
    /// Per vehicle, whether it was alive when the tick started.
    pub active: &'a [bool],
}

impl<'a> FrameView<'a> {
    /// Vehicles that took part in the tick, including any that crashed during it.
    ///
    /// Yields exactly [`FrameView::alive`] vehicles.
    pub fn active_vehicles(&self) -> impl Iterator<Item = &'a Vehicle> + use<'a> {
        let (vehicles, active) = (self.vehicles, self.active);
        vehicles
            .iter()
            .zip(active)
            .filter_map(|(vehicle, &was_alive)| was_alive.then_some(vehicle))
    }
}

/// Receives every tick's frame: rendering, pacing and quit detection live behind this.
pub trait Presenter {
    /// Shows a frame and reports whether to continue.
    fn present(&mut self, frame: &FrameView<'_>) -> Flow;
}

/// Presenter for runs without a window.
///
/// Never quits unless a tick limit is set, in which case it quits once an
/// episode reaches the limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPresenter {
    /// Optional maximum number of ticks per episode.
    pub tick_limit: Option<u64>,
}

impl HeadlessPresenter {
    /// Presenter that never stops an episode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Presenter that quits after `limit` ticks of a single episode.
    pub fn with_tick_limit(limit: u64) -> Self {
        Self {
            tick_limit: Some(limit),
        }
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, frame: &FrameView<'_>) -> Flow {
        match self.tick_limit {
            Some(limit) if frame.tick >= limit => Flow::Quit,
            _ => Flow::Continue,
        }
    }
}

/// One generation's vehicles, advanced a tick at a time.
#[derive(Debug, Clone)]
pub struct Episode {
    vehicles: Vec<Vehicle>,
    active: Vec<bool>,
    ticks: u64,
}

impl Episode {
    /// Spawns `population_size` vehicles at the starting pose.
    pub fn new(params: &Params, track: &Track, population_size: usize) -> Self {
        Self {
            vehicles: (0..population_size)
                .map(|_| Vehicle::new(params, track))
                .collect(),
            active: vec![true; population_size],
            ticks: 0,
        }
    }

    /// Vehicles in population order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Number of vehicles that have not crashed.
    pub fn alive_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.is_alive()).count()
    }

    /// Ticks in which at least one vehicle moved.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns `true` once every vehicle has crashed.
    pub fn is_finished(&self) -> bool {
        self.alive_count() == 0
    }

    /// Advances every live vehicle by one tick.
    ///
    /// Each live vehicle asks its member's controller for a decision, moves,
    /// checks for a crash, re-casts its sensors, and then adds its total
    /// distance to the member's fitness.
    ///
    /// # Returns
    ///
    /// The number of vehicles alive at the start of the tick, or `None` if
    /// none was and the episode is over.
    pub fn step(&mut self, track: &Track, members: &mut [Member<'_>]) -> Option<usize> {
        debug_assert_eq!(self.vehicles.len(), members.len());

        for (was_alive, vehicle) in self.active.iter_mut().zip(&self.vehicles) {
            *was_alive = vehicle.is_alive();
        }
        let alive = self.active.iter().filter(|&&a| a).count();
        if alive == 0 {
            return None;
        }

        for ((vehicle, member), &was_alive) in self
            .vehicles
            .iter_mut()
            .zip(members.iter_mut())
            .zip(&self.active)
        {
            if !was_alive {
                continue;
            }
            let decision = member.controller.decide(&vehicle.sensor_distances());
            vehicle.tick(decision, track);
            *member.fitness += vehicle.distance_traveled;
        }

        self.ticks += 1;
        Some(alive)
    }

    /// Runs one tick and describes it, or returns `None` once the episode is over.
    pub fn advance(
        &mut self,
        track: &Track,
        members: &mut [Member<'_>],
        generation: u32,
    ) -> Option<FrameView<'_>> {
        self.step(track, members)?;
        Some(self.frame(generation))
    }

    /// Frame description of the tick just completed.
    ///
    /// Before the first tick every vehicle counts as active.
    pub fn frame(&self, generation: u32) -> FrameView<'_> {
        FrameView {
            generation,
            tick: self.ticks,
            alive: self.active.iter().filter(|&&a| a).count(),
            vehicles: &self.vehicles,
            active: &self.active,
        }
    }
}

/// Result of evaluating one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Ticks in which at least one vehicle moved.
    pub ticks: u64,
    /// [`Flow::Quit`] if the presenter asked to stop.
    pub flow: Flow,
}

/// Evaluates a population for one generation.
///
/// Runs until every vehicle has crashed or the presenter asks to quit. An
/// empty population returns at once without running a tick.
///
/// # Arguments
///
/// * `track` - Pristine track raster used for collisions and sensing
/// * `params` - Simulation parameters
/// * `members` - Controllers and their fitness accumulators
/// * `generation` - Generation number, used only for display
/// * `presenter` - Called once per tick after all vehicles moved
///
/// # Returns
///
/// The tick count and whether the presenter requested to quit.
pub fn evaluate<P: Presenter + ?Sized>(
    track: &Track,
    params: &Params,
    members: &mut [Member<'_>],
    generation: u32,
    presenter: &mut P,
) -> Evaluation {
    let mut episode = Episode::new(params, track, members.len());

    while let Some(frame) = episode.advance(track, members, generation) {
        if presenter.present(&frame) == Flow::Quit {
            log::debug!("Generation {} stopped after {} ticks", generation, frame.tick);
            return Evaluation {
                ticks: frame.tick,
                flow: Flow::Quit,
            };
        }
    }

    log::debug!(
        "Generation {} finished after {} ticks",
        generation,
        episode.ticks()
    );
    Evaluation {
        ticks: episode.ticks(),
        flow: Flow::Continue,
    }
}

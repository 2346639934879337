#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use std::cell::Cell;

use evodrive::simulation::controller::Decision;
use evodrive::simulation::evaluator::{
    Episode, Flow, FrameView, HeadlessPresenter, Member, Presenter, evaluate,
};
use evodrive::simulation::params::Params;
use evodrive::simulation::track::Track;
use macroquad::prelude::{BLACK, Image, WHITE};

/// Straight vertical corridor: drivable for 50 <= x <= 150 and y < 900.
fn corridor_track() -> Track {
    let mut image = Image::gen_image_color(200, 1000, WHITE);
    for y in 0..900 {
        for x in 50..=150 {
            image.set_pixel(x, y, BLACK);
        }
    }
    Track::from_image(image)
}

fn create_test_params() -> Params {
    Params {
        start_position: [100, 100],
        step_distance: 30.0,
        ..Params::default()
    }
}

fn straight(_: &[f64; 3]) -> Decision {
    Decision::GoStraight
}

/// Records what every tick looked like.
#[derive(Default)]
struct RecordingPresenter {
    frames: Vec<(u32, u64, usize, Vec<f64>)>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, frame: &FrameView<'_>) -> Flow {
        let distances = frame.vehicles.iter().map(|v| v.distance_traveled).collect();
        self.frames
            .push((frame.generation, frame.tick, frame.alive, distances));
        Flow::Continue
    }
}

#[test]
fn test_straight_driver_fitness() {
    let track = corridor_track();
    let params = create_test_params();
    let mut fitness = 0.0;
    let mut presenter = RecordingPresenter::default();

    let evaluation = {
        let mut members = vec![Member::new(&straight, &mut fitness)];
        evaluate(&track, &params, &mut members, 1, &mut presenter)
    };

    // center 880 puts the front corners at y = 905
    assert_eq!(evaluation.flow, Flow::Continue);
    assert_eq!(evaluation.ticks, 26);
    assert_eq!(fitness, 30.0 * (26.0 * 27.0 / 2.0));

    // distance grows linearly, one step per tick
    assert_eq!(presenter.frames.len(), 26);
    for (i, (generation, tick, alive, distances)) in presenter.frames.iter().enumerate() {
        assert_eq!(*generation, 1);
        assert_eq!(*tick, i as u64 + 1);
        assert_eq!(*alive, 1);
        assert_eq!(distances[0], 30.0 * (i as f64 + 1.0));
    }
}

#[test]
fn test_fitness_is_cumulative_per_tick() {
    let track = corridor_track();
    let params = create_test_params();

    let decisions = Cell::new(0u32);
    let weaving = |sensors: &[f64; 3]| {
        decisions.set(decisions.get() + 1);
        if sensors[0] > sensors[2] {
            Decision::TurnRight
        } else {
            Decision::TurnLeft
        }
    };

    let mut straight_fitness = 0.0;
    let mut weaving_fitness = 0.0;
    let evaluation = {
        let mut members = vec![
            Member::new(&straight, &mut straight_fitness),
            Member::new(&weaving, &mut weaving_fitness),
        ];
        evaluate(
            &track,
            &params,
            &mut members,
            4,
            &mut HeadlessPresenter::new(),
        )
    };

    // a vehicle alive for n ticks earns step * (1 + 2 + ... + n)
    let n = f64::from(decisions.get());
    assert!(n >= 1.0);
    assert_eq!(weaving_fitness, 30.0 * n * (n + 1.0) / 2.0);
    assert_eq!(straight_fitness, 30.0 * (26.0 * 27.0 / 2.0));
    assert_eq!(evaluation.ticks, 26.max(decisions.get() as u64));
}

#[test]
fn test_everyone_starts_on_boundary() {
    let track = Track::from_image(Image::gen_image_color(50, 50, WHITE));
    let params = Params {
        start_position: [25, 25],
        ..create_test_params()
    };

    let mut fitness = [0.0; 3];
    let mut presenter = RecordingPresenter::default();
    let evaluation = {
        let mut members: Vec<Member<'_>> = fitness
            .iter_mut()
            .map(|slot| Member::new(&straight, slot))
            .collect();
        evaluate(&track, &params, &mut members, 9, &mut presenter)
    };

    assert_eq!(evaluation.ticks, 1);
    assert_eq!(evaluation.flow, Flow::Continue);
    assert_eq!(fitness, [30.0; 3]);
    assert_eq!(presenter.frames.len(), 1);
    assert_eq!(presenter.frames[0].2, 3);
}

#[test]
fn test_evaluator_only_adds_to_fitness() {
    let track = Track::from_image(Image::gen_image_color(50, 50, WHITE));
    let params = Params {
        start_position: [25, 25],
        ..create_test_params()
    };

    let mut fitness = 5.0;
    {
        let mut members = vec![Member::new(&straight, &mut fitness)];
        evaluate(
            &track,
            &params,
            &mut members,
            1,
            &mut HeadlessPresenter::new(),
        );
    }

    assert_eq!(fitness, 35.0);
}

#[test]
fn test_empty_population_is_noop() {
    let track = corridor_track();
    let params = create_test_params();
    let mut presenter = RecordingPresenter::default();

    let evaluation = evaluate(&track, &params, &mut [], 1, &mut presenter);

    assert_eq!(evaluation.ticks, 0);
    assert_eq!(evaluation.flow, Flow::Continue);
    assert!(presenter.frames.is_empty());
}

#[test]
fn test_presenter_quit_stops_episode() {
    let track = corridor_track();
    let params = create_test_params();
    let mut fitness = 0.0;

    let evaluation = {
        let mut members = vec![Member::new(&straight, &mut fitness)];
        evaluate(
            &track,
            &params,
            &mut members,
            1,
            &mut HeadlessPresenter::with_tick_limit(3),
        )
    };

    assert_eq!(evaluation.flow, Flow::Quit);
    assert_eq!(evaluation.ticks, 3);
    assert_eq!(fitness, 30.0 + 60.0 + 90.0);
}

#[test]
fn test_episode_steps() {
    let track = corridor_track();
    let params = create_test_params();
    let mut fitness = [0.0; 2];

    let mut members: Vec<Member<'_>> = fitness
        .iter_mut()
        .map(|slot| Member::new(&straight, slot))
        .collect();
    let mut episode = Episode::new(&params, &track, members.len());

    assert_eq!(episode.vehicles().len(), 2);
    assert_eq!(episode.alive_count(), 2);
    assert_eq!(episode.ticks(), 0);
    assert!(!episode.is_finished());

    assert_eq!(episode.step(&track, &mut members), Some(2));
    assert_eq!(episode.ticks(), 1);

    let frame = episode.frame(7);
    assert_eq!(frame.generation, 7);
    assert_eq!(frame.tick, 1);
    assert_eq!(frame.alive, 2);
    assert_eq!(frame.vehicles[0].distance_traveled, 30.0);

    let mut steps = 1;
    while episode.step(&track, &mut members).is_some() {
        steps += 1;
    }
    assert_eq!(steps, 26);
    assert!(episode.is_finished());
    assert_eq!(episode.step(&track, &mut members), None);
    assert_eq!(episode.ticks(), 26);
}

/// Counts, per tick, the vehicles a renderer would draw and how many of them crashed.
#[derive(Default)]
struct ActivePresenter {
    frames: Vec<(usize, usize, usize)>,
}

impl Presenter for ActivePresenter {
    fn present(&mut self, frame: &FrameView<'_>) -> Flow {
        let drawn = frame.active_vehicles().count();
        let crashed = frame.active_vehicles().filter(|v| v.crashed).count();
        self.frames.push((frame.alive, drawn, crashed));
        Flow::Continue
    }
}

#[test]
fn test_frame_keeps_cars_that_crashed_this_tick() {
    let track = Track::from_image(Image::gen_image_color(50, 50, WHITE));
    let params = Params {
        start_position: [25, 25],
        ..create_test_params()
    };

    let mut fitness = [0.0; 3];
    let mut presenter = ActivePresenter::default();
    {
        let mut members: Vec<Member<'_>> = fitness
            .iter_mut()
            .map(|slot| Member::new(&straight, slot))
            .collect();
        evaluate(&track, &params, &mut members, 1, &mut presenter);
    }

    // all three crash in the only tick but are still shown in it
    assert_eq!(presenter.frames, vec![(3, 3, 3)]);
}

#[test]
fn test_active_vehicles_match_alive_count() {
    let track = corridor_track();
    let params = create_test_params();
    let mut presenter = ActivePresenter::default();

    let mut fitness = 0.0;
    {
        let mut members = vec![Member::new(&straight, &mut fitness)];
        evaluate(&track, &params, &mut members, 1, &mut presenter);
    }

    assert_eq!(presenter.frames.len(), 26);
    for (alive, drawn, _) in &presenter.frames {
        assert_eq!(alive, drawn);
    }
    assert_eq!(presenter.frames[24], (1, 1, 0));
    assert_eq!(presenter.frames[25], (1, 1, 1));
}

#[test]
fn test_fresh_episode_frame_shows_every_car() {
    let track = corridor_track();
    let params = create_test_params();
    let episode = Episode::new(&params, &track, 4);

    let frame = episode.frame(3);
    assert_eq!(frame.tick, 0);
    assert_eq!(frame.alive, 4);
    assert_eq!(frame.active_vehicles().count(), 4);
}

#[test]
fn test_advance_matches_evaluate() {
    let track = corridor_track();
    let params = create_test_params();
    let turn_left = |sensors: &[f64; 3]| {
        if sensors[1] < 200.0 {
            Decision::TurnLeft
        } else {
            Decision::GoStraight
        }
    };

    let mut evaluated = [0.0; 2];
    let evaluation = {
        let mut members = vec![];
        let (first, second) = evaluated.split_at_mut(1);
        members.push(Member::new(&straight, &mut first[0]));
        members.push(Member::new(&turn_left, &mut second[0]));
        evaluate(&track, &params, &mut members, 2, &mut HeadlessPresenter::new())
    };

    let mut advanced = [0.0; 2];
    let mut ticks = 0;
    {
        let (first, second) = advanced.split_at_mut(1);
        let mut members = vec![
            Member::new(&straight, &mut first[0]),
            Member::new(&turn_left, &mut second[0]),
        ];
        let mut episode = Episode::new(&params, &track, members.len());
        while let Some(frame) = episode.advance(&track, &mut members, 2) {
            assert_eq!(frame.generation, 2);
            ticks = frame.tick;
        }
        assert!(episode.is_finished());
    }

    assert_eq!(evaluation.ticks, ticks);
    assert_eq!(evaluated, advanced);
}

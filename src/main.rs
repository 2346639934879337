//! Window front end: loads the assets and settings, then evolves drivers on
//! screen one generation after another.

use anyhow::{Context, anyhow};
use macroquad::prelude::*;

use evodrive::graphics::{self, Scene, TickPacer};
use evodrive::simulation::evaluator::Episode;
use evodrive::simulation::evolution::{self, Population};
use evodrive::simulation::params::Params;
use evodrive::simulation::track::Track;

const SETTINGS_PATH: &str = "settings.json";

fn window_conf() -> Conf {
    Conf {
        window_title: "Self Driving Car Simulator".to_owned(),
        window_width: graphics::DISPLAY_WIDTH,
        window_height: graphics::DISPLAY_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        log::error!("{:#}", err);
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let params = Params::load_or_default(SETTINGS_PATH).context("failed to load settings")?;
    params.validate()?;

    let track = Track::load(&params.track_path).context("failed to load track")?;
    let car = load_texture(&params.car_sprite_path)
        .await
        .map_err(|e| anyhow!("failed to load car sprite {}: {:?}", params.car_sprite_path, e))?;
    let scene = Scene::new(&track, car, &params);

    prevent_quit();

    let mut population = Population::new(&params);
    let mut rng = ::rand::rng();

    log::info!(
        "Starting evolution: {} cars, {} generations",
        params.population_size,
        params.generations
    );

    let mut best_fitness = f64::NEG_INFINITY;

    for _ in 0..params.generations {
        let generation = population.begin_generation();

        let ticks = {
            let mut members = population.members();
            let mut episode = Episode::new(&params, &track, members.len());
            let mut pacer = TickPacer::new(params.tick_rate);

            loop {
                if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
                    log::info!("Quit requested during generation {}", generation);
                    std::process::exit(0);
                }

                if pacer.ready(get_frame_time())
                    && episode.advance(&track, &mut members, generation).is_none()
                {
                    break;
                }

                scene.draw(&episode.frame(generation));
                next_frame().await;
            }

            episode.ticks()
        };

        let report = population.report(ticks);
        evolution::log_report(&report);
        best_fitness = best_fitness.max(report.best);
        population.evolve(&params, &mut rng);
    }

    log::info!("Evolution finished, best fitness {:.1}", best_fitness);
    Ok(())
}

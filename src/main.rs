use clap::Parser;
use savanna_sim::checkpoint;
use savanna_sim::config::Config;
use savanna_sim::session::SessionManager;
use savanna_sim::simulation::Simulation;
use savanna_sim::species::{AnimalCatalog, SpeciesRegistry};
use std::path::Path;
use std::sync::Arc;
use tokio::time::{interval, Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "savanna-sim")]
#[command(about = "Headless savanna animal simulation", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Species catalog; written with the built-in species when missing.
    #[arg(short, long, default_value = "animals.json")]
    animals: String,

    /// Directory of extra species catalogs.
    #[arg(short, long, default_value = "plugins")]
    plugins: String,

    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,

    #[arg(long)]
    sessions: Option<usize>,

    #[arg(long)]
    no_checkpoint: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = if Path::new(&args.config).exists() {
        log::info!("Loading config from: {}", args.config);
        Config::load_from_file(&args.config)?
    } else {
        log::info!("Config file not found, using defaults and saving to: {}", args.config);
        let config = Config::default();
        config.save_to_file(&args.config)?;
        config
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(count) = args.sessions {
        config.sessions.count = count;
    }
    let checkpoints_on = !args.no_checkpoint && config.checkpoint.enabled;

    let registry = Arc::new(load_registry(&args.animals, &args.plugins)?);
    log::info!(
        "Species available: {}",
        registry.ids().collect::<Vec<_>>().join(", ")
    );

    let manager = SessionManager::new(config.clone(), registry.clone());
    for index in 0..config.sessions.count.max(1) {
        let id = format!("{}-{}", config.sessions.id_prefix, index);
        let resumed = if checkpoints_on {
            match checkpoint::load_checkpoint(&config.checkpoint, &id) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::error!("Failed to load checkpoint for {}: {}", id, e);
                    None
                }
            }
        } else {
            None
        };

        match resumed {
            Some(snapshot) => {
                let mut simulation = Simulation::new(&config, registry.clone());
                simulation.restore(&snapshot);
                log::info!("Session {} resumed from checkpoint at tick {}", id, snapshot.tick_count);
                manager.insert(&id, simulation)?;
            }
            None => {
                manager.get_or_create(&id)?;
            }
        }
    }

    run_simulation(&manager, &config, args.ticks, checkpoints_on).await?;

    if checkpoints_on {
        save_all(&manager, &config);
    }

    Ok(())
}

/// The species catalog file first, then every plugin fragment.
fn load_registry(animals: &str, plugins: &str) -> Result<SpeciesRegistry, Box<dyn std::error::Error>> {
    let catalog = if Path::new(animals).exists() {
        log::info!("Loading species from: {}", animals);
        AnimalCatalog::load_from_file(animals)?
    } else {
        log::info!("Species file not found, saving built-in species to: {}", animals);
        let catalog = AnimalCatalog::builtin();
        catalog.save_to_file(animals)?;
        catalog
    };

    let mut registry = SpeciesRegistry::new();
    registry.extend_from_catalog(&catalog, animals);
    let added = registry.load_plugins(plugins);
    if added > 0 {
        log::info!("Loaded {} species from {}", added, plugins);
    }

    Ok(registry)
}

async fn run_simulation(
    manager: &SessionManager,
    config: &Config,
    max_ticks: Option<u64>,
    checkpoints_on: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tick_interval = interval(config.simulation.tick_period());

    let checkpoint_interval = if checkpoints_on {
        Some(Duration::from_secs(config.checkpoint.interval_seconds))
    } else {
        None
    };
    let mut last_checkpoint = Instant::now();
    let log_every = config.simulation.log_interval_ticks.max(1);
    let mut ticks_run: u64 = 0;

    loop {
        tick_interval.tick().await;

        for (id, result) in manager.update_all()? {
            match result {
                Ok(outcome) if outcome.grid_full => {
                    log::debug!("Session {} ran out of room this tick", id);
                }
                Ok(_) => {}
                Err(e) => log::error!("Session {} failed to tick: {}", id, e),
            }
        }
        ticks_run += 1;

        if ticks_run % log_every == 0 {
            let mut living = 0;
            for id in manager.active_ids()? {
                let metrics = manager.with_session(&id, |sim| sim.metrics())?;
                log::info!(
                    "[{}] Tick: {} | Population: {} | {} | Avg Health: {:.2} | Births: {} | Deaths: {}",
                    id,
                    metrics.tick,
                    metrics.population,
                    metrics.species_summary(),
                    metrics.avg_health,
                    metrics.total_births,
                    metrics.total_deaths
                );
                living += metrics.population;
            }

            if living == 0 {
                log::warn!("All animals have died! Simulation ended.");
                break;
            }
        }

        if let Some(checkpoint_dur) = checkpoint_interval {
            if last_checkpoint.elapsed() >= checkpoint_dur {
                save_all(manager, config);
                last_checkpoint = Instant::now();
            }
        }

        if max_ticks.map_or(false, |limit| ticks_run >= limit) {
            log::info!("Reached {} ticks, stopping", ticks_run);
            break;
        }
    }

    Ok(())
}

fn save_all(manager: &SessionManager, config: &Config) {
    let ids = match manager.active_ids() {
        Ok(ids) => ids,
        Err(e) => {
            log::error!("Failed to list sessions: {}", e);
            return;
        }
    };

    for id in ids {
        let snapshot = match manager.with_session(&id, |sim| sim.snapshot()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Failed to snapshot session {}: {}", id, e);
                continue;
            }
        };
        match checkpoint::save_checkpoint(&snapshot, &config.checkpoint, &id) {
            Ok(path) => log::info!("Checkpoint saved: {}", path),
            Err(e) => log::error!("Failed to save checkpoint: {}", e),
        }
    }
}

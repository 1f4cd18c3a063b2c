use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use log::info;
use quadgrav::{
    bodies::{uniform_cloud, Bodies},
    config::{SimulationConfig, SolverKind},
    gravity::Gravity,
    BarnesHut, BruteForce, ForceSolver, Simulation,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SolverArg {
    Brute,
    BarnesHut,
}

impl From<SolverArg> for SolverKind {
    fn from(arg: SolverArg) -> Self {
        match arg {
            SolverArg::Brute => SolverKind::BruteForce,
            SolverArg::BarnesHut => SolverKind::BarnesHut,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Gravitational N-body simulation")]
struct Args {
    /// Number of bodies to simulate.
    #[arg(short, long, default_value_t = 1000)]
    num_bodies: usize,

    /// Number of time steps to run.
    #[arg(short, long, default_value_t = 1000)]
    steps: usize,

    /// Fixed time step.
    #[arg(long, default_value_t = 1e-3)]
    dt: f64,

    /// Force resolution strategy.
    #[arg(long, value_enum, default_value_t = SolverArg::BarnesHut)]
    solver: SolverArg,

    /// Barnes-Hut approximation threshold.
    #[arg(long, default_value_t = 0.5)]
    theta: f64,

    /// Softening length for close encounters.
    #[arg(long, default_value_t = 0.)]
    epsilon: f64,

    /// Gravitational constant.
    #[arg(short, long, default_value_t = quadgrav::gravity::G)]
    g: f64,

    /// Side length of the cube bodies are initialized in.
    #[arg(long, default_value_t = 1000.)]
    world_size: f64,

    /// Upper bound of the initial velocity components.
    #[arg(long, default_value_t = 100.)]
    velocity_scale: f64,

    /// Upper bound of the initial masses.
    #[arg(long, default_value_t = 1000.)]
    mass_scale: f64,

    /// RNG seed for the initial conditions.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Worker threads for the compute phase (default: one per core).
    #[arg(short, long)]
    threads: Option<usize>,

    /// How many bodies to print from each end of the store.
    #[arg(long, default_value_t = 10)]
    sample: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let args = Args::parse();
    let config = SimulationConfig {
        num_bodies: args.num_bodies,
        constant: args.g,
        softening: args.epsilon,
        time_step: args.dt,
        num_steps: args.steps,
        theta: args.theta,
        world_size: args.world_size,
        velocity_scale: args.velocity_scale,
        mass_scale: args.mass_scale,
        solver: args.solver.into(),
        seed: args.seed,
    };
    config.validate()?;

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    info!(
        "simulating {} bodies for {} steps ({:?} solver)",
        config.num_bodies, config.num_steps, config.solver
    );

    let bodies = uniform_cloud(&config);
    let gravity = Gravity::new(config.constant, config.softening);
    let bodies = match config.solver {
        SolverKind::BruteForce => run(bodies, BruteForce::new(gravity), &config),
        SolverKind::BarnesHut => run(bodies, BarnesHut::new(gravity, config.theta), &config),
    };

    report(&bodies, args.sample);
    Ok(())
}

fn run<S: ForceSolver>(bodies: Bodies, solver: S, config: &SimulationConfig) -> Bodies {
    let mut simulation = Simulation::new(bodies, solver, config.time_step).parallel();
    simulation.run(config.num_steps);
    simulation.bodies().clone()
}

fn report(bodies: &Bodies, sample: usize) {
    let sample = sample.min(bodies.len());

    println!("First {sample} bodies after simulation:");
    for i in 0..sample {
        print_body(bodies, i);
    }

    println!("\nLast {sample} bodies after simulation:");
    for i in (bodies.len() - sample)..bodies.len() {
        print_body(bodies, i);
    }
}

fn print_body(bodies: &Bodies, i: usize) {
    let p = bodies.positions[i];
    let v = bodies.velocities[i];
    println!(
        "Body {i}: Pos({:.2}, {:.2}, {:.2}) Vel({:.2}, {:.2}, {:.2}) Mass: {:.2}",
        p[0], p[1], p[2], v[0], v[1], v[2], bodies.masses[i]
    );
}

use clap::Parser;
use std::process::ExitCode;
use tick_scheduler::{
    console::ConsoleView,
    csv_log::{self, CsvLogger},
    logging,
    scheduler::ProcessRunner,
    Cli, FifoScheduler, PidAllocator, PolicyKind, Process, RoundRobinScheduler, RunSummary,
    Scheduler, SimConfig, Simulation, TickObserver, WorkloadGenerator,
};
use tracing::{info, warn};

fn main() -> ExitCode {
    logging::init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> tick_scheduler::Result<()> {
    let config = Cli::parse().into_config()?;

    let mut pids = PidAllocator::new();
    let mut generator = match config.seed {
        Some(seed) => WorkloadGenerator::seeded(config.cpu_bound_percent, seed),
        None => WorkloadGenerator::new(config.cpu_bound_percent),
    };
    let workload = generator.generate(config.processes, &mut pids);
    info!(
        processes = workload.len(),
        io_bound_percent = config.io_bound_percent(),
        "workload generated"
    );

    let summary = match config.policy {
        PolicyKind::Fifo => simulate(FifoScheduler::new(), workload, &config)?,
        PolicyKind::RoundRobin => {
            simulate(RoundRobinScheduler::with_quantum(config.quantum), workload, &config)?
        }
    };

    println!();
    println!("{summary}");
    if let Some(base) = &config.csv_base {
        let (ticks, processes) = csv_log::log_paths(base);
        println!("Logs written to {} and {}", ticks.display(), processes.display());
    }
    Ok(())
}

fn simulate<S: Scheduler>(
    scheduler: S,
    workload: Vec<Process>,
    config: &SimConfig,
) -> tick_scheduler::Result<RunSummary> {
    let simulation = Simulation::with_processes(scheduler, workload);
    println!("Scheduler: {}", simulation.scheduler().name());

    if config.step_mode {
        run_interactive(simulation, config)
    } else {
        Ok(run_continuous(simulation, config))
    }
}

fn run_interactive<S: Scheduler>(
    simulation: Simulation<S>,
    config: &SimConfig,
) -> tick_scheduler::Result<RunSummary> {
    let mut runner = ProcessRunner::new(simulation)?;
    if let Some(logger) = config.csv_base.as_deref().and_then(CsvLogger::open_or_warn) {
        runner = runner.with_observer(Box::new(logger));
    }

    while runner.run()? {}

    // Dropping the runner restores the terminal before the summary is printed.
    let simulation = runner.into_simulation();
    Ok(simulation.summary())
}

fn run_continuous<S: Scheduler>(mut simulation: Simulation<S>, config: &SimConfig) -> RunSummary {
    let mut view = ConsoleView::stdout(config.clear_screen, config.progress_bars, config.bar_width);
    let mut logger = config.csv_base.as_deref().and_then(CsvLogger::open_or_warn);

    while simulation.step() {
        let render = config.renders_at(simulation.clock());
        if !render && logger.is_none() {
            continue;
        }

        let snapshot = simulation.snapshot();
        if let Some(logger) = logger.as_mut() {
            logger.observe(&snapshot);
        }
        if render {
            view.observe(&snapshot);
        }
    }

    if let Some(logger) = logger {
        if let Err(err) = logger.finish() {
            warn!(error = %err, "failed to flush csv logs");
        }
    }
    simulation.summary()
}

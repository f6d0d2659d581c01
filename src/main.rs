use katamari_solver::config::{Cli, Config};
use katamari_solver::scenario::{create_file, write_solutions_to_file, Scenario};
use katamari_solver::solver::solve;

use anyhow::{ensure, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{BufWriter, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("failed to read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if cli.config.is_none() {
        info!("No config file specified, using default config");
    }

    let scenarios = load_scenarios(&config)?;
    info!(
        "Solving {} scenarios with the {} solver",
        scenarios.len(),
        config.solver.solver.name()
    );

    let mut stats_writer = config
        .stats_path
        .as_ref()
        .map(|path| {
            create_file(path)
                .map(BufWriter::new)
                .with_context(|| format!("failed to create stats file: {path}"))
        })
        .transpose()?;

    let mut solutions = Vec::with_capacity(scenarios.len());
    for (case, scenario) in scenarios.iter().enumerate() {
        let catalog = scenario.catalog();
        let (solution, stats) = solve(&catalog, scenario.initial_weight, &config.solver)
            .with_context(|| format!("failed to solve scenario {}", case + 1))?;
        ensure!(
            solution.verify(&catalog, scenario.initial_weight, config.solver.start),
            "scenario {}: solver produced an invalid path {:?}",
            case + 1,
            solution.path
        );

        stats.print();
        if let Some(writer) = stats_writer.as_mut() {
            writeln!(writer, "{}", stats.to_json_line()?)?;
        }
        solutions.push(solution);
    }

    if let Some(writer) = stats_writer.as_mut() {
        writer.flush()?;
    }

    write_solutions_to_file(&config.output_path, &solutions)?;
    info!("Results written to {}", config.output_path);

    Ok(())
}

fn load_scenarios(config: &Config) -> anyhow::Result<Vec<Scenario>> {
    if config.random.scenarios > 0 {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let random = &config.random;
        let scenarios: Vec<Scenario> = (0..random.scenarios)
            .map(|_| {
                Scenario::generate_randomly(
                    random.objects,
                    random.extent,
                    random.max_weight,
                    random.initial_weight,
                    &mut rng,
                )
            })
            .collect();
        if let Some(dump_path) = &random.dump_path {
            Scenario::write_to_yaml(dump_path, &scenarios)?;
        }
        return Ok(scenarios);
    }

    if config.input_path.ends_with(".yaml") || config.input_path.ends_with(".yml") {
        Scenario::load_from_yaml(&config.input_path)
    } else {
        Scenario::load_from_file(&config.input_path)
    }
}

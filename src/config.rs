use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::common::{Position, ORIGIN};

#[derive(Parser, Debug, Default)]
#[command(
    name = "Katamari solver",
    about = "Plans which objects a growing ball should eat, heaviest result first, fastest second.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the scenario file")]
    pub input_path: Option<String>,

    #[arg(long, help = "Path to the output file")]
    pub output_path: Option<String>,

    #[arg(long, help = "Path to a JSON-lines file receiving per-scenario stats")]
    pub stats_path: Option<String>,

    #[arg(long, value_enum, help = "Solver to use")]
    pub solver: Option<SolverKind>,

    #[arg(long, help = "Greedy: candidates evaluated per step")]
    pub top_k: Option<usize>,

    #[arg(long, help = "Greedy: lookahead depth")]
    pub depth: Option<usize>,

    #[arg(long, help = "Greedy: discount applied to future scores")]
    pub discount: Option<f64>,

    #[arg(long, help = "Exact: give up once this many states are recorded")]
    pub max_states: Option<usize>,

    #[arg(long, help = "Exact: give up after this many milliseconds")]
    pub time_limit_ms: Option<u64>,

    #[arg(
        long,
        help = "Exact: also prune children whose free-travel weight bound cannot beat the best",
        default_value_t = false
    )]
    pub upper_bound_pruning: bool,

    #[arg(long, help = "Generate this many random scenarios instead of reading input")]
    pub random_scenarios: Option<usize>,

    #[arg(long, help = "Objects per random scenario")]
    pub random_objects: Option<usize>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Default log filter when RUST_LOG is unset")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    Exact,
    Greedy,
    Auto,
}

impl SolverKind {
    pub fn name(&self) -> &'static str {
        match self {
            SolverKind::Exact => "exact",
            SolverKind::Greedy => "greedy",
            SolverKind::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    pub max_states: Option<usize>,
    pub time_limit_ms: Option<u64>,
    pub upper_bound_pruning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreedyConfig {
    pub top_k: usize,
    pub depth: usize,
    pub discount: f64,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        GreedyConfig {
            top_k: 3,
            depth: 3,
            discount: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub solver: SolverKind,
    pub start: Position,
    pub exact: ExactConfig,
    pub greedy: GreedyConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            solver: SolverKind::Greedy,
            start: ORIGIN,
            exact: ExactConfig::default(),
            greedy: GreedyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    pub scenarios: usize,
    pub objects: usize,
    pub extent: i64,
    pub max_weight: u64,
    pub initial_weight: u64,
    pub dump_path: Option<String>,
}

impl Default for RandomConfig {
    fn default() -> Self {
        RandomConfig {
            scenarios: 0,
            objects: 12,
            extent: 20,
            max_weight: 50,
            initial_weight: 3,
            dump_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_path: String,
    pub output_path: String,
    pub stats_path: Option<String>,
    pub seed: u64,
    pub log_level: String,
    pub random: RandomConfig,
    #[serde(flatten)]
    pub solver: SolverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: "input/K1.in".to_string(),
            output_path: "result/K1.out".to_string(),
            stats_path: None,
            seed: 0,
            log_level: "info".to_string(),
            random: RandomConfig::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: Config =
            serde_yaml::from_str(yaml).context("failed to parse YAML config")?;
        Ok(config)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(input_path) = &cli.input_path {
            self.input_path = input_path.clone();
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = output_path.clone();
        }
        if cli.stats_path.is_some() {
            self.stats_path = cli.stats_path.clone();
        }
        if let Some(solver) = cli.solver {
            self.solver.solver = solver;
        }
        if let Some(top_k) = cli.top_k {
            self.solver.greedy.top_k = top_k;
        }
        if let Some(depth) = cli.depth {
            self.solver.greedy.depth = depth;
        }
        if let Some(discount) = cli.discount {
            self.solver.greedy.discount = discount;
        }
        if cli.max_states.is_some() {
            self.solver.exact.max_states = cli.max_states;
        }
        if cli.time_limit_ms.is_some() {
            self.solver.exact.time_limit_ms = cli.time_limit_ms;
        }
        if cli.upper_bound_pruning {
            self.solver.exact.upper_bound_pruning = true;
        }
        if let Some(scenarios) = cli.random_scenarios {
            self.random.scenarios = scenarios;
        }
        if let Some(objects) = cli.random_objects {
            self.random.objects = objects;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let greedy = &self.solver.greedy;
        if greedy.top_k == 0 {
            return Err(anyhow!("Greedy top_k must be at least 1"));
        }
        if !(0.0..=1.0).contains(&greedy.discount) {
            return Err(anyhow!(
                "Greedy discount must be within [0, 1], got {}",
                greedy.discount
            ));
        }
        if self.solver.exact.max_states == Some(0) {
            return Err(anyhow!("Exact max_states must be at least 1"));
        }
        if self.random.scenarios > 0 {
            if self.random.extent < 0 {
                return Err(anyhow!(
                    "Random extent must not be negative, got {}",
                    self.random.extent
                ));
            }
            if self.random.max_weight == 0 {
                return Err(anyhow!("Random max_weight must be at least 1"));
            }
        }
        Ok(())
    }
}

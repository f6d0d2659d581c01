use anyhow::{anyhow, Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::catalog::{Catalog, Object};
use crate::common::Solution;

/// One puzzle: the objects on the grid and the weight the ball starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub initial_weight: u64,
    pub objects: Vec<Object>,
}

impl Scenario {
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.objects.clone())
    }

    /// Read every scenario of a plain-text file: `T`, then per scenario
    /// `n W` followed by `n` lines of `x y w`.
    pub fn load_from_file(path: &str) -> Result<Vec<Scenario>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {path}"))?;
        Self::parse_all(&content).with_context(|| format!("malformed scenario file {path}"))
    }

    pub fn parse_all(content: &str) -> Result<Vec<Scenario>> {
        let mut tokens = content.split_whitespace();
        let count: usize = next_token(&mut tokens, "scenario count")?;

        let mut scenarios = Vec::new();
        for case in 0..count {
            let scenario = Self::parse_one(&mut tokens)
                .with_context(|| format!("in scenario {}", case + 1))?;
            scenarios.push(scenario);
        }

        if let Some(extra) = tokens.next() {
            return Err(anyhow!("unexpected trailing token {extra:?}"));
        }
        Ok(scenarios)
    }

    fn parse_one<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<Scenario> {
        let num_objects: usize = next_token(tokens, "object count")?;
        let initial_weight: u64 = next_token(tokens, "initial weight")?;

        let mut objects = Vec::new();
        for index in 0..num_objects {
            let x = next_token(tokens, "x")
                .with_context(|| format!("object {index}"))?;
            let y = next_token(tokens, "y")
                .with_context(|| format!("object {index}"))?;
            let weight = next_token(tokens, "weight")
                .with_context(|| format!("object {index}"))?;
            objects.push(Object::new(x, y, weight));
        }

        Ok(Scenario {
            initial_weight,
            objects,
        })
    }

    pub fn generate_randomly<R: Rng + ?Sized>(
        num_objects: usize,
        extent: i64,
        max_weight: u64,
        initial_weight: u64,
        rng: &mut R,
    ) -> Scenario {
        let objects = (0..num_objects)
            .map(|_| {
                Object::new(
                    rng.gen_range(-extent..=extent),
                    rng.gen_range(-extent..=extent),
                    rng.gen_range(1..=max_weight),
                )
            })
            .collect();

        let scenario = Scenario {
            initial_weight,
            objects,
        };
        info!(
            "Generate scenario: {} objects, initial weight {}",
            num_objects, initial_weight
        );
        scenario
    }

    pub fn load_from_yaml(path: &str) -> Result<Vec<Scenario>> {
        let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
        let reader = BufReader::new(file);
        let scenarios = serde_yaml::from_reader(reader)?;
        Ok(scenarios)
    }

    pub fn write_to_yaml(path: &str, scenarios: &[Scenario]) -> Result<()> {
        let file = create_file(path)?;
        let mut writer = BufWriter::new(file);
        let yaml_data = serde_yaml::to_string(scenarios)?;
        writer.write_all(yaml_data.as_bytes())?;

        Ok(())
    }
}

fn next_token<'a, T>(tokens: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let token = tokens
        .next()
        .ok_or_else(|| anyhow!("missing {what}"))?;
    token
        .parse()
        .with_context(|| format!("invalid {what}: {token:?}"))
}

/// Write the path length, then the space separated indices, for each solution.
pub fn write_solutions<W: Write>(writer: &mut W, solutions: &[Solution]) -> io::Result<()> {
    for solution in solutions {
        writeln!(writer, "{}", solution.path.len())?;
        let line: Vec<String> = solution.path.iter().map(|index| index.to_string()).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Create `path` for writing, along with any missing parent directories.
pub fn create_file(path: &str) -> Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    File::create(path).with_context(|| format!("failed to create {path}"))
}

pub fn write_solutions_to_file(path: &str, solutions: &[Solution]) -> Result<()> {
    let file = create_file(path)?;
    let mut writer = BufWriter::new(file);
    write_solutions(&mut writer, solutions)?;
    writer.flush()?;
    Ok(())
}

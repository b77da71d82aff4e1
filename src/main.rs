use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ola::{
    direct_product, DataSource, HierarchicalBuffer, OlaConfig, PaddedSource, RangedPolynomial,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ola", about = "Range sums and moments from hierarchical aggregation buffers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print hierarchy height and padded length for an array size.
    Levels {
        /// Block size b.
        #[arg(long, default_value_t = 2)]
        basis: usize,
        /// Moment order N.
        #[arg(long, default_value_t = 1)]
        order: usize,
        /// Array length.
        #[arg(long)]
        length: usize,
    },
    /// Build a buffer over a file of numbers and answer one moment query.
    Query {
        /// Whitespace-separated numbers.
        input: PathBuf,
        /// Block size b.
        #[arg(long, default_value_t = 2)]
        basis: usize,
        /// Moment order N.
        #[arg(long, default_value_t = 1)]
        order: usize,
        /// First position of the range (inclusive).
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// One past the last position (defaults to the input length).
        #[arg(long)]
        end: Option<usize>,
        /// Moment degree: 0 = sum, 1 = first moment, ...
        #[arg(long, default_value_t = 0)]
        degree: usize,
        /// Also compute the direct sum and report the difference.
        #[arg(long)]
        verify: bool,
        /// Check interpolation outside the imperfect windows.
        #[arg(long)]
        validate: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Levels {
            basis,
            order,
            length,
        } => run_levels(basis, order, length)?,
        Commands::Query {
            input,
            basis,
            order,
            start,
            end,
            degree,
            verify,
            validate,
        } => run_query(input, basis, order, start, end, degree, verify, validate)?,
    }

    Ok(())
}

fn run_levels(basis: usize, order: usize, length: usize) -> Result<()> {
    let engine = HierarchicalBuffer::<f64>::new(basis, order)
        .context("invalid engine parameters")?;
    let padded = engine.recommended_padded_length(length);
    println!(
        "length={}\tlevels={}\tpadded_length={}\tpadded_levels={}\tmax_exact_degree={}",
        length,
        engine.levels(length),
        padded,
        engine.levels(padded),
        engine.max_exact_degree()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_query(
    input: PathBuf,
    basis: usize,
    order: usize,
    start: usize,
    end: Option<usize>,
    degree: usize,
    verify: bool,
    validate: bool,
) -> Result<()> {
    let data = read_numbers(&input)
        .with_context(|| format!("failed to read numbers from {}", input.display()))?;
    let config = OlaConfig::new(basis, order)
        .context("invalid engine parameters")?
        .with_range_validation(validate);
    let engine = HierarchicalBuffer::<f64>::with_config(config)?;

    let source = PaddedSource::for_engine(data.as_slice(), &engine);
    let buffer = engine
        .build(&source)
        .with_context(|| format!("failed to build buffer over {} values", data.len()))?;

    let end = end.unwrap_or(data.len());
    anyhow::ensure!(degree <= ola::algebra::MAX_DEGREE, "degree {} above 3", degree);
    let f = RangedPolynomial::monomial(degree, start, end);
    let answer = engine
        .query(&f, &source, &buffer)
        .with_context(|| format!("query over [{}, {}) failed", start, end))?;

    println!(
        "range=[{}, {})\tdegree={}\tvalue={}\tpadded_length={}\tlevels={}",
        start,
        end,
        degree,
        answer,
        source.len(),
        buffer.levels()
    );
    if verify {
        let direct = direct_product(&f, &source);
        println!("direct={}\tdifference={:e}", direct, (answer - direct).abs());
    }
    Ok(())
}

fn read_numbers(path: &PathBuf) -> Result<Vec<f64>> {
    let contents = std::fs::read_to_string(path)?;
    contents
        .split_whitespace()
        .enumerate()
        .map(|(idx, token)| {
            token
                .parse::<f64>()
                .with_context(|| format!("invalid number '{}' at item {}", token, idx + 1))
        })
        .collect()
}

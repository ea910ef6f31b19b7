//! pfam - Protein Domain Promiscuity CLI
//!
//! Command-line interface for computing domain promiscuity from
//! architecture exports.

use clap::{Args, Parser, Subcommand, ValueEnum};
use pfam_promiscuity::analysis::{example_config, Analysis, AnalysisConfig, AnalysisOutput};
use pfam_promiscuity::data::{FeatureColumns, RecordTable, DEFAULT_DELIMITER};
use pfam_promiscuity::error::Result;
use pfam_promiscuity::logging::{init_logging, LogLevel};
use pfam_promiscuity::pathogen::{exclusive_features, group_counts_from_tsv, PathogenTable};
use pfam_promiscuity::report::{RankBy, DEFAULT_TOP_N};
use pfam_promiscuity::taxonomy::{core_features, TaxonTable, TaxonomyCounts};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info};

/// CLI-friendly ranking metric
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliRankBy {
    /// Highest domain promiscuity first
    Promiscuity,
    /// Lowest weight score first
    WeightScore,
}

impl From<CliRankBy> for RankBy {
    fn from(by: CliRankBy) -> Self {
        match by {
            CliRankBy::Promiscuity => RankBy::Promiscuity,
            CliRankBy::WeightScore => RankBy::WeightScore,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileFormat {
    Text,
    Json,
}

/// Protein domain promiscuity analysis
#[derive(Parser)]
#[command(name = "pfam")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command reading architecture records.
#[derive(Args)]
struct RecordArgs {
    /// Path to architecture records TSV (species, protein, architecture)
    #[arg(short, long)]
    input: PathBuf,

    /// Separator between domains in architecture strings
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,

    /// Restrict to these species (repeatable)
    #[arg(short, long)]
    species: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the flat promiscuity report for every computable domain
    Promiscuity {
        #[command(flatten)]
        records: RecordArgs,

        /// Output path for the report TSV (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rank the top-N domains per species and aggregate across species
    Rank {
        #[command(flatten)]
        records: RecordArgs,

        /// Metric to rank by
        #[arg(short, long, value_enum, default_value = "promiscuity")]
        by: CliRankBy,

        /// Domains kept per species
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Output path for the ranking TSV (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the species distance matrix over top-N promiscuous domains
    Distance {
        #[command(flatten)]
        records: RecordArgs,

        /// Domains kept per species
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Output path for the matrix (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Profile the bigram graph built from the records
    Profile {
        #[command(flatten)]
        records: RecordArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ProfileFormat,
    },

    /// Run an analysis from a YAML configuration file
    Run {
        /// Path to analysis configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Path to architecture records TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the report TSV (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an example analysis configuration
    Example {
        /// Output path for the YAML configuration
        #[arg(short, long, default_value = "analysis.yaml")]
        output: PathBuf,
    },

    /// List features found in exactly one pathogen type
    Exclusive {
        /// Path to pathogen TSV (feature column plus pathogen_type code)
        #[arg(short, long)]
        input: PathBuf,

        /// Name of the feature column
        #[arg(short, long, default_value = "feature")]
        feature_column: String,

        /// Column copied after the feature in the report (repeatable)
        #[arg(long = "descriptor")]
        descriptors: Vec<String>,

        /// Treat types 0/1 and 3/4 as one group each
        #[arg(long)]
        collapse: bool,

        /// Species and strain totals per type (pathogen_type, num_species, num_strains)
        #[arg(long)]
        counts: Option<PathBuf>,

        /// Output path for the report TSV (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Classify features as exclusive and core at each taxonomic rank
    Core {
        /// Path to occurrence TSV (feature column plus the six rank columns)
        #[arg(short, long)]
        input: PathBuf,

        /// Path to taxonomy TSV with one row per strain
        #[arg(short, long)]
        taxonomy: PathBuf,

        /// Name of the feature column
        #[arg(short, long, default_value = "feature")]
        feature_column: String,

        /// Column copied after the feature in the report (repeatable)
        #[arg(long = "descriptor")]
        descriptors: Vec<String>,

        /// Output path for the report TSV (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(LogLevel::from_verbosity(cli.verbose, cli.quiet)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Promiscuity { records, output } => cmd_promiscuity(&records, output.as_ref()),

        Commands::Rank {
            records,
            by,
            top,
            output,
        } => cmd_rank(&records, by.into(), top, output.as_ref()),

        Commands::Distance {
            records,
            top,
            output,
        } => cmd_distance(&records, top, output.as_ref()),

        Commands::Profile { records, format } => cmd_profile(&records, format),

        Commands::Run {
            config,
            input,
            output,
        } => cmd_run(&config, &input, output.as_ref()),

        Commands::Example { output } => cmd_example(&output),

        Commands::Exclusive {
            input,
            feature_column,
            descriptors,
            collapse,
            counts,
            output,
        } => {
            let columns = FeatureColumns::new(feature_column).with_descriptors(descriptors);
            cmd_exclusive(&input, columns, collapse, counts.as_ref(), output.as_ref())
        }

        Commands::Core {
            input,
            taxonomy,
            feature_column,
            descriptors,
            output,
        } => {
            let columns = FeatureColumns::new(feature_column).with_descriptors(descriptors);
            cmd_core(&input, &taxonomy, columns, output.as_ref())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Open the output file, or stdout when no path is given.
fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
    }
}

fn emit(output: &AnalysisOutput, path: Option<&PathBuf>) -> Result<()> {
    let mut writer = open_output(path)?;
    output.write_tsv(&mut writer)?;
    writer.flush()?;

    if let Some(p) = path {
        info!(rows = output.len(), path = %p.display(), "wrote report");
    }
    Ok(())
}

fn analysis_for(args: &RecordArgs) -> Analysis {
    Analysis::new()
        .delimiter(args.delimiter)
        .species(args.species.iter().cloned())
}

fn cmd_promiscuity(args: &RecordArgs, output: Option<&PathBuf>) -> Result<()> {
    let records = RecordTable::from_tsv(&args.input)?;
    let result = analysis_for(args).name("promiscuity").flat().run(records)?;
    emit(&result, output)
}

fn cmd_rank(args: &RecordArgs, by: RankBy, top: usize, output: Option<&PathBuf>) -> Result<()> {
    let records = RecordTable::from_tsv(&args.input)?;
    let result = analysis_for(args).name("rank").top_n(by, top).run(records)?;
    emit(&result, output)
}

fn cmd_distance(args: &RecordArgs, top: usize, output: Option<&PathBuf>) -> Result<()> {
    let records = RecordTable::from_tsv(&args.input)?;
    let result = analysis_for(args).name("distance").distance(top).run(records)?;
    emit(&result, output)
}

fn cmd_profile(args: &RecordArgs, format: ProfileFormat) -> Result<()> {
    let records = RecordTable::from_tsv(&args.input)?;
    let profile = analysis_for(args).name("profile").profile(records)?;

    match format {
        ProfileFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
        ProfileFormat::Text => print!("{}", profile),
    }

    Ok(())
}

fn cmd_run(config_path: &PathBuf, input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    let config = AnalysisConfig::from_file(config_path)?;
    info!(analysis = %config.name, "loaded configuration");

    let records = RecordTable::from_tsv(input)?;
    let result = Analysis::from_config(&config).run(records)?;
    emit(&result, output)
}

fn cmd_example(output_path: &PathBuf) -> Result<()> {
    let yaml = example_config().to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example analysis to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}

fn cmd_exclusive(
    input: &PathBuf,
    columns: FeatureColumns,
    collapse: bool,
    counts: Option<&PathBuf>,
    output: Option<&PathBuf>,
) -> Result<()> {
    let table = PathogenTable::from_tsv(input, columns)?;
    let mut report = exclusive_features(&table, collapse);
    if let Some(path) = counts {
        report = report.with_group_counts(group_counts_from_tsv(path)?);
    }
    info!(features = report.len(), collapse, "found exclusive features");

    let mut writer = open_output(output)?;
    report.write_tsv(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn cmd_core(
    input: &PathBuf,
    taxonomy: &PathBuf,
    columns: FeatureColumns,
    output: Option<&PathBuf>,
) -> Result<()> {
    let counts = TaxonomyCounts::from_tsv(taxonomy)?;
    let table = TaxonTable::from_tsv(input, columns)?;
    let report = core_features(&table, &counts);
    info!(features = report.len(), "classified features by rank");

    let mut writer = open_output(output)?;
    report.write_tsv(&mut writer)?;
    writer.flush()?;
    Ok(())
}

//! Whisky collapser CLI - collapse one-hot tasting notes into descriptor lists
//!
//! # Main Commands
//!
//! ```bash
//! whisky-collapse                              # scotch.csv → cleanDataSet.csv
//! whisky-collapse collapse -i in.csv -o out.csv
//! whisky-collapse collapse --substitution token --report run.json
//! ```
//!
//! # Inspection Commands
//!
//! ```bash
//! whisky-collapse parse scotch.csv         # Loaded table as JSON
//! whisky-collapse preview --rows 5         # Collapsed notes as JSON
//! whisky-collapse dictionary               # Substitution dictionary as JSON
//! whisky-collapse schema                   # Declared indicator schema as JSON
//! ```
//!
//! `WHISKY_INPUT` and `WHISKY_OUTPUT` (also read from `.env`) replace the
//! default paths.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use whisky_collapser::logs::{log_error, LOG_SINK};
use whisky_collapser::{
    load_dictionary, load_table, preview, run, CollapseOptions, HeaderStyle, Layout,
    PresentationNames, Schema, SchemaSource, SubstitutionMode,
};

#[derive(Parser)]
#[command(name = "whisky-collapse")]
#[command(about = "Collapse one-hot whisky tasting notes into descriptor lists", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    collapse: CollapseArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: one-hot table → collapsed, expanded table
    Collapse(CollapseArgs),

    /// Parse a table and output JSON
    Parse {
        /// Input table
        input: PathBuf,

        /// Delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Collapse without writing the output table; notes go to stdout as JSON
    Preview {
        #[command(flatten)]
        args: CollapseArgs,

        /// Only show the first N notes
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Show the substitution dictionary
    Dictionary {
        /// Dictionary JSON file (default: built-in)
        file: Option<PathBuf>,
    },

    /// Show the indicator schema
    Schema {
        /// Infer the schema from this table's header instead
        #[arg(long)]
        from: Option<PathBuf>,

        /// Delimiter of the --from table (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,
    },
}

#[derive(Args, Clone, Default)]
struct CollapseArgs {
    /// Input table (default: scotch.csv)
    #[arg(short, long, env = "WHISKY_INPUT")]
    input: Option<PathBuf>,

    /// Output file (default: cleanDataSet.csv)
    #[arg(short, long, env = "WHISKY_OUTPUT")]
    output: Option<PathBuf>,

    /// Input delimiter (default: ';')
    #[arg(short, long, conflicts_with = "auto_delimiter")]
    delimiter: Option<char>,

    /// Detect the input delimiter from the header line
    #[arg(long)]
    auto_delimiter: bool,

    /// Delimiter of the final output (default: ',')
    #[arg(long)]
    output_delimiter: Option<char>,

    /// How the dictionary is applied
    #[arg(long, value_enum)]
    substitution: Option<SubstitutionArg>,

    /// Output header labels
    #[arg(long, value_enum)]
    header_style: Option<HeaderStyleArg>,

    /// Take indicator columns by position instead of checking header names
    #[arg(long)]
    infer_schema: bool,

    /// Dictionary JSON file replacing the built-in one
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Options JSON file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SubstitutionArg {
    /// Whole-text substring replacement (compatible output)
    Legacy,
    /// Exact descriptor token replacement
    Token,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeaderStyleArg {
    Title,
    Lower,
}

impl From<SubstitutionArg> for SubstitutionMode {
    fn from(arg: SubstitutionArg) -> Self {
        match arg {
            SubstitutionArg::Legacy => SubstitutionMode::Legacy,
            SubstitutionArg::Token => SubstitutionMode::Token,
        }
    }
}

impl From<HeaderStyleArg> for HeaderStyle {
    fn from(arg: HeaderStyleArg) -> Self {
        match arg {
            HeaderStyleArg::Title => HeaderStyle::Title,
            HeaderStyleArg::Lower => HeaderStyle::Lower,
        }
    }
}

impl CollapseArgs {
    /// Options from the config file (or defaults) with flags applied on top.
    fn to_options(&self) -> Result<CollapseOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => CollapseOptions::default(),
        };

        if let Some(input) = &self.input {
            options.input = input.clone();
        }
        if let Some(output) = &self.output {
            options.output = output.clone();
        }
        if self.auto_delimiter {
            options.delimiter = None;
        } else if let Some(delimiter) = self.delimiter {
            options.delimiter = Some(delimiter);
        }
        if let Some(delimiter) = self.output_delimiter {
            options.output_delimiter = delimiter;
        }
        if let Some(mode) = self.substitution {
            options.substitution = mode.into();
        }
        if let Some(style) = self.header_style {
            options.presentation = PresentationNames::for_style(style.into());
        }
        if self.infer_schema {
            options.schema = SchemaSource::Inferred;
        }
        if let Some(path) = &self.dictionary {
            options.dictionary_path = Some(path.clone());
        }
        if let Some(path) = &self.report {
            options.report_path = Some(path.clone());
        }

        Ok(options)
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        None => cmd_collapse(&cli.collapse),

        Some(Commands::Collapse(args)) => cmd_collapse(&args),

        Some(Commands::Parse {
            input,
            delimiter,
            output,
        }) => cmd_parse(&input, delimiter, output.as_deref()),

        Some(Commands::Preview { args, rows }) => cmd_preview(&args, rows),

        Some(Commands::Dictionary { file }) => cmd_dictionary(file.as_deref()),

        Some(Commands::Schema { from, delimiter }) => cmd_schema(from.as_deref(), delimiter),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_collapse(args: &CollapseArgs) -> Result<(), Box<dyn std::error::Error>> {
    LOG_SINK.set_quiet(args.quiet);
    let options = args.to_options()?;

    let report = run(&options)?;

    if !args.quiet {
        eprintln!("\n⚙️  Collapsed: {} rows", report.rows);
        if !report.collisions.is_empty() {
            eprintln!(
                "   ⚠️  {} rows no longer split cleanly on '{}'",
                report.collisions.len(),
                format_delimiter(options.output_delimiter)
            );
        }
        eprintln!("\n✨ Done!");
    }

    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing table: {}", input.display());

    let result = load_table(input, delimiter)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", result.table.headers.len());
    eprintln!("✅ Parsed {} records", result.table.len());

    let json = serde_json::to_string_pretty(&result.table)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_preview(args: &CollapseArgs, rows: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    LOG_SINK.set_quiet(args.quiet);
    let options = args.to_options()?;

    let mut notes = preview(&options)?;
    if let Some(rows) = rows {
        notes.truncate(rows);
    }

    println!("{}", serde_json::to_string_pretty(&notes)?);
    Ok(())
}

fn cmd_dictionary(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let dictionary = load_dictionary(file)?;
    println!("{}", dictionary.to_json()?);
    Ok(())
}

fn cmd_schema(from: Option<&Path>, delimiter: Option<char>) -> Result<(), Box<dyn std::error::Error>> {
    let json = match from {
        Some(path) => {
            let parsed = load_table(path, delimiter)?;
            let schema = Schema::infer(&parsed.table.headers, &Layout::scotch())?;
            serde_json::to_string_pretty(&schema)?
        }
        None => serde_json::to_string_pretty(Schema::scotch())?,
    };

    println!("{}", json);
    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

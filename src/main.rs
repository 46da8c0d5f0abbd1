use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io;
use std::io::Write;

use assocplot::adapter::{prepare_records, LinearGenomeAdapter, PlotDataError};
use assocplot::file::{
    read_associations, read_seqlens, write_records_tsv, write_response_json, OutputFile,
};
use assocplot::genome::GenomeIndex;
use assocplot::record::PlotMode;
use assocplot::source::{DataSource, StaticSource};
use assocplot::window::{plot_window, sort_by_position, target_pvalue, PlotKind};

const INFO: &str = "\
assocplot: prepare association data for Manhattan and colocalization plots
usage: assocplot [--help] <subcommand>

Subcommands:

  prepare: adapt an association file into plot-ready records.

";

#[derive(Parser)]
#[clap(name = "assocplot")]
#[clap(about = INFO)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Adapt an association file into plot-ready records.
    ///
    /// Reads a headered TSV (snp, chrom, position, pvalue, category) or a
    /// JSON array of association records, derives plot coordinates against
    /// the GRCh38 genome (or a custom genome file), and writes the result
    /// as TSV, or as the renderer's JSON envelope with --json.
    ///
    /// Example:
    ///
    ///  $ assocplot prepare associations.tsv --plot coloc --mode gwas_plot \
    ///      --output locus_plot.tsv
    Prepare {
        /// an association file, TSV or JSON, optionally gzip-compressed
        #[arg(required = true)]
        input: String,
        /// plot family: "manhattan" or "coloc"
        #[arg(long, default_value = "manhattan")]
        plot: PlotKind,
        /// plot sub-mode: "pvalue_plot", "gwas_plot", "gene_type" or "standard"
        #[arg(long, default_value = "standard")]
        mode: PlotMode,
        /// a TSV file of chromosome names and their lengths (default: GRCh38)
        #[arg(long)]
        seqlens: Option<String>,
        /// the output file path (if not set, uses standard out)
        #[arg(long)]
        output: Option<String>,
        /// write the {header, body} JSON envelope instead of TSV
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn prepare(
    input: &str,
    plot: PlotKind,
    mode: PlotMode,
    seqlens: Option<&str>,
    output: Option<&str>,
    json: bool,
) -> Result<(), PlotDataError> {
    let custom_index = match seqlens {
        Some(path) => Some(GenomeIndex::from_seqlens(&read_seqlens(path)?)?),
        None => None,
    };
    let index = custom_index.as_ref().unwrap_or_else(|| GenomeIndex::grch38());

    let mut records = read_associations(input)?;
    if records.is_empty() {
        log::warn!("no associations in {}", input);
    }
    if plot == PlotKind::Coloc {
        sort_by_position(&mut records);
        if let Some(window) = plot_window(plot, mode, &records, index)? {
            log::info!(
                "plot window: chromosome {}, {}..{}",
                window.chr,
                window.start,
                window.end
            );
        }
        if let Some(pvalue) = target_pvalue(&records) {
            log::info!("target association p-value: {}", pvalue);
        }
    }

    // open writer, possibly to stdout
    let writer: Box<dyn Write> = if let Some(filepath) = output {
        OutputFile::new(filepath).writer()?
    } else {
        Box::new(io::stdout())
    };

    if json {
        let source = StaticSource::new(records, mode, LinearGenomeAdapter::new(index))
            .with_header(Value::Null);
        write_response_json(writer, &source.fetch()?)
    } else {
        let plot_records = prepare_records(&records, mode, index)?;
        write_records_tsv(writer, &plot_records)
    }
}

fn run() -> Result<(), PlotDataError> {
    env_logger::init();
    let cli = Cli::parse();
    match &cli.command {
        Some(Commands::Prepare {
            input,
            plot,
            mode,
            seqlens,
            output,
            json,
        }) => prepare(
            input,
            *plot,
            *mode,
            seqlens.as_deref(),
            output.as_deref(),
            *json,
        ),
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    }
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

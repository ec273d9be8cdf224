// Clippy allows
#![allow(clippy::too_many_arguments)]

//! Average Common Substring distance over a Generalized Enhanced Suffix
//! Array.
//!
//! Usage: macs [-h] [-v] [-f <format>] [-Q <bytes>] <ref_seq> <target_seqs> <ref_color> <output>

use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clcp_macs::prelude::*;
use clcp_macs::streaming::{DReader, IdReader, IdWriter, LcpReader, LcpWriter, SymbolWriter};
use clcp_macs::types::{Len, Memory, SeqId};

#[derive(Parser)]
#[command(name = "macs")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(about = "Average Common Substring distance over a Generalized Enhanced Suffix Array", long_about = None)]
struct Cli {
    /// Print per-row forward-pass tracing to stdout.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Input format: 0 = separate .bwt/.lcp/.id files (default), 1 = combined .gesa.
    #[arg(short = 'f', long, default_value_t = 0)]
    format: u8,

    /// Memory budget for the rolling cLCP window, in bytes.
    #[arg(short = 'Q', long)]
    memory_budget: Option<Memory>,

    /// Base filename of the reference sequence's own suffix array.
    ref_seq: PathBuf,

    /// Base filename of the target collection.
    target_seqs: PathBuf,

    /// Integer color index of the reference within the collection.
    ref_color: SeqId,

    /// Base filename for the `.acs` output.
    output: PathBuf,
}

fn base(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Loads collection metadata from `target_seqs.info` if present, else
/// derives it from the raw collection files for the given input format.
fn load_collection(target_seqs: &Path, format: u8) -> Result<CollectionInfo> {
    let info_path = base(target_seqs, "info");
    if info_path.exists() {
        return CollectionInfo::load_text(&info_path);
    }
    match format {
        1 => CollectionInfo::from_gesa_scan(base(target_seqs, "gesa")),
        _ => CollectionInfo::from_bcr_scan(base(target_seqs, "bwt"), base(target_seqs, "id")),
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.format > 1 {
        return Err(AcsError::usage(
            "Cli",
            "parse",
            format!("-f must be 0 (bwt/lcp/id) or 1 (gesa), got {}", cli.format),
        ));
    }

    let collection = load_collection(&cli.target_seqs, cli.format)?;
    collection.validate()?;

    if !collection.has_color(cli.ref_color) {
        return Err(AcsError::integrity(
            "Cli",
            "run",
            format!("reference color {} is not present in the collection", cli.ref_color),
        ));
    }

    let m = collection.sequence_count();
    let n_x = collection
        .sequence_length(cli.ref_color)
        .expect("checked has_color above");

    let memory_budget = cli.memory_budget.unwrap_or(clcp_macs::config::DEFAULT_MEMORY_BUDGET);
    let min_budget = (m as Memory) * (std::mem::size_of::<Len>() as Memory);
    if memory_budget < min_budget {
        return Err(AcsError::contract(
            "Cli",
            "run",
            format!(
                "memory budget {} is too small to hold one row ({} colors x {} bytes = {} bytes minimum)",
                memory_budget,
                m,
                std::mem::size_of::<Len>(),
                min_budget
            ),
        ));
    }
    let q = window_depth(memory_budget, m, n_x as u64);

    // When the collection is a single combined GESA file, split it once
    // into the id/lcp sidecars both scans below read; no Seek is needed
    // on the GESA input itself since the split is a single forward pass.
    let (id_path, lcp_path): (PathBuf, PathBuf);
    let _split_bwt;
    let _split_lcp;
    let _split_id;
    if cli.format == 1 {
        let gesa_reader = clcp_macs::streaming::GesaReader::open(base(&cli.target_seqs, "gesa"))
            .map_err(|e| AcsError::open("Cli", "run", base(&cli.target_seqs, "gesa"), e))?;
        let bwt_tmp = tempfile::NamedTempFile::new()?;
        let lcp_tmp = tempfile::NamedTempFile::new()?;
        let id_tmp = tempfile::NamedTempFile::new()?;
        split_gesa(
            gesa_reader,
            SymbolWriter::create(bwt_tmp.path())?,
            LcpWriter::create(lcp_tmp.path())?,
            IdWriter::create(id_tmp.path())?,
        )?;
        id_path = id_tmp.path().to_path_buf();
        lcp_path = lcp_tmp.path().to_path_buf();
        _split_bwt = Some(bwt_tmp);
        _split_lcp = Some(lcp_tmp);
        _split_id = Some(id_tmp);
    } else {
        id_path = base(&cli.target_seqs, "id");
        lcp_path = base(&cli.target_seqs, "lcp");
        _split_bwt = None;
        _split_lcp = None;
        _split_id = None;
    }

    let ref_lcp_path = base(&cli.ref_seq, "lcp");

    // D-generator: one forward scan of (id, lcp).
    let mut d_scratch = tempfile::tempfile()?;
    let dgen_stats = {
        let id_r = IdReader::open(&id_path).map_err(|e| AcsError::open("Cli", "run", &id_path, e))?;
        let lcp_r =
            LcpReader::open(&lcp_path).map_err(|e| AcsError::open("Cli", "run", &lcp_path, e))?;
        let d_w = LcpWriter::new(&mut d_scratch);
        DGenerator::new(cli.ref_color).run_streams(id_r, lcp_r, d_w)?
    };
    if cli.verbose {
        eprintln!("{}", dgen_stats);
    }
    use std::io::Seek;
    d_scratch.seek(std::io::SeekFrom::Start(0))?;

    // Forward pass: joint scan of (id, lcp, d, ref-lcp).
    let mut clcp_scratch = tempfile::tempfile()?;
    let forward_stats = {
        let id_r = IdReader::open(&id_path).map_err(|e| AcsError::open("Cli", "run", &id_path, e))?;
        let lcp_r =
            LcpReader::open(&lcp_path).map_err(|e| AcsError::open("Cli", "run", &lcp_path, e))?;
        let d_r = DReader::new(&mut d_scratch);
        let lcp_x_r = LcpReader::open(&ref_lcp_path)
            .map_err(|e| AcsError::open("Cli", "run", &ref_lcp_path, e))?;
        let clcp_w = LcpWriter::new(&mut clcp_scratch);
        let mut stdout = io::stdout();
        let trace: Option<&mut dyn io::Write> = if cli.verbose { Some(&mut stdout) } else { None };
        ForwardPass::new(cli.ref_color, m, n_x as u64, q).run(id_r, lcp_r, d_r, lcp_x_r, clcp_w, trace)?
    };
    clcp_scratch.seek(std::io::SeekFrom::Start(0))?;

    // Backward pass: reverse scan over the spilled partial cLCP.
    let ref_lcp_file = std::fs::File::open(&ref_lcp_path)
        .map_err(|e| AcsError::open("Cli", "run", &ref_lcp_path, e))?;
    let backward_stats = BackwardPass::new(m, n_x as u64).run(&mut clcp_scratch, ref_lcp_file)?;

    if cli.verbose {
        eprintln!("{}", forward_stats);
        eprintln!("{}", backward_stats);
    }

    let mut lengths = vec![0 as Len; m];
    for (&color, &length) in collection.colors() {
        lengths[color as usize] = length;
    }

    let distances = AcsDistanceComputer::new(cli.ref_color, m).compute(
        n_x,
        &lengths,
        &backward_stats.score_x,
        &forward_stats.score_r,
    )?;

    write_acs_file(base(&cli.output, "acs"), cli.ref_color, &distances)?;

    Ok(())
}

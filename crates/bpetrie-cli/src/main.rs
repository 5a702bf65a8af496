//! # bpetrie
//!
//! Train a byte-pair trie vocabulary, and encode/decode text with it.

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, bail};
use bpetrie::{
    BytePairEncoder,
    BytePairTrainerOptions,
    StopMode,
    SymbolVocab,
    vocab::io::load_base64_vocab_path,
};
use clap::{ArgAction, Args, Parser, Subcommand};

const DEFAULT_OUTPUT: &str = "vocab.bpt";

/// Byte-pair trie tokenizer toolkit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Silence all log output.
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Learn a vocabulary from text files.
    Train(TrainArgs),

    /// Encode text into token ids.
    Encode(EncodeArgs),

    /// Decode token ids into text.
    Decode(DecodeArgs),
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
struct OptionsArgs {
    /// JSON file holding trainer options; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Word boundary marker.
    #[arg(long, value_name = "CHAR")]
    boundary_marker: Option<char>,

    /// Symbol for the unknown token.
    #[arg(long, value_name = "SYMBOL")]
    unknown_symbol: Option<String>,
}

impl OptionsArgs {
    fn load(&self) -> anyhow::Result<BytePairTrainerOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => BytePairTrainerOptions::with_merge_count(0),
        };
        if let Some(marker) = self.boundary_marker {
            options = options.with_boundary_marker(marker);
        }
        if let Some(symbol) = &self.unknown_symbol {
            options = options.with_unknown_symbol(symbol.as_str());
        }
        Ok(options)
    }
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Text files to train on; `-` reads stdin.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output vocab path.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Stop at this vocabulary size.
    #[arg(long, value_name = "SIZE", conflicts_with = "merges")]
    vocab_size: Option<usize>,

    /// Stop after this many merges.
    #[arg(long, value_name = "COUNT")]
    merges: Option<usize>,

    /// Stop when the best pair occurs fewer times than this.
    #[arg(long, value_name = "FREQ")]
    min_pair_frequency: Option<u64>,

    /// Hard cap on the number of merges.
    #[arg(long, value_name = "COUNT")]
    max_merges: Option<usize>,

    /// Log progress every N merges.
    #[arg(long, value_name = "N")]
    progress_interval: Option<usize>,

    /// Print the learned merges to stdout.
    #[arg(long)]
    print_merges: bool,

    #[command(flatten)]
    options: OptionsArgs,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Vocab file.
    #[arg(short = 'm', long, value_name = "PATH")]
    vocab: PathBuf,

    /// Input file; stdin when omitted.
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Text to encode, instead of `--input`.
    #[arg(value_name = "TEXT", conflicts_with = "input")]
    text: Vec<String>,

    #[command(flatten)]
    options: OptionsArgs,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Vocab file.
    #[arg(short = 'm', long, value_name = "PATH")]
    vocab: PathBuf,

    /// Whitespace separated ids; read from stdin when omitted.
    #[arg(value_name = "ID")]
    ids: Vec<u32>,

    #[command(flatten)]
    options: OptionsArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    stderrlog::new()
        .module("bpetrie")
        .quiet(cli.quiet)
        .verbosity(cli.verbose as usize + 2)
        .init()?;

    match cli.command {
        Command::Train(args) => run_train(args),
        Command::Encode(args) => run_encode(args),
        Command::Decode(args) => run_decode(args),
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn run_train(args: TrainArgs) -> anyhow::Result<()> {
    if args.options.config.is_none() && args.vocab_size.is_none() && args.merges.is_none() {
        bail!("one of --vocab-size, --merges or --config is required");
    }

    let mut options = args.options.load()?;
    if let Some(size) = args.vocab_size {
        options = options.with_stop_mode(StopMode::TargetVocabSize(size));
    }
    if let Some(merges) = args.merges {
        options = options.with_stop_mode(StopMode::MergeCount(merges));
    }
    if let Some(freq) = args.min_pair_frequency {
        options = options.with_min_pair_frequency(freq);
    }
    if let Some(max) = args.max_merges {
        options = options.with_max_merges(max);
    }
    if let Some(interval) = args.progress_interval {
        options = options.with_progress_report_interval(interval);
    }
    log::debug!("{options:#?}");

    let corpus = args
        .inputs
        .iter()
        .map(|path| read_input(path))
        .collect::<anyhow::Result<Vec<String>>>()?;

    let t0 = std::time::Instant::now();
    let mut encoder: BytePairEncoder<u32> = BytePairEncoder::new(options);
    encoder.fit(&corpus)?;
    log::info!("training took {:?}", t0.elapsed());

    encoder.save_vocab_path(&args.output)?;
    log::info!(
        "wrote {} entries to {}",
        encoder.vocab_size()?,
        args.output.display()
    );

    if args.print_merges
        && let Some(report) = encoder.training_report()?
    {
        let mut stdout = io::stdout().lock();
        for (idx, merge) in report.merges.iter().enumerate() {
            writeln!(
                stdout,
                "{}\t{:?} + {:?} -> {:?}\t{}",
                idx + 1,
                merge.pair.0,
                merge.pair.1,
                merge.merged,
                merge.count
            )?;
        }
        writeln!(stdout, "# stopped: {:?}", report.stop_reason)?;
    }

    Ok(())
}

fn load_encoder(
    vocab_path: &Path,
    options: &OptionsArgs,
) -> anyhow::Result<BytePairEncoder<u32>> {
    let vocab: SymbolVocab<u32> = load_base64_vocab_path(vocab_path)
        .with_context(|| format!("loading vocab {}", vocab_path.display()))?;
    Ok(BytePairEncoder::from_vocab(Arc::new(vocab), options.load()?))
}

fn run_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let encoder = load_encoder(&args.vocab, &args.options)?;

    let text = if !args.text.is_empty() {
        args.text.join(" ")
    } else {
        read_input(args.input.as_deref().unwrap_or(Path::new("-")))?
    };

    let mut stdout = io::stdout().lock();
    for line in text.lines() {
        let tokens = encoder.transform(line)?;
        let ids: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        writeln!(stdout, "{}", ids.join(" "))?;
    }
    Ok(())
}

fn run_decode(args: DecodeArgs) -> anyhow::Result<()> {
    let encoder = load_encoder(&args.vocab, &args.options)?;

    let mut stdout = io::stdout().lock();
    if !args.ids.is_empty() {
        writeln!(stdout, "{}", encoder.inverse_transform(&args.ids)?)?;
        return Ok(());
    }

    let input = read_input(Path::new("-"))?;
    for line in input.lines() {
        let ids = line
            .split_whitespace()
            .map(|id| id.parse::<u32>())
            .collect::<Result<Vec<u32>, _>>();
        let Ok(ids) = ids else {
            bail!("invalid id in line: {line:?}");
        };
        writeln!(stdout, "{}", encoder.inverse_transform(&ids)?)?;
    }
    Ok(())
}

use clap::Args;
use keystat::corpus;
use keystat::error::KsResult;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// JSON file of the form {"texts": [...]}
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long)]
    pub output: PathBuf,

    /// Name recorded in the corpus `file` field; defaults to the output path
    #[arg(long)]
    pub name: Option<String>,
}

pub fn run(args: CorpusArgs) -> KsResult<()> {
    let texts = corpus::load_texts(&args.input)?;
    info!("📂 Read {} texts from {:?}", texts.len(), args.input);

    let name = args
        .name
        .unwrap_or_else(|| args.output.display().to_string());
    let corpus = corpus::generate(&name, &texts);
    corpus.save_to_file(&args.output)?;

    info!(
        "💾 Wrote '{}': {} 1-grams, {} 3-grams",
        corpus.file,
        corpus.monograms.len(),
        corpus.trigrams.len()
    );
    Ok(())
}

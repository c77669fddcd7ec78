use anyhow::Context;
use clap::Parser;
use redaktor::{Config, LogListener, OpenAiClient};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "redaktor",
    version,
    author,
    about = "AI-assisted newspaper editor for docx articles",
    long_about = "Proofreads a docx article with a language model and produces a styled \
    docx containing title, lead and tag proposals, pull quotes, and the corrected text.\n\n\
    The API key is read from the OPENAI_API_KEY environment variable.\n\n\
    USAGE EXAMPLES:\n  \
      # Edit an article with defaults\n  \
      redaktor artykul.docx\n\n  \
      # Custom output path and per-chunk headings\n  \
      redaktor artykul.docx --out zredagowany.docx --headings\n\n  \
      # Custom tag vocabulary\n  \
      redaktor artykul.docx --tag Sport --tag Nauka"
)]
struct Cli {
    /// Path to the source docx article
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output path for the edited document
    #[arg(short, long, default_value = "artykul_zredagowany.docx", value_name = "PATH")]
    out: PathBuf,

    /// Max chunk size in bytes (chunks break at sentence boundaries)
    #[arg(long, default_value_t = 8_000)]
    chunk_size: usize,

    /// Model identifier
    #[arg(short, long, default_value = "gpt-4o")]
    model: String,

    /// Sampling temperature
    #[arg(short, long, default_value_t = 0.5)]
    temperature: f32,

    /// Completion token budget per generation call
    #[arg(long, default_value_t = 2_000)]
    max_tokens: u32,

    /// Base URL of the chat-completions API
    #[arg(long, default_value = "https://api.openai.com/v1", value_name = "URL")]
    api_base: String,

    /// Tag vocabulary entry (repeatable; defaults to the built-in list)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Prepend a generated heading to each proofread chunk
    #[arg(long)]
    headings: bool,

    /// Print the accumulated result as JSON to stdout
    #[arg(long)]
    dump_json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY environment variable is not set")?;

    let mut builder = Config::builder()
        .chunk_size(cli.chunk_size)
        .model(cli.model)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_base(cli.api_base)
        .api_key(api_key)
        .include_headings(cli.headings);

    if !cli.tags.is_empty() {
        builder = builder.tag_vocabulary(cli.tags);
    }

    let config = builder.build().context("Failed to build configuration")?;

    let client = OpenAiClient::from_config(&config)
        .context("Failed to create generation client")?;

    let text = redaktor::read_docx(&cli.input).context("Failed to read source document")?;

    let chunks = redaktor::chunk(&text, config.chunk_size);

    let result = redaktor::Editor::new(&config, &client)
        .context("Failed to create editor")?
        .with_listener(&LogListener)
        .run(&chunks)
        .context("Editorial run failed")?;

    if cli.dump_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    let bytes = redaktor::render(&result).context("Failed to render output document")?;
    redaktor::write_output(&cli.out, &bytes).context("Failed to write output document")?;

    println!("Zapisano zredagowany dokument: {}", cli.out.display());

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("redaktor=info"),
        1 => EnvFilter::new("redaktor=debug"),
        _ => EnvFilter::new("redaktor=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}

use crate::client::Generator;
use crate::config::Config;
use crate::error::Result;
use crate::prompt::{PromptEngine, SYSTEM_MESSAGE};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument};

/// All artifacts generated for one document run.
///
/// Built and returned by [`Editor::run`]; never mutated afterwards. The
/// renderer receives it read-only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditorialResult {
    /// Three title candidates for the article
    pub titles: Vec<String>,

    /// Three lead candidates for the article
    pub leads: Vec<String>,

    /// Tags selected from the closed vocabulary
    pub tags_from_list: Vec<String>,

    /// Freely generated hash-prefixed tags
    pub tags_free: Vec<String>,

    /// Pull quotes collected across all chunks
    pub quotes: Vec<String>,

    /// Concatenated proofread text of all chunks
    pub output_text: String,
}

/// Pipeline stage reported to the progress listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    /// Proofreading one chunk
    Proofread,
    /// Generating a heading for one chunk
    Heading,
    /// Extracting quotes from one chunk
    Quotes,
    /// Generating title candidates for the whole document
    Titles,
    /// Generating lead candidates for the whole document
    Leads,
    /// Selecting tags from the closed vocabulary
    TagsFromList,
    /// Generating free tags
    TagsFree,
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Proofread => "proofread",
            Self::Heading => "heading",
            Self::Quotes => "quotes",
            Self::Titles => "titles",
            Self::Leads => "leads",
            Self::TagsFromList => "tags-from-list",
            Self::TagsFree => "tags-free",
        };
        f.write_str(label)
    }
}

/// Observer for pipeline progress events.
///
/// The orchestrator emits one event per stage; per-chunk stages carry the
/// chunk index. A UI layer is free to subscribe; the default listener
/// does nothing.
pub trait ProgressListener {
    /// Called before each generation stage starts.
    fn on_stage(&self, stage: ProgressStage, chunk: Option<usize>) {
        let _ = (stage, chunk);
    }
}

/// Listener that ignores all events.
pub struct NoopListener;

impl ProgressListener for NoopListener {}

/// Listener that narrates progress through `tracing` at info level.
pub struct LogListener;

impl ProgressListener for LogListener {
    fn on_stage(&self, stage: ProgressStage, chunk: Option<usize>) {
        match chunk {
            Some(index) => info!("Stage {stage} (chunk {})", index + 1),
            None => info!("Stage {stage}"),
        }
    }
}

/// Orchestrates the per-chunk and whole-document generation sequence.
///
/// Single-threaded and fully synchronous: each generation call blocks
/// until the service responds or errors. The first service error aborts
/// the run and discards all partial results.
pub struct Editor<'a> {
    generator: &'a dyn Generator,
    prompts: PromptEngine,
    tag_vocabulary: Vec<String>,
    include_headings: bool,
    listener: &'a dyn ProgressListener,
}

impl<'a> Editor<'a> {
    /// Creates an editor with the given generator and a no-op listener.
    ///
    /// # Errors
    ///
    /// Returns an error if prompt template registration fails.
    pub fn new(config: &Config, generator: &'a dyn Generator) -> Result<Self> {
        Ok(Self {
            generator,
            prompts: PromptEngine::new()?,
            tag_vocabulary: config.tag_vocabulary.clone(),
            include_headings: config.include_headings,
            listener: &NoopListener,
        })
    }

    /// Replaces the progress listener.
    #[must_use]
    pub fn with_listener(mut self, listener: &'a dyn ProgressListener) -> Self {
        self.listener = listener;
        self
    }

    /// Runs the full generation sequence over the ordered chunks.
    ///
    /// Per chunk, in order: proofread, optional heading, quote
    /// extraction against the processed text. Then four whole-document
    /// calls against the original chunks joined with single spaces:
    /// titles, leads, vocabulary tags, free tags. The whole-document
    /// calls run even when `chunks` is empty.
    ///
    /// # Errors
    ///
    /// Propagates the first generation or template error; no partial
    /// result survives a failed run.
    #[instrument(skip(self, chunks), fields(chunks = chunks.len()))]
    pub fn run(&self, chunks: &[String]) -> Result<EditorialResult> {
        info!("Starting editorial run over {} chunks", chunks.len());

        let mut output_text = String::new();
        let mut quotes = Vec::new();

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(
                "Editing chunk {}/{} starting with {:?}",
                index + 1,
                chunks.len(),
                chunk.chars().take(10).collect::<String>()
            );

            self.listener.on_stage(ProgressStage::Proofread, Some(index));
            let mut processed = self.generate(self.prompts.proofread(chunk)?)?;

            if self.include_headings {
                self.listener.on_stage(ProgressStage::Heading, Some(index));
                let heading = self.generate(self.prompts.heading(chunk)?)?;
                processed = format!("{heading}\n\n{processed}");
            }

            self.listener.on_stage(ProgressStage::Quotes, Some(index));
            let raw_quotes = self.generate(self.prompts.quotes(&processed)?)?;
            quotes.extend(split_lines(&raw_quotes));

            output_text.push_str(&processed);
        }

        let joined = chunks.join(" ");

        self.listener.on_stage(ProgressStage::Titles, None);
        let titles = split_lines(&self.generate(self.prompts.titles(&joined)?)?);

        self.listener.on_stage(ProgressStage::Leads, None);
        let leads = split_lines(&self.generate(self.prompts.leads(&joined)?)?);

        self.listener.on_stage(ProgressStage::TagsFromList, None);
        let tags_from_list = split_lines(
            &self.generate(self.prompts.tags_from_list(&joined, &self.tag_vocabulary)?)?,
        );

        self.listener.on_stage(ProgressStage::TagsFree, None);
        let tags_free =
            split_lines(&self.generate(self.prompts.tags_free(&joined, &self.tag_vocabulary)?)?);

        info!("Editorial run finished ({} quotes collected)", quotes.len());

        Ok(EditorialResult {
            titles,
            leads,
            tags_from_list,
            tags_free,
            quotes,
            output_text,
        })
    }

    fn generate(&self, user_prompt: String) -> Result<String> {
        self.generator.generate(SYSTEM_MESSAGE, &user_prompt)
    }
}

/// Splits a multi-line model response into items.
///
/// Raw split on newline: empty lines and bullet markers pass through
/// verbatim. Single-line responses yield one item.
fn split_lines(response: &str) -> Vec<String> {
    response.split('\n').map(String::from).collect()
}

use crate::error::{Error, Result};
use tera::{Context, Tera};

/// System instructions shared by every generation call.
///
/// Describes the assistant as an expert editor and proofreader with
/// native-level command of Polish.
pub const SYSTEM_MESSAGE: &str = "\
Jesteś doświadczonym redaktorem i korektorem. Umiesz tworzyć chwytliwe i ciekawe teksty.
Masz perfekcyjną znajomość języka polskiego.
Twoim zadaniem jest poprawienie błędów interpunkcyjnych, ortograficznych, gramatycznych
i składniowych oraz stylistycznych.";

/// Renders the fixed prompt templates for the generation pipeline.
///
/// Each template is a pure function of its inputs: the same chunk or
/// joined text always renders the same user prompt.
pub struct PromptEngine {
    tera: Tera,
}

impl PromptEngine {
    /// Creates a new prompt engine with all built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns an error if template registration fails.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template("proofread", include_str!("../templates/proofread.tera"))
            .map_err(|e| Error::template("proofread", e))?;
        tera.add_raw_template("heading", include_str!("../templates/heading.tera"))
            .map_err(|e| Error::template("heading", e))?;
        tera.add_raw_template("quotes", include_str!("../templates/quotes.tera"))
            .map_err(|e| Error::template("quotes", e))?;
        tera.add_raw_template("titles", include_str!("../templates/titles.tera"))
            .map_err(|e| Error::template("titles", e))?;
        tera.add_raw_template("leads", include_str!("../templates/leads.tera"))
            .map_err(|e| Error::template("leads", e))?;
        tera.add_raw_template(
            "tags_from_list",
            include_str!("../templates/tags_from_list.tera"),
        )
        .map_err(|e| Error::template("tags_from_list", e))?;
        tera.add_raw_template("tags_free", include_str!("../templates/tags_free.tera"))
            .map_err(|e| Error::template("tags_free", e))?;

        Ok(Self { tera })
    }

    /// Renders the proofreading prompt for one chunk.
    ///
    /// Instructs full grammar, spelling and style correction while
    /// preserving all content and paragraph structure.
    pub fn proofread(&self, chunk: &str) -> Result<String> {
        self.render_text("proofread", chunk)
    }

    /// Renders the heading prompt for one chunk (heading of at most 4 words).
    pub fn heading(&self, chunk: &str) -> Result<String> {
        self.render_text("heading", chunk)
    }

    /// Renders the quote-extraction prompt for one (possibly proofread) chunk.
    pub fn quotes(&self, chunk: &str) -> Result<String> {
        self.render_text("quotes", chunk)
    }

    /// Renders the title-generation prompt for the full joined text.
    pub fn titles(&self, text: &str) -> Result<String> {
        self.render_text("titles", text)
    }

    /// Renders the lead-generation prompt for the full joined text.
    pub fn leads(&self, text: &str) -> Result<String> {
        self.render_text("leads", text)
    }

    /// Renders the vocabulary-constrained tag prompt.
    pub fn tags_from_list(&self, text: &str, vocabulary: &[String]) -> Result<String> {
        self.render_tagged("tags_from_list", text, vocabulary)
    }

    /// Renders the free-tag prompt; the vocabulary is the exclusion list.
    pub fn tags_free(&self, text: &str, vocabulary: &[String]) -> Result<String> {
        self.render_tagged("tags_free", text, vocabulary)
    }

    fn render_text(&self, name: &str, text: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("text", text);

        self.tera
            .render(name, &context)
            .map_err(|e| Error::template(name, e))
    }

    fn render_tagged(&self, name: &str, text: &str, vocabulary: &[String]) -> Result<String> {
        let mut context = Context::new();
        context.insert("text", text);
        context.insert("tags", &vocabulary.join(", "));

        self.tera
            .render(name, &context)
            .map_err(|e| Error::template(name, e))
    }
}

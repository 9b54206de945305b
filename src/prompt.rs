use std::io::{self, BufRead, Write};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use crate::article::{Cover, Metadata};

static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A source of operator answers.
pub trait AnswerSource {
    /// Show `prompt` and return the answer with surrounding whitespace removed.
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Show an informational line.
    fn say(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Line-oriented answers: prompts go to `output`, answers come from `input`.
pub struct ConsoleAnswers<R, W> {
    input: R,
    output: W,
}

impl ConsoleAnswers<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleAnswers<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> AnswerSource for ConsoleAnswers<R, W> {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before all answers were given",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }
}

fn required(answers: &mut dyn AnswerSource, prompt: &str, retry: &str) -> io::Result<String> {
    let mut answer = answers.ask(prompt)?;
    while answer.is_empty() {
        answer = answers.ask(retry)?;
    }
    Ok(answer)
}

fn optional(answers: &mut dyn AnswerSource, prompt: &str) -> io::Result<Option<String>> {
    let answer = answers.ask(prompt)?;
    Ok(if answer.is_empty() { None } else { Some(answer) })
}

/// Comma-separated tags, each trimmed. A blank answer means no tags; blank items inside a
/// list are kept as empty strings.
pub fn parse_tags(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|t| t.trim().to_string()).collect()
}

/// Ask for every metadata field in order. `today` is the date default.
pub fn collect_metadata(answers: &mut dyn AnswerSource, today: NaiveDate) -> io::Result<Metadata> {
    answers.say("\nEnter article metadata (leave blank for defaults where allowed):")?;

    let title = required(answers, "Title: ", "Title (required): ")?;
    let id = required(
        answers,
        "ID (unique, for filename/link, e.g. descriptive-title): ",
        "ID (required): ",
    )?;
    if !ID_RE.is_match(&id) {
        warn!("ID {:?} has characters other than letters, digits, '-' and '_'; it is used as a filename and link", id);
    }

    let today = today.format(DATE_FORMAT).to_string();
    let date = optional(answers, &format!("Date [YYYY-MM-DD] (default {}): ", today))?
        .unwrap_or(today);
    if NaiveDate::parse_from_str(&date, DATE_FORMAT).is_err() {
        warn!("Date {:?} is not YYYY-MM-DD; the article list sorts by it", date);
    }

    let category = required(
        answers,
        "Category (e.g. News & Updates, Tutorials & Guides, Legal Corner, Opinion & Advocacy): ",
        "Category (required): ",
    )?;
    let author = required(answers, "Author: ", "Author (required): ")?;
    let excerpt = required(answers, "Short excerpt for index.json: ", "Excerpt (required): ")?;
    let tags = parse_tags(&answers.ask("Any tags? (comma-separated, or leave blank): ")?);
    let pdf = optional(answers, "PDF path/URL (leave blank if none): ")?;

    let cover = match optional(answers, "Cover image path/URL (leave blank if none): ")? {
        Some(src) => Some(Cover {
            src,
            alt: answers.ask("Cover image alt text (optional): ")?,
            caption: answers.ask("Cover image caption (optional): ")?,
        }),
        None => None,
    };

    Ok(Metadata {
        title,
        id,
        date,
        category,
        author,
        excerpt,
        tags,
        pdf,
        cover,
    })
}

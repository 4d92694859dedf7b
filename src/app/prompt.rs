//! Interactive selection
//!
//! A line-oriented picker: the operator sees a numbered page of entries, types a number
//! to choose one, `>` or `<` to turn the page, or text to narrow the list with a fuzzy
//! search. Filtering happens when the line is submitted, not per keystroke.

#![warn(clippy::all, rust_2018_idioms)]

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::app::config::DisplaySettings;

const NEXT_PAGE: &str = ">";
const PREVIOUS_PAGE: &str = "<";

/// Ways a prompt ends without an answer
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt aborted")]
    Aborted,

    #[error("nothing to select for {0}")]
    NoEntries(String),
}

/// Interactive choice and free-text input
pub trait Selector {
    /// Index into `items` of the chosen entry
    fn select(&mut self, label: &str, items: &[String]) -> Result<usize>;

    /// Free-text answer, asked again until `validate` accepts it
    fn input(
        &mut self,
        label: &str,
        validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String>;
}

/// Indices of `items` that fuzzy-match `query`, in their original order
pub fn filter_matches(matcher: &SkimMatcherV2, items: &[String], query: &str) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| query.is_empty() || matcher.fuzzy_match(item, query).is_some())
        .map(|(index, _)| index)
        .collect()
}

/// Shared flag that is set while a [`TerminalSelector`] waits for a line.
///
/// The interrupt handler reads it to tell a Ctrl-C at a prompt, which ends the
/// program, from one during pagination, which only cancels the drain.
#[derive(Debug, Clone, Default)]
pub struct PromptActivity(Arc<AtomicBool>);

impl PromptActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_waiting(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn set_waiting(&self, waiting: bool) {
        self.0.store(waiting, Ordering::SeqCst);
    }
}

/// [`Selector`] over a reader/writer pair, normally stdin and stderr
pub struct TerminalSelector<R, W> {
    input: R,
    output: W,
    settings: DisplaySettings,
    fuzzy_matcher: SkimMatcherV2,
    activity: PromptActivity,
}

impl<R: BufRead, W: Write> TerminalSelector<R, W> {
    pub fn new(input: R, output: W, settings: DisplaySettings) -> Self {
        Self {
            input,
            output,
            settings,
            fuzzy_matcher: SkimMatcherV2::default(),
            activity: PromptActivity::new(),
        }
    }

    /// Report waits for input through `activity`
    pub fn with_activity(mut self, activity: PromptActivity) -> Self {
        self.activity = activity;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn page_size(&self) -> usize {
        self.settings.page_size.max(1)
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();

        self.activity.set_waiting(true);
        let read = self.input.read_line(&mut line);
        self.activity.set_waiting(false);

        if read? == 0 {
            return Err(PromptError::Aborted.into());
        }
        Ok(line.trim().to_string())
    }

    /// One page of `matches` starting at `offset`, numbered by position in `matches`
    fn render_page(
        &mut self,
        label: &str,
        items: &[String],
        matches: &[usize],
        query: &str,
        offset: usize,
    ) -> Result<()> {
        if query.is_empty() {
            writeln!(self.output, "{label}")?;
        } else {
            writeln!(self.output, "{label} [filter: {query}]")?;
        }

        let page_size = self.page_size();
        let blank = " ".repeat(self.settings.select_icon.chars().count());

        for (position, &index) in matches.iter().enumerate().skip(offset).take(page_size) {
            let marker = if position == offset {
                self.settings.select_icon.as_str()
            } else {
                blank.as_str()
            };
            writeln!(self.output, "{marker} {:>2}) {}", position + 1, items[index])?;
        }

        let remaining = matches.len().saturating_sub(offset + page_size);
        if matches.is_empty() {
            writeln!(self.output, "  (no matches, press enter to clear the filter)")?;
        } else if remaining > 0 {
            writeln!(
                self.output,
                "  ... {remaining} more, {NEXT_PAGE} for the next page or type to narrow"
            )?;
        }
        if offset > 0 {
            writeln!(self.output, "  {PREVIOUS_PAGE} for the previous page")?;
        }

        write!(self.output, "Number, filter text, or enter for the marked entry: ")?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Selector for TerminalSelector<R, W> {
    fn select(&mut self, label: &str, items: &[String]) -> Result<usize> {
        if items.is_empty() {
            return Err(PromptError::NoEntries(label.to_string()).into());
        }

        let page_size = self.page_size();
        let mut query = String::new();
        let mut offset = 0;

        loop {
            let matches = filter_matches(&self.fuzzy_matcher, items, &query);
            self.render_page(label, items, &matches, &query, offset)?;

            let answer = self.read_answer()?;

            if answer.is_empty() {
                match matches.get(offset) {
                    Some(&index) => return Ok(index),
                    None => query.clear(),
                }
                offset = 0;
                continue;
            }

            if answer == NEXT_PAGE {
                if offset + page_size < matches.len() {
                    offset += page_size;
                }
                continue;
            }

            if answer == PREVIOUS_PAGE {
                offset = offset.saturating_sub(page_size);
                continue;
            }

            // Any listed position counts, including ones on other pages
            match answer.parse::<usize>() {
                Ok(number) if (1..=matches.len()).contains(&number) => {
                    return Ok(matches[number - 1]);
                }
                _ => {
                    query = answer;
                    offset = 0;
                }
            }
        }
    }

    fn input(
        &mut self,
        label: &str,
        validate: &dyn Fn(&str) -> Result<(), String>,
    ) -> Result<String> {
        loop {
            write!(self.output, "{label}: ")?;
            self.output.flush()?;

            let answer = self.read_answer()?;
            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(message) => writeln!(self.output, "  {message}")?,
            }
        }
    }
}

use crate::bench::selfcheck::{TieReport, ValidationReport};
use crate::bench::BenchReport;
use crate::engine::{Candidate, Correction, NeuronInfo};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

pub const PROMPT: &str = "\nCommand or word: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// How console output is rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    pub colored: bool,
    /// Show the length-difference column for candidates
    pub len_diff: bool,
    /// Show a progress spinner during serial passes
    pub progress: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonCandidate {
    word: String,
    score: f64,
    percent: i64,
    len_diff: i32,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonCorrection {
    word: String,
    words_touched: usize,
    candidates: Vec<JsonCandidate>,
}

/// Truncating percentage: `0.8734` is `87`.
pub fn percentage(value: f64) -> i64 {
    (value * 100.0) as i64
}

/// Render a word list the way diagnostics show it: `[a b c]`
pub fn word_list(words: &[String]) -> String {
    format!("[{}]", words.join(" "))
}

pub fn format_candidate(candidate: &Candidate, style: &Style) -> String {
    let pct = percentage(candidate.score);
    let word = if style.colored {
        candidate.word.green().to_string()
    } else {
        candidate.word.clone()
    };

    if style.len_diff {
        format!("  {}%\t{}\t{}", pct, candidate.len_diff, word)
    } else {
        format!("  {}%\t{}", pct, word)
    }
}

pub fn print_correction<W: Write>(out: &mut W, correction: &Correction, style: &Style) -> io::Result<()> {
    for candidate in &correction.candidates {
        writeln!(out, "{}", format_candidate(candidate, style))?;
    }
    Ok(())
}

pub fn print_words_touched<W: Write>(out: &mut W, words_touched: usize, word_count: usize) -> io::Result<()> {
    let ratio = if word_count == 0 {
        0.0
    } else {
        words_touched as f64 / word_count as f64
    };
    writeln!(out, "Words Touched = {}%", percentage(ratio))
}

pub fn print_correction_json<W: Write>(out: &mut W, word: &str, correction: &Correction) -> io::Result<()> {
    let output = JsonCorrection {
        word: word.to_string(),
        words_touched: correction.words_touched,
        candidates: correction
            .candidates
            .iter()
            .map(|c| JsonCandidate {
                word: c.word.clone(),
                score: c.score,
                percent: percentage(c.score),
                len_diff: c.len_diff,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).map_err(io::Error::other)?;
    writeln!(out, "{}", json)
}

pub fn ambiguity_line(word: &str, candidates: &[String], style: &Style) -> String {
    let word = if style.colored {
        word.yellow().bold().to_string()
    } else {
        word.to_string()
    };
    format!("Parallel validation:  '{}' could be '{}'", word, word_list(candidates))
}

pub fn print_bench_start<W: Write>(out: &mut W, letters: &str, strict_len: bool) -> io::Result<()> {
    writeln!(out, "Letters = '{}'; strict = {}", letters, strict_len)
}

pub fn print_bench_report<W: Write>(out: &mut W, report: &BenchReport, style: &Style) -> io::Result<()> {
    for (word, error) in &report.failures {
        if style.colored {
            writeln!(out, "{} '{}': {}", "Failed:".red().bold(), word, error)?;
        } else {
            writeln!(out, "Failed: '{}': {}", word, error)?;
        }
    }

    writeln!(
        out,
        "Scheduled {} words ({} skipped, {} rejected); {} ambiguous; {} dictionaries",
        report.scheduled,
        report.skipped,
        report.rejected,
        report.ambiguous.len(),
        report.handles_created
    )?;
    writeln!(
        out,
        "Elapsed time {:?}; concurrency {}",
        report.elapsed, report.concurrency
    )
}

pub fn print_validation<W: Write>(out: &mut W, report: &ValidationReport, style: &Style) -> io::Result<()> {
    for (word, candidates) in &report.miscorrections {
        let word = if style.colored {
            word.red().bold().to_string()
        } else {
            word.clone()
        };
        writeln!(out, "Miscorrection:  '{}' corrected to '{}'", word, word_list(candidates))?;
    }
    writeln!(
        out,
        "{} miscorrections in {} words",
        report.miscorrections.len(),
        report.checked
    )
}

pub fn print_ties<W: Write>(out: &mut W, report: &TieReport, noisy: bool, style: &Style) -> io::Result<()> {
    if noisy {
        for (word, candidates) in &report.ties {
            let word = if style.colored {
                word.yellow().to_string()
            } else {
                word.clone()
            };
            writeln!(out, "Tie:  '{}' could be '{}'", word, word_list(candidates))?;
        }
    }
    writeln!(
        out,
        "{} tied words; {} total ties; {} words checked",
        report.tied_words, report.total_ties, report.checked
    )
}

pub fn print_serial_bench<W: Write>(out: &mut W, report: &ValidationReport) -> io::Result<()> {
    writeln!(
        out,
        "Validated {} words; {} miscorrections; elapsed time {:?}",
        report.checked,
        report.miscorrections.len(),
        report.elapsed
    )
}

pub fn print_neurons<W: Write>(out: &mut W, word: &str, neurons: &[NeuronInfo]) -> io::Result<()> {
    writeln!(out, "neurons for '{}':", word)?;
    for neuron in neurons {
        writeln!(
            out,
            "  '{}'\t{}\t{}",
            neuron.key,
            neuron.size,
            word_list(&neuron.sample)
        )?;
    }
    Ok(())
}

pub fn print_index_sizes<W: Write>(out: &mut W, sizes: &[(usize, usize)]) -> io::Result<()> {
    writeln!(out, "size\tcount")?;
    for (size, count) in sizes {
        writeln!(out, "  {}\t{}", size, count)?;
    }
    Ok(())
}

/// Spinner on stderr for serial passes; hidden unless requested.
pub fn progress_bar(style: &Style, message: &'static str) -> ProgressBar {
    if !style.progress {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    if let Ok(template) = ProgressStyle::default_bar().template("{spinner:.cyan} {msg} {pos}/{len}") {
        pb.set_style(template);
    }
    pb.set_message(message);
    pb
}

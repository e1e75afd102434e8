use super::output::{self, OutputFormat, Style, PROMPT};
use crate::bench::{selfcheck, LetterFilter, ParallelBench};
use crate::engine::{Corrector, Loader};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Letter-filter character that turns on per-word output for the tie pass
pub const NOISY_MARK: char = '!';

/// Serial passes and `g` compare lengths strictly; plain lookups don't.
const SELF_CHECK_STRICT_LEN: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Turns console lines into actions.
///
/// Nothing is remembered between lines apart from what the engine itself
/// keeps (its accuracy). Plain words go to the shared handle; `g` fans out
/// over the benchmark pool.
pub struct Dispatcher<L: Loader, W: Write + Send> {
    engine: L::Handle,
    bench: ParallelBench<L>,
    style: Style,
    out: W,
}

impl<L: Loader, W: Write + Send> Dispatcher<L, W> {
    /// The benchmark pool follows the console engine's accuracy from here on.
    pub fn new(engine: L::Handle, bench: ParallelBench<L>, style: Style, out: W) -> Self {
        bench.set_accuracy(engine.accuracy());
        Self {
            engine,
            bench,
            style,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn prompt(&mut self) -> Result<()> {
        write!(self.out, "{}", PROMPT)?;
        self.out.flush()?;
        Ok(())
    }

    /// Route one console line: prefixed lines are commands, anything else
    /// is a word to correct. Blank lines do nothing.
    pub fn handle_line(&mut self, line: &str, prefix: char) -> Result<Flow> {
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        match line.strip_prefix(prefix) {
            Some(command) => self.dispatch(command),
            None => {
                self.correct(line.trim())?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Run one command: its first char selects the action, the trimmed rest
    /// is the argument.
    pub fn dispatch(&mut self, input: &str) -> Result<Flow> {
        let mut chars = input.chars();
        let Some(cmd) = chars.next() else {
            writeln!(self.out, "Say what?")?;
            return Ok(Flow::Continue);
        };
        let arg = chars.as_str().trim();

        match cmd {
            'a' => self.set_accuracy(arg)?,
            'b' => self.serial_bench(arg)?,
            'e' | 'q' => {
                writeln!(self.out, "Bye!")?;
                self.out.flush()?;
                return Ok(Flow::Quit);
            }
            'g' => self.parallel_bench(arg)?,
            'm' => writeln!(self.out, "max index = {}", self.engine.max_index_size())?,
            'p' => output::print_neurons(&mut self.out, arg, &self.engine.neuron(arg))?,
            's' => output::print_index_sizes(&mut self.out, &self.engine.index_sizes())?,
            't' => self.tie_pass(arg)?,
            'v' => self.validation_pass(arg)?,
            _ => writeln!(self.out, "say what?")?,
        }

        Ok(Flow::Continue)
    }

    /// Correct a single word against the shared dictionary.
    pub fn correct(&mut self, word: &str) -> Result<()> {
        let correction = self.engine.correct(word, false);
        output::print_correction(&mut self.out, &correction, &self.style)?;
        output::print_words_touched(&mut self.out, correction.words_touched, self.engine.word_count())?;
        Ok(())
    }

    /// Correct once for `--word`: candidates only, in `format`.
    pub fn correct_once(&mut self, word: &str, format: OutputFormat) -> Result<()> {
        let correction = self.engine.correct(word, false);
        match format {
            OutputFormat::Text => output::print_correction(&mut self.out, &correction, &self.style)?,
            OutputFormat::Json => output::print_correction_json(&mut self.out, word, &correction)?,
        }
        Ok(())
    }

    fn set_accuracy(&mut self, arg: &str) -> Result<()> {
        match self.engine.set_accuracy(arg) {
            Ok(()) => {
                let accuracy = self.engine.accuracy();
                self.bench.set_accuracy(accuracy);
                writeln!(self.out, "accuracy = {}%", output::percentage(accuracy))?;
            }
            Err(err) => writeln!(self.out, "{}", err)?,
        }
        Ok(())
    }

    fn serial_bench(&mut self, letters: &str) -> Result<()> {
        let words = self.engine.words();
        let progress = output::progress_bar(&self.style, "benchmarking");
        let report = selfcheck::validate(
            &mut self.engine,
            &words,
            letters,
            SELF_CHECK_STRICT_LEN,
            &progress,
        );
        output::print_serial_bench(&mut self.out, &report)?;
        Ok(())
    }

    fn validation_pass(&mut self, letters: &str) -> Result<()> {
        let words = self.engine.words();
        let progress = output::progress_bar(&self.style, "validating");
        let report = selfcheck::validate(
            &mut self.engine,
            &words,
            letters,
            SELF_CHECK_STRICT_LEN,
            &progress,
        );
        output::print_validation(&mut self.out, &report, &self.style)?;
        Ok(())
    }

    fn tie_pass(&mut self, arg: &str) -> Result<()> {
        let noisy = arg.contains(NOISY_MARK);
        let letters: String = arg.chars().filter(|&c| c != NOISY_MARK).collect();

        let words = self.engine.words();
        let progress = output::progress_bar(&self.style, "counting ties");
        let report = selfcheck::count_ties(
            &mut self.engine,
            &words,
            &letters,
            SELF_CHECK_STRICT_LEN,
            &progress,
        );
        output::print_ties(&mut self.out, &report, noisy, &self.style)?;
        Ok(())
    }

    fn parallel_bench(&mut self, letters: &str) -> Result<()> {
        let words = self.engine.words();
        let style = self.style;

        let shown = LetterFilter::new(letters);
        output::print_bench_start(&mut self.out, shown.letters(), SELF_CHECK_STRICT_LEN)?;
        self.out.flush()?;

        // first write error wins; later lines are dropped
        let sink: Mutex<(&mut W, Option<io::Error>)> = Mutex::new((&mut self.out, None));
        let report = self
            .bench
            .run(&words, letters, SELF_CHECK_STRICT_LEN, |word, candidates| {
                let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
                let (out, failed) = &mut *sink;
                if failed.is_none() {
                    let line = output::ambiguity_line(word, candidates, &style);
                    if let Err(err) = writeln!(out, "{}", line) {
                        *failed = Some(err);
                    }
                }
            });

        let (out, failed) = sink.into_inner().unwrap_or_else(PoisonError::into_inner);
        if let Some(err) = failed {
            return Err(err).context("Failed to write benchmark output");
        }
        output::print_bench_report(out, &report, &style)?;
        Ok(())
    }
}

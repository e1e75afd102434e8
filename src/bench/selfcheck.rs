//! Serial self-correction passes: every eligible word is corrected with
//! itself as the query, on the caller's thread and one shared handle.

use super::LetterFilter;
use crate::engine::Corrector;
use indicatif::ProgressBar;
use std::time::{Duration, Instant};

/// A word together with the candidates it corrected to.
pub type Finding = (String, Vec<String>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub checked: usize,
    /// Words missing from their own candidates
    pub miscorrections: Vec<Finding>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TieReport {
    pub checked: usize,
    /// Words with more than one candidate
    pub tied_words: usize,
    /// Candidates summed over those words
    pub total_ties: usize,
    pub ties: Vec<Finding>,
    pub elapsed: Duration,
}

fn eligible<'a>(words: &'a [String], letters: &str) -> Vec<&'a String> {
    let filter = LetterFilter::new(letters);
    words.iter().filter(|w| filter.matches(w)).collect()
}

/// Report every eligible word that does not correct to itself.
pub fn validate<C>(
    engine: &mut C,
    words: &[String],
    letters: &str,
    strict_len: bool,
    progress: &ProgressBar,
) -> ValidationReport
where
    C: Corrector + ?Sized,
{
    let start = Instant::now();
    let eligible = eligible(words, letters);
    progress.set_length(eligible.len() as u64);

    let mut report = ValidationReport::default();
    for word in eligible {
        let correction = engine.correct(word, strict_len);
        if !correction.contains(word) {
            report.miscorrections.push((word.clone(), correction.words()));
        }
        report.checked += 1;
        progress.inc(1);
    }

    progress.finish_and_clear();
    report.elapsed = start.elapsed();
    report
}

/// Count eligible words whose self-correction has more than one candidate,
/// whether or not the word itself is among them.
pub fn count_ties<C>(
    engine: &mut C,
    words: &[String],
    letters: &str,
    strict_len: bool,
    progress: &ProgressBar,
) -> TieReport
where
    C: Corrector + ?Sized,
{
    let start = Instant::now();
    let eligible = eligible(words, letters);
    progress.set_length(eligible.len() as u64);

    let mut report = TieReport::default();
    for word in eligible {
        let correction = engine.correct(word, strict_len);
        if correction.is_ambiguous() {
            report.tied_words += 1;
            report.total_ties += correction.candidates.len();
            report.ties.push((word.clone(), correction.words()));
        }
        report.checked += 1;
        progress.inc(1);
    }

    progress.finish_and_clear();
    report.elapsed = start.elapsed();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedEngine;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tie_pass_counts_teh() {
        let mut engine = ScriptedEngine::new(&["teh", "the"], &[("teh", &["teh", "the"][..])]);
        let report = count_ties(&mut engine, &words(&["teh", "the"]), "", true, &ProgressBar::hidden());

        assert_eq!(report.checked, 2);
        assert_eq!(report.tied_words, 1);
        assert_eq!(report.total_ties, 2);
        assert_eq!(report.ties, vec![("teh".to_string(), words(&["teh", "the"]))]);
    }

    #[test]
    fn test_validation_flags_definately() {
        let mut engine = ScriptedEngine::new(
            &["definately", "definitely"],
            &[("definately", &["definitely"][..])],
        );
        let report = validate(
            &mut engine,
            &words(&["definately", "definitely"]),
            "d",
            true,
            &ProgressBar::hidden(),
        );

        assert_eq!(report.checked, 2);
        assert_eq!(
            report.miscorrections,
            vec![("definately".to_string(), words(&["definitely"]))]
        );
    }

    #[test]
    fn test_ties_counted_when_word_not_among_candidates() {
        let mut engine = ScriptedEngine::new(&["abc"], &[("abc", &["abd", "abe", "abf"][..])]);
        let report = count_ties(&mut engine, &words(&["abc"]), "a", false, &ProgressBar::hidden());

        assert_eq!(report.tied_words, 1);
        assert_eq!(report.total_ties, 3);
    }

    #[test]
    fn test_passes_respect_filter() {
        let mut engine = ScriptedEngine::new(&[], &[("zed", &["zee"][..])]);
        let list = words(&["apple", "zed", "", "_zap"]);

        let report = validate(&mut engine, &list, "a", false, &ProgressBar::hidden());
        assert_eq!(report.checked, 1);
        assert!(report.miscorrections.is_empty());

        let report = validate(&mut engine, &list, "z", false, &ProgressBar::hidden());
        assert_eq!(report.checked, 2);
        assert_eq!(report.miscorrections.len(), 1);
    }
}

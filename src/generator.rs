// src/generator.rs

//! Question generation: draws an operand set for a category at a difficulty
//! level, fingerprints it, builds a collision-free option set, and avoids
//! recently served questions through a small FIFO buffer.

use std::collections::{HashSet, VecDeque};

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::constants::{
    DECIMAL_DELTA_MAX, DECIMAL_PLACES, DISTRACTOR_ATTEMPTS, INT_DELTA_MAX, RECENT_BUFFER_CAP,
    REGEN_ATTEMPTS, TABLE_MULTIPLIER_MAX, TABLE_MULTIPLIER_MIN,
};
use crate::difficulty::params_for;
use crate::error::GenerateError;
use crate::facts::round_dp;
use crate::models::{
    MathCategory, OptionValue, Question, QuestionOption, QuizConfig, BASE_CATEGORIES,
};

const PERCENT_CHOICES: [u32; 5] = [10, 20, 25, 50, 75];

/// Applies config overrides to a difficulty band and rejects degenerate
/// bounds before any draw can touch them.
fn resolve_range(
    params: crate::difficulty::LevelParams,
    config: &QuizConfig,
) -> Result<(u32, u32), GenerateError> {
    let min = config.min.unwrap_or(params.min);
    let max = config.max.unwrap_or(params.max);
    if min == 0 {
        return Err(GenerateError::NonPositiveRange);
    }
    if min > max {
        return Err(GenerateError::InvalidRange { min, max });
    }
    Ok((min, max))
}

/// One drawn question before option assembly.
struct Draw {
    id: String,
    prompt: String,
    correct: OptionValue,
    category: MathCategory,
}

/// Owns the RNG and the anti-repeat buffer. One generator per practice
/// session; the buffer is never persisted.
pub struct QuestionGenerator {
    rng: StdRng,
    recent: VecDeque<String>,
}

impl Default for QuestionGenerator {
    fn default() -> Self {
        QuestionGenerator::new()
    }
}

impl QuestionGenerator {
    pub fn new() -> Self {
        QuestionGenerator {
            rng: StdRng::from_entropy(),
            recent: VecDeque::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        QuestionGenerator {
            rng: StdRng::seed_from_u64(seed),
            recent: VecDeque::new(),
        }
    }

    /// Builds one question. Explicit `config` bounds win over the
    /// difficulty-derived band. A draw whose fingerprint sits in the
    /// recent buffer is redrawn a bounded number of times, then accepted
    /// anyway so latency stays bounded on tiny ranges.
    pub fn generate(
        &mut self,
        category: MathCategory,
        option_count: usize,
        config: &QuizConfig,
        level: u8,
    ) -> Result<Question, GenerateError> {
        if option_count == 0 {
            return Err(GenerateError::EmptyOptionCount);
        }

        let mut draw = self.draw(category, config, level)?;
        for attempt in 0..REGEN_ATTEMPTS {
            if !self.recent.contains(&draw.id) {
                break;
            }
            debug!(
                "[Generate] {} repeats within window (attempt {}), redrawing",
                draw.id,
                attempt + 1
            );
            draw = self.draw(category, config, level)?;
        }
        self.remember(draw.id.clone());

        let (options, correct_option_id) = self.build_options(draw.correct, option_count);
        debug!("[Generate] {} at level {}", draw.id, level);
        Ok(Question {
            id: draw.id,
            prompt: draw.prompt,
            options,
            correct_option_id,
            category: draw.category,
        })
    }

    fn remember(&mut self, id: String) {
        self.recent.push_back(id);
        while self.recent.len() > RECENT_BUFFER_CAP {
            let _ = self.recent.pop_front();
        }
    }

    // --- Drawing ---

    fn draw(
        &mut self,
        category: MathCategory,
        config: &QuizConfig,
        level: u8,
    ) -> Result<Draw, GenerateError> {
        match category {
            MathCategory::Mixed => {
                let picked = BASE_CATEGORIES[self.rng.gen_range(0..BASE_CATEGORIES.len())];
                self.draw(picked, config, level)
            }
            MathCategory::Tables => self.draw_tables(config, level),
            MathCategory::Squares => {
                let n = self.draw_operand(MathCategory::Squares, config, level)?;
                Ok(Draw {
                    id: format!("sq{n}"),
                    prompt: format!("{n}\u{b2} = ?"),
                    correct: OptionValue::Int((n as i64) * (n as i64)),
                    category: MathCategory::Squares,
                })
            }
            MathCategory::Cubes => {
                let n = self.draw_operand(MathCategory::Cubes, config, level)?;
                Ok(Draw {
                    id: format!("cb{n}"),
                    prompt: format!("{n}\u{b3} = ?"),
                    correct: OptionValue::Int((n as i64).pow(3)),
                    category: MathCategory::Cubes,
                })
            }
            MathCategory::Reciprocals => {
                let n = self.draw_operand(MathCategory::Reciprocals, config, level)?;
                Ok(Draw {
                    id: format!("rc{n}"),
                    prompt: format!("1/{n} = ?"),
                    correct: OptionValue::Decimal(round_dp(1.0 / n as f64, DECIMAL_PLACES)),
                    category: MathCategory::Reciprocals,
                })
            }
            MathCategory::Powers => self.draw_powers(config, level),
            MathCategory::Mental => self.draw_mental(config, level),
        }
    }

    /// Resolves the operand band for ranged categories and draws from it.
    fn draw_operand(
        &mut self,
        category: MathCategory,
        config: &QuizConfig,
        level: u8,
    ) -> Result<u32, GenerateError> {
        let (min, max) = resolve_range(params_for(category, level), config)?;
        Ok(self.rng.gen_range(min..=max))
    }

    fn draw_tables(&mut self, config: &QuizConfig, level: u8) -> Result<Draw, GenerateError> {
        let n = match config.table {
            Some(0) => return Err(GenerateError::ZeroTable),
            Some(table) => table,
            None => self.draw_operand(MathCategory::Tables, config, level)?,
        };
        let m = self
            .rng
            .gen_range(TABLE_MULTIPLIER_MIN..=TABLE_MULTIPLIER_MAX);
        Ok(Draw {
            id: format!("{n}x{m}"),
            prompt: format!("{n} \u{d7} {m} = ?"),
            correct: OptionValue::Int((n as i64) * (m as i64)),
            category: MathCategory::Tables,
        })
    }

    fn draw_powers(&mut self, config: &QuizConfig, level: u8) -> Result<Draw, GenerateError> {
        let params = params_for(MathCategory::Powers, level);
        let base = match config.base {
            Some(0) => return Err(GenerateError::ZeroBase),
            Some(base) => base,
            None => params.bases[self.rng.gen_range(0..params.bases.len())],
        };
        let (min, max) = resolve_range(params, config)?;
        let exp = self.rng.gen_range(min..=max);
        Ok(Draw {
            id: format!("pw{base}^{exp}"),
            prompt: format!("{base}^{exp} = ?"),
            correct: OptionValue::Int((base as i64).pow(exp)),
            category: MathCategory::Powers,
        })
    }

    fn draw_mental(&mut self, config: &QuizConfig, level: u8) -> Result<Draw, GenerateError> {
        let (min, max) = resolve_range(params_for(MathCategory::Mental, level), config)?;

        let draw = match self.rng.gen_range(0..4u8) {
            0 => {
                let a = self.rng.gen_range(min..=max);
                let b = self.rng.gen_range(min..=max);
                Draw {
                    id: format!("mm{a}+{b}"),
                    prompt: format!("{a} + {b} = ?"),
                    correct: OptionValue::Int(a as i64 + b as i64),
                    category: MathCategory::Mental,
                }
            }
            1 => {
                let a = self.rng.gen_range(min..=max);
                // Subtrahend stays below the minuend so results are positive.
                let b = self.rng.gen_range(0..a);
                Draw {
                    id: format!("mm{a}-{b}"),
                    prompt: format!("{a} - {b} = ?"),
                    correct: OptionValue::Int(a as i64 - b as i64),
                    category: MathCategory::Mental,
                }
            }
            2 => {
                let a = self.rng.gen_range(2..=(max / 3).max(9));
                let b = self.rng.gen_range(2..=9u32);
                Draw {
                    id: format!("mm{a}x{b}"),
                    prompt: format!("{a} \u{d7} {b} = ?"),
                    correct: OptionValue::Int(a as i64 * b as i64),
                    category: MathCategory::Mental,
                }
            }
            _ => {
                let p = PERCENT_CHOICES[self.rng.gen_range(0..PERCENT_CHOICES.len())];
                let base = 10 * self.rng.gen_range(1..=(max / 10).max(1));
                let raw = p as i64 * base as i64;
                let correct = if raw % 100 == 0 {
                    OptionValue::Int(raw / 100)
                } else {
                    OptionValue::Decimal(round_dp(raw as f64 / 100.0, DECIMAL_PLACES))
                };
                Draw {
                    id: format!("mm{p}%{base}"),
                    prompt: format!("{p}% of {base} = ?"),
                    correct,
                    category: MathCategory::Mental,
                }
            }
        };
        Ok(draw)
    }

    // --- Options ---

    fn build_options(
        &mut self,
        correct: OptionValue,
        count: usize,
    ) -> (Vec<QuestionOption>, String) {
        let mut values = vec![correct];
        values.extend(self.distractors(correct, count - 1));
        values.shuffle(&mut self.rng);

        let correct_label = correct.label();
        let mut correct_id = String::new();
        let options = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let id = format!("opt{}", i + 1);
                let label = v.label();
                if label == correct_label {
                    correct_id = id.clone();
                }
                QuestionOption {
                    id,
                    label,
                    value: *v,
                }
            })
            .collect();
        (options, correct_id)
    }

    /// Produces `count` wrong values near the correct one, all positive and
    /// pairwise distinct from each other and the correct value. Random
    /// offsets first; past the attempt budget, sequential offsets fill the
    /// remainder so narrow ranges cannot hang generation.
    fn distractors(&mut self, correct: OptionValue, count: usize) -> Vec<OptionValue> {
        let mut used: HashSet<String> = HashSet::new();
        let _ = used.insert(correct.label());
        let mut wrong = Vec::with_capacity(count);

        let mut attempts = 0;
        while wrong.len() < count && attempts < DISTRACTOR_ATTEMPTS {
            attempts += 1;
            let candidate = match correct {
                OptionValue::Int(c) => {
                    let delta = self.rng.gen_range(-INT_DELTA_MAX..=INT_DELTA_MAX);
                    if delta == 0 {
                        continue;
                    }
                    let v = c + delta;
                    if v <= 0 {
                        continue;
                    }
                    OptionValue::Int(v)
                }
                OptionValue::Decimal(c) => {
                    let delta = self.rng.gen_range(-DECIMAL_DELTA_MAX..=DECIMAL_DELTA_MAX);
                    if delta == 0 {
                        continue;
                    }
                    let v = round_dp(c * (1.0 + delta as f64 / 100.0), DECIMAL_PLACES);
                    if v <= 0.0 {
                        continue;
                    }
                    OptionValue::Decimal(v)
                }
            };
            if used.insert(candidate.label()) {
                wrong.push(candidate);
            }
        }

        // Sequential fallback: always terminates, labels strictly increase.
        let mut step: i64 = 1;
        while wrong.len() < count {
            let candidate = match correct {
                OptionValue::Int(c) => OptionValue::Int(c + step),
                OptionValue::Decimal(c) => {
                    OptionValue::Decimal(round_dp(c + step as f64 * 0.0001, DECIMAL_PLACES))
                }
            };
            if used.insert(candidate.label()) {
                wrong.push(candidate);
            }
            step += 1;
        }

        wrong
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn assert_well_formed(q: &Question, expected_count: usize) {
        assert_eq!(q.options.len(), expected_count);
        let mut labels = HashSet::new();
        for opt in &q.options {
            assert!(labels.insert(opt.label.clone()), "duplicate option {}", opt.label);
        }
        let matching = q
            .options
            .iter()
            .filter(|o| o.id == q.correct_option_id)
            .count();
        assert_eq!(matching, 1, "exactly one option must be the correct one");
    }

    #[test]
    fn every_category_yields_well_formed_questions() {
        let mut gen = QuestionGenerator::with_seed(7);
        let config = QuizConfig::default();
        let categories = [
            MathCategory::Tables,
            MathCategory::Squares,
            MathCategory::Cubes,
            MathCategory::Reciprocals,
            MathCategory::Powers,
            MathCategory::Mental,
            MathCategory::Mixed,
        ];
        for cat in categories {
            for level in 1..=5u8 {
                let q = gen.generate(cat, 4, &config, level).unwrap();
                assert_well_formed(&q, 4);
            }
        }
    }

    #[test]
    fn level_one_squares_stay_in_band() {
        let mut gen = QuestionGenerator::with_seed(11);
        let config = QuizConfig::default();
        for _ in 0..50 {
            let q = gen.generate(MathCategory::Squares, 4, &config, 1).unwrap();
            let n: i64 = q.id.strip_prefix("sq").unwrap().parse().unwrap();
            assert!((2..=10).contains(&n), "operand {n} outside level-1 band");
            let correct = q.correct_option().unwrap();
            assert_eq!(correct.value, OptionValue::Int(n * n));
        }
    }

    #[test]
    fn recent_window_suppresses_repeats() {
        // Level-5 squares span 49 ids, plenty for an 11-draw window. The
        // retry cap permits at most one repeat.
        let mut gen = QuestionGenerator::with_seed(23);
        let config = QuizConfig::default();
        let ids: Vec<String> = (0..11)
            .map(|_| {
                gen.generate(MathCategory::Squares, 4, &config, 5)
                    .unwrap()
                    .id
            })
            .collect();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for id in &ids {
            *counts.entry(id.as_str()).or_default() += 1;
        }
        let repeats: usize = counts.values().filter(|&&c| c > 1).count();
        assert!(repeats <= 1, "ids repeated too often: {ids:?}");
    }

    #[test]
    fn table_override_pins_the_multiplicand() {
        let mut gen = QuestionGenerator::with_seed(3);
        let config = QuizConfig {
            table: Some(7),
            ..QuizConfig::default()
        };
        for _ in 0..10 {
            let q = gen.generate(MathCategory::Tables, 4, &config, 1).unwrap();
            assert!(q.id.starts_with("7x"), "unexpected id {}", q.id);
        }
    }

    #[test]
    fn narrow_integer_ranges_fall_back_instead_of_hanging() {
        let mut gen = QuestionGenerator::with_seed(5);
        // correct = 1: only ten positive values within the random band, so
        // the sequential fallback must supply the rest.
        let wrong = gen.distractors(OptionValue::Int(1), 24);
        assert_eq!(wrong.len(), 24);
        let mut labels = HashSet::new();
        for v in &wrong {
            assert!(labels.insert(v.label()));
            match v {
                OptionValue::Int(i) => assert!(*i > 0),
                other => panic!("unexpected kind {other:?}"),
            }
        }
    }

    #[test]
    fn decimal_distractors_are_rounded_and_distinct() {
        let mut gen = QuestionGenerator::with_seed(13);
        let correct = OptionValue::Decimal(0.0833);
        let wrong = gen.distractors(correct, 3);
        assert_eq!(wrong.len(), 3);
        for v in &wrong {
            assert_ne!(v.label(), correct.label());
            match v {
                OptionValue::Decimal(d) => {
                    assert!(*d > 0.0);
                    assert_eq!(*d, round_dp(*d, DECIMAL_PLACES));
                }
                other => panic!("unexpected kind {other:?}"),
            }
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut gen = QuestionGenerator::with_seed(1);
        let config = QuizConfig {
            min: Some(30),
            max: Some(10),
            ..QuizConfig::default()
        };
        let err = gen.generate(MathCategory::Squares, 4, &config, 1);
        assert!(matches!(
            err,
            Err(GenerateError::InvalidRange { min: 30, max: 10 })
        ));
    }

    #[test]
    fn zero_bounds_are_rejected() {
        let mut gen = QuestionGenerator::with_seed(1);
        let config = QuizConfig {
            min: Some(0),
            max: Some(10),
            ..QuizConfig::default()
        };
        let err = gen.generate(MathCategory::Mental, 4, &config, 1);
        assert!(matches!(err, Err(GenerateError::NonPositiveRange)));

        let config = QuizConfig {
            base: Some(0),
            ..QuizConfig::default()
        };
        let err = gen.generate(MathCategory::Powers, 4, &config, 1);
        assert!(matches!(err, Err(GenerateError::ZeroBase)));
    }

    #[test]
    fn power_base_override_pins_the_base() {
        let mut gen = QuestionGenerator::with_seed(19);
        let config = QuizConfig {
            base: Some(4),
            ..QuizConfig::default()
        };
        for _ in 0..10 {
            let q = gen.generate(MathCategory::Powers, 4, &config, 2).unwrap();
            assert!(q.id.starts_with("pw4^"), "unexpected id {}", q.id);
        }
    }

    #[test]
    fn zero_option_count_is_rejected() {
        let mut gen = QuestionGenerator::with_seed(1);
        let err = gen.generate(MathCategory::Tables, 0, &QuizConfig::default(), 1);
        assert!(matches!(err, Err(GenerateError::EmptyOptionCount)));
    }

    #[test]
    fn mixed_delegates_to_a_base_category() {
        let mut gen = QuestionGenerator::with_seed(17);
        for _ in 0..20 {
            let q = gen
                .generate(MathCategory::Mixed, 4, &QuizConfig::default(), 3)
                .unwrap();
            assert!(BASE_CATEGORIES.contains(&q.category));
        }
    }
}

//! Rating statistics
//!
//! Every grouping is a reduction of [`RatingTally`] values, so the counts and
//! rating sums of a breakdown always add up to the parent's.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::domain::{Department, Feedback, Question, Rating};

/// Running count, sum and histogram of ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTally {
    pub count: u64,
    pub sum: i64,
    /// Index `n - 1` holds the number of `n` ratings.
    pub buckets: [u64; 5],
}

impl RatingTally {
    pub fn add(&mut self, rating: Rating) {
        let value = rating.value();
        self.count += 1;
        self.sum += i64::from(value);
        self.buckets[(value - Rating::MIN) as usize] += 1;
    }

    pub fn merge(&mut self, other: &RatingTally) {
        self.count += other.count;
        self.sum += other.sum;
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *mine += theirs;
        }
    }

    /// Mean rounded to two decimals, 0 when empty.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.sum as f64 / self.count as f64;
        (mean * 100.0).round() / 100.0
    }

    pub fn stats(&self) -> RatingStats {
        let distribution = (Rating::MIN..=Rating::MAX)
            .map(|r| (r.to_string(), self.buckets[(r - Rating::MIN) as usize]))
            .collect();
        RatingStats {
            count: self.count,
            average: self.average(),
            distribution,
        }
    }
}

impl<'a> FromIterator<&'a Feedback> for RatingTally {
    fn from_iter<I: IntoIterator<Item = &'a Feedback>>(iter: I) -> Self {
        let mut tally = RatingTally::default();
        for record in iter {
            tally.add(record.rating);
        }
        tally
    }
}

/// Count, mean and per-rating distribution (keys "1" through "5").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingStats {
    pub count: u64,
    pub average: f64,
    pub distribution: BTreeMap<String, u64>,
}

pub fn aggregate(records: &[Feedback]) -> RatingStats {
    records.iter().collect::<RatingTally>().stats()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStats {
    pub question_id: i32,
    pub text: String,
    pub stats: RatingStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStats {
    pub department_id: i32,
    pub name: String,
    pub total: RatingStats,
    pub questions: Vec<QuestionStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalStats {
    pub total: RatingStats,
    pub departments: Vec<DepartmentStats>,
}

fn tallies_by_question(records: &[Feedback]) -> HashMap<i32, RatingTally> {
    let mut by_question: HashMap<i32, RatingTally> = HashMap::new();
    for record in records {
        by_question
            .entry(record.question_id)
            .or_default()
            .add(record.rating);
    }
    by_question
}

fn department_tally(
    department: &Department,
    questions: &[Question],
    by_question: &HashMap<i32, RatingTally>,
) -> (RatingTally, DepartmentStats) {
    let mut total = RatingTally::default();
    let mut breakdown = Vec::new();

    for question in questions.iter().filter(|q| q.department_id == department.id) {
        let tally = by_question.get(&question.id).copied().unwrap_or_default();
        total.merge(&tally);
        breakdown.push(QuestionStats {
            question_id: question.id,
            text: question.text.clone(),
            stats: tally.stats(),
        });
    }

    let stats = DepartmentStats {
        department_id: department.id,
        name: department.name.clone(),
        total: total.stats(),
        questions: breakdown,
    };
    (total, stats)
}

/// Department total plus a per-question breakdown.
///
/// `records` may contain feedback for other departments' questions; only
/// records whose question belongs to `department` are counted.
pub fn by_department(
    department: &Department,
    questions: &[Question],
    records: &[Feedback],
) -> DepartmentStats {
    let by_question = tallies_by_question(records);
    department_tally(department, questions, &by_question).1
}

/// Total over `departments` plus a per-department breakdown.
pub fn global(departments: &[Department], questions: &[Question], records: &[Feedback]) -> GlobalStats {
    let by_question = tallies_by_question(records);
    let mut total = RatingTally::default();
    let mut breakdown = Vec::with_capacity(departments.len());

    for department in departments {
        let (tally, stats) = department_tally(department, questions, &by_question);
        total.merge(&tally);
        breakdown.push(stats);
    }

    GlobalStats {
        total: total.stats(),
        departments: breakdown,
    }
}

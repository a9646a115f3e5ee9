use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine::scoring;
use crate::quiz::category::Category;
use crate::quiz::lesson::LessonKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
}

impl LessonProgress {
    pub fn new(score: u32, total: u32) -> Self {
        Self {
            score,
            total,
            percentage: scoring::percentage(score, total),
        }
    }
}

/// Last completed result per category and lesson. Lesson keys are stored as
/// strings so numeric and named lessons share one JSON object shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressData {
    pub categories: BTreeMap<Category, BTreeMap<String, LessonProgress>>,
}

impl ProgressData {
    pub fn get(&self, category: Category, lesson: &LessonKey) -> Option<&LessonProgress> {
        self.categories
            .get(&category)
            .and_then(|lessons| lessons.get(&lesson.to_string()))
    }

    /// Stored percentage for a lesson, 0 when it has never been completed.
    pub fn percentage(&self, category: Category, lesson: &LessonKey) -> u32 {
        self.get(category, lesson).map_or(0, |p| p.percentage)
    }

    /// Record a completed session, replacing any earlier result for the lesson.
    pub fn record(&mut self, category: Category, lesson: &LessonKey, score: u32, total: u32) {
        self.categories
            .entry(category)
            .or_default()
            .insert(lesson.to_string(), LessonProgress::new(score, total));
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(BTreeMap::is_empty)
    }
}

pub const EXPORT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub quizdr_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub progress: ProgressData,
}

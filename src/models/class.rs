// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Class and class-request models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::EducationLevel;

/// Capacity assumed when a stored class predates the field.
pub const DEFAULT_CAPACITY: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub level: Vec<EducationLevel>,
}

impl Subject {
    /// Subject with no topics or levels.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            topics: Vec::new(),
            level: Vec::new(),
        }
    }

    /// Subject built from a bare id, displayed upper-cased.
    pub fn from_id(id: &str) -> Self {
        Self::new(id, id.replace('_', " ").to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl ClassStatus {
    /// Whether students may still join.
    pub fn is_open(self) -> bool {
        matches!(self, ClassStatus::Scheduled | ClassStatus::Ongoing)
    }
}

/// Denormalized tutor details carried on each class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorSummary {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub rating: f64,
}

/// A scheduled tutoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub subject: Subject,
    pub topic: String,
    pub title: String,
    pub description: String,
    pub tutor: TutorSummary,
    pub date_time: DateTime<Utc>,
    /// Length in minutes
    pub duration: u32,
    pub status: ClassStatus,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub enrolled_students: Vec<String>,
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

impl Class {
    pub fn is_enrolled(&self, user_id: &str) -> bool {
        self.enrolled_students.iter().any(|id| id == user_id)
    }

    pub fn is_full(&self) -> bool {
        self.enrolled_students.len() >= self.capacity as usize
    }

    pub fn spots_remaining(&self) -> u32 {
        self.capacity
            .saturating_sub(self.enrolled_students.len() as u32)
    }

    /// Whether `user_id` is a participant (enrolled student or the tutor).
    pub fn involves(&self, user_id: &str) -> bool {
        self.tutor.id == user_id || self.is_enrolled(user_id)
    }

    /// Case-insensitive match against title, description, subject name and topic.
    pub fn matches_query(&self, lowercase_query: &str) -> bool {
        [
            &self.title,
            &self.description,
            &self.subject.name,
            &self.topic,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(lowercase_query))
    }
}

/// A student-initiated ask for a class, aggregating interested students.
///
/// The number of interested students is always `requested_by().len()`;
/// the serialized `studentsRequested` field is computed on write and
/// ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ClassRequestRecord", into = "ClassRequestRecord")]
pub struct ClassRequest {
    pub id: String,
    pub subject: Subject,
    pub topic: String,
    pub date_requested: DateTime<Utc>,
    pub level: Option<EducationLevel>,
    requested_by: Vec<String>,
}

impl ClassRequest {
    pub fn new(
        id: String,
        subject: Subject,
        topic: String,
        requester: String,
        date_requested: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject,
            topic,
            date_requested,
            level: None,
            requested_by: vec![requester],
        }
    }

    pub fn requested_by(&self) -> &[String] {
        &self.requested_by
    }

    pub fn students_requested(&self) -> usize {
        self.requested_by.len()
    }

    /// Add a requester. Returns `false` if they had already asked.
    pub fn add_requester(&mut self, user_id: &str) -> bool {
        if self.requested_by.iter().any(|id| id == user_id) {
            return false;
        }
        self.requested_by.push(user_id.to_string());
        true
    }
}

/// Wire form of [`ClassRequest`].
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassRequestRecord {
    id: String,
    subject: Subject,
    topic: String,
    #[serde(default)]
    requested_by: Vec<String>,
    date_requested: DateTime<Utc>,
    #[serde(default)]
    students_requested: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    level: Option<EducationLevel>,
}

impl From<ClassRequestRecord> for ClassRequest {
    fn from(record: ClassRequestRecord) -> Self {
        let mut requested_by: Vec<String> = Vec::with_capacity(record.requested_by.len());
        for id in record.requested_by {
            if !requested_by.contains(&id) {
                requested_by.push(id);
            }
        }
        Self {
            id: record.id,
            subject: record.subject,
            topic: record.topic,
            date_requested: record.date_requested,
            level: record.level,
            requested_by,
        }
    }
}

impl From<ClassRequest> for ClassRequestRecord {
    fn from(request: ClassRequest) -> Self {
        Self {
            students_requested: request.requested_by.len(),
            id: request.id,
            subject: request.subject,
            topic: request.topic,
            requested_by: request.requested_by,
            date_requested: request.date_requested,
            level: request.level,
        }
    }
}

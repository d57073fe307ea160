// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Class, class-request and review operations.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::forms::{ClassForm, ClassRequestForm, ReviewForm};
use crate::models::review::average_rating;
use crate::models::{Class, ClassRequest, ClassStatus, Review, Subject, TutorSummary, User};
use chrono::Utc;
use validator::Validate;

/// Which stored collection a class lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Upcoming,
    Discover,
}

/// Data access for classes, requests and reviews.
#[derive(Clone)]
pub struct ClassService {
    db: Db,
}

impl ClassService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    // ─── Classes ─────────────────────────────────────────────────

    /// Upcoming classes where the user is enrolled or teaching.
    pub fn upcoming_classes(&self, user_id: &str) -> Result<Vec<Class>> {
        Ok(self
            .db
            .upcoming_classes()?
            .into_iter()
            .filter(|c| c.involves(user_id))
            .collect())
    }

    /// Look up a class in the upcoming collection, then the discover one.
    pub fn get_class(&self, class_id: &str) -> Result<Class> {
        self.all_classes()?
            .into_iter()
            .find(|c| c.id == class_id)
            .ok_or_else(|| AppError::NotFound("Class not found".to_string()))
    }

    /// Create a class taught by `tutor`.
    pub fn create_class(&self, tutor: &User, form: ClassForm) -> Result<Class> {
        form.validate()?;
        if !tutor.role.can_teach() {
            return Err(AppError::Forbidden(
                "Only tutors can create classes".to_string(),
            ));
        }

        let rating = self
            .db
            .get_tutor_profile(&tutor.id)?
            .map(|p| p.rating)
            .unwrap_or(0.0);

        let class = Class {
            id: format!("class_{}", uuid::Uuid::new_v4().simple()),
            subject: Subject::from_id(form.subject.trim()),
            topic: form
                .topic
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| form.title.clone()),
            title: form.title,
            description: form.description,
            tutor: TutorSummary {
                id: tutor.id.clone(),
                first_name: tutor.first_name.clone(),
                last_name: tutor.last_name.clone(),
                profile_picture: tutor.profile_picture.clone(),
                rating,
            },
            date_time: form.date_time,
            duration: form.duration,
            status: ClassStatus::Scheduled,
            capacity: form.capacity,
            enrolled_students: Vec::new(),
        };

        let mut classes = self.db.upcoming_classes()?;
        classes.push(class.clone());
        self.db.set_upcoming_classes(&classes)?;

        tracing::info!(class_id = %class.id, tutor_id = %tutor.id, "Class created");
        Ok(class)
    }

    /// Enroll a student. Enrolling twice is a no-op; a full class refuses
    /// new students.
    pub fn enroll(&self, class_id: &str, user_id: &str) -> Result<Class> {
        let (collection, mut classes) = self.collection_containing(class_id)?;
        let class = classes
            .iter_mut()
            .find(|c| c.id == class_id)
            .ok_or_else(|| AppError::NotFound("Class not found".to_string()))?;

        if class.is_enrolled(user_id) {
            tracing::debug!(class_id, user_id, "Already enrolled");
            return Ok(class.clone());
        }
        if !class.status.is_open() {
            return Err(AppError::BadRequest(format!(
                "Class is {:?} and no longer accepts students",
                class.status
            )));
        }
        if class.tutor.id == user_id {
            return Err(AppError::BadRequest(
                "Tutors cannot enroll in their own class".to_string(),
            ));
        }
        if class.is_full() {
            tracing::info!(class_id, capacity = class.capacity, "Enrollment refused: class full");
            return Err(AppError::ClassFull);
        }

        class.enrolled_students.push(user_id.to_string());
        let enrolled = class.clone();

        match collection {
            Collection::Upcoming => self.db.set_upcoming_classes(&classes)?,
            Collection::Discover => self.db.set_discover_classes(&classes)?,
        }

        tracing::info!(
            class_id,
            user_id,
            enrolled = enrolled.enrolled_students.len(),
            "Student enrolled"
        );
        Ok(enrolled)
    }

    /// Discover catalog, optionally restricted to the given subject ids.
    pub fn discover_classes(&self, subjects: &[String]) -> Result<Vec<Class>> {
        let classes = self.db.discover_classes()?;
        if subjects.is_empty() {
            return Ok(classes);
        }
        Ok(classes
            .into_iter()
            .filter(|c| subjects.iter().any(|s| *s == c.subject.id))
            .collect())
    }

    /// Case-insensitive search over every stored class.
    pub fn search_classes(&self, query: &str) -> Result<Vec<Class>> {
        let query = query.trim().to_lowercase();
        Ok(self
            .all_classes()?
            .into_iter()
            .filter(|c| c.matches_query(&query))
            .collect())
    }

    fn all_classes(&self) -> Result<Vec<Class>> {
        let mut classes = self.db.upcoming_classes()?;
        classes.extend(self.db.discover_classes()?);
        Ok(classes)
    }

    fn collection_containing(&self, class_id: &str) -> Result<(Collection, Vec<Class>)> {
        let upcoming = self.db.upcoming_classes()?;
        if upcoming.iter().any(|c| c.id == class_id) {
            return Ok((Collection::Upcoming, upcoming));
        }
        let discover = self.db.discover_classes()?;
        if discover.iter().any(|c| c.id == class_id) {
            return Ok((Collection::Discover, discover));
        }
        Err(AppError::NotFound("Class not found".to_string()))
    }

    // ─── Class Requests ──────────────────────────────────────────

    pub fn class_requests(&self) -> Result<Vec<ClassRequest>> {
        self.db.class_requests()
    }

    /// Open a new request on behalf of `student`, who becomes its first requester.
    pub fn create_class_request(
        &self,
        student: &User,
        form: ClassRequestForm,
    ) -> Result<ClassRequest> {
        form.validate()?;

        let mut request = ClassRequest::new(
            format!("request_{}", uuid::Uuid::new_v4().simple()),
            Subject::from_id(form.subject.trim()),
            form.topic.trim().to_string(),
            student.id.clone(),
            Utc::now(),
        );
        request.level = form.level;

        let mut requests = self.db.class_requests()?;
        requests.push(request.clone());
        self.db.set_class_requests(&requests)?;

        tracing::info!(request_id = %request.id, user_id = %student.id, "Class request created");
        Ok(request)
    }

    /// Add `user_id` to an existing request. Asking twice is a no-op.
    pub fn request_class(&self, request_id: &str, user_id: &str) -> Result<ClassRequest> {
        let mut requests = self.db.class_requests()?;
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| AppError::NotFound("Class request not found".to_string()))?;

        if !request.add_requester(user_id) {
            return Ok(request.clone());
        }
        let updated = request.clone();
        self.db.set_class_requests(&requests)?;

        tracing::info!(
            request_id,
            user_id,
            students_requested = updated.students_requested(),
            "Class requested"
        );
        Ok(updated)
    }

    // ─── Reviews ─────────────────────────────────────────────────

    pub fn reviews_for_tutor(&self, tutor_id: &str) -> Result<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .db
            .reviews()?
            .into_iter()
            .filter(|r| r.tutor_id == tutor_id)
            .collect();
        reviews.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(reviews)
    }

    /// Store a review and refresh the tutor's aggregate rating.
    pub fn create_review(&self, author: &User, form: ReviewForm) -> Result<Review> {
        form.validate()?;
        if form.tutor_id == author.id {
            return Err(AppError::BadRequest("You cannot review yourself".to_string()));
        }

        let review = Review {
            id: format!("review_{}", uuid::Uuid::new_v4().simple()),
            user_id: author.id.clone(),
            tutor_id: form.tutor_id,
            class_id: form.class_id,
            rating: form.rating,
            comment: form.comment.trim().to_string(),
            date: Utc::now(),
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            profile_picture: author.profile_picture.clone(),
        };

        let mut reviews = self.db.reviews()?;
        reviews.push(review.clone());
        self.db.set_reviews(&reviews)?;

        if let Some(mut profile) = self.db.get_tutor_profile(&review.tutor_id)? {
            let tutor_reviews: Vec<Review> = reviews
                .into_iter()
                .filter(|r| r.tutor_id == review.tutor_id)
                .collect();
            profile.rating = average_rating(&tutor_reviews);
            profile.total_reviews = tutor_reviews.len() as u32;
            self.db.set_tutor_profile(&profile)?;
        }

        tracing::info!(review_id = %review.id, tutor_id = %review.tutor_id, "Review created");
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            first_name: "Evelyn".to_string(),
            last_name: "Reed".to_string(),
            email: format!("{}@example.com", id),
            role,
            profile_picture: None,
        }
    }

    fn class_form(capacity: u32) -> ClassForm {
        ClassForm {
            title: "Introduction to Derivatives".to_string(),
            description: "Limits and basic differentiation rules.".to_string(),
            subject: "mathematics".to_string(),
            topic: None,
            date_time: "2025-04-21T11:00:00Z".parse().unwrap(),
            duration: 60,
            capacity,
        }
    }

    #[test]
    fn test_create_class_requires_tutor_role() {
        let service = ClassService::new(Db::in_memory());
        let err = service
            .create_class(&user("s1", Role::Student), class_form(5))
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_create_class_defaults() {
        let service = ClassService::new(Db::in_memory());
        let class = service
            .create_class(&user("t1", Role::Both), class_form(5))
            .unwrap();

        assert!(class.id.starts_with("class_"));
        assert_eq!(class.status, ClassStatus::Scheduled);
        assert!(class.enrolled_students.is_empty());
        assert_eq!(class.topic, class.title);
        assert_eq!(class.subject.name, "MATHEMATICS");
        assert_eq!(service.get_class(&class.id).unwrap(), class);
        assert_eq!(service.upcoming_classes("t1").unwrap().len(), 1);
    }

    #[test]
    fn test_enroll_is_idempotent() {
        let service = ClassService::new(Db::in_memory());
        let class = service
            .create_class(&user("t1", Role::Tutor), class_form(5))
            .unwrap();

        service.enroll(&class.id, "s1").unwrap();
        let again = service.enroll(&class.id, "s1").unwrap();
        assert_eq!(again.enrolled_students, vec!["s1".to_string()]);
        assert_eq!(service.upcoming_classes("s1").unwrap().len(), 1);
    }

    #[test]
    fn test_enroll_full_class_refused() {
        let service = ClassService::new(Db::in_memory());
        let class = service
            .create_class(&user("t1", Role::Tutor), class_form(1))
            .unwrap();

        service.enroll(&class.id, "s1").unwrap();
        let err = service.enroll(&class.id, "s2").unwrap_err();
        assert!(matches!(err, AppError::ClassFull));

        // An existing student re-enrolling is still fine
        assert!(service.enroll(&class.id, "s1").is_ok());
        assert_eq!(service.get_class(&class.id).unwrap().enrolled_students.len(), 1);
    }

    #[test]
    fn test_enroll_refused_for_closed_or_own_class() {
        let service = ClassService::new(Db::in_memory());
        let tutor = user("t1", Role::Tutor);
        let cancelled = service.create_class(&tutor, class_form(5)).unwrap();
        let completed = service.create_class(&tutor, class_form(5)).unwrap();

        let mut classes = service.db.upcoming_classes().unwrap();
        for class in classes.iter_mut() {
            if class.id == cancelled.id {
                class.status = ClassStatus::Cancelled;
            } else if class.id == completed.id {
                class.status = ClassStatus::Completed;
            }
        }
        service.db.set_upcoming_classes(&classes).unwrap();

        for id in [&cancelled.id, &completed.id] {
            let err = service.enroll(id, "s1").unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
            assert!(service.get_class(id).unwrap().enrolled_students.is_empty());
        }

        let own = service.create_class(&tutor, class_form(5)).unwrap();
        let err = service.enroll(&own.id, "t1").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("own class")));
    }

    #[test]
    fn test_enroll_unknown_class() {
        let service = ClassService::new(Db::in_memory());
        let err = service.enroll("missing", "s1").unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Class not found"));
    }

    #[test]
    fn test_request_class_keeps_count_in_sync() {
        let service = ClassService::new(Db::in_memory());
        let request = service
            .create_class_request(
                &user("s1", Role::Student),
                ClassRequestForm {
                    subject: "mathematics".to_string(),
                    topic: "Vectors".to_string(),
                    level: None,
                },
            )
            .unwrap();
        assert_eq!(request.requested_by().len(), 1);
        assert_eq!(request.students_requested(), 1);

        let updated = service.request_class(&request.id, "s2").unwrap();
        assert_eq!(updated.students_requested(), 2);
        let again = service.request_class(&request.id, "s2").unwrap();
        assert_eq!(again.students_requested(), 2);
    }
}

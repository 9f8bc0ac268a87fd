//! In-memory repository provider
//!
//! DashMap-backed stores for development and tests. Mirrors the relational
//! constraints the SQL schema enforces: unique user identifiers, unique
//! department names, one feedback row per (user, question), cascading
//! question deletes and restricted deletes of question creators.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::department::DepartmentRepository;
use crate::domain::feedback::FeedbackRepository;
use crate::domain::question::QuestionRepository;
use crate::domain::user::UserRepository;
use crate::domain::{
    Department, DepartmentChanges, DomainError, DomainResult, Feedback, FeedbackRevision,
    NewDepartment, NewFeedback, NewQuestion, NewUser, Question, QuestionChanges, QuestionFilter,
    RepositoryProvider, RoleKind, User, UserChanges, UserQuery,
};
use crate::shared::PaginatedResult;

pub struct InMemoryRepositoryProvider {
    users: DashMap<i32, User>,
    departments: DashMap<i32, Department>,
    questions: DashMap<i32, Question>,
    feedback: DashMap<i32, Feedback>,
    /// (user_id, question_id) -> feedback id
    feedback_index: DashMap<(i32, i32), i32>,
    user_counter: AtomicI32,
    department_counter: AtomicI32,
    question_counter: AtomicI32,
    feedback_counter: AtomicI32,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            departments: DashMap::new(),
            questions: DashMap::new(),
            feedback: DashMap::new(),
            feedback_index: DashMap::new(),
            user_counter: AtomicI32::new(1),
            department_counter: AtomicI32::new(1),
            question_counter: AtomicI32::new(1),
            feedback_counter: AtomicI32::new(1),
        }
    }

    fn next(counter: &AtomicI32) -> i32 {
        counter.fetch_add(1, Ordering::SeqCst)
    }

    fn user_conflict(&self, id: Option<i32>, username: &str, email: &str, sin: Option<&str>) -> Option<String> {
        self.users.iter().filter(|u| Some(u.id) != id).find_map(|u| {
            if u.username == username {
                Some(format!("Username '{}' is already in use", username))
            } else if u.email == email {
                Some(format!("Email '{}' is already in use", email))
            } else if sin.is_some() && u.sin_number.as_deref() == sin {
                Some("SIN number is already in use".to_string())
            } else {
                None
            }
        })
    }

    fn drop_feedback_where(&self, pred: impl Fn(&Feedback) -> bool) {
        let doomed: Vec<(i32, i32, i32)> = self
            .feedback
            .iter()
            .filter(|f| pred(f.value()))
            .map(|f| (f.id, f.user_id, f.question_id))
            .collect();
        for (id, user_id, question_id) in doomed {
            self.feedback.remove(&id);
            self.feedback_index.remove(&(user_id, question_id));
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn departments(&self) -> &dyn DepartmentRepository {
        self
    }

    fn questions(&self) -> &dyn QuestionRepository {
        self
    }

    fn feedback(&self) -> &dyn FeedbackRepository {
        self
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepositoryProvider {
    async fn create(&self, user: NewUser) -> DomainResult<User> {
        if let Some(conflict) =
            self.user_conflict(None, &user.username, &user.email, user.sin_number.as_deref())
        {
            return Err(DomainError::Conflict(conflict));
        }

        let now = Utc::now();
        let created = User {
            id: Self::next(&self.user_counter),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            year: user.year,
            sin_number: user.sin_number,
            is_active: true,
            department_id: user.department_id,
            primary_role: user.primary_role,
            roles: user.roles,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.email == email).map(|u| u.clone()))
    }

    async fn find_by_sin_number(&self, sin_number: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.sin_number.as_deref() == Some(sin_number))
            .map(|u| u.clone()))
    }

    async fn list(&self, query: UserQuery) -> DomainResult<PaginatedResult<User>> {
        let mut matching: Vec<User> = self
            .users
            .iter()
            .filter(|u| query.department_id.map_or(true, |d| u.department_id == Some(d)))
            .filter(|u| query.year.map_or(true, |y| u.year == Some(y)))
            .map(|u| u.clone())
            .collect();
        matching.sort_by_key(|u| u.id);

        let total = matching.len() as u64;
        let p = query.pagination;
        let items = matching
            .into_iter()
            .skip(p.offset() as usize)
            .take(p.limit as usize)
            .collect();
        Ok(PaginatedResult::new(items, total, p.page, p.limit))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> DomainResult<User> {
        let current = self
            .users
            .get(&id)
            .map(|u| u.clone())
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;

        let username = changes.username.unwrap_or(current.username.clone());
        let email = changes.email.unwrap_or(current.email.clone());
        let sin_number = changes.sin_number.or(current.sin_number.clone());
        if let Some(conflict) =
            self.user_conflict(Some(id), &username, &email, sin_number.as_deref())
        {
            return Err(DomainError::Conflict(conflict));
        }

        let updated = User {
            username,
            email,
            sin_number,
            full_name: changes.full_name.unwrap_or(current.full_name.clone()),
            year: changes.year.or(current.year),
            department_id: changes.department_id.or(current.department_id),
            is_active: changes.is_active.unwrap_or(current.is_active),
            updated_at: Utc::now(),
            ..current
        };
        self.users.insert(id, updated.clone());
        Ok(updated)
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> DomainResult<()> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_roles(&self, id: i32, roles: Vec<RoleKind>) -> DomainResult<User> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        user.primary_role = roles.first().copied();
        user.roles = roles;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        if !self.users.contains_key(&id) {
            return Err(DomainError::not_found("User", "id", id));
        }
        if self.questions.iter().any(|q| q.created_by == id) {
            return Err(DomainError::Conflict(
                "User still owns questions and cannot be deleted".into(),
            ));
        }
        self.drop_feedback_where(|f| f.user_id == id);
        self.users.remove(&id);
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn count_in_department(&self, department_id: i32) -> DomainResult<u64> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.department_id == Some(department_id))
            .count() as u64)
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryRepositoryProvider {
    async fn create(&self, department: NewDepartment) -> DomainResult<Department> {
        if self.departments.iter().any(|d| d.name == department.name) {
            return Err(DomainError::Conflict(format!(
                "Department '{}' already exists",
                department.name
            )));
        }

        let now = Utc::now();
        let created = Department {
            id: Self::next(&self.department_counter),
            name: department.name,
            description: department.description,
            status: department.status,
            associated_role: department.associated_role,
            created_at: now,
            updated_at: now,
        };
        self.departments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Department>> {
        Ok(self.departments.get(&id).map(|d| d.clone()))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Department>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.departments.get(id).map(|d| d.clone()))
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Department>> {
        Ok(self
            .departments
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.clone()))
    }

    async fn list(&self) -> DomainResult<Vec<Department>> {
        let mut all: Vec<Department> = self.departments.iter().map(|d| d.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn list_active(&self) -> DomainResult<Vec<Department>> {
        let mut active = DepartmentRepository::list(self).await?;
        active.retain(|d| d.is_active());
        Ok(active)
    }

    async fn update(&self, id: i32, changes: DepartmentChanges) -> DomainResult<Department> {
        if let Some(name) = &changes.name {
            if self.departments.iter().any(|d| d.id != id && &d.name == name) {
                return Err(DomainError::Conflict(format!(
                    "Department '{}' already exists",
                    name
                )));
            }
        }

        let mut department = self
            .departments
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Department", "id", id))?;
        if let Some(name) = changes.name {
            department.name = name;
        }
        if let Some(description) = changes.description {
            department.description = Some(description);
        }
        if let Some(status) = changes.status {
            department.status = status;
        }
        department.updated_at = Utc::now();
        Ok(department.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.departments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Department", "id", id))
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepositoryProvider {
    async fn create(&self, question: NewQuestion) -> DomainResult<Question> {
        let now = Utc::now();
        let created = Question {
            id: Self::next(&self.question_counter),
            text: question.text,
            year: question.year,
            department_id: question.department_id,
            role_target: question.role_target,
            status: question.status,
            created_by: question.created_by,
            created_at: now,
            updated_at: now,
        };
        self.questions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Question>> {
        Ok(self.questions.get(&id).map(|q| q.clone()))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Question>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.questions.get(id).map(|q| q.clone()))
            .collect())
    }

    async fn list(&self, filter: &QuestionFilter) -> DomainResult<Vec<Question>> {
        if filter.admits_nothing() {
            return Ok(Vec::new());
        }
        let mut matching: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| filter.matches(q))
            .map(|q| q.clone())
            .collect();
        matching.sort_by_key(|q| q.id);
        Ok(matching)
    }

    async fn list_by_departments(&self, department_ids: &[i32]) -> DomainResult<Vec<Question>> {
        let mut matching: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| department_ids.contains(&q.department_id))
            .map(|q| q.clone())
            .collect();
        matching.sort_by_key(|q| q.id);
        Ok(matching)
    }

    async fn update(&self, id: i32, changes: QuestionChanges) -> DomainResult<Question> {
        let mut question = self
            .questions
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Question", "id", id))?;
        if let Some(text) = changes.text {
            question.text = text;
        }
        if let Some(year) = changes.year {
            question.year = year;
        }
        if let Some(department_id) = changes.department_id {
            question.department_id = department_id;
        }
        if let Some(role_target) = changes.role_target {
            question.role_target = role_target;
        }
        if let Some(status) = changes.status {
            question.status = status;
        }
        question.updated_at = Utc::now();
        Ok(question.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        if self.questions.remove(&id).is_none() {
            return Err(DomainError::not_found("Question", "id", id));
        }
        self.drop_feedback_where(|f| f.question_id == id);
        Ok(())
    }

    async fn count_in_department(&self, department_id: i32) -> DomainResult<u64> {
        Ok(self
            .questions
            .iter()
            .filter(|q| q.department_id == department_id)
            .count() as u64)
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryRepositoryProvider {
    async fn find_by_user_and_question(
        &self,
        user_id: i32,
        question_id: i32,
    ) -> DomainResult<Option<Feedback>> {
        let Some(id) = self.feedback_index.get(&(user_id, question_id)).map(|e| *e) else {
            return Ok(None);
        };
        Ok(self.feedback.get(&id).map(|f| f.clone()))
    }

    async fn insert(&self, feedback: NewFeedback) -> DomainResult<Feedback> {
        match self
            .feedback_index
            .entry((feedback.user_id, feedback.question_id))
        {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "Feedback from user {} for question {} already exists",
                feedback.user_id, feedback.question_id
            ))),
            Entry::Vacant(slot) => {
                let record = Feedback {
                    id: Self::next(&self.feedback_counter),
                    user_id: feedback.user_id,
                    question_id: feedback.question_id,
                    rating: feedback.rating,
                    notes: feedback.notes,
                    submitted_at: feedback.submitted_at,
                };
                self.feedback.insert(record.id, record.clone());
                slot.insert(record.id);
                Ok(record)
            }
        }
    }

    async fn update(&self, id: i32, revision: FeedbackRevision) -> DomainResult<Feedback> {
        let mut record = self
            .feedback
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Feedback", "id", id))?;
        record.rating = revision.rating;
        record.notes = revision.notes;
        record.submitted_at = revision.submitted_at;
        Ok(record.clone())
    }

    async fn list_by_user(&self, user_id: i32) -> DomainResult<Vec<Feedback>> {
        let mut records: Vec<Feedback> = self
            .feedback
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.clone())
            .collect();
        records.sort_by_key(|f| f.id);
        Ok(records)
    }

    async fn list_by_question(&self, question_id: i32) -> DomainResult<Vec<Feedback>> {
        self.list_by_questions(&[question_id]).await
    }

    async fn list_by_questions(&self, question_ids: &[i32]) -> DomainResult<Vec<Feedback>> {
        let mut records: Vec<Feedback> = self
            .feedback
            .iter()
            .filter(|f| question_ids.contains(&f.question_id))
            .map(|f| f.clone())
            .collect();
        records.sort_by_key(|f| f.id);
        Ok(records)
    }

    async fn list_all(&self) -> DomainResult<Vec<Feedback>> {
        let mut records: Vec<Feedback> = self.feedback.iter().map(|f| f.clone()).collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}

//! Related records embedded in read responses
//!
//! Each table is read at most once per response, keyed by id. Callers run
//! their access checks first; the loader itself performs none.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::{Department, DomainResult, Feedback, Question, RepositoryProvider, User};

/// Which neighbours of a feedback record to load.
#[derive(Debug, Clone, Copy, Default)]
pub struct Include {
    pub questions: bool,
    pub users: bool,
}

impl Include {
    pub const QUESTIONS: Self = Self {
        questions: true,
        users: false,
    };
    pub const ALL: Self = Self {
        questions: true,
        users: true,
    };
}

#[derive(Debug, Default)]
pub struct Related {
    users: HashMap<i32, User>,
    questions: HashMap<i32, Question>,
    departments: HashMap<i32, Department>,
}

impl Related {
    pub fn user(&self, id: i32) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn question(&self, id: i32) -> Option<&Question> {
        self.questions.get(&id)
    }

    pub fn department(&self, id: Option<i32>) -> Option<&Department> {
        id.and_then(|id| self.departments.get(&id))
    }
}

fn distinct(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

fn by_id<T>(items: Vec<T>, id: impl Fn(&T) -> i32) -> HashMap<i32, T> {
    items.into_iter().map(|item| (id(&item), item)).collect()
}

pub struct RelatedLoader {
    repos: Arc<dyn RepositoryProvider>,
}

impl RelatedLoader {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn departments(&self, ids: impl IntoIterator<Item = i32>) -> DomainResult<HashMap<i32, Department>> {
        let ids = distinct(ids);
        let found = self.repos.departments().find_by_ids(&ids).await?;
        Ok(by_id(found, |d| d.id))
    }

    async fn assemble(
        &self,
        questions: HashMap<i32, Question>,
        users: HashMap<i32, User>,
    ) -> DomainResult<Related> {
        let department_ids = questions
            .values()
            .map(|q| q.department_id)
            .chain(users.values().filter_map(|u| u.department_id));
        let departments = self.departments(department_ids).await?;
        Ok(Related {
            users,
            questions,
            departments,
        })
    }

    async fn submitters(&self, records: &[Feedback]) -> DomainResult<HashMap<i32, User>> {
        let ids = distinct(records.iter().map(|f| f.user_id));
        Ok(by_id(self.repos.users().find_by_ids(&ids).await?, |u| u.id))
    }

    /// Questions and/or submitters of `records`, plus the departments both point at.
    pub async fn for_feedback(&self, records: &[Feedback], include: Include) -> DomainResult<Related> {
        let questions = if include.questions {
            let ids = distinct(records.iter().map(|f| f.question_id));
            by_id(self.repos.questions().find_by_ids(&ids).await?, |q| q.id)
        } else {
            HashMap::new()
        };
        let users = if include.users {
            self.submitters(records).await?
        } else {
            HashMap::new()
        };
        self.assemble(questions, users).await
    }

    /// Submitters of `records` plus the department of `question` and of each submitter.
    pub async fn for_question_feedback(
        &self,
        question: &Question,
        records: &[Feedback],
    ) -> DomainResult<Related> {
        let users = self.submitters(records).await?;
        let questions = HashMap::from([(question.id, question.clone())]);
        self.assemble(questions, users).await
    }

    pub async fn for_questions(&self, questions: &[Question]) -> DomainResult<Related> {
        Ok(Related {
            departments: self.departments(questions.iter().map(|q| q.department_id)).await?,
            ..Default::default()
        })
    }

    pub async fn for_users(&self, users: &[User]) -> DomainResult<Related> {
        Ok(Related {
            departments: self
                .departments(users.iter().filter_map(|u| u.department_id))
                .await?,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{
        LifecycleState, NewDepartment, NewQuestion, NewUser, Rating, RoleKind, RoleTarget,
    };
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    #[tokio::test]
    async fn loads_only_requested_neighbours() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let physics = repos
            .departments()
            .create(NewDepartment {
                name: "Physics".into(),
                description: None,
                status: LifecycleState::Active,
                associated_role: None,
            })
            .await
            .unwrap();
        let chemistry = repos
            .departments()
            .create(NewDepartment {
                name: "Chemistry".into(),
                description: None,
                status: LifecycleState::Active,
                associated_role: None,
            })
            .await
            .unwrap();
        let question = repos
            .questions()
            .create(NewQuestion {
                text: "Pace?".into(),
                year: 1,
                department_id: physics.id,
                role_target: RoleTarget::Both,
                status: LifecycleState::Active,
                created_by: 1,
            })
            .await
            .unwrap();
        let user = repos
            .users()
            .create(NewUser {
                username: "sam".into(),
                email: "sam@example.edu".into(),
                password_hash: "x".into(),
                full_name: "Sam".into(),
                year: Some(1),
                sin_number: None,
                department_id: Some(chemistry.id),
                primary_role: Some(RoleKind::Student),
                roles: vec![RoleKind::Student],
            })
            .await
            .unwrap();
        let record = Feedback {
            id: 1,
            user_id: user.id,
            question_id: question.id,
            rating: Rating::new(4).unwrap(),
            notes: None,
            submitted_at: Utc::now(),
        };

        let loader = RelatedLoader::new(repos);

        let questions_only = loader
            .for_feedback(std::slice::from_ref(&record), Include::QUESTIONS)
            .await
            .unwrap();
        assert!(questions_only.question(question.id).is_some());
        assert!(questions_only.user(user.id).is_none());
        assert_eq!(
            questions_only.department(Some(physics.id)).map(|d| d.name.as_str()),
            Some("Physics")
        );
        assert!(questions_only.department(Some(chemistry.id)).is_none());

        let both = loader.for_feedback(&[record], Include::ALL).await.unwrap();
        assert_eq!(both.user(user.id).map(|u| u.username.as_str()), Some("sam"));
        assert!(both.department(Some(chemistry.id)).is_some());
        assert!(both.department(None).is_none());
    }
}

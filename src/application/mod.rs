pub mod access;
pub mod catalog;
pub mod feedback;
pub mod identity;
pub mod related;

use std::sync::Arc;

use crate::domain::RepositoryProvider;

// Re-export key types for convenience
pub use access::{authorize, ensure, Action, AuthContext, ListingRequest, Verdict};
pub use catalog::{DepartmentService, QuestionService};
pub use feedback::FeedbackService;
pub use identity::{AdminBootstrap, IdentityResolver, IdentitySettings, UserService};
pub use related::{Include, Related, RelatedLoader};

/// Every application service, wired to one repository provider.
#[derive(Clone)]
pub struct AppServices {
    pub repos: Arc<dyn RepositoryProvider>,
    pub resolver: IdentityResolver,
    pub users: Arc<UserService>,
    pub departments: Arc<DepartmentService>,
    pub questions: Arc<QuestionService>,
    pub feedback: Arc<FeedbackService>,
    pub related: Arc<RelatedLoader>,
}

impl AppServices {
    pub fn new(repos: Arc<dyn RepositoryProvider>, settings: IdentitySettings) -> Self {
        Self {
            resolver: IdentityResolver::new(repos.clone(), settings.jwt.clone()),
            users: Arc::new(UserService::new(repos.clone(), settings)),
            departments: Arc::new(DepartmentService::new(repos.clone())),
            questions: Arc::new(QuestionService::new(repos.clone())),
            feedback: Arc::new(FeedbackService::new(repos.clone())),
            related: Arc::new(RelatedLoader::new(repos.clone())),
            repos,
        }
    }
}

//! Column enums shared by several tables

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{LifecycleState, RoleTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LifecycleStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "retired")]
    Retired,
}

impl From<LifecycleStatus> for LifecycleState {
    fn from(status: LifecycleStatus) -> Self {
        match status {
            LifecycleStatus::Draft => Self::Draft,
            LifecycleStatus::Active => Self::Active,
            LifecycleStatus::Retired => Self::Retired,
        }
    }
}

impl From<LifecycleState> for LifecycleStatus {
    fn from(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Draft => Self::Draft,
            LifecycleState::Active => Self::Active,
            LifecycleState::Retired => Self::Retired,
        }
    }
}

/// Audience column of `questions`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum QuestionRole {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "staff")]
    Staff,
    #[sea_orm(string_value = "both")]
    Both,
}

impl From<QuestionRole> for RoleTarget {
    fn from(role: QuestionRole) -> Self {
        match role {
            QuestionRole::Student => Self::Student,
            QuestionRole::Staff => Self::Staff,
            QuestionRole::Both => Self::Both,
        }
    }
}

impl From<RoleTarget> for QuestionRole {
    fn from(target: RoleTarget) -> Self {
        match target {
            RoleTarget::Student => Self::Student,
            RoleTarget::Staff => Self::Staff,
            RoleTarget::Both => Self::Both,
        }
    }
}

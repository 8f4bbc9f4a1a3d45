//! Help desk requests filed by users.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HelpRequestId, UserId};

/// Maximum length of a help request subject.
pub const HELP_SUBJECT_MAX: usize = 120;
/// Maximum length of a help request description.
pub const HELP_DESCRIPTION_MAX: usize = 4000;
/// Maximum stored length of a captured user agent.
pub const USER_AGENT_MAX: usize = 512;

/// Classification chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Payment,
    Account,
    Book,
    Technical,
    Other,
}

impl FromStr for IssueType {
    type Err = HelpRequestValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payment" => Ok(Self::Payment),
            "account" => Ok(Self::Account),
            "book" => Ok(Self::Book),
            "technical" => Ok(Self::Technical),
            "other" => Ok(Self::Other),
            _ => Err(HelpRequestValidationError::UnknownIssueType),
        }
    }
}

/// Handling state of a help request. New requests are always `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpRequestStatus {
    Open,
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpRequestValidationError {
    UnknownIssueType,
    EmptySubject,
    SubjectTooLong { max: usize },
    EmptyDescription,
    DescriptionTooLong { max: usize },
}

impl HelpRequestValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnknownIssueType => "issueType",
            Self::EmptySubject | Self::SubjectTooLong { .. } => "subject",
            Self::EmptyDescription | Self::DescriptionTooLong { .. } => "description",
        }
    }
}

impl fmt::Display for HelpRequestValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIssueType => write!(
                f,
                "issue type must be one of payment, account, book, technical or other"
            ),
            Self::EmptySubject => write!(f, "subject must not be empty"),
            Self::SubjectTooLong { max } => write!(f, "subject must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for HelpRequestValidationError {}

/// Validated content of a new help request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpRequestDraft {
    issue_type: IssueType,
    subject: String,
    description: String,
    user_agent: Option<String>,
}

impl HelpRequestDraft {
    pub fn try_new(
        issue_type: IssueType,
        subject: &str,
        description: &str,
    ) -> Result<Self, HelpRequestValidationError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(HelpRequestValidationError::EmptySubject);
        }
        if subject.chars().count() > HELP_SUBJECT_MAX {
            return Err(HelpRequestValidationError::SubjectTooLong {
                max: HELP_SUBJECT_MAX,
            });
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(HelpRequestValidationError::EmptyDescription);
        }
        if description.chars().count() > HELP_DESCRIPTION_MAX {
            return Err(HelpRequestValidationError::DescriptionTooLong {
                max: HELP_DESCRIPTION_MAX,
            });
        }
        Ok(Self {
            issue_type,
            subject: subject.to_owned(),
            description: description.to_owned(),
            user_agent: None,
        })
    }

    /// Attach the client's user agent, truncated to [`USER_AGENT_MAX`].
    #[must_use]
    pub fn with_user_agent(self, user_agent: Option<&str>) -> Self {
        let user_agent = user_agent
            .map(str::trim)
            .filter(|agent| !agent.is_empty())
            .map(|agent| agent.chars().take(USER_AGENT_MAX).collect());
        Self { user_agent, ..self }
    }

    pub fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// A user's support request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
    id: HelpRequestId,
    user_id: UserId,
    issue_type: IssueType,
    subject: String,
    description: String,
    status: HelpRequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl HelpRequest {
    /// File a new, open request.
    pub fn file(
        id: HelpRequestId,
        user_id: UserId,
        draft: HelpRequestDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        let HelpRequestDraft {
            issue_type,
            subject,
            description,
            user_agent,
        } = draft;
        Self {
            id,
            user_id,
            issue_type,
            subject,
            description,
            status: HelpRequestStatus::Open,
            user_agent,
            created_at,
        }
    }

    pub fn id(&self) -> &HelpRequestId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> HelpRequestStatus {
        self.status
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::types::{Age, MemberId, TeamId, Username};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub username: Username,
    pub age: Age,
    /// Team the member belongs to, if any.
    pub team_id: Option<TeamId>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMember {
    pub username: Username,
    pub age: Age,
    pub team_id: Option<TeamId>,
}

impl NewMember {
    #[must_use]
    pub fn new(username: Username, age: Age, team_id: Option<TeamId>) -> Self {
        Self {
            username,
            age,
            team_id,
        }
    }
}

/// Full replacement of a member's mutable fields.
///
/// `team_id: None` detaches the member from its team.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateMember {
    pub username: Username,
    pub age: Age,
    pub team_id: Option<TeamId>,
}

impl UpdateMember {
    #[must_use]
    pub fn new(username: Username, age: Age, team_id: Option<TeamId>) -> Self {
        Self {
            username,
            age,
            team_id,
        }
    }
}

use serde::Serialize;
use utoipa::ToSchema;

/// Public view of a user, as seen by a (possibly anonymous) viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Profile {
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    /// Whether the viewer follows this user. Always false for anonymous viewers.
    pub following: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileBody {
    pub profile: Profile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilesBody {
    pub profiles: Vec<Profile>,
}

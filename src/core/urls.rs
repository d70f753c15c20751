#[derive(Debug)]
pub struct ApiUrls;

impl ApiUrls {
    // Health
    pub const HEALTH: &'static str = "/api/health";

    // Identity
    pub const ME: &'static str = "/api/me";
    pub const USERS_TREE: &'static str = "/api/users/tree";

    // Committees
    pub const COMMITTEES: &'static str = "/api/committees";
    pub const COMMITTEE_BY_NAME: &'static str = "/api/committees/{name}";

    // Meets
    pub const MEETS_PREVIEW: &'static str = "/api/meets/preview";
}

use folio_common::security::SecurityService;

/// Identity fixed at startup, e.g. taken from the command line.
pub struct StaticSecurityService {
    user_name: String,
}

impl StaticSecurityService {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
        }
    }
}

impl SecurityService for StaticSecurityService {
    fn current_user_name(&self) -> String {
        self.user_name.clone()
    }
}

/// Gives access to the identity of the user the current request runs as.
pub trait SecurityService: Send + Sync {
    /// Display name of the currently authenticated user.
    fn current_user_name(&self) -> String;
}

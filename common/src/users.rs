/// Read/write access to user accounts, as far as the password reminder needs it.
pub trait UserDirectory: Send + Sync {
    /// Returns the mail address registered for `login`, or `None` if no such user exists.
    fn email_of(&self, login: &str) -> Option<String>;

    /// Replaces the password of `login` with `password`.
    fn replace_password(&self, login: &str, password: &str) -> anyhow::Result<()>;
}

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, bail, Context};
use folio_common::users::UserDirectory;

struct Account {
    email: String,
    password: Option<String>,
}

/// Process-local user directory.
///
/// Accounts are read from a file of `login=email` lines; replaced passwords
/// only live as long as the process.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, login: impl Into<String>, email: impl Into<String>) -> Self {
        self.insert(login, email);
        self
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let source = fs::read_to_string(path).with_context(|| format!("reading users file {}", path.display()))?;
        let directory = Self::new();
        for (idx, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((login, email)) = line.split_once('=') else {
                bail!("{}:{}: expected 'login=email'", path.display(), idx + 1);
            };
            directory.insert(login.trim(), email.trim());
        }
        Ok(directory)
    }

    pub fn insert(&self, login: impl Into<String>, email: impl Into<String>) {
        self.accounts().insert(
            login.into(),
            Account {
                email: email.into(),
                password: None,
            },
        );
    }

    pub fn has_password(&self, login: &str) -> bool {
        self.accounts()
            .get(login)
            .is_some_and(|account| account.password.is_some())
    }

    /// Each update is a single map operation, so a poisoned map is still consistent.
    fn accounts(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn email_of(&self, login: &str) -> Option<String> {
        self.accounts().get(login).map(|account| account.email.clone())
    }

    fn replace_password(&self, login: &str, password: &str) -> anyhow::Result<()> {
        let mut accounts = self.accounts();
        let account = accounts
            .get_mut(login)
            .ok_or_else(|| anyhow!("user '{login}' disappeared"))?;
        account.password = Some(password.to_string());
        Ok(())
    }
}

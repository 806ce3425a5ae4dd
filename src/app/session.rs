use tracing::info;

/// The one thing the viewer needs from an identity service: whether someone
/// is signed in, and a way to sign in or out.
pub trait SessionGate {
    fn is_active(&self) -> bool;
    fn user(&self) -> Option<&str>;
    fn sign_in(&mut self, user: &str);
    fn sign_out(&mut self);
}

/// In-memory session for a single local user.
#[derive(Debug, Default)]
pub struct LocalSession {
    user: Option<String>,
}

impl LocalSession {
    pub fn signed_in(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }
}

impl SessionGate for LocalSession {
    fn is_active(&self) -> bool {
        self.user.is_some()
    }

    fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    fn sign_in(&mut self, user: &str) {
        let user = user.trim();
        let user = if user.is_empty() { "local" } else { user };
        info!(user, "session started");
        self.user = Some(user.to_owned());
    }

    fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user, "session ended");
        }
    }
}

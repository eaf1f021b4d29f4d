use crate::advisor::Advisor;
use crate::app::error::{Result, StudyPilotError};
use crate::config::Config;
use crate::portal::{Credentials, PortalSession};

pub struct AppContext {
    pub config: Config,
    pub credentials: Credentials,
    pub advisor: Advisor,
}

impl AppContext {
    pub fn new() -> Result<Self> {
        let config = Config::load().map_err(|e| StudyPilotError::Config(e.to_string()))?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        let credentials = Credentials::from_env();
        let advisor = Advisor::new(config.advisor.clone());
        Self {
            config,
            credentials,
            advisor,
        }
    }

    /// Fresh browser session for one scrape. Each caller owns its own
    /// session; sessions are never shared.
    pub fn new_session(&self) -> PortalSession {
        PortalSession::new(self.config.portal.clone(), self.credentials.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::AuthState;

    #[test]
    fn test_context_from_default_config() {
        let ctx = AppContext::with_config(Config::default());
        assert!(ctx.config.portal.headless);
        let session = ctx.new_session();
        assert_eq!(session.state(), AuthState::Unauthenticated);
    }
}

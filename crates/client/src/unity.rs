use crate::{
    ApplicationService, CognitoAuth, DataService, Environment, ProcessService, Result, Session,
    Settings, TokenProvider,
};
use std::{fmt::Display, sync::Arc};

/// The entry point for working with the Unity platform.
///
/// Holds the [Session] that every service uses.
#[derive(Debug)]
pub struct Unity {
    session: Session,
}

impl Unity {
    /// Creates a new Unity client that authenticates with Cognito.
    ///
    /// Credentials come from the `UNITY_USER` and `UNITY_PASSWORD`
    /// environment variables. There is no interactive prompt: if either is
    /// unset this returns [Error::MissingCredentials](crate::Error::MissingCredentials).
    /// Use [Unity::with_token_provider] to authenticate some other way.
    pub fn new(environment: Environment, settings: Settings) -> Result<Unity> {
        let environment_settings = settings.environment(environment)?;
        let auth = CognitoAuth::from_env(
            environment_settings.client_id,
            environment_settings.auth_endpoint,
        )?;
        Unity::with_token_provider(environment, settings, auth)
    }

    /// Creates a new Unity client with a custom token provider.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds_client::{Environment, Settings, StaticToken, Unity};
    ///
    /// let settings = Settings::from_ini(
    ///     "[TEST]\nclient_id = a\nauth_endpoint = https://cognito.test\nunity_href = https://unity.test/\n",
    /// )
    /// .unwrap();
    /// let mut unity = Unity::with_token_provider(Environment::Test, settings, StaticToken::new("a-token")).unwrap();
    /// unity.set_project("sounder");
    /// unity.set_venue("dev");
    /// assert_eq!(
    ///     unity.process_service().unwrap().endpoint().as_str(),
    ///     "https://unity.test/sounder/dev/ades-wpst/"
    /// );
    /// ```
    pub fn with_token_provider(
        environment: Environment,
        settings: Settings,
        token_provider: impl TokenProvider + 'static,
    ) -> Result<Unity> {
        let session = Session::new(environment, settings, Arc::new(token_provider))?;
        Ok(Unity { session })
    }

    /// Sets the project used by venue-specific services.
    pub fn set_project(&mut self, project: impl ToString) {
        self.session.set_project(project);
    }

    /// Sets the venue used by venue-specific services.
    pub fn set_venue(&mut self, venue: impl ToString) {
        self.session.set_venue(venue);
    }

    /// Sets an explicit venue id, for venues that aren't `<project>/<venue>`.
    pub fn set_venue_id(&mut self, venue_id: impl ToString) {
        self.session.set_venue_id(venue_id);
    }

    /// Returns the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns a data service client.
    pub fn data_service(&self) -> Result<DataService<'_>> {
        DataService::new(&self.session)
    }

    /// Returns a processing service client.
    pub fn process_service(&self) -> Result<ProcessService<'_>> {
        ProcessService::new(&self.session)
    }

    /// Returns an application catalog client.
    pub fn application_service(&self) -> Result<ApplicationService<'_>> {
        ApplicationService::new(&self.session)
    }
}

impl Display for Unity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "UNITY CONFIGURATION")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "environment: {}", self.session.environment())?;
        writeln!(f)?;
        write!(f, "{}", self.session.settings())
    }
}

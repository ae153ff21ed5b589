use crate::{Environment, Error, Result, Settings, TokenProvider};
use reqwest::{
    Method, StatusCode,
    blocking::{Client, RequestBuilder, Response},
};
use std::sync::Arc;
use url::Url;

/// Shared state for calls to the Unity services.
///
/// A session knows which environment it's talking to, where the services
/// live, how to get a token, and which project and venue it's working in.
#[derive(Debug)]
pub struct Session {
    environment: Environment,
    settings: Settings,
    unity_href: Url,
    token_provider: Arc<dyn TokenProvider>,
    client: Client,
    project: Option<String>,
    venue: Option<String>,
    venue_id: Option<String>,
}

impl Session {
    /// Creates a new session.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use unity_sds_client::{Environment, Session, Settings, StaticToken};
    ///
    /// let settings = Settings::from_ini(
    ///     "[TEST]\nclient_id = a\nauth_endpoint = https://cognito.test\nunity_href = https://unity.test\n",
    /// )
    /// .unwrap();
    /// let session = Session::new(Environment::Test, settings, Arc::new(StaticToken::new("a-token"))).unwrap();
    /// assert_eq!(session.unity_href().as_str(), "https://unity.test/");
    /// ```
    pub fn new(
        environment: Environment,
        settings: Settings,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Result<Session> {
        let environment_settings = settings.environment(environment)?;
        let unity_href = directory_url(&environment_settings.unity_href)?;
        Ok(Session {
            environment,
            settings,
            unity_href,
            token_provider,
            client: Client::new(),
            project: None,
            venue: None,
            venue_id: None,
        })
    }

    /// Returns this session's environment.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns this session's settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns a setting from any section, e.g. a service endpoint.
    pub fn setting(&self, section: &str, key: &str) -> Option<&str> {
        self.settings.get(section, key)
    }

    /// Returns the root url of the Unity services, always ending in `/`.
    pub fn unity_href(&self) -> &Url {
        &self.unity_href
    }

    /// Returns a token from this session's provider.
    pub fn token(&self) -> Result<String> {
        self.token_provider.token()
    }

    /// Returns the project, if set.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Returns the venue, if set.
    pub fn venue(&self) -> Option<&str> {
        self.venue.as_deref()
    }

    /// Sets the project.
    pub fn set_project(&mut self, project: impl ToString) {
        self.project = Some(project.to_string());
    }

    /// Sets the venue.
    pub fn set_venue(&mut self, venue: impl ToString) {
        self.venue = Some(venue.to_string());
    }

    /// Sets the venue id, which wins over the project and venue.
    pub fn set_venue_id(&mut self, venue_id: impl ToString) {
        self.venue_id = Some(venue_id.to_string());
    }

    /// Returns the project and the venue, or an error if either isn't set.
    pub fn project_and_venue(&self) -> Result<(&str, &str)> {
        match (self.project.as_deref(), self.venue.as_deref()) {
            (Some(project), Some(venue)) => Ok((project, venue)),
            _ => Err(Error::MissingProjectOrVenue),
        }
    }

    /// Returns the venue id.
    ///
    /// This is the explicit venue id if one was set, else `<project>/<venue>`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use unity_sds_client::{Environment, Session, Settings, StaticToken};
    /// # let settings = Settings::from_ini(
    /// #     "[TEST]\nclient_id = a\nauth_endpoint = https://cognito.test\nunity_href = https://unity.test\n",
    /// # )
    /// # .unwrap();
    /// let mut session = Session::new(Environment::Test, settings, Arc::new(StaticToken::new("a-token"))).unwrap();
    /// assert!(session.venue_id().is_err());
    /// session.set_project("sounder");
    /// session.set_venue("dev");
    /// assert_eq!(session.venue_id().unwrap(), "sounder/dev");
    /// session.set_venue_id("sounder-dev");
    /// assert_eq!(session.venue_id().unwrap(), "sounder-dev");
    /// ```
    pub fn venue_id(&self) -> Result<String> {
        if let Some(venue_id) = self.venue_id.as_ref() {
            return Ok(venue_id.clone());
        }
        let (project, venue) = self.project_and_venue()?;
        Ok(format!("{project}/{venue}"))
    }

    /// Starts a GET request with this session's token.
    pub fn get(&self, url: Url) -> Result<RequestBuilder> {
        self.request(Method::GET, url)
    }

    /// Starts a POST request with this session's token.
    pub fn post(&self, url: Url) -> Result<RequestBuilder> {
        self.request(Method::POST, url)
    }

    /// Starts a PUT request with this session's token.
    pub fn put(&self, url: Url) -> Result<RequestBuilder> {
        self.request(Method::PUT, url)
    }

    /// Starts a PATCH request with this session's token.
    pub fn patch(&self, url: Url) -> Result<RequestBuilder> {
        self.request(Method::PATCH, url)
    }

    /// Starts a DELETE request with this session's token.
    pub fn delete(&self, url: Url) -> Result<RequestBuilder> {
        self.request(Method::DELETE, url)
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.token()?;
        tracing::debug!("{method} {url}");
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Sends a request, returning an error for any non-success status.
    pub fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send()?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(status_error(response))
        }
    }

    /// Sends a request, returning an error unless the response has exactly
    /// this status.
    pub fn send_expecting(&self, request: RequestBuilder, status: StatusCode) -> Result<Response> {
        let response = request.send()?;
        if response.status() == status {
            Ok(response)
        } else {
            Err(status_error(response))
        }
    }
}

fn status_error(response: Response) -> Error {
    let status = response.status();
    let url = response.url().to_string();
    let message = response.text().unwrap_or_default();
    tracing::warn!("{status} from {url}");
    Error::Status {
        status,
        url,
        message,
    }
}

/// Parses a url that other paths are joined onto.
fn directory_url(href: &str) -> Result<Url> {
    let mut url = Url::parse(href)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::{Session, directory_url};
    use crate::{Environment, Error, Settings, StaticToken};
    use mockito::Server;
    use reqwest::StatusCode;
    use std::sync::Arc;

    fn session(unity_href: &str) -> Session {
        let settings = Settings::from_ini(&format!(
            "[TEST]\nclient_id = a\nauth_endpoint = https://cognito.test\nunity_href = {unity_href}\n"
        ))
        .unwrap();
        Session::new(
            Environment::Test,
            settings,
            Arc::new(StaticToken::new("a-token")),
        )
        .unwrap()
    }

    #[test]
    fn directory() {
        assert_eq!(
            directory_url("https://unity.test/api").unwrap().as_str(),
            "https://unity.test/api/"
        );
        assert_eq!(
            directory_url("https://unity.test/api/").unwrap().as_str(),
            "https://unity.test/api/"
        );
    }

    #[test]
    fn missing_environment() {
        let settings = Settings::from_ini("[DEV]\nclient_id = a\n").unwrap();
        assert!(matches!(
            Session::new(
                Environment::Test,
                settings,
                Arc::new(StaticToken::new("a-token"))
            )
            .unwrap_err(),
            Error::MissingEnvironment(Environment::Test)
        ));
    }

    #[test]
    fn venue_id_needs_project_and_venue() {
        let mut session = session("https://unity.test/");
        session.set_project("sounder");
        assert!(matches!(
            session.venue_id().unwrap_err(),
            Error::MissingProjectOrVenue
        ));
    }

    #[test]
    fn bearer_token() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/hello")
            .match_header("authorization", "Bearer a-token")
            .with_status(200)
            .create();
        let session = session(&server.url());
        let url = session.unity_href().join("hello").unwrap();
        let _ = session.send(session.get(url).unwrap()).unwrap();
        mock.assert();
    }

    #[test]
    fn status() {
        let mut server = Server::new();
        let _mock = server
            .mock("DELETE", "/hello")
            .with_status(404)
            .with_body("no such thing")
            .create();
        let session = session(&server.url());
        let url = session.unity_href().join("hello").unwrap();
        let Error::Status {
            status,
            url,
            message,
        } = session.send(session.delete(url).unwrap()).unwrap_err()
        else {
            panic!("expected a status error");
        };
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(url.ends_with("/hello"));
        assert_eq!(message, "no such thing");
    }

    #[test]
    fn unexpected_success() {
        let mut server = Server::new();
        let _mock = server.mock("POST", "/hello").with_status(200).create();
        let session = session(&server.url());
        let url = session.unity_href().join("hello").unwrap();
        assert!(matches!(
            session
                .send_expecting(session.post(url).unwrap(), StatusCode::ACCEPTED)
                .unwrap_err(),
            Error::Status {
                status: StatusCode::OK,
                ..
            }
        ));
    }
}

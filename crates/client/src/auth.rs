//! Tokens for the Unity services.

use crate::{Error, Result};
use reqwest::{
    blocking::Client,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const AMZ_TARGET: &str = "X-Amz-Target";
const INITIATE_AUTH: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
const USER_PASSWORD_AUTH: &str = "USER_PASSWORD_AUTH";

/// Tokens are renewed this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Provides bearer tokens for requests to the Unity services.
pub trait TokenProvider: Debug + Send + Sync {
    /// Returns a token, fetching a new one if needed.
    fn token(&self) -> Result<String>;
}

/// A token that never changes.
///
/// # Examples
///
/// ```
/// use unity_sds_client::{StaticToken, TokenProvider};
///
/// let token = StaticToken::new("a-token");
/// assert_eq!(token.token().unwrap(), "a-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Creates a new static token.
    pub fn new(token: impl ToString) -> StaticToken {
        StaticToken(token.to_string())
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Fetches access tokens from AWS Cognito with a username and password.
///
/// The access token is cached until it expires.
pub struct CognitoAuth {
    client_id: String,
    endpoint: String,
    username: String,
    password: String,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

#[derive(Debug)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuth<'a> {
    auth_parameters: AuthParameters<'a>,
    auth_flow: &'a str,
    client_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "UPPERCASE")]
struct AuthParameters<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: AuthenticationResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CognitoError {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

impl CognitoAuth {
    /// Creates a new Cognito token provider.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds_client::CognitoAuth;
    ///
    /// let auth = CognitoAuth::new(
    ///     "a-client-id",
    ///     "https://cognito-idp.us-west-2.amazonaws.com",
    ///     "a-user",
    ///     "a-password",
    /// );
    /// ```
    pub fn new(
        client_id: impl ToString,
        endpoint: impl ToString,
        username: impl ToString,
        password: impl ToString,
    ) -> CognitoAuth {
        CognitoAuth {
            client_id: client_id.to_string(),
            endpoint: endpoint.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            client: Client::new(),
            cached: Mutex::new(None),
        }
    }

    /// Creates a new Cognito token provider with credentials from the
    /// `UNITY_USER` and `UNITY_PASSWORD` environment variables.
    ///
    /// There is no prompt. If either variable is unset this returns
    /// [Error::MissingCredentials].
    pub fn from_env(client_id: impl ToString, endpoint: impl ToString) -> Result<CognitoAuth> {
        let (username, password) = credentials(|name| std::env::var(name).ok())?;
        Ok(CognitoAuth::new(client_id, endpoint, username, password))
    }

    fn initiate_auth(&self) -> Result<CachedToken> {
        let body = InitiateAuth {
            auth_parameters: AuthParameters {
                username: &self.username,
                password: &self.password,
            },
            auth_flow: USER_PASSWORD_AUTH,
            client_id: &self.client_id,
        };
        tracing::debug!("requesting a token from {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static(AMZ_JSON))
            .header(AMZ_TARGET, HeaderValue::from_static(INITIATE_AUTH))
            .body(serde_json::to_vec(&body)?)
            .send()?;
        let status = response.status();
        let bytes = response.bytes()?;
        if !status.is_success() {
            let message = match serde_json::from_slice::<CognitoError>(&bytes) {
                Ok(error) => format!("{}: {}", error.kind, error.message),
                Err(_) => status.to_string(),
            };
            return Err(Error::Auth(message));
        }
        let response: InitiateAuthResponse = serde_json::from_slice(&bytes)?;
        let expires_in = response
            .authentication_result
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or_default();
        Ok(CachedToken {
            token: response.authentication_result.access_token,
            expires_at: Instant::now() + expires_in,
        })
    }
}

impl TokenProvider for CognitoAuth {
    fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = cached.as_ref()
            && Instant::now() + EXPIRY_MARGIN < token.expires_at
        {
            return Ok(token.token.clone());
        }
        let token = self.initiate_auth()?;
        let value = token.token.clone();
        *cached = Some(token);
        Ok(value)
    }
}

impl Debug for CognitoAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitoAuth")
            .field("client_id", &self.client_id)
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

fn credentials(var: impl Fn(&str) -> Option<String>) -> Result<(String, String)> {
    match (var("UNITY_USER"), var("UNITY_PASSWORD")) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(Error::MissingCredentials),
    }
}

#[cfg(test)]
mod tests {
    use super::{CognitoAuth, TokenProvider, credentials};
    use crate::Error;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn initiate_auth() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", "application/x-amz-json-1.1")
            .match_header(
                "x-amz-target",
                "AWSCognitoIdentityProviderService.InitiateAuth",
            )
            .match_body(Matcher::Json(json!({
                "AuthParameters": {"USERNAME": "a-user", "PASSWORD": "a-password"},
                "AuthFlow": "USER_PASSWORD_AUTH",
                "ClientId": "a-client-id"
            })))
            .with_status(200)
            .with_header("content-type", "application/x-amz-json-1.1")
            .with_body(
                json!({
                    "AuthenticationResult": {
                        "AccessToken": "an-access-token",
                        "ExpiresIn": 3600,
                        "TokenType": "Bearer"
                    },
                    "ChallengeParameters": {}
                })
                .to_string(),
            )
            .expect(1)
            .create();

        let auth = CognitoAuth::new("a-client-id", server.url(), "a-user", "a-password");
        assert_eq!(auth.token().unwrap(), "an-access-token");
        assert_eq!(auth.token().unwrap(), "an-access-token");
        mock.assert();
    }

    #[test]
    fn expired_tokens_are_renewed() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"AuthenticationResult": {"AccessToken": "short-lived", "ExpiresIn": 1}}"#)
            .expect(2)
            .create();

        let auth = CognitoAuth::new("a-client-id", server.url(), "a-user", "a-password");
        assert_eq!(auth.token().unwrap(), "short-lived");
        assert_eq!(auth.token().unwrap(), "short-lived");
        mock.assert();
    }

    #[test]
    fn bad_password() {
        let mut server = Server::new();
        let _mock = server
            .mock("POST", "/")
            .with_status(400)
            .with_body(
                r#"{"__type": "NotAuthorizedException", "message": "Incorrect username or password."}"#,
            )
            .create();

        let auth = CognitoAuth::new("a-client-id", server.url(), "a-user", "wrong");
        let Error::Auth(message) = auth.token().unwrap_err() else {
            panic!("expected an auth error");
        };
        assert_eq!(
            message,
            "NotAuthorizedException: Incorrect username or password."
        );
    }

    #[test]
    fn credentials_from_variables() {
        let vars = |name: &str| match name {
            "UNITY_USER" => Some("a-user".to_string()),
            "UNITY_PASSWORD" => Some("a-password".to_string()),
            _ => None,
        };
        assert_eq!(
            credentials(vars).unwrap(),
            ("a-user".to_string(), "a-password".to_string())
        );
    }

    #[test]
    fn missing_password() {
        let vars = |name: &str| (name == "UNITY_USER").then(|| "a-user".to_string());
        assert!(matches!(
            credentials(vars).unwrap_err(),
            Error::MissingCredentials
        ));
    }

    #[test]
    fn debug_hides_password() {
        let auth = CognitoAuth::new("a-client-id", "http://localhost", "a-user", "a-password");
        assert!(!format!("{auth:?}").contains("a-password"));
    }
}

use crate::Error;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// A Unity deployment.
///
/// Each environment has its own section in the [Settings](crate::Settings).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    /// The test environment.
    #[default]
    Test,

    /// The development environment.
    Dev,

    /// The operational environment.
    Ops,
}

impl Environment {
    /// Returns the name of this environment's settings section.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds_client::Environment;
    ///
    /// assert_eq!(Environment::Dev.section(), "DEV");
    /// ```
    pub fn section(&self) -> &'static str {
        match self {
            Environment::Test => "TEST",
            Environment::Dev => "DEV",
            Environment::Ops => "OPS",
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.section())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TEST" => Ok(Environment::Test),
            "DEV" => Ok(Environment::Dev),
            "OPS" => Ok(Environment::Ops),
            _ => Err(Error::InvalidEnvironment(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Environment;
    use crate::Error;
    use rstest::rstest;

    #[rstest]
    #[case("test", Environment::Test)]
    #[case("DEV", Environment::Dev)]
    #[case("Ops", Environment::Ops)]
    fn parse(#[case] s: &str, #[case] expected: Environment) {
        assert_eq!(s.parse::<Environment>().unwrap(), expected);
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            "prod".parse::<Environment>().unwrap_err(),
            Error::InvalidEnvironment(_)
        ));
    }

    #[test]
    fn default() {
        assert_eq!(Environment::default(), Environment::Test);
        assert_eq!(Environment::default().to_string(), "TEST");
    }
}

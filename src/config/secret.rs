//! Secure credential handling using the secrecy crate
//!
//! Platform passwords live in memory as `Secret<SecretValue>`: memory is
//! zeroed on drop and `Debug`/logging output is redacted. The value must be
//! explicitly exposed with `expose_secret()` when building the auth header.

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret string type used for passwords
pub type SecretString = Secret<SecretValue>;

/// Newtype wrapper for String that implements the traits `Secret` requires
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl From<&str> for SecretValue {
    fn from(s: &str) -> Self {
        SecretValue(s.to_string())
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret: SecretString = Secret::new(SecretValue::from("hunter2"));
        let debug = format!("{secret:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_secret_expose() {
        let secret: SecretString = Secret::new(SecretValue::from("hunter2"));
        assert_eq!(secret.expose_secret().as_ref(), "hunter2");
    }

    #[test]
    fn test_secret_deserialize() {
        #[derive(Deserialize)]
        struct Holder {
            password: SecretString,
        }

        let holder: Holder = serde_json::from_str(r#"{"password": "p"}"#).unwrap();
        assert_eq!(holder.password.expose_secret().as_ref(), "p");
    }
}

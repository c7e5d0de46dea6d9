//! Account profile service

use super::Account;
use crate::client::RestClient;
use crate::domain::Result;
use crate::gdc;
use serde_json::Value;

/// URI of the profile of the authenticated account
pub const CURRENT_ACCOUNT_URI: &str = "/gdc/account/profile/current";

/// Service for account profiles
#[derive(Debug, Clone)]
pub struct AccountService {
    client: RestClient,
}

impl AccountService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Fetches the profile of the authenticated account
    pub async fn get_current(&self) -> Result<Account> {
        let value: Value = self.client.get_json(CURRENT_ACCOUNT_URI).await?;
        gdc::unwrap(value)
    }
}

//! [`AccountFetcher`] backed by a Solana RPC node

use super::engine::{AccountFetcher, FetchedAccount};
use crate::error::PdakitResult;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

/// Fetches accounts over JSON-RPC. Retries and timeouts are the client's concern.
pub struct RpcAccountFetcher {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcAccountFetcher {
    pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
            commitment,
        }
    }
}

#[async_trait]
impl AccountFetcher for RpcAccountFetcher {
    async fn fetch_account(&self, address: &Pubkey) -> PdakitResult<Option<FetchedAccount>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await?;

        debug!(%address, slot = response.context.slot, found = response.value.is_some(), "fetched account");

        Ok(response.value.map(|account| FetchedAccount {
            owner: account.owner,
            data: account.data,
        }))
    }
}

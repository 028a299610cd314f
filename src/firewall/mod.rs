mod iptables;

pub use iptables::{parse_chains, Iptables};

use log::{debug, info};

use crate::error::FirewallError;

/// Packet-filter control plane, as far as chain bookkeeping goes
#[async_trait::async_trait]
pub trait ChainManager: Send + Sync {
    /// Names of every chain in `table`
    async fn list_chains(&self, table: &str) -> Result<Vec<String>, FirewallError>;

    /// Create an empty user chain; `AlreadyExists` if someone beat us to it
    async fn create_chain(&self, table: &str, chain: &str) -> Result<(), FirewallError>;
}

/// Create `chain` in `table` unless it is already there.
/// Returns true when the chain was created by this call.
pub async fn ensure_chain<M>(manager: &M, table: &str, chain: &str) -> Result<bool, FirewallError>
where
    M: ChainManager + ?Sized,
{
    let chains = manager.list_chains(table).await?;
    if chains.iter().any(|existing| existing == chain) {
        debug!("Chain {} already present in table {}", chain, table);
        return Ok(false);
    }
    match manager.create_chain(table, chain).await {
        Ok(()) => {
            info!("Created chain {} in table {}", chain, table);
            Ok(true)
        }
        // Created between our listing and our create
        Err(FirewallError::AlreadyExists(_)) => {
            debug!("Chain {} appeared in table {} while creating it", chain, table);
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

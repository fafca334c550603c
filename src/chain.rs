use std::{marker::PhantomData, sync::Arc, time::Duration};

use alloy::{
    network::{Ethereum, EthereumWallet, NetworkWallet, TransactionBuilder},
    primitives::{Address, TxHash, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::{client::ClientBuilder, types::TransactionRequest},
    sol,
    sol_types::SolCall,
    transports::{
        http::{Client, Http},
        layers::{RetryBackoffLayer, RetryBackoffService},
        Transport, TransportError,
    },
};
use alloy_chains::NamedChain;
use async_trait::async_trait;

use FreeMint::mintCall;

use crate::{
    account::Account,
    constants::{LINEA_CHAIN_ID, RECEIPT_POLL_INTERVAL_MS},
    errors::ChainError,
};

sol! {
    #[sol(rpc)]
    contract FreeMint {
        function mint() external payable;
        function balanceOf(address owner) external view returns (uint256);
    }
}

/// Chain operations needed to mint for one account.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn query_owned_count(&self, owner: Address) -> Result<U256, ChainError>;

    async fn submit_mint(&self, account: &Account) -> Result<TxHash, ChainError>;

    /// Resolves once `tx_hash` is buried under `confirmations` blocks.
    /// Waits indefinitely; callers bound it with their own timeout.
    async fn await_confirmation(&self, tx_hash: TxHash, confirmations: u64)
        -> Result<(), ChainError>;
}

/// RPC errors that carry a node response mean the node rejected the call;
/// everything else is treated as a connectivity problem.
fn classify_rejection(err: TransportError, rejected: fn(String) -> ChainError) -> ChainError {
    if err.is_error_resp() {
        rejected(err.to_string())
    } else {
        ChainError::network(err)
    }
}

fn read_error(err: TransportError) -> ChainError {
    classify_rejection(err, ChainError::Contract)
}

fn write_error(err: TransportError) -> ChainError {
    classify_rejection(err, ChainError::Revert)
}

// The block that includes the transaction counts as its first confirmation.
fn is_confirmed(head: u64, mined_in: u64, confirmations: u64) -> bool {
    head >= mined_in && head - mined_in + 1 >= confirmations
}

fn check_receipt_status(tx_hash: TxHash, status: bool) -> Result<(), ChainError> {
    if status {
        Ok(())
    } else {
        Err(ChainError::Revert(format!("{tx_hash} failed on-chain")))
    }
}

fn mint_request(
    contract_address: Address,
    from: Address,
    nonce: u64,
    max_fee_per_gas: u128,
    max_priority_fee_per_gas: u128,
) -> TransactionRequest {
    TransactionRequest::default()
        .with_max_fee_per_gas(max_fee_per_gas)
        .with_max_priority_fee_per_gas(max_priority_fee_per_gas)
        .with_to(contract_address)
        .with_value(U256::ZERO)
        .with_input(mintCall {}.abi_encode())
        .with_nonce(nonce)
        .with_chain_id(LINEA_CHAIN_ID)
        .with_from(from)
}

pub async fn send_mint_transaction<P, T, W>(
    provider: P,
    wallet: Arc<W>,
    contract_address: Address,
) -> Result<TxHash, ChainError>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
    W: NetworkWallet<Ethereum>,
{
    let eip1559_fees = provider
        .estimate_eip1559_fees(None)
        .await
        .map_err(write_error)?;
    let from = wallet.default_signer_address();

    let nonce = provider
        .get_transaction_count(from)
        .await
        .map_err(write_error)?;

    let mut tx_request = mint_request(
        contract_address,
        from,
        nonce,
        eip1559_fees.max_fee_per_gas,
        eip1559_fees.max_priority_fee_per_gas,
    );

    let gas_limit = provider
        .estimate_gas(&tx_request)
        .await
        .map_err(write_error)?;
    tx_request.set_gas_limit(gas_limit);

    let signed_transaction = tx_request
        .build(&wallet)
        .await
        .map_err(ChainError::contract)?;
    let pending_tx = provider
        .send_tx_envelope(signed_transaction)
        .await
        .map_err(write_error)?;

    Ok(*pending_tx.tx_hash())
}

pub struct AlloyChainClient<P, T> {
    provider: Arc<P>,
    contract_address: Address,
    poll_interval: Duration,
    _transport: PhantomData<fn() -> T>,
}

impl<P, T> AlloyChainClient<P, T>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    pub fn new(provider: Arc<P>, contract_address: Address) -> Self {
        Self {
            provider,
            contract_address,
            poll_interval: Duration::from_millis(RECEIPT_POLL_INTERVAL_MS),
            _transport: PhantomData,
        }
    }
}

pub fn connect(
    rpc_url: &str,
    contract_address: Address,
) -> eyre::Result<
    AlloyChainClient<
        impl Provider<RetryBackoffService<Http<Client>>, Ethereum>,
        RetryBackoffService<Http<Client>>,
    >,
> {
    let retry_layer = RetryBackoffLayer::new(10, 2, 500);

    let client = ClientBuilder::default()
        .layer(retry_layer)
        .transport(Http::<Client>::new(rpc_url.parse()?), false);

    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .with_chain(NamedChain::Linea)
        .on_provider(RootProvider::new(client));

    Ok(AlloyChainClient::new(Arc::new(provider), contract_address))
}

#[async_trait]
impl<P, T> ChainClient for AlloyChainClient<P, T>
where
    P: Provider<T, Ethereum> + 'static,
    T: Transport + Clone,
{
    async fn query_owned_count(&self, owner: Address) -> Result<U256, ChainError> {
        let contract_instance = FreeMint::new(self.contract_address, self.provider.clone());

        let balance = contract_instance
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| match e {
                alloy::contract::Error::TransportError(e) => read_error(e),
                other => ChainError::contract(other),
            })?
            ._0;

        Ok(balance)
    }

    async fn submit_mint(&self, account: &Account) -> Result<TxHash, ChainError> {
        let wallet: Arc<EthereumWallet> = account.wallet();

        send_mint_transaction(self.provider.clone(), wallet, self.contract_address).await
    }

    async fn await_confirmation(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<(), ChainError> {
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(ChainError::network)?;

            if let Some(receipt) = receipt {
                check_receipt_status(tx_hash, receipt.status())?;

                if let Some(mined_in) = receipt.block_number {
                    let head = self
                        .provider
                        .get_block_number()
                        .await
                        .map_err(ChainError::network)?;

                    tracing::trace!(%tx_hash, head, mined_in, confirmations, "receipt found");

                    if is_confirmed(head, mined_in, confirmations) {
                        return Ok(());
                    }
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

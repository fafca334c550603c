use std::{fmt, str::FromStr, sync::Arc};

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};

#[derive(Clone)]
pub struct Account {
    address: Address,
    wallet: Arc<EthereumWallet>,
}

impl Account {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self {
            address: signer.address(),
            wallet: Arc::new(EthereumWallet::new(signer)),
        }
    }

    pub fn from_private_key(private_key: &str) -> eyre::Result<Self> {
        let signer = PrivateKeySigner::from_str(private_key)?;
        Ok(Self::new(signer))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn wallet(&self) -> Arc<EthereumWallet> {
        self.wallet.clone()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
impl Account {
    pub fn random() -> Self {
        Self::new(PrivateKeySigner::random())
    }
}

//! Single-owner smart wallet controlled by the server key.

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::{SolCall, SolValue};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{interval, timeout};

use crate::blockchain::{BlockchainError, ChainReader, ConfirmationWatcher, TransactionReceipt, Wallet};
use crate::config::RelayerConfig;
use crate::indexer::{BalanceIndexer, IndexerResult};
use crate::relayer::{FeeOptions, FeeQuote, MetaTxnId, MetaTxnReceipt, MetaTxnStatus, Relayer, RelayerError};
use crate::smart_wallet::abi;
use crate::smart_wallet::encoding::{
    batch_digest, build_meta_call, encode_execute, encode_signature, encode_unsigned, sub_digest,
};
use crate::smart_wallet::types::{WalletConfig, WalletContext, WalletState, WalletTransaction};

/// Errors raised while dispatching through the wallet.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Relayer(#[from] RelayerError),

    /// The relayer gave up on the meta-transaction without mining it.
    #[error("Meta-transaction {id} dropped: {reason}")]
    Dropped { id: MetaTxnId, reason: String },

    /// The configured confirmation wait elapsed.
    #[error("Confirmation not received within {0:?}")]
    ConfirmationTimeout(Duration),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Polling and confirmation settings for transaction responses.
#[derive(Debug, Clone, Copy)]
pub struct WaitSettings {
    /// Interval between relayer receipt polls.
    pub relayer_poll: Duration,
    /// Interval between chain receipt polls.
    pub receipt_poll: Duration,
    /// Blocks required on top of the inclusion block, inclusive.
    pub confirmations: u32,
    /// Upper bound on the whole wait, `None` for no bound.
    pub timeout: Option<Duration>,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            relayer_poll: Duration::from_secs(1),
            receipt_poll: Duration::from_secs(2),
            confirmations: 1,
            timeout: None,
        }
    }
}

impl WaitSettings {
    /// Settings taken from the relayer and chain sections of the config.
    pub fn from_config(config: &RelayerConfig) -> Self {
        Self {
            relayer_poll: Duration::from_millis(config.relayer.poll_interval_ms),
            receipt_poll: Duration::from_millis(config.blockchain.receipt_poll_interval_ms),
            confirmations: config.blockchain.confirmation_blocks,
            timeout: config.relayer.confirmation_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Smart wallet abstraction over the server's signing key.
#[derive(Debug, Clone)]
pub struct SmartWallet {
    signer: Wallet,
    config: WalletConfig,
    context: WalletContext,
    address: Address,
}

impl SmartWallet {
    /// Wallet owned solely by `signer`, deployed (or deployable) under `context`.
    pub fn single_owner(signer: Wallet, context: WalletContext) -> Self {
        let config = WalletConfig::single_owner(signer.address());
        let address = counterfactual_address(&config, &context);
        Self {
            signer,
            config,
            context,
            address,
        }
    }

    /// Address of the wallet, whether deployed yet or not.
    pub fn get_address(&self) -> Address {
        self.address
    }

    /// Signers and threshold.
    pub fn wallet_config(&self) -> &WalletConfig {
        &self.config
    }

    /// Wallet contract deployment.
    pub fn wallet_context(&self) -> &WalletContext {
        &self.context
    }

    /// Hash of the wallet config; the CREATE2 salt.
    pub fn image_hash(&self) -> B256 {
        self.config.image_hash()
    }

    /// Native-token balance of the wallet.
    pub async fn get_balance(&self, indexer: &dyn BalanceIndexer) -> IndexerResult<U256> {
        indexer.ether_balance(self.address).await
    }

    /// Bind to a network connection and a relayer.
    pub fn connect(
        self,
        chain: Arc<dyn ChainReader>,
        relayer: Arc<dyn Relayer>,
        settings: WaitSettings,
    ) -> BoundWallet {
        BoundWallet {
            wallet: self,
            chain,
            relayer,
            settings,
        }
    }
}

/// CREATE2 address of the wallet proxy for `config`.
pub fn counterfactual_address(config: &WalletConfig, context: &WalletContext) -> Address {
    let mut init_code = context.wallet_creation_code.to_vec();
    init_code.extend_from_slice(context.main_module.into_word().as_slice());
    context
        .factory
        .create2_from_code(config.image_hash(), init_code)
}

/// Smart wallet bound to a chain and a relayer; able to dispatch.
#[derive(Clone)]
pub struct BoundWallet {
    wallet: SmartWallet,
    chain: Arc<dyn ChainReader>,
    relayer: Arc<dyn Relayer>,
    settings: WaitSettings,
}

impl BoundWallet {
    /// Address of the wallet.
    pub fn get_address(&self) -> Address {
        self.wallet.address
    }

    /// The unbound wallet.
    pub fn wallet(&self) -> &SmartWallet {
        &self.wallet
    }

    /// Chain ID signatures are bound to.
    pub fn chain_id(&self) -> u64 {
        self.chain.chain_id()
    }

    /// Whether the wallet proxy has been deployed.
    pub async fn is_deployed(&self) -> WalletResult<bool> {
        let code = self.chain.get_code(self.wallet.address).await?;
        Ok(!code.is_empty())
    }

    /// Next nonce of the default nonce space. An undeployed wallet starts at zero.
    pub async fn nonce(&self) -> WalletResult<U256> {
        let call = abi::readNonceCall { _space: U256::ZERO }.abi_encode();
        let output = self.chain.call(self.wallet.address, call.into()).await?;
        if output.is_empty() {
            return Ok(U256::ZERO);
        }
        U256::abi_decode(&output)
            .map_err(|e| BlockchainError::Decode(format!("readNonce: {}", e)).into())
    }

    /// Read deployment status and nonce concurrently.
    pub async fn state(&self) -> WalletResult<WalletState> {
        let (deployed, nonce) = tokio::try_join!(self.is_deployed(), self.nonce())?;
        Ok(WalletState {
            deployed,
            nonce: if deployed { nonce } else { U256::ZERO },
        })
    }

    /// Ask the relayer what it wants to be paid for `txns`.
    pub async fn fee_options(
        &self,
        txns: &[WalletTransaction],
        state: &WalletState,
    ) -> WalletResult<FeeOptions> {
        let input = encode_execute(txns, state.nonce, encode_unsigned(&self.wallet.config));
        let call = build_meta_call(
            self.wallet.address,
            &self.wallet.config,
            &self.wallet.context,
            state.deployed,
            input,
        );
        Ok(self.relayer.fee_options(&call).await?)
    }

    /// Sign `txns` and hand them to the relayer.
    pub async fn send_transaction(
        &self,
        txns: &[WalletTransaction],
        state: &WalletState,
        quote: Option<&FeeQuote>,
    ) -> WalletResult<TransactionResponse> {
        let signature = self.sign_batch(txns, state.nonce).await?;
        let input = encode_execute(txns, state.nonce, signature);
        let call = build_meta_call(
            self.wallet.address,
            &self.wallet.config,
            &self.wallet.context,
            state.deployed,
            input,
        );

        let id = self.relayer.send_meta_txn(&call, quote).await?;
        Ok(TransactionResponse {
            id,
            chain: self.chain.clone(),
            relayer: self.relayer.clone(),
            settings: self.settings,
        })
    }

    async fn sign_batch(&self, txns: &[WalletTransaction], nonce: U256) -> WalletResult<Bytes> {
        let digest = sub_digest(
            self.chain.chain_id(),
            self.wallet.address,
            batch_digest(nonce, txns),
        );
        let signature = self.wallet.signer.sign_message(digest.as_slice()).await?;
        Ok(encode_signature(
            &self.wallet.config,
            self.wallet.signer.address(),
            &signature,
        ))
    }
}

impl std::fmt::Debug for BoundWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundWallet")
            .field("address", &self.wallet.address)
            .field("chain_id", &self.chain.chain_id())
            .finish()
    }
}

/// Handle to a submitted meta-transaction.
pub struct TransactionResponse {
    id: MetaTxnId,
    chain: Arc<dyn ChainReader>,
    relayer: Arc<dyn Relayer>,
    settings: WaitSettings,
}

impl TransactionResponse {
    /// Relayer identifier of the submission.
    pub fn id(&self) -> &MetaTxnId {
        &self.id
    }

    /// Wait until the transaction is mined and confirmed.
    ///
    /// A relayer-reported failure becomes a receipt with status 0 so the
    /// caller's status check treats it like an on-chain revert.
    pub async fn wait(&self) -> WalletResult<TransactionReceipt> {
        match self.settings.timeout {
            Some(limit) => timeout(limit, self.wait_unbounded())
                .await
                .map_err(|_| WalletError::ConfirmationTimeout(limit))?,
            None => self.wait_unbounded().await,
        }
    }

    async fn wait_unbounded(&self) -> WalletResult<TransactionReceipt> {
        let meta = self.wait_for_relayer().await?;

        match (meta.status, meta.txn_hash) {
            (MetaTxnStatus::Succeeded, Some(hash)) => {
                let watcher = ConfirmationWatcher::new(
                    self.chain.as_ref(),
                    self.settings.confirmations,
                    self.settings.receipt_poll,
                );
                Ok(watcher.wait(hash).await?)
            }
            (MetaTxnStatus::Failed | MetaTxnStatus::PartiallyFailed, Some(hash)) => {
                tracing::warn!(
                    meta_txn_id = %self.id,
                    tx_hash = %hash,
                    revert_reason = meta.revert_reason.as_deref().unwrap_or("unknown"),
                    "Meta-transaction failed on chain"
                );
                Ok(TransactionReceipt {
                    transaction_hash: hash,
                    status: 0,
                    block_number: None,
                })
            }
            (status, _) => Err(WalletError::Dropped {
                id: self.id.clone(),
                reason: meta
                    .revert_reason
                    .unwrap_or_else(|| format!("relayer status {:?}", status)),
            }),
        }
    }

    async fn wait_for_relayer(&self) -> WalletResult<MetaTxnReceipt> {
        let mut ticker = interval(self.settings.relayer_poll);
        loop {
            ticker.tick().await;
            match self.relayer.meta_txn_receipt(&self.id).await? {
                Some(receipt) if !receipt.status.is_pending() => return Ok(receipt),
                Some(receipt) => {
                    tracing::debug!(meta_txn_id = %self.id, status = ?receipt.status, "Meta-transaction pending")
                }
                None => tracing::debug!(meta_txn_id = %self.id, "Meta-transaction not yet known"),
            }
        }
    }
}

impl std::fmt::Debug for TransactionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionResponse")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::BlockchainResult;
    use crate::relayer::RelayerResult;
    use crate::smart_wallet::MetaCall;
    use alloy::primitives::{address, keccak256, TxHash};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_address_is_create2_of_image_hash() {
        let signer = Wallet::from_private_key(TEST_KEY, 80001).unwrap();
        let context = WalletContext::default();
        let wallet = SmartWallet::single_owner(signer.clone(), context.clone());

        let mut init_code = context.wallet_creation_code.to_vec();
        init_code.extend_from_slice(&[0u8; 12]);
        init_code.extend_from_slice(context.main_module.as_slice());

        let mut preimage = vec![0xffu8];
        preimage.extend_from_slice(context.factory.as_slice());
        preimage.extend_from_slice(wallet.wallet_config().image_hash().as_slice());
        preimage.extend_from_slice(keccak256(&init_code).as_slice());
        let expected = Address::from_slice(&keccak256(&preimage)[12..]);

        assert_eq!(wallet.get_address(), expected);
    }

    #[test]
    fn test_address_depends_on_owner_and_context() {
        let a = Wallet::from_private_key(TEST_KEY, 1).unwrap();
        let b = Wallet::from_private_key(
            "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
            1,
        )
        .unwrap();
        let context = WalletContext::default();

        let wallet_a = SmartWallet::single_owner(a.clone(), context.clone());
        assert_ne!(
            wallet_a.get_address(),
            SmartWallet::single_owner(b, context.clone()).get_address()
        );

        let other_factory = WalletContext {
            factory: address!("0000000000000000000000000000000000000abc"),
            ..context
        };
        assert_ne!(
            wallet_a.get_address(),
            SmartWallet::single_owner(a, other_factory).get_address()
        );
    }

    #[test]
    fn test_wait_settings_default_has_no_timeout() {
        let settings = WaitSettings::default();
        assert!(settings.timeout.is_none());
        assert_eq!(settings.confirmations, 1);
    }

    #[test]
    fn test_wait_settings_from_config() {
        let mut config = RelayerConfig::default();
        config.relayer.poll_interval_ms = 250;
        config.relayer.confirmation_timeout_secs = Some(90);
        config.blockchain.confirmation_blocks = 3;

        let settings = WaitSettings::from_config(&config);
        assert_eq!(settings.relayer_poll, Duration::from_millis(250));
        assert_eq!(settings.confirmations, 3);
        assert_eq!(settings.timeout, Some(Duration::from_secs(90)));
    }

    struct StubChain {
        deployed: bool,
    }

    #[async_trait]
    impl ChainReader for StubChain {
        fn chain_id(&self) -> u64 {
            80001
        }

        async fn get_code(&self, _address: Address) -> BlockchainResult<Bytes> {
            Ok(if self.deployed {
                Bytes::from_static(&[0x60])
            } else {
                Bytes::new()
            })
        }

        async fn call(&self, _to: Address, _data: Bytes) -> BlockchainResult<Bytes> {
            // A deployed wallet reports nonce 5.
            Ok(if self.deployed {
                U256::from(5).abi_encode().into()
            } else {
                Bytes::new()
            })
        }

        async fn get_block_number(&self) -> BlockchainResult<u64> {
            Ok(3)
        }

        async fn get_transaction_receipt(
            &self,
            tx_hash: TxHash,
        ) -> BlockchainResult<Option<TransactionReceipt>> {
            Ok(Some(TransactionReceipt {
                transaction_hash: tx_hash,
                status: 1,
                block_number: Some(3),
            }))
        }
    }

    /// Relayer that answers every receipt poll with the same receipt.
    struct StubRelayer {
        receipt: Option<MetaTxnReceipt>,
        sent: Mutex<Vec<MetaCall>>,
    }

    impl StubRelayer {
        fn settling(status: MetaTxnStatus, txn_hash: Option<TxHash>) -> Self {
            Self {
                receipt: Some(MetaTxnReceipt {
                    id: MetaTxnId("m-1".to_string()),
                    status,
                    revert_reason: None,
                    txn_hash,
                }),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Relayer for StubRelayer {
        async fn fee_options(&self, _call: &MetaCall) -> RelayerResult<FeeOptions> {
            Ok(FeeOptions::default())
        }

        async fn send_meta_txn(
            &self,
            call: &MetaCall,
            _quote: Option<&FeeQuote>,
        ) -> RelayerResult<MetaTxnId> {
            self.sent.lock().unwrap().push(call.clone());
            Ok(MetaTxnId("m-1".to_string()))
        }

        async fn meta_txn_receipt(&self, _id: &MetaTxnId) -> RelayerResult<Option<MetaTxnReceipt>> {
            Ok(self.receipt.clone())
        }
    }

    fn settings(limit: Option<Duration>) -> WaitSettings {
        WaitSettings {
            relayer_poll: Duration::from_millis(5),
            receipt_poll: Duration::from_millis(5),
            confirmations: 1,
            timeout: limit,
        }
    }

    fn bound(deployed: bool, relayer: Arc<StubRelayer>, limit: Option<Duration>) -> BoundWallet {
        let signer = Wallet::from_private_key(TEST_KEY, 80001).unwrap();
        SmartWallet::single_owner(signer, WalletContext::default()).connect(
            Arc::new(StubChain { deployed }),
            relayer,
            settings(limit),
        )
    }

    async fn send_claim(wallet: &BoundWallet) -> TransactionResponse {
        let state = wallet.state().await.unwrap();
        let txns = [WalletTransaction::call(
            Address::repeat_byte(0xc1),
            Bytes::from_static(&[0x01]),
        )];
        wallet.send_transaction(&txns, &state, None).await.unwrap()
    }

    #[tokio::test]
    async fn test_succeeded_meta_txn_returns_chain_receipt() {
        let hash = TxHash::repeat_byte(0x11);
        let relayer = Arc::new(StubRelayer::settling(MetaTxnStatus::Succeeded, Some(hash)));
        let wallet = bound(true, relayer, None);

        let receipt = send_claim(&wallet).await.wait().await.unwrap();
        assert_eq!(receipt.transaction_hash, hash);
        assert!(receipt.is_success());
    }

    #[tokio::test]
    async fn test_failed_meta_txn_becomes_status_zero() {
        for status in [MetaTxnStatus::Failed, MetaTxnStatus::PartiallyFailed] {
            let hash = TxHash::repeat_byte(0x22);
            let relayer = Arc::new(StubRelayer::settling(status, Some(hash)));
            let wallet = bound(true, relayer, None);

            let receipt = send_claim(&wallet).await.wait().await.unwrap();
            assert_eq!(receipt.transaction_hash, hash);
            assert_eq!(receipt.status, 0);
        }
    }

    #[tokio::test]
    async fn test_unmined_outcome_is_dropped() {
        let relayer = Arc::new(StubRelayer::settling(MetaTxnStatus::Dropped, None));
        let wallet = bound(true, relayer, None);

        let err = send_claim(&wallet).await.wait().await.unwrap_err();
        match err {
            WalletError::Dropped { id, .. } => assert_eq!(id.0, "m-1"),
            other => panic!("expected drop, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pending_meta_txn_hits_wait_limit() {
        let relayer = Arc::new(StubRelayer::settling(MetaTxnStatus::Queued, None));
        let wallet = bound(true, relayer, Some(Duration::from_millis(50)));

        let err = send_claim(&wallet).await.wait().await.unwrap_err();
        assert!(matches!(err, WalletError::ConfirmationTimeout(limit) if limit == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_unknown_receipt_keeps_polling_until_limit() {
        let relayer = Arc::new(StubRelayer {
            receipt: None,
            sent: Mutex::new(Vec::new()),
        });
        let wallet = bound(true, relayer, Some(Duration::from_millis(50)));

        let err = send_claim(&wallet).await.wait().await.unwrap_err();
        assert!(matches!(err, WalletError::ConfirmationTimeout(_)));
    }

    #[tokio::test]
    async fn test_deployed_state_reads_nonce() {
        let relayer = Arc::new(StubRelayer::settling(MetaTxnStatus::Succeeded, None));
        let state = bound(true, relayer, None).state().await.unwrap();
        assert!(state.deployed);
        assert_eq!(state.nonce, U256::from(5));
    }

    #[tokio::test]
    async fn test_undeployed_wallet_routes_through_guest_module() {
        let relayer = Arc::new(StubRelayer::settling(MetaTxnStatus::Succeeded, None));
        let wallet = bound(false, relayer.clone(), None);

        let state = wallet.state().await.unwrap();
        assert!(!state.deployed);
        assert_eq!(state.nonce, U256::ZERO);

        send_claim(&wallet).await;
        let sent = relayer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].contract, WalletContext::default().guest_module);
        assert_eq!(sent[0].wallet_address, wallet.get_address());
    }

    #[tokio::test]
    async fn test_deployed_wallet_calls_itself() {
        let relayer = Arc::new(StubRelayer::settling(MetaTxnStatus::Succeeded, None));
        let wallet = bound(true, relayer.clone(), None);

        send_claim(&wallet).await;
        let sent = relayer.sent.lock().unwrap();
        assert_eq!(sent[0].contract, wallet.get_address());
    }
}

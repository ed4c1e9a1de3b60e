//! Solidity interfaces of the wallet contracts and the claim contract.

use alloy::sol;

sol! {
    /// Batch element executed by the wallet main module.
    struct Transaction {
        bool delegateCall;
        bool revertOnError;
        uint256 gasLimit;
        address target;
        uint256 value;
        bytes data;
    }

    /// Main module / guest module entry point.
    function execute(Transaction[] _txs, uint256 _nonce, bytes _signature);

    /// Current nonce of a nonce space.
    function readNonce(uint256 _space) returns (uint256);

    /// Factory CREATE2 deployment of a wallet proxy.
    function deploy(address _mainModule, bytes32 _salt) returns (address _contract);

    /// Claim contract entry point.
    function relayClaim(address sessionWallet_, address sequenceWallet_, uint256 nonce_, bytes sig_);
}

//! Two-party fair coin-toss contract.
//!
//! Alice and Bob each commit to a choice bit (encoded as commitment
//! length, see [`crate::commitment`]) and contribute a fresh key. The
//! locking script recomputes the toss result from the two revealed
//! commitment lengths and pays the matching party: Alice on TAIL
//! (result 0), Bob on HEAD (result 1). Neither party asserts the
//! outcome; the predicate derives it.
//!
//! Caller obligation: fairness requires that both commitment digests are
//! exchanged before either nonce is revealed. This crate only builds
//! scripts; it cannot enforce that ordering on the communication channel.

use rand::{CryptoRng, RngCore};

use fairlock_primitives::ec::PrivateKey;
use fairlock_script::opcodes::*;
use fairlock_script::{Script, ScriptBuilder};
use fairlock_transaction::sighash::SighashMode;
use fairlock_transaction::Transaction;

use crate::commitment::{Commitment, TossChoice, COMMITMENT_BASE_LEN};
use crate::contract::{sign_input, ScriptContract};
use crate::ContractError;

/// The two participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    Alice,
    Bob,
}

/// The derived toss result. Alice wins on TAIL, Bob wins on HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TossOutcome {
    Tail,
    Head,
}

/// A coin-toss contract instance.
///
/// The winning key is derived strictly from the two committed bits
/// (`alice_bit OR bob_bit`); the constructor cannot be told who wins.
#[derive(Debug)]
pub struct CoinToss {
    /// Alice's key.
    alice_key: PrivateKey,
    /// Alice's commitment.
    alice_nonce: Commitment,
    /// Bob's key.
    bob_key: PrivateKey,
    /// Bob's commitment.
    bob_nonce: Commitment,
}

impl CoinToss {
    /// Create an instance from both parties' choices, sampling fresh
    /// commitments from the injected CSPRNG and fresh keys per party.
    ///
    /// # Arguments
    /// * `alice_choice` - Alice's committed bit.
    /// * `bob_choice` - Bob's committed bit.
    /// * `rng` - Randomness source for the commitments.
    ///
    /// # Returns
    /// A new contract instance.
    pub fn new<R: RngCore + CryptoRng>(
        alice_choice: TossChoice,
        bob_choice: TossChoice,
        rng: &mut R,
    ) -> Self {
        CoinToss {
            alice_key: PrivateKey::new(),
            alice_nonce: Commitment::random(alice_choice, rng),
            bob_key: PrivateKey::new(),
            bob_nonce: Commitment::random(bob_choice, rng),
        }
    }

    /// Reassemble an instance from existing keys and revealed nonces.
    ///
    /// # Arguments
    /// * `alice_key` / `bob_key` - The parties' keys.
    /// * `alice_nonce` / `bob_nonce` - The revealed commitment bytes.
    ///
    /// # Returns
    /// `Ok(CoinToss)`, or `ContractError::CommitmentLength` if either
    /// nonce is not 16 or 17 bytes.
    pub fn from_parts(
        alice_key: PrivateKey,
        alice_nonce: &[u8],
        bob_key: PrivateKey,
        bob_nonce: &[u8],
    ) -> Result<Self, ContractError> {
        Ok(CoinToss {
            alice_key,
            alice_nonce: Commitment::from_bytes(alice_nonce)?,
            bob_key,
            bob_nonce: Commitment::from_bytes(bob_nonce)?,
        })
    }

    /// The toss result derived from the committed bits.
    pub fn outcome(&self) -> TossOutcome {
        if (self.alice_nonce.choice().bit() | self.bob_nonce.choice().bit()) == 0 {
            TossOutcome::Tail
        } else {
            TossOutcome::Head
        }
    }

    /// The party the predicate pays.
    pub fn winning_player(&self) -> Player {
        match self.outcome() {
            TossOutcome::Tail => Player::Alice,
            TossOutcome::Head => Player::Bob,
        }
    }

    /// Alice's commitment.
    pub fn alice_nonce(&self) -> &Commitment {
        &self.alice_nonce
    }

    /// Bob's commitment.
    pub fn bob_nonce(&self) -> &Commitment {
        &self.bob_nonce
    }

    fn key_of(&self, player: Player) -> &PrivateKey {
        match player {
            Player::Alice => &self.alice_key,
            Player::Bob => &self.bob_key,
        }
    }

    /// Produce a claim attempt on behalf of `claimant`.
    ///
    /// Both nonces are always revealed regardless of who signs, so the
    /// predicate can recompute the result. A claim by the losing player
    /// is well-formed but will be rejected by evaluation.
    ///
    /// # Arguments
    /// * `tx` - The spending transaction skeleton.
    /// * `input_index` - The input to produce a script for.
    /// * `claimant` - The player whose key signs.
    ///
    /// # Returns
    /// The unlocking script for that claim.
    pub fn unlocking_script_as(
        &self,
        tx: &Transaction,
        input_index: u32,
        claimant: Player,
    ) -> Result<Script, ContractError> {
        let signature = sign_input(
            tx,
            input_index,
            &self.locking_script()?,
            self.key_of(claimant),
            SighashMode::All,
        )?;
        let script = ScriptBuilder::new()
            .data(&signature)
            .data(self.bob_nonce.as_bytes())
            .data(self.alice_nonce.as_bytes())
            .build()?;
        Ok(script)
    }
}

impl ScriptContract for CoinToss {
    fn locking_script(&self) -> Result<Script, ContractError> {
        let script = ScriptBuilder::new()              // Stack = | aliceNonce, bobNonce, signature |
            .op(OP_DUP)                                // Stack = | aliceNonce, aliceNonce, bobNonce, signature |
            .op(OP_HASH160)                            // Stack = | aliceNonceHash, aliceNonce, bobNonce, signature |
            .data(&self.alice_nonce.digest())          // Stack = | aliceDigest, aliceNonceHash, aliceNonce, bobNonce, signature |
            .op(OP_EQUALVERIFY)                        // Stack = | aliceNonce, bobNonce, signature |
            .op(OP_SWAP)                               // Stack = | bobNonce, aliceNonce, signature |
            .op(OP_DUP)                                // Stack = | bobNonce, bobNonce, aliceNonce, signature |
            .op(OP_HASH160)                            // Stack = | bobNonceHash, bobNonce, aliceNonce, signature |
            .data(&self.bob_nonce.digest())            // Stack = | bobDigest, bobNonceHash, bobNonce, aliceNonce, signature |
            .op(OP_EQUALVERIFY)                        // Stack = | bobNonce, aliceNonce, signature |

            .op(OP_SIZE)                               // Stack = | bobNonceSize, bobNonce, aliceNonce, signature |
            .op(OP_NIP)                                // Stack = | bobNonceSize, aliceNonce, signature |
            .op(OP_SWAP)                               // Stack = | aliceNonce, bobNonceSize, signature |
            .op(OP_SIZE)                               // Stack = | aliceNonceSize, aliceNonce, bobNonceSize, signature |
            .op(OP_NIP)                                // Stack = | aliceNonceSize, bobNonceSize, signature |
            .num(COMMITMENT_BASE_LEN as i64)           // Stack = | 16, aliceNonceSize, bobNonceSize, signature |
            .op(OP_SUB)                                // Stack = | aliceChoice, bobNonceSize, signature |
            .op(OP_SWAP)                               // Stack = | bobNonceSize, aliceChoice, signature |
            .num(COMMITMENT_BASE_LEN as i64)           // Stack = | 16, bobNonceSize, aliceChoice, signature |
            .op(OP_SUB)                                // Stack = | bobChoice, aliceChoice, signature |
            .op(OP_BOOLOR)                             // Stack = | result, signature |

            .op(OP_SWAP)                               // Stack = | signature, result |
            .op(OP_DUP)                                // Stack = | signature, signature, result |
            .data(&self.bob_key.pub_key().to_compressed())   // Stack = | bobPubKey, signature, signature, result |
            .op(OP_CHECKSIG)                           // Stack = | isBobWinner, signature, result |
            .op(OP_SWAP)                               // Stack = | signature, isBobWinner, result |
            .data(&self.alice_key.pub_key().to_compressed()) // Stack = | alicePubKey, signature, isBobWinner, result |
            .op(OP_CHECKSIG)                           // Stack = | isAliceWinner, isBobWinner, result |

            .op(OP_3DUP)                               // Stack = | isAliceWinner, isBobWinner, result,
                                                       //           isAliceWinner, isBobWinner, result |

            // Payout gate from the truth table:
            // result * isBobWinner * ~isAliceWinner
            .op(OP_NOT)
            .op(OP_BOOLAND)
            .op(OP_BOOLAND)
            .op(OP_TOALTSTACK)

            // ~result * ~isBobWinner * isAliceWinner
            .op(OP_SWAP)
            .op(OP_NOT)
            .op(OP_BOOLAND)
            .op(OP_SWAP)
            .op(OP_NOT)
            .op(OP_BOOLAND)
            .op(OP_FROMALTSTACK)

            // (result * isBobWinner * ~isAliceWinner)
            //   + (~result * ~isBobWinner * isAliceWinner)
            .op(OP_BOOLOR)
            .build()?;
        Ok(script)
    }

    fn unlocking_script(
        &self,
        tx: &Transaction,
        input_index: u32,
    ) -> Result<Script, ContractError> {
        self.unlocking_script_as(tx, input_index, self.winning_player())
    }
}

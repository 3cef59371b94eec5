use log::debug;

use super::model::{AccountInfo, State};
use crate::blockchain::{MINING_REWARD, STARTING_BALANCE};
use crate::error::LedgerError;
use crate::transaction::{Transaction, TxType};

/// Apply one transaction to `state`.
///
/// TRANSACT credits the sender and debits the recipient. That direction is
/// what every replica on the network computes, so it is kept as-is.
pub fn apply_transaction(state: &mut State, tx: &Transaction) -> Result<(), LedgerError> {
    let ut = &tx.unsigned;
    match ut.txtype {
        TxType::CreateAccount => {
            state.put(AccountInfo {
                public_key: ut.pk_recipient.clone(),
                balance: STARTING_BALANCE,
            });
        }
        TxType::Transact => {
            // Both lookups happen before any write.
            let mut from = state.fetch(&ut.pk_sender)?;
            state.fetch(&ut.pk_recipient)?;

            from.balance += ut.value;
            state.put(from);
            let mut to = state.fetch(&ut.pk_recipient)?;
            to.balance -= ut.value;
            state.put(to);
        }
        TxType::RewardMiner => {
            let mut to = state.fetch(&ut.pk_recipient)?;
            to.balance += MINING_REWARD;
            state.put(to);
        }
    }
    Ok(())
}

/// Apply transactions in order. There is no rollback: on error the
/// transactions before the failing one stay applied.
pub fn run_transactions(state: &mut State, transactions: &[Transaction]) -> Result<(), LedgerError> {
    for tx in transactions {
        apply_transaction(state, tx)?;
    }
    debug!(
        "applied {} txs, state root now {}",
        transactions.len(),
        state.root_hash()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::model::UnsignedTransaction;
    use crate::transaction::{make_create_account, make_reward_miner};

    fn transact(from: &str, to: &str, value: f64) -> Transaction {
        Transaction {
            unsigned: UnsignedTransaction {
                pk_sender: from.into(),
                pk_recipient: to.into(),
                value,
                txtype: TxType::Transact,
                uuid: format!("{from}-{to}-{value}"),
            },
            signature: String::new(),
        }
    }

    fn balance(state: &State, pk: &str) -> f64 {
        state.get(pk).map(|a| a.balance).unwrap()
    }

    #[test]
    fn create_account_resets_balance() {
        let mut s = State::new();
        run_transactions(
            &mut s,
            &[make_create_account("A"), make_reward_miner("A")],
        )
        .unwrap();
        assert_eq!(balance(&s, "A"), STARTING_BALANCE + MINING_REWARD);

        run_transactions(&mut s, &[make_create_account("A")]).unwrap();
        assert_eq!(balance(&s, "A"), STARTING_BALANCE);
    }

    #[test]
    fn transact_credits_sender_and_debits_recipient() {
        let mut s = State::new();
        run_transactions(
            &mut s,
            &[
                make_create_account("A"),
                make_create_account("B"),
                transact("A", "B", 10.0),
            ],
        )
        .unwrap();
        assert_eq!(balance(&s, "A"), STARTING_BALANCE + 10.0);
        assert_eq!(balance(&s, "B"), STARTING_BALANCE - 10.0);
    }

    #[test]
    fn transact_to_unknown_account_fails_without_touching_sender() {
        let mut s = State::new();
        run_transactions(&mut s, &[make_create_account("A")]).unwrap();
        let before = s.clone();

        let err = apply_transaction(&mut s, &transact("A", "ghost", 5.0)).unwrap_err();
        assert_eq!(err, LedgerError::AccountNotFound("ghost".into()));
        assert_eq!(s, before);
    }

    #[test]
    fn earlier_transactions_stay_applied_on_error() {
        let mut s = State::new();
        let result = run_transactions(
            &mut s,
            &[make_create_account("A"), make_reward_miner("nobody")],
        );
        assert!(result.is_err());
        assert!(s.contains("A"));
    }
}

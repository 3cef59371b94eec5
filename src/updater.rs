use actix_web::web;
use log::{debug, error, info, warn};

use crate::api::AppState;
use crate::error::NodeError;
use crate::pubsub::{Message, Subscriber};

/// Apply one bus message to the shared node.
pub fn handle_message(state: &AppState, message: Message) -> Result<(), NodeError> {
    let mut node = state.node.lock().expect("mutex poisoned");
    match message {
        Message::Block(block) => {
            if node.is_tip(&block) {
                debug!("UPDATER - block #{} already at tip", block.header.number);
                return Ok(());
            }
            let number = block.header.number;
            match node.accept_block(block) {
                Ok(true) => info!("UPDATER - added block #{}", number),
                Ok(false) => warn!("UPDATER - block #{} does not extend the tip", number),
                Err(e) => {
                    error!("UPDATER - block #{} appended but not applied: {}", number, e);
                    return Err(e.into());
                }
            }
        }
        Message::Transaction(tx) => node.add_transaction(tx),
    }
    Ok(())
}

/// Drain the bus into the node in receipt order. Returns only on a fatal
/// error: a closed bus, an unknown message type, or a block whose
/// transactions could not be applied.
pub async fn run(state: web::Data<AppState>, mut subscriber: Subscriber) -> Result<(), NodeError> {
    info!("UPDATER - listening for blocks and transactions");
    loop {
        let message = subscriber.pull_message().await?;
        handle_message(&state, message)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::miner::mine_block;
    use crate::error::BusError;
    use crate::pubsub::MessageBus;
    use crate::transaction::{make_create_account, make_reward_miner};

    fn app_state() -> (web::Data<AppState>, MessageBus) {
        let bus = MessageBus::new(16);
        (web::Data::new(AppState::new("M".into(), bus.clone())), bus)
    }

    #[actix_web::test]
    async fn transactions_then_block_flow_into_node() {
        let (state, bus) = app_state();
        let mut sub = bus.subscribe();

        let create = make_create_account("A");
        bus.publish_transaction(&create).unwrap();
        handle_message(&state, sub.pull_message().await.unwrap()).unwrap();
        assert_eq!(state.node.lock().unwrap().mempool.len(), 1);

        let block = {
            let node = state.node.lock().unwrap();
            mine_block(
                node.blockchain.last_block(),
                "A",
                vec![create],
                node.blockchain.state.root_hash(),
            )
        };
        bus.publish_block(&block).unwrap();
        handle_message(&state, sub.pull_message().await.unwrap()).unwrap();

        let node = state.node.lock().unwrap();
        assert_eq!(node.blockchain.len(), 2);
        assert!(node.mempool.is_empty());
    }

    #[actix_web::test]
    async fn own_block_echo_is_skipped() {
        let (state, _bus) = app_state();
        let block = {
            let node = state.node.lock().unwrap();
            mine_block(node.blockchain.last_block(), "M", vec![], node.blockchain.state.root_hash())
        };
        state.node.lock().unwrap().accept_block(block.clone()).unwrap();

        handle_message(&state, Message::Block(block)).unwrap();
        assert_eq!(state.node.lock().unwrap().blockchain.len(), 2);
    }

    #[actix_web::test]
    async fn unappliable_block_stops_updater() {
        let (state, bus) = app_state();
        let sub = bus.subscribe();
        let block = mine_block(
            &crate::blockchain::Block::genesis(),
            "M",
            vec![make_reward_miner("ghost")],
            "root",
        );
        bus.publish_block(&block).unwrap();

        let result = run(state, sub).await;
        assert!(matches!(result, Err(NodeError::Ledger(_))));
    }

    #[actix_web::test]
    async fn closed_bus_stops_updater() {
        let (state, _bus) = app_state();
        let other = MessageBus::new(4);
        let sub = other.subscribe();
        drop(other);

        let result = run(state, sub).await;
        assert!(matches!(result, Err(NodeError::Bus(BusError::Closed))));
    }
}

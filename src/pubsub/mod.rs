//! Local fan-out bus carrying blocks and transactions between the API side
//! and the background ledger updater.
//!
//! Delivery is best-effort and at-most-once: messages published before a
//! subscriber exists are never seen by it, and a subscriber that falls more
//! than `capacity` messages behind loses the overflow.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::blockchain::Block;
use crate::error::BusError;
use crate::hashing::canonical_json;
use crate::transaction::Transaction;

const MSG_BLOCK: &str = "BLOCK";
const MSG_TRANSACTION: &str = "TRANSACTION";

/// A decoded bus message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Block(Block),
    Transaction(Transaction),
}

impl Message {
    fn msg_type(&self) -> &'static str {
        match self {
            Message::Block(_) => MSG_BLOCK,
            Message::Transaction(_) => MSG_TRANSACTION,
        }
    }
}

/// `{"msg_type": ..., "msg_data": ...}` as it travels on the bus.
#[derive(Serialize, Deserialize)]
struct Envelope {
    msg_type: String,
    msg_data: Value,
}

pub fn encode(message: &Message) -> Result<String, BusError> {
    let msg_data = match message {
        Message::Block(block) => serde_json::to_value(block)?,
        Message::Transaction(tx) => serde_json::to_value(tx)?,
    };
    let envelope = Envelope {
        msg_type: message.msg_type().to_string(),
        msg_data,
    };
    Ok(canonical_json(&envelope)?)
}

pub fn decode(raw: &str) -> Result<Message, BusError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    match envelope.msg_type.as_str() {
        MSG_BLOCK => Ok(Message::Block(serde_json::from_value(envelope.msg_data)?)),
        MSG_TRANSACTION => Ok(Message::Transaction(serde_json::from_value(
            envelope.msg_data,
        )?)),
        other => Err(BusError::UnknownMessageType(other.to_string())),
    }
}

/// Publishing half; cheap to clone, every clone feeds the same subscribers.
#[derive(Debug, Clone)]
pub struct MessageBus {
    sender: broadcast::Sender<String>,
}

impl MessageBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Only messages published after this call are delivered to the subscriber.
    pub fn subscribe(&self) -> Subscriber {
        Subscriber {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn publish_block(&self, block: &Block) -> Result<usize, BusError> {
        self.publish(&Message::Block(block.clone()))
    }

    pub fn publish_transaction(&self, tx: &Transaction) -> Result<usize, BusError> {
        self.publish(&Message::Transaction(tx.clone()))
    }

    /// Broadcast to current subscribers; returns how many were reached.
    pub fn publish(&self, message: &Message) -> Result<usize, BusError> {
        let raw = encode(message)?;
        Ok(self.publish_raw(raw, message.msg_type()))
    }

    fn publish_raw(&self, raw: String, msg_type: &str) -> usize {
        match self.sender.send(raw) {
            Ok(reached) => {
                debug!("BUS - published {} to {} subscriber(s)", msg_type, reached);
                reached
            }
            Err(_) => {
                debug!("BUS - no subscribers, dropped {}", msg_type);
                0
            }
        }
    }
}

pub struct Subscriber {
    receiver: broadcast::Receiver<String>,
}

impl Subscriber {
    /// Wait for the next message and decode it. Messages lost to lag are
    /// skipped with a warning; an unknown `msg_type` is returned as an error.
    pub async fn pull_message(&mut self) -> Result<Message, BusError> {
        loop {
            match self.receiver.recv().await {
                Ok(raw) => return decode(&raw),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("BUS - subscriber lagged, {} message(s) lost", missed);
                }
                Err(broadcast::error::RecvError::Closed) => return Err(BusError::Closed),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::miner::mine_block;
    use crate::transaction::{make_create_account, make_send};
    use crate::wallet::Account;

    #[actix_web::test]
    async fn block_round_trip() {
        let bus = MessageBus::new(16);
        let mut sub = bus.subscribe();

        let block = mine_block(
            &Block::genesis(),
            "miner",
            vec![make_create_account("A")],
            "root",
        );
        assert_eq!(bus.publish_block(&block).unwrap(), 1);
        assert_eq!(sub.pull_message().await.unwrap(), Message::Block(block));
    }

    #[actix_web::test]
    async fn transaction_round_trip_reaches_every_subscriber() {
        let bus = MessageBus::new(16);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let tx = make_send(&Account::new(), 12.5, "B").unwrap();
        assert_eq!(bus.publish_transaction(&tx).unwrap(), 2);

        let expected = Message::Transaction(tx);
        assert_eq!(first.pull_message().await.unwrap(), expected);
        assert_eq!(second.pull_message().await.unwrap(), expected);
    }

    #[actix_web::test]
    async fn late_subscriber_misses_earlier_messages() {
        let bus = MessageBus::new(16);
        assert_eq!(bus.publish_transaction(&make_create_account("early")).unwrap(), 0);

        let mut sub = bus.subscribe();
        let late = make_create_account("late");
        bus.publish_transaction(&late).unwrap();
        assert_eq!(sub.pull_message().await.unwrap(), Message::Transaction(late));
    }

    #[actix_web::test]
    async fn unknown_message_type_is_an_error() {
        let bus = MessageBus::new(16);
        let mut sub = bus.subscribe();
        bus.publish_raw(r#"{"msg_data":{},"msg_type":"GOSSIP"}"#.to_string(), "GOSSIP");

        match sub.pull_message().await {
            Err(BusError::UnknownMessageType(tag)) => assert_eq!(tag, "GOSSIP"),
            other => panic!("expected unknown message type, got {other:?}"),
        }
    }

    #[test]
    fn envelope_wire_shape() {
        let tx = make_create_account("A");
        let raw = encode(&Message::Transaction(tx.clone())).unwrap();
        let v: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["msg_type"], "TRANSACTION");
        assert_eq!(v["msg_data"]["ut"]["uuid"], tx.uuid());
        assert!(raw.starts_with(r#"{"msg_data":"#));
    }
}

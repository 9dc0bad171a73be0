//! A channel-backed event sink.
//!
//! The scheduler publishes fire-and-forget; whatever owns the push
//! channel (a WebSocket fan-out task, usually) consumes the receiver and
//! does the actual delivery. If the receiver is gone the events are
//! silently dropped, the same way a room actor drops messages for a
//! disconnected player.

use tokio::sync::mpsc;
use turncoat_protocol::{PlayerId, ServerEvent};
use turncoat_tick::EventSink;

/// One event leaving the coordination core, with its addressing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// For every connected observer of this game.
    Broadcast(ServerEvent),
    /// For one observer.
    Direct(PlayerId, ServerEvent),
}

/// An [`EventSink`] that forwards everything into an unbounded channel.
#[derive(Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its events arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(Outbound::Broadcast(event));
    }

    fn send_to(&self, participant: PlayerId, event: ServerEvent) {
        let _ = self.sender.send(Outbound::Direct(participant, event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_arrives_on_receiver() {
        let (sink, mut rx) = ChannelSink::new();
        let event = ServerEvent::TickComplete { tick: 1, queue_size: 0 };

        sink.broadcast(event.clone());

        assert_eq!(rx.try_recv().unwrap(), Outbound::Broadcast(event));
    }

    #[test]
    fn test_send_to_carries_the_recipient() {
        let (sink, mut rx) = ChannelSink::new();
        let event = ServerEvent::ActionTimeout { message: "late".into() };

        sink.send_to(PlayerId(4), event.clone());

        assert_eq!(rx.try_recv().unwrap(), Outbound::Direct(PlayerId(4), event));
    }

    #[test]
    fn test_dropped_receiver_does_not_panic() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);

        // Fire-and-forget: no receiver, no error.
        sink.broadcast(ServerEvent::TickComplete { tick: 1, queue_size: 0 });
    }
}

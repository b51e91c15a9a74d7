pub use message_broadcast::MessageBroadcaster;

mod message_broadcast;

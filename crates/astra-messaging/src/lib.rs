//! Messaging channel plumbing: webhook signature validation, TwiML
//! rendering, and the outbound WhatsApp send client.

pub mod client;
pub mod error;
pub mod signature;
pub mod twiml;

pub use client::{DeliveryReceipt, MessagingClient};
pub use error::DeliveryError;

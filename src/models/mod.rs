pub mod action;
pub mod booking;
pub mod chat;
pub mod context;
pub mod decision;
pub mod room;
pub mod user;

pub use action::{ActionRequest, AgentAction, BackendResponse, RoomRef};
pub use booking::{format_amount, BookingStatus, BookingSummary};
pub use chat::{ChatMessage, ChatRequest, ChatResponse};
pub use context::{ConversationContext, ConversationIntent, SessionSlots};
pub use decision::{param_text, Decision, Params};
pub use room::{Room, RoomType};
pub use user::{Identity, ProfileUpdate, UserProfile};

pub mod booking;
pub mod conversation;
pub mod intent;
pub mod payment;
pub mod tour;

pub use booking::{Booking, BookingStatus};
pub use conversation::ConversationTurn;
pub use intent::{Classification, Intent, IntentParams};
pub use payment::{Payment, PaymentStatus};
pub use tour::Tour;

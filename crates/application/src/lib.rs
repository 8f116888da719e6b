//! Application layer: the command handlers that tie aggregates, the unit of
//! work and the event bus together.
//!
//! Every handler follows the same protocol:
//! 1. create a unit of work and begin it
//! 2. lock, load and mutate the aggregates involved
//! 3. save them, then commit (or roll back on the first error)
//! 4. only after the commit, drain the buffered events and publish them

pub mod cancel_order;
pub mod commands;
pub mod create_order;
pub mod customer_commands;
pub mod lifecycle;
pub mod loyalty;
pub mod store_commands;
mod transaction;

pub use cancel_order::{CancelOrderHandler, CancellationOutcome, FailedRelease, ReleasedItem};
pub use commands::{
    AddInventory, AddProduct, CancelOrder, CreateOrder, CreateStore, DeactivateCustomer,
    DeactivateProduct, OrderLine, OrderTransition, RedeemPoints, RegisterCustomer,
    UpdateCustomerContact, UpdateProductPrice,
};
pub use create_order::CreateOrderHandler;
pub use customer_commands::CustomerCommandHandler;
pub use lifecycle::OrderLifecycleHandler;
pub use loyalty::{LoyaltyPointsHandler, points_for, subscribe_default_handlers};
pub use store_commands::StoreCommandHandler;

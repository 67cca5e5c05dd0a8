pub use commands::{CreateTransactionCmd, UpdateTransactionCmd};
pub use environments::{Environment, EnvironmentSummary};
pub use error::EngineError;
pub use goals::{GOAL_DEPOSIT_CATEGORY, Goal};
pub use invites::{Invite, InviteStatus};
pub use money::MoneyCents;
pub use ops::{
    DEFAULT_PAGE_SIZE, Engine, EngineBuilder, InviteAcceptance, InvitePreview, MAX_PAGE_SIZE,
    ProfileSnapshot, TransactionListFilter,
};
pub use transactions::{Transaction, TransactionKind, TransactionRecord};
pub use users::{Profile, UserIdentity};

mod commands;
mod environment_members;
mod environments;
mod error;
mod goals;
pub mod import;
mod invites;
mod money;
mod ops;
pub mod reports;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;

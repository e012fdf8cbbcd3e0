mod budget;
mod category;
mod month;
mod user;

pub use budget::{budget_key, BudgetDocument, BudgetSummary};
pub use category::{AmountField, BudgetCategory};
pub use month::Month;
pub use user::{validate_login, FieldError, NewUser, UserRecord, UserStats};

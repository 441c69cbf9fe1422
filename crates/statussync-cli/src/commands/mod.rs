//! Command implementations.

pub mod classify;
pub mod config;
pub mod extract;
pub mod list;
pub mod run;

pub use self::classify::execute_classify;
pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::list::execute_list;
pub use self::run::execute_run;

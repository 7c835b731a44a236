//! CLI command implementations.
//!
//! | Module   | Commands handled     |
//! |----------|----------------------|
//! | `run`    | `Run`                |
//! | `config` | `List`, `Validate`   |

pub mod config;
pub mod run;

pub use config::{cmd_list, cmd_validate};
pub use run::cmd_run;

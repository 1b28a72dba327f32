mod admin;
mod forge;
mod init;
mod initdb;
mod serve;

pub use admin::cmd_admin;
pub use forge::{DEMO_ADMIN, DEMO_MOVIES, cmd_forge};
pub use init::cmd_init;
pub use initdb::cmd_initdb;
pub use serve::cmd_serve;

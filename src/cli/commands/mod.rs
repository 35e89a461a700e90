mod init;
mod migrate;
mod superuser;

pub use init::cmd_init;
pub use migrate::cmd_migrate;
pub use superuser::cmd_create_superuser;

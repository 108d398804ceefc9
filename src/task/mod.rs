pub mod command_read;
pub mod drive;
pub mod resources;

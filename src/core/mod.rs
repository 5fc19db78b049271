//! Process-wide state shared by the proxy, the supervisor and the actors.

mod state;

pub use state::{
    exit_code, is_shutdown, register_server, request_shutdown, setup_shutdown_handler,
};

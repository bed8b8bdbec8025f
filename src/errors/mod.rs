pub mod watch_error;

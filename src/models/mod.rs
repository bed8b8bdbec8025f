pub mod trigger_rule;
pub mod watch_item;

pub mod market_clock;
pub mod watch_loop;

pub mod email_notifier;

mod chat_relay_service_test;
mod identity_guard_test;

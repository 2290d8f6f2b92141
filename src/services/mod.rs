pub mod chat_client;
pub mod documents;
pub mod excel;
pub mod session;

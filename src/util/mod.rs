pub mod jwt;
pub mod password;
pub mod email;
pub mod storage;
pub mod logger;
pub mod error;
pub mod json;
pub mod money;

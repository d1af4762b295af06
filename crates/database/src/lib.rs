pub mod db;
pub mod entities;
pub mod error;
pub mod notify;
pub mod services;

pub mod wager_service;

pub use wager_service::WagerService;

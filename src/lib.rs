pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod visibility;
pub mod vote;
pub mod web;

pub mod leptos;
pub mod search_service;
pub mod web;

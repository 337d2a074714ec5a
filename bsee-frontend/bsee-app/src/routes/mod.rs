pub mod home_page;
pub mod not_found;
pub mod search_results;

pub mod search_box;

pub mod delete_search;
pub mod list_searches;
pub mod next_step;
pub mod post_search;
pub mod put_search;
pub mod routes;
pub mod search_request;

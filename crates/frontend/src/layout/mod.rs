pub mod accessibility;
pub mod left;
pub mod row_navigation;
pub mod shortcuts;
